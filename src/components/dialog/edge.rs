use leptos::prelude::*;

use super::host::{DialogResponse, ModalHost};
use crate::graph::{DialogOutcome, EdgeForm, EdgeFormResult};

/// Whether the picked relation can be saved. A blank pick would be dropped.
fn can_save(selected: &str) -> bool {
	!selected.trim().is_empty()
}

/// Relation picker for an edge, with a delete action.
#[component]
pub(super) fn EdgeDialog(form: EdgeForm, host: ModalHost) -> impl IntoView {
	let current = form.relation.clone();
	let unset = !can_save(&current);
	let selected = RwSignal::new(form.relation);
	let options = form
		.relations
		.into_iter()
		.map(|relation| {
			let is_current = relation == current;
			let value = relation.clone();
			view! {
				<option value=value selected=is_current>
					{relation}
				</option>
			}
		})
		.collect_view();

	let save = move |_| {
		let relation = selected.get_untracked();
		if !can_save(&relation) {
			return;
		}
		let outcome = DialogOutcome::Submitted(EdgeFormResult::Relation(relation));
		host.respond(DialogResponse::Edge(outcome));
	};
	let delete = move |_| {
		let outcome = DialogOutcome::Submitted(EdgeFormResult::NoRelation);
		host.respond(DialogResponse::Edge(outcome));
	};
	let cancel = move |_| host.respond(DialogResponse::Edge(DialogOutcome::Cancelled));

	view! {
		<div class="dialog-backdrop">
			<div class="dialog" role="dialog">
				<h2>"Edit relation"</h2>
				<p class="dialog-subject">{form.id}</p>
				<label class="dialog-field">
					<span>"Relation"</span>
					<select on:change=move |ev| selected.set(event_target_value(&ev))>
						<option value="" disabled=true selected=unset>
							"Choose a relation"
						</option>
						{options}
					</select>
				</label>
				<div class="dialog-actions">
					<button on:click=cancel>"Cancel"</button>
					<button class="danger" on:click=delete>"Delete"</button>
					<button
						class="primary"
						disabled=move || !selected.with(|relation| can_save(relation))
						on:click=save
					>
						"Save"
					</button>
				</div>
			</div>
		</div>
	}
}
