use leptos::prelude::*;

use super::host::{DialogResponse, ModalHost};
use crate::graph::{Attributes, DialogOutcome, NodeForm};

/// Attribute editor for a class node. Keys are fixed, values are editable.
#[component]
pub(super) fn NodeDialog(form: NodeForm, host: ModalHost) -> impl IntoView {
	let fields: Vec<(String, RwSignal<String>)> = form
		.attributes
		.into_iter()
		.map(|(key, value)| (key, RwSignal::new(value)))
		.collect();
	let empty = fields.is_empty();

	let rows = fields
		.iter()
		.map(|(key, value)| {
			let value = *value;
			view! {
				<label class="dialog-field">
					<span>{key.clone()}</span>
					<input type="text" bind:value=value />
				</label>
			}
		})
		.collect_view();

	let save = move |_| {
		let attributes: Attributes = fields
			.iter()
			.map(|(key, value)| (key.clone(), value.get_untracked()))
			.collect();
		host.respond(DialogResponse::Node(DialogOutcome::Submitted(attributes)));
	};
	let cancel = move |_| host.respond(DialogResponse::Node(DialogOutcome::Cancelled));

	view! {
		<div class="dialog-backdrop">
			<div class="dialog" role="dialog">
				<h2>"Edit class"</h2>
				<label class="dialog-field">
					<span>"Class"</span>
					<input type="text" value={form.id} readonly=true />
				</label>
				{rows}
				<Show when=move || empty>
					<p class="dialog-empty">"No attributes"</p>
				</Show>
				<div class="dialog-actions">
					<button on:click=cancel>"Cancel"</button>
					<button class="primary" on:click=save>"Save"</button>
				</div>
			</div>
		</div>
	}
}
