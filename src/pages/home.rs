use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use log::error;

use crate::components::dialog::{DialogLayer, ModalHost};
use crate::components::ontology_graph::{GraphCanvasState, OntologyGraphCanvas, SharedGraph};
use crate::config::GraphConfig;
use crate::graph::{GraphController, GraphPort, SearchMode, SearchOutcome, run_edit_loop};
use crate::ontology::fetch_elements;

#[derive(Clone, Debug, PartialEq)]
enum LoadStatus {
	Loading,
	Failed(String),
	/// Loaded; lists the elements the canvas refused.
	Ready(Vec<String>),
}

fn search_message(outcome: SearchOutcome, query: &str) -> Option<String> {
	match outcome {
		SearchOutcome::Skipped => None,
		SearchOutcome::NotFound => Some(format!("Nothing matches \"{}\"", query.trim())),
		SearchOutcome::Found(1) => Some("1 match".into()),
		SearchOutcome::Found(n) => Some(format!("{n} matches")),
	}
}

/// Ontology viewer: the graph canvas with a search bar and edit forms.
#[component]
pub fn Home() -> impl IntoView {
	let override_url = use_query_map().with_untracked(|query| query.get("ontology"));
	let config = GraphConfig::default().with_ontology_url(override_url);
	let url = config.ontology_url.clone();

	let graph: SharedGraph = Rc::new(RefCell::new(GraphController::new(
		GraphCanvasState::new(800.0, 600.0),
		config,
	)));
	let status = RwSignal::new(LoadStatus::Loading);

	let graph_load = graph.clone();
	spawn_local(async move {
		match fetch_elements(&url).await {
			Ok(elements) => {
				let summary = graph_load.borrow_mut().load(elements);
				let rejected = summary.rejected.iter().map(ToString::to_string).collect();
				status.set(LoadStatus::Ready(rejected));
			}
			Err(err) => {
				error!("could not load ontology from `{url}`: {err}");
				status.set(LoadStatus::Failed(err.to_string()));
			}
		}
	});

	let host = ModalHost::new();
	let events = graph.borrow_mut().port_mut().subscribe();
	spawn_local(run_edit_loop(graph.clone(), host, events, |task| spawn_local(task)));

	let mode = RwSignal::new(SearchMode::Label);
	let query = RwSignal::new(String::new());
	let message = RwSignal::new(None::<String>);

	let graph_search = graph.clone();
	let run_search = move || {
		let text = query.get_untracked();
		let outcome = graph_search.borrow_mut().search(mode.get_untracked(), &text);
		message.set(search_message(outcome, &text));
	};
	let search_on_enter = run_search.clone();
	let on_keydown = move |ev: web_sys::KeyboardEvent| {
		if ev.key() == "Enter" {
			search_on_enter();
		}
	};
	let on_click = move |_| run_search();
	let on_mode = move |ev| {
		if let Ok(picked) = event_target_value(&ev).parse::<SearchMode>() {
			mode.set(picked);
		}
	};

	let status_view = move || match status.get() {
		LoadStatus::Loading => view! { <p class="status">"Loading ontology…"</p> }.into_any(),
		LoadStatus::Failed(reason) => {
			view! { <p class="status error">"Could not load the ontology: " {reason}</p> }.into_any()
		}
		LoadStatus::Ready(rejected) if rejected.is_empty() => ().into_any(),
		LoadStatus::Ready(rejected) => view! {
			<details class="status warning">
				<summary>{format!("{} element(s) skipped", rejected.len())}</summary>
				<ul>{rejected.into_iter().map(|r| view! { <li>{r}</li> }).collect_view()}</ul>
			</details>
		}
		.into_any(),
	};

	view! {
		<div class="fullscreen-graph" class:hidden=move || matches!(status.get(), LoadStatus::Failed(_))>
			<OntologyGraphCanvas graph=graph fullscreen=true />
		</div>
		<div class="graph-overlay">
			<h1>"Ontology"</h1>
			<div class="search-bar">
				<select on:change=on_mode>
					<option value={SearchMode::Label.as_str()} selected=true>"Label"</option>
					<option value={SearchMode::Id.as_str()}>"Id"</option>
				</select>
				<input type="search" placeholder="Search…" bind:value=query on:keydown=on_keydown />
				<button on:click=on_click>"Search"</button>
			</div>
			{move || message.get().map(|text| view! { <p class="search-result">{text}</p> })}
			{status_view}
			<p class="subtitle">"Double-click a class or relation to edit it. Scroll to zoom."</p>
		</div>
		<DialogLayer host=host />
	}
}
