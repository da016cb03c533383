use std::future::Future;

use futures::channel::oneshot;
use leptos::prelude::*;
use log::warn;

use super::edge::EdgeDialog;
use super::node::NodeDialog;
use crate::graph::{Attributes, DialogHost, DialogOutcome, EdgeForm, EdgeFormResult, NodeForm};

/// The form currently on screen and the channel its answer goes back on.
enum ActiveDialog {
	Node {
		form: NodeForm,
		reply: oneshot::Sender<DialogOutcome<Attributes>>,
	},
	Edge {
		form: EdgeForm,
		reply: oneshot::Sender<DialogOutcome<EdgeFormResult>>,
	},
}

pub(super) enum DialogResponse {
	Node(DialogOutcome<Attributes>),
	Edge(DialogOutcome<EdgeFormResult>),
}

/// Shows one modal form at a time.
///
/// Opening a form while another is visible replaces it; the replaced flow
/// resolves as cancelled.
#[derive(Clone, Copy)]
pub struct ModalHost {
	active: RwSignal<Option<ActiveDialog>>,
}

impl ModalHost {
	pub fn new() -> Self {
		Self {
			active: RwSignal::new(None),
		}
	}

	pub(super) fn respond(&self, response: DialogResponse) {
		let Some(Some(active)) = self.active.try_update(Option::take) else {
			return;
		};
		match (active, response) {
			(ActiveDialog::Node { reply, .. }, DialogResponse::Node(outcome)) => {
				let _ = reply.send(outcome);
			}
			(ActiveDialog::Edge { reply, .. }, DialogResponse::Edge(outcome)) => {
				let _ = reply.send(outcome);
			}
			(active, _) => {
				warn!("answer does not match the open form, ignored");
				self.active.set(Some(active));
			}
		}
	}
}

impl Default for ModalHost {
	fn default() -> Self {
		Self::new()
	}
}

impl DialogHost for ModalHost {
	fn open_node(&self, form: NodeForm) -> impl Future<Output = DialogOutcome<Attributes>> {
		let (reply, answer) = oneshot::channel();
		self.active.set(Some(ActiveDialog::Node { form, reply }));
		async move { answer.await.unwrap_or(DialogOutcome::Cancelled) }
	}

	fn open_edge(&self, form: EdgeForm) -> impl Future<Output = DialogOutcome<EdgeFormResult>> {
		let (reply, answer) = oneshot::channel();
		self.active.set(Some(ActiveDialog::Edge { form, reply }));
		async move { answer.await.unwrap_or(DialogOutcome::Cancelled) }
	}
}

/// Renders whichever form the host currently holds.
#[component]
pub fn DialogLayer(host: ModalHost) -> impl IntoView {
	move || {
		host.active.with(|active| match active {
			Some(ActiveDialog::Node { form, .. }) => {
				view! { <NodeDialog form=form.clone() host=host /> }.into_any()
			}
			Some(ActiveDialog::Edge { form, .. }) => {
				view! { <EdgeDialog form=form.clone() host=host /> }.into_any()
			}
			None => ().into_any(),
		})
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;

	fn node_form(id: &str) -> NodeForm {
		NodeForm {
			id: id.into(),
			attributes: Attributes::new(),
		}
	}

	#[test]
	fn submitted_answer_reaches_the_waiting_flow() {
		let host = ModalHost::new();
		let pending = host.open_node(node_form("dog"));
		let mut attributes = Attributes::new();
		attributes.insert("legs".into(), "4".into());
		host.respond(DialogResponse::Node(DialogOutcome::Submitted(attributes.clone())));

		assert_eq!(block_on(pending), DialogOutcome::Submitted(attributes));
		assert!(host.active.with_untracked(Option::is_none));
	}

	#[test]
	fn replaced_form_resolves_as_cancelled() {
		let host = ModalHost::new();
		let first = host.open_node(node_form("dog"));
		let second = host.open_node(node_form("cat"));
		host.respond(DialogResponse::Node(DialogOutcome::Cancelled));

		assert_eq!(block_on(first), DialogOutcome::Cancelled);
		assert_eq!(block_on(second), DialogOutcome::Cancelled);
	}

	#[test]
	fn mismatched_answer_keeps_the_form_open() {
		let host = ModalHost::new();
		let _pending = host.open_node(node_form("dog"));
		host.respond(DialogResponse::Edge(DialogOutcome::Submitted(EdgeFormResult::NoRelation)));
		assert!(host.active.with_untracked(Option::is_some));
	}
}
