//! Applies node and edge edit forms back onto the live graph.
//!
//! A flow opens a form, waits for it to close, and then mutates the graph at
//! most once. The controller is never borrowed while a form is open, so other
//! events keep flowing and several flows may be pending at the same time.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::StreamExt;
use futures::channel::mpsc::UnboundedReceiver;
use futures::future::LocalBoxFuture;
use log::{debug, warn};

use super::controller::GraphController;
use super::element::{Attributes, EdgeElement, ElementPatch, GraphElement, NodeElement};
use super::port::{GraphEvent, GraphPort};
use crate::ontology::relation_label;

/// Initial data of the node form. The id is shown read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeForm {
	pub id: String,
	pub attributes: Attributes,
}

/// Initial data of the edge form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeForm {
	pub id: String,
	/// Current relation type, empty if none.
	pub relation: String,
	/// Selectable relation types.
	pub relations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeFormResult {
	/// Drop the edge from the graph.
	NoRelation,
	Relation(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogOutcome<T> {
	Cancelled,
	Submitted(T),
}

/// Opens modal forms and resolves once they close.
pub trait DialogHost {
	fn open_node(&self, form: NodeForm) -> impl Future<Output = DialogOutcome<Attributes>>;

	fn open_edge(&self, form: EdgeForm) -> impl Future<Output = DialogOutcome<EdgeFormResult>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
	Cancelled,
	NodeUpdated,
	EdgeUpdated,
	EdgeRemoved,
	/// The element disappeared while its form was open.
	Stale,
}

impl<P: GraphPort> GraphController<P> {
	/// Distinct non-empty relation types of the current graph, in the order
	/// they first appear.
	pub fn known_relations(&self) -> Vec<String> {
		let mut relations: Vec<String> = Vec::new();
		for element in self.port().elements() {
			if let GraphElement::Edge(edge) = element {
				if !edge.relation.trim().is_empty() && !relations.contains(&edge.relation) {
					relations.push(edge.relation);
				}
			}
		}
		relations
	}

	pub fn apply_node_edit(&mut self, id: &str, attributes: Attributes) -> EditOutcome {
		if self.port_mut().update_data(id, ElementPatch::Attributes(attributes)) {
			debug!("attributes of `{id}` updated");
			EditOutcome::NodeUpdated
		} else {
			warn!("node `{id}` is gone, edit dropped");
			EditOutcome::Stale
		}
	}

	pub fn apply_edge_edit(&mut self, id: &str, result: EdgeFormResult) -> EditOutcome {
		match result {
			EdgeFormResult::NoRelation => {
				if self.port_mut().remove(id) {
					debug!("edge `{id}` removed");
					EditOutcome::EdgeRemoved
				} else {
					warn!("edge `{id}` is already gone");
					EditOutcome::Stale
				}
			}
			EdgeFormResult::Relation(relation) if relation.trim().is_empty() => {
				warn!("blank relation submitted for `{id}`, ignored");
				EditOutcome::Cancelled
			}
			EdgeFormResult::Relation(relation) => {
				let label = relation_label(&relation);
				if self
					.port_mut()
					.update_data(id, ElementPatch::Relation { relation, label })
				{
					debug!("relation of `{id}` updated");
					EditOutcome::EdgeUpdated
				} else {
					warn!("edge `{id}` is gone, edit dropped");
					EditOutcome::Stale
				}
			}
		}
	}
}

async fn edit_node<P: GraphPort, D: DialogHost>(
	controller: &RefCell<GraphController<P>>,
	dialogs: &D,
	node: NodeElement,
) -> EditOutcome {
	let form = NodeForm {
		id: node.id.clone(),
		attributes: node.attributes,
	};
	match dialogs.open_node(form).await {
		DialogOutcome::Cancelled => EditOutcome::Cancelled,
		DialogOutcome::Submitted(attributes) => {
			controller.borrow_mut().apply_node_edit(&node.id, attributes)
		}
	}
}

async fn edit_edge<P: GraphPort, D: DialogHost>(
	controller: &RefCell<GraphController<P>>,
	dialogs: &D,
	edge: EdgeElement,
) -> EditOutcome {
	let relations = controller.borrow().known_relations();
	let form = EdgeForm {
		id: edge.id.clone(),
		relation: edge.relation,
		relations,
	};
	match dialogs.open_edge(form).await {
		DialogOutcome::Cancelled => EditOutcome::Cancelled,
		DialogOutcome::Submitted(result) => controller.borrow_mut().apply_edge_edit(&edge.id, result),
	}
}

/// Runs the edit flow matching one port event.
pub async fn handle_event<P: GraphPort, D: DialogHost>(
	controller: &RefCell<GraphController<P>>,
	dialogs: &D,
	event: GraphEvent,
) -> EditOutcome {
	let outcome = match event {
		GraphEvent::DoubleClick(GraphElement::Node(node)) => edit_node(controller, dialogs, node).await,
		GraphEvent::DoubleClick(GraphElement::Edge(edge)) => edit_edge(controller, dialogs, edge).await,
	};
	debug!("edit finished: {outcome:?}");
	outcome
}

/// Consumes the port's event stream, handing each event's flow to `spawn`.
pub async fn run_edit_loop<P, D, S>(
	controller: Rc<RefCell<GraphController<P>>>,
	dialogs: D,
	mut events: UnboundedReceiver<GraphEvent>,
	spawn: S,
) where
	P: GraphPort + 'static,
	D: DialogHost + Clone + 'static,
	S: Fn(LocalBoxFuture<'static, ()>),
{
	while let Some(event) = events.next().await {
		let (controller, dialogs) = (controller.clone(), dialogs.clone());
		spawn(Box::pin(async move {
			handle_event(&controller, &dialogs, event).await;
		}));
	}
	debug!("graph event stream closed");
}

#[cfg(test)]
mod tests {
	use std::collections::VecDeque;

	use futures::executor::{LocalPool, block_on};
	use futures::task::LocalSpawnExt;

	use super::*;
	use crate::components::ontology_graph::GraphCanvasState;
	use crate::config::GraphConfig;
	use crate::graph::testing::pets_canvas;

	/// Answers forms from a script and records what it was shown.
	#[derive(Clone, Default)]
	struct ScriptedDialogs {
		node_answers: Rc<RefCell<VecDeque<DialogOutcome<Attributes>>>>,
		edge_answers: Rc<RefCell<VecDeque<DialogOutcome<EdgeFormResult>>>>,
		node_forms: Rc<RefCell<Vec<NodeForm>>>,
		edge_forms: Rc<RefCell<Vec<EdgeForm>>>,
	}

	impl ScriptedDialogs {
		fn answer_node(self, outcome: DialogOutcome<Attributes>) -> Self {
			self.node_answers.borrow_mut().push_back(outcome);
			self
		}

		fn answer_edge(self, outcome: DialogOutcome<EdgeFormResult>) -> Self {
			self.edge_answers.borrow_mut().push_back(outcome);
			self
		}
	}

	impl DialogHost for ScriptedDialogs {
		async fn open_node(&self, form: NodeForm) -> DialogOutcome<Attributes> {
			self.node_forms.borrow_mut().push(form);
			self.node_answers
				.borrow_mut()
				.pop_front()
				.unwrap_or(DialogOutcome::Cancelled)
		}

		async fn open_edge(&self, form: EdgeForm) -> DialogOutcome<EdgeFormResult> {
			self.edge_forms.borrow_mut().push(form);
			self.edge_answers
				.borrow_mut()
				.pop_front()
				.unwrap_or(DialogOutcome::Cancelled)
		}
	}

	fn controller() -> RefCell<GraphController<GraphCanvasState>> {
		RefCell::new(GraphController::new(pets_canvas(), GraphConfig::default()))
	}

	fn double_click(controller: &RefCell<GraphController<GraphCanvasState>>, id: &str) -> GraphEvent {
		let element = controller.borrow().port().element(id).unwrap();
		GraphEvent::DoubleClick(element)
	}

	fn edge(controller: &RefCell<GraphController<GraphCanvasState>>, id: &str) -> EdgeElement {
		match controller.borrow().port().element(id) {
			Some(GraphElement::Edge(edge)) => edge,
			other => panic!("expected edge `{id}`, got {other:?}"),
		}
	}

	fn node(controller: &RefCell<GraphController<GraphCanvasState>>, id: &str) -> NodeElement {
		match controller.borrow().port().element(id) {
			Some(GraphElement::Node(node)) => node,
			other => panic!("expected node `{id}`, got {other:?}"),
		}
	}

	const DOG_CAT: &str = "dog_disjoint_cat_2";

	#[test]
	fn node_form_is_prefilled_and_cancel_changes_nothing() {
		let graph = controller();
		let dialogs = ScriptedDialogs::default().answer_node(DialogOutcome::Cancelled);
		let before = node(&graph, "dog");

		let event = double_click(&graph, "dog");
		let outcome = block_on(handle_event(&graph, &dialogs, event));

		assert_eq!(outcome, EditOutcome::Cancelled);
		assert_eq!(node(&graph, "dog"), before);
		let forms = dialogs.node_forms.borrow();
		assert_eq!(forms[0].id, "dog");
		assert_eq!(forms[0].attributes, before.attributes);
	}

	#[test]
	fn node_submit_replaces_only_attributes() {
		let graph = controller();
		let mut attributes = Attributes::new();
		attributes.insert("legs".into(), "3".into());
		let dialogs =
			ScriptedDialogs::default().answer_node(DialogOutcome::Submitted(attributes.clone()));

		let event = double_click(&graph, "dog");
		let outcome = block_on(handle_event(&graph, &dialogs, event));

		assert_eq!(outcome, EditOutcome::NodeUpdated);
		let dog = node(&graph, "dog");
		assert_eq!(dog.attributes, attributes);
		assert_eq!(dog.label, "Dog");
		assert_eq!(graph.borrow().port().elements().len(), 8);
	}

	#[test]
	fn edge_form_offers_known_relations_in_first_seen_order() {
		let graph = controller();
		let dialogs = ScriptedDialogs::default();
		let event = double_click(&graph, DOG_CAT);
		block_on(handle_event(&graph, &dialogs, event));

		let forms = dialogs.edge_forms.borrow();
		assert_eq!(forms[0].relation, "disjoint");
		assert_eq!(forms[0].relations, vec!["inheritance", "disjoint"]);
	}

	#[test]
	fn no_relation_removes_the_edge() {
		let graph = controller();
		let dialogs =
			ScriptedDialogs::default().answer_edge(DialogOutcome::Submitted(EdgeFormResult::NoRelation));
		let event = double_click(&graph, DOG_CAT);

		let outcome = block_on(handle_event(&graph, &dialogs, event));

		assert_eq!(outcome, EditOutcome::EdgeRemoved);
		assert!(graph.borrow().port().by_id(DOG_CAT).is_empty());
		assert_eq!(graph.borrow().known_relations(), vec!["inheritance"]);
	}

	#[test]
	fn equivalence_gets_its_symbol() {
		let graph = controller();
		let dialogs = ScriptedDialogs::default().answer_edge(DialogOutcome::Submitted(
			EdgeFormResult::Relation("equivalence".into()),
		));
		let event = double_click(&graph, DOG_CAT);

		assert_eq!(block_on(handle_event(&graph, &dialogs, event)), EditOutcome::EdgeUpdated);
		let updated = edge(&graph, DOG_CAT);
		assert_eq!(updated.relation, "equivalence");
		assert_eq!(updated.label, "≡");
	}

	#[test]
	fn unmapped_relation_is_its_own_label_and_reapplying_is_idempotent() {
		let graph = controller();
		graph
			.borrow_mut()
			.apply_edge_edit(DOG_CAT, EdgeFormResult::Relation("partOf".into()));
		let first = edge(&graph, DOG_CAT);
		graph
			.borrow_mut()
			.apply_edge_edit(DOG_CAT, EdgeFormResult::Relation("partOf".into()));
		let second = edge(&graph, DOG_CAT);

		assert_eq!(first.label, "partOf");
		assert_eq!(first, second);
		assert_eq!(first.source, "dog");
		assert_eq!(first.target, "cat");
	}

	#[test]
	fn cancelled_edge_form_changes_nothing() {
		let graph = controller();
		let before = graph.borrow().port().elements();
		let dialogs = ScriptedDialogs::default().answer_edge(DialogOutcome::Cancelled);
		let event = double_click(&graph, DOG_CAT);

		assert_eq!(block_on(handle_event(&graph, &dialogs, event)), EditOutcome::Cancelled);
		assert_eq!(graph.borrow().port().elements(), before);
	}

	#[test]
	fn blank_relation_is_ignored() {
		let graph = controller();
		let outcome = graph
			.borrow_mut()
			.apply_edge_edit(DOG_CAT, EdgeFormResult::Relation(" ".into()));
		assert_eq!(outcome, EditOutcome::Cancelled);
		assert_eq!(edge(&graph, DOG_CAT).relation, "disjoint");
	}

	#[test]
	fn whitespace_relation_types_are_not_offered() {
		let elements = crate::ontology::transform_json(
			r#"{
				"classes": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}],
				"relations": [
					{"source": "a", "target": "b", "type": " "},
					{"source": "b", "target": "a", "type": "inheritance"}
				]
			}"#,
		)
		.unwrap();
		let mut graph = GraphController::new(GraphCanvasState::new(800.0, 600.0), GraphConfig::default());
		graph.load(elements);

		let offered = graph.known_relations();
		assert_eq!(offered, vec!["inheritance"]);
		let outcome = graph.apply_edge_edit("a_ _b_0", EdgeFormResult::Relation(offered[0].clone()));
		assert_eq!(outcome, EditOutcome::EdgeUpdated);
		assert_eq!(edge(&RefCell::new(graph), "a_ _b_0").label, "inherits");
	}

	#[test]
	fn edits_against_removed_elements_are_stale_no_ops() {
		let graph = controller();
		let event = double_click(&graph, DOG_CAT);
		assert!(graph.borrow_mut().port_mut().remove(DOG_CAT));

		let dialogs = ScriptedDialogs::default().answer_edge(DialogOutcome::Submitted(
			EdgeFormResult::Relation("partOf".into()),
		));
		assert_eq!(block_on(handle_event(&graph, &dialogs, event)), EditOutcome::Stale);

		let outcome = graph
			.borrow_mut()
			.apply_edge_edit(DOG_CAT, EdgeFormResult::NoRelation);
		assert_eq!(outcome, EditOutcome::Stale);

		let outcome = graph
			.borrow_mut()
			.apply_node_edit("unicorn", Attributes::new());
		assert_eq!(outcome, EditOutcome::Stale);
	}

	#[test]
	fn edit_loop_dispatches_every_double_click() {
		let graph = Rc::new(controller());
		let events = graph.borrow_mut().port_mut().subscribe();
		let dialogs = ScriptedDialogs::default()
			.answer_edge(DialogOutcome::Submitted(EdgeFormResult::NoRelation))
			.answer_node(DialogOutcome::Cancelled);

		let mut pool = LocalPool::new();
		let spawner = pool.spawner();
		let task_spawner = spawner.clone();
		spawner
			.spawn_local(run_edit_loop(graph.clone(), dialogs.clone(), events, move |task| {
				task_spawner.spawn_local(task).unwrap();
			}))
			.unwrap();

		{
			let mut guard = graph.borrow_mut();
			let port = guard.port_mut();
			let (x, y) = port.screen_position(DOG_CAT).unwrap();
			assert!(port.double_click_at(x, y).is_some());
			let (x, y) = port.screen_position("animal").unwrap();
			assert!(port.double_click_at(x, y).is_some());
		}
		pool.run_until_stalled();

		assert!(graph.borrow().port().by_id(DOG_CAT).is_empty());
		assert_eq!(dialogs.edge_forms.borrow().len(), 1);
		assert_eq!(dialogs.node_forms.borrow()[0].id, "animal");
	}
}
