use futures::channel::mpsc::{self, UnboundedReceiver};
use log::warn;

use super::state::GraphCanvasState;
use crate::graph::{
	ElementPatch, ElementSet, GraphElement, GraphEvent, GraphPort, LayoutConfig, RenderSummary,
	StyleSheet,
};

impl GraphPort for GraphCanvasState {
	fn render(&mut self, elements: Vec<GraphElement>, styles: StyleSheet, layout: LayoutConfig) -> RenderSummary {
		self.styles = styles;
		self.layout = layout;

		let (mut nodes, mut edges) = (Vec::new(), Vec::new());
		for element in elements {
			match element {
				GraphElement::Node(node) => nodes.push(node),
				GraphElement::Edge(edge) => edges.push(edge),
			}
		}
		let rejected = self.reset_with(nodes, edges);

		self.settle_remaining = None;
		if self.layout.fit {
			self.fit_all();
			self.settle_remaining = Some(self.layout.settle_secs);
		}

		RenderSummary {
			nodes: self.nodes.len(),
			edges: self.edges.len(),
			rejected,
		}
	}

	fn by_id(&self, id: &str) -> ElementSet {
		let mut found = ElementSet::new();
		if self.contains(id) {
			found.insert(id);
		}
		found
	}

	fn by_label(&self, predicate: &dyn Fn(&str) -> bool) -> ElementSet {
		self.nodes
			.iter()
			.filter(|slot| predicate(&slot.element.label))
			.map(|slot| slot.element.id.clone())
			.collect()
	}

	fn element(&self, id: &str) -> Option<GraphElement> {
		self.node(id)
			.map(|slot| GraphElement::Node(slot.element.clone()))
			.or_else(|| self.edge(id).map(|slot| GraphElement::Edge(slot.element.clone())))
	}

	fn elements(&self) -> Vec<GraphElement> {
		let nodes = self.nodes.iter().map(|slot| GraphElement::Node(slot.element.clone()));
		let edges = self.edges.iter().map(|slot| GraphElement::Edge(slot.element.clone()));
		nodes.chain(edges).collect()
	}

	fn all(&self) -> ElementSet {
		let nodes = self.nodes.iter().map(|slot| slot.element.id.clone());
		let edges = self.edges.iter().map(|slot| slot.element.id.clone());
		nodes.chain(edges).collect()
	}

	fn center(&mut self, set: &ElementSet) {
		if let Some(bounds) = self.bounds(set) {
			self.settle_remaining = None;
			self.center_on(bounds);
		}
	}

	fn fit(&mut self, set: &ElementSet, padding: f64) {
		if let Some(bounds) = self.bounds(set) {
			self.settle_remaining = None;
			self.frame(bounds, padding);
		}
	}

	fn begin_batch(&mut self) {
		self.batch_depth += 1;
	}

	fn end_batch(&mut self) {
		self.batch_depth = self.batch_depth.saturating_sub(1);
		if self.batch_depth == 0 && self.restyle_pending {
			self.restyle_all();
		}
	}

	fn set_class(&mut self, set: &ElementSet, class: &str, on: bool) {
		for id in set.iter() {
			if self.toggle_class(id, class, on) && self.batch_depth > 0 {
				self.restyle_pending = true;
			}
		}
	}

	fn refresh_style(&mut self) {
		self.restyle_all();
	}

	fn update_data(&mut self, id: &str, patch: ElementPatch) -> bool {
		match patch {
			ElementPatch::Attributes(attributes) => {
				match self.nodes.iter_mut().find(|slot| slot.element.id == id) {
					Some(slot) => {
						slot.element.attributes = attributes;
						true
					}
					None => {
						if self.edge(id).is_some() {
							warn!("attributes patch sent to edge `{id}`");
						}
						false
					}
				}
			}
			ElementPatch::Relation { relation, label } => {
				match self.edges.iter_mut().find(|slot| slot.element.id == id) {
					Some(slot) => {
						slot.element.relation = relation;
						slot.element.label = label;
						slot.restyle(&self.styles);
						true
					}
					None => {
						if self.node(id).is_some() {
							warn!("relation patch sent to node `{id}`");
						}
						false
					}
				}
			}
		}
	}

	fn remove(&mut self, id: &str) -> bool {
		if let Some(pos) = self.nodes.iter().position(|slot| slot.element.id == id) {
			let removed = self.nodes.remove(pos);
			self.edges
				.retain(|edge| edge.source != removed.idx && edge.target != removed.idx);
		} else if let Some(pos) = self.edges.iter().position(|slot| slot.element.id == id) {
			self.edges.remove(pos);
		} else {
			return false;
		}
		self.rebuild_simulation();
		true
	}

	fn subscribe(&mut self) -> UnboundedReceiver<GraphEvent> {
		let (sender, receiver) = mpsc::unbounded();
		self.subscribers.push(sender);
		receiver
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::testing::{pets, pets_canvas};
	use crate::graph::{EdgeElement, NodeElement, RejectReason, Rejection};

	fn set(ids: &[&str]) -> ElementSet {
		ids.iter().copied().collect()
	}

	#[test]
	fn render_counts_and_keeps_element_order() {
		let canvas = pets_canvas();
		assert_eq!(canvas.elements(), pets());
		assert_eq!(canvas.all().len(), 8);
	}

	#[test]
	fn dangling_edges_are_rejected_one_by_one() {
		let mut elements = pets();
		elements.push(GraphElement::Edge(EdgeElement {
			id: "dog_partOf_pack_3".into(),
			relation: "partOf".into(),
			source: "dog".into(),
			target: "pack".into(),
			label: "partOf".into(),
		}));
		let mut canvas = GraphCanvasState::new(800.0, 600.0);
		let summary = canvas.render(elements, StyleSheet::ontology("marker"), LayoutConfig::default());

		assert_eq!(summary.nodes, 5);
		assert_eq!(summary.edges, 3);
		assert_eq!(
			summary.rejected,
			vec![Rejection {
				id: "dog_partOf_pack_3".into(),
				reason: RejectReason::DanglingEndpoint("pack".into()),
			}]
		);
		assert!(canvas.by_id("dog_partOf_pack_3").is_empty());
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let mut elements = pets();
		elements.insert(
			1,
			GraphElement::Node(NodeElement {
				id: "animal".into(),
				label: "Again".into(),
				attributes: Default::default(),
			}),
		);
		let mut canvas = GraphCanvasState::new(800.0, 600.0);
		let summary = canvas.render(elements, StyleSheet::default(), LayoutConfig::default());
		assert_eq!(summary.nodes, 5);
		assert_eq!(summary.rejected[0].reason, RejectReason::DuplicateId);
		assert_eq!(canvas.node("animal").map(|slot| slot.element.label.as_str()), Some("Animal"));
	}

	#[test]
	fn removed_edge_is_gone_from_every_query() {
		let mut canvas = pets_canvas();
		assert!(canvas.remove("dog_disjoint_cat_2"));
		assert!(canvas.by_id("dog_disjoint_cat_2").is_empty());
		assert!(canvas.element("dog_disjoint_cat_2").is_none());
		assert_eq!(canvas.all().len(), 7);
		assert!(!canvas.remove("dog_disjoint_cat_2"));
	}

	#[test]
	fn removing_a_node_takes_its_edges_along_and_keeps_positions() {
		let mut canvas = pets_canvas();
		let before = canvas.screen_position("cat").unwrap();
		assert!(canvas.remove("dog"));
		assert!(canvas.by_id("dog_inheritance_animal_0").is_empty());
		assert!(canvas.by_id("dog_disjoint_cat_2").is_empty());
		assert_eq!(canvas.by_id("cat_inheritance_animal_1").len(), 1);
		assert_eq!(canvas.screen_position("cat").unwrap(), before);
	}

	#[test]
	fn operations_on_stale_ids_are_no_ops() {
		let mut canvas = pets_canvas();
		let before = canvas.transform.clone();
		let ghost = set(&["ghost"]);
		canvas.center(&ghost);
		canvas.fit(&ghost, 200.0);
		canvas.set_class(&ghost, "marker", true);
		assert_eq!(canvas.transform, before);
		assert!(!canvas.update_data("ghost", ElementPatch::Attributes(Default::default())));
		assert!(!canvas.remove("ghost"));
	}

	#[test]
	fn patches_must_match_the_element_kind() {
		let mut canvas = pets_canvas();
		assert!(!canvas.update_data("dog_disjoint_cat_2", ElementPatch::Attributes(Default::default())));
		assert!(!canvas.update_data(
			"dog",
			ElementPatch::Relation {
				relation: "x".into(),
				label: "x".into()
			}
		));
	}

	#[test]
	fn relation_patch_restyles_the_edge() {
		let mut canvas = pets_canvas();
		assert!(canvas.style_of("dog_disjoint_cat_2").unwrap().dashed);
		canvas.update_data(
			"dog_disjoint_cat_2",
			ElementPatch::Relation {
				relation: "equivalence".into(),
				label: "≡".into(),
			},
		);
		let style = canvas.style_of("dog_disjoint_cat_2").unwrap();
		assert!(!style.dashed);
		assert!(style.source_arrow && style.target_arrow);
	}

	#[test]
	fn batched_class_changes_restyle_once_the_batch_ends() {
		let mut canvas = pets_canvas();
		canvas.begin_batch();
		canvas.set_class(&set(&["dog"]), "marker", true);
		assert_eq!(canvas.style_of("dog").unwrap().fill, "#ffffff");
		canvas.end_batch();
		assert_eq!(canvas.style_of("dog").unwrap().fill, "yellow");

		canvas.set_class(&set(&["dog"]), "marker", false);
		assert_eq!(canvas.style_of("dog").unwrap().fill, "#ffffff");
	}

	#[test]
	fn fit_frames_the_requested_elements() {
		let mut canvas = pets_canvas();
		canvas.fit(&set(&["cat"]), 200.0);
		let (x, y) = canvas.screen_position("cat").unwrap();
		assert!((x - 400.0).abs() < 1e-6 && (y - 300.0).abs() < 1e-6);
	}

	#[test]
	fn double_click_reaches_subscribers() {
		let mut canvas = pets_canvas();
		let mut events = canvas.subscribe();
		let (x, y) = canvas.screen_position("dog_disjoint_cat_2").unwrap();
		let clicked = canvas.double_click_at(x, y);

		let expected = canvas.element("dog_disjoint_cat_2");
		assert_eq!(clicked, expected);
		assert_eq!(
			events.try_next().unwrap(),
			Some(GraphEvent::DoubleClick(expected.unwrap()))
		);
	}

	#[test]
	fn every_tick_moves_the_layout() {
		let mut canvas = pets_canvas();
		let before = canvas.screen_position("animal").unwrap();
		canvas.tick(0.05);
		assert_ne!(canvas.screen_position("animal").unwrap(), before);
	}

	#[test]
	fn double_click_on_empty_space_emits_nothing() {
		let mut canvas = pets_canvas();
		let mut events = canvas.subscribe();
		assert!(canvas.double_click_at(-10_000.0, -10_000.0).is_none());
		assert!(events.try_next().is_err());
	}
}
