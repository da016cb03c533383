use super::{GraphElement, GraphPort, LayoutConfig, StyleSheet};
use crate::components::ontology_graph::GraphCanvasState;
use crate::ontology::relation_label;

fn node(id: &str, label: &str, attributes: &[(&str, &str)]) -> GraphElement {
	GraphElement::Node(super::NodeElement {
		id: id.into(),
		label: label.into(),
		attributes: attributes
			.iter()
			.map(|(key, value)| (key.to_string(), value.to_string()))
			.collect(),
	})
}

fn edge(source: &str, relation: &str, target: &str, index: usize) -> GraphElement {
	GraphElement::Edge(super::EdgeElement {
		id: format!("{source}_{relation}_{target}_{index}"),
		relation: relation.into(),
		source: source.into(),
		target: target.into(),
		label: relation_label(relation),
	})
}

/// Five classes and three relations:
///
/// - `animal` "Animal", `pet` "animal", `dog` "Dog", `cat` "cat", `dogs` "Dogs"
/// - `dog_inheritance_animal_0`, `cat_inheritance_animal_1`, `dog_disjoint_cat_2`
pub(crate) fn pets() -> Vec<GraphElement> {
	vec![
		node("animal", "Animal", &[]),
		node("pet", "animal", &[("kind", "domestic")]),
		node("dog", "Dog", &[("legs", "4"), ("sound", "woof")]),
		node("cat", "cat", &[("legs", "4")]),
		node("dogs", "Dogs", &[]),
		edge("dog", "inheritance", "animal", 0),
		edge("cat", "inheritance", "animal", 1),
		edge("dog", "disjoint", "cat", 2),
	]
}

/// Canvas engine holding [`pets`], laid out but never simulated.
pub(crate) fn pets_canvas() -> GraphCanvasState {
	let mut canvas = GraphCanvasState::new(800.0, 600.0);
	canvas.render(pets(), StyleSheet::ontology("marker"), LayoutConfig::default());
	canvas
}

/// Ids currently carrying `class`, nodes first.
pub(crate) fn marked(canvas: &GraphCanvasState, class: &str) -> Vec<String> {
	canvas.ids_with_class(class)
}
