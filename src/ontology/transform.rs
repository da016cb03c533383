use super::document::OntologyDocument;
use crate::error::OntologyError;
use crate::graph::{EdgeElement, GraphElement, NodeElement};

/// Label shown for a relation whose type is blank.
const UNTYPED_LABEL: &str = "related";

/// Display text of a relation type. Used both when the ontology is loaded and
/// when an edge is edited, so the two never disagree.
pub fn relation_label(relation: &str) -> String {
	match relation {
		"inheritance" => "inherits".into(),
		"equivalence" => "≡".into(),
		"disjoint" => "disjoint".into(),
		other if other.trim().is_empty() => UNTYPED_LABEL.into(),
		other => other.into(),
	}
}

/// Flattens an ontology into graph elements: every class as a node, in input
/// order, followed by every relation as an edge, in input order.
pub fn transform(doc: &OntologyDocument) -> Vec<GraphElement> {
	let nodes = doc.classes.iter().map(|class| {
		GraphElement::Node(NodeElement {
			id: class.id.clone(),
			label: class.label.clone(),
			attributes: class.attributes.clone(),
		})
	});

	// The index keeps ids unique when the same triple appears twice.
	let edges = doc.relations.iter().enumerate().map(|(index, rel)| {
		GraphElement::Edge(EdgeElement {
			id: format!("{}_{}_{}_{}", rel.source, rel.relation, rel.target, index),
			relation: rel.relation.clone(),
			source: rel.source.clone(),
			target: rel.target.clone(),
			label: relation_label(&rel.relation),
		})
	});

	nodes.chain(edges).collect()
}

pub fn transform_json(text: &str) -> Result<Vec<GraphElement>, OntologyError> {
	Ok(transform(&OntologyDocument::from_json(text)?))
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::graph::ElementKind;

	#[test]
	fn two_classes_and_one_inheritance() {
		let elements = transform_json(
			r#"{
				"classes": [{"id": "A", "label": "A"}, {"id": "B", "label": "B"}],
				"relations": [{"source": "A", "target": "B", "type": "inheritance"}]
			}"#,
		)
		.unwrap();

		let ids: Vec<_> = elements.iter().map(GraphElement::id).collect();
		assert_eq!(ids, vec!["A", "B", "A_inheritance_B_0"]);
		let GraphElement::Edge(edge) = &elements[2] else {
			panic!("expected an edge, got {:?}", elements[2]);
		};
		assert_eq!(edge.label, "inherits");
		assert_eq!(edge.source, "A");
		assert_eq!(edge.target, "B");
	}

	#[test]
	fn counts_match_and_edge_ids_are_unique_for_repeated_triples() {
		let elements = transform_json(
			r#"{
				"classes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
				"relations": [
					{"source": "A", "target": "B", "type": "partOf"},
					{"source": "A", "target": "B", "type": "partOf"},
					{"source": "B", "target": "C", "type": "disjoint"},
					{"source": "A", "target": "B", "type": "partOf"}
				]
			}"#,
		)
		.unwrap();

		let nodes = elements.iter().filter(|e| e.kind() == ElementKind::Node).count();
		let edges: Vec<_> = elements
			.iter()
			.filter(|e| e.kind() == ElementKind::Edge)
			.map(GraphElement::id)
			.collect();
		assert_eq!(nodes, 3);
		assert_eq!(edges.len(), 4);
		assert_eq!(edges.iter().collect::<HashSet<_>>().len(), 4);
		assert_eq!(edges[3], "A_partOf_B_3");
	}

	#[test]
	fn nodes_come_first_in_input_order() {
		let elements = transform_json(
			r#"{
				"classes": [{"id": "Z"}, {"id": "M"}],
				"relations": [{"source": "Z", "target": "M", "type": "x"}]
			}"#,
		)
		.unwrap();
		let kinds: Vec<_> = elements.iter().map(GraphElement::kind).collect();
		assert_eq!(kinds, vec![ElementKind::Node, ElementKind::Node, ElementKind::Edge]);
		assert_eq!(elements[0].id(), "Z");
	}

	#[test]
	fn relation_labels() {
		assert_eq!(relation_label("inheritance"), "inherits");
		assert_eq!(relation_label("equivalence"), "≡");
		assert_eq!(relation_label("disjoint"), "disjoint");
		assert_eq!(relation_label("custom"), "custom");
		assert_eq!(relation_label("  "), UNTYPED_LABEL);
	}

	#[test]
	fn attributes_pass_through_untouched() {
		let elements = transform_json(
			r#"{
				"classes": [{"id": "Dog", "label": "Dog", "attributes": {"legs": "4", "sound": "woof"}}],
				"relations": []
			}"#,
		)
		.unwrap();
		let GraphElement::Node(node) = &elements[0] else {
			panic!("expected a node");
		};
		assert_eq!(node.attributes.get("legs").map(String::as_str), Some("4"));
		assert_eq!(node.attributes.len(), 2);
	}

	#[test]
	fn missing_arrays_are_malformed() {
		let err = transform_json(r#"{"classes": []}"#).unwrap_err();
		assert!(matches!(err, OntologyError::Malformed(_)));
		assert!(err.to_string().contains("relations"));

		assert!(transform_json(r#"{"relations": []}"#).is_err());
		assert!(transform_json(r#"{"classes": {}, "relations": []}"#).is_err());
		assert!(transform_json("not json").is_err());
	}
}
