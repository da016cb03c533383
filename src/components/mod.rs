pub mod dialog;
pub mod ontology_graph;
