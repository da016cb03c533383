//! Ontology document loading and its conversion into graph elements.

mod document;
mod fetch;
mod transform;

pub use fetch::fetch_elements;
pub use transform::relation_label;
#[cfg(test)]
pub(crate) use transform::transform_json;
