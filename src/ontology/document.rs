use serde::Deserialize;

use crate::error::OntologyError;
use crate::graph::Attributes;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct OntologyDocument {
	pub classes: Vec<OntologyClass>,
	pub relations: Vec<OntologyRelation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OntologyClass {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub attributes: Attributes,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OntologyRelation {
	pub source: String,
	pub target: String,
	#[serde(rename = "type")]
	pub relation: String,
}

impl OntologyDocument {
	pub fn from_json(text: &str) -> Result<Self, OntologyError> {
		Ok(serde_json::from_str(text)?)
	}
}
