use thiserror::Error;

/// The ontology document does not have the expected shape.
#[derive(Debug, Error)]
pub enum OntologyError {
	#[error("malformed ontology: {0}")]
	Malformed(#[from] serde_json::Error),
}

/// Failure to obtain the ontology at startup.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("no browser window available")]
	NoWindow,
	#[error("request failed: {0}")]
	Network(String),
	#[error("server answered with status {0}")]
	Status(u16),
	#[error("response body is not text")]
	Body,
	#[error(transparent)]
	Ontology(#[from] OntologyError),
}

impl LoadError {
	pub(crate) fn network(value: wasm_bindgen::JsValue) -> Self {
		LoadError::Network(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
