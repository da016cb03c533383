use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::transform::transform_json;
use crate::error::LoadError;
use crate::graph::GraphElement;

/// One-shot `GET` of the ontology document, returned as graph elements.
pub async fn fetch_elements(url: &str) -> Result<Vec<GraphElement>, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(LoadError::network)?
		.dyn_into()
		.map_err(LoadError::network)?;
	if !response.ok() {
		return Err(LoadError::Status(response.status()));
	}
	let body = JsFuture::from(response.text().map_err(LoadError::network)?)
		.await
		.map_err(LoadError::network)?;
	let text = body.as_string().ok_or(LoadError::Body)?;
	Ok(transform_json(&text)?)
}
