use crate::graph::LayoutConfig;

pub const DEFAULT_ONTOLOGY_URL: &str = "/assets/ontology.json";

#[derive(Clone, Debug, PartialEq)]
pub struct HighlightConfig {
	/// Class toggled on search matches.
	pub class: String,
	pub period_secs: f64,
}

impl Default for HighlightConfig {
	fn default() -> Self {
		Self {
			class: "marker".into(),
			period_secs: 1.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	pub ontology_url: String,
	pub layout: LayoutConfig,
	pub highlight: HighlightConfig,
	/// Camera padding around search matches, in pixels.
	pub search_padding: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			ontology_url: DEFAULT_ONTOLOGY_URL.into(),
			layout: LayoutConfig::default(),
			highlight: HighlightConfig::default(),
			search_padding: 200.0,
		}
	}
}

impl GraphConfig {
	/// Points the loader somewhere else, ignoring blank overrides.
	pub fn with_ontology_url(mut self, url: Option<String>) -> Self {
		if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
			self.ontology_url = url;
		}
		self
	}
}
