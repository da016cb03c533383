use std::str::FromStr;

use log::info;

use super::controller::GraphController;
use super::element::ElementSet;
use super::port::GraphPort;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
	Id,
	Label,
}

impl SearchMode {
	pub fn as_str(self) -> &'static str {
		match self {
			SearchMode::Id => "id",
			SearchMode::Label => "label",
		}
	}
}

impl FromStr for SearchMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"id" => Ok(SearchMode::Id),
			"label" => Ok(SearchMode::Label),
			other => Err(format!("unknown search mode `{other}`")),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
	/// The query was blank; nothing was looked up.
	Skipped,
	NotFound,
	Found(usize),
}

/// Elements matching `query`, which must already be trimmed.
///
/// Label search compares whole labels ignoring case and only looks at nodes.
pub fn resolve<P: GraphPort>(port: &P, mode: SearchMode, query: &str) -> ElementSet {
	match mode {
		SearchMode::Id => port.by_id(query),
		SearchMode::Label => {
			let needle = query.to_lowercase();
			port.by_label(&|label: &str| label.to_lowercase() == needle)
		}
	}
}

impl<P: GraphPort> GraphController<P> {
	pub fn search(&mut self, mode: SearchMode, query: &str) -> SearchOutcome {
		self.stop_highlight();

		let query = query.trim();
		if query.is_empty() {
			return SearchOutcome::Skipped;
		}

		let found = resolve(self.port(), mode, query);
		if found.is_empty() {
			info!("no element found with {} `{}`", mode.as_str(), query);
			return SearchOutcome::NotFound;
		}

		info!("{} element(s) found with {} `{}`", found.len(), mode.as_str(), query);
		let padding = self.config.search_padding;
		let port = self.port_mut();
		port.center(&found);
		port.fit(&found, padding);
		let count = found.len();
		self.start_highlight(found);
		SearchOutcome::Found(count)
	}
}
