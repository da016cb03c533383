use log::{info, warn};

use super::element::GraphElement;
use super::highlight::Highlighter;
use super::port::{GraphPort, RenderSummary};
use super::style::StyleSheet;
use crate::config::GraphConfig;

/// Owns the rendering port handle and the single highlight session.
pub struct GraphController<P> {
	port: P,
	highlight: Highlighter,
	pub(super) config: GraphConfig,
}

impl<P: GraphPort> GraphController<P> {
	pub fn new(port: P, config: GraphConfig) -> Self {
		let highlight = Highlighter::new(config.highlight.class.clone(), config.highlight.period_secs);
		Self {
			port,
			highlight,
			config,
		}
	}

	/// Initial draw of a freshly transformed ontology.
	pub fn load(&mut self, elements: Vec<GraphElement>) -> RenderSummary {
		self.highlight.stop(&mut self.port);
		let styles = StyleSheet::ontology(&self.config.highlight.class);
		let summary = self.port.render(elements, styles, self.config.layout.clone());
		for rejection in &summary.rejected {
			warn!("element rejected: {rejection}");
		}
		info!(
			"ontology rendered: {} node(s), {} edge(s), {} rejected",
			summary.nodes,
			summary.edges,
			summary.rejected.len()
		);
		summary
	}

	/// Advances the highlight timer by one frame.
	pub fn advance(&mut self, dt: f64) {
		self.highlight.tick(&mut self.port, dt);
	}

	pub fn stop_highlight(&mut self) {
		self.highlight.stop(&mut self.port);
	}

	/// Releases the timer before the view goes away.
	pub fn teardown(&mut self) {
		self.stop_highlight();
	}

	#[cfg(test)]
	pub fn highlight(&self) -> &Highlighter {
		&self.highlight
	}

	pub(super) fn start_highlight(&mut self, targets: super::ElementSet) {
		self.highlight.start(&mut self.port, targets);
	}

	pub fn port(&self) -> &P {
		&self.port
	}

	pub fn port_mut(&mut self) -> &mut P {
		&mut self.port
	}
}
