//! Contract between the graph controller and whatever draws the graph.
//!
//! After the initial `render`, the port owns the element graph; the controller
//! reads and writes it only through these operations. Every operation is
//! total over stale ids: lookups come back empty and mutations report `false`.

use futures::channel::mpsc::UnboundedReceiver;

use super::element::{ElementPatch, ElementSet, GraphElement};
use super::style::StyleSheet;

/// Force-directed layout parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub node_repulsion: f64,
	pub ideal_edge_length: f64,
	pub gravity: f64,
	/// Fit the whole graph into the container once it is laid out.
	pub fit: bool,
	pub fit_padding: f64,
	/// Seconds of simulation before the final fit.
	pub settle_secs: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			node_repulsion: 10_000.0,
			ideal_edge_length: 200.0,
			gravity: 0.25,
			fit: true,
			fit_padding: 30.0,
			settle_secs: 1.5,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
	DuplicateId,
	/// The edge names an endpoint that is not a node.
	DanglingEndpoint(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
	pub id: String,
	pub reason: RejectReason,
}

impl std::fmt::Display for Rejection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.reason {
			RejectReason::DuplicateId => write!(f, "{}: duplicate id", self.id),
			RejectReason::DanglingEndpoint(endpoint) => {
				write!(f, "{}: unknown endpoint `{}`", self.id, endpoint)
			}
		}
	}
}

/// Outcome of the initial draw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
	pub nodes: usize,
	pub edges: usize,
	pub rejected: Vec<Rejection>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent {
	DoubleClick(GraphElement),
}

pub trait GraphPort {
	/// Replaces the drawn graph. Elements that cannot be drawn are rejected
	/// one by one and listed in the summary.
	fn render(&mut self, elements: Vec<GraphElement>, styles: StyleSheet, layout: LayoutConfig) -> RenderSummary;

	fn by_id(&self, id: &str) -> ElementSet;

	/// Nodes whose label satisfies `predicate`.
	fn by_label(&self, predicate: &dyn Fn(&str) -> bool) -> ElementSet;

	fn element(&self, id: &str) -> Option<GraphElement>;

	/// Current elements, nodes first.
	fn elements(&self) -> Vec<GraphElement>;

	fn all(&self) -> ElementSet;

	fn center(&mut self, set: &ElementSet);

	fn fit(&mut self, set: &ElementSet, padding: f64);

	fn begin_batch(&mut self);

	fn end_batch(&mut self);

	/// Runs `f` inside one batch so its class toggles restyle once.
	fn batch(&mut self, f: impl FnOnce(&mut Self))
	where
		Self: Sized,
	{
		self.begin_batch();
		f(self);
		self.end_batch();
	}

	fn set_class(&mut self, set: &ElementSet, class: &str, on: bool);

	/// Recomputes every element's style, batched or not.
	fn refresh_style(&mut self);

	fn update_data(&mut self, id: &str, patch: ElementPatch) -> bool;

	fn remove(&mut self, id: &str) -> bool;

	fn subscribe(&mut self) -> UnboundedReceiver<GraphEvent>;
}
