use std::collections::{BTreeSet, HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use futures::channel::mpsc::UnboundedSender;

use super::layout::{self, Bounds, NODE_MASS};
use crate::graph::{
	EdgeElement, ElementKind, ElementSet, GraphElement, GraphEvent, LayoutConfig, NodeElement,
	RejectReason, Rejection, ResolvedStyle, StyleSheet,
};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
/// Click tolerance around an edge line, in screen pixels.
const EDGE_HIT_TOLERANCE: f64 = 6.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NodePosition {
	pub x: f64,
	pub y: f64,
	pub anchored: bool,
}

pub struct NodeSlot {
	pub element: NodeElement,
	pub idx: DefaultNodeIdx,
	pub classes: BTreeSet<String>,
	pub style: ResolvedStyle,
	pub lines: Vec<String>,
	pub width: f64,
	pub height: f64,
}

impl NodeSlot {
	fn new(element: NodeElement, idx: DefaultNodeIdx, styles: &StyleSheet) -> Self {
		let lines = layout::wrap_label(&element.label);
		let (width, height) = layout::node_size(&lines);
		let classes = BTreeSet::new();
		let style = styles.resolve(ElementKind::Node, &element.label, &classes);
		Self {
			element,
			idx,
			classes,
			style,
			lines,
			width,
			height,
		}
	}

	fn restyle(&mut self, styles: &StyleSheet) {
		self.style = styles.resolve(ElementKind::Node, &self.element.label, &self.classes);
	}

	fn contains(&self, position: &NodePosition, gx: f64, gy: f64) -> bool {
		(gx - position.x).abs() <= self.width / 2.0 && (gy - position.y).abs() <= self.height / 2.0
	}
}

pub struct EdgeSlot {
	pub element: EdgeElement,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub classes: BTreeSet<String>,
	pub style: ResolvedStyle,
}

impl EdgeSlot {
	fn new(element: EdgeElement, source: DefaultNodeIdx, target: DefaultNodeIdx, styles: &StyleSheet) -> Self {
		let classes = BTreeSet::new();
		let style = styles.resolve(ElementKind::Edge, &element.label, &classes);
		Self {
			element,
			source,
			target,
			classes,
			style,
		}
	}

	pub(super) fn restyle(&mut self, styles: &StyleSheet) {
		self.style = styles.resolve(ElementKind::Edge, &self.element.label, &self.classes);
	}
}

/// Canvas-side graph: the force simulation, the element data drawn on top of
/// it, and the view.
pub struct GraphCanvasState {
	pub(super) graph: ForceGraph<(), ()>,
	pub(super) nodes: Vec<NodeSlot>,
	pub(super) edges: Vec<EdgeSlot>,
	pub(super) styles: StyleSheet,
	pub(super) layout: LayoutConfig,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub(super) batch_depth: usize,
	pub(super) restyle_pending: bool,
	/// Seconds left before the layout is fitted once more.
	pub(super) settle_remaining: Option<f64>,
	pub(super) subscribers: Vec<UnboundedSender<GraphEvent>>,
}

impl GraphCanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		let layout = LayoutConfig::default();
		Self {
			graph: ForceGraph::new(layout::simulation(&layout)),
			nodes: Vec::new(),
			edges: Vec::new(),
			styles: StyleSheet::default(),
			layout,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			batch_depth: 0,
			restyle_pending: false,
			settle_remaining: None,
			subscribers: Vec::new(),
		}
	}

	/// Drops every element and lays out the given ones from scratch. Returns
	/// the elements that could not be placed.
	pub(super) fn reset_with(&mut self, nodes: Vec<NodeElement>, edges: Vec<EdgeElement>) -> Vec<Rejection> {
		self.graph = ForceGraph::new(layout::simulation(&self.layout));
		self.nodes.clear();
		self.edges.clear();
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover = HoverState::default();

		let mut rejected = Vec::new();
		let count = nodes.len();
		for (i, node) in nodes.into_iter().enumerate() {
			if self.contains(&node.id) {
				rejected.push(Rejection {
					id: node.id,
					reason: RejectReason::DuplicateId,
				});
				continue;
			}
			let (x, y) = layout::initial_position(i, count, &self.layout);
			let idx = self.graph.add_node(NodeData {
				x,
				y,
				mass: NODE_MASS,
				is_anchor: false,
				user_data: (),
			});
			self.nodes.push(NodeSlot::new(node, idx, &self.styles));
		}

		for edge in edges {
			if self.contains(&edge.id) {
				rejected.push(Rejection {
					id: edge.id,
					reason: RejectReason::DuplicateId,
				});
				continue;
			}
			let (source, target) = match (self.node_idx(&edge.source), self.node_idx(&edge.target)) {
				(Some(source), Some(target)) => (source, target),
				(None, _) => {
					rejected.push(Rejection {
						id: edge.id,
						reason: RejectReason::DanglingEndpoint(edge.source),
					});
					continue;
				}
				(_, None) => {
					rejected.push(Rejection {
						id: edge.id,
						reason: RejectReason::DanglingEndpoint(edge.target),
					});
					continue;
				}
			};
			self.graph.add_edge(source, target, EdgeData::default());
			self.edges.push(EdgeSlot::new(edge, source, target, &self.styles));
		}
		rejected
	}

	/// Rebuilds the simulation after a removal, keeping every surviving node
	/// where it is.
	pub(super) fn rebuild_simulation(&mut self) {
		let positions = self.positions();
		let mut graph = ForceGraph::new(layout::simulation(&self.layout));
		let mut remap = HashMap::with_capacity(self.nodes.len());
		for slot in &mut self.nodes {
			let position = positions.get(&slot.idx).copied().unwrap_or_default();
			let idx = graph.add_node(NodeData {
				x: position.x as f32,
				y: position.y as f32,
				mass: NODE_MASS,
				is_anchor: position.anchored,
				user_data: (),
			});
			remap.insert(slot.idx, idx);
			slot.idx = idx;
		}
		for slot in &mut self.edges {
			if let (Some(&source), Some(&target)) = (remap.get(&slot.source), remap.get(&slot.target)) {
				slot.source = source;
				slot.target = target;
				graph.add_edge(source, target, EdgeData::default());
			}
		}
		self.graph = graph;
		self.drag = DragState::default();
		self.hover = HoverState::default();
	}

	pub(super) fn contains(&self, id: &str) -> bool {
		self.node(id).is_some() || self.edge(id).is_some()
	}

	pub(super) fn node(&self, id: &str) -> Option<&NodeSlot> {
		self.nodes.iter().find(|slot| slot.element.id == id)
	}

	pub(super) fn edge(&self, id: &str) -> Option<&EdgeSlot> {
		self.edges.iter().find(|slot| slot.element.id == id)
	}

	fn node_idx(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.node(id).map(|slot| slot.idx)
	}

	pub(super) fn restyle_all(&mut self) {
		for slot in &mut self.nodes {
			slot.restyle(&self.styles);
		}
		for slot in &mut self.edges {
			slot.restyle(&self.styles);
		}
		self.restyle_pending = false;
	}

	/// Adds or removes `class` on one element. Returns whether it changed.
	pub(super) fn toggle_class(&mut self, id: &str, class: &str, on: bool) -> bool {
		let restyle_now = self.batch_depth == 0;
		if let Some(slot) = self.nodes.iter_mut().find(|slot| slot.element.id == id) {
			let changed = if on {
				slot.classes.insert(class.to_string())
			} else {
				slot.classes.remove(class)
			};
			if changed && restyle_now {
				slot.restyle(&self.styles);
			}
			return changed;
		}
		if let Some(slot) = self.edges.iter_mut().find(|slot| slot.element.id == id) {
			let changed = if on {
				slot.classes.insert(class.to_string())
			} else {
				slot.classes.remove(class)
			};
			if changed && restyle_now {
				slot.restyle(&self.styles);
			}
			return changed;
		}
		false
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, NodePosition> {
		let mut positions = HashMap::with_capacity(self.nodes.len());
		self.graph.visit_nodes(|node| {
			positions.insert(
				node.index(),
				NodePosition {
					x: node.x() as f64,
					y: node.y() as f64,
					anchored: node.data.is_anchor,
				},
			);
		});
		positions
	}

	/// Box around every node in `set`; an edge counts as its two endpoints.
	pub(super) fn bounds(&self, set: &ElementSet) -> Option<Bounds> {
		let positions = self.positions();
		let mut bounds: Option<Bounds> = None;
		let mut include = |slot: &NodeSlot| {
			if let Some(p) = positions.get(&slot.idx) {
				let around = Bounds::around(p.x, p.y, slot.width / 2.0, slot.height / 2.0);
				bounds = Some(bounds.map_or(around, |acc| acc.union(around)));
			}
		};
		for id in set.iter() {
			if let Some(slot) = self.node(id) {
				include(slot);
			} else if let Some(edge) = self.edge(id) {
				for idx in [edge.source, edge.target] {
					if let Some(slot) = self.nodes.iter().find(|slot| slot.idx == idx) {
						include(slot);
					}
				}
			}
		}
		bounds
	}

	pub(super) fn center_on(&mut self, bounds: Bounds) {
		let (cx, cy) = bounds.center();
		self.transform.x = self.width / 2.0 - cx * self.transform.k;
		self.transform.y = self.height / 2.0 - cy * self.transform.k;
	}

	pub(super) fn frame(&mut self, bounds: Bounds, padding: f64) {
		let (w, h) = (bounds.width().max(1.0), bounds.height().max(1.0));
		let k = ((self.width - 2.0 * padding) / w).min((self.height - 2.0 * padding) / h);
		self.transform.k = k.clamp(MIN_ZOOM, MAX_ZOOM);
		self.center_on(bounds);
	}

	pub(super) fn fit_all(&mut self) {
		let everything: ElementSet = self.nodes.iter().map(|slot| slot.element.id.clone()).collect();
		if let Some(bounds) = self.bounds(&everything) {
			self.frame(bounds, self.layout.fit_padding);
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.positions();
		// Later nodes are drawn on top, so they win.
		self.nodes
			.iter()
			.rev()
			.find(|slot| positions.get(&slot.idx).is_some_and(|p| slot.contains(p, gx, gy)))
			.map(|slot| slot.idx)
	}

	/// Closest edge within the click tolerance of a screen point.
	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<&EdgeSlot> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let tolerance = EDGE_HIT_TOLERANCE / self.transform.k;
		let positions = self.positions();
		self.edges
			.iter()
			.filter_map(|slot| {
				let (a, b) = (positions.get(&slot.source)?, positions.get(&slot.target)?);
				let distance = layout::segment_distance(gx, gy, (a.x, a.y), (b.x, b.y));
				(distance <= tolerance).then_some((slot, distance))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(slot, _)| slot)
	}

	/// Resolves a double-click at a screen point and tells every subscriber.
	pub fn double_click_at(&mut self, sx: f64, sy: f64) -> Option<GraphElement> {
		let element = match self.node_at_position(sx, sy) {
			Some(idx) => self
				.nodes
				.iter()
				.find(|slot| slot.idx == idx)
				.map(|slot| GraphElement::Node(slot.element.clone())),
			None => self
				.edge_at_position(sx, sy)
				.map(|slot| GraphElement::Edge(slot.element.clone())),
		}?;
		let event = GraphEvent::DoubleClick(element.clone());
		self.subscribers
			.retain(|subscriber| subscriber.unbounded_send(event.clone()).is_ok());
		Some(element)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.settle_remaining = None;
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag.active = true;
			self.drag.node_idx = Some(idx);
			self.drag.start_x = x;
			self.drag.start_y = y;
			let drag = &mut self.drag;
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					drag.node_start_x = node.x();
					drag.node_start_y = node.y();
				}
			});
		} else {
			self.pan.active = true;
			self.pan.start_x = x;
			self.pan.start_y = y;
			self.pan.transform_start_x = self.transform.x;
			self.pan.transform_start_y = self.transform.y;
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		// Update hover state when not dragging
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.transform.k,
					(y - self.drag.start_y) / self.transform.k,
				);
				let (nx, ny) = (
					self.drag.node_start_x + dx as f32,
					self.drag.node_start_y + dy as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	pub fn pointer_up(&mut self) {
		self.drag.active = false;
		self.drag.node_idx = None;
		self.pan.active = false;
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.set_hover(None);
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		self.settle_remaining = None;
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.apply_gravity(dt);

		if let Some(remaining) = self.settle_remaining {
			let remaining = remaining - dt as f64;
			if remaining <= 0.0 {
				self.settle_remaining = None;
				self.fit_all();
			} else {
				self.settle_remaining = Some(remaining);
			}
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	/// Pulls free nodes towards the origin so loose components stay close.
	fn apply_gravity(&mut self, dt: f32) {
		let pull = (self.layout.gravity as f32 * dt).clamp(0.0, 1.0);
		if pull == 0.0 {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x -= node.data.x * pull;
				node.data.y -= node.data.y * pull;
			}
		});
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Re-frames the whole graph while the initial layout is still settling.
	pub fn refit(&mut self) {
		if self.settle_remaining.is_some() {
			self.fit_all();
		}
	}
}

#[cfg(test)]
impl GraphCanvasState {
	pub(crate) fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	pub(crate) fn ids_with_class(&self, class: &str) -> Vec<String> {
		let nodes = self.nodes.iter().filter(|slot| slot.classes.contains(class)).map(|slot| &slot.element.id);
		let edges = self.edges.iter().filter(|slot| slot.classes.contains(class)).map(|slot| &slot.element.id);
		nodes.chain(edges).cloned().collect()
	}

	pub(crate) fn style_of(&self, id: &str) -> Option<&ResolvedStyle> {
		self.node(id)
			.map(|slot| &slot.style)
			.or_else(|| self.edge(id).map(|slot| &slot.style))
	}

	/// Where an element sits on screen: a node's centre or an edge's midpoint.
	pub(crate) fn screen_position(&self, id: &str) -> Option<(f64, f64)> {
		let positions = self.positions();
		let (gx, gy) = if let Some(slot) = self.node(id) {
			let p = positions.get(&slot.idx)?;
			(p.x, p.y)
		} else {
			let slot = self.edge(id)?;
			let (a, b) = (positions.get(&slot.source)?, positions.get(&slot.target)?);
			((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
		};
		Some(self.graph_to_screen(gx, gy))
	}
}
