use std::f64::consts::PI;

use force_graph::SimulationParameters;

use crate::graph::LayoutConfig;

pub const CHAR_WIDTH: f64 = 7.2;
pub const LINE_HEIGHT: f64 = 14.0;
pub const NODE_PADDING: f64 = 10.0;
const MAX_LABEL_WIDTH: f64 = 150.0;
const MIN_NODE_SIDE: f64 = 24.0;

pub const NODE_MASS: f32 = 10.0;
const SPRING: f32 = 0.05;

pub fn simulation(layout: &LayoutConfig) -> SimulationParameters {
	// Scales the charge so linked pairs settle roughly at the ideal length;
	// `node_repulsion` at its default leaves that balance untouched.
	let ideal = layout.ideal_edge_length.max(1.0) as f32;
	let repulsion = (layout.node_repulsion / LayoutConfig::default().node_repulsion) as f32;
	SimulationParameters {
		force_charge: ideal.powi(3) * SPRING / (NODE_MASS * NODE_MASS) * repulsion,
		force_spring: SPRING,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

/// Starting point of node `i` out of `count`: evenly spread on a circle
/// large enough that neighbours start about one edge length apart.
pub fn initial_position(i: usize, count: usize, layout: &LayoutConfig) -> (f32, f32) {
	let count = count.max(1);
	let radius = (layout.ideal_edge_length * count as f64 / (2.0 * PI)).max(layout.ideal_edge_length / 2.0);
	let angle = (i as f64) * 2.0 * PI / count as f64;
	((radius * angle.cos()) as f32, (radius * angle.sin()) as f32)
}

/// Breaks a label into lines no wider than the node text box. Words longer
/// than a line stay whole.
pub fn wrap_label(label: &str) -> Vec<String> {
	let max_chars = (MAX_LABEL_WIDTH / CHAR_WIDTH) as usize;
	let mut lines: Vec<String> = Vec::new();
	let mut current = String::new();
	for word in label.split_whitespace() {
		if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
			lines.push(std::mem::take(&mut current));
		}
		if !current.is_empty() {
			current.push(' ');
		}
		current.push_str(word);
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines
}

/// Node box sized to its wrapped label.
pub fn node_size(lines: &[String]) -> (f64, f64) {
	let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
	let width = widest as f64 * CHAR_WIDTH + 2.0 * NODE_PADDING;
	let height = lines.len().max(1) as f64 * LINE_HEIGHT + 2.0 * NODE_PADDING;
	(width.max(MIN_NODE_SIDE), height.max(MIN_NODE_SIDE))
}

/// Axis-aligned box in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn around(x: f64, y: f64, half_width: f64, half_height: f64) -> Self {
		Self {
			min_x: x - half_width,
			min_y: y - half_height,
			max_x: x + half_width,
			max_y: y + half_height,
		}
	}

	pub fn union(self, other: Bounds) -> Self {
		Self {
			min_x: self.min_x.min(other.min_x),
			min_y: self.min_y.min(other.min_y),
			max_x: self.max_x.max(other.max_x),
			max_y: self.max_y.max(other.max_y),
		}
	}

	pub fn center(&self) -> (f64, f64) {
		((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}
}

/// Distance from `(px, py)` to the segment `a`-`b`.
pub fn segment_distance(px: f64, py: f64, (ax, ay): (f64, f64), (bx, by): (f64, f64)) -> f64 {
	let (dx, dy) = (bx - ax, by - ay);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < f64::EPSILON {
		0.0
	} else {
		(((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (ax + t * dx, ay + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}
