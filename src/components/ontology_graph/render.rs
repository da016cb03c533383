use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::{CHAR_WIDTH, LINE_HEIGHT};
use super::state::{EdgeSlot, GraphCanvasState, NodePosition, NodeSlot};

const BACKGROUND: &str = "#f4f5f7";
const FONT: &str = "12px monospace";
const ARROW_SIZE: f64 = 10.0;
const CORNER_RADIUS: f64 = 6.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	ctx.set_font(FONT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	let positions = state.positions();
	let t = ease_out_cubic(state.hover.highlight_t);
	for edge in &state.edges {
		draw_edge(state, ctx, edge, &positions, t);
	}
	for node in &state.nodes {
		draw_node(state, ctx, node, &positions, t);
	}
	ctx.restore();
}

/// Opacity of an element while a hover emphasis fades in or out.
fn hover_alpha(state: &GraphCanvasState, emphasized: bool, t: f64) -> f64 {
	if !state.has_active_highlight() || emphasized {
		1.0
	} else {
		1.0 - 0.7 * t
	}
}

/// Point where the segment from `from` to the centre of `node` crosses the
/// node's box.
fn box_exit(node: &NodeSlot, (cx, cy): (f64, f64), (fx, fy): (f64, f64)) -> (f64, f64) {
	let (dx, dy) = (fx - cx, fy - cy);
	if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
		return (cx, cy);
	}
	let sx = if dx.abs() > f64::EPSILON { (node.width / 2.0) / dx.abs() } else { f64::INFINITY };
	let sy = if dy.abs() > f64::EPSILON { (node.height / 2.0) / dy.abs() } else { f64::INFINITY };
	let s = sx.min(sy).min(1.0);
	(cx + dx * s, cy + dy * s)
}

fn draw_edge(
	state: &GraphCanvasState,
	ctx: &CanvasRenderingContext2d,
	edge: &EdgeSlot,
	positions: &HashMap<DefaultNodeIdx, NodePosition>,
	t: f64,
) {
	let (Some(a), Some(b)) = (positions.get(&edge.source), positions.get(&edge.target)) else {
		return;
	};
	let (Some(source), Some(target)) = (
		state.nodes.iter().find(|slot| slot.idx == edge.source),
		state.nodes.iter().find(|slot| slot.idx == edge.target),
	) else {
		return;
	};
	let start = box_exit(source, (a.x, a.y), (b.x, b.y));
	let end = box_exit(target, (b.x, b.y), (a.x, a.y));
	let (dx, dy) = (end.0 - start.0, end.1 - start.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	let style = &edge.style;
	let emphasized = state.is_highlighted(edge.source) && state.is_highlighted(edge.target);
	ctx.set_global_alpha(hover_alpha(state, emphasized, t));
	ctx.set_stroke_style_str(&style.line_color);
	ctx.set_fill_style_str(&style.line_color);
	ctx.set_line_width(style.line_width);
	if style.dashed {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(8.0),
			&JsValue::from_f64(4.0),
		));
	}

	let (ux, uy) = (dx / dist, dy / dist);
	let inset_start = if style.source_arrow { ARROW_SIZE } else { 0.0 };
	let inset_end = if style.target_arrow { ARROW_SIZE } else { 0.0 };
	ctx.begin_path();
	ctx.move_to(start.0 + ux * inset_start, start.1 + uy * inset_start);
	ctx.line_to(end.0 - ux * inset_end, end.1 - uy * inset_end);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	if style.target_arrow {
		draw_arrow(ctx, end, (ux, uy));
	}
	if style.source_arrow {
		draw_arrow(ctx, start, (-ux, -uy));
	}

	if style.show_label && !edge.element.label.is_empty() {
		let (mx, my) = ((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0);
		if style.label_background {
			let width = edge.element.label.chars().count() as f64 * CHAR_WIDTH + 4.0;
			ctx.set_fill_style_str(BACKGROUND);
			ctx.fill_rect(mx - width / 2.0, my - LINE_HEIGHT / 2.0, width, LINE_HEIGHT);
		}
		ctx.set_fill_style_str("#000000");
		let _ = ctx.fill_text(&edge.element.label, mx, my);
	}
	ctx.set_global_alpha(1.0);
}

/// Filled triangle with its tip at `tip`, pointing along `(ux, uy)`.
fn draw_arrow(ctx: &CanvasRenderingContext2d, tip: (f64, f64), (ux, uy): (f64, f64)) {
	let (back_x, back_y) = (tip.0 - ux * ARROW_SIZE, tip.1 - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.begin_path();
	ctx.move_to(tip.0, tip.1);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn trace_round_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_node(
	state: &GraphCanvasState,
	ctx: &CanvasRenderingContext2d,
	node: &NodeSlot,
	positions: &HashMap<DefaultNodeIdx, NodePosition>,
	t: f64,
) {
	let Some(p) = positions.get(&node.idx) else {
		return;
	};
	let style = &node.style;
	let k = state.transform.k;
	ctx.set_global_alpha(hover_alpha(state, state.is_highlighted(node.idx), t));

	if state.is_hovered(node.idx) && t > 0.01 {
		let glow_radius = node.width.max(node.height) * (0.6 + 0.3 * t);
		if let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, 0.0, p.x, p.y, glow_radius) {
			let _ = gradient.add_color_stop(0.0, &format!("rgba(100, 150, 255, {})", 0.35 * t));
			let _ = gradient.add_color_stop(1.0, "rgba(100, 150, 255, 0)");
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, glow_radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	let (x, y) = (p.x - node.width / 2.0, p.y - node.height / 2.0);
	trace_round_rect(ctx, x, y, node.width, node.height, CORNER_RADIUS);
	ctx.set_fill_style_str(&style.fill);
	ctx.fill();
	if style.border_width > 0.0 {
		ctx.set_stroke_style_str(&style.border_color);
		ctx.set_line_width(style.border_width.max(1.0 / k));
		ctx.stroke();
	}

	if style.show_label {
		ctx.set_fill_style_str("#000000");
		let top = p.y - (node.lines.len() as f64 - 1.0) * LINE_HEIGHT / 2.0;
		for (i, line) in node.lines.iter().enumerate() {
			let _ = ctx.fill_text(line, p.x, top + i as f64 * LINE_HEIGHT);
		}
	}
	ctx.set_global_alpha(1.0);
}
