use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::GraphCanvasState;
use crate::graph::GraphController;

/// Longest simulation step taken in one frame, in seconds.
const MAX_STEP_SECS: f64 = 0.05;

/// Graph controller shared between the canvas, the search bar and the edit
/// flows.
pub type SharedGraph = Rc<RefCell<GraphController<GraphCanvasState>>>;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Everything the canvas must release when it is unmounted.
struct CanvasTeardown {
	graph: SharedGraph,
	running: Rc<Cell<bool>>,
	frame: Rc<Cell<Option<i32>>>,
	animate: FrameCallback,
	resize_cb: FrameCallback,
}

impl CanvasTeardown {
	fn run(&self) {
		self.running.set(false);
		if let Some(window) = web_sys::window() {
			if let Some(id) = self.frame.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(cb) = self.resize_cb.borrow_mut().take() {
				let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
		self.graph.borrow_mut().teardown();
	}
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn OntologyGraphCanvas(
	graph: SharedGraph,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let running = Rc::new(Cell::new(true));
	let frame = Rc::new(Cell::new(None));

	let teardown = StoredValue::new_local(CanvasTeardown {
		graph: graph.clone(),
		running: running.clone(),
		frame: frame.clone(),
		animate: animate.clone(),
		resize_cb: resize_cb.clone(),
	});
	on_cleanup(move || {
		teardown.try_with_value(CanvasTeardown::run);
	});

	let graph_init = graph.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		{
			let mut graph = graph_init.borrow_mut();
			let s = graph.port_mut();
			s.resize(w, h);
			s.refit();
		}

		if fullscreen {
			let (graph_resize, canvas_resize) = (graph_init.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				graph_resize.borrow_mut().port_mut().resize(nw, nh);
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (graph_anim, animate_inner) = (graph_init.clone(), animate.clone());
		let (running_anim, frame_anim) = (running.clone(), frame.clone());
		let last_frame = Cell::new(js_sys::Date::now());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if !running_anim.get() {
				return;
			}
			let now = js_sys::Date::now();
			let dt = ((now - last_frame.get()) / 1000.0).max(0.0);
			last_frame.set(now);
			{
				let mut graph = graph_anim.borrow_mut();
				graph.advance(dt);
				let s = graph.port_mut();
				s.tick(dt.min(MAX_STEP_SECS) as f32);
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				frame_anim.set(
					web_sys::window()
						.unwrap()
						.request_animation_frame(cb.as_ref().unchecked_ref())
						.ok(),
				);
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			frame.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let graph_md = graph.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			graph_md.borrow_mut().port_mut().pointer_down(x, y);
		}
	};

	let graph_mm = graph.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			graph_mm.borrow_mut().port_mut().pointer_move(x, y);
		}
	};

	let graph_mu = graph.clone();
	let on_mouseup = move |_: MouseEvent| {
		graph_mu.borrow_mut().port_mut().pointer_up();
	};

	let graph_ml = graph.clone();
	let on_mouseleave = move |_: MouseEvent| {
		graph_ml.borrow_mut().port_mut().pointer_leave();
	};

	let graph_dc = graph.clone();
	let on_dblclick = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			graph_dc.borrow_mut().port_mut().double_click_at(x, y);
		}
	};

	let graph_wh = graph;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			graph_wh.borrow_mut().port_mut().zoom_at(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="ontology-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
