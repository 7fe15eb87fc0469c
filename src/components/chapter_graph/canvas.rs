//! Browser chart engine drawing on an HTML canvas.
//!
//! The engine owns the simulation scene and a `requestAnimationFrame` loop that
//! ticks the physics and redraws each frame. Pointer input is forwarded by the
//! component in canvas-local coordinates.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::engine::{ChartEngine, EngineError};
use super::option::{BackdropOption, ChartOption, TooltipOption};
use super::render;
use super::state::GraphState;

const FRAME_DT: f32 = 0.016;
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Everything one frame needs to draw.
struct Scene {
	state: GraphState,
	style: Option<(BackdropOption, TooltipOption)>,
}

impl Scene {
	fn draw(&self, ctx: &CanvasRenderingContext2d) {
		match &self.style {
			Some((backdrop, tooltip)) => render::render(&self.state, ctx, backdrop, tooltip),
			None => ctx.clear_rect(0.0, 0.0, self.state.width, self.state.height),
		}
	}
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// [`ChartEngine`] backed by a 2d canvas and the force simulation.
pub struct CanvasEngine {
	canvas: HtmlCanvasElement,
	scene: Rc<RefCell<Scene>>,
	frame: FrameCallback,
	frame_id: Rc<Cell<Option<i32>>>,
	disposed: Rc<Cell<bool>>,
}

/// Size of the canvas's container, or a fallback when it has no layout yet.
fn surface_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

fn request_frame(frame: &FrameCallback) -> Option<i32> {
	let window = web_sys::window()?;
	let frame = frame.borrow();
	let cb = frame.as_ref()?;
	window.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}

impl ChartEngine for CanvasEngine {
	type Surface = HtmlCanvasElement;

	fn init(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
		let (w, h) = surface_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or(EngineError::NoContext)?
			.dyn_into()
			.map_err(|_| EngineError::NoContext)?;

		let scene = Rc::new(RefCell::new(Scene {
			state: GraphState::new(w, h),
			style: None,
		}));
		let frame: FrameCallback = Rc::new(RefCell::new(None));
		let frame_id = Rc::new(Cell::new(None));
		let disposed = Rc::new(Cell::new(false));

		let (scene_anim, frame_anim, frame_id_anim, disposed_anim) =
			(scene.clone(), frame.clone(), frame_id.clone(), disposed.clone());
		*frame.borrow_mut() = Some(Closure::new(move || {
			if disposed_anim.get() {
				return;
			}
			{
				let mut scene = scene_anim.borrow_mut();
				scene.state.tick(FRAME_DT);
				scene.draw(&ctx);
			}
			frame_id_anim.set(request_frame(&frame_anim));
		}));
		frame_id.set(request_frame(&frame));

		log::debug!("chronicles: canvas engine initialized at {w}x{h}");
		Ok(Self {
			canvas,
			scene,
			frame,
			frame_id,
			disposed,
		})
	}

	fn set_option(&mut self, option: &ChartOption) {
		let mut scene = self.scene.borrow_mut();
		scene.state.apply_option(option);
		scene.style = Some((option.backdrop.clone(), option.tooltip.clone()));
	}

	fn resize(&mut self) {
		let (w, h) = surface_size(&self.canvas);
		self.canvas.set_width(w as u32);
		self.canvas.set_height(h as u32);
		self.scene.borrow_mut().state.resize(w, h);
	}

	fn dispose(&mut self) {
		if self.disposed.replace(true) {
			return;
		}
		if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.frame.borrow_mut().take();
		// Release the backing store; the element may outlive the engine.
		self.canvas.set_width(0);
		self.canvas.set_height(0);
		log::debug!("chronicles: canvas engine disposed");
	}
}

impl CanvasEngine {
	/// Converts viewport coordinates to canvas-local ones.
	pub fn local_point(&self, client_x: i32, client_y: i32) -> (f64, f64) {
		let rect = self.canvas.get_bounding_client_rect();
		(client_x as f64 - rect.left(), client_y as f64 - rect.top())
	}

	/// Starts a node drag, or a pan when no draggable node is under the pointer.
	pub fn pointer_down(&self, x: f64, y: f64) {
		let mut scene = self.scene.borrow_mut();
		let state = &mut scene.state;
		let hit = state.node_at_position(x, y);
		state.set_hover(hit);

		match hit.filter(|_| state.settings.draggable) {
			Some(idx) => {
				state.drag.active = true;
				state.drag.node_idx = Some(idx);
				state.drag.start_x = x;
				state.drag.start_y = y;
				let (mut nx, mut ny) = (0.0, 0.0);
				state.graph.visit_nodes(|node| {
					if node.index() == idx {
						(nx, ny) = (node.x(), node.y());
					}
				});
				state.drag.node_start_x = nx;
				state.drag.node_start_y = ny;
			}
			None => {
				state.pan.active = state.settings.roam;
				state.pan.start_x = x;
				state.pan.start_y = y;
				state.pan.transform_start_x = state.transform.x;
				state.pan.transform_start_y = state.transform.y;
			}
		}
	}

	pub fn pointer_move(&self, x: f64, y: f64) {
		let mut scene = self.scene.borrow_mut();
		let state = &mut scene.state;

		if !state.drag.active {
			let hovered = state.node_at_position(x, y);
			state.set_hover(hovered);
		}

		if state.drag.active {
			if let Some(idx) = state.drag.node_idx {
				let k = state.transform.k;
				let (nx, ny) = (
					state.drag.node_start_x + ((x - state.drag.start_x) / k) as f32,
					state.drag.node_start_y + ((y - state.drag.start_y) / k) as f32,
				);
				state.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if state.pan.active {
			state.pan_to(x, y);
		}
	}

	/// Ends a drag or pan. Dragged nodes stay pinned where they were dropped.
	pub fn pointer_up(&self) {
		let mut scene = self.scene.borrow_mut();
		let state = &mut scene.state;
		state.drag.active = false;
		state.drag.node_idx = None;
		state.pan.active = false;
	}

	pub fn pointer_leave(&self) {
		self.pointer_up();
		self.scene.borrow_mut().state.set_hover(None);
	}

	/// Zooms in for negative `delta_y`, out for positive.
	pub fn wheel(&self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.scene.borrow_mut().state.zoom_at(x, y, factor);
	}

	/// Whether the current options allow zooming and panning.
	pub fn roams(&self) -> bool {
		self.scene.borrow().state.settings.roam
	}
}
