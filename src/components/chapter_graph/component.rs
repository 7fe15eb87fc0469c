//! Leptos component wrapping the chapter graph canvas.
//!
//! The component creates an HTML canvas, mounts a [`GraphView`] with the canvas
//! engine on it, and starts loading chapters. Mouse, wheel and touch input is
//! forwarded to the engine; window resizes reach it through the view.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent};

use super::canvas::CanvasEngine;
use super::option::OptionParams;
use super::view::{GraphView, ViewPhase};
use crate::device::use_device_flags;
use crate::source::default_source;

type ViewCell = StoredValue<Option<GraphView<CanvasEngine>>, LocalStorage>;

fn with_engine(chart: ViewCell, f: impl FnOnce(&CanvasEngine)) {
	chart.try_with_value(|v| {
		if let Some(engine) = v.as_ref().and_then(GraphView::engine) {
			f(engine);
		}
	});
}

fn first_touch(ev: &TouchEvent) -> Option<(i32, i32)> {
	let touch = ev.touches().get(0)?;
	Some((touch.client_x(), touch.client_y()))
}

/// Interactive graph of every chapter, with `highlight_id` and its path to the
/// story root emphasized.
///
/// Sizes itself to its parent container. Shows a spinner until the first load
/// completes; an empty or failed load leaves an empty graph.
#[component]
pub fn GraphChart(
	#[prop(into)] highlight_id: Signal<Option<String>>,
	#[prop(default = false)] is_tv: bool,
	#[prop(into, optional)] class: String,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let device = use_device_flags();
	let params = Memo::new(move |_| {
		let flags = device.get();
		OptionParams {
			highlight_id: highlight_id.get(),
			is_tv,
			is_small_device: flags.is_small_device,
			is_medium_device: flags.is_medium_device,
		}
	});

	let chart: ViewCell = StoredValue::new_local(None);
	let (phase, set_phase) = signal(ViewPhase::Idle);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if chart.try_with_value(Option::is_some).unwrap_or(true) {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();

		let mut graph_view = GraphView::new(params.get_untracked());
		if let Err(e) = graph_view.mount(canvas) {
			log::error!("chronicles: could not mount graph: {e}");
		}
		let ticket = graph_view.begin_fetch();
		set_phase.set(graph_view.phase());
		chart.set_value(Some(graph_view));

		spawn_local(async move {
			let response = default_source().fetch(ticket.since_id);
			chart.try_update_value(|v| {
				if let Some(v) = v.as_mut() {
					v.receive(ticket, response);
					set_phase.set(v.phase());
				}
			});
		});
	});

	Effect::new(move |_| {
		let next = params.get();
		chart.try_update_value(|v| {
			if let Some(v) = v.as_mut() {
				v.set_params(next);
			}
		});
	});

	let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
		chart.try_update_value(|v| {
			if let Some(v) = v.as_mut() {
				v.resize();
			}
		});
	});
	if let Some(window) = web_sys::window() {
		let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
	}
	let resize_listener = StoredValue::new_local(Some(on_resize));

	on_cleanup(move || {
		if let Some(Some(cb)) = resize_listener.try_update_value(Option::take) {
			if let Some(window) = web_sys::window() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		chart.try_update_value(|v| {
			if let Some(mut v) = v.take() {
				v.unmount();
			}
		});
	});

	let on_mousedown = move |ev: MouseEvent| {
		with_engine(chart, |engine| {
			let (x, y) = engine.local_point(ev.client_x(), ev.client_y());
			engine.pointer_down(x, y);
		});
	};
	let on_mousemove = move |ev: MouseEvent| {
		with_engine(chart, |engine| {
			let (x, y) = engine.local_point(ev.client_x(), ev.client_y());
			engine.pointer_move(x, y);
		});
	};
	let on_mouseup = move |_: MouseEvent| with_engine(chart, CanvasEngine::pointer_up);
	let on_mouseleave = move |_: MouseEvent| with_engine(chart, CanvasEngine::pointer_leave);
	let on_wheel = move |ev: WheelEvent| {
		with_engine(chart, |engine| {
			if !engine.roams() {
				return;
			}
			ev.prevent_default();
			let (x, y) = engine.local_point(ev.client_x(), ev.client_y());
			engine.wheel(x, y, ev.delta_y());
		});
	};

	let on_touchstart = move |ev: TouchEvent| {
		let Some((cx, cy)) = first_touch(&ev) else {
			return;
		};
		with_engine(chart, |engine| {
			let (x, y) = engine.local_point(cx, cy);
			engine.pointer_down(x, y);
		});
	};
	let on_touchmove = move |ev: TouchEvent| {
		let Some((cx, cy)) = first_touch(&ev) else {
			return;
		};
		with_engine(chart, |engine| {
			if engine.roams() {
				ev.prevent_default();
			}
			let (x, y) = engine.local_point(cx, cy);
			engine.pointer_move(x, y);
		});
	};
	let on_touchend = move |_: TouchEvent| with_engine(chart, CanvasEngine::pointer_up);

	view! {
		<div class=format!("graph-chart {class}") style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="graph-chart-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:touchstart=on_touchstart
				on:touchmove=on_touchmove
				on:touchend=on_touchend
				style="display: block; cursor: grab; touch-action: none;"
			/>
			<Show when=move || phase.get() == ViewPhase::Loading>
				<div class="graph-chart-spinner" role="status" aria-label="Loading chapters"></div>
			</Show>
		</div>
	}
}
