//! Browser tests for the canvas engine, the graph component lifecycle, the
//! page-embedded source and the success alert. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use chronicles_graph::components::chapter_graph::{
	CanvasEngine, GraphChart, GraphView, OptionParams, ViewPhase,
};
use chronicles_graph::components::pages::SuccessAlert;
use chronicles_graph::source::{CHAPTER_DATA_ELEMENT_ID, ChapterSource, ScriptSource, StaticSource};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{HtmlCanvasElement, HtmlElement, HtmlScriptElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
	web_sys::window().unwrap().document().unwrap()
}

fn attached<T: JsCast>(tag: &str) -> T {
	let element = document().create_element(tag).unwrap();
	document().body().unwrap().append_child(&element).unwrap();
	element.dyn_into().unwrap()
}

fn desktop() -> OptionParams {
	OptionParams {
		is_medium_device: true,
		..Default::default()
	}
}

#[wasm_bindgen_test]
fn canvas_engine_draws_bundled_chapters() {
	let canvas: HtmlCanvasElement = attached("canvas");
	let mut view = GraphView::<CanvasEngine>::new(desktop());
	view.mount(canvas.clone()).unwrap();
	assert!(view.is_mounted());
	assert!(canvas.width() > 0);

	let ticket = view.begin_fetch();
	let records = StaticSource::bundled().unwrap().fetch(ticket.since_id);
	assert!(view.receive(ticket, records));
	assert_eq!(view.phase(), ViewPhase::Loaded);
	assert!(!view.data().is_empty());

	view.set_params(OptionParams {
		highlight_id: Some("2".into()),
		..desktop()
	});
	view.resize();
	view.unmount();
	assert!(!view.is_mounted());
	assert_eq!(canvas.width(), 0);
}

#[wasm_bindgen_test]
fn engine_survives_pointer_input() {
	let canvas: HtmlCanvasElement = attached("canvas");
	let mut view = GraphView::<CanvasEngine>::new(desktop());
	view.mount(canvas).unwrap();
	let ticket = view.begin_fetch();
	view.receive(ticket, StaticSource::bundled().unwrap().fetch(0));

	let engine = view.engine().unwrap();
	engine.pointer_down(10.0, 10.0);
	engine.pointer_move(40.0, 30.0);
	engine.pointer_up();
	engine.wheel(100.0, 100.0, -1.0);
	engine.pointer_leave();
}

#[wasm_bindgen_test]
async fn graph_chart_cleanup_disposes_engine_and_detaches_resize() {
	let host: HtmlElement = attached("div");
	host.set_attribute("style", "width: 320px; height: 240px;").unwrap();
	let handle = leptos::mount::mount_to(host.clone(), || {
		view! { <GraphChart highlight_id=Signal::derive(|| None::<String>) /> }
	});

	let canvas: HtmlCanvasElement = host
		.query_selector("canvas")
		.unwrap()
		.expect("graph chart renders a canvas")
		.dyn_into()
		.unwrap();
	// The mount effect runs on a later tick and sizes the canvas to its container.
	for _ in 0..20 {
		if canvas.width() == 320 {
			break;
		}
		leptos::task::tick().await;
	}
	assert_eq!(canvas.width(), 320);

	drop(handle);
	assert!(host.query_selector("canvas").unwrap().is_none());
	assert_eq!(canvas.width(), 0);

	let window = web_sys::window().unwrap();
	let resize = web_sys::Event::new("resize").unwrap();
	window.dispatch_event(&resize).unwrap();
	leptos::task::tick().await;
	assert_eq!(canvas.width(), 0);
	host.remove();
}

#[wasm_bindgen_test]
fn script_source_reads_embedded_json() {
	let script: HtmlScriptElement = attached("script");
	script.set_id(CHAPTER_DATA_ELEMENT_ID);
	script.set_type("application/json");
	script
		.set_text(r#"[{"id": 1, "story_id": 1, "parent_id": 0, "path": [1]}, {"id": 2, "story_id": 1, "parent_id": 1, "path": [1, 2]}]"#)
		.unwrap();

	let records = ScriptSource::default().fetch(1).unwrap();
	script.remove();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].id, 2);
}

#[wasm_bindgen_test]
fn script_source_reports_missing_element() {
	assert!(ScriptSource::new("no-such-element").fetch(0).is_err());
}

#[wasm_bindgen_test]
fn success_alert_hides_without_message() {
	let host: HtmlElement = attached("div");
	let _handle = leptos::mount::mount_to(host.clone(), || view! { <SuccessAlert title="Done" /> });
	assert!(!host.inner_html().contains("success-alert"));

	let host: HtmlElement = attached("div");
	let _handle = leptos::mount::mount_to(host.clone(), || {
		view! { <SuccessAlert title="Done" msg="Chapter saved" /> }
	});
	assert!(host.inner_html().contains("Chapter saved"));
}
