//! The boundary between the graph view and whatever draws the chart.

use thiserror::Error;

use super::option::ChartOption;

/// Errors raised while binding an engine to its surface.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("surface has no 2d rendering context")]
	NoContext,
	#[error("browser call failed: {0}")]
	Js(String),
}

impl From<wasm_bindgen::JsValue> for EngineError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		EngineError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// A stateful chart renderer bound to one drawing surface.
///
/// The graph view initializes one engine per mount, feeds it options, forwards
/// resizes, and disposes it exactly once. An engine must not touch its surface
/// after `dispose`.
pub trait ChartEngine {
	/// Where the engine draws (a canvas element for the browser engine).
	type Surface;

	fn init(surface: Self::Surface) -> Result<Self, EngineError>
	where
		Self: Sized;

	/// Replaces the current options. Existing node positions may be kept.
	fn set_option(&mut self, option: &ChartOption);

	/// Recomputes the layout for the surface's current size.
	fn resize(&mut self);

	fn dispose(&mut self);
}
