//! Chapter graph visualization.
//!
//! Turns chapter records into an interactive graph on an HTML canvas:
//! - Chart data (nodes, parent links, issues) built from the records
//! - A declarative chart option derived from the data, the highlighted chapter
//!   and the device tier
//! - A canvas engine running a force simulation with pan, zoom and dragging
//! - A framework-independent view that owns the engine across its lifecycle
//!
//! # Example
//!
//! ```ignore
//! use chronicles_graph::components::chapter_graph::GraphChart;
//!
//! let highlight = Signal::derive(|| Some("12".to_string()));
//! view! { <GraphChart highlight_id=highlight /> }
//! ```

mod canvas;
mod component;
pub mod data;
pub mod engine;
pub mod option;
mod render;
pub mod scale;
mod state;
pub mod theme;
pub mod view;

pub use canvas::CanvasEngine;
pub use component::GraphChart;
pub use data::{ChartData, ChartLink, ChartNode, GraphIssue, build_chart_data};
pub use engine::{ChartEngine, EngineError};
pub use option::{ChartOption, OptionParams, build_chart_option};
pub use theme::Theme;
pub use view::{FetchTicket, GraphView, ViewPhase};
