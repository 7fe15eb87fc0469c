//! chronicles-graph: web front end for Onchain Chronicles, a collective story
//! written chapter by chapter.
//!
//! The centerpiece is an interactive graph of every chapter and the chapter it
//! continues, rendered on a canvas with a force-directed layout. A chapter can
//! be highlighted through the `highlight` query parameter, which emphasizes its
//! path back to the start of the story.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use log::{Level, info};

pub mod chapter;
pub mod components;
pub mod config;
pub mod device;
pub mod source;

pub use components::chapter_graph::GraphChart;
pub use components::pages::{GraphPage, HomePage};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("chronicles: logging initialized");
}

/// Main application component: document metadata, site config and routes.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();
	config::provide_site_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Onchain Chronicles" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta name="description" content="A collective storytelling journey." />

		<Router>
			<Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
				<Route path=path!("/") view=HomePage />
				<Route path=path!("/graph") view=GraphPage />
			</Routes>
		</Router>
	}
}
