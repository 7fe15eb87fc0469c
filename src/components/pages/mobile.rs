use leptos::prelude::*;

use super::{FOOTER_LOGO_SRC, OnchainChronicles};
use crate::components::chapter_graph::GraphChart;
use crate::config::use_site_config;

/// Narrow layout: title above the graph, footer logo below. While a chapter is
/// highlighted the graph gets a capped height instead of filling the page.
#[component]
pub fn GraphMobileRender(#[prop(into)] highlight_id: Signal<Option<String>>) -> impl IntoView {
	let config = use_site_config();
	let frame_class = move || {
		if highlight_id.with(Option::is_some) {
			"graph-mobile-frame graph-mobile-frame-capped"
		} else {
			"graph-mobile-frame graph-mobile-frame-grow"
		}
	};

	view! {
		<main class="graph-mobile">
			<div class="graph-title">
				<OnchainChronicles />
			</div>
			<div class=frame_class>
				<GraphChart highlight_id=highlight_id class="graph-mobile-chart" />
			</div>
		</main>
		<a class="footer-logo" href=config.story_protocol_url target="_blank" rel="noopener noreferrer">
			<img src=FOOTER_LOGO_SRC alt="logo" />
		</a>
	}
}
