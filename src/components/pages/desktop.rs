use leptos::prelude::*;
use leptos_router::components::A;

use super::{FOOTER_LOGO_SRC, OnchainChronicles, ShareStory};
use crate::components::chapter_graph::GraphChart;
use crate::config::{CHAPTERS_ROUTE, use_site_config};

/// Wide layout: title and graph on the left, calls to action on the right.
#[component]
pub fn GraphDesktopRender(#[prop(into)] highlight_id: Signal<Option<String>>) -> impl IntoView {
	let config = use_site_config();
	let highlighting = move || highlight_id.with(Option::is_some);

	view! {
		<main class="graph-desktop">
			<div class="graph-desktop-main">
				<div class="graph-title">
					<OnchainChronicles />
				</div>
				<GraphChart highlight_id=highlight_id class="graph-desktop-chart" />
			</div>
			<aside class="graph-desktop-actions">
				<ShareStory highlight_id=highlight_id />
				<A href=CHAPTERS_ROUTE attr:class="button">
					<Show
						when=highlighting
						fallback=|| view! {
							"Continue a Story"
							<img class="button-icon" src="/assets/arrow_right_black.svg" alt="Button Icon" />
						}
					>
						"Continue Another Story"
					</Show>
				</A>
				<a class="button button-secondary" href=config.learn_story_protocol_link target="_blank">
					"Learn About Story Protocol"
					<img class="button-icon" src="/assets/share_icon.svg" alt="Blank Icon" />
				</a>
				<a class="footer-logo" href=config.story_protocol_url target="_blank" rel="noopener noreferrer">
					<img src=FOOTER_LOGO_SRC alt="logo" />
				</a>
			</aside>
		</main>
	}
}
