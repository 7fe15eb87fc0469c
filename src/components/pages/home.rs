use leptos::prelude::*;
use leptos_router::components::A;

use crate::config::{GRAPH_ROUTE, use_site_config};

/// Landing page.
#[component]
pub fn HomePage() -> impl IntoView {
	let config = use_site_config();

	view! {
		<main class="home">
			<h1 class="home-title">"Onchain Chronicles"</h1>
			<p class="home-copy">"A collective storytelling journey."</p>
			<p class="home-copy">
				"Thank you for everyone who participated and contributed to Onchain Chronicles during ETH Denver 2024. "
				"Stay tuned to our socials for more information on the commemorative Story Protocol NFT."
			</p>
			<p class="home-copy">
				"With Onchain Chronicles, you continue the story and shape how the story is told paragraph by paragraph."
			</p>
			<div class="home-actions">
				<A href=GRAPH_ROUTE attr:class="button">"View IP Graph"</A>
				<a class="button" href=config.twitter_url target="_blank" rel="noopener noreferrer">
					"Visit Twitter"
				</a>
			</div>
		</main>
	}
}
