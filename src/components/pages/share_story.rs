use leptos::prelude::*;

use crate::config::use_site_config;

/// "Share on X" call to action. Links to the highlighted chapter when one is
/// given, otherwise to the site itself.
#[component]
pub fn ShareStory(#[prop(into, optional)] highlight_id: MaybeProp<String>) -> impl IntoView {
	let config = use_site_config();
	let href = move || {
		let target = highlight_id
			.get()
			.and_then(|id| id.parse::<u64>().ok())
			.map(|id| config.highlight_url(id))
			.unwrap_or_else(|| config.site_url.clone());
		config.share_intent_url(&target)
	};

	view! {
		<div class="share-story">
			<p class="share-story-copy">"Tell your friends where the story is heading."</p>
			<a class="button button-share" href=href target="_blank" rel="noopener noreferrer">
				"Share on X"
			</a>
		</div>
	}
}
