//! Site-wide links and copy, overridable at build time through environment
//! variables (`LEARN_STORY_PROTOCOL_LINK`, `STORY_PROTOCOL_URL`, `TWITTER_URL`,
//! `SITE_URL`).

use leptos::prelude::*;

/// Route of the chapter browser that "Continue a Story" leads to.
pub const CHAPTERS_ROUTE: &str = "/chapters";
/// Route of the graph page.
pub const GRAPH_ROUTE: &str = "/graph";
/// Query parameter naming the chapter to highlight on the graph page.
pub const HIGHLIGHT_QUERY_KEY: &str = "highlight";

/// Links and copy shared by the pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
	pub story_protocol_url: String,
	/// Empty when not configured; the CTA then renders a dead link.
	pub learn_story_protocol_link: String,
	pub twitter_url: String,
	/// Public URL of this site, used in share links.
	pub site_url: String,
	pub share_text: String,
}

impl Default for SiteConfig {
	fn default() -> Self {
		Self {
			story_protocol_url: "https://www.storyprotocol.xyz".into(),
			learn_story_protocol_link: String::new(),
			twitter_url: "https://twitter.com/StoryProtocol".into(),
			site_url: "https://onchainchronicles.xyz".into(),
			share_text: "I just added a chapter to Onchain Chronicles, a collective story told onchain."
				.into(),
		}
	}
}

impl SiteConfig {
	/// Defaults with any build-time environment overrides applied.
	pub fn from_env() -> Self {
		Self::default().with_overrides(|key| match key {
			"STORY_PROTOCOL_URL" => option_env!("STORY_PROTOCOL_URL"),
			"LEARN_STORY_PROTOCOL_LINK" => option_env!("LEARN_STORY_PROTOCOL_LINK"),
			"TWITTER_URL" => option_env!("TWITTER_URL"),
			"SITE_URL" => option_env!("SITE_URL"),
			_ => None,
		})
	}

	fn with_overrides<'a>(mut self, lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
		let set = |field: &mut String, key: &str| {
			if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
				*field = value.to_string();
			}
		};
		set(&mut self.story_protocol_url, "STORY_PROTOCOL_URL");
		set(&mut self.learn_story_protocol_link, "LEARN_STORY_PROTOCOL_LINK");
		set(&mut self.twitter_url, "TWITTER_URL");
		set(&mut self.site_url, "SITE_URL");
		self
	}

	/// Link to the graph page with `chapter_id` highlighted.
	pub fn highlight_url(&self, chapter_id: u64) -> String {
		format!(
			"{}{GRAPH_ROUTE}?{HIGHLIGHT_QUERY_KEY}={chapter_id}",
			self.site_url.trim_end_matches('/')
		)
	}

	/// X/Twitter web intent prefilled with the share text and `url`.
	pub fn share_intent_url(&self, url: &str) -> String {
		format!(
			"https://twitter.com/intent/tweet?text={}&url={}",
			urlencoding::encode(&self.share_text),
			urlencoding::encode(url)
		)
	}
}

/// Makes the site config available to the component tree.
pub fn provide_site_config() {
	provide_context(SiteConfig::from_env());
}

/// Site config from context, or defaults when none was provided.
pub fn use_site_config() -> SiteConfig {
	use_context::<SiteConfig>().unwrap_or_default()
}
