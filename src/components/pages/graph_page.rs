use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use super::{GraphDesktopRender, GraphMobileRender};
use crate::config::HIGHLIGHT_QUERY_KEY;
use crate::device::{DeviceTier, use_device_flags};

/// Graph page. The `highlight` query parameter picks the chapter to emphasize;
/// small viewports get the mobile layout.
#[component]
pub fn GraphPage() -> impl IntoView {
	let query = use_query_map();
	let highlight_id = Signal::derive(move || {
		query.with(|q| q.get(HIGHLIGHT_QUERY_KEY)).filter(|id| !id.is_empty())
	});
	let device = use_device_flags();
	let tier = Memo::new(move |_| {
		let flags = device.get();
		DeviceTier::resolve(false, flags.is_small_device, flags.is_medium_device)
	});

	move || match tier.get() {
		DeviceTier::Small => view! { <GraphMobileRender highlight_id=highlight_id /> }.into_any(),
		DeviceTier::Medium | DeviceTier::Tv => {
			view! { <GraphDesktopRender highlight_id=highlight_id /> }.into_any()
		}
	}
}
