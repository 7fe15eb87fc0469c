use leptos::prelude::*;

/// The "Onchain Chronicles" wordmark used as the page heading.
#[component]
pub fn OnchainChronicles() -> impl IntoView {
	view! { <h1 class="onchain-chronicles">"Onchain Chronicles"</h1> }
}
