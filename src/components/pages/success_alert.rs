use leptos::prelude::*;

/// Green confirmation banner. Renders nothing while `msg` is empty.
#[component]
pub fn SuccessAlert(
	#[prop(into, optional)] title: MaybeProp<String>,
	#[prop(into, optional)] msg: MaybeProp<String>,
) -> impl IntoView {
	let message = move || msg.get().filter(|m| !m.is_empty());

	view! {
		<Show when=move || message().is_some()>
			<div class="success-alert" role="status">
				<div class="success-alert-text">
					<div class="success-alert-title">{move || title.get().unwrap_or_default()}</div>
					<div class="success-alert-msg">{move || message().unwrap_or_default()}</div>
				</div>
				<img class="success-alert-icon" src="/assets/share_success_icon.svg" alt="Success Icon" />
			</div>
		</Show>
	}
}
