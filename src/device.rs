//! Viewport-based device classification.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// Widest viewport (in CSS pixels) still treated as a small device.
pub const SMALL_DEVICE_MAX_WIDTH: f64 = 768.0;

/// Media-query style flags derived from the viewport width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceFlags {
	/// `(max-width: 768px)`
	pub is_small_device: bool,
	/// `(min-width: 769px)`
	pub is_medium_device: bool,
}

impl DeviceFlags {
	pub fn from_width(width: f64) -> Self {
		Self {
			is_small_device: width <= SMALL_DEVICE_MAX_WIDTH,
			is_medium_device: width > SMALL_DEVICE_MAX_WIDTH,
		}
	}
}

/// Presentation tier the chart is styled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceTier {
	Small,
	Medium,
	Tv,
}

impl DeviceTier {
	/// `is_tv` wins; otherwise small only when the flags agree on it, medium in
	/// every other case (including both or neither flag set).
	pub fn resolve(is_tv: bool, is_small_device: bool, is_medium_device: bool) -> Self {
		if is_tv {
			DeviceTier::Tv
		} else if is_small_device && !is_medium_device {
			DeviceTier::Small
		} else {
			DeviceTier::Medium
		}
	}
}

fn viewport_width() -> Option<f64> {
	web_sys::window()?.inner_width().ok()?.as_f64()
}

/// Reactive device flags, updated on every window resize until the calling
/// owner is cleaned up.
pub fn use_device_flags() -> ReadSignal<DeviceFlags> {
	let initial = viewport_width().map(DeviceFlags::from_width).unwrap_or_default();
	let (flags, set_flags) = signal(initial);

	let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
		if let Some(width) = viewport_width() {
			let next = DeviceFlags::from_width(width);
			if flags.get_untracked() != next {
				set_flags.set(next);
			}
		}
	});
	if let Some(window) = web_sys::window() {
		let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
	}

	let listener = StoredValue::new_local(Some(on_resize));
	on_cleanup(move || {
		if let Some(Some(cb)) = listener.try_update_value(Option::take) {
			if let Some(window) = web_sys::window() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	flags
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn width_breakpoint_matches_media_queries() {
		assert_eq!(
			DeviceFlags::from_width(768.0),
			DeviceFlags {
				is_small_device: true,
				is_medium_device: false
			}
		);
		assert_eq!(
			DeviceFlags::from_width(769.0),
			DeviceFlags {
				is_small_device: false,
				is_medium_device: true
			}
		);
	}

	#[test]
	fn tv_overrides_other_flags() {
		for small in [false, true] {
			for medium in [false, true] {
				assert_eq!(DeviceTier::resolve(true, small, medium), DeviceTier::Tv);
			}
		}
	}

	#[test]
	fn ambiguous_flags_fall_back_to_medium() {
		assert_eq!(DeviceTier::resolve(false, true, false), DeviceTier::Small);
		assert_eq!(DeviceTier::resolve(false, false, true), DeviceTier::Medium);
		assert_eq!(DeviceTier::resolve(false, true, true), DeviceTier::Medium);
		assert_eq!(DeviceTier::resolve(false, false, false), DeviceTier::Medium);
	}
}
