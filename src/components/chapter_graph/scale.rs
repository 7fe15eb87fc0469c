//! Zoom-dependent scaling for graph visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: the graph's own coordinates. Sizes here grow when zoomed in.
//! - **Screen-space**: canvas pixels. Sizes here stay put regardless of zoom.
//!
//! Node sizes come from the chart options as diameters in screen pixels at
//! zoom 1.0 and are clamped so nodes never shrink below a tappable size.

use super::option::GraphSeries;

/// How a size behaves as the zoom level `k` changes.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels).
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Visibility ramp between two zoom levels.
#[derive(Clone, Debug)]
pub struct Fade {
	pub zero_alpha_k: f64,
	pub full_alpha_k: f64,
}

impl Fade {
	pub fn apply(&self, k: f64) -> f64 {
		if self.zero_alpha_k == self.full_alpha_k {
			return 1.0;
		}
		((k - self.zero_alpha_k) / (self.full_alpha_k - self.zero_alpha_k)).clamp(0.0, 1.0)
	}
}

/// Scale settings for one graph series.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// How node radii behave under zoom.
	pub node_behavior: ScaleBehavior,
	/// Extra hit slop around each node, in screen pixels.
	pub hit_slop: f64,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Labels disappear below this zoom; highlighted labels always draw.
	pub label_min_k: f64,
	/// Arrow length in screen pixels.
	pub arrow_size: f64,
	/// Dash pattern (dash, gap) for highlighted path edges, world units.
	pub dash_pattern: (f64, f64),
	/// Flow animation speed along highlighted edges (world units per second).
	pub flow_speed: f64,
	/// Dashes fade to a solid line as the view zooms out.
	pub dash_fade: Fade,
	/// Arrows fade out when zoomed far out.
	pub arrow_fade: Fade,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_behavior: ScaleBehavior::Clamped {
				min_screen: 3.0,
				max_screen: f64::INFINITY,
			},
			hit_slop: 4.0,
			label_size: 11.0,
			label_min_k: 0.6,
			arrow_size: 6.0,
			dash_pattern: (8.0, 4.0),
			flow_speed: 12.0,
			dash_fade: Fade {
				zero_alpha_k: 0.4,
				full_alpha_k: 0.9,
			},
			arrow_fade: Fade {
				zero_alpha_k: 0.15,
				full_alpha_k: 0.5,
			},
		}
	}
}

impl ScaleConfig {
	/// Picks up label sizing from a graph series, keeping the other defaults.
	pub fn for_series(series: &GraphSeries) -> Self {
		Self {
			label_size: series.label.font_size,
			label_min_k: series.label.min_zoom,
			..Self::default()
		}
	}
}

/// Scale values for one frame at zoom `k`, all in world-space.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub label_font: String,
	/// Whether unhighlighted labels are drawn at this zoom.
	pub labels_visible: bool,
	pub hit_slop: f64,
	pub arrow_size: f64,
	pub arrow_alpha: f64,
	pub dash_pattern: (f64, f64),
	/// 0.0 draws highlighted edges solid, 1.0 fully dashed.
	pub dash_alpha: f64,
	pub dash_offset: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64, flow_time: f64) -> Self {
		Self {
			k,
			label_font: format!("{}px sans-serif", config.label_size / k),
			labels_visible: k >= config.label_min_k,
			hit_slop: config.hit_slop / k,
			arrow_size: ScaleBehavior::Screen.apply(config.arrow_size, k),
			arrow_alpha: config.arrow_fade.apply(k),
			dash_pattern: config.dash_pattern,
			dash_alpha: config.dash_fade.apply(k),
			dash_offset: -flow_time * config.flow_speed,
		}
	}

	/// World-space radius for a node whose option diameter is `symbol_size`.
	pub fn node_radius(&self, config: &ScaleConfig, symbol_size: f64) -> f64 {
		config.node_behavior.apply(symbol_size / 2.0, self.k)
	}

	/// World-space width for a line `screen_width` pixels wide.
	pub fn line_width(&self, screen_width: f64) -> f64 {
		ScaleBehavior::Screen.apply(screen_width, self.k)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_radius_keeps_minimum_screen_size() {
		let config = ScaleConfig::default();
		let zoomed_out = ScaledValues::new(&config, 0.1, 0.0);
		// 4px diameter at k=0.1 would be 0.2px on screen; clamp to 3px.
		assert!((zoomed_out.node_radius(&config, 4.0) * 0.1 - 3.0).abs() < 1e-9);
		let normal = ScaledValues::new(&config, 1.0, 0.0);
		assert_eq!(normal.node_radius(&config, 14.0), 7.0);
	}

	#[test]
	fn labels_hide_below_min_zoom() {
		let config = ScaleConfig {
			label_min_k: 0.6,
			..Default::default()
		};
		assert!(!ScaledValues::new(&config, 0.5, 0.0).labels_visible);
		assert!(ScaledValues::new(&config, 0.6, 0.0).labels_visible);
	}

	#[test]
	fn fades_ramp_between_thresholds() {
		let fade = Fade {
			zero_alpha_k: 0.4,
			full_alpha_k: 0.9,
		};
		assert_eq!(fade.apply(0.2), 0.0);
		assert_eq!(fade.apply(2.0), 1.0);
		assert!((fade.apply(0.65) - 0.5).abs() < 1e-9);
	}
}
