//! Visual theming for the chapter graph.
//!
//! The option builder turns a theme into concrete colors on each node, edge,
//! backdrop and tooltip. The canvas engine only ever sees those colors.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Linear blend towards `other` by `t` (clamped to 0..=1), keeping this alpha.
	fn mix(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let blend = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
		Self {
			r: blend(self.r, other.r),
			g: blend(self.g, other.g),
			b: blend(self.b, other.b),
			..self
		}
	}

	/// Towards white; `factor` 1.0 is white.
	pub fn lighten(self, factor: f64) -> Self {
		self.mix(Color::rgb(255, 255, 255), factor)
	}

	/// Towards black; `factor` 1.0 is black.
	pub fn darken(self, factor: f64) -> Self {
		self.mix(Color::rgb(0, 0, 0), factor)
	}

	/// `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		let Self { r, g, b, a } = self;
		if a >= 0.999 {
			format!("#{r:02x}{g:02x}{b:02x}")
		} else {
			format!("rgba({r}, {g}, {b}, {a})")
		}
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation; anything
	/// else comes back as mid gray.
	pub fn parse(color_str: &str) -> Self {
		if color_str.starts_with('#') && color_str.len() == 7 {
			let channel = |range: std::ops::Range<usize>| {
				color_str
					.get(range)
					.and_then(|s| u8::from_str_radix(s, 16).ok())
					.unwrap_or(128)
			};
			Color::rgb(channel(1..3), channel(3..5), channel(5..7))
		} else if color_str.starts_with("rgb") {
			let nums: Vec<&str> = color_str
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.collect();
			let channel = |i: usize| {
				nums.get(i)
					.and_then(|s| s.trim().parse().ok())
					.unwrap_or(128)
			};
			let a = nums
				.get(3)
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(1.0);
			Color::rgba(channel(0), channel(1), channel(2), a)
		} else {
			Color::rgb(128, 128, 128)
		}
	}
}

/// Category colors, cycled when there are more stories than entries.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted inks on a dark page; one per story before cycling.
	pub fn manuscript() -> Self {
		Self {
			colors: vec![
				Color::rgb(110, 168, 254),
				Color::rgb(240, 160, 98),
				Color::rgb(167, 139, 250),
				Color::rgb(94, 196, 160),
				Color::rgb(244, 114, 142),
				Color::rgb(148, 178, 204),
				Color::rgb(214, 190, 110),
			],
		}
	}

	/// Saturated colors that survive a living-room TV across the room.
	pub fn broadcast() -> Self {
		Self {
			colors: vec![
				Color::rgb(66, 165, 245),
				Color::rgb(255, 167, 38),
				Color::rgb(171, 71, 188),
				Color::rgb(102, 187, 106),
				Color::rgb(239, 83, 80),
				Color::rgb(38, 198, 218),
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return Color::rgb(128, 128, 128);
		}
		self.colors[index % self.colors.len()]
	}
}

/// Canvas backdrop.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Edge color of the backdrop (the whole fill when flat).
	pub color: Color,
	/// Center color when `use_gradient` is set.
	pub color_secondary: Color,
	pub use_gradient: bool,
	/// Corner darkening, 0.0 to 1.0.
	pub vignette: f64,
}

#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	/// Color of edges on the highlighted chapter's ancestor path
	pub highlight_color: Color,
	pub curved: bool,
	/// Bend of curved edges, 0.0 (straight) to 1.0.
	pub curve_tension: f64,
}

#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Radial shading instead of flat fills.
	pub use_gradient: bool,
	/// Fill of the highlighted chapter
	pub highlight_color: Color,
	/// Ring drawn around the highlighted chapter
	pub highlight_border: Color,
	/// Opacity of everything not highlighted while a highlight is active
	pub dim_opacity: f64,
}

/// Hover tooltip style.
#[derive(Clone, Debug)]
pub struct TooltipStyle {
	pub background: Color,
	pub text: Color,
	pub font: &'static str,
	/// Wrap width in screen pixels.
	pub max_width: f64,
}

/// Everything the option builder needs to color a chart.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub tooltip: TooltipStyle,
	pub palette: NodePalette,
}

impl Theme {
	/// Dark theme used on desktop and mobile (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(17, 19, 26),
				color_secondary: Color::rgb(31, 36, 48),
				use_gradient: true,
				vignette: 0.2,
			},
			edge: EdgeStyle {
				color: Color::rgba(150, 164, 186, 0.45),
				highlight_color: Color::rgb(255, 214, 102),
				curved: false,
				curve_tension: 0.0,
			},
			node: NodeStyle {
				use_gradient: true,
				highlight_color: Color::rgb(255, 214, 102),
				highlight_border: Color::rgb(255, 255, 255),
				dim_opacity: 0.35,
			},
			tooltip: TooltipStyle {
				background: Color::rgba(12, 14, 18, 0.92),
				text: Color::rgb(230, 233, 238),
				font: "12px sans-serif",
				max_width: 240.0,
			},
			palette: NodePalette::manuscript(),
		}
	}

	/// High-contrast theme for the TV display
	pub fn broadcast() -> Self {
		Self {
			name: "broadcast",
			background: BackgroundStyle {
				color: Color::rgb(10, 12, 18),
				color_secondary: Color::rgb(18, 22, 32),
				use_gradient: true,
				vignette: 0.25,
			},
			edge: EdgeStyle {
				color: Color::rgba(170, 185, 205, 0.6),
				highlight_color: Color::rgb(255, 235, 59),
				curved: true,
				curve_tension: 0.35,
			},
			node: NodeStyle {
				use_gradient: false,
				highlight_color: Color::rgb(255, 235, 59),
				highlight_border: Color::rgb(255, 255, 255),
				dim_opacity: 0.45,
			},
			tooltip: TooltipStyle {
				background: Color::rgba(0, 0, 0, 0.9),
				text: Color::rgb(255, 255, 255),
				font: "18px sans-serif",
				max_width: 360.0,
			},
			palette: NodePalette::broadcast(),
		}
	}

	/// Theme for a presentation tier.
	pub fn for_tv(is_tv: bool) -> Self {
		if is_tv {
			Self::broadcast()
		} else {
			Self::default_theme()
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
