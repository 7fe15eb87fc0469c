//! Canvas rendering for the chapter graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Backdrop (screen space)
//! 2. Edges, with the highlighted path drawn last (world space)
//! 3. Dimmed and plain nodes, then highlighted and hovered nodes on top
//! 4. Vignette and tooltip (screen space)

use std::f64::consts::PI;

use force_graph::Node;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::option::{BackdropOption, TooltipOption};
use super::scale::ScaledValues;
use super::state::{GraphState, NodeInfo, edge_key};
use super::theme::Color;

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders one frame.
pub fn render(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	backdrop: &BackdropOption,
	tooltip: &TooltipOption,
) {
	let scaled = ScaledValues::new(&state.scale, state.transform.k, state.flow_time);

	draw_backdrop(state, ctx, backdrop);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scaled, false);
	draw_edges(state, ctx, &scaled, true);
	draw_nodes(state, ctx, &scaled);

	ctx.restore();

	if backdrop.vignette > 0.0 {
		draw_vignette(state, ctx, backdrop.vignette);
	}
	if let Some((text, x, y)) = state.tooltip() {
		draw_tooltip(state, ctx, tooltip, &text, x, y);
	}
}

fn draw_backdrop(state: &GraphState, ctx: &CanvasRenderingContext2d, backdrop: &BackdropOption) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let gradient = backdrop.gradient_color.as_ref().and_then(|inner| {
		let g = ctx
			.create_radial_gradient(cx, cy, 0.0, cx, cy, state.width.max(state.height) * 0.8)
			.ok()?;
		g.add_color_stop(0.0, inner).ok()?;
		g.add_color_stop(1.0, &backdrop.color).ok()?;
		Some(g)
	});
	match gradient {
		#[allow(deprecated)]
		Some(g) => ctx.set_fill_style(&g),
		None => ctx.set_fill_style_str(&backdrop.color),
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &GraphState, ctx: &CanvasRenderingContext2d, strength: f64) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let Ok(gradient) = ctx.create_radial_gradient(
		cx,
		cy,
		state.width.min(state.height) * 0.3,
		cx,
		cy,
		state.width.max(state.height) * 0.7,
	) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(1.0, &format!("rgba(0, 0, 0, {strength})"));
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scaled: &ScaledValues,
	highlighted_pass: bool,
) {
	state.graph.visit_edges(|n1, n2, _| {
		let Some(visual) = state.edge_visuals.get(&edge_key(n1.index(), n2.index())) else {
			return;
		};
		if visual.highlighted != highlighted_pass {
			return;
		}
		let (from, to) = if visual.source == n1.index() {
			(n1, n2)
		} else {
			(n2, n1)
		};

		let (x1, y1, x2, y2) = (from.x() as f64, from.y() as f64, to.x() as f64, to.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let r_from = scaled.node_radius(&state.scale, from.data.user_data.symbol_size);
		let r_to = scaled.node_radius(&state.scale, to.data.user_data.symbol_size);

		let hover_t = smooth_step(state.hover.edge(from.index(), to.index()));
		let alpha = visual.opacity + (1.0 - visual.opacity) * hover_t;
		let width = scaled.line_width(visual.width) * (1.0 + 0.4 * hover_t);
		let color = Color::parse(&visual.color);
		let arrow = if state.settings.arrows && scaled.arrow_alpha > 0.05 {
			scaled.arrow_size
		} else {
			0.0
		};

		ctx.set_stroke_style_str(&color.with_alpha(alpha * color.a).to_css());
		ctx.set_line_width(width);

		let gap = scaled.dash_pattern.1 * scaled.dash_alpha;
		if visual.highlighted && gap > 0.1 {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(scaled.dash_pattern.0),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(scaled.dash_offset);
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		let (sx, sy) = (x1 + ux * r_from, y1 + uy * r_from);
		let (ex, ey) = (x2 - ux * (r_to + arrow), y2 - uy * (r_to + arrow));
		ctx.begin_path();
		ctx.move_to(sx, sy);
		if visual.curveness > 0.0 && dist > (r_from + r_to) * 2.0 {
			let bend = dist * visual.curveness * 0.3;
			let (mx, my) = ((x1 + x2) / 2.0 - uy * bend, (y1 + y2) / 2.0 + ux * bend);
			ctx.quadratic_curve_to(mx, my, ex, ey);
		} else {
			ctx.line_to(ex, ey);
		}
		ctx.stroke();

		if arrow > 0.0 {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
			ctx.set_fill_style_str(
				&color
					.with_alpha(alpha * color.a * scaled.arrow_alpha)
					.to_css(),
			);
			let (tip_x, tip_y) = (x2 - ux * r_to, y2 - uy * r_to);
			let (back_x, back_y) = (tip_x - ux * arrow, tip_y - uy * arrow);
			let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &GraphState, ctx: &CanvasRenderingContext2d, scaled: &ScaledValues) {
	let on_top = |node: &Node<NodeInfo>| {
		node.data.user_data.highlighted || state.hover.node(node.index()) > 0.001
	};

	state.graph.visit_nodes(|node| {
		if !on_top(node) {
			draw_node(state, ctx, scaled, node);
		}
	});
	state.graph.visit_nodes(|node| {
		if on_top(node) {
			draw_node(state, ctx, scaled, node);
		}
	});
}

fn draw_node(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scaled: &ScaledValues,
	node: &Node<NodeInfo>,
) {
	let info = &node.data.user_data;
	let (x, y) = (node.x() as f64, node.y() as f64);
	let hover_t = smooth_step(state.hover.node(node.index()));
	let alpha = info.opacity + (1.0 - info.opacity) * hover_t;
	let radius = scaled.node_radius(&state.scale, info.symbol_size) * (1.0 + 0.25 * hover_t);

	ctx.set_global_alpha(alpha);

	let base = Color::parse(&info.color);
	let fill = info
		.shaded
		.then(|| ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius))
		.and_then(Result::ok)
		.and_then(|g| {
			g.add_color_stop(0.0, &base.lighten(0.4).to_css()).ok()?;
			g.add_color_stop(0.7, &base.to_css()).ok()?;
			g.add_color_stop(1.0, &base.darken(0.2).to_css()).ok()?;
			Some(g)
		});
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match fill {
		#[allow(deprecated)]
		Some(g) => ctx.set_fill_style(&g),
		None => ctx.set_fill_style_str(&info.color),
	}
	ctx.fill();

	if let Some(border) = &info.border_color {
		if info.border_width > 0.0 {
			let ring = scaled.line_width(info.border_width);
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + ring, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(border);
			ctx.set_line_width(ring);
			ctx.stroke();
		}
	}

	let show_label = hover_t > 0.5
		|| info.highlighted
		|| (info.show_label && scaled.labels_visible);
	if show_label && !info.label.is_empty() {
		ctx.set_global_alpha(alpha * 0.9);
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
		ctx.set_font(&scaled.label_font);
		let _ = ctx.fill_text(&info.label, x + radius + 4.0 / scaled.k, y + 3.0 / scaled.k);
	}

	ctx.set_global_alpha(1.0);
}

/// Greedy word wrap against the current canvas font.
fn wrap_lines(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> Vec<String> {
	let measure = |s: &str| ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0);
	let mut lines = Vec::new();
	for paragraph in text.lines() {
		let mut line = String::new();
		for word in paragraph.split_whitespace() {
			let candidate = if line.is_empty() {
				word.to_string()
			} else {
				format!("{line} {word}")
			};
			if !line.is_empty() && measure(&candidate) > max_width {
				lines.push(std::mem::replace(&mut line, word.to_string()));
			} else {
				line = candidate;
			}
		}
		lines.push(line);
	}
	lines
}

fn draw_tooltip(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	style: &TooltipOption,
	text: &str,
	anchor_x: f64,
	anchor_y: f64,
) {
	const PADDING: f64 = 8.0;
	const OFFSET: f64 = 14.0;

	ctx.set_font(style.font);
	let lines = wrap_lines(ctx, text, style.max_width);
	let line_height = ctx
		.measure_text("M")
		.map(|m| m.width() * 1.6)
		.unwrap_or(16.0);
	let content_width = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let (w, h) = (
		content_width + PADDING * 2.0,
		line_height * lines.len() as f64 + PADDING * 2.0,
	);

	// Flip to the other side of the cursor near the canvas edges.
	let mut x = anchor_x + OFFSET;
	let mut y = anchor_y + OFFSET;
	if x + w > state.width {
		x = (anchor_x - OFFSET - w).max(0.0);
	}
	if y + h > state.height {
		y = (anchor_y - OFFSET - h).max(0.0);
	}

	ctx.set_fill_style_str(&style.background_color);
	ctx.fill_rect(x, y, w, h);
	ctx.set_fill_style_str(&style.text_color);
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + PADDING, y + PADDING + line_height * (i as f64 + 0.75));
	}
}
