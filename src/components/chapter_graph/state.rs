//! Simulation state behind the canvas engine.
//!
//! Wraps the `force_graph` physics simulation with per-node styling taken from
//! the chart options, the pan/zoom transform, in-progress drags, and smoothed
//! hover emphasis.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::option::{ChartOption, LayoutKind, LinkOption, NodeOption};
use super::scale::{ScaleConfig, ScaledValues};

/// Per-node styling attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub tooltip: String,
	pub color: String,
	pub border_color: Option<String>,
	pub border_width: f64,
	pub opacity: f64,
	pub shaded: bool,
	/// Diameter in screen pixels at zoom 1.0.
	pub symbol_size: f64,
	pub show_label: bool,
	pub highlighted: bool,
}

impl NodeInfo {
	fn from_option(node: &NodeOption) -> Self {
		Self {
			id: node.id.clone(),
			label: node.name.clone(),
			tooltip: node.tooltip.clone(),
			color: node.item_style.color.clone(),
			border_color: node.item_style.border_color.clone(),
			border_width: node.item_style.border_width,
			opacity: node.item_style.opacity,
			shaded: node.item_style.shaded,
			symbol_size: node.symbol_size,
			show_label: node.label.show,
			highlighted: node.highlighted,
		}
	}
}

/// Styling of one directed edge.
#[derive(Clone, Debug)]
pub struct EdgeVisual {
	/// Node the arrow starts from.
	pub source: DefaultNodeIdx,
	pub color: String,
	/// Screen pixels.
	pub width: f64,
	pub opacity: f64,
	pub curveness: f64,
	pub highlighted: bool,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Smoothed hover emphasis for the hovered node and its neighbors.
///
/// Each node's intensity eases towards 1.0 while it is in the hover set and
/// decays towards 0.0 afterwards, so moving between nodes cross-fades instead
/// of flashing.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub hovered: Option<DefaultNodeIdx>,
	targets: HashSet<DefaultNodeIdx>,
	intensity: HashMap<DefaultNodeIdx, f64>,
}

impl HoverState {
	const FADE_IN_SPEED: f64 = 6.0;
	const FADE_OUT_SPEED: f64 = 4.0;

	pub fn set(&mut self, node: Option<DefaultNodeIdx>, edges: &[(DefaultNodeIdx, DefaultNodeIdx)]) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.targets.clear();
		if let Some(idx) = node {
			self.targets.insert(idx);
			for &(a, b) in edges {
				if a == idx {
					self.targets.insert(b);
				} else if b == idx {
					self.targets.insert(a);
				}
			}
		}
	}

	/// Exponential smoothing: `value += (target - value) * (1 - e^(-speed * dt))`.
	pub fn tick(&mut self, dt: f64) {
		let rise = 1.0 - (-Self::FADE_IN_SPEED * dt).exp();
		let decay = (-Self::FADE_OUT_SPEED * dt).exp();
		for &idx in &self.targets {
			let value = self.intensity.entry(idx).or_insert(0.0);
			*value += (1.0 - *value) * rise;
		}
		let targets = &self.targets;
		self.intensity.retain(|idx, value| {
			if !targets.contains(idx) {
				*value *= decay;
			}
			*value > 0.005
		});
	}

	pub fn node(&self, idx: DefaultNodeIdx) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	pub fn edge(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> f64 {
		(self.node(a) * self.node(b)).sqrt()
	}

	pub fn clear(&mut self) {
		*self = Self::default();
	}
}

/// Series-level settings read from the options.
#[derive(Clone, Debug)]
pub struct SeriesSettings {
	pub layout: LayoutKind,
	pub roam: bool,
	pub draggable: bool,
	pub tooltip: bool,
	pub arrows: bool,
}

impl Default for SeriesSettings {
	fn default() -> Self {
		Self {
			layout: LayoutKind::Force,
			roam: true,
			draggable: true,
			tooltip: true,
			arrows: true,
		}
	}
}

/// Graph simulation plus everything needed to draw and interact with it.
///
/// Created empty when the engine initializes; [`GraphState::apply_option`]
/// fills it and later restyles it in place as long as the node and link sets
/// stay the same.
pub struct GraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edge_visuals: HashMap<(DefaultNodeIdx, DefaultNodeIdx), EdgeVisual>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub settings: SeriesSettings,
	pub scale: ScaleConfig,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	pub highlight_active: bool,
	node_ids: Vec<String>,
	link_ids: Vec<(String, String)>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

/// Order-independent key for an edge between two nodes.
pub fn edge_key(a: DefaultNodeIdx, b: DefaultNodeIdx) -> (DefaultNodeIdx, DefaultNodeIdx) {
	if a <= b { (a, b) } else { (b, a) }
}

fn simulation_parameters(repulsion: f64, edge_length: f64) -> SimulationParameters {
	SimulationParameters {
		force_charge: repulsion as f32,
		force_spring: (0.05 * 80.0 / edge_length.max(1.0)) as f32,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

impl GraphState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: ForceGraph::new(simulation_parameters(150.0, 80.0)),
			edge_visuals: HashMap::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			settings: SeriesSettings::default(),
			scale: ScaleConfig::default(),
			width,
			height,
			flow_time: 0.0,
			highlight_active: false,
			node_ids: Vec::new(),
			link_ids: Vec::new(),
			edges: Vec::new(),
		}
	}

	pub fn node_count(&self) -> usize {
		self.node_ids.len()
	}

	/// Applies new options. Restyles in place when the node and link sets are
	/// unchanged; otherwise rebuilds the simulation, keeping the positions of
	/// nodes that survive.
	pub fn apply_option(&mut self, option: &ChartOption) {
		let Some(series) = option.graph() else {
			log::warn!("chronicles: chart option has no graph series");
			return;
		};

		let node_ids: Vec<String> = series.data.iter().map(|n| n.id.clone()).collect();
		let link_ids: Vec<(String, String)> = series
			.links
			.iter()
			.map(|l| (l.source.clone(), l.target.clone()))
			.collect();
		let layout_changed = self.settings.layout != series.layout;

		self.settings = SeriesSettings {
			layout: series.layout,
			roam: series.roam,
			draggable: series.draggable,
			tooltip: option.tooltip.show,
			arrows: series.edge_symbol[1] == "arrow",
		};
		self.scale = ScaleConfig::for_series(series);
		self.highlight_active = series.data.iter().any(|n| n.highlighted);

		if !layout_changed && node_ids == self.node_ids && link_ids == self.link_ids {
			let styles: HashMap<&str, &NodeOption> =
				series.data.iter().map(|n| (n.id.as_str(), n)).collect();
			self.graph.visit_nodes_mut(|node| {
				if let Some(opt) = styles.get(node.data.user_data.id.as_str()) {
					node.data.user_data = NodeInfo::from_option(opt);
				}
			});
			self.set_edge_visuals(&series.links);
			return;
		}

		self.rebuild(
			series.layout,
			&series.data,
			&series.links,
			series.force.repulsion,
			series.force.edge_length,
		);
		self.node_ids = node_ids;
		self.link_ids = link_ids;
	}

	fn rebuild(
		&mut self,
		layout: LayoutKind,
		nodes: &[NodeOption],
		links: &[LinkOption],
		repulsion: f64,
		edge_length: f64,
	) {
		let mut previous: HashMap<String, (f32, f32)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
		});

		let mut graph = ForceGraph::new(simulation_parameters(repulsion, edge_length));
		let ring = (nodes.len() as f64 * 12.0).max(100.0);
		let mut id_to_idx = HashMap::new();
		for (i, node) in nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / nodes.len().max(1) as f64;
			let on_ring = ((ring * angle.cos()) as f32, (ring * angle.sin()) as f32);
			let (x, y) = match layout {
				LayoutKind::Circular => on_ring,
				LayoutKind::Force => previous.get(&node.id).copied().unwrap_or(on_ring),
			};
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: layout == LayoutKind::Circular,
				user_data: NodeInfo::from_option(node),
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		let mut edges = Vec::new();
		for link in links {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		self.graph = graph;
		self.edges = edges;
		self.hover.clear();
		self.drag = DragState::default();
		self.set_edge_visuals_with(links, &id_to_idx);
	}

	fn set_edge_visuals(&mut self, links: &[LinkOption]) {
		let mut id_to_idx = HashMap::new();
		self.graph.visit_nodes(|node| {
			id_to_idx.insert(node.data.user_data.id.clone(), node.index());
		});
		self.set_edge_visuals_with(links, &id_to_idx);
	}

	fn set_edge_visuals_with(&mut self, links: &[LinkOption], id_to_idx: &HashMap<String, DefaultNodeIdx>) {
		self.edge_visuals.clear();
		for link in links {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				self.edge_visuals.insert(
					edge_key(src, tgt),
					EdgeVisual {
						source: src,
						color: link.line_style.color.clone(),
						width: link.line_style.width,
						opacity: link.line_style.opacity,
						curveness: link.line_style.curveness,
						highlighted: link.highlighted,
					},
				);
			}
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scaled = ScaledValues::new(&self.scale, self.transform.k, self.flow_time);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let radius =
				scaled.node_radius(&self.scale, node.data.user_data.symbol_size) + scaled.hit_slop;
			if (dx * dx + dy * dy).sqrt() < radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.hover.set(node, &self.edges);
	}

	/// Tooltip text and screen anchor for the hovered node, if tooltips are on.
	pub fn tooltip(&self) -> Option<(String, f64, f64)> {
		if !self.settings.tooltip {
			return None;
		}
		let hovered = self.hover.hovered?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == hovered {
				let (sx, sy) = self.graph_to_screen(node.x() as f64, node.y() as f64);
				found = Some((node.data.user_data.tooltip.clone(), sx, sy));
			}
		});
		found
	}

	pub fn tick(&mut self, dt: f32) {
		if self.settings.layout == LayoutKind::Force {
			self.graph.update(dt);
		}
		self.flow_time += dt as f64;
		self.hover.tick(dt as f64);
	}

	/// Keeps the graph centered on a resized surface.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}

	/// Pans by a screen-space delta from the pan start. Ignored unless roaming is on.
	pub fn pan_to(&mut self, x: f64, y: f64) {
		if !self.settings.roam || !self.pan.active {
			return;
		}
		self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
	}

	/// Zooms by `factor` around a screen point. Ignored unless roaming is on.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		if !self.settings.roam {
			return;
		}
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}
}
