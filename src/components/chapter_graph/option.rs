//! Declarative chart options.
//!
//! [`build_chart_option`] combines graph data, the highlight selector and the
//! device tier into a [`ChartOption`]. The shape follows the option objects of
//! common graph-charting engines (one `graph` series holding nodes, links and
//! categories) and serializes with camelCase keys, so the same value can be
//! handed to the canvas engine or to a JavaScript charting library.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::data::ChartData;
use super::theme::Theme;
use crate::chapter::ROOT_PARENT_ID;
use crate::device::DeviceTier;

/// Inputs other than the data that shape the options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OptionParams {
	/// Node id to emphasize, if any. A bare chapter id also matches when it
	/// is shared by several stories; the first such node wins.
	pub highlight_id: Option<String>,
	/// Rendering on the TV display.
	pub is_tv: bool,
	/// Viewport is phone sized.
	pub is_small_device: bool,
	/// Viewport is tablet sized.
	pub is_medium_device: bool,
}

impl OptionParams {
	/// The tier these flags resolve to.
	pub fn tier(&self) -> DeviceTier {
		DeviceTier::resolve(self.is_tv, self.is_small_device, self.is_medium_device)
	}
}

/// Sizing, label and interaction settings for one device tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierPreset {
	/// Base node diameter before child weighting.
	pub node_size: f64,
	/// Label size in pixels at zoom 1.
	pub label_font_size: f64,
	/// Labels on every node, not only the highlighted one.
	pub show_labels: bool,
	/// Zoom below which labels are not drawn.
	pub label_min_zoom: f64,
	/// Pan and zoom allowed.
	pub roam: bool,
	/// Hover tooltips shown.
	pub tooltip: bool,
	/// Force layout node repulsion.
	pub repulsion: f64,
	/// Force layout rest length of an edge.
	pub edge_length: f64,
	/// Edge stroke width.
	pub edge_width: f64,
}

impl TierPreset {
	/// Preset for `tier`.
	pub fn for_tier(tier: DeviceTier) -> Self {
		match tier {
			DeviceTier::Tv => Self {
				node_size: 22.0,
				label_font_size: 18.0,
				show_labels: true,
				label_min_zoom: 0.2,
				roam: false,
				tooltip: false,
				repulsion: 260.0,
				edge_length: 120.0,
				edge_width: 2.5,
			},
			DeviceTier::Medium => Self {
				node_size: 14.0,
				label_font_size: 11.0,
				show_labels: true,
				label_min_zoom: 0.6,
				roam: true,
				tooltip: true,
				repulsion: 150.0,
				edge_length: 80.0,
				edge_width: 1.5,
			},
			DeviceTier::Small => Self {
				node_size: 10.0,
				label_font_size: 9.0,
				show_labels: false,
				label_min_zoom: 1.2,
				roam: true,
				tooltip: true,
				repulsion: 90.0,
				edge_length: 50.0,
				edge_width: 1.0,
			},
		}
	}
}

/// Node placement algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
	/// Physics simulation.
	Force,
	/// Evenly spaced on a circle, no simulation.
	Circular,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipOption {
	pub show: bool,
	pub trigger: &'static str,
	pub background_color: String,
	pub text_color: String,
	pub font: &'static str,
	/// Wrap width in screen pixels.
	pub max_width: f64,
}

/// Canvas backdrop behind the graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackdropOption {
	pub color: String,
	/// Center color of the radial gradient; `None` for a flat fill.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub gradient_color: Option<String>,
	/// Edge darkening, 0.0 (none) to 1.0.
	pub vignette: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelOption {
	pub show: bool,
	pub position: &'static str,
	pub font_size: f64,
	pub min_zoom: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceOption {
	pub repulsion: f64,
	pub edge_length: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOption {
	pub name: String,
	pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
	pub color: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub border_color: Option<String>,
	pub border_width: f64,
	pub opacity: f64,
	/// Radial shading instead of a flat fill.
	pub shaded: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLabel {
	pub show: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOption {
	pub id: String,
	pub name: String,
	pub tooltip: String,
	pub category: usize,
	pub symbol_size: f64,
	pub item_style: ItemStyle,
	pub label: NodeLabel,
	pub highlighted: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
	pub color: String,
	pub width: f64,
	pub opacity: f64,
	pub curveness: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOption {
	pub source: String,
	pub target: String,
	pub line_style: LineStyle,
	pub highlighted: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSeries {
	#[serde(rename = "type")]
	pub kind: &'static str,
	pub layout: LayoutKind,
	pub roam: bool,
	pub draggable: bool,
	pub label: LabelOption,
	pub force: ForceOption,
	pub edge_symbol: [&'static str; 2],
	pub categories: Vec<CategoryOption>,
	pub data: Vec<NodeOption>,
	pub links: Vec<LinkOption>,
}

/// Everything the chart engine needs to draw one frame of the graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
	pub backdrop: BackdropOption,
	pub tooltip: TooltipOption,
	pub series: Vec<GraphSeries>,
}

impl ChartOption {
	/// The graph series; every option built here has exactly one.
	pub fn graph(&self) -> Option<&GraphSeries> {
		self.series.first()
	}

	/// Ids of nodes marked highlighted.
	pub fn highlighted_nodes(&self) -> Vec<&str> {
		self.graph()
			.map(|s| {
				s.data
					.iter()
					.filter(|n| n.highlighted)
					.map(|n| n.id.as_str())
					.collect()
			})
			.unwrap_or_default()
	}

	/// `(source, target)` of links marked highlighted.
	pub fn highlighted_links(&self) -> Vec<(&str, &str)> {
		self.graph()
			.map(|s| {
				s.links
					.iter()
					.filter(|l| l.highlighted)
					.map(|l| (l.source.as_str(), l.target.as_str()))
					.collect()
			})
			.unwrap_or_default()
	}
}

/// The highlighted node and the edges on its ancestor path.
struct Highlight {
	node: usize,
	path_edges: HashSet<(String, String)>,
}

/// Node lookups for highlight resolution.
struct NodeIndex<'a> {
	by_node_id: HashMap<&'a str, usize>,
	/// `(story, chapter)` to node; chapter ids only repeat across stories.
	by_chapter: HashMap<(u64, u64), usize>,
}

impl<'a> NodeIndex<'a> {
	fn new(data: &'a ChartData) -> Self {
		let mut by_node_id = HashMap::with_capacity(data.nodes.len());
		let mut by_chapter = HashMap::with_capacity(data.nodes.len());
		for (i, n) in data.nodes.iter().enumerate() {
			by_node_id.insert(n.id.as_str(), i);
			by_chapter.insert((n.story_id, n.chapter_id), i);
		}
		Self {
			by_node_id,
			by_chapter,
		}
	}

	/// Exact node id first, then the first node with that chapter id.
	fn find(&self, data: &ChartData, id: &str) -> Option<usize> {
		let id = id.trim();
		if let Some(&i) = self.by_node_id.get(id) {
			return Some(i);
		}
		let chapter_id: u64 = id.parse().ok()?;
		data.nodes.iter().position(|n| n.chapter_id == chapter_id)
	}
}

fn resolve_highlight(data: &ChartData, index: &NodeIndex<'_>, id: &str) -> Option<Highlight> {
	let node_idx = index.find(data, id)?;
	let node = &data.nodes[node_idx];
	let story_id = node.story_id;

	let mut chain: Vec<u64> = node.path.clone();
	if chain.last() != Some(&node.chapter_id) {
		chain.push(node.chapter_id);
	}
	if chain.len() < 2 {
		// No usable precomputed path; walk parents instead.
		chain.clear();
		let mut current = node;
		chain.push(current.chapter_id);
		for _ in 0..data.nodes.len() {
			if current.parent_id == ROOT_PARENT_ID {
				break;
			}
			let Some(&parent_idx) = index.by_chapter.get(&(story_id, current.parent_id)) else {
				break;
			};
			current = &data.nodes[parent_idx];
			chain.push(current.chapter_id);
		}
		chain.reverse();
	}

	let node_id = |chapter_id: u64| {
		index
			.by_chapter
			.get(&(story_id, chapter_id))
			.map(|&i| data.nodes[i].id.clone())
	};
	let path_edges = chain
		.windows(2)
		.filter_map(|pair| Some((node_id(pair[0])?, node_id(pair[1])?)))
		.collect();
	Some(Highlight {
		node: node_idx,
		path_edges,
	})
}

/// Builds the chart options. Never fails: an unknown highlight id just yields
/// options with nothing highlighted.
pub fn build_chart_option(data: &ChartData, params: &OptionParams, theme: &Theme) -> ChartOption {
	let preset = TierPreset::for_tier(params.tier());
	let index = NodeIndex::new(data);
	let highlight = params
		.highlight_id
		.as_deref()
		.and_then(|id| resolve_highlight(data, &index, id));
	if let (Some(id), None) = (params.highlight_id.as_deref(), highlight.as_ref()) {
		log::debug!("chronicles: highlight {id:?} matches no chapter");
	}
	let dim = if highlight.is_some() {
		theme.node.dim_opacity
	} else {
		1.0
	};

	// Continuations per node, for size weighting.
	let mut children: HashMap<&str, usize> = HashMap::new();
	for link in &data.links {
		*children.entry(link.source.as_str()).or_insert(0) += 1;
	}
	let max_children = children.values().copied().max().unwrap_or(1).max(1);

	let nodes = data
		.nodes
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let highlighted = highlight.as_ref().is_some_and(|h| h.node == i);
			let child_factor = (children.get(node.id.as_str()).copied().unwrap_or(0) as f64
				/ max_children as f64)
				.sqrt();
			let mut size = preset.node_size * (1.0 + 0.5 * child_factor);
			let item_style = if highlighted {
				size *= 1.6;
				ItemStyle {
					color: theme.node.highlight_color.to_css(),
					border_color: Some(theme.node.highlight_border.to_css()),
					border_width: 2.0,
					opacity: 1.0,
					shaded: theme.node.use_gradient,
				}
			} else {
				ItemStyle {
					color: theme.palette.get(node.category).to_css(),
					border_color: None,
					border_width: 0.0,
					opacity: dim,
					shaded: theme.node.use_gradient,
				}
			};
			NodeOption {
				id: node.id.clone(),
				name: node.name.clone(),
				tooltip: node.tooltip.clone(),
				category: node.category,
				symbol_size: size,
				item_style,
				label: NodeLabel {
					show: preset.show_labels || highlighted,
				},
				highlighted,
			}
		})
		.collect();

	let curveness = if theme.edge.curved {
		theme.edge.curve_tension
	} else {
		0.0
	};
	let links = data
		.links
		.iter()
		.map(|link| {
			let highlighted = highlight.as_ref().is_some_and(|h| {
				h.path_edges
					.contains(&(link.source.clone(), link.target.clone()))
			});
			let line_style = if highlighted {
				LineStyle {
					color: theme.edge.highlight_color.to_css(),
					width: preset.edge_width * 2.0,
					opacity: 1.0,
					curveness,
				}
			} else {
				LineStyle {
					color: theme.edge.color.to_css(),
					width: preset.edge_width,
					opacity: dim,
					curveness,
				}
			};
			LinkOption {
				source: link.source.clone(),
				target: link.target.clone(),
				line_style,
				highlighted,
			}
		})
		.collect();

	let categories = data
		.categories
		.iter()
		.enumerate()
		.map(|(i, story_id)| CategoryOption {
			name: format!("Story {story_id}"),
			color: theme.palette.get(i).to_css(),
		})
		.collect();

	let layout = if data.links.is_empty() && !data.nodes.is_empty() {
		LayoutKind::Circular
	} else {
		LayoutKind::Force
	};

	ChartOption {
		backdrop: BackdropOption {
			color: theme.background.color.to_css(),
			gradient_color: theme
				.background
				.use_gradient
				.then(|| theme.background.color_secondary.to_css()),
			vignette: theme.background.vignette,
		},
		tooltip: TooltipOption {
			show: preset.tooltip,
			trigger: "item",
			background_color: theme.tooltip.background.to_css(),
			text_color: theme.tooltip.text.to_css(),
			font: theme.tooltip.font,
			max_width: theme.tooltip.max_width,
		},
		series: vec![GraphSeries {
			kind: "graph",
			layout,
			roam: preset.roam,
			draggable: preset.roam,
			label: LabelOption {
				show: preset.show_labels,
				position: "right",
				font_size: preset.label_font_size,
				min_zoom: preset.label_min_zoom,
			},
			force: ForceOption {
				repulsion: preset.repulsion,
				edge_length: preset.edge_length,
			},
			edge_symbol: ["none", "arrow"],
			categories,
			data: nodes,
			links,
		}],
	}
}

#[cfg(test)]
mod tests {
	use super::super::data::build_chart_data;
	use super::*;
	use crate::chapter::ChapterRecord;

	fn record(id: u64, parent_id: u64, path: &[u64]) -> ChapterRecord {
		ChapterRecord {
			id,
			parent_id,
			story_id: 1,
			path: path.to_vec(),
			content: format!("chapter {id}"),
			..Default::default()
		}
	}

	fn two_chapters() -> ChartData {
		build_chart_data(&[record(1, 0, &[1]), record(2, 1, &[1, 2])])
	}

	fn params(highlight: Option<&str>) -> OptionParams {
		OptionParams {
			highlight_id: highlight.map(String::from),
			is_medium_device: true,
			..Default::default()
		}
	}

	#[test]
	fn highlight_marks_node_and_incoming_path() {
		let option = build_chart_option(&two_chapters(), &params(Some("2")), &Theme::default());
		assert_eq!(option.highlighted_nodes(), vec!["2"]);
		assert_eq!(option.highlighted_links(), vec![("1", "2")]);

		let series = option.graph().unwrap();
		let node1 = &series.data[0];
		assert!(!node1.highlighted);
		assert!(node1.item_style.opacity < 1.0);
		assert_eq!(series.data[1].item_style.opacity, 1.0);
	}

	#[test]
	fn unknown_highlight_is_a_no_op() {
		let data = two_chapters();
		let theme = Theme::default();
		let missing = build_chart_option(&data, &params(Some("42")), &theme);
		let none = build_chart_option(&data, &params(None), &theme);
		assert!(missing.highlighted_nodes().is_empty());
		assert!(missing.highlighted_links().is_empty());
		assert_eq!(missing, none);
		assert!(none.graph().unwrap().data.iter().all(|n| n.item_style.opacity == 1.0));
	}

	#[test]
	fn ancestors_stay_unmarked_along_long_path() {
		let data = build_chart_data(&[
			record(1, 0, &[1]),
			record(2, 1, &[1, 2]),
			record(3, 2, &[1, 2, 3]),
			record(4, 2, &[1, 2, 4]),
		]);
		let option = build_chart_option(&data, &params(Some("3")), &Theme::default());
		assert_eq!(option.highlighted_nodes(), vec!["3"]);
		assert_eq!(option.highlighted_links(), vec![("1", "2"), ("2", "3")]);
	}

	#[test]
	fn parent_chain_is_used_without_path() {
		let data = build_chart_data(&[record(1, 0, &[]), record(2, 1, &[]), record(3, 2, &[])]);
		let option = build_chart_option(&data, &params(Some("3")), &Theme::default());
		assert_eq!(option.highlighted_links(), vec![("1", "2"), ("2", "3")]);
	}

	#[test]
	fn highlight_path_stays_in_its_story() {
		let in_story = |story_id, id, parent_id, path: &[u64]| ChapterRecord {
			story_id,
			..record(id, parent_id, path)
		};
		let data = build_chart_data(&[
			in_story(1, 1, 0, &[1]),
			in_story(1, 2, 1, &[1, 2]),
			in_story(2, 1, 0, &[1]),
			in_story(2, 2, 1, &[1, 2]),
			in_story(2, 3, 2, &[]),
		]);
		let option = build_chart_option(&data, &params(Some("2:2")), &Theme::default());
		assert_eq!(option.highlighted_nodes(), vec!["2:2"]);
		assert_eq!(option.highlighted_links(), vec![("2:1", "2:2")]);

		// Parent walk through shared ids, and a bare chapter id.
		let option = build_chart_option(&data, &params(Some("3")), &Theme::default());
		assert_eq!(option.highlighted_nodes(), vec!["3"]);
		assert_eq!(
			option.highlighted_links(),
			vec![("2:1", "2:2"), ("2:2", "3")]
		);
		let option = build_chart_option(&data, &params(Some("1")), &Theme::default());
		assert_eq!(option.highlighted_nodes(), vec!["1:1"]);
	}

	#[test]
	fn never_fails_for_any_flag_combination() {
		let data = two_chapters();
		for highlight in [Some("2"), Some("nope"), None] {
			for bits in 0..8u8 {
				let params = OptionParams {
					highlight_id: highlight.map(String::from),
					is_tv: bits & 1 != 0,
					is_small_device: bits & 2 != 0,
					is_medium_device: bits & 4 != 0,
				};
				let option = build_chart_option(&data, &params, &Theme::for_tv(params.is_tv));
				let series = option.graph().unwrap();
				assert_eq!(series.data.len(), 2);
				assert_eq!(series.links.len(), 1);
				let expected = usize::from(highlight == Some("2"));
				assert_eq!(option.highlighted_nodes().len(), expected);
			}
		}
	}

	#[test]
	fn tier_controls_labels_and_interaction() {
		let data = two_chapters();
		let theme = Theme::default();
		let small = OptionParams {
			is_small_device: true,
			..Default::default()
		};
		let tv = OptionParams {
			is_tv: true,
			is_small_device: true,
			..Default::default()
		};

		let small_opt = build_chart_option(&data, &small, &theme);
		let small_series = small_opt.graph().unwrap();
		assert!(!small_series.label.show);
		assert!(small_series.roam);
		assert!(small_opt.tooltip.show);

		let tv_opt = build_chart_option(&data, &tv, &theme);
		let tv_series = tv_opt.graph().unwrap();
		assert!(tv_series.label.show);
		assert!(!tv_series.roam);
		assert!(!tv_opt.tooltip.show);
		assert!(tv_series.label.font_size > small_series.label.font_size);
	}

	#[test]
	fn small_tier_still_labels_the_highlighted_node() {
		let small = OptionParams {
			highlight_id: Some("2".into()),
			is_small_device: true,
			..Default::default()
		};
		let option = build_chart_option(&two_chapters(), &small, &Theme::default());
		let labels: Vec<bool> = option.graph().unwrap().data.iter().map(|n| n.label.show).collect();
		assert_eq!(labels, vec![false, true]);
	}

	#[test]
	fn layout_is_circular_without_links() {
		let roots = build_chart_data(&[record(1, 0, &[1]), record(5, 0, &[5])]);
		let theme = Theme::default();
		assert_eq!(
			build_chart_option(&roots, &params(None), &theme).graph().unwrap().layout,
			LayoutKind::Circular
		);
		assert_eq!(
			build_chart_option(&two_chapters(), &params(None), &theme).graph().unwrap().layout,
			LayoutKind::Force
		);
	}

	#[test]
	fn empty_data_gives_valid_empty_option() {
		let option = build_chart_option(&ChartData::default(), &params(Some("1")), &Theme::default());
		let series = option.graph().unwrap();
		assert!(series.data.is_empty());
		assert!(series.links.is_empty());
		assert_eq!(series.layout, LayoutKind::Force);
	}

	#[test]
	fn serializes_with_chart_engine_keys() {
		let option = build_chart_option(&two_chapters(), &params(Some("2")), &Theme::default());
		let json = serde_json::to_value(&option).unwrap();
		let series = &json["series"][0];
		assert_eq!(series["type"], "graph");
		assert_eq!(series["layout"], "force");
		assert_eq!(series["edgeSymbol"][1], "arrow");
		assert!(series["data"][1]["symbolSize"].is_number());
		assert_eq!(series["data"][1]["itemStyle"]["borderWidth"], 2.0);
		assert!(series["data"][0]["itemStyle"].get("borderColor").is_none());
		assert_eq!(series["links"][0]["lineStyle"]["opacity"], 1.0);
	}
}
