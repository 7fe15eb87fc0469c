//! Graph data built from chapter records: one node per chapter, one directed
//! link from each chapter to its continuation.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::chapter::{ChapterRecord, ROOT_PARENT_ID, short_address};

/// Longest node label, in characters, before it is cut with an ellipsis.
const LABEL_MAX_CHARS: usize = 24;
/// Longest content excerpt shown in a tooltip.
const TOOLTIP_MAX_CHARS: usize = 120;

/// A chapter in the graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartNode {
	/// Node id used by links and highlights: the decimal chapter id, or
	/// `<story>:<id>` when another story reuses the same chapter id.
	pub id: String,
	/// Chapter id within its story.
	pub chapter_id: u64,
	/// Short label derived from the chapter content.
	pub name: String,
	/// Longer hover text: id, author and a content excerpt.
	pub tooltip: String,
	/// Index into [`ChartData::categories`].
	pub category: usize,
	/// Story the chapter belongs to.
	pub story_id: u64,
	/// Chapter this one continues; 0 for a story root.
	pub parent_id: u64,
	/// Ancestor chapter ids, root first, ending with this chapter.
	pub path: Vec<u64>,
}

impl ChartNode {
	fn from_record(record: &ChapterRecord, category: usize) -> Self {
		Self {
			id: record.id.to_string(),
			chapter_id: record.id,
			name: node_label(record),
			tooltip: node_tooltip(record),
			category,
			story_id: record.story_id,
			parent_id: record.parent_id,
			path: record.path.clone(),
		}
	}
}

/// A directed edge from a chapter to one that continues it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChartLink {
	/// Parent node id.
	pub source: String,
	/// Child node id.
	pub target: String,
}

/// A record that could not be represented faithfully in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphIssue {
	/// Parent id not present in the data; the edge was dropped.
	DanglingParent {
		/// Chapter whose edge was dropped.
		id: u64,
		/// Missing parent.
		parent_id: u64,
	},
	/// Parent belongs to another story; the edge was dropped.
	CrossStoryParent {
		/// Chapter whose edge was dropped.
		id: u64,
		/// Parent found only in other stories.
		parent_id: u64,
	},
	/// Chapter names itself as parent; the edge was dropped.
	SelfParent {
		/// The offending chapter.
		id: u64,
	},
	/// A later record with the same story and id replaced an earlier one.
	DuplicateId {
		/// The repeated chapter id.
		id: u64,
	},
}

impl fmt::Display for GraphIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GraphIssue::DanglingParent { id, parent_id } => {
				write!(f, "chapter {id} continues unknown chapter {parent_id}")
			}
			GraphIssue::CrossStoryParent { id, parent_id } => {
				write!(f, "chapter {id} continues chapter {parent_id} from another story")
			}
			GraphIssue::SelfParent { id } => write!(f, "chapter {id} continues itself"),
			GraphIssue::DuplicateId { id } => write!(f, "chapter {id} appears more than once"),
		}
	}
}

/// Complete graph data: nodes, links and the bookkeeping around them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChartData {
	/// One node per distinct `(story, chapter)` pair, in first-seen order.
	pub nodes: Vec<ChartNode>,
	/// Parent to child edges, at most one per node.
	pub links: Vec<ChartLink>,
	/// Distinct story ids in first-seen order; node categories index into this.
	pub categories: Vec<u64>,
	/// Highest chapter id seen, 0 for no data.
	pub data_last_id: u64,
	/// Everything the build had to drop or replace.
	pub issues: Vec<GraphIssue>,
}

impl ChartData {
	/// True when there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Node by its node id (see [`ChartNode::id`]).
	pub fn node(&self, id: &str) -> Option<&ChartNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// Chapter ids are only unique within a story, so nodes are keyed on both.
type ChapterKey = (u64, u64);

fn chapter_key(record: &ChapterRecord) -> ChapterKey {
	(record.story_id, record.id)
}

/// Builds the chapter graph.
///
/// Never rejects input: a repeated `(story, id)` pair keeps the last record,
/// and edges that would dangle or cross stories are dropped. Both are
/// reported in [`ChartData::issues`].
///
/// Node ids are the decimal chapter id. A chapter id used by more than one
/// story gets `<story>:<id>` instead, so node ids stay unique.
pub fn build_chart_data(records: &[ChapterRecord]) -> ChartData {
	let mut latest: Vec<&ChapterRecord> = Vec::with_capacity(records.len());
	let mut categories: Vec<u64> = Vec::new();
	let mut issues = Vec::new();
	let mut by_key: HashMap<ChapterKey, usize> = HashMap::with_capacity(records.len());
	let mut stories_per_id: HashMap<u64, HashSet<u64>> = HashMap::new();
	let mut data_last_id = 0;

	for record in records {
		data_last_id = data_last_id.max(record.id);
		if !categories.contains(&record.story_id) {
			categories.push(record.story_id);
		}
		stories_per_id
			.entry(record.id)
			.or_default()
			.insert(record.story_id);
		match by_key.get(&chapter_key(record)) {
			Some(&pos) => {
				issues.push(GraphIssue::DuplicateId { id: record.id });
				latest[pos] = record;
			}
			None => {
				by_key.insert(chapter_key(record), latest.len());
				latest.push(record);
			}
		}
	}

	let nodes: Vec<ChartNode> = latest
		.iter()
		.map(|record| {
			let category = categories
				.iter()
				.position(|&s| s == record.story_id)
				.unwrap_or_default();
			let mut node = ChartNode::from_record(record, category);
			if stories_per_id.get(&record.id).is_some_and(|s| s.len() > 1) {
				node.id = format!("{}:{}", record.story_id, record.id);
			}
			node
		})
		.collect();

	let mut links = Vec::new();
	let mut seen: HashSet<(usize, usize)> = HashSet::new();
	for (child_idx, node) in nodes.iter().enumerate() {
		let (id, parent_id) = (node.chapter_id, node.parent_id);
		if parent_id == ROOT_PARENT_ID {
			continue;
		}
		if parent_id == id {
			issues.push(GraphIssue::SelfParent { id });
			continue;
		}
		match by_key.get(&(node.story_id, parent_id)) {
			Some(&parent_idx) => {
				if seen.insert((parent_idx, child_idx)) {
					links.push(ChartLink {
						source: nodes[parent_idx].id.clone(),
						target: node.id.clone(),
					});
				}
			}
			None if stories_per_id.contains_key(&parent_id) => {
				issues.push(GraphIssue::CrossStoryParent { id, parent_id })
			}
			None => issues.push(GraphIssue::DanglingParent { id, parent_id }),
		}
	}

	for issue in &issues {
		log::warn!("chronicles: {issue}");
	}

	ChartData {
		nodes,
		links,
		categories,
		data_last_id,
		issues,
	}
}

fn truncate_chars(text: &str, max: usize) -> String {
	let mut chars = text.chars();
	let head: String = chars.by_ref().take(max).collect();
	if chars.next().is_some() {
		format!("{}…", head.trim_end())
	} else {
		head
	}
}

fn node_label(record: &ChapterRecord) -> String {
	let first_line = record.content.lines().map(str::trim).find(|l| !l.is_empty());
	match first_line {
		Some(line) => truncate_chars(line, LABEL_MAX_CHARS),
		None => format!("#{}", record.id),
	}
}

fn node_tooltip(record: &ChapterRecord) -> String {
	let excerpt = truncate_chars(record.content.trim(), TOOLTIP_MAX_CHARS);
	let author = if record.is_anonymous || record.wallet_address.is_empty() {
		"anonymous".to_string()
	} else {
		short_address(&record.wallet_address)
	};
	if excerpt.is_empty() {
		format!("#{} · {author}", record.id)
	} else {
		format!("#{} · {author}\n{excerpt}", record.id)
	}
}
