//! Chapter data sources.
//!
//! The graph only ever asks a source for "chapters newer than `since_id`", so a
//! network-backed source can replace the bundled fixture without touching the
//! chart builders.

use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::chapter::ChapterRecord;

/// Fixture shipped with the app until a live backend exists.
const BUNDLED_CHAPTERS: &str = include_str!("../data/chapters.json");

/// Default id of the `<script type="application/json">` element read by [`ScriptSource`].
pub const CHAPTER_DATA_ELEMENT_ID: &str = "chapter-data";

/// Errors raised while loading chapter records.
#[derive(Debug, Error)]
pub enum SourceError {
	#[error("chapter data is not valid JSON: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("no element with id `{0}` in the document")]
	MissingElement(&'static str),
	#[error("no browser document available")]
	NoDocument,
}

/// Anything that can produce chapter records.
pub trait ChapterSource {
	/// Returns every known record whose id is greater than `since_id`, in source order.
	fn fetch(&self, since_id: u64) -> Result<Vec<ChapterRecord>, SourceError>;
}

fn newer_than(records: &[ChapterRecord], since_id: u64) -> Vec<ChapterRecord> {
	records.iter().filter(|r| r.id > since_id).cloned().collect()
}

/// In-memory source backed by a fixed list of records.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
	records: Vec<ChapterRecord>,
}

impl StaticSource {
	pub fn new(records: Vec<ChapterRecord>) -> Self {
		Self { records }
	}

	/// Parses the fixture bundled into the binary.
	pub fn bundled() -> Result<Self, SourceError> {
		Ok(Self::new(serde_json::from_str(BUNDLED_CHAPTERS)?))
	}
}

impl ChapterSource for StaticSource {
	fn fetch(&self, since_id: u64) -> Result<Vec<ChapterRecord>, SourceError> {
		Ok(newer_than(&self.records, since_id))
	}
}

/// Reads records from a JSON `<script>` element embedded in the host page.
#[derive(Clone, Debug)]
pub struct ScriptSource {
	element_id: &'static str,
}

impl ScriptSource {
	pub fn new(element_id: &'static str) -> Self {
		Self { element_id }
	}

	fn read_text(&self) -> Result<String, SourceError> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or(SourceError::NoDocument)?;
		let script: HtmlScriptElement = document
			.get_element_by_id(self.element_id)
			.and_then(|el| el.dyn_into().ok())
			.ok_or(SourceError::MissingElement(self.element_id))?;
		script
			.text()
			.map_err(|_| SourceError::MissingElement(self.element_id))
	}
}

impl Default for ScriptSource {
	fn default() -> Self {
		Self::new(CHAPTER_DATA_ELEMENT_ID)
	}
}

impl ChapterSource for ScriptSource {
	fn fetch(&self, since_id: u64) -> Result<Vec<ChapterRecord>, SourceError> {
		let records: Vec<ChapterRecord> = serde_json::from_str(&self.read_text()?)?;
		Ok(newer_than(&records, since_id))
	}
}

/// Tries the page-embedded data first and falls back to the bundled fixture.
pub fn default_source() -> Box<dyn ChapterSource> {
	let script = ScriptSource::default();
	match script.fetch(0) {
		Ok(_) => {
			log::info!("chronicles: reading chapters from #{CHAPTER_DATA_ELEMENT_ID}");
			Box::new(script)
		}
		Err(e) => {
			log::debug!("chronicles: {e}; using bundled chapters");
			match StaticSource::bundled() {
				Ok(source) => Box::new(source),
				Err(e) => {
					log::warn!("chronicles: bundled chapters unreadable: {e}");
					Box::new(StaticSource::default())
				}
			}
		}
	}
}
