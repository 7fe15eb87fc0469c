//! Graph view lifecycle, independent of any UI framework.
//!
//! [`GraphView`] owns the chart engine for the lifetime of one mount. It keeps
//! the records received so far, rebuilds chart data when they change, and
//! pushes new options to the engine only when the data, the highlight or the
//! device flags differ from what was last applied.

use std::collections::HashMap;

use super::data::{ChartData, build_chart_data};
use super::engine::{ChartEngine, EngineError};
use super::option::{OptionParams, build_chart_option};
use super::theme::Theme;
use crate::chapter::ChapterRecord;
use crate::source::SourceError;

/// Loading state of the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPhase {
	/// Nothing requested yet.
	Idle,
	/// A fetch is outstanding.
	Loading,
	/// At least one fetch completed (successfully or not).
	Loaded,
}

/// Handle for one outstanding fetch. Responses carrying an outdated ticket are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
	generation: u64,
	/// Highest chapter id already held; the source only needs to return newer ones.
	pub since_id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AppliedKey {
	data_revision: u64,
	params: OptionParams,
}

/// Owns one chart engine and the data shown in it.
pub struct GraphView<E: ChartEngine> {
	engine: Option<E>,
	phase: ViewPhase,
	records: Vec<ChapterRecord>,
	/// `(story_id, id)` to position in `records`.
	record_index: HashMap<(u64, u64), usize>,
	data: ChartData,
	data_revision: u64,
	last_id: u64,
	params: OptionParams,
	applied: Option<AppliedKey>,
	generation: u64,
	unmounted: bool,
}

impl<E: ChartEngine> GraphView<E> {
	/// An unmounted view with no data.
	pub fn new(params: OptionParams) -> Self {
		Self {
			engine: None,
			phase: ViewPhase::Idle,
			records: Vec::new(),
			record_index: HashMap::new(),
			data: ChartData::default(),
			data_revision: 0,
			last_id: 0,
			params,
			applied: None,
			generation: 0,
			unmounted: false,
		}
	}

	/// Current loading state.
	pub fn phase(&self) -> ViewPhase {
		self.phase
	}

	/// Chart data built from every record received so far.
	pub fn data(&self) -> &ChartData {
		&self.data
	}

	/// Highest chapter id received so far.
	pub fn last_id(&self) -> u64 {
		self.last_id
	}

	/// True while an engine is bound.
	pub fn is_mounted(&self) -> bool {
		self.engine.is_some()
	}

	/// The live engine, for forwarding input. `None` before mount and after unmount.
	pub fn engine(&self) -> Option<&E> {
		self.engine.as_ref()
	}

	/// Binds an engine to `surface` and draws whatever data is already held.
	/// Does nothing if already mounted or after [`GraphView::unmount`].
	pub fn mount(&mut self, surface: E::Surface) -> Result<(), EngineError> {
		if self.unmounted || self.engine.is_some() {
			log::debug!("chronicles: graph view mount ignored");
			return Ok(());
		}
		self.engine = Some(E::init(surface)?);
		self.applied = None;
		self.sync();
		Ok(())
	}

	/// Marks a fetch as outstanding and returns its ticket.
	pub fn begin_fetch(&mut self) -> FetchTicket {
		self.generation += 1;
		self.phase = ViewPhase::Loading;
		FetchTicket {
			generation: self.generation,
			since_id: self.last_id,
		}
	}

	/// Applies a fetch response. Returns `false` when the response was dropped
	/// because the view was unmounted or a newer fetch superseded it.
	///
	/// A failed fetch still completes loading; the graph keeps what it had.
	pub fn receive(
		&mut self,
		ticket: FetchTicket,
		response: Result<Vec<ChapterRecord>, SourceError>,
	) -> bool {
		if self.unmounted || ticket.generation != self.generation {
			log::debug!("chronicles: dropping stale chapter response");
			return false;
		}
		self.phase = ViewPhase::Loaded;

		let incoming = match response {
			Ok(records) => records,
			Err(e) => {
				log::warn!("chronicles: chapter fetch failed: {e}");
				Vec::new()
			}
		};
		if !incoming.is_empty() {
			for record in incoming {
				let key = (record.story_id, record.id);
				match self.record_index.get(&key) {
					Some(&pos) => self.records[pos] = record,
					None => {
						self.record_index.insert(key, self.records.len());
						self.records.push(record);
					}
				}
			}
			self.data = build_chart_data(&self.records);
			self.data_revision += 1;
			self.last_id = self.last_id.max(self.data.data_last_id);
		}
		self.sync();
		true
	}

	/// Records new highlight/device inputs and reapplies options if they changed.
	pub fn set_params(&mut self, params: OptionParams) {
		self.params = params;
		self.sync();
	}

	/// Forwards a surface size change to the engine.
	pub fn resize(&mut self) {
		if let Some(engine) = self.engine.as_mut() {
			engine.resize();
		}
	}

	/// Disposes the engine. Safe to call more than once; also run on drop.
	pub fn unmount(&mut self) {
		self.unmounted = true;
		self.generation += 1;
		if let Some(mut engine) = self.engine.take() {
			engine.dispose();
		}
	}

	/// Rebuilds and applies options iff data revision or params changed.
	fn sync(&mut self) -> bool {
		let key = AppliedKey {
			data_revision: self.data_revision,
			params: self.params.clone(),
		};
		if self.applied.as_ref() == Some(&key) {
			return false;
		}
		let Some(engine) = self.engine.as_mut() else {
			return false;
		};
		let theme = Theme::for_tv(self.params.is_tv);
		let option = build_chart_option(&self.data, &self.params, &theme);
		engine.set_option(&option);
		self.applied = Some(key);
		true
	}
}

impl<E: ChartEngine> Drop for GraphView<E> {
	fn drop(&mut self) {
		self.unmount();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::super::option::ChartOption;
	use super::*;

	#[derive(Debug, Default)]
	struct EngineLog {
		fail_init: bool,
		inits: usize,
		options: Vec<ChartOption>,
		resizes: usize,
		disposes: usize,
		calls_after_dispose: usize,
	}

	struct RecordingEngine {
		log: Rc<RefCell<EngineLog>>,
	}

	impl RecordingEngine {
		fn touch(&self) {
			let mut log = self.log.borrow_mut();
			if log.disposes > 0 {
				log.calls_after_dispose += 1;
			}
		}
	}

	impl ChartEngine for RecordingEngine {
		type Surface = Rc<RefCell<EngineLog>>;

		fn init(surface: Self::Surface) -> Result<Self, EngineError> {
			if surface.borrow().fail_init {
				return Err(EngineError::NoContext);
			}
			surface.borrow_mut().inits += 1;
			Ok(Self { log: surface })
		}

		fn set_option(&mut self, option: &ChartOption) {
			self.touch();
			self.log.borrow_mut().options.push(option.clone());
		}

		fn resize(&mut self) {
			self.touch();
			self.log.borrow_mut().resizes += 1;
		}

		fn dispose(&mut self) {
			self.touch();
			self.log.borrow_mut().disposes += 1;
		}
	}

	fn record(id: u64, parent_id: u64, path: &[u64]) -> ChapterRecord {
		ChapterRecord {
			id,
			parent_id,
			story_id: 1,
			path: path.to_vec(),
			..Default::default()
		}
	}

	fn mounted(params: OptionParams) -> (GraphView<RecordingEngine>, Rc<RefCell<EngineLog>>) {
		let log = Rc::new(RefCell::new(EngineLog::default()));
		let mut view = GraphView::new(params);
		view.mount(log.clone()).unwrap();
		(view, log)
	}

	fn desktop(highlight: Option<&str>) -> OptionParams {
		OptionParams {
			highlight_id: highlight.map(String::from),
			is_medium_device: true,
			..Default::default()
		}
	}

	#[test]
	fn loads_and_applies_two_chapter_story() {
		let (mut view, log) = mounted(desktop(Some("2")));
		assert_eq!(view.phase(), ViewPhase::Idle);

		let ticket = view.begin_fetch();
		assert_eq!(ticket.since_id, 0);
		assert_eq!(view.phase(), ViewPhase::Loading);
		assert!(view.receive(ticket, Ok(vec![record(1, 0, &[1]), record(2, 1, &[1, 2])])));
		assert_eq!(view.phase(), ViewPhase::Loaded);
		assert_eq!(view.last_id(), 2);

		let log = log.borrow();
		assert_eq!(log.inits, 1);
		// Empty chart on mount, then the loaded data.
		assert_eq!(log.options.len(), 2);
		let latest = log.options.last().unwrap();
		assert_eq!(latest.graph().unwrap().data.len(), 2);
		assert_eq!(latest.highlighted_nodes(), vec!["2"]);
		assert_eq!(latest.highlighted_links(), vec![("1", "2")]);
	}

	#[test]
	fn empty_dataset_renders_empty_chart() {
		let (mut view, log) = mounted(desktop(None));
		let ticket = view.begin_fetch();
		assert!(view.receive(ticket, Ok(vec![])));
		assert_eq!(view.phase(), ViewPhase::Loaded);
		assert!(view.data().is_empty());

		let log = log.borrow();
		assert_eq!(log.options.len(), 1);
		assert!(log.options[0].graph().unwrap().data.is_empty());
	}

	#[test]
	fn failed_fetch_keeps_existing_graph() {
		let (mut view, log) = mounted(desktop(None));
		let ticket = view.begin_fetch();
		view.receive(ticket, Ok(vec![record(1, 0, &[1])]));
		let ticket = view.begin_fetch();
		assert_eq!(ticket.since_id, 1);
		let err = serde_json::from_str::<Vec<ChapterRecord>>("[").unwrap_err();
		assert!(view.receive(ticket, Err(err.into())));
		assert_eq!(view.phase(), ViewPhase::Loaded);
		assert_eq!(view.data().nodes.len(), 1);
		assert_eq!(log.borrow().options.len(), 2);
	}

	#[test]
	fn unchanged_params_do_not_reapply() {
		let (mut view, log) = mounted(desktop(None));
		view.set_params(desktop(None));
		assert_eq!(log.borrow().options.len(), 1);

		view.set_params(desktop(Some("1")));
		view.set_params(OptionParams {
			is_tv: true,
			..desktop(Some("1"))
		});
		let log = log.borrow();
		assert_eq!(log.options.len(), 3);
		assert_eq!(log.inits, 1);
	}

	#[test]
	fn incremental_fetch_merges_records() {
		let (mut view, _log) = mounted(desktop(None));
		let ticket = view.begin_fetch();
		view.receive(ticket, Ok(vec![record(1, 0, &[1])]));
		let ticket = view.begin_fetch();
		view.receive(ticket, Ok(vec![record(2, 1, &[1, 2]), record(1, 0, &[1])]));
		assert_eq!(view.data().nodes.len(), 2);
		assert_eq!(view.data().links.len(), 1);
		assert_eq!(view.last_id(), 2);
	}

	#[test]
	fn merge_keys_on_story_and_id() {
		let (mut view, _log) = mounted(desktop(None));
		let in_story = |story_id, id, parent_id| ChapterRecord {
			story_id,
			..record(id, parent_id, &[])
		};
		let ticket = view.begin_fetch();
		view.receive(ticket, Ok(vec![in_story(1, 1, 0), in_story(1, 2, 1)]));
		let ticket = view.begin_fetch();
		let mut edited = in_story(1, 2, 1);
		edited.content = "edited".into();
		view.receive(ticket, Ok(vec![in_story(2, 1, 0), in_story(2, 3, 1), edited]));

		let data = view.data();
		assert_eq!(data.nodes.len(), 4);
		assert_eq!(data.links.len(), 2);
		assert!(data.issues.is_empty());
		assert_eq!(data.node("2").map(|n| n.name.as_str()), Some("edited"));
	}

	#[test]
	fn superseded_response_is_dropped() {
		let (mut view, log) = mounted(desktop(None));
		let first = view.begin_fetch();
		let second = view.begin_fetch();
		assert!(!view.receive(first, Ok(vec![record(9, 0, &[9])])));
		assert_eq!(view.phase(), ViewPhase::Loading);
		assert!(view.receive(second, Ok(vec![record(1, 0, &[1])])));
		assert!(view.data().node("9").is_none());
		assert_eq!(log.borrow().options.len(), 2);
	}

	#[test]
	fn response_after_unmount_never_reaches_engine() {
		let (mut view, log) = mounted(desktop(None));
		let ticket = view.begin_fetch();
		view.unmount();
		assert!(!view.receive(ticket, Ok(vec![record(1, 0, &[1])])));
		view.resize();
		view.set_params(desktop(Some("1")));

		let log = log.borrow();
		assert_eq!(log.disposes, 1);
		assert_eq!(log.calls_after_dispose, 0);
		assert_eq!(log.resizes, 0);
	}

	#[test]
	fn unmount_then_drop_disposes_once() {
		let (mut view, log) = mounted(desktop(None));
		view.unmount();
		view.unmount();
		drop(view);
		assert_eq!(log.borrow().disposes, 1);
	}

	#[test]
	fn drop_alone_disposes_once() {
		let (view, log) = mounted(desktop(None));
		drop(view);
		assert_eq!(log.borrow().disposes, 1);
		assert_eq!(log.borrow().calls_after_dispose, 0);
	}

	#[test]
	fn resize_is_forwarded_without_reapplying() {
		let (mut view, log) = mounted(desktop(None));
		view.resize();
		view.resize();
		let log = log.borrow();
		assert_eq!(log.resizes, 2);
		assert_eq!(log.options.len(), 1);
	}

	#[test]
	fn failed_init_leaves_view_unmounted() {
		let log = Rc::new(RefCell::new(EngineLog {
			fail_init: true,
			..Default::default()
		}));
		let mut view: GraphView<RecordingEngine> = GraphView::new(desktop(None));
		assert!(matches!(view.mount(log.clone()), Err(EngineError::NoContext)));
		assert!(!view.is_mounted());

		let ticket = view.begin_fetch();
		assert!(view.receive(ticket, Ok(vec![record(1, 0, &[1])])));
		drop(view);
		assert_eq!(log.borrow().disposes, 0);
	}

	#[test]
	fn data_received_before_mount_is_drawn_on_mount() {
		let log = Rc::new(RefCell::new(EngineLog::default()));
		let mut view: GraphView<RecordingEngine> = GraphView::new(desktop(None));
		let ticket = view.begin_fetch();
		view.receive(ticket, Ok(vec![record(1, 0, &[1]), record(2, 1, &[1, 2])]));
		view.mount(log.clone()).unwrap();
		let log = log.borrow();
		assert_eq!(log.options.len(), 1);
		assert_eq!(log.options[0].graph().unwrap().data.len(), 2);
	}
}
