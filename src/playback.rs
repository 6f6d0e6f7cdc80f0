//! Timer-agnostic playback of traversal events.
//!
//! [`PlaybackScheduler`] owns the visible portion of the diagram and hands out
//! a [`RunToken`] for every live run. Whatever drives the timer must present
//! that token on each tick; tokens from stopped or superseded runs are
//! rejected, so a late-firing tick can never touch a newer run's state.
//!
//! ```text
//!          start(Live)            tick -> Finished / stop()
//!   Idle ──────────────> Running ─────────────────────────> Idle
//!    ^  start(Instant)      │ start(..) cancels, then begins again
//!    └──────────────────────┘
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use log::debug;
use serde::Deserialize;

use crate::config::ConfigError;
use crate::graph::{RecipeGraph, TraversalEvent};

/// Shortest accepted tick interval.
pub const MIN_INTERVAL_MS: u32 = 1;

/// Default tick interval for live playback.
pub const DEFAULT_INTERVAL_MS: u32 = 500;

/// How a traversal is revealed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
	/// One event per timer tick.
	#[default]
	Live,
	/// Everything at once.
	Instant,
}

impl PlaybackMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Live => "live",
			Self::Instant => "instant",
		}
	}
}

impl fmt::Display for PlaybackMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PlaybackMode {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"live" => Ok(Self::Live),
			"instant" => Ok(Self::Instant),
			_ => Err(ConfigError::unknown("mode", s)),
		}
	}
}

/// Scheduler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
	Idle,
	Running,
}

/// Identifies one live run. Only the most recent run's token is honored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunToken {
	generation: u64,
}

/// Result of presenting a token to [`PlaybackScheduler::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
	/// The token belongs to a cancelled or superseded run; nothing changed.
	Stale,
	/// One event was applied; schedule the next tick after `delay_ms`.
	Continue { delay_ms: u32 },
	/// The last event was applied and the run is over.
	Finished,
}

/// Reveals traversal events into a visible graph, instantly or one per tick.
#[derive(Debug)]
pub struct PlaybackScheduler {
	pending: VecDeque<TraversalEvent>,
	visible: Rc<RecipeGraph>,
	status: Status,
	generation: u64,
	revision: u64,
	interval_ms: u32,
	applied: usize,
	total: usize,
}

impl Default for PlaybackScheduler {
	fn default() -> Self {
		Self::new(DEFAULT_INTERVAL_MS)
	}
}

impl PlaybackScheduler {
	pub fn new(interval_ms: u32) -> Self {
		Self {
			pending: VecDeque::new(),
			visible: Rc::new(RecipeGraph::default()),
			status: Status::Idle,
			generation: 0,
			revision: 0,
			interval_ms: interval_ms.max(MIN_INTERVAL_MS),
			applied: 0,
			total: 0,
		}
	}

	/// Begins a new run from an empty visible graph, cancelling any run in
	/// progress.
	///
	/// Returns the token the timer must present on each tick, or `None` when
	/// no timer is needed (instant mode or nothing to play).
	pub fn start(
		&mut self,
		events: Vec<TraversalEvent>,
		mode: PlaybackMode,
		interval_ms: u32,
	) -> Option<RunToken> {
		self.stop();
		self.generation += 1;
		self.revision += 1;
		self.visible = Rc::new(RecipeGraph::default());
		self.interval_ms = interval_ms.max(MIN_INTERVAL_MS);
		self.applied = 0;
		self.total = events.len();
		self.pending = events.into();

		match mode {
			PlaybackMode::Instant => {
				let graph = Rc::make_mut(&mut self.visible);
				for event in self.pending.drain(..) {
					graph.apply(event.reveal);
				}
				self.applied = self.total;
				debug!("recipe-flow: revealed {} events instantly", self.total);
				None
			}
			PlaybackMode::Live if self.pending.is_empty() => None,
			PlaybackMode::Live => {
				self.status = Status::Running;
				debug!(
					"recipe-flow: live run {} started with {} events every {}ms",
					self.generation, self.total, self.interval_ms
				);
				Some(RunToken {
					generation: self.generation,
				})
			}
		}
	}

	/// Applies the next event of the run identified by `token`.
	pub fn tick(&mut self, token: RunToken) -> Tick {
		if self.status != Status::Running || token.generation != self.generation {
			return Tick::Stale;
		}

		if let Some(event) = self.pending.pop_front() {
			Rc::make_mut(&mut self.visible).apply(event.reveal);
			self.applied += 1;
			self.revision += 1;
		}

		if self.pending.is_empty() {
			self.status = Status::Idle;
			Tick::Finished
		} else {
			Tick::Continue {
				delay_ms: self.interval_ms,
			}
		}
	}

	/// Cancels the running run, keeping whatever it already revealed.
	///
	/// Returns whether anything was cancelled; calling it again is a no-op.
	pub fn stop(&mut self) -> bool {
		if self.status == Status::Idle {
			return false;
		}
		self.status = Status::Idle;
		self.generation += 1;
		self.pending.clear();
		debug!("recipe-flow: playback stopped after {}/{} events", self.applied, self.total);
		true
	}

	/// Changes the delay used for ticks scheduled from now on.
	pub fn set_interval(&mut self, interval_ms: u32) {
		self.interval_ms = interval_ms.max(MIN_INTERVAL_MS);
	}

	pub fn interval_ms(&self) -> u32 {
		self.interval_ms
	}

	pub fn status(&self) -> Status {
		self.status
	}

	/// The graph revealed so far.
	pub fn visible(&self) -> &RecipeGraph {
		&self.visible
	}

	/// A shared, immutable snapshot of the graph revealed so far. Later ticks
	/// never mutate a snapshot that has been handed out.
	pub fn snapshot(&self) -> Rc<RecipeGraph> {
		Rc::clone(&self.visible)
	}

	/// Increments whenever the visible graph changes or is replaced.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// `(applied, total)` events of the current or last run.
	pub fn progress(&self) -> (usize, usize) {
		(self.applied, self.total)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{Strategy, build_graph, traversal_events};
	use crate::recipe::RecipeNode;
	use pretty_assertions::assert_eq;

	fn brick_events(strategy: Strategy) -> Vec<TraversalEvent> {
		let tree = RecipeNode::leaf("Brick")
			.with_recipe(RecipeNode::leaf("Mud"), RecipeNode::leaf("Fire"));
		traversal_events(Some(&tree), strategy)
	}

	#[test]
	fn instant_mode_reveals_everything_and_stays_idle() {
		let mut scheduler = PlaybackScheduler::default();
		let token = scheduler.start(brick_events(Strategy::Bfs), PlaybackMode::Instant, 500);

		assert_eq!(token, None);
		assert_eq!(scheduler.status(), Status::Idle);
		assert_eq!(scheduler.visible().nodes.len(), 4);
		assert_eq!(scheduler.visible().edges.len(), 3);
		assert_eq!(scheduler.progress(), (7, 7));
	}

	#[test]
	fn live_mode_applies_one_event_per_tick() {
		let mut scheduler = PlaybackScheduler::default();
		let token = scheduler.start(brick_events(Strategy::Dfs), PlaybackMode::Live, 250).unwrap();

		assert_eq!(scheduler.status(), Status::Running);
		assert!(scheduler.visible().is_empty());

		for applied in 1..7 {
			assert_eq!(scheduler.tick(token), Tick::Continue { delay_ms: 250 });
			assert_eq!(scheduler.progress(), (applied, 7));
		}
		assert_eq!(scheduler.tick(token), Tick::Finished);
		assert_eq!(scheduler.status(), Status::Idle);
		assert_eq!(scheduler.tick(token), Tick::Stale);
	}

	#[test]
	fn live_mode_with_nothing_to_play_needs_no_timer() {
		let mut scheduler = PlaybackScheduler::default();
		assert_eq!(scheduler.start(Vec::new(), PlaybackMode::Live, 100), None);
		assert_eq!(scheduler.status(), Status::Idle);
	}

	#[test]
	fn stop_is_idempotent() {
		let mut scheduler = PlaybackScheduler::default();
		let token = scheduler.start(brick_events(Strategy::Bfs), PlaybackMode::Live, 100).unwrap();
		scheduler.tick(token);

		assert!(scheduler.stop());
		let visible = scheduler.visible().clone();
		let progress = scheduler.progress();

		assert!(!scheduler.stop());
		assert_eq!(scheduler.visible(), &visible);
		assert_eq!(scheduler.progress(), progress);
		assert_eq!(scheduler.tick(token), Tick::Stale);
	}

	#[test]
	fn interval_change_applies_to_later_ticks() {
		let mut scheduler = PlaybackScheduler::default();
		let token = scheduler.start(brick_events(Strategy::Bfs), PlaybackMode::Live, 500).unwrap();

		assert_eq!(scheduler.tick(token), Tick::Continue { delay_ms: 500 });
		scheduler.set_interval(50);
		assert_eq!(scheduler.tick(token), Tick::Continue { delay_ms: 50 });
		scheduler.set_interval(0);
		assert_eq!(scheduler.tick(token), Tick::Continue { delay_ms: MIN_INTERVAL_MS });
	}

	#[test]
	fn snapshots_are_not_mutated_by_later_ticks() {
		let mut scheduler = PlaybackScheduler::default();
		let token = scheduler.start(brick_events(Strategy::Bfs), PlaybackMode::Live, 10).unwrap();

		scheduler.tick(token);
		let before = scheduler.snapshot();
		let revision = scheduler.revision();
		scheduler.tick(token);

		assert_eq!(before.nodes.len() + before.edges.len(), 1);
		assert_eq!(scheduler.visible().nodes.len() + scheduler.visible().edges.len(), 2);
		assert!(scheduler.revision() > revision);
	}

	#[test]
	fn live_and_instant_end_in_the_same_graph() {
		let mut instant = PlaybackScheduler::default();
		instant.start(brick_events(Strategy::Dfs), PlaybackMode::Instant, 10);

		let mut live = PlaybackScheduler::default();
		let token = live.start(brick_events(Strategy::Dfs), PlaybackMode::Live, 10).unwrap();
		while live.tick(token) != Tick::Finished {}

		assert_eq!(live.visible(), instant.visible());
		let tree = RecipeNode::leaf("Brick")
			.with_recipe(RecipeNode::leaf("Mud"), RecipeNode::leaf("Fire"));
		assert_eq!(live.visible().nodes.len(), build_graph(Some(&tree)).nodes.len());
	}

	#[test]
	fn parses_mode_names() {
		assert_eq!("LIVE".parse::<PlaybackMode>().unwrap(), PlaybackMode::Live);
		assert_eq!("instant".parse::<PlaybackMode>().unwrap(), PlaybackMode::Instant);
		assert!("slow".parse::<PlaybackMode>().is_err());
	}
}
