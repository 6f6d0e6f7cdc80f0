//! Diagram view state.
//!
//! Holds the last laid-out snapshot of the visible graph, its node positions,
//! and the pan/zoom transform. Layout is recomputed only when the playback
//! revision changes.

use std::rc::Rc;

use log::warn;

use crate::graph::RecipeGraph;
use crate::layout::{Direction, LayoutEngine, Positions, layout_graph, node_size};

/// Zoom factor bounds.
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;
/// Fit-to-view never zooms in past this.
const MAX_FIT_ZOOM: f64 = 1.5;
/// Fraction of the viewport used when fitting.
const FIT_MARGIN: f64 = 0.9;

/// Pan and zoom transform applied to the entire diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Everything the renderer needs for one frame.
pub struct DiagramState {
	pub graph: Rc<RecipeGraph>,
	pub positions: Positions,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub direction: Direction,
	pub width: f64,
	pub height: f64,
	/// Id of the tree's root element, drawn highlighted.
	pub root_id: Option<String>,
	revision: Option<u64>,
	/// Cleared once the user pans or zooms by hand.
	auto_fit: bool,
}

impl DiagramState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: Rc::new(RecipeGraph::default()),
			positions: Positions::new(),
			transform: ViewTransform::default(),
			pan: PanState::default(),
			direction: Direction::default(),
			width,
			height,
			root_id: None,
			revision: None,
			auto_fit: true,
		}
	}

	/// Prepares for a fresh playback run.
	pub fn restart(&mut self, direction: Direction) {
		self.direction = direction;
		self.auto_fit = true;
		self.revision = None;
	}

	/// Re-lays out `snapshot` if the playback revision moved on.
	///
	/// A failed layout leaves the diagram without positions until the next
	/// revision; the snapshot itself is still adopted.
	pub fn sync(&mut self, revision: u64, snapshot: Rc<RecipeGraph>, engine: &dyn LayoutEngine) {
		if self.revision == Some(revision) {
			return;
		}
		self.revision = Some(revision);
		self.root_id = snapshot.nodes.first().map(|n| n.id.clone());

		match layout_graph(engine, &snapshot, self.direction) {
			Ok(positions) => self.positions = positions,
			Err(e) => {
				warn!("recipe-flow: layout failed: {}", e);
				self.positions.clear();
			}
		}
		self.graph = snapshot;

		if self.auto_fit {
			self.fit_to_view();
		}
	}

	/// Centers the diagram and scales it to fit the viewport.
	pub fn fit_to_view(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		for node in &self.graph.nodes {
			let Some(p) = self.positions.get(&node.id) else {
				continue;
			};
			let (w, h) = node_size(node.kind);
			let (x0, y0, x1, y1) = (p.x - w / 2.0, p.y - h / 2.0, p.x + w / 2.0, p.y + h / 2.0);
			bounds = Some(match bounds {
				None => (x0, y0, x1, y1),
				Some((a, b, c, d)) => (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
			});
		}
		let Some((x0, y0, x1, y1)) = bounds else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		};

		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = (self.width * FIT_MARGIN / bw)
			.min(self.height * FIT_MARGIN / bh)
			.clamp(MIN_ZOOM, MAX_FIT_ZOOM);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.auto_fit = false;
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, x: f64, y: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Zooms by `factor` keeping the screen point `(x, y)` fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		self.auto_fit = false;
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		if self.auto_fit {
			self.fit_to_view();
		}
	}
}
