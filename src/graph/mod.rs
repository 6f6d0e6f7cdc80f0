//! Diagram graph derived from a recipe tree.
//!
//! Every element occurrence becomes an [`NodeKind::Element`] node and every
//! combination pair becomes an unlabeled [`NodeKind::Junction`] node that both
//! ingredients feed into. Edges always point from inputs toward the result:
//!
//! ```text
//! Mud ──combine──┐
//!                ├─> (junction) ──Recipe 1──> Brick
//! Fire ─combine──┘
//! ```
//!
//! Ids are assigned once per build by a structural pre-order walk, so the
//! canonical graph from [`build_graph`] and the replay of
//! [`traversal_events`] agree on every id and label.

mod builder;
mod traversal;

pub use builder::build_graph;
pub use traversal::{Reveal, Strategy, TraversalEvent, traversal_events};

/// Label carried by every ingredient -> junction edge.
pub const COMBINE_LABEL: &str = "combine";

/// Whether a node is a named element or a synthetic combination junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// An ingredient or produced result; labeled with its name.
	Element,
	/// Joins two ingredients into one produce edge; never labeled.
	Junction,
}

/// A node in the recipe diagram.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphNode {
	/// `node{n}` for elements, `combo{n}` for junctions.
	pub id: String,
	/// Element name, or empty for junctions.
	pub label: String,
	pub kind: NodeKind,
}

impl GraphNode {
	pub(crate) fn element(id: String, name: &str) -> Self {
		Self {
			id,
			label: name.to_string(),
			kind: NodeKind::Element,
		}
	}

	pub(crate) fn junction(id: String) -> Self {
		Self {
			id,
			label: String::new(),
			kind: NodeKind::Junction,
		}
	}
}

/// Whether an edge feeds a junction or delivers a junction's product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
	/// Ingredient -> junction.
	Combine,
	/// Junction -> produced element.
	Produce,
}

/// A directed edge in the recipe diagram.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphEdge {
	/// `e-{source}-{target}`.
	pub id: String,
	pub source: String,
	pub target: String,
	/// `"combine"`, `"Recipe N"` on edges into the root, or nothing.
	pub label: Option<String>,
	pub kind: EdgeKind,
}

impl GraphEdge {
	pub(crate) fn combine(source: &str, junction: &str) -> Self {
		Self::new(source, junction, EdgeKind::Combine, Some(COMBINE_LABEL.to_string()))
	}

	pub(crate) fn produce(junction: &str, result: &str, label: Option<String>) -> Self {
		Self::new(junction, result, EdgeKind::Produce, label)
	}

	fn new(source: &str, target: &str, kind: EdgeKind, label: Option<String>) -> Self {
		Self {
			id: format!("e-{source}-{target}"),
			source: source.to_string(),
			target: target.to_string(),
			label,
			kind,
		}
	}
}

/// A node/edge set, either the full diagram or the portion revealed so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipeGraph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl RecipeGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}

	/// Looks up a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Appends one revealed item, preserving reveal order.
	pub fn apply(&mut self, reveal: Reveal) {
		match reveal {
			Reveal::Node(node) => self.nodes.push(node),
			Reveal::Edge(edge) => self.edges.push(edge),
		}
	}

	/// Rebuilds a graph by replaying traversal events in order.
	pub fn replay(events: impl IntoIterator<Item = TraversalEvent>) -> Self {
		let mut graph = Self::default();
		for event in events {
			graph.apply(event.reveal);
		}
		graph
	}
}
