//! Traversal-ordered reveal of the recipe diagram.
//!
//! Both strategies reveal exactly the nodes and edges of [`build_graph`] with
//! the same ids; only the order differs.
//!
//! - **BFS** reveals elements level by level. A junction and its produce edge
//!   appear as soon as the element it produces is dequeued; each ingredient's
//!   combine edge appears right after the ingredient itself.
//! - **DFS** explores each pair's left subtree, then its right subtree, before
//!   the next pair. A pair's produce edge is revealed once both of its
//!   subtrees are complete.
//!
//! [`build_graph`]: super::build_graph

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::builder::{PlacedPair, Placement, place};
use super::{GraphEdge, GraphNode};
use crate::config::ConfigError;
use crate::recipe::RecipeNode;

/// Search strategy whose discovery order the reveal imitates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Strategy {
	/// Breadth-first.
	#[default]
	Bfs,
	/// Depth-first.
	Dfs,
}

impl Strategy {
	/// Short code used in config and form controls.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bfs => "BFS",
			Self::Dfs => "DFS",
		}
	}
}

impl fmt::Display for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Strategy {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"BFS" => Ok(Self::Bfs),
			"DFS" => Ok(Self::Dfs),
			_ => Err(ConfigError::unknown("algorithm", s)),
		}
	}
}

/// A single item becoming visible.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Reveal {
	Node(GraphNode),
	Edge(GraphEdge),
}

/// One reveal step, tagged with its position in the sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraversalEvent {
	/// 0-based emission index.
	pub ordinal: usize,
	pub reveal: Reveal,
}

#[derive(Default)]
struct Emitter {
	events: Vec<TraversalEvent>,
}

impl Emitter {
	fn push(&mut self, reveal: Reveal) {
		let ordinal = self.events.len();
		self.events.push(TraversalEvent { ordinal, reveal });
	}

	fn node(&mut self, node: &GraphNode) {
		self.push(Reveal::Node(node.clone()));
	}

	fn edge(&mut self, edge: &GraphEdge) {
		self.push(Reveal::Edge(edge.clone()));
	}
}

/// Produces the reveal sequence for a recipe tree under `strategy`.
///
/// An absent tree yields no events.
pub fn traversal_events(root: Option<&RecipeNode>, strategy: Strategy) -> Vec<TraversalEvent> {
	let Some(root) = root else {
		return Vec::new();
	};

	let placement = place(root);
	let mut out = Emitter::default();
	match strategy {
		Strategy::Bfs => breadth_first(&placement, &mut out),
		Strategy::Dfs => depth_first(&placement, &mut out),
	}
	out.events
}

fn breadth_first(root: &Placement, out: &mut Emitter) {
	let mut queue: VecDeque<(&Placement, Option<&GraphEdge>)> = VecDeque::from([(root, None)]);

	while let Some((entry, via)) = queue.pop_front() {
		out.node(&entry.node);
		if let Some(edge) = via {
			out.edge(edge);
		}

		for pair in &entry.pairs {
			out.node(&pair.junction);
			out.edge(&pair.produce);
			queue.push_back((&pair.left, Some(&pair.left_edge)));
			queue.push_back((&pair.right, Some(&pair.right_edge)));
		}
	}
}

enum Frame<'a> {
	Visit(&'a Placement, Option<&'a GraphEdge>),
	Enter(&'a PlacedPair),
	Close(&'a PlacedPair),
}

fn depth_first(root: &Placement, out: &mut Emitter) {
	let mut stack = vec![Frame::Visit(root, None)];

	while let Some(frame) = stack.pop() {
		match frame {
			Frame::Visit(entry, via) => {
				out.node(&entry.node);
				if let Some(edge) = via {
					out.edge(edge);
				}
				// Reversed so pops come back out left to right.
				for pair in entry.pairs.iter().rev() {
					stack.push(Frame::Close(pair));
					stack.push(Frame::Visit(&pair.right, Some(&pair.right_edge)));
					stack.push(Frame::Visit(&pair.left, Some(&pair.left_edge)));
					stack.push(Frame::Enter(pair));
				}
			}
			Frame::Enter(pair) => out.node(&pair.junction),
			Frame::Close(pair) => out.edge(&pair.produce),
		}
	}
}
