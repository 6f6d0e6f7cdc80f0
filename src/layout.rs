//! Layered positioning of the recipe diagram.
//!
//! [`LayoutEngine`] is the seam to any layered layout backend: it receives
//! node sizes and edges plus a [`Direction`], and must position every node it
//! was given. [`LayeredLayout`] is the built-in engine. It ranks nodes by
//! their longest path to a sink, so ingredients sit above (or left of) the
//! junction they feed and junctions above the element they produce, then
//! packs each tree under its sink with parents centred over their inputs.
//!
//! Positions are node centres.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use petgraph::Direction::{Incoming, Outgoing};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::graph::{NodeKind, RecipeGraph};

/// Element box size.
pub const ELEMENT_SIZE: (f64, f64) = (150.0, 50.0);
/// Junction box size.
pub const JUNCTION_SIZE: (f64, f64) = (10.0, 10.0);

/// Size of a node of `kind` as laid out and drawn.
pub fn node_size(kind: NodeKind) -> (f64, f64) {
	match kind {
		NodeKind::Element => ELEMENT_SIZE,
		NodeKind::Junction => JUNCTION_SIZE,
	}
}

/// Flow direction of the diagram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum Direction {
	/// Inputs at the top, results below.
	#[default]
	#[serde(rename = "TB")]
	TopBottom,
	/// Inputs on the left, results to the right.
	#[serde(rename = "LR")]
	LeftRight,
}

impl Direction {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::TopBottom => "TB",
			Self::LeftRight => "LR",
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Direction {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"TB" | "TD" => Ok(Self::TopBottom),
			"LR" => Ok(Self::LeftRight),
			_ => Err(ConfigError::unknown("direction", s)),
		}
	}
}

/// A node submitted for layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
	pub id: String,
	pub width: f64,
	pub height: f64,
}

/// An edge submitted for layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutEdge {
	pub source: String,
	pub target: String,
}

/// Centre of a laid-out node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// Node id to centre position.
pub type Positions = HashMap<String, Point>;

/// Why a layout could not be produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
	#[error("edge {edge} references unknown node {missing}")]
	UnknownNode { edge: String, missing: String },
	#[error("graph contains a cycle through node {0}")]
	Cycle(String),
}

/// A layered graph positioning backend.
pub trait LayoutEngine {
	/// Positions every submitted node. Identical input yields identical output.
	fn layout(
		&self,
		nodes: &[LayoutNode],
		edges: &[LayoutEdge],
		direction: Direction,
	) -> Result<Positions, LayoutError>;
}

/// Lays out a diagram with its nodes sized by kind.
pub fn layout_graph(
	engine: &dyn LayoutEngine,
	graph: &RecipeGraph,
	direction: Direction,
) -> Result<Positions, LayoutError> {
	let nodes: Vec<LayoutNode> = graph
		.nodes
		.iter()
		.map(|n| {
			let (width, height) = node_size(n.kind);
			LayoutNode {
				id: n.id.clone(),
				width,
				height,
			}
		})
		.collect();
	let edges: Vec<LayoutEdge> = graph
		.edges
		.iter()
		.map(|e| LayoutEdge {
			source: e.source.clone(),
			target: e.target.clone(),
		})
		.collect();

	engine.layout(&nodes, &edges, direction)
}

/// Built-in deterministic layered layout.
#[derive(Clone, Debug)]
pub struct LayeredLayout {
	/// Gap between consecutive ranks.
	pub rank_separation: f64,
	/// Gap between neighbouring subtrees within a rank.
	pub node_separation: f64,
}

impl Default for LayeredLayout {
	fn default() -> Self {
		Self {
			rank_separation: 80.0,
			node_separation: 40.0,
		}
	}
}

/// The submitted graph indexed for petgraph. Node `i` of the input is
/// `NodeIndex::new(i)`.
struct LayerGraph {
	graph: DiGraph<(), ()>,
}

impl LayerGraph {
	fn new(nodes: &[LayoutNode], edges: &[LayoutEdge]) -> Result<Self, LayoutError> {
		let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
		let index: HashMap<&str, NodeIndex> = nodes
			.iter()
			.map(|n| (n.id.as_str(), graph.add_node(())))
			.collect();
		let lookup = |id: &str, edge: &LayoutEdge| {
			index
				.get(id)
				.copied()
				.ok_or_else(|| LayoutError::UnknownNode {
					edge: format!("{} -> {}", edge.source, edge.target),
					missing: id.to_string(),
				})
		};

		for edge in edges {
			let (src, tgt) = (lookup(&edge.source, edge)?, lookup(&edge.target, edge)?);
			graph.add_edge(src, tgt, ());
		}
		Ok(Self { graph })
	}

	/// Longest path from each node to any sink.
	fn heights(&self, nodes: &[LayoutNode]) -> Result<Vec<usize>, LayoutError> {
		let order = toposort(&self.graph, None)
			.map_err(|cycle| LayoutError::Cycle(nodes[cycle.node_id().index()].id.clone()))?;

		let mut heights = vec![0; self.graph.node_count()];
		for &v in order.iter().rev() {
			let height = self
				.graph
				.neighbors_directed(v, Outgoing)
				.map(|next| heights[next.index()] + 1)
				.max()
				.unwrap_or(0);
			heights[v.index()] = height;
		}
		Ok(heights)
	}

	/// Inputs of `v` in the order their edges were submitted.
	fn inputs(&self, v: NodeIndex) -> Vec<NodeIndex> {
		let mut edges: Vec<_> = self.graph.edges_directed(v, Incoming).collect();
		edges.sort_by_key(|e| e.id());
		edges.into_iter().map(|e| e.source()).collect()
	}
}

/// Tree spanning each sink's inputs, with every node claimed once.
struct Forest {
	roots: Vec<NodeIndex>,
	children: Vec<Vec<NodeIndex>>,
}

impl Forest {
	fn new(layers: &LayerGraph) -> Self {
		let graph = &layers.graph;
		let mut claimed = vec![false; graph.node_count()];
		let mut children = vec![Vec::new(); graph.node_count()];
		let roots: Vec<NodeIndex> = graph.externals(Outgoing).collect();

		let mut stack: Vec<NodeIndex> = roots.iter().rev().copied().collect();
		for &root in &roots {
			claimed[root.index()] = true;
		}
		while let Some(v) = stack.pop() {
			for input in layers.inputs(v) {
				if !claimed[input.index()] {
					claimed[input.index()] = true;
					children[v.index()].push(input);
				}
			}
			stack.extend(children[v.index()].iter().rev().copied());
		}
		Self { roots, children }
	}

	fn children(&self, v: NodeIndex) -> &[NodeIndex] {
		&self.children[v.index()]
	}
}

impl LayeredLayout {
	/// Cross-axis space reserved for each subtree.
	fn extents(&self, forest: &Forest, cross: &[f64]) -> Vec<f64> {
		let mut extents = vec![0.0; cross.len()];
		for &root in &forest.roots {
			self.extent_of(root, forest, cross, &mut extents);
		}
		extents
	}

	fn extent_of(
		&self,
		v: NodeIndex,
		forest: &Forest,
		cross: &[f64],
		extents: &mut [f64],
	) -> f64 {
		let mut span = 0.0;
		for (i, &child) in forest.children(v).iter().enumerate() {
			if i > 0 {
				span += self.node_separation;
			}
			span += self.extent_of(child, forest, cross, extents);
		}
		extents[v.index()] = cross[v.index()].max(span);
		extents[v.index()]
	}

	fn assign(
		&self,
		v: NodeIndex,
		start: f64,
		forest: &Forest,
		extents: &[f64],
		centres: &mut [f64],
	) {
		let extent = extents[v.index()];
		centres[v.index()] = start + extent / 2.0;

		let children = forest.children(v);
		let span: f64 = children.iter().map(|c| extents[c.index()]).sum::<f64>()
			+ self.node_separation * children.len().saturating_sub(1) as f64;
		let mut cursor = start + (extent - span) / 2.0;
		for &child in children {
			self.assign(child, cursor, forest, extents, centres);
			cursor += extents[child.index()] + self.node_separation;
		}
	}
}

impl LayoutEngine for LayeredLayout {
	fn layout(
		&self,
		nodes: &[LayoutNode],
		edges: &[LayoutEdge],
		direction: Direction,
	) -> Result<Positions, LayoutError> {
		let layers = LayerGraph::new(nodes, edges)?;
		let heights = layers.heights(nodes)?;
		let max_height = heights.iter().copied().max().unwrap_or(0);
		let ranks: Vec<usize> = heights.iter().map(|h| max_height - h).collect();

		// Size along the rank axis and across it.
		let (along, cross): (Vec<f64>, Vec<f64>) = nodes
			.iter()
			.map(|n| match direction {
				Direction::TopBottom => (n.height, n.width),
				Direction::LeftRight => (n.width, n.height),
			})
			.unzip();

		let mut thickness = vec![0.0_f64; max_height + 1];
		for (v, &rank) in ranks.iter().enumerate() {
			thickness[rank] = thickness[rank].max(along[v]);
		}
		let mut rank_centres = Vec::with_capacity(thickness.len());
		let mut offset = 0.0;
		for t in &thickness {
			rank_centres.push(offset + t / 2.0);
			offset += t + self.rank_separation;
		}

		let forest = Forest::new(&layers);
		let extents = self.extents(&forest, &cross);
		let mut centres = vec![0.0; nodes.len()];
		let mut cursor = 0.0;
		for &root in &forest.roots {
			self.assign(root, cursor, &forest, &extents, &mut centres);
			cursor += extents[root.index()] + self.node_separation;
		}

		Ok(nodes
			.iter()
			.enumerate()
			.map(|(v, n)| {
				let (a, c) = (rank_centres[ranks[v]], centres[v]);
				let point = match direction {
					Direction::TopBottom => Point { x: c, y: a },
					Direction::LeftRight => Point { x: a, y: c },
				};
				(n.id.clone(), point)
			})
			.collect())
	}
}
