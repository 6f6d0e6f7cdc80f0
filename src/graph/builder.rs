//! Canonical graph construction.
//!
//! [`place`] walks the recipe tree once in pre-order and assigns every id and
//! label up front. [`build_graph`] flattens that placement in the same
//! pre-order; the traversal orderer re-walks it in BFS or DFS order.

use log::debug;

use super::{GraphEdge, GraphNode, RecipeGraph};
use crate::recipe::RecipeNode;

/// Per-build id counters. Never shared between builds.
#[derive(Debug)]
struct IdAllocator {
	next_node: usize,
	next_combo: usize,
	next_recipe: usize,
}

impl IdAllocator {
	fn new() -> Self {
		Self {
			next_node: 1,
			next_combo: 1,
			next_recipe: 1,
		}
	}

	fn node_id(&mut self) -> String {
		let id = format!("node{}", self.next_node);
		self.next_node += 1;
		id
	}

	fn combo_id(&mut self) -> String {
		let id = format!("combo{}", self.next_combo);
		self.next_combo += 1;
		id
	}

	fn recipe_label(&mut self) -> String {
		let label = format!("Recipe {}", self.next_recipe);
		self.next_recipe += 1;
		label
	}
}

/// A recipe tree occurrence with its graph items already allocated.
#[derive(Debug)]
pub(crate) struct Placement {
	pub(crate) node: GraphNode,
	pub(crate) pairs: Vec<PlacedPair>,
}

/// One combination pair: its junction, both ingredient subtrees, and the three
/// edges connecting them.
#[derive(Debug)]
pub(crate) struct PlacedPair {
	pub(crate) junction: GraphNode,
	pub(crate) left: Placement,
	pub(crate) right: Placement,
	pub(crate) left_edge: GraphEdge,
	pub(crate) right_edge: GraphEdge,
	pub(crate) produce: GraphEdge,
}

/// Allocates ids for a whole tree with fresh counters.
pub(crate) fn place(root: &RecipeNode) -> Placement {
	let mut ids = IdAllocator::new();
	place_node(root, true, &mut ids)
}

fn place_node(recipe: &RecipeNode, is_root: bool, ids: &mut IdAllocator) -> Placement {
	let node = GraphNode::element(ids.node_id(), &recipe.name);

	let pairs = recipe
		.recipes
		.iter()
		.map(|(left, right)| {
			let junction = GraphNode::junction(ids.combo_id());
			// Children allocate before anything discovered after them.
			let left = place_node(left, false, ids);
			let right = place_node(right, false, ids);
			let label = is_root.then(|| ids.recipe_label());

			PlacedPair {
				left_edge: GraphEdge::combine(&left.node.id, &junction.id),
				right_edge: GraphEdge::combine(&right.node.id, &junction.id),
				produce: GraphEdge::produce(&junction.id, &node.id, label),
				junction,
				left,
				right,
			}
		})
		.collect();

	Placement { node, pairs }
}

/// Builds the full diagram for a recipe tree.
///
/// Nodes are listed in pre-order (element, then each junction followed by its
/// left and right subtrees). Edges for a pair follow its subtrees' edges:
/// left combine, right combine, then the produce edge. An absent tree yields
/// an empty graph.
pub fn build_graph(root: Option<&RecipeNode>) -> RecipeGraph {
	let Some(root) = root else {
		return RecipeGraph::default();
	};

	let mut graph = RecipeGraph::default();
	collect(&place(root), &mut graph);
	debug!(
		"recipe-flow: built graph for {} ({} nodes, {} edges)",
		root.name,
		graph.nodes.len(),
		graph.edges.len()
	);
	graph
}

fn collect(placement: &Placement, graph: &mut RecipeGraph) {
	graph.nodes.push(placement.node.clone());
	for pair in &placement.pairs {
		graph.nodes.push(pair.junction.clone());
		collect(&pair.left, graph);
		collect(&pair.right, graph);
		graph.edges.extend([
			pair.left_edge.clone(),
			pair.right_edge.clone(),
			pair.produce.clone(),
		]);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{EdgeKind, NodeKind};
	use pretty_assertions::assert_eq;

	fn brick() -> RecipeNode {
		RecipeNode::leaf("Brick").with_recipe(RecipeNode::leaf("Mud"), RecipeNode::leaf("Fire"))
	}

	fn ids(graph: &RecipeGraph) -> Vec<&str> {
		graph.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	fn edge_summary(graph: &RecipeGraph) -> Vec<(&str, &str, Option<&str>)> {
		graph
			.edges
			.iter()
			.map(|e| (e.source.as_str(), e.target.as_str(), e.label.as_deref()))
			.collect()
	}

	#[test]
	fn single_recipe_yields_four_nodes_and_three_edges() {
		let graph = build_graph(Some(&brick()));

		assert_eq!(ids(&graph), vec!["node1", "combo1", "node2", "node3"]);
		let labels: Vec<_> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
		assert_eq!(labels, vec!["Brick", "", "Mud", "Fire"]);
		assert_eq!(graph.nodes[1].kind, NodeKind::Junction);

		assert_eq!(
			edge_summary(&graph),
			vec![
				("node2", "combo1", Some("combine")),
				("node3", "combo1", Some("combine")),
				("combo1", "node1", Some("Recipe 1")),
			]
		);
		assert_eq!(graph.edges[2].id, "e-combo1-node1");
		assert_eq!(graph.edges[2].kind, EdgeKind::Produce);
	}

	#[test]
	fn base_ingredient_yields_single_node() {
		let graph = build_graph(Some(&RecipeNode::leaf("Water")));

		assert_eq!(graph.nodes.len(), 1);
		assert!(graph.edges.is_empty());
		assert_eq!(graph.nodes[0].label, "Water");
	}

	#[test]
	fn absent_tree_yields_empty_graph() {
		assert!(build_graph(None).is_empty());
	}

	#[test]
	fn only_root_pairs_are_numbered() {
		let mud = RecipeNode::leaf("Mud")
			.with_recipe(RecipeNode::leaf("Water"), RecipeNode::leaf("Earth"));
		let tree = RecipeNode::leaf("Brick")
			.with_recipe(mud, RecipeNode::leaf("Fire"))
			.with_recipe(RecipeNode::leaf("Clay"), RecipeNode::leaf("Stone"));

		let graph = build_graph(Some(&tree));

		assert_eq!(
			ids(&graph),
			vec![
				"node1", "combo1", "node2", "combo2", "node3", "node4", "node5", "combo3", "node6",
				"node7",
			]
		);
		assert_eq!(
			edge_summary(&graph),
			vec![
				("node3", "combo2", Some("combine")),
				("node4", "combo2", Some("combine")),
				("combo2", "node2", None),
				("node2", "combo1", Some("combine")),
				("node5", "combo1", Some("combine")),
				("combo1", "node1", Some("Recipe 1")),
				("node6", "combo3", Some("combine")),
				("node7", "combo3", Some("combine")),
				("combo3", "node1", Some("Recipe 2")),
			]
		);
	}

	#[test]
	fn repeated_names_become_distinct_nodes() {
		let mud = || {
			RecipeNode::leaf("Mud")
				.with_recipe(RecipeNode::leaf("Water"), RecipeNode::leaf("Earth"))
		};
		let tree = RecipeNode::leaf("Brick")
			.with_recipe(mud(), RecipeNode::leaf("Fire"))
			.with_recipe(mud(), RecipeNode::leaf("Stone"));

		let graph = build_graph(Some(&tree));
		let muds = graph.nodes.iter().filter(|n| n.label == "Mud").count();
		assert_eq!(muds, 2);
	}

	#[test]
	fn rebuilding_is_stable() {
		let tree = brick().with_recipe(RecipeNode::leaf("Clay"), RecipeNode::leaf("Fire"));
		assert_eq!(build_graph(Some(&tree)), build_graph(Some(&tree)));
	}
}
