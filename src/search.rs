//! Recipe search service response.
//!
//! `#recipe-data` holds either a bare [`RecipeNode`] or the service envelope:
//!
//! ```json
//! { "data": { "name": "Brick" }, "errors": [], "time": 12, "nodeCount": 48, "recipefound": 3 }
//! ```

use serde::Deserialize;

use crate::recipe::RecipeNode;

/// Outcome of one recipe search, with the statistics shown beside the diagram.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "Payload")]
pub struct SearchResult {
	pub data: Option<RecipeNode>,
	/// Messages reported by the service; when present they replace the diagram.
	pub errors: Vec<String>,
	/// Search time in milliseconds.
	pub time_ms: f64,
	/// Nodes visited by the search.
	pub node_count: u64,
	pub recipes_found: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
	Node(RecipeNode),
	Envelope(Envelope),
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Envelope {
	data: Option<RecipeNode>,
	errors: Option<Vec<String>>,
	time: Option<f64>,
	node_count: Option<u64>,
	#[serde(rename = "recipefound")]
	recipe_found: Option<u64>,
}

impl From<Payload> for SearchResult {
	fn from(payload: Payload) -> Self {
		match payload {
			Payload::Node(node) => Self {
				data: Some(node),
				..Self::default()
			},
			Payload::Envelope(env) => Self {
				data: env.data,
				errors: env.errors.unwrap_or_default(),
				time_ms: env.time.unwrap_or_default(),
				node_count: env.node_count.unwrap_or_default(),
				recipes_found: env.recipe_found.unwrap_or_default(),
			},
		}
	}
}

impl SearchResult {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// The tree to draw. Reported errors suppress it.
	pub fn tree(&self) -> Option<&RecipeNode> {
		self.data.as_ref().filter(|_| self.errors.is_empty())
	}

	/// Summary lines for a successful search, empty when nothing was found.
	pub fn stats(&self) -> Vec<String> {
		if self.tree().is_none() {
			return Vec::new();
		}
		vec![
			format!("Found {} recipes in {}ms", self.recipes_found, self.time_ms),
			format!("Visited {} nodes", self.node_count),
		]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn reads_the_service_envelope() {
		let result = SearchResult::from_json(
			r#"{
				"data": {"name":"Brick","recipes":[[{"name":"Mud"},{"name":"Fire"}]]},
				"errors": null,
				"time": 12,
				"nodeCount": 48,
				"recipefound": 3
			}"#,
		)
		.unwrap();

		assert_eq!(result.tree().map(|t| t.name.as_str()), Some("Brick"));
		assert_eq!(result.node_count, 48);
		assert_eq!(result.recipes_found, 3);
		assert_eq!(
			result.stats(),
			vec!["Found 3 recipes in 12ms".to_string(), "Visited 48 nodes".to_string()]
		);
	}

	#[test]
	fn bare_tree_is_a_result_without_stats_fields() {
		let result = SearchResult::from_json(r#"{"name":"Water"}"#).unwrap();

		assert_eq!(result.data, Some(RecipeNode::leaf("Water")));
		assert!(result.errors.is_empty());
		assert_eq!(result.node_count, 0);
	}

	#[test]
	fn errors_replace_the_tree() {
		let result = SearchResult::from_json(
			r#"{"data":{"name":"Brick"},"errors":["target not found","timeout"]}"#,
		)
		.unwrap();

		assert!(result.data.is_some());
		assert_eq!(result.tree(), None);
		assert!(result.stats().is_empty());
		assert_eq!(result.errors, vec!["target not found", "timeout"]);
	}

	#[test]
	fn empty_envelope_has_nothing_to_draw() {
		let result = SearchResult::from_json("{}").unwrap();
		assert_eq!(result, SearchResult::default());
		assert!(result.stats().is_empty());
	}
}
