//! Recipe tree input model.
//!
//! A [`RecipeNode`] is one occurrence of an element in a recipe tree. Elements
//! without recipes are base ingredients; everything else lists one or more
//! combination pairs that each produce it. Repeated names are distinct
//! occurrences and are never merged.
//!
//! Two JSON shapes are accepted for `recipes`:
//!
//! ```json
//! { "name": "Brick", "recipes": [[{ "name": "Mud" }, { "name": "Fire" }]] }
//! { "name": "Brick", "recipes": [{ "name": "Mud" }, { "name": "Fire" }] }
//! ```
//!
//! A list holding any nested array is read as pairs; otherwise it is the flat
//! form, grouped into consecutive pairs. Entries that are not a pair, and
//! ingredients that are not nodes, are skipped with a warning. A malformed
//! entry never fails the whole document.

use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One occurrence of an element in a recipe tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RecipeNode {
	/// Element name, used as the display label.
	pub name: String,
	/// Alternative ways of producing this element, in source order.
	#[serde(default, deserialize_with = "deserialize_pairs")]
	pub recipes: Vec<(RecipeNode, RecipeNode)>,
}

impl RecipeNode {
	/// A base ingredient.
	pub fn leaf(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			recipes: Vec::new(),
		}
	}

	/// Adds a combination pair producing this element.
	pub fn with_recipe(mut self, left: RecipeNode, right: RecipeNode) -> Self {
		self.recipes.push((left, right));
		self
	}

	/// Whether this occurrence is a base ingredient.
	pub fn is_base(&self) -> bool {
		self.recipes.is_empty()
	}

	/// Parses a recipe tree from the search service's JSON payload.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

fn deserialize_pairs<'de, D>(deserializer: D) -> Result<Vec<(RecipeNode, RecipeNode)>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(deserializer)? {
		None => Vec::new(),
		Some(Value::Array(entries)) if entries.iter().any(Value::is_array) => {
			pairs_from_entries(entries)
		}
		Some(Value::Array(items)) => pairs_from_flat(items),
		Some(other) => {
			warn!("recipe-flow: ignoring recipes that are not a list: {}", other);
			Vec::new()
		}
	})
}

/// Parses one ingredient, logging and dropping anything that is not a node.
fn ingredient(value: Value) -> Option<RecipeNode> {
	match serde_json::from_value(value) {
		Ok(node) => Some(node),
		Err(e) => {
			warn!("recipe-flow: skipped malformed ingredient: {}", e);
			None
		}
	}
}

fn pairs_from_entries(entries: Vec<Value>) -> Vec<(RecipeNode, RecipeNode)> {
	let total = entries.len();
	let pairs: Vec<_> = entries
		.into_iter()
		.filter_map(|entry| {
			let Value::Array(items) = entry else {
				return None;
			};
			let [left, right]: [Value; 2] = items.try_into().ok()?;
			Some((ingredient(left)?, ingredient(right)?))
		})
		.collect();

	if pairs.len() < total {
		warn!(
			"recipe-flow: skipped {} recipe entries that were not a pair of ingredients",
			total - pairs.len()
		);
	}
	pairs
}

fn pairs_from_flat(items: Vec<Value>) -> Vec<(RecipeNode, RecipeNode)> {
	let total = items.len();
	let nodes: Vec<RecipeNode> = items
		.into_iter()
		.filter(|item| !item.is_null())
		.filter_map(ingredient)
		.collect();
	if nodes.len() < total {
		warn!("recipe-flow: skipped {} entries in flat recipe list", total - nodes.len());
	}
	if nodes.len() % 2 == 1 {
		warn!("recipe-flow: ignoring unpaired trailing ingredient in flat recipe list");
	}

	let mut pairs = Vec::with_capacity(nodes.len() / 2);
	let mut nodes = nodes.into_iter();
	while let (Some(left), Some(right)) = (nodes.next(), nodes.next()) {
		pairs.push((left, right));
	}
	pairs
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn parses_pair_lists() {
		let node = RecipeNode::from_json(
			r#"{"name":"Brick","recipes":[[{"name":"Mud"},{"name":"Fire"}]]}"#,
		)
		.unwrap();

		assert_eq!(
			node,
			RecipeNode::leaf("Brick").with_recipe(RecipeNode::leaf("Mud"), RecipeNode::leaf("Fire"))
		);
	}

	#[test]
	fn missing_or_null_recipes_mean_base_ingredient() {
		let missing = RecipeNode::from_json(r#"{"name":"Water"}"#).unwrap();
		let null = RecipeNode::from_json(r#"{"name":"Water","recipes":null}"#).unwrap();
		let empty = RecipeNode::from_json(r#"{"name":"Water","recipes":[]}"#).unwrap();

		assert!(missing.is_base());
		assert_eq!(missing, null);
		assert_eq!(missing, empty);
	}

	#[test]
	fn skips_incomplete_pair_entries() {
		let node = RecipeNode::from_json(
			r#"{"name":"Stone","recipes":[
				[{"name":"Lava"}],
				[{"name":"Lava"},{"name":"Air"}],
				[{"name":"Earth"},{"name":"Air"},{"name":"Fire"}]
			]}"#,
		)
		.unwrap();

		assert_eq!(node.recipes.len(), 1);
		assert_eq!(node.recipes[0].0.name, "Lava");
		assert_eq!(node.recipes[0].1.name, "Air");
	}

	#[test]
	fn stray_entries_in_a_pair_list_are_skipped() {
		let stray = RecipeNode::from_json(
			r#"{"name":"Brick","recipes":[[{"name":"Mud"},{"name":"Fire"}],{"name":"Stray"}]}"#,
		)
		.unwrap();
		let null = RecipeNode::from_json(
			r#"{"name":"Brick","recipes":[[{"name":"Mud"},{"name":"Fire"}],null]}"#,
		)
		.unwrap();

		let expected = RecipeNode::leaf("Brick")
			.with_recipe(RecipeNode::leaf("Mud"), RecipeNode::leaf("Fire"));
		assert_eq!(stray, expected);
		assert_eq!(null, expected);
	}

	#[test]
	fn pair_with_a_nameless_ingredient_is_skipped() {
		let node = RecipeNode::from_json(
			r#"{"name":"Brick","recipes":[
				[{"name":"Mud"},{"title":"Fire"}],
				[{"name":"Clay"},{"name":"Fire"}]
			]}"#,
		)
		.unwrap();

		assert_eq!(node.recipes.len(), 1);
		assert_eq!(node.recipes[0].0.name, "Clay");
	}

	#[test]
	fn non_list_recipes_mean_base_ingredient() {
		let node = RecipeNode::from_json(r#"{"name":"Water","recipes":"none"}"#).unwrap();
		assert!(node.is_base());
	}

	#[test]
	fn groups_flat_lists_and_drops_odd_leftover() {
		let node = RecipeNode::from_json(
			r#"{"name":"Stone","recipes":[
				{"name":"Lava"},{"name":"Air"},
				{"name":"Earth"},{"name":"Pressure"},
				{"name":"Fire"}
			]}"#,
		)
		.unwrap();

		let names: Vec<_> = node
			.recipes
			.iter()
			.map(|(l, r)| (l.name.as_str(), r.name.as_str()))
			.collect();
		assert_eq!(names, vec![("Lava", "Air"), ("Earth", "Pressure")]);
	}

	#[test]
	fn nested_recipes_keep_repeated_names_distinct() {
		let node = RecipeNode::from_json(
			r#"{"name":"Brick","recipes":[
				[{"name":"Mud","recipes":[[{"name":"Water"},{"name":"Earth"}]]},{"name":"Fire"}],
				[{"name":"Mud"},{"name":"Stone"}]
			]}"#,
		)
		.unwrap();

		assert_eq!(node.recipes.len(), 2);
		assert!(!node.recipes[0].0.is_base());
		assert!(node.recipes[1].0.is_base());
		assert_eq!(node.recipes[0].0.name, node.recipes[1].0.name);
	}
}
