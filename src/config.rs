//! Viewer configuration.
//!
//! Loaded from a `<script id="recipe-config">` JSON block. Every field is
//! optional:
//!
//! ```json
//! { "direction": "LR", "algorithm": "DFS", "mode": "live", "intervalMs": 300, "theme": "paper" }
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::graph::Strategy;
use crate::layout::Direction;
use crate::playback::{DEFAULT_INTERVAL_MS, PlaybackMode};

/// Rejected configuration or form value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("unknown {field} `{value}`")]
	UnknownValue { field: &'static str, value: String },
}

impl ConfigError {
	pub(crate) fn unknown(field: &'static str, value: &str) -> Self {
		Self::UnknownValue {
			field,
			value: value.to_string(),
		}
	}
}

/// Initial playback and presentation settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
	pub direction: Direction,
	pub algorithm: Strategy,
	pub mode: PlaybackMode,
	/// Delay between live reveal steps.
	pub interval_ms: u32,
	/// Name of a [`Theme`](crate::components::recipe_flow::Theme) preset.
	pub theme: String,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			direction: Direction::default(),
			algorithm: Strategy::default(),
			mode: PlaybackMode::default(),
			interval_ms: DEFAULT_INTERVAL_MS,
			theme: "default".to_string(),
		}
	}
}

impl ViewerConfig {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}
