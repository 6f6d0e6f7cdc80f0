//! recipe-flow: Interactive combination-recipe diagrams.
//!
//! Turns a recipe tree (every result made from pairs of ingredients) into a
//! layered node/edge diagram and reveals it step by step in breadth-first or
//! depth-first discovery order, to show how a search finds the recipe.
//!
//! The pure core lives in [`recipe`], [`graph`], [`playback`] and [`layout`];
//! the WASM canvas view lives in [`components`].

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod config;
pub mod graph;
pub mod layout;
pub mod playback;
pub mod recipe;
pub mod search;

pub use components::recipe_flow::{RecipeFlow, Theme};
pub use config::ViewerConfig;
pub use graph::{
	GraphEdge, GraphNode, RecipeGraph, Reveal, Strategy, TraversalEvent, build_graph,
	traversal_events,
};
pub use layout::{Direction, LayeredLayout, LayoutEngine};
pub use playback::{PlaybackMode, PlaybackScheduler};
pub use recipe::RecipeNode;
pub use search::SearchResult;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("recipe-flow: logging initialized");
}

/// Parse JSON embedded in a `<script id="...">` element.
fn load_script_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(data) => Some(data),
		Err(e) => {
			warn!("recipe-flow: failed to parse #{}: {}", id, e);
			None
		}
	}
}

/// Load the search result (or bare tree) from `<script id="recipe-data">`.
fn load_search_result() -> SearchResult {
	let result = load_script_json::<SearchResult>("recipe-data").unwrap_or_default();
	match result.tree() {
		Some(tree) => info!(
			"recipe-flow: loaded recipe for {} with {} top-level recipes",
			tree.name,
			tree.recipes.len()
		),
		None if !result.errors.is_empty() => {
			warn!("recipe-flow: search reported {} errors", result.errors.len());
		}
		None => {}
	}
	result
}

/// Load viewer settings from `<script id="recipe-config">`.
fn load_config() -> ViewerConfig {
	load_script_json("recipe-config").unwrap_or_default()
}

/// Main application component.
/// Loads the recipe and settings from the DOM and renders the diagram with
/// playback controls.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let result = load_search_result();
	let recipe = result.tree().cloned();
	let has_recipe = recipe.is_some();
	let tree = Signal::derive(move || recipe.clone());
	let stats = result.stats();
	let errors = result.errors;

	let direction = RwSignal::new(config.direction);
	let strategy = RwSignal::new(config.algorithm);
	let mode = RwSignal::new(config.mode);
	let interval = RwSignal::new(config.interval_ms);
	let theme = Theme::named(&config.theme);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Recipe Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<RecipeFlow
				tree=tree
				direction=direction
				strategy=strategy
				mode=mode
				interval_ms=interval
				theme=Some(theme)
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Recipe Explorer"</h1>
				<Show
					when=move || has_recipe
					fallback=|| view! { <p class="subtitle">"No recipe data available"</p> }
				>
					<p class="subtitle">"Drag background to pan. Scroll to zoom."</p>
				</Show>
				<div class="controls">
					<label>
						"Algorithm "
						<select
							prop:value=move || strategy.get().as_str()
							on:change=move |ev| match event_target_value(&ev).parse() {
								Ok(s) => strategy.set(s),
								Err(e) => warn!("recipe-flow: {}", e),
							}
						>
							<option value="BFS">"Breadth-First Search (BFS)"</option>
							<option value="DFS">"Depth-First Search (DFS)"</option>
						</select>
					</label>
					<label>
						"Layout "
						<select
							prop:value=move || direction.get().as_str()
							on:change=move |ev| match event_target_value(&ev).parse() {
								Ok(d) => direction.set(d),
								Err(e) => warn!("recipe-flow: {}", e),
							}
						>
							<option value="TB">"Top to bottom"</option>
							<option value="LR">"Left to right"</option>
						</select>
					</label>
					<label>
						"Playback "
						<select
							prop:value=move || mode.get().as_str()
							on:change=move |ev| match event_target_value(&ev).parse() {
								Ok(m) => mode.set(m),
								Err(e) => warn!("recipe-flow: {}", e),
							}
						>
							<option value="live">"Live"</option>
							<option value="instant">"Instant"</option>
						</select>
					</label>
					<label>
						{move || format!("Step {}ms ", interval.get())}
						<input
							type="range"
							min="50"
							max="2000"
							step="50"
							prop:value=move || interval.get().to_string()
							on:input=move |ev| {
								if let Ok(ms) = event_target_value(&ev).parse::<u32>() {
									interval.set(ms);
								}
							}
						/>
					</label>
				</div>
			</div>
		</div>
	}
}
