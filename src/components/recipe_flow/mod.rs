//! Recipe diagram visualization component.
//!
//! Renders a recipe tree on an HTML canvas as a layered diagram with:
//! - Element boxes joined through small junction dots, one per recipe
//! - Dashed "combine" edges and solid, arrowed produce edges
//! - BFS or DFS ordered reveal, live on a timer or all at once
//! - Pan and zoom interactions
//!
//! # Example
//!
//! ```ignore
//! use recipe_flow::{RecipeFlow, RecipeNode};
//!
//! let tree = RecipeNode::leaf("Brick")
//!     .with_recipe(RecipeNode::leaf("Mud"), RecipeNode::leaf("Fire"));
//!
//! view! {
//!     <RecipeFlow
//!         tree=Signal::derive(move || Some(tree.clone()))
//!         direction=Direction::TopBottom
//!         strategy=Strategy::Dfs
//!         mode=PlaybackMode::Live
//!         interval_ms=500
//!         fullscreen=true
//!     />
//! }
//! ```

mod component;
mod render;
mod state;
pub mod theme;
mod timer;

pub use component::RecipeFlow;
pub use state::{DiagramState, ViewTransform};
pub use theme::Theme;
