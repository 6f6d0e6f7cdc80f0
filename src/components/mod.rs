//! UI components.

pub mod recipe_flow;
