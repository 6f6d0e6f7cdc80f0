//! Canvas rendering for the recipe diagram.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edge lines and arrowheads, then edge labels (world space)
//! 3. Junction dots, then element boxes with their labels

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::DiagramState;
use super::theme::Theme;
use crate::graph::{EdgeKind, GraphEdge, GraphNode, NodeKind};
use crate::layout::{Point, node_size};

/// Renders the visible diagram to the canvas.
pub fn render(state: &DiagramState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, theme);
	draw_nodes(state, ctx, theme);

	ctx.restore();
}

fn draw_background(state: &DiagramState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

/// Resolves both endpoints of an edge, skipping edges without positions.
fn endpoints<'a>(
	state: &'a DiagramState,
	edge: &GraphEdge,
) -> Option<((&'a GraphNode, Point), (&'a GraphNode, Point))> {
	let source = state.graph.node(&edge.source)?;
	let target = state.graph.node(&edge.target)?;
	Some((
		(source, *state.positions.get(&edge.source)?),
		(target, *state.positions.get(&edge.target)?),
	))
}

/// Distance from a box centre to its border along the unit vector `(ux, uy)`.
fn border_offset(kind: NodeKind, ux: f64, uy: f64) -> f64 {
	let (w, h) = node_size(kind);
	let tx = if ux.abs() > 1e-9 { (w / 2.0) / ux.abs() } else { f64::INFINITY };
	let ty = if uy.abs() > 1e-9 { (h / 2.0) / uy.abs() } else { f64::INFINITY };
	tx.min(ty)
}

fn draw_edges(state: &DiagramState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	for edge in &state.graph.edges {
		draw_edge_line(state, ctx, theme, edge);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	ctx.set_font(&theme.edge_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for edge in &state.graph.edges {
		draw_edge_label(state, ctx, theme, edge);
	}
}

fn draw_edge_line(
	state: &DiagramState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	edge: &GraphEdge,
) {
	let Some(((source, p1), (target, p2))) = endpoints(state, edge) else {
		return;
	};
	let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let start = border_offset(source.kind, ux, uy);
	let end = border_offset(target.kind, -ux, -uy);
	let (tip_x, tip_y) = (p2.x - ux * end, p2.y - uy * end);

	let style = &theme.edge;
	let (color, width, arrow) = match edge.kind {
		EdgeKind::Combine => {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(style.dash.0),
				&JsValue::from_f64(style.dash.1),
			));
			(style.combine_color, style.combine_width, 0.0)
		}
		EdgeKind::Produce => {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
			(style.produce_color, style.produce_width, style.arrow_size)
		}
	};

	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(p1.x + ux * start, p1.y + uy * start);
	ctx.line_to(tip_x - ux * arrow, tip_y - uy * arrow);
	ctx.stroke();

	if arrow > 0.0 {
		let (back_x, back_y) = (tip_x - ux * arrow, tip_y - uy * arrow);
		let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);

		ctx.set_fill_style_str(&color.to_css());
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_edge_label(
	state: &DiagramState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	edge: &GraphEdge,
) {
	let Some(label) = &edge.label else {
		return;
	};
	let Some(((_, p1), (_, p2))) = endpoints(state, edge) else {
		return;
	};

	let (mx, my) = ((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
	let pad = 3.0;
	let width = label.chars().count() as f64 * 6.0 + pad * 2.0;

	ctx.set_fill_style_str(&theme.background.color.with_alpha(0.85).to_css());
	ctx.fill_rect(mx - width / 2.0, my - 8.0, width, 16.0);
	ctx.set_fill_style_str(&theme.edge.label_color.to_css());
	let _ = ctx.fill_text(label, mx, my);
}

fn draw_nodes(state: &DiagramState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	// Pass 1: junction dots
	ctx.set_fill_style_str(&theme.node.junction_color.to_css());
	for node in state.graph.nodes.iter().filter(|n| n.kind == NodeKind::Junction) {
		let Some(p) = state.positions.get(&node.id) else {
			continue;
		};
		let (w, _) = node_size(node.kind);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, w / 2.0, 0.0, 2.0 * PI);
		ctx.fill();
	}

	// Pass 2: element boxes and labels
	ctx.set_font(&theme.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for node in state.graph.nodes.iter().filter(|n| n.kind == NodeKind::Element) {
		let Some(p) = state.positions.get(&node.id) else {
			continue;
		};
		let is_root = state.root_id.as_deref() == Some(node.id.as_str());
		draw_element(ctx, theme, node, *p, is_root);
	}
}

fn draw_element(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	node: &GraphNode,
	p: Point,
	is_root: bool,
) {
	let (w, h) = node_size(node.kind);
	let (x, y) = (p.x - w / 2.0, p.y - h / 2.0);
	let style = &theme.node;
	let fill = if is_root { style.root_fill } else { style.fill };

	rounded_rect(ctx, x, y, w, h, style.corner_radius);
	let gradient = ctx.create_linear_gradient(x, y, x, y + h);
	let _ = gradient.add_color_stop(0.0, &fill.lighten(0.15).to_css());
	let _ = gradient.add_color_stop(1.0, &fill.to_css());
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();

	if style.border_width > 0.0 {
		ctx.set_stroke_style_str(&style.border_color.to_css());
		ctx.set_line_width(style.border_width);
		ctx.stroke();
	}

	ctx.set_fill_style_str(&style.text_color.to_css());
	let _ = ctx.fill_text_with_max_width(&node.label, p.x, p.y, w - 8.0);
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn border_offset_hits_the_nearest_side() {
		// Straight down from an element centre meets the bottom edge.
		assert_eq!(border_offset(NodeKind::Element, 0.0, 1.0), 25.0);
		// Straight across meets the side.
		assert_eq!(border_offset(NodeKind::Element, -1.0, 0.0), 75.0);
		assert_eq!(border_offset(NodeKind::Junction, 0.0, -1.0), 5.0);
	}
}
