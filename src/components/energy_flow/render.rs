use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::geometry::Point;
use super::icons::IconCache;
use super::paths::PathSink;
use super::state::EnergyFlowState;

const NODE_FILL: &str = "#ffffff";
const TEXT_COLOR: &str = "#333";
const NODE_STROKE_WIDTH: f64 = 2.0;

/// Path commands straight onto the 2d context.
struct CanvasPath<'a>(&'a CanvasRenderingContext2d);

impl PathSink for CanvasPath<'_> {
	fn move_to(&mut self, p: Point) {
		self.0.move_to(p.x, p.y);
	}

	fn line_to(&mut self, p: Point) {
		self.0.line_to(p.x, p.y);
	}

	fn quadratic_to(&mut self, ctrl: Point, to: Point) {
		self.0.quadratic_curve_to(ctrl.x, ctrl.y, to.x, to.y);
	}

	fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
		self.0
			.bezier_curve_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y);
	}

	fn arc_to(&mut self, corner: Point, to: Point, radius: f64) {
		let _ = self.0.arc_to(corner.x, corner.y, to.x, to.y, radius);
	}
}

/// Links, then particles, then nodes, so nodes cover the path ends.
pub fn render(state: &EnergyFlowState, ctx: &CanvasRenderingContext2d, icons: &IconCache) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	draw_links(state, ctx);
	draw_particles(state, ctx);
	draw_nodes(state, ctx, icons);
}

fn draw_links(state: &EnergyFlowState, ctx: &CanvasRenderingContext2d) {
	for link in &state.links {
		let Some(path) = state.path(link.key()) else {
			continue;
		};
		if path.is_degenerate() {
			continue;
		}
		ctx.begin_path();
		path.trace(&mut CanvasPath(ctx));
		ctx.set_stroke_style_str(&link.color);
		ctx.set_line_width(state.line_width(link));
		ctx.stroke();
	}
}

fn draw_particles(state: &EnergyFlowState, ctx: &CanvasRenderingContext2d) {
	for particle in state.particles.particles() {
		if !state.particle_drawable(particle) {
			continue;
		}
		let (Some(path), Some(link)) = (state.path(particle.link), state.link(particle.link)) else {
			continue;
		};
		let at = path.point_at(particle.progress);
		if !at.is_finite() {
			continue;
		}
		ctx.begin_path();
		let _ = ctx.arc(at.x, at.y, particle.size, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&link.color);
		ctx.fill();
	}
}

fn draw_nodes(state: &EnergyFlowState, ctx: &CanvasRenderingContext2d, icons: &IconCache) {
	let r = state.node_radius();
	let font_size = (r * 0.5).clamp(12.0, 16.0);
	ctx.set_text_align("center");

	for node in &state.nodes {
		let Some(Point { x, y }) = state.layout.position(node.role) else {
			continue;
		};

		ctx.begin_path();
		let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(NODE_FILL);
		ctx.fill();
		ctx.set_stroke_style_str(&node.color);
		ctx.set_line_width(NODE_STROKE_WIDTH);
		ctx.stroke();

		if let Some(image) = icons.ready(node.role) {
			let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
				image,
				x - r / 2.0,
				y - r / 2.0,
				r,
				r,
			);
		}

		ctx.set_fill_style_str(TEXT_COLOR);
		ctx.set_font(&format!("bold {}px Arial", font_size));
		let _ = ctx.fill_text(&node.label, x, y - r - 10.0);

		ctx.set_font(&format!("{}px Arial", font_size));
		for (i, line) in node.display_lines.iter().enumerate() {
			let _ = ctx.fill_text(line, x, y + r + 15.0 + i as f64 * font_size);
		}
	}
}
