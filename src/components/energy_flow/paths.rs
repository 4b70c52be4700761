//! Resolves a link into concrete path geometry.
//!
//! A [`FlowPath`] is the single source of truth for a link's shape: the
//! stroke renderer traces it through a [`PathSink`] and the particle system
//! samples it with [`FlowPath::point_at`], so both always agree.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;

use super::geometry::{
	Point, anchor_on_node_boundary, direction_angle, point_on_cubic_bezier, point_on_line,
	point_on_quadratic_bezier,
};
use super::topology::{self, PathRecipe, PivotRule};
use super::types::{LinkKey, NodeRole};
use crate::config::FlowConfig;

/// Node centers in canvas pixels plus the shared node radius.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeLayout {
	positions: BTreeMap<NodeRole, Point>,
	pub radius: f64,
}

impl NodeLayout {
	pub fn new(radius: f64) -> Self {
		Self {
			positions: BTreeMap::new(),
			radius,
		}
	}

	/// Places `roles` by their topology ratios on a `width` x `height` canvas.
	pub fn from_ratios(
		roles: impl IntoIterator<Item = NodeRole>,
		width: f64,
		height: f64,
		radius: f64,
	) -> Self {
		let mut layout = Self::new(radius);
		for role in roles {
			let (rx, ry) = topology::layout_ratio(role);
			layout.insert(role, Point::new(width * rx, height * ry));
		}
		layout
	}

	pub fn with(mut self, role: NodeRole, at: Point) -> Self {
		self.insert(role, at);
		self
	}

	pub fn insert(&mut self, role: NodeRole, at: Point) {
		self.positions.insert(role, at);
	}

	pub fn position(&self, role: NodeRole) -> Option<Point> {
		self.positions.get(&role).copied()
	}

	/// Center-to-center distance, if both nodes are placed.
	pub fn distance(&self, key: LinkKey) -> Option<f64> {
		Some(self.position(key.source)?.distance(self.position(key.target)?))
	}
}

/// Receives path drawing commands; implemented over the canvas context.
pub trait PathSink {
	fn move_to(&mut self, p: Point);
	fn line_to(&mut self, p: Point);
	fn quadratic_to(&mut self, ctrl: Point, to: Point);
	fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point);
	/// Canvas `arcTo` semantics: round the corner at `corner` heading to `to`.
	fn arc_to(&mut self, corner: Point, to: Point, radius: f64);
}

/// Three axis-aligned legs (vertical, horizontal, vertical) whose two corners
/// are rounded with quarter arcs.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundedPolyline {
	pub from: Point,
	pub to: Point,
	pub pivot: Point,
	pub corners: [Point; 2],
	pub radius: f64,
	/// Lengths of leg, arc, leg, arc, leg.
	pub segments: [f64; 5],
	dirs: [Point; 3],
}

fn unit_sign(v: f64) -> f64 {
	if v > 0.0 {
		1.0
	} else if v < 0.0 {
		-1.0
	} else {
		0.0
	}
}

impl RoundedPolyline {
	pub fn new(from: Point, pivot: Point, to: Point, max_radius: f64) -> Self {
		let corners = [Point::new(from.x, pivot.y), Point::new(to.x, pivot.y)];
		let dirs = [
			Point::new(0.0, unit_sign(pivot.y - from.y)),
			Point::new(unit_sign(to.x - from.x), 0.0),
			Point::new(0.0, unit_sign(to.y - pivot.y)),
		];
		let (rise, run, fall) = (
			(pivot.y - from.y).abs(),
			(to.x - from.x).abs(),
			(to.y - pivot.y).abs(),
		);
		let radius = max_radius
			.min(rise * 0.2)
			.min((to.x - pivot.x).abs() * 0.2)
			.min(fall * 0.2)
			.min(run / 2.0)
			.max(0.0);
		let arc = radius * FRAC_PI_2;
		Self {
			from,
			to,
			pivot,
			corners,
			radius,
			segments: [
				rise - radius,
				arc,
				run - 2.0 * radius,
				arc,
				fall - radius,
			],
			dirs,
		}
	}

	pub fn length(&self) -> f64 {
		self.segments.iter().sum()
	}

	/// Point on the quarter arc rounding `corner`, `f` of the way through it.
	fn arc_point(&self, corner: Point, d_in: Point, d_out: Point, f: f64) -> Point {
		let r = self.radius;
		let center = corner - d_in * r + d_out * r;
		let theta = f * FRAC_PI_2;
		center - d_out * (r * theta.cos()) + d_in * (r * theta.sin())
	}

	pub fn point_at(&self, t: f64) -> Point {
		let total = self.length();
		if total <= 0.0 {
			return self.from;
		}
		let [k1, k2] = self.corners;
		let [d1, d2, d3] = self.dirs;
		let r = self.radius;
		let mut s = t * total;
		for (i, &len) in self.segments.iter().enumerate() {
			let last = i == self.segments.len() - 1;
			if s > len && !last {
				s -= len;
				continue;
			}
			let f = if len > 0.0 { s / len } else { 0.0 };
			return match i {
				0 => self.from + d1 * s,
				1 => self.arc_point(k1, d1, d2, f),
				2 => k1 + d2 * r + d2 * s,
				3 => self.arc_point(k2, d2, d3, f),
				_ => k2 + d3 * r + d3 * s,
			};
		}
		self.to
	}

	fn trace<S: PathSink + ?Sized>(&self, sink: &mut S) {
		let [k1, k2] = self.corners;
		let [d1, d2, d3] = self.dirs;
		let r = self.radius;
		sink.move_to(self.from);
		sink.line_to(k1 - d1 * r);
		sink.arc_to(k1, k1 + d2 * r, r);
		sink.line_to(k2 - d2 * r);
		sink.arc_to(k2, k2 + d3 * r, r);
		sink.line_to(self.to);
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowPath {
	/// Only one endpoint is placed; nothing to stroke or animate.
	Point(Point),
	Straight {
		from: Point,
		to: Point,
	},
	Quadratic {
		from: Point,
		ctrl: Point,
		to: Point,
	},
	Cubic {
		from: Point,
		ctrl1: Point,
		ctrl2: Point,
		to: Point,
	},
	Rounded(RoundedPolyline),
}

impl FlowPath {
	pub fn is_degenerate(&self) -> bool {
		matches!(self, FlowPath::Point(_))
	}

	pub fn start(&self) -> Point {
		match self {
			FlowPath::Point(p) => *p,
			FlowPath::Straight { from, .. }
			| FlowPath::Quadratic { from, .. }
			| FlowPath::Cubic { from, .. } => *from,
			FlowPath::Rounded(r) => r.from,
		}
	}

	pub fn end(&self) -> Point {
		match self {
			FlowPath::Point(p) => *p,
			FlowPath::Straight { to, .. }
			| FlowPath::Quadratic { to, .. }
			| FlowPath::Cubic { to, .. } => *to,
			FlowPath::Rounded(r) => r.to,
		}
	}

	/// Dogleg pivot, for rounded polylines.
	pub fn pivot(&self) -> Option<Point> {
		match self {
			FlowPath::Rounded(r) => Some(r.pivot),
			_ => None,
		}
	}

	pub fn point_at(&self, t: f64) -> Point {
		match self {
			FlowPath::Point(p) => *p,
			FlowPath::Straight { from, to } => point_on_line(*from, *to, t),
			FlowPath::Quadratic { from, ctrl, to } => point_on_quadratic_bezier(*from, *ctrl, *to, t),
			FlowPath::Cubic {
				from,
				ctrl1,
				ctrl2,
				to,
			} => point_on_cubic_bezier(*from, *ctrl1, *ctrl2, *to, t),
			FlowPath::Rounded(r) => r.point_at(t),
		}
	}

	pub fn trace<S: PathSink + ?Sized>(&self, sink: &mut S) {
		match self {
			FlowPath::Point(_) => {}
			FlowPath::Straight { from, to } => {
				sink.move_to(*from);
				sink.line_to(*to);
			}
			FlowPath::Quadratic { from, ctrl, to } => {
				sink.move_to(*from);
				sink.quadratic_to(*ctrl, *to);
			}
			FlowPath::Cubic {
				from,
				ctrl1,
				ctrl2,
				to,
			} => {
				sink.move_to(*from);
				sink.cubic_to(*ctrl1, *ctrl2, *to);
			}
			FlowPath::Rounded(r) => r.trace(sink),
		}
	}
}

/// Turns link keys into paths against a node layout.
#[derive(Clone, Debug)]
pub struct PathResolver {
	coaxial_threshold: f64,
	max_corner_radius: f64,
	fallback_bow: f64,
}

impl PathResolver {
	pub fn new(config: &FlowConfig) -> Self {
		Self {
			coaxial_threshold: config.coaxial_threshold,
			max_corner_radius: config.max_corner_radius,
			fallback_bow: config.fallback_bow,
		}
	}

	/// `None` only when neither endpoint is placed.
	pub fn resolve(&self, key: LinkKey, layout: &NodeLayout) -> Option<FlowPath> {
		let (from, to) = match (layout.position(key.source), layout.position(key.target)) {
			(Some(from), Some(to)) => (from, to),
			(Some(only), None) | (None, Some(only)) => return Some(FlowPath::Point(only)),
			(None, None) => return None,
		};
		let r = layout.radius;
		let recipe = topology::route_for(key).map(|rule| rule.recipe);
		let path = match recipe {
			Some(PathRecipe::Straight) => straight(from, to, r),
			Some(PathRecipe::CubicHorizontal) => {
				let start = anchor_on_node_boundary(from, topology::horizontal_exit(from.x, to.x), r);
				let end = anchor_on_node_boundary(to, topology::horizontal_exit(to.x, from.x), r);
				let mid_x = (start.x + end.x) / 2.0;
				FlowPath::Cubic {
					from: start,
					ctrl1: Point::new(mid_x, start.y),
					ctrl2: Point::new(mid_x, end.y),
					to: end,
				}
			}
			Some(PathRecipe::CubicVertical) => {
				let start = anchor_on_node_boundary(from, topology::vertical_exit(from.y, to.y), r);
				let end = anchor_on_node_boundary(to, topology::vertical_exit(to.y, from.y), r);
				let mid_y = (start.y + end.y) / 2.0;
				FlowPath::Cubic {
					from: start,
					ctrl1: Point::new(start.x, mid_y),
					ctrl2: Point::new(end.x, mid_y),
					to: end,
				}
			}
			Some(PathRecipe::Dogleg {
				start_angle,
				end_angle,
				pivot,
			}) => match pivot_point(pivot, layout) {
				Some(pivot) => FlowPath::Rounded(RoundedPolyline::new(
					anchor_on_node_boundary(from, start_angle, r),
					pivot,
					anchor_on_node_boundary(to, end_angle, r),
					self.max_corner_radius,
				)),
				None => self.fallback(from, to, r),
			},
			None => self.fallback(from, to, r),
		};
		Some(path)
	}

	/// Straight when the centers are nearly aligned on either axis, otherwise
	/// a quadratic bowed off the midpoint.
	fn fallback(&self, from: Point, to: Point, r: f64) -> FlowPath {
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		if dx.abs() < self.coaxial_threshold || dy.abs() < self.coaxial_threshold {
			return straight(from, to, r);
		}
		let dist = dx.hypot(dy);
		let normal = Point::new(-dy / dist, dx / dist);
		FlowPath::Quadratic {
			from: anchor_on_node_boundary(from, direction_angle(from, to), r),
			ctrl: from.midpoint(to) + normal * (dist * self.fallback_bow),
			to: anchor_on_node_boundary(to, direction_angle(to, from), r),
		}
	}
}

fn straight(from: Point, to: Point, r: f64) -> FlowPath {
	FlowPath::Straight {
		from: anchor_on_node_boundary(from, direction_angle(from, to), r),
		to: anchor_on_node_boundary(to, direction_angle(to, from), r),
	}
}

/// Vertical line through the midpoint of the two hubs.
pub fn symmetry_axis(layout: &NodeLayout) -> Option<f64> {
	let grid = layout.position(NodeRole::Grid)?;
	let home = layout.position(NodeRole::HomeLoad)?;
	Some((grid.x + home.x) / 2.0)
}

fn pivot_point(rule: PivotRule, layout: &NodeLayout) -> Option<Point> {
	match rule {
		PivotRule::Reference { dx, dy } => {
			let solar = layout.position(NodeRole::Solar)?;
			let battery = layout.position(NodeRole::Battery)?;
			let grid = layout.position(NodeRole::Grid)?;
			layout.position(NodeRole::HomeLoad)?;
			let center = Point::new((solar.x + battery.x) / 2.0, (solar.y + grid.y) / 2.0);
			let offset = layout.radius.sqrt();
			Some(center + Point::new(dx * offset, dy * offset))
		}
		PivotRule::MirrorOf(reference) => {
			let Some(PathRecipe::Dogleg {
				pivot: inner @ PivotRule::Reference { .. },
				..
			}) = topology::route_for(reference).map(|rule| rule.recipe)
			else {
				return None;
			};
			Some(pivot_point(inner, layout)?.reflect_x(symmetry_axis(layout)?))
		}
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::NodeRole::*;
	use super::*;

	const EPS: f64 = 1e-9;

	fn resolver() -> PathResolver {
		PathResolver::new(&FlowConfig::default())
	}

	fn standard_layout(width: f64, height: f64) -> NodeLayout {
		NodeLayout::from_ratios(NodeRole::ALL, width, height, 25.0)
	}

	#[derive(Debug, PartialEq)]
	enum Cmd {
		Move(Point),
		Line(Point),
		Quad(Point, Point),
		Cubic(Point, Point, Point),
		Arc(Point, Point, f64),
	}

	#[derive(Default)]
	struct Recorder(Vec<Cmd>);

	impl PathSink for Recorder {
		fn move_to(&mut self, p: Point) {
			self.0.push(Cmd::Move(p));
		}
		fn line_to(&mut self, p: Point) {
			self.0.push(Cmd::Line(p));
		}
		fn quadratic_to(&mut self, ctrl: Point, to: Point) {
			self.0.push(Cmd::Quad(ctrl, to));
		}
		fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
			self.0.push(Cmd::Cubic(ctrl1, ctrl2, to));
		}
		fn arc_to(&mut self, corner: Point, to: Point, radius: f64) {
			self.0.push(Cmd::Arc(corner, to, radius));
		}
	}

	#[test]
	fn grid_to_home_is_a_horizontal_s_bend() {
		let layout = NodeLayout::new(25.0)
			.with(Grid, Point::new(0.0, 300.0))
			.with(Solar, Point::new(0.0, 100.0))
			.with(HomeLoad, Point::new(400.0, 200.0));
		let path = resolver()
			.resolve(LinkKey::new(Grid, HomeLoad), &layout)
			.unwrap();
		let FlowPath::Cubic {
			from,
			ctrl1,
			ctrl2,
			to,
		} = path
		else {
			panic!("expected cubic, got {path:?}");
		};
		assert_eq!(from, Point::new(25.0, 300.0));
		assert!((to.x - 375.0).abs() < EPS && (to.y - 200.0).abs() < EPS);
		for c in [ctrl1, ctrl2] {
			assert!(c.x > 0.0 && c.x < 400.0, "control {c:?} not between the nodes");
		}
		assert_eq!(ctrl1.y, from.y);
		assert_eq!(ctrl2.y, to.y);
	}

	#[test]
	fn adjacent_pairs_are_straight() {
		let layout = standard_layout(600.0, 400.0);
		for key in [
			LinkKey::new(HomeLoad, Charger),
			LinkKey::new(SmartLoad, HomeLoad),
			LinkKey::new(Solar, Battery),
		] {
			let path = resolver().resolve(key, &layout).unwrap();
			assert!(matches!(path, FlowPath::Straight { .. }), "{key:?}: {path:?}");
		}
	}

	#[test]
	fn straight_paths_touch_node_edges() {
		let layout = standard_layout(600.0, 400.0);
		let path = resolver()
			.resolve(LinkKey::new(Solar, Battery), &layout)
			.unwrap();
		let solar = layout.position(Solar).unwrap();
		let battery = layout.position(Battery).unwrap();
		assert!((path.start().distance(solar) - 25.0).abs() < EPS);
		assert!((path.end().distance(battery) - 25.0).abs() < EPS);
	}

	#[test]
	fn unlisted_diagonal_pair_bows_into_a_quadratic() {
		let layout = standard_layout(600.0, 400.0);
		let path = resolver()
			.resolve(LinkKey::new(Grid, Charger), &layout)
			.unwrap();
		let FlowPath::Quadratic { from, ctrl, to } = path else {
			panic!("expected quadratic, got {path:?}");
		};
		let mid = layout
			.position(Grid)
			.unwrap()
			.midpoint(layout.position(Charger).unwrap());
		assert!(ctrl.distance(mid) > 1.0);
		assert!(from.is_finite() && to.is_finite());
	}

	#[test]
	fn unlisted_near_coaxial_pair_is_straight() {
		let layout = NodeLayout::new(20.0)
			.with(Grid, Point::new(100.0, 200.0))
			.with(SmartLoad, Point::new(400.0, 205.0));
		let path = resolver()
			.resolve(LinkKey::new(Grid, SmartLoad), &layout)
			.unwrap();
		assert!(matches!(path, FlowPath::Straight { .. }));
	}

	#[test]
	fn missing_endpoint_degenerates_to_the_present_node() {
		let layout = NodeLayout::new(20.0).with(Solar, Point::new(50.0, 50.0));
		let path = resolver()
			.resolve(LinkKey::new(Solar, HomeLoad), &layout)
			.unwrap();
		assert_eq!(path, FlowPath::Point(Point::new(50.0, 50.0)));
		assert!(path.is_degenerate());
		assert_eq!(path.point_at(0.7), Point::new(50.0, 50.0));

		let mut rec = Recorder::default();
		path.trace(&mut rec);
		assert!(rec.0.is_empty());

		assert!(
			resolver()
				.resolve(LinkKey::new(Grid, Charger), &layout)
				.is_none()
		);
	}

	#[test]
	fn dogleg_falls_back_when_reference_nodes_are_missing() {
		let layout = NodeLayout::new(20.0)
			.with(Solar, Point::new(150.0, 70.0))
			.with(Grid, Point::new(90.0, 220.0));
		let path = resolver()
			.resolve(LinkKey::new(Solar, Grid), &layout)
			.unwrap();
		assert!(matches!(path, FlowPath::Quadratic { .. }));
	}

	#[test]
	fn dogleg_legs_are_axis_aligned_and_end_on_anchors() {
		let layout = standard_layout(600.0, 400.0);
		let path = resolver()
			.resolve(LinkKey::new(Solar, Grid), &layout)
			.unwrap();
		let FlowPath::Rounded(ref poly) = path else {
			panic!("expected rounded polyline, got {path:?}");
		};
		let grid = layout.position(Grid).unwrap();
		assert!((poly.to.x - grid.x).abs() < EPS);
		assert!((poly.to.y - (grid.y - 25.0)).abs() < EPS);
		assert!(poly.radius > 0.0 && poly.radius <= 12.0);
		assert!(poly.segments.iter().all(|&s| s >= 0.0));
		assert_eq!(poly.corners[0].x, poly.from.x);
		assert_eq!(poly.corners[1].x, poly.to.x);
		assert_eq!(poly.corners[0].y, poly.pivot.y);

		assert!(path.point_at(0.0).distance(poly.from) < 1e-6);
		assert!(path.point_at(1.0).distance(poly.to) < 1e-6);

		let mut rec = Recorder::default();
		path.trace(&mut rec);
		assert_eq!(rec.0.first(), Some(&Cmd::Move(poly.from)));
		assert_eq!(rec.0.last(), Some(&Cmd::Line(poly.to)));
		assert_eq!(
			rec.0.iter().filter(|c| matches!(c, Cmd::Arc(..))).count(),
			2
		);
	}

	#[test]
	fn dogleg_samples_form_a_continuous_curve() {
		let layout = standard_layout(900.0, 600.0);
		for key in [
			LinkKey::new(Solar, Grid),
			LinkKey::new(Solar, HomeLoad),
			LinkKey::new(Battery, Grid),
			LinkKey::new(Battery, HomeLoad),
		] {
			let path = resolver().resolve(key, &layout).unwrap();
			let FlowPath::Rounded(ref poly) = path else {
				panic!("{key:?} not rounded: {path:?}");
			};
			let steps = 400;
			let max_step = poly.length() / steps as f64 * 1.01 + 1e-6;
			let mut prev = path.point_at(0.0);
			for i in 1..=steps {
				let p = path.point_at(i as f64 / steps as f64);
				assert!(prev.distance(p) <= max_step, "{key:?} jumps at step {i}");
				prev = p;
			}
		}
	}

	#[test]
	fn arc_traced_corners_match_sampled_corners() {
		let layout = standard_layout(600.0, 400.0);
		let path = resolver()
			.resolve(LinkKey::new(Solar, HomeLoad), &layout)
			.unwrap();
		let FlowPath::Rounded(ref poly) = path else {
			panic!("expected rounded polyline");
		};
		let mut rec = Recorder::default();
		path.trace(&mut rec);
		let total = poly.length();
		let end_of_first_arc = (poly.segments[0] + poly.segments[1]) / total;
		let Cmd::Arc(_, arc_end, _) = rec.0[2] else {
			panic!("third command should round the first corner");
		};
		assert!(path.point_at(end_of_first_arc).distance(arc_end) < 1e-6);
	}

	#[test]
	fn dogleg_corner_radius_collapses_on_a_flat_leg() {
		let poly = RoundedPolyline::new(
			Point::new(0.0, 100.0),
			Point::new(50.0, 100.0),
			Point::new(200.0, 150.0),
			12.0,
		);
		assert_eq!(poly.radius, 0.0);
		assert_eq!(poly.point_at(0.0), Point::new(0.0, 100.0));
		assert!(poly.point_at(1.0).distance(Point::new(200.0, 150.0)) < 1e-9);
	}

	#[test]
	fn battery_and_solar_pivots_mirror_across_the_hub_axis() {
		let layout = standard_layout(600.0, 400.0);
		let axis = symmetry_axis(&layout).unwrap();
		let r = resolver();
		let solar = r.resolve(LinkKey::new(Solar, Grid), &layout).unwrap();
		let battery = r.resolve(LinkKey::new(Battery, Grid), &layout).unwrap();
		let (a, b) = (solar.pivot().unwrap(), battery.pivot().unwrap());
		assert!(((a.x + b.x) / 2.0 - axis).abs() < EPS);
		assert_eq!(a.y, b.y);
	}

	#[test]
	fn solar_pivots_sit_above_the_center_on_either_side() {
		let layout = standard_layout(600.0, 400.0);
		let r = resolver();
		let (solar, battery, grid) = (
			layout.position(Solar).unwrap(),
			layout.position(Battery).unwrap(),
			layout.position(Grid).unwrap(),
		);
		let center = Point::new((solar.x + battery.x) / 2.0, (solar.y + grid.y) / 2.0);
		let d = 25.0f64.sqrt();

		let to_grid = r.resolve(LinkKey::new(Solar, Grid), &layout).unwrap();
		let to_home = r.resolve(LinkKey::new(Solar, HomeLoad), &layout).unwrap();
		assert!(to_grid.pivot().unwrap().distance(center + Point::new(-d, -d)) < EPS);
		assert!(to_home.pivot().unwrap().distance(center + Point::new(d, -d)) < EPS);
	}

	fn coordinate() -> impl Strategy<Value = f64> {
		0.0f64..2000.0
	}

	proptest! {
		#[test]
		fn mirrored_pivots_hold_for_any_layout(
			sx in coordinate(), sy in coordinate(),
			bx in coordinate(), by in coordinate(),
			gx in coordinate(), gy in coordinate(),
			hx in coordinate(), hy in coordinate(),
			radius in 18.0f64..35.0,
		) {
			let layout = NodeLayout::new(radius)
				.with(Solar, Point::new(sx, sy))
				.with(Battery, Point::new(bx, by))
				.with(Grid, Point::new(gx, gy))
				.with(HomeLoad, Point::new(hx, hy));
			let axis = (gx + hx) / 2.0;
			let r = resolver();
			for (reference, mirrored) in [
				(LinkKey::new(Solar, Grid), LinkKey::new(Battery, Grid)),
				(LinkKey::new(Solar, HomeLoad), LinkKey::new(Battery, HomeLoad)),
			] {
				let a = r.resolve(reference, &layout).unwrap().pivot().unwrap();
				let b = r.resolve(mirrored, &layout).unwrap().pivot().unwrap();
				prop_assert!(((a.x + b.x) / 2.0 - axis).abs() < 1e-6);
				prop_assert_eq!(a.y, b.y);
			}
		}

		#[test]
		fn every_path_starts_and_ends_where_it_is_traced(
			w in 300.0f64..1600.0,
			si in 0usize..6,
			ti in 0usize..6,
		) {
			let layout = standard_layout(w, (w * 2.0 / 3.0).floor());
			let key = LinkKey::new(NodeRole::ALL[si], NodeRole::ALL[ti]);
			let path = resolver().resolve(key, &layout).unwrap();
			prop_assert!(path.point_at(0.0).distance(path.start()) < 1e-6);
			prop_assert!(path.point_at(1.0).distance(path.end()) < 1e-6);
		}
	}
}
