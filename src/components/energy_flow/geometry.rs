//! Parametric point evaluation along lines and Bézier curves, plus node
//! boundary anchors.
//!
//! Everything here is pure. Parameters outside `[0, 1]` are extrapolated, not
//! rejected, and non-finite inputs come back out as non-finite outputs.

use std::ops::{Add, Mul, Sub};

/// A point (or vector) in canvas pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(other - self).length()
	}

	pub fn length(self) -> f64 {
		self.x.hypot(self.y)
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}

	/// Mirror image across the vertical line `x = axis_x`.
	pub fn reflect_x(self, axis_x: f64) -> Point {
		Point::new(2.0 * axis_x - self.x, self.y)
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Point {
	type Output = Point;

	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

pub fn point_on_line(p0: Point, p1: Point, t: f64) -> Point {
	p0 + (p1 - p0) * t
}

pub fn point_on_quadratic_bezier(p0: Point, c: Point, p1: Point, t: f64) -> Point {
	let mt = 1.0 - t;
	p0 * (mt * mt) + c * (2.0 * mt * t) + p1 * (t * t)
}

pub fn point_on_cubic_bezier(p0: Point, c1: Point, c2: Point, p1: Point, t: f64) -> Point {
	let mt = 1.0 - t;
	p0 * (mt * mt * mt) + c1 * (3.0 * mt * mt * t) + c2 * (3.0 * mt * t * t) + p1 * (t * t * t)
}

/// Point on a circular node boundary at `angle` radians (canvas
/// orientation: y grows downward, so `PI / 2` is the bottom of the node).
pub fn anchor_on_node_boundary(center: Point, angle: f64, radius: f64) -> Point {
	Point::new(
		center.x + angle.cos() * radius,
		center.y + angle.sin() * radius,
	)
}

/// Angle of the direction from `from` to `to`.
pub fn direction_angle(from: Point, to: Point) -> f64 {
	(to.y - from.y).atan2(to.x - from.x)
}
