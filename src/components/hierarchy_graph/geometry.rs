//! Small geometric helpers shared by the forces and the renderer.
//!
//! Angles follow the screen convention used throughout the graph: `atan2(x, y)` with sine on the
//! x axis, so angle zero points down (+y).

use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A link drawn between two points after shortening.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShortLine {
	pub source: Point,
	pub target: Point,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShortenMode {
	/// Shrink the drawn length by the given amount.
	#[default]
	By,
	/// Set the drawn length to exactly the given amount.
	To,
}

/// Result of [`clamp_xy_to_radius`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClampedPoint {
	pub x: f64,
	pub y: f64,
	pub was_clamped: bool,
	/// Distance of the input from the origin, when a positive radius was checked.
	pub xy_radius: Option<f64>,
	pub radius: Option<f64>,
}

/// Coerce a possibly missing number to a usable one: `None` and NaN become zero.
pub fn def_num(value: impl Into<Option<f64>>) -> f64 {
	match value.into() {
		Some(v) if !v.is_nan() => v,
		_ => 0.0,
	}
}

pub fn point_along_line(dx: f64, dy: f64, length: f64) -> Point {
	let angle = dx.atan2(dy);
	Point::new(angle.sin() * length, angle.cos() * length)
}

/// Move the target of a segment along its direction. The source never moves and negative
/// lengths are passed through untouched.
pub fn shorten_line(
	source_x: f64,
	source_y: f64,
	target_x: f64,
	target_y: f64,
	length: f64,
	mode: ShortenMode,
) -> ShortLine {
	let (x, y) = (target_x - source_x, target_y - source_y);
	let radius = match mode {
		ShortenMode::To => length,
		ShortenMode::By => x.hypot(y) - length,
	};
	let short = point_along_line(x, y, radius);
	ShortLine {
		source: Point::new(source_x, source_y),
		target: Point::new(source_x + short.x, source_y + short.y),
	}
}

pub fn circle_area(radius: f64) -> f64 {
	PI * radius * radius
}

pub fn circle_radius(area: f64) -> f64 {
	(area / PI).sqrt()
}

/// Keep `[x, y]` inside a circle around the origin.
///
/// A missing, zero or NaN radius disables the check. A negative radius collapses the point onto
/// the origin.
pub fn clamp_xy_to_radius([x, y]: [f64; 2], radius: Option<f64>) -> ClampedPoint {
	let radius = match radius {
		Some(r) if r != 0.0 && !r.is_nan() => r,
		_ => {
			return ClampedPoint {
				x,
				y,
				was_clamped: false,
				xy_radius: None,
				radius: None,
			};
		}
	};
	if radius < 0.0 {
		return ClampedPoint {
			x: 0.0,
			y: 0.0,
			was_clamped: true,
			xy_radius: None,
			radius: Some(radius),
		};
	}

	let xy_radius = x.hypot(y);
	let was_clamped = xy_radius > radius;
	let (x, y) = if was_clamped {
		let theta = x.atan2(y);
		(theta.sin() * radius, theta.cos() * radius)
	} else {
		(x, y)
	};
	ClampedPoint {
		x,
		y,
		was_clamped,
		xy_radius: Some(xy_radius),
		radius: Some(radius),
	}
}

/// Multiply, round half away from zero, divide. Inherits the usual binary floating point
/// surprises at decimal boundaries (`round(1.005, 2) == 1.0`).
pub fn round(number: f64, decimals: i32) -> f64 {
	let scale = 10f64.powi(decimals);
	(number * scale).round() / scale
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < EPS
	}

	#[test]
	fn point_along_line_points_down_at_zero_angle() {
		let p = point_along_line(0.0, 0.0, 5.0);
		assert_eq!(p.x, 0.0);
		assert_eq!(p.y, 5.0);

		let p = point_along_line(3.0, 4.0, 10.0);
		assert!(close(p.x, 6.0));
		assert!(close(p.y, 8.0));
	}

	#[test]
	fn shorten_by_keeps_source_and_direction() {
		let line = shorten_line(0.0, 0.0, 10.0, 0.0, 3.0, ShortenMode::By);
		assert_eq!(line.source, Point::new(0.0, 0.0));
		assert!(close(line.target.x, 7.0));
		assert!(close(line.target.y, 0.0));
	}

	#[test]
	fn shorten_to_sets_exact_length() {
		let line = shorten_line(0.0, 0.0, 10.0, 0.0, 3.0, ShortenMode::To);
		let len = (line.target.x - line.source.x).hypot(line.target.y - line.source.y);
		assert!(close(len, 3.0));
		assert!(line.target.x > 0.0);
	}

	#[test]
	fn shorten_past_the_source_flips_the_target() {
		let line = shorten_line(2.0, 2.0, 2.0, 6.0, 10.0, ShortenMode::By);
		assert!(close(line.target.x, 2.0));
		assert!(close(line.target.y, -4.0));
	}

	#[test]
	fn circle_round_trip() {
		for r in [0.0, 0.5, 1.0, 7.25, 1000.0] {
			assert!((circle_radius(circle_area(r)) - r).abs() < 1e-9 * r.max(1.0));
		}
		assert!(circle_radius(-1.0).is_nan());
	}

	#[test]
	fn clamp_inside_is_untouched() {
		for (x, y, r) in [(1.0, 1.0, 5.0), (3.0, 4.0, 5.0), (-2.0, 0.5, 3.0)] {
			let c = clamp_xy_to_radius([x, y], Some(r));
			assert!(!c.was_clamped);
			assert_eq!((c.x, c.y), (x, y));
		}
	}

	#[test]
	fn clamp_outside_lands_on_circle() {
		for (x, y, r) in [(10.0, 0.0, 5.0), (-30.0, 40.0, 5.0), (1.0, -1.0, 0.5)] {
			let c = clamp_xy_to_radius([x, y], Some(r));
			assert!(c.was_clamped);
			assert!(close(c.x.hypot(c.y), r));
			// direction preserved
			assert!(close(c.x * y, c.y * x));
			assert!(c.x * x >= 0.0 && c.y * y >= 0.0);
		}
	}

	#[test]
	fn clamp_falsy_radius_disables() {
		for r in [None, Some(0.0), Some(f64::NAN)] {
			let c = clamp_xy_to_radius([100.0, -50.0], r);
			assert!(!c.was_clamped);
			assert_eq!((c.x, c.y), (100.0, -50.0));
		}
	}

	#[test]
	fn clamp_negative_radius_collapses() {
		let c = clamp_xy_to_radius([3.0, 4.0], Some(-1.0));
		assert!(c.was_clamped);
		assert_eq!((c.x, c.y), (0.0, 0.0));
	}

	#[test]
	fn round_scales_then_rounds() {
		assert_eq!(round(2.345, 2), 2.35);
		assert_eq!(round(1.005, 2), 1.0);
		assert_eq!(round(2.5, 0), 3.0);
		// half away from zero; JavaScript's Math.round would give -2 here
		assert_eq!(round(-2.5, 0), -3.0);
		assert_eq!(round(0.125, 2), 0.13);
	}

	#[test]
	fn def_num_fills_holes() {
		assert_eq!(def_num(None::<f64>), 0.0);
		assert_eq!(def_num(f64::NAN), 0.0);
		assert_eq!(def_num(Some(4.5)), 4.5);
		assert_eq!(def_num(-1.0), -1.0);
	}
}
