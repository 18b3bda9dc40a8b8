//! 2D ray utilities.
//!
//! A ray is anchored at an origin and points along a fixed direction angle
//! (radians, measured counter-clockwise from the positive x-axis via `atan2`).

use std::f64::consts::TAU;

use super::{Point2, TOLERANCE};

/// A ray anchored at an origin point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point2,
    angle: f64,
}

impl Ray {
    /// Creates a ray at `origin` pointing along `angle` (radians).
    #[must_use]
    pub fn new(origin: Point2, angle: f64) -> Self {
        Self { origin, angle }
    }

    /// Creates a ray anchored at `start` pointing toward `through`.
    ///
    /// A near-coincident point pair yields a ray with angle 0.
    #[must_use]
    pub fn from_points(start: Point2, through: Point2) -> Self {
        let mut ray = Self::new(start, 0.0);
        ray.set_points(start, through);
        ray
    }

    /// Re-aims the ray: anchored at `start`, pointing toward `through`.
    pub fn set_points(&mut self, start: Point2, through: Point2) {
        self.origin = start;
        let dx = through.x - start.x;
        let dy = through.y - start.y;
        if dx.abs() < TOLERANCE && dy.abs() < TOLERANCE {
            self.angle = 0.0;
        } else {
            self.angle = dy.atan2(dx);
        }
    }

    /// Returns the anchor point of the ray.
    #[must_use]
    pub fn origin(&self) -> Point2 {
        self.origin
    }

    /// Returns the direction angle of the ray in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

/// Angle swept from ray `a` to ray `b`, in `[0, 2π)`.
///
/// `ccw` selects the winding sense the sweep is measured in: `true` measures
/// counter-clockwise, `false` clockwise.
#[must_use]
pub fn angle_between(a: &Ray, b: &Ray, ccw: bool) -> f64 {
    let delta = if ccw {
        b.angle() - a.angle()
    } else {
        a.angle() - b.angle()
    };
    delta.rem_euclid(TAU)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn from_points_cardinal_directions() {
        let origin = Point2::new(1.0, 1.0);
        let east = Ray::from_points(origin, Point2::new(3.0, 1.0));
        assert!(east.angle().abs() < TOL, "angle={}", east.angle());

        let north = Ray::from_points(origin, Point2::new(1.0, 5.0));
        assert!((north.angle() - FRAC_PI_2).abs() < TOL);

        let west = Ray::from_points(origin, Point2::new(0.0, 1.0));
        assert!((west.angle() - PI).abs() < TOL);
    }

    #[test]
    fn from_points_coincident_defaults_to_zero() {
        let p = Point2::new(2.0, 3.0);
        let ray = Ray::from_points(p, p);
        assert!(ray.angle().abs() < TOL);
        assert!((ray.origin() - p).norm() < TOL);
    }

    #[test]
    fn set_points_re_aims() {
        let mut ray = Ray::from_points(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        ray.set_points(Point2::new(5.0, 5.0), Point2::new(5.0, 0.0));
        assert!((ray.angle() + FRAC_PI_2).abs() < TOL, "angle={}", ray.angle());
        assert!((ray.origin().x - 5.0).abs() < TOL);
    }

    // ── angle_between tests ──

    #[test]
    fn angle_between_quarter_turn() {
        let a = Ray::new(Point2::new(0.0, 0.0), 0.0);
        let b = Ray::new(Point2::new(0.0, 0.0), FRAC_PI_2);
        assert!((angle_between(&a, &b, true) - FRAC_PI_2).abs() < TOL);
        assert!((angle_between(&a, &b, false) - 3.0 * FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn angle_between_is_normalized() {
        let a = Ray::new(Point2::new(0.0, 0.0), -3.0 * PI);
        let b = Ray::new(Point2::new(0.0, 0.0), FRAC_PI_2);
        let swept = angle_between(&a, &b, true);
        assert!((0.0..TAU).contains(&swept), "swept={swept}");
        assert!((swept - 3.0 * FRAC_PI_2).abs() < 1e-9, "swept={swept}");
    }

    #[test]
    fn angle_between_same_direction_is_zero() {
        let a = Ray::new(Point2::new(0.0, 0.0), 1.0);
        let b = Ray::new(Point2::new(9.0, 9.0), 1.0);
        assert!(angle_between(&a, &b, true).abs() < TOL);
    }
}
