use crate::math::{Point2, Vector2, TOLERANCE};

/// A cubic Bezier segment defined by four control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    p0: Point2,
    p1: Point2,
    p2: Point2,
    p3: Point2,
}

impl CubicBezier {
    /// Creates a new cubic Bezier from its control points.
    #[must_use]
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Returns the first control point (curve start).
    #[must_use]
    pub fn p0(&self) -> Point2 {
        self.p0
    }

    /// Returns the second control point.
    #[must_use]
    pub fn p1(&self) -> Point2 {
        self.p1
    }

    /// Returns the third control point.
    #[must_use]
    pub fn p2(&self) -> Point2 {
        self.p2
    }

    /// Returns the fourth control point (curve end).
    #[must_use]
    pub fn p3(&self) -> Point2 {
        self.p3
    }

    /// Evaluates the curve at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn value_at(&self, t: f64) -> Point2 {
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let t2 = t * t;
        let w0 = mt2 * mt;
        let w1 = 3.0 * mt2 * t;
        let w2 = 3.0 * mt * t2;
        let w3 = t2 * t;
        Point2::new(
            w0 * self.p0.x + w1 * self.p1.x + w2 * self.p2.x + w3 * self.p3.x,
            w0 * self.p0.y + w1 * self.p1.y + w2 * self.p2.y + w3 * self.p3.y,
        )
    }

    /// Computes the derivative (velocity) at parameter `t`.
    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Vector2 {
        let mt = 1.0 - t;
        let v0 = (self.p1 - self.p0) * (3.0 * mt * mt);
        let v1 = (self.p2 - self.p1) * (6.0 * mt * t);
        let v2 = (self.p3 - self.p2) * (3.0 * t * t);
        v0 + v1 + v2
    }

    /// Splits the curve at parameter `t` using de Casteljau's algorithm.
    #[must_use]
    pub fn split(&self, t: f64) -> (Self, Self) {
        let p01 = lerp(self.p0, self.p1, t);
        let p12 = lerp(self.p1, self.p2, t);
        let p23 = lerp(self.p2, self.p3, t);

        let p012 = lerp(p01, p12, t);
        let p123 = lerp(p12, p23, t);

        let p0123 = lerp(p012, p123, t);

        (
            Self::new(self.p0, p01, p012, p0123),
            Self::new(p0123, p123, p23, self.p3),
        )
    }

    /// Returns the sub-curve between parameters `t0` and `t1`.
    #[must_use]
    pub fn portion(&self, t0: f64, t1: f64) -> Self {
        if t0 >= 1.0 - TOLERANCE {
            let p = self.value_at(t0);
            return Self::new(p, p, p, p);
        }
        let (_, right) = self.split(t0);
        let local = (t1 - t0) / (1.0 - t0);
        let (wanted, _) = right.split(local.clamp(0.0, 1.0));
        wanted
    }

    /// Returns the curve traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.p3, self.p2, self.p1, self.p0)
    }

    /// Returns the maximum distance from the inner control points to the
    /// chord `p0`-`p3`, used as a flatness measure for adaptive subdivision.
    #[must_use]
    pub fn flatness(&self) -> f64 {
        let d1 = point_to_chord_dist(self.p1, self.p0, self.p3);
        let d2 = point_to_chord_dist(self.p2, self.p0, self.p3);
        d1.max(d2)
    }

    /// Flattens the curve to a polyline using adaptive subdivision.
    ///
    /// `tolerance` bounds the deviation between the curve and its chords.
    /// The start point is always first and the end point always last.
    /// Non-finite curves flatten to their chord.
    #[must_use]
    pub fn to_polyline(&self, tolerance: f64) -> Vec<Point2> {
        let mut points = vec![self.p0];
        if self.is_finite() {
            self.subdivide_into(tolerance.max(TOLERANCE), &mut points);
        } else {
            points.push(self.p3);
        }
        points
    }

    fn subdivide_into(&self, tolerance: f64, points: &mut Vec<Point2>) {
        if self.flatness() <= tolerance {
            points.push(self.p3);
        } else {
            let (left, right) = self.split(0.5);
            left.subdivide_into(tolerance, points);
            right.subdivide_into(tolerance, points);
        }
    }

    /// Approximates the arc length by flattening against `tolerance` and
    /// accumulating chord lengths.
    #[must_use]
    pub fn arc_length(&self, tolerance: f64) -> f64 {
        let points = self.to_polyline(tolerance);
        points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum()
    }

    /// Returns the parameter of the point on the curve closest to `point`.
    ///
    /// Sampled scan followed by ternary-search refinement in the best bracket.
    #[must_use]
    pub fn nearest_parameter(&self, point: Point2) -> f64 {
        let n_samples = 64u32;
        let mut best_t = 0.0;
        let mut best_dist = f64::INFINITY;

        for i in 0..=n_samples {
            let t = f64::from(i) / f64::from(n_samples);
            let d = (point - self.value_at(t)).norm();
            if d < best_dist {
                best_dist = d;
                best_t = t;
            }
        }

        let dt = 1.0 / f64::from(n_samples);
        let mut lo = (best_t - dt).max(0.0);
        let mut hi = (best_t + dt).min(1.0);

        for _ in 0..50 {
            let mid1 = lo + (hi - lo) / 3.0;
            let mid2 = hi - (hi - lo) / 3.0;
            let d1 = (point - self.value_at(mid1)).norm();
            let d2 = (point - self.value_at(mid2)).norm();
            if d1 < d2 {
                hi = mid2;
            } else {
                lo = mid1;
            }
        }

        #[allow(clippy::manual_midpoint)]
        let best = (lo + hi) / 2.0;
        best
    }

    /// Returns whether all control point coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.p0, self.p1, self.p2, self.p3]
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Returns the total length of the control polygon, an upper bound on
    /// the arc length.
    #[must_use]
    pub fn control_polygon_length(&self) -> f64 {
        (self.p1 - self.p0).norm() + (self.p2 - self.p1).norm() + (self.p3 - self.p2).norm()
    }
}

/// Linear interpolation between two points.
fn lerp(a: Point2, b: Point2, t: f64) -> Point2 {
    a + (b - a) * t
}

/// Distance from `point` to the chord `a`-`b`; falls back to the distance
/// to `a` when the chord is degenerate.
fn point_to_chord_dist(point: Point2, a: Point2, b: Point2) -> f64 {
    let dir = b - a;
    let len_sq = dir.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return (point - a).norm();
    }
    let t = (point - a).dot(&dir) / len_sq;
    let closest = a + dir * t.clamp(0.0, 1.0);
    (point - closest).norm()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn arch() -> CubicBezier {
        CubicBezier::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 2.0),
            Point2::new(4.0, 0.0),
        )
    }

    #[test]
    fn value_at_endpoints() {
        let curve = arch();
        assert!((curve.value_at(0.0) - curve.p0()).norm() < TOL);
        assert!((curve.value_at(1.0) - curve.p3()).norm() < TOL);
    }

    #[test]
    fn value_at_midpoint_of_symmetric_arch() {
        // Symmetric control polygon: the midpoint sits on the axis x = 2.
        let mid = arch().value_at(0.5);
        assert!((mid.x - 2.0).abs() < TOL, "mid.x={}", mid.x);
        assert!(mid.y > 0.0);
    }

    #[test]
    fn split_preserves_endpoints_and_joins() {
        let curve = arch();
        let (left, right) = curve.split(0.3);
        assert!((left.p0() - curve.p0()).norm() < TOL);
        assert!((right.p3() - curve.p3()).norm() < TOL);
        assert!((left.p3() - right.p0()).norm() < TOL);
        assert!((left.p3() - curve.value_at(0.3)).norm() < TOL);
    }

    #[test]
    fn portion_matches_evaluation() {
        let curve = arch();
        let part = curve.portion(0.2, 0.7);
        assert!((part.value_at(0.0) - curve.value_at(0.2)).norm() < 1e-9);
        assert!((part.value_at(1.0) - curve.value_at(0.7)).norm() < 1e-9);
    }

    #[test]
    fn portion_at_end_is_degenerate() {
        let curve = arch();
        let part = curve.portion(1.0, 1.0);
        assert!(part.control_polygon_length() < TOL);
        assert!((part.p0() - curve.p3()).norm() < TOL);
    }

    #[test]
    fn derivative_of_straight_cubic_points_forward() {
        let straight = CubicBezier::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0),
        );
        let d = straight.derivative_at(0.5);
        assert!(d.x > 0.0);
        assert!(d.y.abs() < TOL);
    }

    #[test]
    fn flatness_zero_for_collinear_controls() {
        let straight = CubicBezier::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
            Point2::new(3.0, 3.0),
        );
        assert!(straight.flatness() < TOL);
    }

    #[test]
    fn arc_length_of_straight_cubic_is_chord() {
        let straight = CubicBezier::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0),
        );
        approx::assert_relative_eq!(straight.arc_length(1e-6), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn arc_length_exceeds_chord_for_curved() {
        let curve = arch();
        let chord = (curve.p3() - curve.p0()).norm();
        assert!(curve.arc_length(1e-6) > chord);
    }

    #[test]
    fn to_polyline_endpoints() {
        let curve = arch();
        let points = curve.to_polyline(0.01);
        assert!(points.len() > 2);
        assert!((points[0] - curve.p0()).norm() < TOL);
        assert!((points.last().unwrap() - curve.p3()).norm() < TOL);
    }

    #[test]
    fn nearest_parameter_recovers_on_curve_point() {
        let curve = arch();
        let probe = curve.value_at(0.37);
        let t = curve.nearest_parameter(probe);
        assert!((t - 0.37).abs() < 1e-6, "t={t}");
    }

    #[test]
    fn reversed_runs_backward() {
        let curve = arch();
        let rev = curve.reversed();
        assert!((rev.value_at(0.0) - curve.value_at(1.0)).norm() < TOL);
        assert!((rev.value_at(0.25) - curve.value_at(0.75)).norm() < 1e-9);
    }
}
