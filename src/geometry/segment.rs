use crate::math::{Point2, Vector2, TOLERANCE};

use super::{CubicBezier, LineSegment};

/// Flatness tolerance used when flattening cubics for arc-length work.
const FLATTEN_TOLERANCE: f64 = 1e-4;

/// Number of spans sampled when building an offset polyline.
const OFFSET_SAMPLES: u32 = 64;

/// Bisection steps used when inverting the arc-length function.
const SOLVE_STEPS: u32 = 48;

/// One piece of a piecewise parametric path, with parameter domain `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// A straight segment.
    Line(LineSegment),
    /// A cubic Bezier segment.
    Cubic(CubicBezier),
}

impl Segment {
    /// Creates a straight segment between two points.
    #[must_use]
    pub fn line(start: Point2, end: Point2) -> Self {
        Self::Line(LineSegment::new(start, end))
    }

    /// Creates a cubic Bezier segment from its control points.
    #[must_use]
    pub fn cubic(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self::Cubic(CubicBezier::new(p0, p1, p2, p3))
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> Point2 {
        match self {
            Self::Line(line) => line.start(),
            Self::Cubic(cubic) => cubic.p0(),
        }
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> Point2 {
        match self {
            Self::Line(line) => line.end(),
            Self::Cubic(cubic) => cubic.p3(),
        }
    }

    /// Evaluates the segment at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn value_at(&self, t: f64) -> Point2 {
        match self {
            Self::Line(line) => line.value_at(t),
            Self::Cubic(cubic) => cubic.value_at(t),
        }
    }

    /// Computes the derivative (velocity) at parameter `t`.
    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Vector2 {
        match self {
            Self::Line(line) => line.derivative(),
            Self::Cubic(cubic) => cubic.derivative_at(t),
        }
    }

    /// Returns the total arc length.
    ///
    /// Exact for lines; flattened-polyline accumulation for cubics.
    /// Non-finite segments report 0.
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        if !self.is_finite() {
            return 0.0;
        }
        match self {
            Self::Line(line) => line.length(),
            Self::Cubic(cubic) => cubic.arc_length(FLATTEN_TOLERANCE),
        }
    }

    /// Returns the sub-segment between parameters `t0` and `t1`.
    ///
    /// Parameters are clamped to `[0, 1]` and swapped if out of order.
    #[must_use]
    pub fn portion(&self, t0: f64, t1: f64) -> Self {
        let a = t0.clamp(0.0, 1.0);
        let b = t1.clamp(0.0, 1.0);
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        match self {
            Self::Line(line) => Self::Line(line.portion(a, b)),
            Self::Cubic(cubic) => Self::Cubic(cubic.portion(a, b)),
        }
    }

    /// Returns the segment traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line(line) => Self::Line(line.reversed()),
            Self::Cubic(cubic) => Self::Cubic(cubic.reversed()),
        }
    }

    /// Returns the parameter of the point on the segment closest to `point`,
    /// in `[0, 1]`.
    #[must_use]
    pub fn nearest_parameter(&self, point: Point2) -> f64 {
        match self {
            Self::Line(line) => line.nearest_parameter(point),
            Self::Cubic(cubic) => cubic.nearest_parameter(point),
        }
    }

    /// Solves `arc_length(portion(0, t)) == target` for `t`.
    ///
    /// Returns `None` when the segment is degenerate or the target lies
    /// outside `[0, total arc length]`.
    #[must_use]
    pub fn solve_arc_length(&self, target: f64) -> Option<f64> {
        let total = self.arc_length();
        if total <= TOLERANCE || target < -TOLERANCE || target > total + TOLERANCE {
            return None;
        }
        if target <= TOLERANCE {
            return Some(0.0);
        }
        if target >= total - TOLERANCE {
            return Some(1.0);
        }
        match self {
            Self::Line(_) => Some(target / total),
            Self::Cubic(cubic) => {
                // Partial length is monotone in t; bisect.
                let mut lo = 0.0;
                let mut hi = 1.0;
                for _ in 0..SOLVE_STEPS {
                    #[allow(clippy::manual_midpoint)]
                    let mid = (lo + hi) / 2.0;
                    let len = cubic.portion(0.0, mid).arc_length(FLATTEN_TOLERANCE);
                    if len < target {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                #[allow(clippy::manual_midpoint)]
                let t = (lo + hi) / 2.0;
                Some(t)
            }
        }
    }

    /// Samples the segment displaced perpendicular to its tangent by
    /// `distance`, as a polyline.
    ///
    /// Where the tangent vanishes (degenerate spans, cusp endpoints), the
    /// last valid normal is reused; the chord normal seeds the first sample.
    #[must_use]
    pub fn offset_polyline(&self, distance: f64) -> Vec<Point2> {
        let chord = self.end() - self.start();
        let mut last_normal = if chord.norm() > TOLERANCE {
            rot90(chord / chord.norm())
        } else {
            Vector2::new(0.0, 0.0)
        };

        let mut points = Vec::with_capacity(OFFSET_SAMPLES as usize + 1);
        for i in 0..=OFFSET_SAMPLES {
            let t = f64::from(i) / f64::from(OFFSET_SAMPLES);
            let velocity = self.derivative_at(t);
            let speed = velocity.norm();
            let normal = if speed > TOLERANCE {
                rot90(velocity / speed)
            } else {
                last_normal
            };
            last_normal = normal;
            points.push(self.value_at(t) + normal * distance);
        }
        points
    }

    /// Returns whether all defining coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Line(line) => {
                let (s, e) = (line.start(), line.end());
                s.x.is_finite() && s.y.is_finite() && e.x.is_finite() && e.y.is_finite()
            }
            Self::Cubic(cubic) => cubic.is_finite(),
        }
    }

    /// Returns whether the segment is degenerate: non-finite, or contracted
    /// to a point within tolerance.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        if !self.is_finite() {
            return true;
        }
        match self {
            Self::Line(line) => line.length() <= TOLERANCE,
            Self::Cubic(cubic) => cubic.control_polygon_length() <= TOLERANCE,
        }
    }

    /// Returns whether arc length is proportional to the parameter:
    /// lines, and cubics whose control points are collinear with the chord.
    #[must_use]
    pub fn is_linear(&self) -> bool {
        match self {
            Self::Line(_) => true,
            Self::Cubic(cubic) => cubic.is_finite() && cubic.flatness() <= TOLERANCE,
        }
    }
}

/// Rotates a vector a quarter turn counter-clockwise.
fn rot90(v: Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn unit_line() -> Segment {
        Segment::line(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))
    }

    fn arch() -> Segment {
        Segment::cubic(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 2.0),
            Point2::new(4.0, 0.0),
        )
    }

    #[test]
    fn line_arc_length_exact() {
        let seg = Segment::line(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
        assert!((seg.arc_length() - 5.0).abs() < TOL);
    }

    #[test]
    fn non_finite_arc_length_is_zero() {
        let seg = Segment::line(Point2::new(0.0, 0.0), Point2::new(f64::NAN, 0.0));
        assert!(seg.arc_length().abs() < TOL);
        assert!(seg.is_degenerate());
    }

    #[test]
    fn solve_arc_length_on_line() {
        let t = unit_line().solve_arc_length(2.5).unwrap();
        assert!((t - 0.25).abs() < TOL, "t={t}");
    }

    #[test]
    fn solve_arc_length_on_cubic_round_trips() {
        let seg = arch();
        let total = seg.arc_length();
        let t = seg.solve_arc_length(total * 0.5).unwrap();
        let recovered = seg.portion(0.0, t).arc_length();
        assert!((recovered - total * 0.5).abs() < 1e-6, "recovered={recovered}");
    }

    #[test]
    fn solve_arc_length_out_of_range() {
        assert!(unit_line().solve_arc_length(-1.0).is_none());
        assert!(unit_line().solve_arc_length(11.0).is_none());
        let degenerate = Segment::line(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0));
        assert!(degenerate.solve_arc_length(0.0).is_none());
    }

    #[test]
    fn solve_arc_length_at_bounds() {
        assert!(unit_line().solve_arc_length(0.0).unwrap().abs() < TOL);
        assert!((unit_line().solve_arc_length(10.0).unwrap() - 1.0).abs() < TOL);
    }

    #[test]
    fn portion_swaps_out_of_order_parameters() {
        let part = unit_line().portion(0.75, 0.25);
        assert!((part.start().x - 2.5).abs() < TOL);
        assert!((part.end().x - 7.5).abs() < TOL);
    }

    // ── offset polyline tests ──

    #[test]
    fn offset_of_horizontal_line_is_shifted() {
        let points = unit_line().offset_polyline(2.0);
        assert_eq!(points.len(), OFFSET_SAMPLES as usize + 1);
        for p in &points {
            assert!((p.y - 2.0).abs() < TOL, "p={p:?}");
        }
        assert!(points[0].x.abs() < TOL);
        assert!((points.last().unwrap().x - 10.0).abs() < TOL);
    }

    #[test]
    fn offset_sign_flips_side() {
        let up = unit_line().offset_polyline(1.0);
        let down = unit_line().offset_polyline(-1.0);
        assert!((up[0].y - 1.0).abs() < TOL);
        assert!((down[0].y + 1.0).abs() < TOL);
    }

    #[test]
    fn offset_of_arch_stays_off_curve() {
        let seg = arch();
        let points = seg.offset_polyline(0.5);
        for p in &points {
            let t = seg.nearest_parameter(*p);
            let gap = (*p - seg.value_at(t)).norm();
            assert!(gap > 0.3, "gap={gap}");
        }
    }

    #[test]
    fn linearity_checks() {
        assert!(unit_line().is_linear());
        assert!(!arch().is_linear());
        let straight_cubic = Segment::cubic(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
            Point2::new(3.0, 3.0),
        );
        assert!(straight_cubic.is_linear());
    }

    #[test]
    fn degenerate_checks() {
        let point_line = Segment::line(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0));
        assert!(point_line.is_degenerate());
        let p = Point2::new(2.0, 3.0);
        let point_cubic = Segment::cubic(p, p, p, p);
        assert!(point_cubic.is_degenerate());
        assert!(!unit_line().is_degenerate());
        assert!(!arch().is_degenerate());
    }

    #[test]
    fn reversed_segment_swaps_ends() {
        let rev = arch().reversed();
        assert!((rev.start() - arch().end()).norm() < TOL);
        assert!((rev.end() - arch().start()).norm() < TOL);
    }
}
