use crate::math::{Point2, Vector2, TOLERANCE};

/// A bounded straight segment between two points.
///
/// Degenerate (zero-length) segments are representable; queries on them
/// degrade to the start point rather than failing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    start: Point2,
    end: Point2,
}

impl LineSegment {
    /// Creates a new line segment.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> Point2 {
        self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> Point2 {
        self.end
    }

    /// Evaluates the segment at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn value_at(&self, t: f64) -> Point2 {
        self.start + (self.end - self.start) * t
    }

    /// Returns the (constant) derivative with respect to `t`.
    #[must_use]
    pub fn derivative(&self) -> Vector2 {
        self.end - self.start
    }

    /// Returns the segment length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Returns the sub-segment between parameters `t0` and `t1`.
    #[must_use]
    pub fn portion(&self, t0: f64, t1: f64) -> Self {
        Self::new(self.value_at(t0), self.value_at(t1))
    }

    /// Returns the segment traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Returns the parameter of the point on the segment closest to `point`,
    /// clamped to `[0, 1]`.
    ///
    /// A degenerate segment projects everything onto its start (`t = 0`).
    #[must_use]
    pub fn nearest_parameter(&self, point: Point2) -> f64 {
        let dir = self.end - self.start;
        let len_sq = dir.norm_squared();
        if len_sq < TOLERANCE * TOLERANCE {
            return 0.0;
        }
        ((point - self.start).dot(&dir) / len_sq).clamp(0.0, 1.0)
    }
}
