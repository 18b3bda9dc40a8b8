use crate::geometry::Segment;
use crate::math::intersect_2d::polyline_crossings;
use crate::math::ray_2d::{angle_between, Ray};
use crate::math::{Point2, TOLERANCE};

/// Corner-rounding treatment applied at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatelliteKind {
    /// Round the corner with a circular arc.
    Fillet,
    /// Round the corner with the arc flipped to the opposite side.
    InverseFillet,
    /// Cut the corner with a straight bevel.
    Chamfer,
    /// Cut the corner with the bevel flipped to the opposite side.
    InverseChamfer,
    /// No valid treatment.
    Invalid,
}

/// A positioned corner-rounding annotation.
///
/// A satellite conceptually sits at the node between two adjacent segments:
/// the incoming curve ends there and the outgoing curve starts there. The
/// stored `amount` is relative to the outgoing segment and is either a curve
/// parameter in `[0, 1]` or an arc-length distance, per `is_time_valued`.
///
/// Satellites hold no reference to any segment; every positional operation
/// takes the relevant segment(s) as parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Satellite {
    /// The rounding treatment.
    pub kind: SatelliteKind,
    /// If `true`, `amount` is a curve parameter; otherwise an arc length.
    pub is_time_valued: bool,
    /// Marks the first annotation of a sub-path's scan range.
    pub is_start: bool,
    /// Marks annotations belonging to a closed sub-path's closing segment.
    pub is_closing: bool,
    /// Whether the treatment is currently applied.
    pub active: bool,
    /// Whether the annotation is hidden in editing views.
    pub hidden: bool,
    /// Whether the annotation mirrors onto the incoming segment.
    pub has_mirror: bool,
    /// Position value: parameter or arc length, per `is_time_valued`.
    pub amount: f64,
    /// Auxiliary angle parameter for rendering variants.
    pub angle: f64,
    /// Auxiliary step count for rendering variants.
    pub steps: u32,
}

impl Satellite {
    /// Creates a satellite with the given kind, value mode, and amount.
    ///
    /// Structural flags start cleared and the satellite starts active.
    #[must_use]
    pub fn new(kind: SatelliteKind, is_time_valued: bool, amount: f64) -> Self {
        Self {
            kind,
            is_time_valued,
            is_start: false,
            is_closing: false,
            active: true,
            hidden: false,
            has_mirror: false,
            amount,
            angle: 0.0,
            steps: 0,
        }
    }

    /// Converts an arc-length distance on `segment` to a parameter value.
    ///
    /// Degenerate or non-finite segments, and a zero distance, resolve to 0.
    /// Distances beyond the segment's total length, and linear segments,
    /// resolve proportionally (`length / total`). Otherwise the arc-length
    /// function is inverted numerically; solver failure resolves to 0.
    #[must_use]
    pub fn time_at_length(length: f64, segment: &Segment) -> f64 {
        if !segment.is_finite() || segment.is_degenerate() || length.abs() <= TOLERANCE {
            return 0.0;
        }
        let total = segment.arc_length();
        if total <= TOLERANCE {
            return 0.0;
        }
        if length > total || segment.is_linear() {
            return length / total;
        }
        segment.solve_arc_length(length).unwrap_or(0.0)
    }

    /// Converts a parameter value on `segment` to an arc-length distance.
    ///
    /// Mirrors the branching of [`Self::time_at_length`]: degenerate input
    /// resolves to 0, parameters at or beyond 1 and linear segments resolve
    /// proportionally, and the general case measures the sub-curve.
    #[must_use]
    pub fn length_at_time(time: f64, segment: &Segment) -> f64 {
        if !segment.is_finite() || segment.is_degenerate() || time.abs() <= TOLERANCE {
            return 0.0;
        }
        let total = segment.arc_length();
        if total <= TOLERANCE {
            return 0.0;
        }
        if time >= 1.0 || segment.is_linear() {
            return time * total;
        }
        segment.portion(0.0, time).arc_length()
    }

    /// Resolves a distance measured backward from the segment's end to a
    /// parameter value.
    ///
    /// A zero distance resolves to the end of the segment (`t = 1`).
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn opposite_time(&self, length_from_end: f64, segment: &Segment) -> f64 {
        if length_from_end.abs() <= TOLERANCE {
            return 1.0;
        }
        Self::time_at_length(segment.arc_length() - length_from_end, segment)
    }

    /// Resolves `amount` to a parameter value on `segment`, at most 1.
    #[must_use]
    pub fn time(&self, segment: &Segment) -> f64 {
        let t = if self.is_time_valued {
            self.amount
        } else {
            Self::time_at_length(self.amount, segment)
        };
        t.min(1.0)
    }

    /// Resolves `amount` to an arc-length distance on `segment`.
    #[must_use]
    pub fn arc_distance(&self, segment: &Segment) -> f64 {
        if self.is_time_valued {
            Self::length_at_time(self.amount, segment)
        } else {
            self.amount
        }
    }

    /// Returns the annotation's position on `segment`.
    #[must_use]
    pub fn position(&self, segment: &Segment) -> Point2 {
        segment.value_at(self.time(segment))
    }

    /// Moves the annotation to the point on `segment` nearest to `point`.
    pub fn set_position(&mut self, point: Point2, segment: &Segment) {
        let t = segment.nearest_parameter(point);
        self.amount = if self.is_time_valued {
            t
        } else {
            Self::length_at_time(t, segment)
        };
    }

    /// Computes the arc-length position on `curve_out` at which a rounding of
    /// the given `radius` touches the curve.
    ///
    /// Both segments are displaced perpendicular to their tangents by
    /// `radius`; the first crossing of the two offset curves, projected back
    /// onto `curve_out`, marks the touch point. When the offsets do not cross
    /// and `radius` is positive, the opposite offset side is tried once;
    /// failing that, the result is 0.
    #[must_use]
    pub fn radius_to_offset_length(radius: f64, curve_in: &Segment, curve_out: &Segment) -> f64 {
        if curve_in.is_degenerate() || curve_out.is_degenerate() {
            return 0.0;
        }
        for displacement in [radius, -radius] {
            let offset_in = curve_in.offset_polyline(displacement);
            let offset_out = curve_out.offset_polyline(displacement);
            let crossings = polyline_crossings(&offset_in, &offset_out);
            if let Some(crossing) = crossings.first() {
                let t = curve_out.nearest_parameter(*crossing);
                return Self::length_at_time(t, curve_out);
            }
            if radius <= 0.0 {
                break;
            }
        }
        0.0
    }

    /// Computes the rounding radius implied by a touch point at
    /// `offset_length` from the node shared by `curve_in` and `curve_out`.
    ///
    /// The incoming touch point is resolved through `previous` (the satellite
    /// anchored on `curve_in`), measured backward from that segment's end.
    /// Tangent rays at the two touch points are refined from cubic control
    /// points where the knot-side sub-curves are cubics. Collinear tangents
    /// (a vanishing half-angle sine) yield 0.
    #[must_use]
    pub fn offset_length_to_radius(
        offset_length: f64,
        curve_in: &Segment,
        curve_out: &Segment,
        previous: &Satellite,
    ) -> f64 {
        let time_in = previous.opposite_time(offset_length, curve_in);
        let time_out = Self::time_at_length(offset_length, curve_out);
        let start_arc_point = curve_in.value_at(time_in);
        let end_arc_point = curve_out.value_at(time_out);
        let node = curve_in.end();

        let mut ray_in = Ray::from_points(start_arc_point, node);
        let mut ray_out = Ray::from_points(curve_out.start(), end_arc_point);
        if let Segment::Cubic(knot_in) = curve_in.portion(0.0, time_in) {
            ray_in.set_points(knot_in.p2(), start_arc_point);
        }
        if let Segment::Cubic(knot_out) = curve_out.portion(time_out, 1.0) {
            ray_out.set_points(end_arc_point, knot_out.p1());
        }

        let ccw = (node - start_arc_point).perp(&(end_arc_point - start_arc_point)) < 0.0;
        let angle = angle_between(&ray_in, &ray_out, ccw);

        let touch_midpoint = Point2::new(
            (start_arc_point.x + end_arc_point.x) / 2.0,
            (start_arc_point.y + end_arc_point.y) / 2.0,
        );
        let distance_arc = (touch_midpoint - node).norm();

        let half_angle_sine = (angle / 2.0).sin();
        if half_angle_sine <= TOLERANCE {
            return 0.0;
        }
        distance_arc / half_angle_sine
    }
}
