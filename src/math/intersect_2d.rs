use super::{Point2, TOLERANCE};

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() < TOLERANCE {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * da.y - dy * da.x) / cross;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        let pt = Point2::new(a0.x + da.x * t_clamped, a0.y + da.y * t_clamped);
        Some((pt, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Crossing points of two polylines, in traversal order of the first polyline.
///
/// Each polyline is a point sequence; consecutive points bound one segment.
/// Touching endpoints of adjacent spans can report the same crossing twice;
/// near-duplicate consecutive hits are collapsed.
#[must_use]
pub fn polyline_crossings(a: &[Point2], b: &[Point2]) -> Vec<Point2> {
    let mut crossings: Vec<Point2> = Vec::new();
    if a.len() < 2 || b.len() < 2 {
        return crossings;
    }

    for a_span in a.windows(2) {
        for b_span in b.windows(2) {
            if let Some((pt, _, _)) =
                segment_segment_intersect_2d(&a_span[0], &a_span[1], &b_span[0], &b_span[1])
            {
                let duplicate = crossings
                    .last()
                    .is_some_and(|prev| (pt - prev).norm() < TOLERANCE * 100.0);
                if !duplicate {
                    crossings.push(pt);
                }
            }
        }
    }

    crossings
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn segment_segment_crossing() {
        let a0 = Point2::new(0.0, 0.0);
        let a1 = Point2::new(2.0, 2.0);
        let b0 = Point2::new(0.0, 2.0);
        let b1 = Point2::new(2.0, 0.0);
        let (pt, t, u) = segment_segment_intersect_2d(&a0, &a1, &b0, &b1).unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE);
        assert!((pt.y - 1.0).abs() < TOLERANCE);
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn segment_segment_no_crossing() {
        let a0 = Point2::new(0.0, 0.0);
        let a1 = Point2::new(1.0, 0.0);
        let b0 = Point2::new(0.0, 1.0);
        let b1 = Point2::new(1.0, 1.0);
        assert!(segment_segment_intersect_2d(&a0, &a1, &b0, &b1).is_none());
    }

    // ── polyline crossing tests ──

    #[test]
    fn polylines_single_crossing() {
        let a = vec![
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
        ];
        let b = vec![
            Point2::new(1.5, 0.0),
            Point2::new(1.5, 0.5),
            Point2::new(1.5, 2.0),
        ];
        let hits = polyline_crossings(&a, &b);
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!((hits[0].x - 1.5).abs() < TOLERANCE);
        assert!((hits[0].y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn polylines_ordered_by_first_traversal() {
        // A zig-zag crossed twice by a horizontal polyline.
        let a = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
        ];
        let b = vec![
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(3.0, 1.0),
            Point2::new(3.0, -1.0),
        ];
        let hits = polyline_crossings(&a, &b);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
        assert!(hits[0].x < hits[1].x, "hits={hits:?}");
    }

    #[test]
    fn polylines_parallel_no_crossing() {
        let a = vec![Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)];
        let b = vec![Point2::new(0.0, 1.0), Point2::new(2.0, 1.0)];
        assert!(polyline_crossings(&a, &b).is_empty());
    }

    #[test]
    fn polylines_too_short() {
        let a = vec![Point2::new(0.0, 0.0)];
        let b = vec![Point2::new(0.0, 1.0), Point2::new(2.0, 1.0)];
        assert!(polyline_crossings(&a, &b).is_empty());
    }
}
