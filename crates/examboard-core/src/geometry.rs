//! Stroke geometry: midpoint smoothing, sample densification, hit distances.

use kurbo::{BezPath, Point};

/// Maximum gap between consecutive samples before intermediates are
/// interpolated. Uniform density keeps smoothing stable and hit-testing
/// accurate even for fast gestures.
pub const SAMPLE_STEP: f64 = 10.0;

/// Build a smooth open curve through `points`.
///
/// Each interior point becomes the control point of a quadratic segment
/// aimed at the midpoint between it and its successor; the final raw point
/// is reached with a straight segment so the curve never lags the pointer.
/// The curve passes exactly through the first and last points.
///
/// Fewer than two points produce a degenerate path (the caller renders a
/// single point as a filled dot instead).
pub fn smooth_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = points.first() else {
        return path;
    };
    path.move_to(first);
    if points.len() < 2 {
        return path;
    }
    for i in 1..points.len() - 1 {
        let p = points[i];
        let next = points[i + 1];
        let mid = Point::new((p.x + next.x) / 2.0, (p.y + next.y) / 2.0);
        path.quad_to(p, mid);
    }
    path.line_to(points[points.len() - 1]);
    path
}

/// Samples to append when the pointer moved from `last` to `next`.
///
/// When the gap exceeds [`SAMPLE_STEP`], linearly interpolated intermediates
/// are inserted so consecutive samples are at most one step apart. The
/// returned sequence always ends with `next`.
pub fn densify(last: Point, next: Point) -> Vec<Point> {
    let dist = last.distance(next);
    let mut out = Vec::new();
    if dist > SAMPLE_STEP {
        let n = (dist / SAMPLE_STEP).ceil() as usize;
        for i in 1..n {
            let t = i as f64 / n as f64;
            out.push(Point::new(
                last.x + (next.x - last.x) * t,
                last.y + (next.y - last.y) * t,
            ));
        }
    }
    out.push(next);
    out
}

/// Distance from `p` to the segment `a..b`.
///
/// A degenerate segment falls back to plain point distance.
pub fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let line = b - a;
    let len_sq = line.hypot2();
    if len_sq < f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(line) / len_sq).clamp(0.0, 1.0);
    let projection = a + line * t;
    p.distance(projection)
}

/// Whether `query` lies within `tolerance` of the polyline through `points`.
///
/// Measures nearest-point-on-segment distance between consecutive samples,
/// not just distance to the samples themselves, so sparse fast strokes are
/// still hit along their length.
pub fn polyline_hit(points: &[Point], query: Point, tolerance: f64) -> bool {
    match points {
        [] => false,
        [only] => query.distance(*only) <= tolerance,
        _ => points
            .windows(2)
            .any(|w| segment_distance(query, w[0], w[1]) <= tolerance),
    }
}
