//! Freehand stroke object.

use super::Color;
use crate::geometry::{polyline_hit, smooth_path};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// One continuous pen gesture.
///
/// `points` holds at least one element for as long as the stroke exists.
/// A single point renders as a filled dot of diameter `width`; two or more
/// render as a smoothed open curve. Strokes are immutable once committed to
/// the store — the eraser removes them wholesale, never splits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub points: Vec<Point>,
}

impl Stroke {
    /// Start a new in-progress stroke seeded with the gesture's first sample.
    pub fn start(at: Point, color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            points: vec![at],
        }
    }

    /// Create from existing samples.
    pub fn from_points(points: Vec<Point>, color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            points,
        }
    }

    /// Append a sample to the gesture.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// The most recent sample.
    pub fn last_point(&self) -> Point {
        self.points.last().copied().unwrap_or(Point::ZERO)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A one-sample stroke, rendered as a filled dot.
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    /// Axis-aligned bounds of the raw samples.
    pub fn bounds(&self) -> Rect {
        let Some(&first) = self.points.first() else {
            return Rect::ZERO;
        };
        let mut bounds = Rect::new(first.x, first.y, first.x, first.y);
        for point in &self.points[1..] {
            bounds.x0 = bounds.x0.min(point.x);
            bounds.y0 = bounds.y0.min(point.y);
            bounds.x1 = bounds.x1.max(point.x);
            bounds.y1 = bounds.y1.max(point.y);
        }
        bounds
    }

    /// Whether `query` lies within `tolerance` of the stroke, widened by half
    /// the stroke width.
    pub fn hit_test(&self, query: Point, tolerance: f64) -> bool {
        polyline_hit(&self.points, query, tolerance + self.width / 2.0)
    }

    /// Smoothed render path for this stroke (see [`crate::geometry`]).
    pub fn to_path(&self) -> BezPath {
        smooth_path(&self.points)
    }
}
