//! Mapping from client-viewport coordinates to surface-pixel space.

use kurbo::{Point, Size};

/// Backing-store height cap. The surface is sized to the page's full
/// scrollable extent, which on long variants would otherwise make the pixel
/// buffer unbounded.
pub const MAX_SURFACE_HEIGHT: f64 = 15_000.0;

/// Cached geometry of the drawing surface.
///
/// `backing` is the pixel resolution of the surface, `display` the size it
/// is shown at, `offset` its position in the client viewport. All three are
/// recomputed on resize, board open, and content reflow — not on every
/// pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    backing: Size,
    display: Size,
    offset: Point,
}

impl SurfaceGeometry {
    /// Geometry for a surface covering `page_extent`, displayed 1:1 at the
    /// viewport origin.
    pub fn new(page_extent: Size) -> Self {
        let backing = Self::clamp_backing(page_extent);
        Self {
            backing,
            display: backing,
            offset: Point::ZERO,
        }
    }

    /// Recompute after a window resize, board open, or content reflow.
    ///
    /// The backing store tracks the full scrollable `page_extent`, height
    /// capped at [`MAX_SURFACE_HEIGHT`]; `display` and `offset` describe
    /// where and how large the host currently shows the surface.
    pub fn resize(&mut self, page_extent: Size, display: Size, offset: Point) {
        self.backing = Self::clamp_backing(page_extent);
        self.display = display;
        self.offset = offset;
    }

    fn clamp_backing(extent: Size) -> Size {
        Size::new(
            extent.width.max(1.0),
            extent.height.min(MAX_SURFACE_HEIGHT).max(1.0),
        )
    }

    /// Pixel resolution of the backing store.
    pub fn backing(&self) -> Size {
        self.backing
    }

    /// Per-axis ratio of backing resolution to displayed size.
    pub fn scale(&self) -> (f64, f64) {
        let sx = if self.display.width > 0.0 {
            self.backing.width / self.display.width
        } else {
            1.0
        };
        let sy = if self.display.height > 0.0 {
            self.backing.height / self.display.height
        } else {
            1.0
        };
        (sx, sy)
    }

    /// Map a client-viewport point into surface-pixel space.
    pub fn to_surface(&self, client: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(
            (client.x - self.offset.x) * sx,
            (client.y - self.offset.y) * sy,
        )
    }
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self::new(Size::new(1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let geometry = SurfaceGeometry::new(Size::new(800.0, 600.0));
        let p = geometry.to_surface(Point::new(100.0, 50.0));
        assert_eq!(p, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_offset_and_scale() {
        let mut geometry = SurfaceGeometry::new(Size::new(1600.0, 1200.0));
        // Shown at half resolution, 10 units down the viewport.
        geometry.resize(
            Size::new(1600.0, 1200.0),
            Size::new(800.0, 600.0),
            Point::new(0.0, 10.0),
        );

        let p = geometry.to_surface(Point::new(100.0, 60.0));
        assert_eq!(p, Point::new(200.0, 100.0));
    }

    #[test]
    fn test_height_is_capped() {
        let geometry = SurfaceGeometry::new(Size::new(1000.0, 50_000.0));
        assert_eq!(geometry.backing().height, MAX_SURFACE_HEIGHT);
        assert_eq!(geometry.backing().width, 1000.0);
    }

    #[test]
    fn test_degenerate_display_falls_back_to_unit_scale() {
        let mut geometry = SurfaceGeometry::new(Size::new(100.0, 100.0));
        geometry.resize(Size::new(100.0, 100.0), Size::ZERO, Point::ZERO);
        assert_eq!(geometry.scale(), (1.0, 1.0));
    }

    #[test]
    fn test_minimum_backing_size() {
        let geometry = SurfaceGeometry::new(Size::ZERO);
        assert_eq!(geometry.backing(), Size::new(1.0, 1.0));
    }
}
