//! CPU raster renderer backed by tiny-skia.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use examboard_core::shapes::{BoardObject, Color, Stroke};
use kurbo::{BezPath, PathEl, Point, Size};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

/// Software renderer drawing into a [`Pixmap`].
pub struct SkiaRenderer {
    pixmap: Pixmap,
}

impl SkiaRenderer {
    /// Allocate a surface of the given backing size.
    pub fn new(size: Size) -> RenderResult<Self> {
        Ok(Self {
            pixmap: Self::make_pixmap(size)?,
        })
    }

    fn make_pixmap(size: Size) -> RenderResult<Pixmap> {
        let width = size.width.max(1.0).round() as u32;
        let height = size.height.max(1.0).round() as u32;
        Pixmap::new(width, height)
            .ok_or_else(|| RendererError::InitFailed(format!("bad surface size {width}x{height}")))
    }

    /// The raster surface, for blitting and inspection.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Raw premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    fn paint_for(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;
        paint
    }

    fn stroke_style(width: f64) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..tiny_skia::Stroke::default()
        }
    }

    fn build_path(path: &BezPath) -> Option<tiny_skia::Path> {
        let mut builder = PathBuilder::new();
        for element in path.elements() {
            match *element {
                PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
                PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
                PathEl::QuadTo(c, p) => {
                    builder.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32)
                }
                PathEl::CurveTo(c1, c2, p) => builder.cubic_to(
                    c1.x as f32,
                    c1.y as f32,
                    c2.x as f32,
                    c2.y as f32,
                    p.x as f32,
                    p.y as f32,
                ),
                PathEl::ClosePath => builder.close(),
            }
        }
        builder.finish()
    }

    fn draw_stroke(&mut self, stroke: &Stroke) {
        if stroke.is_empty() {
            return;
        }
        let paint = Self::paint_for(stroke.color);

        if stroke.is_dot() {
            let center = stroke.last_point();
            let radius = (stroke.width / 2.0) as f32;
            if let Some(circle) =
                PathBuilder::from_circle(center.x as f32, center.y as f32, radius)
            {
                self.pixmap.fill_path(
                    &circle,
                    &paint,
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
            return;
        }

        if let Some(path) = Self::build_path(&stroke.to_path()) {
            self.pixmap.stroke_path(
                &path,
                &paint,
                &Self::stroke_style(stroke.width),
                Transform::identity(),
                None,
            );
        }
    }
}

impl Renderer for SkiaRenderer {
    fn resize(&mut self, size: Size) -> RenderResult<()> {
        self.pixmap = Self::make_pixmap(size)?;
        Ok(())
    }

    fn repaint(&mut self, ctx: &RenderContext<'_>) -> RenderResult<()> {
        match ctx.background {
            Some(color) => self.pixmap.fill(
                tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a),
            ),
            None => self.pixmap.fill(tiny_skia::Color::TRANSPARENT),
        }

        for object in ctx.objects {
            let BoardObject::Line(stroke) = object;
            self.draw_stroke(stroke);
        }
        if let Some(stroke) = ctx.current {
            self.draw_stroke(stroke);
        }
        Ok(())
    }

    fn draw_segment(
        &mut self,
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    ) -> RenderResult<()> {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x as f32, from.y as f32);
        builder.line_to(to.x as f32, to.y as f32);
        let Some(path) = builder.finish() else {
            return Ok(());
        };
        self.pixmap.stroke_path(
            &path,
            &Self::paint_for(color),
            &Self::stroke_style(width),
            Transform::identity(),
            None,
        );
        Ok(())
    }
}
