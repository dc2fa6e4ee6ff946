//! Renderer trait abstraction.

use examboard_core::shapes::{BoardObject, Color, Stroke};
use kurbo::{Point, Size};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("initialization failed: {0}")]
    InitFailed(String),
    #[error("render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Everything needed to repaint the surface once.
pub struct RenderContext<'a> {
    /// Committed objects in store order (back to front).
    pub objects: &'a [BoardObject],
    /// The in-progress stroke, painted on top of everything.
    pub current: Option<&'a Stroke>,
    /// Background fill; `None` leaves the surface transparent so the board
    /// overlays the exam page.
    pub background: Option<Color>,
}

impl<'a> RenderContext<'a> {
    pub fn new(objects: &'a [BoardObject]) -> Self {
        Self {
            objects,
            current: None,
            background: None,
        }
    }

    pub fn with_current(mut self, current: Option<&'a Stroke>) -> Self {
        self.current = current;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

/// A 2D surface the board paints onto.
pub trait Renderer {
    /// Reallocate the backing store; the host repaints afterwards.
    fn resize(&mut self, size: Size) -> RenderResult<()>;

    /// Full repaint: clear the surface, draw every object in order, then the
    /// in-progress stroke. Idempotent — repeated calls with unchanged state
    /// produce the same pixels.
    fn repaint(&mut self, ctx: &RenderContext<'_>) -> RenderResult<()>;

    /// Fast path while a gesture is in flight: extend the previous frame by
    /// one straight segment instead of repainting everything.
    fn draw_segment(&mut self, from: Point, to: Point, color: Color, width: f64)
        -> RenderResult<()>;
}
