//! Examboard Render Library
//!
//! Renderer abstraction and implementations for the shared drawing board.
//! The default implementation rasterizes on the CPU with tiny-skia.

mod renderer;
mod skia_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use skia_impl::SkiaRenderer;
