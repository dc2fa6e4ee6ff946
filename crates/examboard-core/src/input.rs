//! Pointer and keyboard event types fed to the board session.
//!
//! Pointer positions are client-viewport coordinates as reported by the
//! host; the session maps them into surface-pixel space through
//! [`SurfaceGeometry`](crate::surface::SurfaceGeometry).

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Identifier of a pointing device, as reported by the host platform.
pub type PointerId = i64;

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn primary(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A unified pointer gesture event (mouse, touch, or stylus).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, pointer: PointerId },
    Move { position: Point },
    Up { position: Point, pointer: PointerId },
    /// The platform cancelled the gesture (e.g. touch stolen by a scroll).
    Cancel { pointer: PointerId },
    /// The pointer left the surface mid-gesture.
    Leave { pointer: PointerId },
}

/// A key press routed to the open board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_modifier() {
        assert!(!Modifiers::default().primary());
        assert!(Modifiers { ctrl: true, ..Modifiers::default() }.primary());
        assert!(Modifiers { meta: true, ..Modifiers::default() }.primary());
    }
}
