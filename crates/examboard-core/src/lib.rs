//! Examboard Core Library
//!
//! Platform-agnostic data structures and logic for the shared drawing board
//! layered over exam pages: geometry smoothing, the ordered object store,
//! the pointer state machine, and the sync channel that keeps every open
//! viewer of a board looking at the same strokes.

pub mod geometry;
pub mod input;
pub mod mathtex;
pub mod session;
pub mod shapes;
pub mod store;
pub mod surface;
pub mod sync;
pub mod tools;

pub use input::{KeyEvent, Modifiers, PointerEvent, PointerId};
pub use session::{BoardSession, KeyResponse, Repaint, ERASER_RADIUS};
pub use store::BoardStore;
pub use surface::{SurfaceGeometry, MAX_SURFACE_HEIGHT};
pub use sync::{BoardChannel, ChannelEvent, ChannelState, SyncMessage};
pub use tools::{Tool, PALETTE, PEN_WIDTH};
