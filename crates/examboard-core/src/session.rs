//! Board session controller.
//!
//! One [`BoardSession`] exists per open board. It owns the shared object
//! store, the active tool and color, the in-progress stroke, and the outbox
//! of mutations to broadcast. Pointer and key events arrive in
//! client-viewport coordinates and drive the `Idle → Drawing → Idle` /
//! `Idle → Erasing → Idle` state machine; remote messages are applied
//! through [`apply_remote`](BoardSession::apply_remote) and are never
//! re-broadcast.

use crate::geometry::densify;
use crate::input::{KeyEvent, PointerEvent, PointerId};
use crate::shapes::{BoardObject, Color, Stroke};
use crate::store::BoardStore;
use crate::surface::SurfaceGeometry;
use crate::sync::SyncMessage;
use crate::tools::{Tool, PALETTE, PEN_WIDTH};
use kurbo::{Point, Size};

/// Eraser hit radius, in surface units.
pub const ERASER_RADIUS: f64 = 8.0;

/// What the host must repaint after an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repaint {
    None,
    /// Only the newly drawn segment. A full repaint is also correct, just
    /// slower; this keeps fast gestures responsive.
    Segment { from: Point, to: Point },
    Full,
}

/// Host-visible outcome of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    Ignored,
    Repaint,
    /// Escape was pressed: the hosting page should close the board.
    CloseRequested,
}

/// Per-open-board state and event handling.
#[derive(Debug)]
pub struct BoardSession {
    store: BoardStore,
    surface: SurfaceGeometry,
    tool: Tool,
    color: Color,
    pen_width: f64,
    current: Option<Stroke>,
    drawing: bool,
    erasing: bool,
    captured: Option<PointerId>,
    connected: bool,
    outbox: Vec<String>,
}

impl BoardSession {
    /// Open a board over a surface.
    pub fn new(surface: SurfaceGeometry) -> Self {
        Self {
            store: BoardStore::new(),
            surface,
            tool: Tool::Pen,
            color: PALETTE[0],
            pen_width: PEN_WIDTH,
            current: None,
            drawing: false,
            erasing: false,
            captured: None,
            connected: false,
            outbox: Vec::new(),
        }
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn surface(&self) -> &SurfaceGeometry {
        &self.surface
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// The in-progress stroke, if a pen gesture is active.
    pub fn current_stroke(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    /// The pointer currently captured by an active gesture.
    pub fn captured_pointer(&self) -> Option<PointerId> {
        self.captured
    }

    /// Mirror of the sync channel's state, updated by the host from channel
    /// events. Broadcasts are dropped while `false`.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Recompute surface geometry after a resize or reflow.
    pub fn resize(&mut self, page_extent: Size, display: Size, offset: Point) -> Repaint {
        self.surface.resize(page_extent, display, offset);
        Repaint::Full
    }

    /// Drive the gesture state machine with one pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Repaint {
        match event {
            PointerEvent::Down { position, pointer } => {
                self.captured = Some(pointer);
                let pos = self.surface.to_surface(position);
                match self.tool {
                    Tool::Eraser => {
                        self.erasing = true;
                        self.erase_at(pos)
                    }
                    Tool::Pen => {
                        self.drawing = true;
                        self.current = Some(Stroke::start(pos, self.color, self.pen_width));
                        Repaint::Full
                    }
                }
            }
            PointerEvent::Move { position } => {
                let pos = self.surface.to_surface(position);
                if self.erasing && self.tool == Tool::Eraser {
                    return self.erase_at(pos);
                }
                if !self.drawing {
                    return Repaint::None;
                }
                let Some(stroke) = self.current.as_mut() else {
                    return Repaint::None;
                };
                let last = stroke.last_point();
                for point in densify(last, pos) {
                    stroke.add_point(point);
                }
                Repaint::Segment { from: last, to: pos }
            }
            PointerEvent::Up { pointer, .. }
            | PointerEvent::Cancel { pointer }
            | PointerEvent::Leave { pointer } => self.finish_gesture(pointer),
        }
    }

    /// Key handling: Escape closes the board, Ctrl/Cmd+Z is a local undo.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> KeyResponse {
        if event.key == "Escape" {
            return KeyResponse::CloseRequested;
        }
        if event.modifiers.primary() && event.key == "z" {
            return match self.undo_last() {
                Repaint::None => KeyResponse::Ignored,
                _ => KeyResponse::Repaint,
            };
        }
        KeyResponse::Ignored
    }

    /// Drop the most recently appended object.
    ///
    /// Local-only: no `remove_object` is broadcast, so other viewers keep
    /// the stroke. Divergence is the documented cost of this shortcut.
    pub fn undo_last(&mut self) -> Repaint {
        match self.store.pop_last() {
            Some(_) => Repaint::Full,
            None => Repaint::None,
        }
    }

    /// Empty the board and tell everyone.
    pub fn clear_board(&mut self) -> Repaint {
        self.store.clear();
        self.broadcast(&SyncMessage::ClearAll);
        Repaint::Full
    }

    /// Apply a mutation received from another viewer.
    ///
    /// Never re-broadcasts. A `remove_object` index out of current bounds is
    /// a silent no-op: the sender computed it against state that may have
    /// diverged from ours.
    pub fn apply_remote(&mut self, message: SyncMessage) -> Repaint {
        match message {
            SyncMessage::AddObject { object } => {
                self.store.append(object);
                Repaint::Full
            }
            SyncMessage::RemoveObject { index } => match self.store.remove_at(index) {
                Some(_) => Repaint::Full,
                None => {
                    log::debug!("stale remove_object index {index} ignored");
                    Repaint::None
                }
            },
            SyncMessage::ClearAll => {
                self.store.clear();
                Repaint::Full
            }
        }
    }

    /// Pending encoded broadcasts, drained by the host into the channel.
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbox)
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outbox.is_empty()
    }

    /// Tear down gesture state when the board is closed. The host also
    /// disconnects the channel and unregisters its event listeners.
    pub fn close(&mut self) {
        self.captured = None;
        self.current = None;
        self.drawing = false;
        self.erasing = false;
        self.connected = false;
        self.outbox.clear();
    }

    /// Finish the active gesture: release the capture, commit and broadcast
    /// an in-progress stroke, return to Idle.
    fn finish_gesture(&mut self, pointer: PointerId) -> Repaint {
        // A release for a pointer the platform already let go of is
        // swallowed; the gesture still ends.
        if self.captured == Some(pointer) {
            self.captured = None;
        } else {
            log::debug!("pointer {pointer} was not captured");
        }

        let mut repaint = Repaint::None;
        if self.drawing {
            if let Some(stroke) = self.current.take() {
                self.broadcast(&SyncMessage::AddObject {
                    object: BoardObject::Line(stroke.clone()),
                });
                self.store.append(BoardObject::Line(stroke));
                repaint = Repaint::Full;
            }
        }
        self.drawing = false;
        self.erasing = false;
        repaint
    }

    /// Erase the topmost stroke within [`ERASER_RADIUS`] of `pos`.
    ///
    /// At most one object goes per query; the broadcast carries the object's
    /// index at time of removal.
    fn erase_at(&mut self, pos: Point) -> Repaint {
        match self.store.hit_test_topmost(pos, ERASER_RADIUS) {
            Some(index) => {
                self.store.remove_at(index);
                self.broadcast(&SyncMessage::RemoveObject { index });
                Repaint::Full
            }
            None => Repaint::None,
        }
    }

    /// Queue a mutation for the channel, or drop it when the channel is not
    /// open. The local mutation has already been applied either way.
    fn broadcast(&mut self, message: &SyncMessage) {
        if !self.connected {
            log::debug!("channel closed, dropping broadcast");
            return;
        }
        match serde_json::to_string(message) {
            Ok(json) => self.outbox.push(json),
            Err(e) => log::warn!("failed to encode sync message: {e}"),
        }
    }
}
