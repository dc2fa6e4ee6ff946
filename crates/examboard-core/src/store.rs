//! Ordered collection of drawn objects shared across viewers.

use crate::shapes::BoardObject;
use kurbo::Point;

/// The replicated board state: an ordered sequence of drawable objects.
///
/// Insertion order is the z-order (later objects paint over earlier ones),
/// and an object's position is its index — the sole removal key used on the
/// wire. Indices are not stable identifiers: they shift whenever an earlier
/// object is removed, so an index arriving over the network is only valid
/// against the state it was computed from and every remote removal is
/// bounds-checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardStore {
    objects: Vec<BoardObject>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object at the top of the z-order.
    pub fn append(&mut self, object: BoardObject) {
        self.objects.push(object);
    }

    /// Remove the object at `index`.
    ///
    /// Out-of-range indices are a `None` no-op, never a panic: a remote
    /// removal may be stale relative to local state.
    pub fn remove_at(&mut self, index: usize) -> Option<BoardObject> {
        if index < self.objects.len() {
            Some(self.objects.remove(index))
        } else {
            None
        }
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Drop the most recently appended object (local undo).
    pub fn pop_last(&mut self) -> Option<BoardObject> {
        self.objects.pop()
    }

    pub fn get(&self, index: usize) -> Option<&BoardObject> {
        self.objects.get(index)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in z-order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &BoardObject> {
        self.objects.iter()
    }

    pub fn as_slice(&self) -> &[BoardObject] {
        &self.objects
    }

    /// A deep copy of the current state.
    pub fn snapshot(&self) -> Vec<BoardObject> {
        self.objects.clone()
    }

    /// Index of the topmost object within `radius` of `query`.
    ///
    /// Scans newest-first so the most recently drawn stroke wins.
    pub fn hit_test_topmost(&self, query: Point, radius: f64) -> Option<usize> {
        self.objects
            .iter()
            .enumerate()
            .rev()
            .find(|(_, object)| object.hit_test(query, radius))
            .map(|(index, _)| index)
    }
}
