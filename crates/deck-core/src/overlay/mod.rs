//! Overlay stacking.
//!
//! An [`OverlayStack`] holds every overlay that has been raised and not yet
//! dismissed. Only the most recently pushed entry is presented; the others
//! resume visibility as the stack unwinds.
//!
//! Entries are identified by an [`OverlayId`] minted from a counter owned by
//! the stack. Ids are never positions: removing an entry from the middle of
//! the stack leaves every other id valid.
//!
//! ## Module Structure
//!
//! - `mod.rs`: `OverlayStack`, `OverlayEntry`, `OverlayId`
//! - `handle.rs`: `OverlayHandle`, a per-call-site wrapper with stable identity

mod handle;

pub use handle::OverlayHandle;

/// Stable identity of one pushed overlay entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

/// One registered overlay.
#[derive(Debug)]
pub struct OverlayEntry<R> {
    pub id: OverlayId,
    pub render: R,
}

/// Ordered collection of overlays; the last entry is the presented one.
///
/// `R` is whatever the presentation layer needs to draw the overlay. The
/// stack never inspects it.
#[derive(Debug)]
pub struct OverlayStack<R> {
    entries: Vec<OverlayEntry<R>>,
    next_id: u64,
}

impl<R> Default for OverlayStack<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> OverlayStack<R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Pushes a renderer and returns the id of the new entry.
    pub fn push(&mut self, render: R) -> OverlayId {
        self.push_with(|_| render)
    }

    /// Pushes a renderer built from the id it is about to receive.
    ///
    /// Lets presented content know its own id so it can dismiss itself.
    pub fn push_with(&mut self, make: impl FnOnce(OverlayId) -> R) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let render = make(id);
        self.entries.push(OverlayEntry { id, render });
        tracing::trace!(%id, depth = self.entries.len(), "overlay pushed");
        id
    }

    /// Removes the entry with `id` wherever it sits. `None` if absent.
    pub fn remove(&mut self, id: OverlayId) -> Option<R> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let entry = self.entries.remove(index);
        tracing::trace!(%id, depth = self.entries.len(), "overlay removed");
        Some(entry.render)
    }

    /// Removes the presented entry ("close whatever is on top").
    pub fn remove_top(&mut self) -> Option<OverlayEntry<R>> {
        self.entries.pop()
    }

    /// The presented entry, if any.
    pub fn current(&self) -> Option<&OverlayEntry<R>> {
        self.entries.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut OverlayEntry<R>> {
        self.entries.last_mut()
    }

    pub fn get(&self, id: OverlayId) -> Option<&R> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.render)
    }

    pub fn get_mut(&mut self, id: OverlayId) -> Option<&mut R> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| &mut entry.render)
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in push order (bottom first).
    pub fn iter(&self) -> impl Iterator<Item = &OverlayEntry<R>> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_current_is_last_pushed() {
        let mut stack = OverlayStack::new();
        assert!(stack.current().is_none());

        let a = stack.push("a");
        let b = stack.push("b");
        assert_eq!(stack.current().map(|e| e.id), Some(b));

        stack.remove(b);
        assert_eq!(stack.current().map(|e| e.id), Some(a));
    }

    #[test]
    fn test_remove_from_middle_keeps_other_ids() {
        let mut stack = OverlayStack::new();
        let a = stack.push("a");
        let b = stack.push("b");
        let c = stack.push("c");

        assert_eq!(stack.remove(b), Some("b"));

        // Ids captured before the removal still address the same entries.
        assert_eq!(stack.get(a), Some(&"a"));
        assert_eq!(stack.get(c), Some(&"c"));
        assert_eq!(stack.remove(c), Some("c"));
        assert_eq!(stack.current().map(|e| e.render), Some("a"));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut stack = OverlayStack::new();
        let a = stack.push(1);
        stack.remove(a);
        assert_eq!(stack.remove(a), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut stack = OverlayStack::new();
        let a = stack.push(());
        stack.remove(a);
        let b = stack.push(());
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_top_pops_presented() {
        let mut stack = OverlayStack::new();
        stack.push("below");
        let top = stack.push("top");
        let removed = stack.remove_top().map(|e| e.id);
        assert_eq!(removed, Some(top));
        assert_eq!(stack.current().map(|e| e.render), Some("below"));
        stack.remove_top();
        assert!(stack.remove_top().is_none());
    }

    #[test]
    fn test_push_with_receives_own_id() {
        let mut stack = OverlayStack::new();
        stack.push(OverlayId(99));
        let id = stack.push_with(|id| id);
        assert_eq!(stack.get(id), Some(&id));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push,
        Remove(usize),
        RemoveTop,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Push),
            2 => (0usize..16).prop_map(Op::Remove),
            1 => Just(Op::RemoveTop),
        ]
    }

    proptest! {
        /// `current()` is always the most recently pushed entry not yet removed.
        #[test]
        fn prop_current_tracks_latest_live_push(ops in prop::collection::vec(op(), 0..64)) {
            let mut stack = OverlayStack::new();
            // Model: ids of live entries in push order.
            let mut live: Vec<OverlayId> = Vec::new();
            let mut pushed: Vec<OverlayId> = Vec::new();

            for op in ops {
                match op {
                    Op::Push => {
                        let id = stack.push(pushed.len());
                        pushed.push(id);
                        live.push(id);
                    }
                    Op::Remove(n) => {
                        if let Some(&id) = pushed.get(n) {
                            let was_live = live.contains(&id);
                            prop_assert_eq!(stack.remove(id).is_some(), was_live);
                            live.retain(|l| *l != id);
                        }
                    }
                    Op::RemoveTop => {
                        let removed = stack.remove_top().map(|e| e.id);
                        prop_assert_eq!(removed, live.pop());
                    }
                }
                prop_assert_eq!(stack.current().map(|e| e.id), live.last().copied());
                prop_assert_eq!(stack.len(), live.len());
            }
        }
    }
}
