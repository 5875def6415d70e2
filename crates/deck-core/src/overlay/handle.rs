use super::{OverlayId, OverlayStack};

/// A call site's grip on the overlay stack.
///
/// The handle remembers the id its last `show()` produced, so `hide()`
/// removes exactly that entry no matter what else was pushed or removed in
/// between.
pub struct OverlayHandle<R> {
    id: Option<OverlayId>,
    make: Box<dyn Fn(OverlayId) -> R>,
}

impl<R> std::fmt::Debug for OverlayHandle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<R> OverlayHandle<R> {
    /// Binds a renderer factory. The factory receives the id of the entry
    /// it renders, which the presented content uses to close itself.
    pub fn new(make: impl Fn(OverlayId) -> R + 'static) -> Self {
        Self {
            id: None,
            make: Box::new(make),
        }
    }

    /// Id of the entry produced by the last `show()`, if still set.
    pub fn id(&self) -> Option<OverlayId> {
        self.id
    }

    pub fn is_shown(&self, stack: &OverlayStack<R>) -> bool {
        self.id.is_some_and(|id| stack.contains(id))
    }

    /// Presents the overlay. Calling it while shown replaces this handle's
    /// own entry and leaves every other entry alone.
    pub fn show(&mut self, stack: &mut OverlayStack<R>) -> OverlayId {
        if let Some(previous) = self.id.take() {
            stack.remove(previous);
        }
        let id = stack.push_with(|id| (self.make)(id));
        self.id = Some(id);
        id
    }

    /// Removes the entry produced by the last `show()`.
    ///
    /// Returns `false` (and does nothing) when the handle has no entry.
    pub fn hide(&mut self, stack: &mut OverlayStack<R>) -> bool {
        let Some(id) = self.id.take() else {
            tracing::debug!("hide() on a handle with no overlay");
            return false;
        };
        stack.remove(id).is_some()
    }
}
