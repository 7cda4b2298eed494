//! Selector-keyed listener registry.
//!
//! Every registered listener is stored as a type-erased notifier that
//! re-runs its selector against a fresh snapshot, compares the projection with
//! the last value it saw and only then invokes the caller's callback.

use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Result of offering a new snapshot to one notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notified {
    /// The selected slice changed and the listener ran.
    Fired,
    /// The selected slice is equal to the last one seen.
    Unchanged,
    /// The receiving side is gone; the entry can be dropped.
    Closed,
}

/// Type-erased notifier for a state type `S`.
pub(crate) type Notifier<S> = Arc<dyn Fn(&S) -> Notified + Send + Sync>;

struct Entries<S> {
    next_id: u64,
    entries: Vec<(u64, Notifier<S>)>,
}

/// Registry of listeners for one store.
pub(crate) struct Listeners<S> {
    inner: Mutex<Entries<S>>,
}

impl<S> Listeners<S> {
    pub(crate) const fn new() -> Self {
        Self {
            inner: Mutex::new(Entries {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Registers a notifier and returns its id.
    pub(crate) fn insert(&self, notifier: Notifier<S>) -> u64 {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, notifier));
        id
    }

    pub(crate) fn remove(&self, id: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Offers `state` to every notifier in registration order.
    ///
    /// The registry lock is not held while callbacks run, so a callback may
    /// drop its own [`Subscription`]. Returns how many listeners fired.
    pub(crate) fn notify(&self, state: &S) -> usize {
        let snapshot: Vec<(u64, Notifier<S>)> = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone();

        let mut fired = 0;
        let mut closed = Vec::new();
        for (id, notifier) in snapshot {
            match notifier(state) {
                Notified::Fired => fired += 1,
                Notified::Unchanged => {}
                Notified::Closed => closed.push(id),
            }
        }

        if !closed.is_empty() {
            tracing::trace!(count = closed.len(), "Pruning closed watchers");
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.entries.retain(|(id, _)| !closed.contains(id));
        }

        fired
    }
}

/// Object-safe removal hook so [`Subscription`] does not carry the state type.
pub(crate) trait Unregister: Send + Sync {
    fn unregister(&self, id: u64);
}

impl<S> Unregister for Listeners<S>
where
    S: 'static,
{
    fn unregister(&self, id: u64) {
        self.remove(id);
    }
}

/// Handle for a listener registered with [`Store::subscribe`](crate::Store::subscribe).
///
/// The listener stays registered for as long as this handle is alive.
/// Dropping it unsubscribes; [`Subscription::detach`] keeps the listener for
/// the lifetime of the store instead.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Unregister>,
    detached: bool,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: Weak<dyn Unregister>) -> Self {
        Self {
            id,
            registry,
            detached: false,
        }
    }

    /// Explicitly unsubscribe (same as dropping the handle).
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep the listener registered until the store itself is dropped.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}
