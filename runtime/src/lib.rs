//! # Statekit Runtime
//!
//! Runtime implementation of the statekit [`Store`].
//!
//! The Store owns an immutable snapshot of state, runs the reducer for each
//! dispatched action against a private copy, installs the result as the new
//! snapshot and tells interested listeners about it.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state snapshots and dispatch
//! - **Subscriptions**: Selector-keyed listeners that fire only when the
//!   selected slice changes by value
//! - **Watchers**: `tokio::sync::watch` channels fed by a selector
//!
//! ## Example
//!
//! ```ignore
//! use statekit_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Observe one slice
//! let (current, _subscription) = store
//!     .subscribe(|s| s.some_field, |value| println!("changed: {value}"))
//!     .await;
//!
//! // Send an action
//! store.send(Action::DoSomething).await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use statekit_core::reducer::Reducer;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::RwLock;

/// Metric names and descriptions for the runtime
pub mod metrics;

/// Selector-keyed listener registry
pub mod subscription;

pub use subscription::Subscription;

use subscription::{Listeners, Notified, Unregister};

/// Store module - the runtime coordinator for a reducer
pub mod store {
    use super::{
        Arc, Listeners, Mutex, Notified, PoisonError, Reducer, RwLock, Subscription, Unregister,
        Weak,
    };
    use crate::metrics::{
        STORE_ACTIONS_TOTAL, STORE_LISTENERS_NOTIFIED_TOTAL, STORE_REDUCER_DURATION_SECONDS,
    };
    use tokio::sync::watch;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (an `Arc` snapshot behind `RwLock`, replaced on every action)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Listeners registered through selectors
    ///
    /// Cloning a Store yields another handle to the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<Arc<S>>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        listeners: Arc<Listeners<S>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        S: Clone + Send + Sync + 'static,
        A: Send + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(Arc::new(initial_state))),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                listeners: Arc::new(Listeners::new()),
            }
        }

        /// Send an action to the store
        ///
        /// The reducer runs against a copy of the current snapshot; the result
        /// becomes the new snapshot and listeners whose selected slice changed
        /// are invoked before this call returns. The whole sequence happens
        /// under the state write lock, so no reader observes a half-applied
        /// action.
        ///
        /// Actions are fire-and-forget: there is nothing to return and
        /// nothing can fail.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) {
            metrics::counter!(STORE_ACTIONS_TOTAL).increment(1);

            let mut guard = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let mut next = S::clone(&**guard);
            let start = std::time::Instant::now();
            self.reducer.reduce(&mut next, action, &self.environment);
            metrics::histogram!(STORE_REDUCER_DURATION_SECONDS)
                .record(start.elapsed().as_secs_f64());

            let next = Arc::new(next);
            *guard = Arc::clone(&next);

            let fired = self.listeners.notify(&next);
            drop(guard);

            if fired > 0 {
                metrics::counter!(STORE_LISTENERS_NOTIFIED_TOTAL).increment(fired as u64);
            }
            tracing::debug!(listeners_fired = fired, "Action processed");
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&**state)
        }

        /// The current snapshot
        ///
        /// Snapshots are immutable; an action always installs a new one, so
        /// comparing two snapshots with [`Arc::ptr_eq`] tells whether any
        /// action ran in between.
        pub async fn snapshot(&self) -> Arc<S> {
            Arc::clone(&*self.state.read().await)
        }

        /// Subscribe to one slice of state
        ///
        /// Returns the slice as it is right now, plus a [`Subscription`]
        /// handle. After every action the selector runs against the new
        /// snapshot; `listener` is invoked with the new slice only when it
        /// differs (by `PartialEq`) from the previous one.
        ///
        /// Listeners run synchronously inside [`Store::send`] and must not
        /// block.
        ///
        /// # Example
        ///
        /// ```ignore
        /// let (theme, _sub) = settings
        ///     .subscribe(|s| s.theme, |theme| println!("theme is now {theme:?}"))
        ///     .await;
        /// ```
        pub async fn subscribe<T, F, L>(&self, selector: F, listener: L) -> (T, Subscription)
        where
            T: PartialEq + Clone + Send + 'static,
            F: Fn(&S) -> T + Send + Sync + 'static,
            L: Fn(&T) + Send + Sync + 'static,
        {
            // Hold the read lock so no action slips in between computing the
            // initial slice and registering the listener.
            let guard = self.state.read().await;
            let current = selector(&**guard);
            let last = Mutex::new(current.clone());

            let id = self.listeners.insert(Arc::new(move |state: &S| {
                let next = selector(state);
                {
                    let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
                    if *last == next {
                        return Notified::Unchanged;
                    }
                    last.clone_from(&next);
                }
                listener(&next);
                Notified::Fired
            }));
            drop(guard);

            let registry: Weak<dyn Unregister> = Arc::downgrade(&self.listeners) as Weak<dyn Unregister>;
            (current, Subscription::new(id, registry))
        }

        /// Watch one slice of state through a `tokio::sync::watch` channel
        ///
        /// The receiver starts at the current slice (marked as seen) and is
        /// only marked changed when the slice differs from its last value.
        /// The watcher is removed once every receiver is dropped.
        pub async fn watch<T, F>(&self, selector: F) -> watch::Receiver<T>
        where
            T: PartialEq + Send + Sync + 'static,
            F: Fn(&S) -> T + Send + Sync + 'static,
        {
            let guard = self.state.read().await;
            let (tx, rx) = watch::channel(selector(&**guard));

            self.listeners.insert(Arc::new(move |state: &S| {
                if tx.is_closed() {
                    return Notified::Closed;
                }
                let changed = tx.send_if_modified(|current| {
                    let next = selector(state);
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });
                if changed {
                    Notified::Fired
                } else {
                    Notified::Unchanged
                }
            }));
            drop(guard);

            rx
        }

        /// Number of registered listeners and watchers
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            self.listeners.len()
        }

        /// The environment this store was built with
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.environment
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                listeners: Arc::clone(&self.listeners),
            }
        }
    }
}

pub use store::Store;
