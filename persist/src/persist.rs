//! The persistence decorator.
//!
//! [`Persist`] wraps a reducer and implements [`Reducer`] with the same
//! associated types. Hydration reads the stored record once at startup; after
//! that every action writes the full state back under the configured key.

use crate::codec::{Codec, JsonCodec};
use crate::storage::Storage;
use crate::{PERSIST_HYDRATIONS_TOTAL, PERSIST_WRITE_FAILURES_TOTAL, PERSIST_WRITES_TOTAL};
use statekit_core::reducer::Reducer;
use statekit_runtime::Store;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Where and how a state is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOptions {
    /// Storage key identifying the record
    pub key: String,
    /// Schema version written into, and required of, the record
    pub version: u32,
}

impl PersistOptions {
    /// Options for `key` at version 0
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version: 0,
        }
    }

    /// Set the schema version
    #[must_use]
    pub const fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

/// Lifecycle of a [`Persist`] decorator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistPhase {
    /// No hydration attempt yet; writes are held back so the stored record
    /// cannot be clobbered by a default state.
    Uninitialized,
    /// Hydration happened; every action is written through.
    Ready,
}

/// How a hydration attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrateOutcome {
    /// A stored record replaced the default state
    Restored,
    /// No record under the key
    Missing,
    /// The record could not be decoded
    Corrupt,
    /// The record carries no version or a different one
    VersionMismatch,
    /// The storage backend failed
    Unavailable,
}

impl HydrateOutcome {
    /// Label used in logs and metrics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restored => "restored",
            Self::Missing => "missing",
            Self::Corrupt => "corrupt",
            Self::VersionMismatch => "version_mismatch",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Reducer decorator mirroring state to a [`Storage`]
///
/// # Example
///
/// ```ignore
/// let persist = Persist::new(SettingsReducer, storage, PersistOptions::new("user-storage"));
/// let store = persist.into_store(SettingsState::default(), ());
/// ```
pub struct Persist<R, C = JsonCodec> {
    inner: R,
    storage: Arc<dyn Storage>,
    codec: C,
    options: PersistOptions,
    ready: AtomicBool,
}

impl<R> Persist<R, JsonCodec>
where
    R: Reducer,
    JsonCodec: Codec<R::State>,
{
    /// Wrap `inner`, persisting as JSON
    #[must_use]
    pub fn new(inner: R, storage: Arc<dyn Storage>, options: PersistOptions) -> Self {
        Self::with_codec(inner, storage, JsonCodec, options)
    }
}

impl<R, C> Persist<R, C>
where
    R: Reducer,
    C: Codec<R::State>,
{
    /// Wrap `inner`, persisting with a custom codec
    #[must_use]
    pub fn with_codec(inner: R, storage: Arc<dyn Storage>, codec: C, options: PersistOptions) -> Self {
        Self {
            inner,
            storage,
            codec,
            options,
            ready: AtomicBool::new(false),
        }
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> PersistPhase {
        if self.ready.load(Ordering::Acquire) {
            PersistPhase::Ready
        } else {
            PersistPhase::Uninitialized
        }
    }

    /// Whether hydration has happened
    #[must_use]
    pub fn has_hydrated(&self) -> bool {
        self.phase() == PersistPhase::Ready
    }

    /// The options this decorator was built with
    #[must_use]
    pub const fn options(&self) -> &PersistOptions {
        &self.options
    }

    /// The wrapped reducer
    #[must_use]
    pub const fn inner(&self) -> &R {
        &self.inner
    }

    /// Read the stored record and produce the initial state
    ///
    /// A readable, decodable record with the expected version is merged over
    /// `default`: fields it carries win, fields it lacks keep their value from
    /// `default`. Anything else (no record, undecodable text, wrong version,
    /// failing storage) yields `default` unchanged. Either way the decorator
    /// moves to [`PersistPhase::Ready`].
    pub fn hydrate(&self, default: R::State) -> R::State {
        let (state, outcome) = self.load(default);

        metrics::counter!(PERSIST_HYDRATIONS_TOTAL, "outcome" => outcome.as_str()).increment(1);
        match outcome {
            HydrateOutcome::Restored | HydrateOutcome::Missing => {
                tracing::debug!(key = %self.options.key, outcome = outcome.as_str(), "Hydrated state");
            }
            HydrateOutcome::Corrupt
            | HydrateOutcome::VersionMismatch
            | HydrateOutcome::Unavailable => {
                tracing::warn!(
                    key = %self.options.key,
                    outcome = outcome.as_str(),
                    "Falling back to default state"
                );
            }
        }

        self.ready.store(true, Ordering::Release);
        state
    }

    fn load(&self, default: R::State) -> (R::State, HydrateOutcome) {
        let raw = match self.storage.read(&self.options.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return (default, HydrateOutcome::Missing),
            Err(error) => {
                tracing::debug!(key = %self.options.key, %error, "Storage read failed");
                return (default, HydrateOutcome::Unavailable);
            }
        };

        match self.codec.decode(&raw, &default) {
            Ok(decoded) if decoded.version == Some(self.options.version) => {
                (decoded.state, HydrateOutcome::Restored)
            }
            Ok(decoded) => {
                tracing::debug!(
                    key = %self.options.key,
                    found = ?decoded.version,
                    expected = self.options.version,
                    "Persisted record has a different version"
                );
                (default, HydrateOutcome::VersionMismatch)
            }
            Err(error) => {
                tracing::debug!(key = %self.options.key, %error, "Persisted record is unreadable");
                (default, HydrateOutcome::Corrupt)
            }
        }
    }

    /// Delete the stored record
    ///
    /// In-memory state is untouched; the next action writes a fresh record.
    pub fn clear_storage(&self) {
        if let Err(error) = self.storage.remove(&self.options.key) {
            tracing::warn!(key = %self.options.key, %error, "Failed to clear persisted record");
        }
    }

    /// Serialize and write the full state, swallowing failures
    fn write_through(&self, state: &R::State) {
        let raw = match self.codec.encode(state, self.options.version) {
            Ok(raw) => raw,
            Err(error) => {
                metrics::counter!(PERSIST_WRITE_FAILURES_TOTAL).increment(1);
                tracing::warn!(key = %self.options.key, %error, "Failed to encode state");
                return;
            }
        };

        match self.storage.write(&self.options.key, &raw) {
            Ok(()) => {
                metrics::counter!(PERSIST_WRITES_TOTAL).increment(1);
                tracing::trace!(key = %self.options.key, bytes = raw.len(), "Persisted state");
            }
            Err(error) => {
                metrics::counter!(PERSIST_WRITE_FAILURES_TOTAL).increment(1);
                tracing::warn!(key = %self.options.key, %error, "Failed to persist state");
            }
        }
    }

    /// Hydrate and build a [`Store`] around this decorator
    #[must_use]
    pub fn into_store(
        self,
        default: R::State,
        environment: R::Environment,
    ) -> Store<R::State, R::Action, R::Environment, Self>
    where
        R: Send + Sync + 'static,
        C: 'static,
        R::State: Clone + Send + Sync + 'static,
        R::Action: Send + 'static,
        R::Environment: Send + Sync + 'static,
    {
        let initial = self.hydrate(default);
        Store::new(initial, self, environment)
    }
}

impl<R, C> Reducer for Persist<R, C>
where
    R: Reducer,
    C: Codec<R::State>,
{
    type State = R::State;
    type Action = R::Action;
    type Environment = R::Environment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        self.inner.reduce(state, action, env);

        if self.has_hydrated() {
            self.write_through(state);
        } else {
            tracing::debug!(key = %self.options.key, "Skipping write before hydration");
        }
    }
}

impl<R, C> std::fmt::Debug for Persist<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persist")
            .field("options", &self.options)
            .field("ready", &self.ready.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
