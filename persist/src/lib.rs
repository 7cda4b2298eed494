//! # Statekit Persist
//!
//! Makes a store's state survive process restarts.
//!
//! [`Persist`] decorates a reducer: on startup it reads the record stored
//! under a key and, when that record is usable, starts the store from it
//! instead of the compiled-in default. After every action it writes the whole
//! state back. Storage and codec failures are logged and counted but never
//! reach the caller; the store keeps working in memory.
//!
//! ## Example
//!
//! ```ignore
//! use statekit_persist::{FileStorage, Persist, PersistOptions};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(FileStorage::new(".todo-app"));
//! let store = Persist::new(SettingsReducer, storage, PersistOptions::new("user-storage"))
//!     .into_store(SettingsState::default(), ());
//! ```

use metrics::describe_counter;

/// Record encoding
pub mod codec;

/// Error types
pub mod error;

/// The persistence decorator
pub mod persist;

/// Storage backends
pub mod storage;

pub use codec::{Codec, Decoded, JsonCodec};
pub use error::{CodecError, StorageError};
pub use persist::{HydrateOutcome, Persist, PersistOptions, PersistPhase};
pub use storage::{FileStorage, MemoryStorage, Storage, UnavailableStorage};

/// Successful full-state writes.
pub const PERSIST_WRITES_TOTAL: &str = "persist_writes_total";

/// Writes that failed to encode or reach storage.
pub const PERSIST_WRITE_FAILURES_TOTAL: &str = "persist_write_failures_total";

/// Hydration attempts, labelled by `outcome`.
pub const PERSIST_HYDRATIONS_TOTAL: &str = "persist_hydrations_total";

/// Register persistence metric descriptions.
pub fn describe_metrics() {
    describe_counter!(PERSIST_WRITES_TOTAL, "Total number of persisted state writes");
    describe_counter!(
        PERSIST_WRITE_FAILURES_TOTAL,
        "Total number of state writes that failed and were skipped"
    );
    describe_counter!(
        PERSIST_HYDRATIONS_TOTAL,
        "Hydration attempts by outcome (restored, missing, corrupt, version_mismatch, unavailable)"
    );
}
