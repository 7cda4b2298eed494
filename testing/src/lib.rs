//! # Statekit Testing
//!
//! Testing utilities and helpers for statekit stores.
//!
//! This crate provides:
//! - Mock implementations of Environment traits (clocks)
//! - A storage double that records writes and can be switched off
//! - [`ReducerTest`], a Given-When-Then builder for reducers
//!
//! ## Example
//!
//! ```ignore
//! use statekit_testing::test_clock;
//! use statekit_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_todo_flow() {
//!     let env = TodoEnvironment::new(Arc::new(test_clock()));
//!     let store = Store::new(TodoState::default(), TodoReducer::new(), env);
//!
//!     store.send(TodoAction::AddTodo { text: "Buy milk".into() }).await;
//!
//!     let count = store.state(TodoState::count).await;
//!     assert_eq!(count, 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use statekit_core::environment::Clock;


pub use reducer_test::ReducerTest;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use statekit_persist::{MemoryStorage, Storage, StorageError};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use statekit_testing::mocks::FixedClock;
    /// use statekit_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every read
    ///
    /// The first read returns the start time.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: chrono::Duration,
    }

    impl SteppingClock {
        /// Create a clock starting at `start` and advancing by `step`
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: chrono::Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Storage double that remembers every successful write
    ///
    /// It can be switched to "unavailable", after which every call fails
    /// with [`StorageError::Unavailable`] and nothing is recorded.
    #[derive(Debug)]
    pub struct RecordingStorage {
        inner: MemoryStorage,
        writes: Mutex<Vec<(String, String)>>,
        available: AtomicBool,
    }

    impl Default for RecordingStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RecordingStorage {
        /// Create an empty, available storage
        #[must_use]
        pub fn new() -> Self {
            Self {
                inner: MemoryStorage::new(),
                writes: Mutex::new(Vec::new()),
                available: AtomicBool::new(true),
            }
        }

        /// Create a storage already holding `value` under `key`
        #[must_use]
        pub fn with_record(key: impl Into<String>, value: impl Into<String>) -> Self {
            Self {
                inner: MemoryStorage::with_record(key, value),
                writes: Mutex::new(Vec::new()),
                available: AtomicBool::new(true),
            }
        }

        /// Switch the backend on or off
        pub fn set_available(&self, available: bool) {
            self.available.store(available, Ordering::SeqCst);
        }

        /// All successful writes as `(key, value)` pairs, oldest first
        #[must_use]
        pub fn writes(&self) -> Vec<(String, String)> {
            self.writes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of successful writes
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// The value most recently written under `key`
        #[must_use]
        pub fn last_write(&self, key: &str) -> Option<String> {
            self.writes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }

        fn check_available(&self) -> Result<(), StorageError> {
            if self.available.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(StorageError::Unavailable)
            }
        }
    }

    impl Storage for RecordingStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.check_available()?;
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.check_available()?;
            self.inner.write(key, value)?;
            self.writes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((key.to_string(), value.to_string()));
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.check_available()?;
            self.inner.remove(key)
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a `tracing` subscriber for test output
    ///
    /// Honors `RUST_LOG`; safe to call from every test since only the first
    /// call installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, RecordingStorage, SteppingClock, test_clock};
