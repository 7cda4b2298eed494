//! Error types for storage backends and codecs.
//!
//! None of these reach store callers: the [`Persist`](crate::Persist)
//! decorator logs and counts them, then carries on with in-memory state.

use thiserror::Error;

/// Errors raised by a [`Storage`](crate::Storage) backend
#[derive(Error, Debug)]
pub enum StorageError {
    /// The storage facility cannot be used at all in this environment
    #[error("Storage is unavailable")]
    Unavailable,

    /// Reading or writing the record for `key` failed
    #[error("Storage I/O failed for key {key}: {source}")]
    Io {
        /// Key being accessed
        key: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while encoding or decoding a persisted record
#[derive(Error, Debug)]
pub enum CodecError {
    /// State could not be serialized
    #[error("Failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored text is not a valid record for this state type
    #[error("Failed to decode persisted record: {0}")]
    Decode(#[source] serde_json::Error),
}
