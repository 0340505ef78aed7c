//! Error types for mathdrill-core.
//!
//! Session errors cover configuration problems the caller must fix before a
//! match can start. Store errors cover persistence failures on write; reads
//! deliberately degrade instead of erroring (see `store`).

use thiserror::Error;

/// Errors surfaced when configuring or driving a match session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Generation was requested with no operators enabled.
    #[error("no operators enabled")]
    NoOperatorsEnabled,

    /// A fixed-count session was configured with a count of zero.
    #[error("question count must be at least 1")]
    ZeroQuestionCount,

    /// A timed session was configured with a zero duration.
    #[error("timer duration must be at least 1 second")]
    ZeroDuration,

    /// `start()` was called on a session that is not in the setup phase.
    #[error("session already started; reset it first")]
    AlreadyStarted,
}

/// Errors that can occur when writing the persisted match collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access match store at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize match collection: {0}")]
    Serialize(#[from] serde_json::Error),
}
