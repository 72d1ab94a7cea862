//! Adapter error types.
//!
//! [`AdapterError`] is internal to the adapter boundary: every adapter
//! operation converts it into [`ServiceResult::Failure`](crate::ServiceResult)
//! before returning, so callers only ever see the rendered message.

/// Unified error type for IntentHub adapters.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The HTTP request to the managed service could not be completed.
    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The managed service answered with a non-success status.
    #[error("{service} returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// `execute` was called before `connect`.
    #[error("adapter `{adapter}` is not connected")]
    NotConnected { adapter: String },

    /// The operation name is not part of the adapter's operation set.
    #[error("Unknown method: {operation}")]
    UnknownOperation { operation: String },

    /// A requested object does not exist.
    #[error("File {name} not found")]
    NotFound { name: String },

    /// Rows were rejected by a batch insert.
    #[error("row insert failed: {0}")]
    InsertRejected(String),

    /// Configuration error in adapter setup.
    #[error("configuration error: {0}")]
    Config(String),

    /// A failure injected by an in-memory backend, or any other fault that
    /// has no typed variant.
    #[error("{0}")]
    Backend(String),
}

/// Convenience alias used throughout the adapters crate.
pub type Result<T> = std::result::Result<T, AdapterError>;
