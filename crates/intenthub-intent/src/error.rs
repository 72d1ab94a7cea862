//! Intent engine error types.
//!
//! The only fallible step in this crate is compiling the pattern tables, so
//! [`IntentError`] stays small.  Classification and planning never fail.

/// Unified error type for the intent crate.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// A regex in the pattern catalog failed to compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A keyword automaton could not be built.
    #[error("invalid keyword set for `{group}`: {reason}")]
    InvalidKeywords { group: String, reason: String },
}

/// Convenience alias used throughout the intent crate.
pub type Result<T> = std::result::Result<T, IntentError>;
