//! Error types for Filekit
//!
//! The user-visible failure taxonomy is deliberately coarse: the dispatcher
//! reports `Invalid input` for anything that never became a runnable command
//! and `Operation failed` for everything that failed while running. The
//! variants below keep enough detail for logging; only the kind reaches the
//! user.

use thiserror::Error;

/// Result type alias using Filekit's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Filekit error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Input that does not form a runnable command: unknown command name,
    /// wrong argument count, unrecognized `os` flag.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error from storage or stream operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A storage precondition failed (wrong entry type, missing target).
    #[error("operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// True if the dispatcher should report this as a usage error rather
    /// than a runtime failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}
