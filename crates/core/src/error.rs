//! Unified error type for callorder.
//!
//! ## Taxonomy
//!
//! | Variant | Kind | Raised when |
//! |---------|------|-------------|
//! | UnknownOperation | lookup | a logger names an operation its table lacks |
//! | InvalidDescriptor | configuration | a capability table is malformed |
//! | ArgumentCountMismatch | fatal | more values than declared parameters |
//! | Io / Encode | persistence | writing an entry failed |
//! | Decode | persistence | reading an entry back failed |
//! | Provider | passthrough | the wrapped provider failed |
//! | Disposed | usage | a call reached a proxy after `dispose` |
//! | Config | configuration | recording configuration could not be loaded |
//! | OrderMismatch | verification | recorded order differs from the expected one |

use thiserror::Error;

/// All callorder errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Operation not declared by the capability table
    #[error("capability {capability} has no operation named {operation}")]
    UnknownOperation {
        /// Capability searched
        capability: String,
        /// Operation requested
        operation: String,
    },

    /// Malformed capability table
    #[error("invalid capability descriptor {capability}: {reason}")]
    InvalidDescriptor {
        /// Capability name
        capability: String,
        /// What is wrong with it
        reason: String,
    },

    /// More argument values than declared parameters
    #[error("{method} declares {declared} parameters but {supplied} arguments were supplied")]
    ArgumentCountMismatch {
        /// Qualified method name
        method: String,
        /// Declared parameter count
        declared: usize,
        /// Supplied value count
        supplied: usize,
    },

    /// I/O error while persisting or loading entries
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be encoded
    #[error("encode error: {0}")]
    Encode(String),

    /// Entry text could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// Failure reported by a wrapped provider
    #[error("provider error: {0}")]
    Provider(String),

    /// Call made through a proxy that has been disposed
    #[error("{capability} provider has been disposed")]
    Disposed {
        /// Capability the call was made against
        capability: String,
    },

    /// Recording configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Recorded call order differs from the expected order
    #[error("call order mismatch at position {index}: expected {expected}, found {actual}")]
    OrderMismatch {
        /// Position of the first divergence
        index: usize,
        /// Expected method name (or `<end>`)
        expected: String,
        /// Recorded method name (or `<end>`)
        actual: String,
    },
}

/// Result type for callorder operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a provider failure.
    pub fn provider(message: impl Into<String>) -> Self {
        Error::Provider(message.into())
    }

    /// Errors that mean the instrumentation itself is broken.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::UnknownOperation { .. }
                | Error::InvalidDescriptor { .. }
                | Error::ArgumentCountMismatch { .. }
        )
    }

    /// Errors raised while writing an entry.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Encode(_))
    }
}
