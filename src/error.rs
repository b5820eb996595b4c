//! Error types for the wrapper filter.

use crate::unknown::Capability;
use thiserror::Error;

/// Result type alias using the crate's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for filter, pin and component operations.
///
/// Errors are `Clone + PartialEq` so that host code can compare the outcome
/// of a negotiation step directly against an expected kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The pin has no peer.
    #[error("pin is not connected")]
    NotConnected,

    /// The pin already has a peer.
    #[error("pin is already connected")]
    AlreadyConnected,

    /// An exact media type was rejected.
    #[error("media type not accepted")]
    TypeNotAccepted,

    /// No candidate type satisfied a wildcarded request.
    #[error("no acceptable media types")]
    NoAcceptableTypes,

    /// The component (or peer) does not implement the requested operation.
    ///
    /// Callers are expected to fall back to defaults.
    #[error("operation not implemented")]
    NotImplemented,

    /// The object does not expose the requested capability.
    #[error("capability not supported: {0:?}")]
    NoInterface(Capability),

    /// A malformed call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The wrapped component is missing or incompatible.
    #[error("initialization failed: {0}")]
    InitializationError(String),

    /// A named object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation requires a stopped filter.
    #[error("filter is not stopped")]
    NotStopped,

    /// The operation is invalid in the current lifecycle state.
    #[error("filter is in the wrong state")]
    WrongState,

    /// The pin is between begin-flush and end-flush.
    #[error("pin is flushing")]
    Flushing,

    /// Allocator properties cannot change while buffers are committed.
    #[error("allocator is committed")]
    AllocatorCommitted,

    /// Buffers were requested from a decommitted allocator.
    #[error("allocator is not committed")]
    NotCommitted,

    /// Every committed buffer is in use.
    #[error("allocator pool exhausted: no buffers available")]
    PoolExhausted,

    /// A back-reference outlived its target.
    #[error("object has been released")]
    Released,

    /// Failure reported by the wrapped component, passed through verbatim.
    #[error("component error: {0}")]
    Component(String),
}

impl Error {
    /// Create an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::InitializationError(msg.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Whether this is the "use defaults" outcome.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented)
    }
}
