//! Errors surfaced by the bridge core.

/// Failures reported synchronously to the caller that triggered them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// The control endpoint received a method name it does not implement.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
