//! Error types for study-core.

use thiserror::Error;

/// Failure of a remote collaborator call.
///
/// Every variant carries a human-readable message suitable for inline
/// display; callers are not expected to branch on the failure kind.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Response(String),
}

/// Session operation errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Backend(#[from] BackendError),
}
