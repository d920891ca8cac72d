use ccm_core::{ConflictReport, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally before any request was sent.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("update rejected: {0}")]
    UpdateRejected(String),

    #[error("delete rejected: {0}")]
    DeleteRejected(String),

    #[error("copy failed: {0}")]
    CopyFailed(String),

    #[error(
        "conflict: '{}' already exists at {}",
        .0.target_file.name,
        .0.target_file.path
    )]
    Conflict(Box<ConflictReport>),
}

impl ClientError {
    pub(crate) fn malformed(endpoint: &str, reason: impl Into<String>) -> Self {
        ClientError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    /// User-facing failures: bad input, business rejections reported by the
    /// backend, and conflicts. These are shown to the user but not logged as
    /// errors. Transport failures, timeouts and shape mismatches are not
    /// expected and are always logged.
    pub fn is_expected(&self) -> bool {
        match self {
            ClientError::Invalid(_)
            | ClientError::NotFound(_)
            | ClientError::UpdateRejected(_)
            | ClientError::DeleteRejected(_)
            | ClientError::CopyFailed(_)
            | ClientError::Conflict(_) => true,
            ClientError::BackendUnavailable(_)
            | ClientError::Timeout(_)
            | ClientError::MalformedResponse { .. } => false,
        }
    }
}
