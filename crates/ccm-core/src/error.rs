use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    #[error("target project id is required when copying to project scope")]
    MissingTargetProject,

    #[error("source record has neither a path nor a file path")]
    MissingSourcePath,

    #[error("unknown record kind '{0}': expected agent, command, hook, skill or mcp")]
    UnknownKind(String),

    #[error("malformed hook id '{id}': {reason}")]
    MalformedHookId { id: String, reason: String },

    #[error("unknown conflict strategy '{0}': expected skip, overwrite or rename")]
    UnknownStrategy(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn malformed_hook_id(id: &str, reason: impl Into<String>) -> Self {
        CoreError::MalformedHookId {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
