use thiserror::Error;

use crate::lifecycle::TransitionRejected;

#[derive(Debug, Error)]
pub enum RecruitError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication required: {0}")]
    Authentication(String),

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionRejected),

    #[error("Rollback of {operation_id} failed: {message}")]
    RollbackFailed {
        operation_id: String,
        message: String,
    },

    #[error("Rollback unavailable: {0}")]
    RollbackUnavailable(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl RecruitError {
    /// HTTP status the API layer answers with for this error.
    ///
    /// Rollback authorization and rollback failures are reported as 400,
    /// not 403/500.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::Authorization(_)
            | Self::InvalidTransition(_)
            | Self::RollbackFailed { .. }
            | Self::RollbackUnavailable(_) => 400,
            Self::Authentication(_) => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Config(_)
            | Self::Store(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Toml(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Whether the message may be shown to the caller. Internal failures are
    /// logged server-side and replaced by a generic message.
    pub fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}

/// Failures reported by an [`EntityStore`](crate::store::EntityStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: String, id: i64 },

    #[error("{entity_type} {id} already exists")]
    AlreadyExists { entity_type: String, id: i64 },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
