use crate::loader::ArtifactKind;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};

/// Failures while reading, decoding or validating the precomputed artifacts.
///
/// Always fatal at startup. During a reload the previous artifact set stays live.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read {kind} artifact from {location}: {source}")]
    Io {
        kind: ArtifactKind,
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {kind} artifact: {source}")]
    Csv {
        kind: ArtifactKind,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to decode {kind} artifact: {source}")]
    Decode {
        kind: ArtifactKind,
        #[source]
        source: bincode::Error,
    },

    #[error("Invalid artifact set: {0}")]
    Invalid(String),

    #[error("Artifact loading task failed: {0}")]
    Task(String),
}

/// Per-request recommendation failures
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("Missing user_id parameter")]
    MissingUserId,

    #[error("Invalid user_id '{0}': expected a non-negative integer")]
    InvalidUserId(String),

    #[error("Invalid top_n: {0}")]
    InvalidTopN(String),

    #[error("Embedding dimension mismatch: profile has {actual} values, matrix rows have {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Artifact reload failed: {0}")]
    ReloadFailed(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Admin routes are disabled: no admin token is configured")]
    AdminDisabled,
}

impl RecommendError {
    fn code(&self) -> &'static str {
        match self {
            RecommendError::MissingUserId => "missing_user_id",
            RecommendError::InvalidUserId(_) => "invalid_user_id",
            RecommendError::InvalidTopN(_) => "invalid_top_n",
            RecommendError::DimensionMismatch { .. } => "scoring_failed",
            RecommendError::ReloadFailed(_) => "reload_failed",
            RecommendError::Unauthorized(_) => "unauthorized",
            RecommendError::AdminDisabled => "admin_disabled",
        }
    }
}

impl From<ArtifactError> for RecommendError {
    fn from(err: ArtifactError) -> Self {
        RecommendError::ReloadFailed(err.to_string())
    }
}

impl ResponseError for RecommendError {
    fn status_code(&self) -> StatusCode {
        match self {
            RecommendError::MissingUserId
            | RecommendError::InvalidUserId(_)
            | RecommendError::InvalidTopN(_) => StatusCode::BAD_REQUEST,
            RecommendError::DimensionMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RecommendError::ReloadFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            RecommendError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RecommendError::AdminDisabled => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.code(),
            "error_description": self.to_string()
        }))
    }
}
