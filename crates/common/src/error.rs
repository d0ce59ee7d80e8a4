//! Error types for La Grande Mosaïque.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
///
/// Every variant is terminal for the current call. Nothing in the voting core
/// retries on any of them.
#[derive(Debug, Error)]
pub enum AppError {
    // === Voting rejections ===
    #[error("Invalid vote channel: {0}")]
    InvalidChannel(String),

    #[error("Nominee {nominee} is not part of category {category}")]
    UnknownNominee { category: String, nominee: String },

    #[error("Voter has already voted in category {0}")]
    AlreadyVoted(String),

    #[error("Voting is closed for category {0}")]
    VotingClosed(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category {0} is not a battle")]
    NotABattle(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Server Errors ===
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::CategoryNotFound(_) | Self::UnknownNominee { .. } | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::VotingClosed(_) => StatusCode::FORBIDDEN,
            Self::AlreadyVoted(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidChannel(_)
            | Self::NotABattle(_)
            | Self::BadRequest(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,

            // 5xx Server Errors
            Self::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidCategory(_)
            | Self::Database(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidChannel(_) => "INVALID_CHANNEL",
            Self::UnknownNominee { .. } => "UNKNOWN_NOMINEE",
            Self::AlreadyVoted(_) => "ALREADY_VOTED",
            Self::VotingClosed(_) => "VOTING_CLOSED",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::NotABattle(_) => "NOT_A_BATTLE",
            Self::InvalidCategory(_) => "INVALID_CATEGORY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this is an expected, user-facing rejection rather than a fault.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::AlreadyVoted(_) | Self::VotingClosed(_))
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voting_status_codes() {
        assert_eq!(
            AppError::AlreadyVoted("song-of-month".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::VotingClosed("song-of-month".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InvalidChannel("carrier-pigeon".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::StorageUnavailable("timeout".to_string()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::UnknownNominee {
                category: "c".to_string(),
                nominee: "n".to_string(),
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_rejections_are_not_faults() {
        let already = AppError::AlreadyVoted("c".to_string());
        assert!(already.is_rejection());
        assert!(!already.is_server_error());

        let storage = AppError::StorageUnavailable("down".to_string());
        assert!(!storage.is_rejection());
        assert!(storage.is_server_error());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotABattle("c".to_string()).error_code(), "NOT_A_BATTLE");
        assert_eq!(
            AppError::CategoryNotFound("c".to_string()).error_code(),
            "CATEGORY_NOT_FOUND"
        );
    }
}
