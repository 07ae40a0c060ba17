use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::web::middleware::i18n::tr;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        details: Option<Value>,
    },
    #[error("Password hashing failed: {0}")]
    PasswordHashingError(String),
    #[error("JWT creation failed: {0}")]
    TokenCreationError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// Not-found error whose message is looked up under `errors.not_found.<resource>`.
    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(tr(&format!("errors.not_found.{resource}")))
    }

    pub fn conflict(message_key: &str, details: Option<Value>) -> Self {
        AppError::Conflict {
            message: tr(message_key),
            details,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg, None),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                tr("errors.validation"),
                serde_json::to_value(errors.field_errors()).ok(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                tr("errors.invalid_credentials"),
                None,
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                tr("errors.unauthorized"),
                None,
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            AppError::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            internal @ (AppError::PasswordHashingError(_)
            | AppError::TokenCreationError(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)) => {
                error!(error = %internal, "Request failed with an internal error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    tr("errors.internal"),
                    None,
                )
            }
        };
        (
            status,
            Json(ErrorEnvelope {
                code,
                message,
                details,
            }),
        )
            .into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalServerError(format!("JSON serialization/deserialization error: {err}"))
    }
}

/// True when the database rejected a write because of a unique constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn conflict_keeps_details_in_envelope() {
        let err = AppError::Conflict {
            message: "duplicate".to_string(),
            details: Some(serde_json::json!({ "existingRequestId": 7 })),
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "conflict");
        assert_eq!(body["message"], "duplicate");
        assert_eq!(body["details"]["existingRequestId"], 7);
    }

    #[tokio::test]
    async fn database_errors_are_not_leaked() {
        let err = AppError::DatabaseError("relation \"secret_table\" does not exist".to_string());
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internal_error");
        assert!(!body["message"].as_str().unwrap().contains("secret_table"));
        assert!(body.get("details").is_none());
    }
}
