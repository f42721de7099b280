// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

/// API error with appropriate status codes and client-friendly messages
#[derive(Debug, Error)]
pub enum ApiError {
    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 400 Bad Request - duplicate natural key
    #[error("{0}")]
    Conflict(String),

    // 400 Bad Request - inverted filter bounds
    #[error("{0}")]
    InvalidRange(String),

    // 400 Bad Request - nothing left to update
    #[error("No fields to update")]
    EmptyUpdate,

    // 400 Bad Request - structural payload violations
    #[error("Request validation failed")]
    ValidationFailed(Vec<String>),

    // 401 Unauthorized - missing or invalid credentials
    #[error("{0}")]
    Unauthenticated(String),

    // 403 Forbidden - valid credentials, insufficient privilege
    #[error("{0}")]
    Forbidden(String),

    // 500 Internal Server Error
    #[error("{0}")]
    Internal(String),

    // 503 Service Unavailable
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            ApiError::EmptyUpdate => StatusCode::BAD_REQUEST,
            ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationFailed(messages) => json!({
                "error": {
                    "status": self.status_code().as_u16(),
                    "messages": messages,
                }
            }),
            _ => json!({
                "error": {
                    "status": self.status_code().as_u16(),
                    "message": self.to_string(),
                }
            }),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::Conflict("Duplicate key".to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                tracing::error!("database unavailable: {}", err);
                ApiError::Unavailable("Database temporarily unavailable".to_string())
            }
            _ => {
                // Don't expose internal SQL errors to clients
                tracing::error!("database error: {}", err);
                ApiError::Internal("An error occurred while processing your request".to_string())
            }
        }
    }
}

impl From<crate::db::DbError> for ApiError {
    fn from(err: crate::db::DbError) -> Self {
        match err {
            crate::db::DbError::ConfigMissing(name) => {
                tracing::error!("missing configuration: {}", name);
                ApiError::Unavailable("Database temporarily unavailable".to_string())
            }
            crate::db::DbError::Sqlx(e) => e.into(),
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("bcrypt failure: {}", err);
        ApiError::Internal("An error occurred while processing your request".to_string())
    }
}

impl From<crate::query::QueryError> for ApiError {
    fn from(err: crate::query::QueryError) -> Self {
        match err {
            crate::query::QueryError::InvalidRange { .. } => ApiError::InvalidRange(err.to_string()),
            crate::query::QueryError::EmptyUpdate => ApiError::EmptyUpdate,
        }
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
