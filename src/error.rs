//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("invalid order_by: {0}")]
    InvalidOrderBy(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {table} id '{id}'")]
    NotFound { table: &'static str, id: String },
    #[error("{table}: expected {expected} affected row(s), got {actual}")]
    RowsAffected {
        table: &'static str,
        expected: u64,
        actual: u64,
    },
    #[error("{table} has no {role} column")]
    MissingColumnRole {
        table: &'static str,
        role: &'static str,
    },
    #[error("{op} on {table}: {source}")]
    Execution {
        op: &'static str,
        table: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// Wraps a store error with the operation and table it came from.
    pub fn execution(op: &'static str, table: impl Into<String>) -> impl FnOnce(sqlx::Error) -> Self {
        let table = table.into();
        move |source| AppError::Execution { op, table, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
            || matches!(self.store_source(), Some(sqlx::Error::RowNotFound))
    }

    fn store_source(&self) -> Option<&sqlx::Error> {
        match self {
            AppError::Execution { source, .. } | AppError::Db(source) => Some(source),
            _ => None,
        }
    }

    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        if self.is_not_found() {
            return (StatusCode::NOT_FOUND, "not_found");
        }
        if let Some(sqlx::Error::Database(db)) = self.store_source() {
            if db.is_unique_violation() {
                return (StatusCode::CONFLICT, "conflict");
            }
            if db.is_foreign_key_violation() {
                return (StatusCode::BAD_REQUEST, "missing_reference");
            }
        }
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::InvalidOrderBy(_) => (StatusCode::BAD_REQUEST, "invalid_order_by"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::RowsAffected { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "rows_affected"),
            AppError::MissingColumnRole { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "descriptor_error")
            }
            AppError::Execution { .. } | AppError::Db(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
            }
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        }
        let details = match &self {
            AppError::InvalidOrderBy(column) => Some(serde_json::json!({ "order_by": column })),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
