//! Ledger error types with HTTP status code mapping.
//!
//! [`LedgerError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Address;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4001,
///     "message": "insufficient liquidity in pool 0xabc: available 100, requested 250",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see the code ranges on [`LedgerError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                  |
/// |-----------|-------------------|------------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request              |
/// | 2000–2999 | State / Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server            | 500 Internal Server Error    |
/// | 4000–4999 | Ledger rules      | 422 Unprocessable Entity     |
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transaction status string is not one of the known statuses.
    #[error("invalid transaction status: {0}")]
    InvalidStatus(String),

    /// Pool with the given address was not found.
    #[error("liquidity pool not found: {0}")]
    PoolNotFound(Address),

    /// A pool with the given address already exists.
    #[error("liquidity pool already exists: {0}")]
    PoolAlreadyExists(Address),

    /// A pool balance changed between the read and the write of a migration.
    #[error("balance of pool {0} changed concurrently; migration not applied")]
    StaleBalance(Address),

    /// The source pool cannot cover the migrated amount.
    #[error("insufficient liquidity in pool {address}: available {available}, requested {requested}")]
    InsufficientLiquidity {
        /// Source pool address.
        address: Address,
        /// Current pool balance.
        available: u64,
        /// Amount the migration asked for.
        requested: u64,
    },

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidStatus(_) => 1002,
            Self::PoolNotFound(_) => 2001,
            Self::PoolAlreadyExists(_) => 2002,
            Self::StaleBalance(_) => 2003,
            Self::Storage(_) => 3001,
            Self::InsufficientLiquidity { .. } => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            Self::PoolNotFound(_) => StatusCode::NOT_FOUND,
            Self::PoolAlreadyExists(_) | Self::StaleBalance(_) => StatusCode::CONFLICT,
            Self::InsufficientLiquidity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients. Server-side failures are masked.
    fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
