//! Unified error handling for the HTTP boundary and the service layer.
//!
//! Data store failures keep the backend diagnostic intact all the way to the
//! client; everything else internal is hidden behind a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("Authentication required")]
    Unauthorized,

    // Validation
    #[error("{0}")]
    Validation(String),

    // Data store
    #[error("{0}")]
    StoreRead(String),

    #[error("{0}")]
    StoreWrite(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    // Internal
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::StoreRead(_) => "STORE_READ_ERROR",
            AppError::StoreWrite(_) => "STORE_WRITE_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),

            // The store diagnostic is part of the contract
            AppError::StoreRead(msg) | AppError::StoreWrite(msg) => msg.clone(),

            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {}", msg);
                msg.clone()
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                format!("Internal configuration error ({})", msg)
            }

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Reclassify as a read failure, keeping the diagnostic text.
    pub fn into_store_read(self) -> Self {
        match self {
            AppError::StoreRead(_) => self,
            other => AppError::StoreRead(other.diagnostic()),
        }
    }

    /// Reclassify as a write failure, keeping the diagnostic text.
    pub fn into_store_write(self) -> Self {
        match self {
            AppError::StoreWrite(_) => self,
            other => AppError::StoreWrite(other.diagnostic()),
        }
    }

    fn diagnostic(&self) -> String {
        match self {
            #[cfg(feature = "database")]
            AppError::Database(e) => e.to_string(),
            AppError::Internal(msg) | AppError::Upstream(msg) | AppError::Configuration(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidCredentials(msg) => AppError::Configuration(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn store_read(msg: impl Into<String>) -> Self {
        AppError::StoreRead(msg.into())
    }

    pub fn store_write(msg: impl Into<String>) -> Self {
        AppError::StoreWrite(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        AppError::Upstream(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
