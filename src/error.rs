//! Error types for the Libris server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::eligibility::DenialReason;

/// Application error codes carried in every error response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    DbFailure = 2,
    BadValue = 3,
    NoSuchData = 4,
    Duplicate = 5,
    UserSuspended = 6,
    MaxLoansReached = 7,
    OutstandingFees = 8,
    HasOverdueLoans = 9,
    BookUnavailable = 10,
    AlreadyReturned = 11,
    LoanOverdue = 12,
    ExtensionLimitReached = 13,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Loan is already returned")]
    AlreadyReturned,

    #[error("Loan is overdue and can no longer be extended")]
    Overdue,

    #[error("Maximum extension limit reached")]
    ExtensionLimit,

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Borrowing denied: {0}")]
    Ineligible(#[from] DenialReason),

    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn error_code(&self) -> ErrorCode {
        match self {
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::NotFound(_) => ErrorCode::NoSuchData,
            AppError::Conflict(_) => ErrorCode::Duplicate,
            AppError::AlreadyReturned => ErrorCode::AlreadyReturned,
            AppError::Overdue => ErrorCode::LoanOverdue,
            AppError::ExtensionLimit => ErrorCode::ExtensionLimitReached,
            AppError::LimitExceeded(_) => ErrorCode::MaxLoansReached,
            AppError::Ineligible(reason) => match reason {
                DenialReason::UserSuspended => ErrorCode::UserSuspended,
                DenialReason::LoanLimitExceeded => ErrorCode::MaxLoansReached,
                DenialReason::OutstandingFees(_) => ErrorCode::OutstandingFees,
                DenialReason::HasOverdueLoans(_) => ErrorCode::HasOverdueLoans,
                DenialReason::BookUnavailable(_) => ErrorCode::BookUnavailable,
            },
            AppError::Invariant(_) => ErrorCode::Failure,
            AppError::Database(_) => ErrorCode::DbFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::AlreadyReturned => (StatusCode::CONFLICT, self.to_string()),
            AppError::Overdue | AppError::ExtensionLimit | AppError::LimitExceeded(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            AppError::Ineligible(reason) => {
                (StatusCode::UNPROCESSABLE_ENTITY, reason.to_string())
            }
            AppError::Invariant(msg) => {
                tracing::error!("Invariant violation: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
