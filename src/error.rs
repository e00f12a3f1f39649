//! Error types for Biblioteca server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Entity kinds referenced in error payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Member,
    Book,
    Loan,
    Reservation,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Member => "Member",
            EntityKind::Book => "Book",
            EntityKind::Loan => "Loan",
            EntityKind::Reservation => "Reservation",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable application error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    DbFailure = 2,
    NoSuchMember = 3,
    NoSuchBook = 4,
    NoSuchLoan = 5,
    NoSuchReservation = 6,
    BookNotAvailable = 7,
    BadValue = 8,
    MemberHasOpenLoans = 9,
    BookHasOpenLoans = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{kind} with id {id} not found")]
    NotFound { kind: EntityKind, id: i32 },

    #[error("Book {book_id} has no available copies")]
    Unavailable { book_id: i32 },

    #[error("{kind} with id {id} is referenced by an open loan")]
    Conflict { kind: EntityKind, id: i32 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

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

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::NotFound { kind, .. } => {
                let code = match kind {
                    EntityKind::Member => ErrorCode::NoSuchMember,
                    EntityKind::Book => ErrorCode::NoSuchBook,
                    EntityKind::Loan => ErrorCode::NoSuchLoan,
                    EntityKind::Reservation => ErrorCode::NoSuchReservation,
                };
                (StatusCode::NOT_FOUND, code)
            }
            AppError::Unavailable { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::BookNotAvailable)
            }
            AppError::Conflict { kind, .. } => {
                let code = match kind {
                    EntityKind::Member => ErrorCode::MemberHasOpenLoans,
                    _ => ErrorCode::BookHasOpenLoans,
                };
                (StatusCode::CONFLICT, code)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure)
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure)
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
