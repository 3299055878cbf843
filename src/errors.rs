use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::booking::BookingStatus;

/// Error taxonomy for the pricing/availability core. Handlers map these to
/// HTTP statuses via `ResponseError`; nothing is retried or swallowed.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("capacity exceeded: {guests} guests requested, maximum is {max}")]
    CapacityExceeded { guests: u32, max: u32 },

    #[error("room not found: {0}")]
    RoomNotFound(String),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl ResponseError for BookingError {
    fn status_code(&self) -> StatusCode {
        match self {
            BookingError::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
            BookingError::CapacityExceeded { .. } => StatusCode::BAD_REQUEST,
            BookingError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            BookingError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
