//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is rendered as an [`Envelope`] with `success: false`.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::{
  envelope::{Envelope, FieldError},
  store::{StoreError, StoreErrorKind},
};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("student {0} not found")]
  NotFound(i64),

  #[error("validation failed ({} field errors)", .0.len())]
  Validation(Vec<FieldError>),

  #[error("invalid pagination parameters")]
  InvalidPagination,

  #[error("malformed request body: {0}")]
  MalformedBody(String),

  #[error("store error: {source}")]
  Store {
    kind:   StoreErrorKind,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Wrap a backend error, keeping its classification.
  pub fn store<E: StoreError>(e: E) -> Self {
    ApiError::Store { kind: e.kind(), source: Box::new(e) }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Validation(_)
      | ApiError::InvalidPagination
      | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
      ApiError::Store { kind, .. } => match kind {
        StoreErrorKind::UniqueViolation => StatusCode::CONFLICT,
        StoreErrorKind::ForeignKeyViolation | StoreErrorKind::InvalidInput => {
          StatusCode::BAD_REQUEST
        }
        StoreErrorKind::Other => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::MalformedBody(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match self {
      ApiError::NotFound(id) => {
        Envelope::failure(format!("Student with ID {id} not found"))
      }
      ApiError::Validation(errors) => {
        Envelope::failure("Validation failed").with_errors(errors)
      }
      ApiError::InvalidPagination => Envelope::failure(
        "Invalid pagination parameters. Page must be >= 1, limit must be \
         between 1 and 100",
      ),
      ApiError::MalformedBody(detail) => {
        Envelope::failure("Invalid data format").with_error(detail)
      }
      ApiError::Store { kind, source } => match kind {
        StoreErrorKind::UniqueViolation => {
          Envelope::failure("A record with this email already exists")
            .with_error("Duplicate entry")
        }
        StoreErrorKind::ForeignKeyViolation => {
          Envelope::failure("Invalid reference to related data")
            .with_error("Foreign key constraint violation")
        }
        StoreErrorKind::InvalidInput => Envelope::failure("Invalid data format")
          .with_error("Invalid input syntax"),
        StoreErrorKind::Other => {
          tracing::error!(error = %source, "unhandled store error");
          Envelope::failure("Internal server error").with_error("An error occurred")
        }
      },
    };
    (status, Json(body)).into_response()
  }
}
