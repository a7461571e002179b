//! Error type for `roster-store-sqlite`.

use roster_core::store::{StoreError, StoreErrorKind};
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn kind(&self) -> StoreErrorKind {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) => classify(e),
      _ => StoreErrorKind::Other,
    }
  }
}

/// Map SQLite's extended result codes onto the store error taxonomy.
fn classify(e: &rusqlite::Error) -> StoreErrorKind {
  let rusqlite::Error::SqliteFailure(failure, _) = e else {
    return StoreErrorKind::Other;
  };
  match failure.extended_code {
    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
      StoreErrorKind::UniqueViolation
    }
    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreErrorKind::ForeignKeyViolation,
    ffi::SQLITE_CONSTRAINT_CHECK
    | ffi::SQLITE_CONSTRAINT_NOTNULL
    | ffi::SQLITE_MISMATCH => StoreErrorKind::InvalidInput,
    _ => StoreErrorKind::Other,
  }
}
