//! The `StudentStore` trait and the error classification its backends share.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-api`, `roster-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::student::{NewStudent, Student, StudentDetail, StudentPatch};

// ─── Error classification ────────────────────────────────────────────────────

/// The store failures the request layer distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
  /// A UNIQUE constraint rejected the write (duplicate email).
  UniqueViolation,
  /// A row referenced a parent that does not exist.
  ForeignKeyViolation,
  /// A value the store could not accept (CHECK, NOT NULL, bad literal).
  InvalidInput,
  /// Anything else: I/O, a closed connection, corrupt rows.
  Other,
}

/// Implemented by every backend error type so the request layer can map
/// failures to status codes without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> StoreErrorKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a student-records backend.
///
/// Id-keyed reads and writes report a missing row as `Ok(None)`, never as an
/// error. Every method is a single statement; there are no multi-step
/// transactions and no optimistic locking, so concurrent writers to the same
/// row resolve as last-write-wins.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait StudentStore: Send + Sync {
  type Error: StoreError;

  /// Insert a student and return the stored row, defaults applied.
  ///
  /// Fails with [`StoreErrorKind::UniqueViolation`] if the email is taken.
  fn create_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Up to `limit` students starting at `offset`, newest `student_id` first.
  fn list_students(
    &self,
    limit: u64,
    offset: u64,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Total number of students.
  fn count_students(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// A student with its marks (newest exam first), or `None`.
  fn get_student(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<StudentDetail>, Self::Error>> + Send + '_;

  /// Overwrite every field set in `patch`, refresh `updated_at`, and return
  /// the updated row. `None` if no student has this id.
  fn update_student(
    &self,
    id: i64,
    patch: StudentPatch,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// Hard-delete a student and return the row as it was. `None` if absent.
  fn delete_student(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// A cheap round trip used by health checks.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
