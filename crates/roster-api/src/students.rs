//! Handlers for `/students` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/students` | Body: [`StudentBody`]; 201 + created record, 409 on duplicate email |
//! | `GET`    | `/students` | `?page` (default 1), `?limit` (default 10, max 100) |
//! | `GET`    | `/students/:id` | Record with marks; 404 if not found |
//! | `PUT`    | `/students/:id` | Partial [`StudentBody`]; 200 + updated record |
//! | `DELETE` | `/students/:id` | 200 + the deleted record |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  envelope::Envelope,
  pagination::Pagination,
  store::StudentStore,
  student::{Student, StudentDetail},
};

use crate::{
  error::ApiError,
  validate::{self, PageParams, StudentBody},
};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /students`: returns 201 + the stored [`Student`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<StudentBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StudentStore,
{
  let Json(body) = body?;
  let input = validate::new_student(body).map_err(ApiError::Validation)?;

  let student = store
    .create_student(input)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(student_id = student.student_id, "student created");
  Ok((
    StatusCode::CREATED,
    Json(Envelope::ok("Student created successfully", student)),
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /students[?page=<n>][&limit=<n>]`
///
/// An unreadable query string is treated like non-numeric values: the
/// defaults apply.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Student>>>, ApiError>
where
  S: StudentStore,
{
  let params = match query {
    Ok(Query(pairs)) => PageParams::from_pairs(pairs),
    Err(rejection) => {
      tracing::debug!(%rejection, "unreadable query string, using default paging");
      PageParams::default()
    }
  };
  let page = validate::page_request(&params).ok_or(ApiError::InvalidPagination)?;

  let (students, total) = tokio::try_join!(
    store.list_students(page.limit(), page.offset()),
    store.count_students(),
  )
  .map_err(ApiError::store)?;

  Ok(Json(
    Envelope::ok("Students retrieved successfully", students)
      .with_pagination(Pagination::new(page, total)),
  ))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /students/:id`: the student with its marks.
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Envelope<StudentDetail>>, ApiError>
where
  S: StudentStore,
{
  let id = validate::student_id(&raw_id).map_err(ApiError::Validation)?;

  let detail = store
    .get_student(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound(id))?;

  Ok(Json(Envelope::ok("Student retrieved successfully", detail)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /students/:id`: fields absent from the body keep their value.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
  body: Result<Json<StudentBody>, JsonRejection>,
) -> Result<Json<Envelope<Student>>, ApiError>
where
  S: StudentStore,
{
  let Json(body) = body?;
  let (id, patch) =
    validate::student_patch(&raw_id, body).map_err(ApiError::Validation)?;

  let student = store
    .update_student(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound(id))?;

  tracing::info!(student_id = id, "student updated");
  Ok(Json(Envelope::ok("Student updated successfully", student)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /students/:id`: hard delete; returns the removed record.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Envelope<Student>>, ApiError>
where
  S: StudentStore,
{
  let id = validate::student_id(&raw_id).map_err(ApiError::Validation)?;

  let student = store
    .delete_student(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound(id))?;

  tracing::info!(student_id = id, "student deleted");
  Ok(Json(Envelope::ok("Student deleted successfully", student)))
}
