//! Async HTTP client wrapping the Roster JSON API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use roster_core::{
  envelope::{Envelope, FieldError},
  pagination::Pagination,
  student::{Student, StudentDetail},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// A JSON object of student fields, as sent to `POST`/`PUT`.
pub type StudentFields = Map<String, Value>;

/// Connection settings for the Roster API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  /// The server answered with `success: false`.
  #[error("{message}")]
  Rejected {
    status:  StatusCode,
    message: String,
    errors:  Vec<FieldError>,
  },

  #[error("{0}: response carried no data")]
  MissingData(&'static str),
}

impl ClientError {
  /// Field-level validation errors, if the server reported any.
  pub fn field_errors(&self) -> &[FieldError] {
    match self {
      ClientError::Rejected { errors, .. } => errors,
      _ => &[],
    }
  }

  /// The server reported 404 for the requested student.
  pub fn is_not_found(&self) -> bool {
    matches!(self, ClientError::Rejected { status, .. } if *status == StatusCode::NOT_FOUND)
  }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Async HTTP client for the Roster REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Envelope<T>> {
    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp.json().await?);
    }
    let bytes = resp.bytes().await?;
    Err(rejection(status, &bytes))
  }

  // ── Students ──────────────────────────────────────────────────────────────

  /// `GET /api/students?page=<n>&limit=<n>`
  pub async fn list_students(
    &self,
    page: u64,
    limit: u64,
  ) -> Result<(Vec<Student>, Pagination)> {
    let envelope: Envelope<Vec<Student>> = self
      .send(
        self
          .client
          .get(self.url("/students"))
          .query(&[("page", page), ("limit", limit)]),
      )
      .await?;
    match (envelope.data, envelope.pagination) {
      (Some(students), Some(pagination)) => Ok((students, pagination)),
      _ => Err(ClientError::MissingData("GET /students")),
    }
  }

  /// `GET /api/students/:id`
  pub async fn get_student(&self, id: i64) -> Result<StudentDetail> {
    self
      .send(self.client.get(self.url(&format!("/students/{id}"))))
      .await?
      .data
      .ok_or(ClientError::MissingData("GET /students/:id"))
  }

  /// `POST /api/students`
  pub async fn create_student(&self, fields: &StudentFields) -> Result<Student> {
    self
      .send(self.client.post(self.url("/students")).json(fields))
      .await?
      .data
      .ok_or(ClientError::MissingData("POST /students"))
  }

  /// `PUT /api/students/:id`: only the fields present are changed.
  pub async fn update_student(
    &self,
    id: i64,
    fields: &StudentFields,
  ) -> Result<Student> {
    self
      .send(self.client.put(self.url(&format!("/students/{id}"))).json(fields))
      .await?
      .data
      .ok_or(ClientError::MissingData("PUT /students/:id"))
  }

  /// `DELETE /api/students/:id`: returns the removed record.
  pub async fn delete_student(&self, id: i64) -> Result<Student> {
    self
      .send(self.client.delete(self.url(&format!("/students/{id}"))))
      .await?
      .data
      .ok_or(ClientError::MissingData("DELETE /students/:id"))
  }
}

/// Turn a non-2xx response body into a [`ClientError::Rejected`].
///
/// Bodies that are not an envelope fall back to the status reason.
fn rejection(status: StatusCode, body: &[u8]) -> ClientError {
  match serde_json::from_slice::<Envelope<Value>>(body) {
    Ok(envelope) => ClientError::Rejected {
      status,
      message: envelope.message,
      errors: envelope.errors.unwrap_or_default(),
    },
    Err(_) => ClientError::Rejected {
      status,
      message: status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_owned(),
      errors: Vec::new(),
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validation_envelope_keeps_field_errors() {
    let body = br#"{
      "success": false,
      "message": "Validation failed",
      "errors": [{ "field": "email", "message": "Must be a valid email address" }]
    }"#;
    let err = rejection(StatusCode::BAD_REQUEST, body);
    assert_eq!(err.to_string(), "Validation failed");
    assert_eq!(err.field_errors(), &[FieldError::new(
      "email",
      "Must be a valid email address"
    )]);
  }

  #[test]
  fn conflict_envelope_has_no_field_errors() {
    let body = br#"{
      "success": false,
      "message": "A record with this email already exists",
      "error": "Duplicate entry"
    }"#;
    let err = rejection(StatusCode::CONFLICT, body);
    assert!(matches!(
      &err,
      ClientError::Rejected { status, .. } if *status == StatusCode::CONFLICT
    ));
    assert!(err.field_errors().is_empty());
    assert!(!err.is_not_found());
  }

  #[test]
  fn not_found_is_recognised() {
    let body = br#"{ "success": false, "message": "Student with ID 9 not found" }"#;
    let err = rejection(StatusCode::NOT_FOUND, body);
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Student with ID 9 not found");
  }

  #[test]
  fn non_json_body_falls_back_to_reason() {
    let err = rejection(StatusCode::METHOD_NOT_ALLOWED, b"");
    assert_eq!(err.to_string(), "Method Not Allowed");
  }

  #[test]
  fn urls_are_mounted_under_api() {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://localhost:8000/".into(),
    })
    .unwrap();
    assert_eq!(client.url("/students/3"), "http://localhost:8000/api/students/3");
  }
}
