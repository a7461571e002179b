//! HTTP front door for Roster.
//!
//! Mounts the JSON API under `/api` and adds the service-info, health and
//! fallback routes plus request tracing.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  extract::{OriginalUri, State},
  http::StatusCode,
  response::IntoResponse,
  routing::get,
};
use chrono::Utc;
use roster_core::store::StudentStore;
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

pub const SERVICE_VERSION: &str = "1.0.0";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, layered from defaults, `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub const DEFAULT_HOST: &'static str = "127.0.0.1";
  pub const DEFAULT_PORT: u16 = 8000;
  pub const DEFAULT_STORE_PATH: &'static str = "roster.db";

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: StudentStore + 'static,
{
  Router::new()
    .route("/", get(service_info))
    .route("/health", get(health::<S>))
    .with_state(store.clone())
    .nest("/api", roster_api::api_router(store))
    .fallback(not_found)
    .layer(TraceLayer::new_for_http())
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn service_info() -> impl IntoResponse {
  Json(json!({
    "success": true,
    "message": "Student Management API is running",
    "version": SERVICE_VERSION,
    "endpoints": {
      "students": "/api/students",
      "health":   "/health",
    },
  }))
}

async fn health<S>(State(store): State<Arc<S>>) -> impl IntoResponse
where
  S: StudentStore,
{
  let timestamp = Utc::now().to_rfc3339();
  match store.ping().await {
    Ok(()) => (
      StatusCode::OK,
      Json(json!({
        "success":   true,
        "message":   "Database connection is healthy",
        "timestamp": timestamp,
      })),
    ),
    Err(e) => {
      tracing::error!(error = %e, "health check failed");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
          "success":   false,
          "message":   "Database connection failed",
          "timestamp": timestamp,
        })),
      )
    }
  }
}

async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
  (
    StatusCode::NOT_FOUND,
    Json(json!({
      "success": false,
      "message": "Route not found",
      "path":    uri.path(),
    })),
  )
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{body::Body, http::Request};
  use roster_core::{
    store::{StoreError, StoreErrorKind},
    student::{NewStudent, Student, StudentDetail, StudentPatch},
  };
  use roster_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  async fn app() -> Router {
    router(Arc::new(SqliteStore::open_in_memory().await.unwrap()))
  }

  /// A store whose database is unreachable.
  struct DownStore;

  #[derive(Debug)]
  struct Down;

  impl std::fmt::Display for Down {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.write_str("database unreachable")
    }
  }

  impl std::error::Error for Down {}

  impl StoreError for Down {
    fn kind(&self) -> StoreErrorKind { StoreErrorKind::Other }
  }

  impl StudentStore for DownStore {
    type Error = Down;

    async fn create_student(&self, _: NewStudent) -> Result<Student, Down> { Err(Down) }

    async fn list_students(&self, _: u64, _: u64) -> Result<Vec<Student>, Down> {
      Err(Down)
    }

    async fn count_students(&self) -> Result<u64, Down> { Err(Down) }

    async fn get_student(&self, _: i64) -> Result<Option<StudentDetail>, Down> {
      Err(Down)
    }

    async fn update_student(
      &self,
      _: i64,
      _: StudentPatch,
    ) -> Result<Option<Student>, Down> {
      Err(Down)
    }

    async fn delete_student(&self, _: i64) -> Result<Option<Student>, Down> {
      Err(Down)
    }

    async fn ping(&self) -> Result<(), Down> { Err(Down) }
  }

  #[tokio::test]
  async fn root_describes_the_service() {
    let (status, body) = get_json(app().await, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student Management API is running");
    assert_eq!(body["version"], SERVICE_VERSION);
    assert_eq!(body["endpoints"]["students"], "/api/students");
  }

  #[tokio::test]
  async fn health_is_ok_with_live_store() {
    let (status, body) = get_json(app().await, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Database connection is healthy");
    assert!(body["timestamp"].is_string());
  }

  #[tokio::test]
  async fn health_is_500_when_store_is_down() {
    let (status, body) = get_json(router(Arc::new(DownStore)), "/health").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Database connection failed");
  }

  #[tokio::test]
  async fn store_failure_is_a_generic_500() {
    let (status, body) =
      get_json(router(Arc::new(DownStore)), "/api/students").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["error"], "An error occurred");
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let (status, body) = get_json(app().await, "/api/students").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalRecords"], 0);
  }

  #[tokio::test]
  async fn unknown_route_is_json_404() {
    let (status, body) = get_json(app().await, "/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
    assert_eq!(body["path"], "/nowhere");
  }

  #[tokio::test]
  async fn unknown_api_route_is_json_404() {
    let (status, body) = get_json(app().await, "/api/courses").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/api/courses");
  }
}
