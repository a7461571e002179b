//! The JSON envelope every HTTP response is wrapped in.
//!
//! ```json
//! { "success": true, "message": "...", "data": ..., "pagination": ... }
//! { "success": false, "message": "Validation failed", "errors": [...] }
//! ```

use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into() }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
  pub success:    bool,
  pub message:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data:       Option<T>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pagination: Option<Pagination>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub errors:     Option<Vec<FieldError>>,
  /// Short machine-oriented failure label, e.g. "Duplicate entry".
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error:      Option<String>,
}

impl<T> Envelope<T> {
  pub fn ok(message: impl Into<String>, data: T) -> Self {
    Self {
      success:    true,
      message:    message.into(),
      data:       Some(data),
      pagination: None,
      errors:     None,
      error:      None,
    }
  }

  pub fn with_pagination(mut self, pagination: Pagination) -> Self {
    self.pagination = Some(pagination);
    self
  }
}

impl Envelope<()> {
  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      success:    false,
      message:    message.into(),
      data:       None,
      pagination: None,
      errors:     None,
      error:      None,
    }
  }

  pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
    self.errors = Some(errors);
    self
  }

  pub fn with_error(mut self, error: impl Into<String>) -> Self {
    self.error = Some(error.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failure_omits_absent_members() {
    let json = serde_json::to_value(Envelope::failure("nope")).unwrap();
    assert_eq!(json, serde_json::json!({ "success": false, "message": "nope" }));
  }

  #[test]
  fn validation_failure_lists_fields() {
    let env = Envelope::failure("Validation failed")
      .with_errors(vec![FieldError::new("email", "Email is required")]);
    let json = serde_json::to_value(env).unwrap();
    assert_eq!(json["errors"][0]["field"], "email");
    assert_eq!(json["errors"][0]["message"], "Email is required");
  }

  #[test]
  fn failure_parses_into_any_payload_type() {
    let raw = r#"{"success":false,"message":"Student with ID 9 not found"}"#;
    let env: Envelope<Vec<u32>> = serde_json::from_str(raw).unwrap();
    assert!(!env.success);
    assert!(env.data.is_none());
  }
}
