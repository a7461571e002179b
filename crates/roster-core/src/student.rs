//! Student records: the only entity the API creates, updates and deletes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantNames};

use crate::{Error, Result, mark::MarkDetail};

/// Country stored when a new student is created without one.
pub const DEFAULT_COUNTRY: &str = "India";

/// Wire and storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Enrolment status of a student.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  IntoStaticStr,
  VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StudentStatus {
  #[default]
  Active,
  Inactive,
  Graduated,
  Suspended,
}

impl StudentStatus {
  /// The lowercase string stored in the `status` column.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a stored or submitted status string.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
  }

  /// All accepted spellings, in declaration order.
  pub fn names() -> &'static [&'static str] { Self::VARIANTS }
}

// ─── Student ─────────────────────────────────────────────────────────────────

/// A stored student row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
  /// Assigned by the store; never reused.
  pub student_id:      i64,
  pub first_name:      String,
  pub last_name:       String,
  /// Normalised (trimmed, lower-cased); unique across all students.
  pub email:           String,
  pub phone:           Option<String>,
  pub date_of_birth:   NaiveDate,
  pub enrollment_date: NaiveDate,
  pub address:         Option<String>,
  pub city:            Option<String>,
  pub state:           Option<String>,
  pub postal_code:     Option<String>,
  pub country:         String,
  pub status:          StudentStatus,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl Student {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

// ─── NewStudent ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::StudentStore::create_student`].
///
/// `student_id`, `enrollment_date` and the timestamps are always set by the
/// store. `country` and `status` fall back to [`DEFAULT_COUNTRY`] and
/// [`StudentStatus::Active`] when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub phone:         Option<String>,
  pub date_of_birth: NaiveDate,
  pub address:       Option<String>,
  pub city:          Option<String>,
  pub state:         Option<String>,
  pub postal_code:   Option<String>,
  pub country:       Option<String>,
  pub status:        Option<StudentStatus>,
}

impl NewStudent {
  /// Convenience constructor with all optional fields unset.
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    email: impl Into<String>,
    date_of_birth: NaiveDate,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name: last_name.into(),
      email: email.into(),
      phone: None,
      date_of_birth,
      address: None,
      city: None,
      state: None,
      postal_code: None,
      country: None,
      status: None,
    }
  }

  /// The country that will be stored for this input.
  pub fn country_or_default(&self) -> &str {
    self.country.as_deref().unwrap_or(DEFAULT_COUNTRY)
  }

  /// The status that will be stored for this input.
  pub fn status_or_default(&self) -> StudentStatus {
    self.status.unwrap_or_default()
  }
}

// ─── StudentPatch ────────────────────────────────────────────────────────────

/// A partial update. `None` means "keep the stored value"; there is no way
/// to clear a field back to null through a patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub date_of_birth: Option<NaiveDate>,
  pub address:       Option<String>,
  pub city:          Option<String>,
  pub state:         Option<String>,
  pub postal_code:   Option<String>,
  pub country:       Option<String>,
  pub status:        Option<StudentStatus>,
}

impl StudentPatch {
  /// `true` if applying this patch would only refresh `updated_at`.
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

// ─── Detail view ─────────────────────────────────────────────────────────────

/// A student together with all of its marks: the read model behind
/// `GET /students/:id`. Serialises as the student's fields plus `marks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetail {
  #[serde(flatten)]
  pub student: Student,
  /// Newest exam first.
  pub marks:   Vec<MarkDetail>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_round_trips_through_strings() {
    for name in StudentStatus::names() {
      let status = StudentStatus::parse(name).unwrap();
      assert_eq!(status.as_str(), *name);
      assert_eq!(status.to_string(), *name);
    }
    assert_eq!(StudentStatus::default(), StudentStatus::Active);
  }

  #[test]
  fn unknown_status_is_rejected() {
    assert!(matches!(
      StudentStatus::parse("expelled"),
      Err(Error::UnknownStatus(s)) if s == "expelled"
    ));
  }

  #[test]
  fn status_serialises_lowercase() {
    let json = serde_json::to_string(&StudentStatus::Graduated).unwrap();
    assert_eq!(json, "\"graduated\"");
  }

  #[test]
  fn parse_date_requires_iso_format() {
    assert_eq!(
      parse_date("2001-02-03").unwrap(),
      NaiveDate::from_ymd_opt(2001, 2, 3).unwrap()
    );
    assert!(parse_date("03/02/2001").is_err());
    assert!(parse_date("2001-02-30").is_err());
  }

  #[test]
  fn new_student_defaults() {
    let dob = NaiveDate::from_ymd_opt(2004, 5, 6).unwrap();
    let input = NewStudent::new("Asha", "Rao", "asha@example.com", dob);
    assert_eq!(input.country_or_default(), "India");
    assert_eq!(input.status_or_default(), StudentStatus::Active);
  }

  #[test]
  fn empty_patch() {
    assert!(StudentPatch::default().is_empty());
    let patch = StudentPatch { city: Some("Pune".into()), ..Default::default() };
    assert!(!patch.is_empty());
  }
}
