//! Subjects, exam marks, and the grade figures derived from them.
//!
//! Marks and subjects are reference data as far as the API is concerned: they
//! are only ever read, joined onto a student's detail view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A course and its grading thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
  pub subject_id:    i64,
  pub subject_code:  String,
  pub subject_name:  String,
  pub max_marks:     f64,
  pub passing_marks: f64,
}

/// Outcome of a single exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkResult {
  Pass,
  Fail,
}

impl MarkResult {
  /// `Pass` when `obtained` reaches the passing threshold.
  pub fn evaluate(obtained: f64, passing: f64) -> Self {
    if obtained >= passing { Self::Pass } else { Self::Fail }
  }

  pub fn is_pass(self) -> bool { self == Self::Pass }
}

/// `obtained / max * 100`, rounded to two decimal places.
///
/// Returns `0.0` for a non-positive `max`; the schema rejects such subjects
/// but the function is total.
pub fn percentage(obtained: f64, max: f64) -> f64 {
  if max <= 0.0 {
    return 0.0;
  }
  (obtained / max * 10_000.0).round() / 100.0
}

/// One exam result enriched with its subject and the derived figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDetail {
  pub mark_id:        i64,
  pub marks_obtained: f64,
  pub exam_date:      NaiveDate,
  /// Free text, e.g. "midterm" or "final".
  pub exam_type:      String,
  pub grade:          Option<String>,
  pub remarks:        Option<String>,
  pub subject_id:     i64,
  pub subject_code:   String,
  pub subject_name:   String,
  pub max_marks:      f64,
  pub passing_marks:  f64,
  pub percentage:     f64,
  pub result:         MarkResult,
}

/// A stored mark row before it is joined with its subject.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
  pub mark_id:        i64,
  pub student_id:     i64,
  pub subject_id:     i64,
  pub marks_obtained: f64,
  pub exam_date:      NaiveDate,
  pub exam_type:      String,
  pub grade:          Option<String>,
  pub remarks:        Option<String>,
}

/// Input to the store's subject fixture helper.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubject {
  pub subject_code:  String,
  pub subject_name:  String,
  pub max_marks:     f64,
  pub passing_marks: f64,
}

/// Input to the store's mark fixture helper.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMark {
  pub student_id:     i64,
  pub subject_id:     i64,
  pub marks_obtained: f64,
  pub exam_date:      NaiveDate,
  pub exam_type:      String,
  pub grade:          Option<String>,
  pub remarks:        Option<String>,
}

impl MarkDetail {
  /// Join a mark with its subject and compute `percentage` and `result`.
  pub fn new(mark: Mark, subject: &Subject) -> Self {
    Self {
      mark_id:        mark.mark_id,
      marks_obtained: mark.marks_obtained,
      exam_date:      mark.exam_date,
      exam_type:      mark.exam_type,
      grade:          mark.grade,
      remarks:        mark.remarks,
      subject_id:     subject.subject_id,
      subject_code:   subject.subject_code.clone(),
      subject_name:   subject.subject_name.clone(),
      max_marks:      subject.max_marks,
      passing_marks:  subject.passing_marks,
      percentage:     percentage(mark.marks_obtained, subject.max_marks),
      result:         MarkResult::evaluate(
        mark.marks_obtained,
        subject.passing_marks,
      ),
    }
  }
}
