//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and calendar dates as
//! `YYYY-MM-DD`. Statuses use their lowercase names.

use chrono::{DateTime, NaiveDate, Utc};
use roster_core::{
  mark::{Mark, MarkDetail, Subject},
  student::{DATE_FORMAT, Student, StudentStatus, parse_date},
};

use crate::{Error, Result};

/// Column list shared by every statement that returns a student row. Must
/// stay in step with [`RawStudent::from_row`].
pub const STUDENT_COLUMNS: &str = "student_id, first_name, last_name, email, \
  phone, date_of_birth, enrollment_date, address, city, state, postal_code, \
  country, status, created_at, updated_at";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> { Ok(parse_date(s)?) }

// ─── StudentStatus ───────────────────────────────────────────────────────────

pub fn encode_status(s: StudentStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<StudentStatus> {
  Ok(StudentStatus::parse(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `students` row.
pub struct RawStudent {
  pub student_id:      i64,
  pub first_name:      String,
  pub last_name:       String,
  pub email:           String,
  pub phone:           Option<String>,
  pub date_of_birth:   String,
  pub enrollment_date: String,
  pub address:         Option<String>,
  pub city:            Option<String>,
  pub state:           Option<String>,
  pub postal_code:     Option<String>,
  pub country:         String,
  pub status:          String,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawStudent {
  /// Read a row selected with [`STUDENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id:      row.get(0)?,
      first_name:      row.get(1)?,
      last_name:       row.get(2)?,
      email:           row.get(3)?,
      phone:           row.get(4)?,
      date_of_birth:   row.get(5)?,
      enrollment_date: row.get(6)?,
      address:         row.get(7)?,
      city:            row.get(8)?,
      state:           row.get(9)?,
      postal_code:     row.get(10)?,
      country:         row.get(11)?,
      status:          row.get(12)?,
      created_at:      row.get(13)?,
      updated_at:      row.get(14)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      student_id:      self.student_id,
      first_name:      self.first_name,
      last_name:       self.last_name,
      email:           self.email,
      phone:           self.phone,
      date_of_birth:   decode_date(&self.date_of_birth)?,
      enrollment_date: decode_date(&self.enrollment_date)?,
      address:         self.address,
      city:            self.city,
      state:           self.state,
      postal_code:     self.postal_code,
      country:         self.country,
      status:          decode_status(&self.status)?,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values from a `marks` row joined with its `subjects` row.
pub struct RawMarkDetail {
  // marks columns
  pub mark_id:        i64,
  pub student_id:     i64,
  pub marks_obtained: f64,
  pub exam_date:      String,
  pub exam_type:      String,
  pub grade:          Option<String>,
  pub remarks:        Option<String>,
  // subjects join
  pub subject_id:     i64,
  pub subject_code:   String,
  pub subject_name:   String,
  pub max_marks:      f64,
  pub passing_marks:  f64,
}

impl RawMarkDetail {
  pub fn into_detail(self) -> Result<MarkDetail> {
    let subject = Subject {
      subject_id:    self.subject_id,
      subject_code:  self.subject_code,
      subject_name:  self.subject_name,
      max_marks:     self.max_marks,
      passing_marks: self.passing_marks,
    };
    let mark = Mark {
      mark_id:        self.mark_id,
      student_id:     self.student_id,
      subject_id:     self.subject_id,
      marks_obtained: self.marks_obtained,
      exam_date:      decode_date(&self.exam_date)?,
      exam_type:      self.exam_type,
      grade:          self.grade,
      remarks:        self.remarks,
    };
    Ok(MarkDetail::new(mark, &subject))
  }
}

/// Raw values read directly from a `marks` row.
pub struct RawMark {
  pub mark_id:        i64,
  pub student_id:     i64,
  pub subject_id:     i64,
  pub marks_obtained: f64,
  pub exam_date:      String,
  pub exam_type:      String,
  pub grade:          Option<String>,
  pub remarks:        Option<String>,
}

impl RawMark {
  pub fn into_mark(self) -> Result<Mark> {
    Ok(Mark {
      mark_id:        self.mark_id,
      student_id:     self.student_id,
      subject_id:     self.subject_id,
      marks_obtained: self.marks_obtained,
      exam_date:      decode_date(&self.exam_date)?,
      exam_type:      self.exam_type,
      grade:          self.grade,
      remarks:        self.remarks,
    })
  }
}
