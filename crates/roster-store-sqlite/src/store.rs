//! [`SqliteStore`]: the SQLite implementation of [`StudentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use roster_core::{
  mark::{Mark, NewMark, NewSubject, Subject},
  store::StudentStore,
  student::{NewStudent, Student, StudentDetail, StudentPatch},
};

use crate::{
  Result,
  encode::{
    RawMark, RawMarkDetail, RawStudent, STUDENT_COLUMNS, encode_date, encode_dt,
    encode_status,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A student-records store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reference data ────────────────────────────────────────────────────────
  //
  // Subjects and marks have no HTTP write path; these helpers exist for
  // fixtures and tests.

  /// Insert a subject and return the stored row.
  pub async fn add_subject(&self, input: NewSubject) -> Result<Subject> {
    let NewSubject { subject_code, subject_name, max_marks, passing_marks } =
      input;

    let subject = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO subjects (subject_code, subject_name, max_marks, passing_marks)
           VALUES (?1, ?2, ?3, ?4)
           RETURNING subject_id, subject_code, subject_name, max_marks, passing_marks",
          rusqlite::params![subject_code, subject_name, max_marks, passing_marks],
          |row| {
            Ok(Subject {
              subject_id:    row.get(0)?,
              subject_code:  row.get(1)?,
              subject_name:  row.get(2)?,
              max_marks:     row.get(3)?,
              passing_marks: row.get(4)?,
            })
          },
        )?)
      })
      .await?;

    Ok(subject)
  }

  /// Record an exam mark for an existing student and subject.
  pub async fn record_mark(&self, input: NewMark) -> Result<Mark> {
    let exam_date_str = encode_date(input.exam_date);
    let NewMark {
      student_id,
      subject_id,
      marks_obtained,
      exam_type,
      grade,
      remarks,
      ..
    } = input;

    let raw: RawMark = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO marks (
             student_id, subject_id, marks_obtained, exam_date, exam_type,
             grade, remarks
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           RETURNING mark_id, student_id, subject_id, marks_obtained,
                     exam_date, exam_type, grade, remarks",
          rusqlite::params![
            student_id,
            subject_id,
            marks_obtained,
            exam_date_str,
            exam_type,
            grade,
            remarks,
          ],
          |row| {
            Ok(RawMark {
              mark_id:        row.get(0)?,
              student_id:     row.get(1)?,
              subject_id:     row.get(2)?,
              marks_obtained: row.get(3)?,
              exam_date:      row.get(4)?,
              exam_type:      row.get(5)?,
              grade:          row.get(6)?,
              remarks:        row.get(7)?,
            })
          },
        )?)
      })
      .await?;

    raw.into_mark()
  }
}

// ─── StudentStore impl ───────────────────────────────────────────────────────

impl StudentStore for SqliteStore {
  type Error = crate::Error;

  async fn create_student(&self, input: NewStudent) -> Result<Student> {
    let now                 = Utc::now();
    let now_str             = encode_dt(now);
    let enrollment_date_str = encode_date(now.date_naive());
    let dob_str             = encode_date(input.date_of_birth);
    let country             = input.country_or_default().to_owned();
    let status_str          = encode_status(input.status_or_default());
    let NewStudent {
      first_name,
      last_name,
      email,
      phone,
      address,
      city,
      state,
      postal_code,
      ..
    } = input;

    let raw: RawStudent = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO students (
               first_name, last_name, email, phone, date_of_birth,
               enrollment_date, address, city, state, postal_code,
               country, status, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
             RETURNING {STUDENT_COLUMNS}"
          ),
          rusqlite::params![
            first_name,
            last_name,
            email,
            phone,
            dob_str,
            enrollment_date_str,
            address,
            city,
            state,
            postal_code,
            country,
            status_str,
            now_str,
          ],
          RawStudent::from_row,
        )?)
      })
      .await?;

    raw.into_student()
  }

  async fn list_students(&self, limit: u64, offset: u64) -> Result<Vec<Student>> {
    let limit_val  = i64::try_from(limit).unwrap_or(i64::MAX);
    let offset_val = i64::try_from(offset).unwrap_or(i64::MAX);

    let raws: Vec<RawStudent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLUMNS}
           FROM students
           ORDER BY student_id DESC
           LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val, offset_val], RawStudent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn count_students(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?)
      })
      .await?;

    Ok(u64::try_from(count).unwrap_or_default())
  }

  async fn get_student(&self, id: i64) -> Result<Option<StudentDetail>> {
    let found: Option<(RawStudent, Vec<RawMarkDetail>)> = self
      .conn
      .call(move |conn| {
        let student = conn
          .query_row(
            &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1"),
            rusqlite::params![id],
            RawStudent::from_row,
          )
          .optional()?;

        let Some(student) = student else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(
          "SELECT
             m.mark_id, m.student_id, m.marks_obtained, m.exam_date,
             m.exam_type, m.grade, m.remarks,
             s.subject_id, s.subject_code, s.subject_name,
             s.max_marks, s.passing_marks
           FROM marks m
           INNER JOIN subjects s ON s.subject_id = m.subject_id
           WHERE m.student_id = ?1
           ORDER BY m.exam_date DESC, m.mark_id DESC",
        )?;

        let marks = stmt
          .query_map(rusqlite::params![id], |row| {
            Ok(RawMarkDetail {
              mark_id:        row.get(0)?,
              student_id:     row.get(1)?,
              marks_obtained: row.get(2)?,
              exam_date:      row.get(3)?,
              exam_type:      row.get(4)?,
              grade:          row.get(5)?,
              remarks:        row.get(6)?,
              subject_id:     row.get(7)?,
              subject_code:   row.get(8)?,
              subject_name:   row.get(9)?,
              max_marks:      row.get(10)?,
              passing_marks:  row.get(11)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((student, marks)))
      })
      .await?;

    let Some((raw_student, raw_marks)) = found else {
      return Ok(None);
    };

    Ok(Some(StudentDetail {
      student: raw_student.into_student()?,
      marks:   raw_marks
        .into_iter()
        .map(RawMarkDetail::into_detail)
        .collect::<Result<_>>()?,
    }))
  }

  async fn update_student(
    &self,
    id:    i64,
    patch: StudentPatch,
  ) -> Result<Option<Student>> {
    let now_str    = encode_dt(Utc::now());
    let dob_str    = patch.date_of_birth.map(encode_date);
    let status_str = patch.status.map(encode_status);
    let StudentPatch {
      first_name,
      last_name,
      email,
      phone,
      address,
      city,
      state,
      postal_code,
      country,
      ..
    } = patch;

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE students SET
                   first_name    = COALESCE(?1,  first_name),
                   last_name     = COALESCE(?2,  last_name),
                   email         = COALESCE(?3,  email),
                   phone         = COALESCE(?4,  phone),
                   date_of_birth = COALESCE(?5,  date_of_birth),
                   address       = COALESCE(?6,  address),
                   city          = COALESCE(?7,  city),
                   state         = COALESCE(?8,  state),
                   postal_code   = COALESCE(?9,  postal_code),
                   country       = COALESCE(?10, country),
                   status        = COALESCE(?11, status),
                   updated_at    = ?12
                 WHERE student_id = ?13
                 RETURNING {STUDENT_COLUMNS}"
              ),
              rusqlite::params![
                first_name,
                last_name,
                email,
                phone,
                dob_str,
                address,
                city,
                state,
                postal_code,
                country,
                status_str,
                now_str,
                id,
              ],
              RawStudent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn delete_student(&self, id: i64) -> Result<Option<Student>> {
    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "DELETE FROM students WHERE student_id = ?1 RETURNING {STUDENT_COLUMNS}"
              ),
              rusqlite::params![id],
              RawStudent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
