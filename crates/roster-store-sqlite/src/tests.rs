//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use roster_core::{
  mark::{MarkResult, NewMark, NewSubject, Subject},
  store::{StoreError, StoreErrorKind, StudentStore},
  student::{NewStudent, StudentPatch, StudentStatus},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// Let the clock move so a refreshed timestamp is strictly later.
async fn tick() { tokio::time::sleep(std::time::Duration::from_millis(5)).await; }

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_student(email: &str) -> NewStudent {
  NewStudent::new("Asha", "Rao", email, date(2004, 5, 6))
}

fn full_student(email: &str) -> NewStudent {
  NewStudent {
    first_name:    "Vikram".into(),
    last_name:     "Menon".into(),
    email:         email.into(),
    phone:         Some("9876543210".into()),
    date_of_birth: date(2003, 11, 21),
    address:       Some("12 MG Road".into()),
    city:          Some("Bengaluru".into()),
    state:         Some("Karnataka".into()),
    postal_code:   Some("560001".into()),
    country:       Some("India".into()),
    status:        Some(StudentStatus::Graduated),
  }
}

async fn subject(s: &SqliteStore, code: &str, max: f64, passing: f64) -> Subject {
  s.add_subject(NewSubject {
    subject_code:  code.into(),
    subject_name:  format!("{code} name"),
    max_marks:     max,
    passing_marks: passing,
  })
  .await
  .unwrap()
}

fn mark(student_id: i64, subject_id: i64, obtained: f64, exam_date: NaiveDate) -> NewMark {
  NewMark {
    student_id,
    subject_id,
    marks_obtained: obtained,
    exam_date,
    exam_type: "final".into(),
    grade: None,
    remarks: None,
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_applies_defaults() {
  let s = store().await;
  let input = new_student("asha@example.com");

  let created = s.create_student(input.clone()).await.unwrap();

  assert!(created.student_id > 0);
  assert_eq!(created.first_name, input.first_name);
  assert_eq!(created.last_name, input.last_name);
  assert_eq!(created.email, input.email);
  assert_eq!(created.date_of_birth, input.date_of_birth);
  assert_eq!(created.phone, None);
  assert_eq!(created.city, None);
  assert_eq!(created.country, "India");
  assert_eq!(created.status, StudentStatus::Active);
  assert_eq!(created.created_at, created.updated_at);
  assert_eq!(created.enrollment_date, created.created_at.date_naive());
}

#[tokio::test]
async fn create_keeps_every_supplied_field() {
  let s = store().await;
  let input = full_student("vikram@example.com");

  let created = s.create_student(input.clone()).await.unwrap();

  assert_eq!(created.phone, input.phone);
  assert_eq!(created.address, input.address);
  assert_eq!(created.city, input.city);
  assert_eq!(created.state, input.state);
  assert_eq!(created.postal_code, input.postal_code);
  assert_eq!(Some(created.country), input.country);
  assert_eq!(Some(created.status), input.status);
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() {
  let s = store().await;
  s.create_student(new_student("dup@example.com")).await.unwrap();

  let err = s
    .create_student(new_student("dup@example.com"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::UniqueViolation);

  assert_eq!(s.count_students().await.unwrap(), 1);
}

#[tokio::test]
async fn email_uniqueness_ignores_case() {
  let s = store().await;
  s.create_student(new_student("case@example.com")).await.unwrap();

  let err = s
    .create_student(new_student("CASE@example.com"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::UniqueViolation);
}

// ─── List / count ────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_newest_first_and_paged() {
  let s = store().await;
  for i in 0..15 {
    s.create_student(new_student(&format!("s{i}@example.com")))
      .await
      .unwrap();
  }

  let first = s.list_students(10, 0).await.unwrap();
  assert_eq!(first.len(), 10);
  assert!(
    first.windows(2).all(|w| w[0].student_id > w[1].student_id),
    "not ordered by descending id"
  );
  assert_eq!(first[0].email, "s14@example.com");

  let second = s.list_students(10, 10).await.unwrap();
  assert_eq!(second.len(), 5);
  assert_eq!(second.last().unwrap().email, "s0@example.com");

  assert_eq!(s.count_students().await.unwrap(), 15);
}

#[tokio::test]
async fn list_past_the_end_is_empty() {
  let s = store().await;
  s.create_student(new_student("only@example.com")).await.unwrap();
  assert!(s.list_students(10, 10).await.unwrap().is_empty());
}

// ─── Get ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get_student(42).await.unwrap().is_none());
}

#[tokio::test]
async fn get_without_marks_has_empty_list() {
  let s = store().await;
  let created = s.create_student(new_student("nomarks@example.com")).await.unwrap();

  let detail = s.get_student(created.student_id).await.unwrap().unwrap();
  assert_eq!(detail.student, created);
  assert!(detail.marks.is_empty());
}

#[tokio::test]
async fn get_joins_marks_newest_exam_first() {
  let s = store().await;
  let student = s.create_student(new_student("marks@example.com")).await.unwrap();
  let other = s.create_student(new_student("other@example.com")).await.unwrap();
  let maths = subject(&s, "MATH101", 50.0, 40.0).await;
  let physics = subject(&s, "PHY101", 100.0, 35.0).await;

  s.record_mark(mark(student.student_id, maths.subject_id, 45.0, date(2024, 1, 10)))
    .await
    .unwrap();
  s.record_mark(mark(student.student_id, physics.subject_id, 30.0, date(2024, 3, 15)))
    .await
    .unwrap();
  s.record_mark(mark(student.student_id, maths.subject_id, 20.0, date(2023, 12, 1)))
    .await
    .unwrap();
  s.record_mark(mark(other.student_id, maths.subject_id, 50.0, date(2024, 6, 1)))
    .await
    .unwrap();

  let detail = s.get_student(student.student_id).await.unwrap().unwrap();
  assert_eq!(detail.marks.len(), 3);

  let dates: Vec<_> = detail.marks.iter().map(|m| m.exam_date).collect();
  assert_eq!(dates, vec![date(2024, 3, 15), date(2024, 1, 10), date(2023, 12, 1)]);

  let physics_mark = &detail.marks[0];
  assert_eq!(physics_mark.subject_code, "PHY101");
  assert_eq!(physics_mark.percentage, 30.0);
  assert_eq!(physics_mark.result, MarkResult::Fail);

  let maths_mark = &detail.marks[1];
  assert_eq!(maths_mark.subject_code, "MATH101");
  assert_eq!(maths_mark.max_marks, 50.0);
  assert_eq!(maths_mark.passing_marks, 40.0);
  assert_eq!(maths_mark.percentage, 90.0);
  assert_eq!(maths_mark.result, MarkResult::Pass);

  assert_eq!(detail.marks[2].percentage, 40.0);
  assert_eq!(detail.marks[2].result, MarkResult::Fail);
}

#[tokio::test]
async fn mark_for_unknown_subject_is_a_foreign_key_violation() {
  let s = store().await;
  let student = s.create_student(new_student("fk@example.com")).await.unwrap();

  let err = s
    .record_mark(mark(student.student_id, 999, 10.0, date(2024, 1, 1)))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::ForeignKeyViolation);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_changes_only_patched_fields() {
  let s = store().await;
  let before = s.create_student(full_student("patch@example.com")).await.unwrap();
  tick().await;

  let patch = StudentPatch { city: Some("Pune".into()), ..Default::default() };
  let after = s
    .update_student(before.student_id, patch)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(after.city.as_deref(), Some("Pune"));
  assert!(after.updated_at > before.updated_at);
  assert_eq!(after.created_at, before.created_at);

  // Everything else is untouched.
  let expected = roster_core::student::Student {
    city: after.city.clone(),
    updated_at: after.updated_at,
    ..before
  };
  assert_eq!(after, expected);
}

#[tokio::test]
async fn update_status_and_date_of_birth() {
  let s = store().await;
  let before = s.create_student(new_student("status@example.com")).await.unwrap();

  let patch = StudentPatch {
    status: Some(StudentStatus::Suspended),
    date_of_birth: Some(date(2000, 1, 1)),
    ..Default::default()
  };
  let after = s
    .update_student(before.student_id, patch)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(after.status, StudentStatus::Suspended);
  assert_eq!(after.date_of_birth, date(2000, 1, 1));
  assert_eq!(after.email, before.email);
}

#[tokio::test]
async fn empty_patch_only_touches_updated_at() {
  let s = store().await;
  let before = s.create_student(new_student("noop@example.com")).await.unwrap();
  tick().await;

  let after = s
    .update_student(before.student_id, StudentPatch::default())
    .await
    .unwrap()
    .unwrap();

  assert_eq!(after.first_name, before.first_name);
  assert_eq!(after.country, before.country);
  assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;
  let patch = StudentPatch { city: Some("Pune".into()), ..Default::default() };
  assert!(s.update_student(7, patch).await.unwrap().is_none());
}

#[tokio::test]
async fn update_to_taken_email_is_a_unique_violation() {
  let s = store().await;
  s.create_student(new_student("taken@example.com")).await.unwrap();
  let other = s.create_student(new_student("free@example.com")).await.unwrap();

  let patch = StudentPatch {
    email: Some("taken@example.com".into()),
    ..Default::default()
  };
  let err = s
    .update_student(other.student_id, patch)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::UniqueViolation);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_returns_prior_row_then_get_is_none() {
  let s = store().await;
  let created = s.create_student(new_student("gone@example.com")).await.unwrap();

  let deleted = s.delete_student(created.student_id).await.unwrap().unwrap();
  assert_eq!(deleted, created);

  assert!(s.get_student(created.student_id).await.unwrap().is_none());
  assert_eq!(s.count_students().await.unwrap(), 0);
}

#[tokio::test]
async fn delete_missing_returns_none() {
  let s = store().await;
  assert!(s.delete_student(3).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_cascades_to_marks() {
  let s = store().await;
  let student = s.create_student(new_student("cascade@example.com")).await.unwrap();
  let maths = subject(&s, "MATH101", 50.0, 40.0).await;
  s.record_mark(mark(student.student_id, maths.subject_id, 45.0, date(2024, 1, 10)))
    .await
    .unwrap();

  s.delete_student(student.student_id).await.unwrap().unwrap();

  // The id is never reused, and the mark went with its student.
  let again = s.create_student(new_student("cascade@example.com")).await.unwrap();
  assert!(again.student_id > student.student_id);
  let detail = s.get_student(again.student_id).await.unwrap().unwrap();
  assert!(detail.marks.is_empty());
}

#[tokio::test]
async fn ping_succeeds_on_open_store() {
  let s = store().await;
  s.ping().await.unwrap();
}
