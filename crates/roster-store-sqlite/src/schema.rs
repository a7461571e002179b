//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- AUTOINCREMENT keeps ids monotonic, so `ORDER BY student_id DESC` lists the
-- most recently created students first even after deletions.
CREATE TABLE IF NOT EXISTS students (
    student_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name      TEXT NOT NULL,
    last_name       TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE COLLATE NOCASE,
    phone           TEXT,
    date_of_birth   TEXT NOT NULL,   -- YYYY-MM-DD
    enrollment_date TEXT NOT NULL,   -- YYYY-MM-DD; server-assigned
    address         TEXT,
    city            TEXT,
    state           TEXT,
    postal_code     TEXT,
    country         TEXT NOT NULL DEFAULT 'India',
    status          TEXT NOT NULL DEFAULT 'active'
                    CHECK (status IN ('active', 'inactive', 'graduated', 'suspended')),
    created_at      TEXT NOT NULL,   -- RFC 3339 UTC
    updated_at      TEXT NOT NULL    -- RFC 3339 UTC
);

-- Reference data; never written through the API.
CREATE TABLE IF NOT EXISTS subjects (
    subject_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_code  TEXT NOT NULL UNIQUE,
    subject_name  TEXT NOT NULL,
    max_marks     REAL NOT NULL CHECK (max_marks > 0),
    passing_marks REAL NOT NULL CHECK (passing_marks >= 0 AND passing_marks <= max_marks)
);

-- Exam results; removed together with their student.
CREATE TABLE IF NOT EXISTS marks (
    mark_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id     INTEGER NOT NULL REFERENCES students(student_id) ON DELETE CASCADE,
    subject_id     INTEGER NOT NULL REFERENCES subjects(subject_id),
    marks_obtained REAL NOT NULL CHECK (marks_obtained >= 0),
    exam_date      TEXT NOT NULL,    -- YYYY-MM-DD
    exam_type      TEXT NOT NULL,
    grade          TEXT,
    remarks        TEXT
);

CREATE INDEX IF NOT EXISTS marks_student_idx ON marks(student_id, exam_date);

PRAGMA user_version = 1;
";
