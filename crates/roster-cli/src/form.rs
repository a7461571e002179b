//! Create/edit form state for a single student.

use std::collections::HashMap;

use roster_core::{
  envelope::FieldError,
  student::{DATE_FORMAT, Student},
};
use serde_json::Value;

use crate::client::StudentFields;

/// One editable input, keyed by its JSON field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
  pub key:      &'static str,
  pub label:    &'static str,
  pub required: bool,
}

pub const FIELDS: [FormField; 11] = [
  FormField { key: "first_name",    label: "First name",    required: true },
  FormField { key: "last_name",     label: "Last name",     required: true },
  FormField { key: "email",         label: "Email",         required: true },
  FormField { key: "phone",         label: "Phone",         required: false },
  FormField { key: "date_of_birth", label: "Date of birth", required: true },
  FormField { key: "address",       label: "Address",       required: false },
  FormField { key: "city",          label: "City",          required: false },
  FormField { key: "state",         label: "State",         required: false },
  FormField { key: "postal_code",   label: "Postal code",   required: false },
  FormField { key: "country",       label: "Country",       required: false },
  FormField { key: "status",        label: "Status",        required: false },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Edit(i64),
}

#[derive(Debug, Clone)]
pub struct StudentForm {
  pub mode:   FormMode,
  /// Index into [`FIELDS`] of the focused input.
  pub cursor: usize,
  values:     Vec<String>,
  original:   Vec<String>,
  errors:     HashMap<String, String>,
}

impl StudentForm {
  /// An empty form for a new student.
  pub fn create() -> Self {
    let blank = vec![String::new(); FIELDS.len()];
    Self {
      mode:     FormMode::Create,
      cursor:   0,
      values:   blank.clone(),
      original: blank,
      errors:   HashMap::new(),
    }
  }

  /// A form pre-filled with `student`'s current values.
  pub fn edit(student: &Student) -> Self {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    let values = vec![
      student.first_name.clone(),
      student.last_name.clone(),
      student.email.clone(),
      opt(&student.phone),
      student.date_of_birth.format(DATE_FORMAT).to_string(),
      opt(&student.address),
      opt(&student.city),
      opt(&student.state),
      opt(&student.postal_code),
      student.country.clone(),
      student.status.as_str().to_owned(),
    ];
    Self {
      mode:     FormMode::Edit(student.student_id),
      cursor:   0,
      original: values.clone(),
      values,
      errors:   HashMap::new(),
    }
  }

  pub fn title(&self) -> String {
    match self.mode {
      FormMode::Create => "New student".to_owned(),
      FormMode::Edit(id) => format!("Edit student #{id}"),
    }
  }

  pub fn value(&self, index: usize) -> &str {
    self.values.get(index).map(String::as_str).unwrap_or_default()
  }

  pub fn error(&self, key: &str) -> Option<&str> {
    self.errors.get(key).map(String::as_str)
  }

  // ── Editing ───────────────────────────────────────────────────────────────

  pub fn input(&mut self, c: char) {
    if let Some(v) = self.values.get_mut(self.cursor) {
      v.push(c);
    }
  }

  pub fn backspace(&mut self) {
    if let Some(v) = self.values.get_mut(self.cursor) {
      v.pop();
    }
  }

  pub fn next_field(&mut self) { self.cursor = (self.cursor + 1) % FIELDS.len(); }

  pub fn prev_field(&mut self) {
    self.cursor = (self.cursor + FIELDS.len() - 1) % FIELDS.len();
  }

  /// Replace the displayed errors with those from a failed submission.
  pub fn set_errors(&mut self, errors: &[FieldError]) {
    self.errors = errors
      .iter()
      .map(|e| (e.field.clone(), e.message.clone()))
      .collect();
    if let Some(first) = FIELDS.iter().position(|f| self.errors.contains_key(f.key)) {
      self.cursor = first;
    }
  }

  // ── Submission ────────────────────────────────────────────────────────────

  /// The request body for this form.
  ///
  /// A create sends every non-blank field. An edit sends only the non-blank
  /// fields whose value differs from what was loaded: the server reads a
  /// blank value as "unchanged", so a cleared field is left out.
  pub fn body(&self) -> StudentFields {
    FIELDS
      .iter()
      .zip(self.values.iter().zip(&self.original))
      .filter_map(|(field, (value, original))| {
        let value = value.trim();
        let include = match self.mode {
          FormMode::Create => !value.is_empty(),
          FormMode::Edit(_) => !value.is_empty() && value != original.trim(),
        };
        include.then(|| (field.key.to_owned(), Value::String(value.to_owned())))
      })
      .collect()
  }

  /// Labels of fields blanked during an edit. They keep their stored value.
  pub fn cleared_labels(&self) -> Vec<&'static str> {
    if self.mode == FormMode::Create {
      return Vec::new();
    }
    FIELDS
      .iter()
      .zip(self.values.iter().zip(&self.original))
      .filter(|(_, (value, original))| {
        value.trim().is_empty() && !original.trim().is_empty()
      })
      .map(|(field, _)| field.label)
      .collect()
  }
}
