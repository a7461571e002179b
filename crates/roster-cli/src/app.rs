//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use roster_core::{
  pagination::{DEFAULT_PAGE, Pagination},
  student::{Student, StudentDetail},
};

use crate::{
  client::{ApiClient, ClientError},
  form::{FormMode, StudentForm},
};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the student table; the right pane previews the last opened
  /// student.
  List,
  /// Focus on the detail pane.
  Detail,
  /// Create or edit form.
  Form,
  /// Waiting for y/n before a delete.
  ConfirmDelete,
}

/// The student a delete is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
  pub id:   i64,
  pub name: String,
  /// Screen to return to if the delete is cancelled.
  from:     Screen,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,

  /// Students on the current page, as returned by the API.
  pub students: Vec<Student>,

  /// Pagination block from the last list response.
  pub pagination: Option<Pagination>,

  /// 1-based page currently shown.
  pub page: u64,

  /// Page size sent with every list request.
  pub limit: u64,

  /// Current fuzzy-filter string (only active when `filter_active`).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* student list.
  pub list_cursor: usize,

  /// The student opened in the detail pane, with marks.
  pub detail: Option<StudentDetail>,

  /// Scroll offset within the marks list.
  pub detail_scroll: usize,

  pub form: Option<StudentForm>,

  /// Screen to return to when the form is closed.
  form_return: Screen,

  pub pending_delete: Option<PendingDelete>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient, limit: u64) -> Self {
    Self {
      screen: Screen::List,
      students: Vec::new(),
      pagination: None,
      page: DEFAULT_PAGE,
      limit,
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      detail: None,
      detail_scroll: 0,
      form: None,
      form_return: Screen::List,
      pending_delete: None,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch `self.page` and replace the visible students.
  pub async fn load_page(&mut self) -> Result<(), ClientError> {
    match self.client.list_students(self.page, self.limit).await {
      Ok((students, pagination)) => {
        self.students = students;
        self.pagination = Some(pagination);
        let len = self.filtered_students().len();
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
        Ok(())
      }
      Err(e) => {
        tracing::warn!(error = %e, page = self.page, "failed to load page");
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  /// Re-fetch the current page after a mutation, stepping back one page if
  /// the current one is now empty.
  async fn reload(&mut self) -> Result<(), ClientError> {
    self.load_page().await?;
    if self.students.is_empty() && self.page > DEFAULT_PAGE {
      self.page -= 1;
      self.list_cursor = 0;
      self.load_page().await?;
    }
    Ok(())
  }

  /// Reload, then show `outcome`, followed by the refresh error if there was one.
  async fn reload_and_report(&mut self, outcome: String) {
    self.status_msg = match self.reload().await {
      Ok(()) => outcome,
      Err(e) => format!("{outcome} (list refresh failed: {e})"),
    };
  }

  async fn go_to_page(&mut self, page: u64) {
    let previous = self.page;
    self.page = page;
    self.list_cursor = 0;
    if self.load_page().await.is_err() {
      self.page = previous;
    } else {
      self.status_msg.clear();
    }
  }

  pub fn has_next_page(&self) -> bool {
    self.pagination.is_some_and(|p| p.has_next_page)
  }

  pub fn has_previous_page(&self) -> bool {
    self.pagination.is_some_and(|p| p.has_previous_page)
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Students on this page that match the current filter query.
  pub fn filtered_students(&self) -> Vec<&Student> {
    if self.filter.is_empty() {
      return self.students.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .students
      .iter()
      .filter(|s| {
        matcher.fuzzy_match(&s.full_name(), &self.filter).is_some()
          || matcher.fuzzy_match(&s.email, &self.filter).is_some()
          || matcher
            .fuzzy_match(&s.student_id.to_string(), &self.filter)
            .is_some()
      })
      .collect()
  }

  /// The student under the list cursor in the filtered view, if any.
  pub fn cursor_student(&self) -> Option<&Student> {
    self.filtered_students().get(self.list_cursor).copied()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.filter_active {
      return self.handle_filter_key(key).await;
    }

    match self.screen {
      Screen::List => self.handle_list_key(key).await,
      Screen::Detail => self.handle_detail_key(key).await,
      Screen::Form => self.handle_form_key(key).await,
      Screen::ConfirmDelete => self.handle_confirm_key(key).await,
    }
  }

  async fn handle_filter_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
        let only = match self.filtered_students().as_slice() {
          [one] => Some(one.student_id),
          _ => None,
        };
        if let Some(id) = only {
          self.open_detail(id).await;
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_students().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Right | KeyCode::Char('n') => {
        if self.has_next_page() {
          self.go_to_page(self.page + 1).await;
        }
      }
      KeyCode::Left | KeyCode::Char('p') => {
        if self.has_previous_page() {
          self.go_to_page(self.page - 1).await;
        }
      }

      KeyCode::Enter | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_student().map(|s| s.student_id) {
          self.open_detail(id).await;
        }
      }

      KeyCode::Char('a') => self.open_form(StudentForm::create()),
      KeyCode::Char('e') => {
        if let Some(form) = self.cursor_student().map(StudentForm::edit) {
          self.open_form(form);
        }
      }
      KeyCode::Char('d') => {
        if let Some(s) = self.cursor_student() {
          let (id, name) = (s.student_id, s.full_name());
          self.confirm_delete(id, name);
        }
      }

      KeyCode::Char('r') => {
        if self.load_page().await.is_ok() {
          self.status_msg = "Refreshed".into();
        }
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let marks = self.detail.as_ref().map_or(0, |d| d.marks.len());
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Char('h') => {
        self.screen = Screen::List;
      }

      KeyCode::Down | KeyCode::Char('j') => {
        if self.detail_scroll + 1 < marks {
          self.detail_scroll += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }

      KeyCode::Char('e') => {
        if let Some(form) = self.detail.as_ref().map(|d| StudentForm::edit(&d.student)) {
          self.open_form(form);
        }
      }
      KeyCode::Char('d') => {
        if let Some(s) = self.detail.as_ref().map(|d| &d.student) {
          let (id, name) = (s.student_id, s.full_name());
          self.confirm_delete(id, name);
        }
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_form_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let Some(form) = self.form.as_mut() else {
      self.screen = Screen::List;
      return Ok(true);
    };
    match key.code {
      KeyCode::Esc => {
        self.form = None;
        self.screen = self.form_return;
        self.status_msg = "Cancelled".into();
      }
      KeyCode::Tab | KeyCode::Down => form.next_field(),
      KeyCode::BackTab | KeyCode::Up => form.prev_field(),
      KeyCode::Backspace => form.backspace(),
      KeyCode::Enter => self.submit_form().await,
      KeyCode::Char(c) => form.input(c),
      _ => {}
    }
    Ok(true)
  }

  async fn handle_confirm_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => self.delete_pending().await,
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
        if let Some(pending) = self.pending_delete.take() {
          self.screen = pending.from;
        }
        self.status_msg = "Delete cancelled".into();
      }
      _ => {}
    }
    Ok(true)
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  async fn open_detail(&mut self, id: i64) {
    self.status_msg = "Loading…".into();
    match self.client.get_student(id).await {
      Ok(detail) => {
        self.detail = Some(detail);
        self.detail_scroll = 0;
        self.screen = Screen::Detail;
        self.status_msg.clear();
      }
      Err(e) => {
        tracing::warn!(error = %e, student_id = id, "failed to load student");
        if e.is_not_found() {
          self.reload_and_report(format!("Error: {e}")).await;
        } else {
          self.status_msg = format!("Error: {e}");
        }
      }
    }
  }

  fn open_form(&mut self, form: StudentForm) {
    self.form_return = self.screen;
    self.form = Some(form);
    self.screen = Screen::Form;
    self.status_msg.clear();
  }

  fn confirm_delete(&mut self, id: i64, name: String) {
    self.pending_delete = Some(PendingDelete { id, name, from: self.screen });
    self.screen = Screen::ConfirmDelete;
  }

  async fn submit_form(&mut self) {
    let Some(form) = self.form.as_ref() else { return };
    let body = form.body();
    let cleared = form.cleared_labels().join(", ");

    let result = match form.mode {
      FormMode::Create => self.client.create_student(&body).await,
      FormMode::Edit(_) if body.is_empty() => {
        self.status_msg = if cleared.is_empty() {
          "No changes to save".into()
        } else {
          format!("No changes to save ({cleared} cannot be cleared)")
        };
        return;
      }
      FormMode::Edit(id) => self.client.update_student(id, &body).await,
    };

    match result {
      Ok(student) => {
        let verb = match form.mode {
          FormMode::Create => "created",
          FormMode::Edit(_) => "updated",
        };
        tracing::info!(student_id = student.student_id, "student {verb}");
        let edited_open = self
          .detail
          .as_ref()
          .is_some_and(|d| d.student.student_id == student.student_id);

        self.form = None;
        self.screen = self.form_return;
        if edited_open {
          self.refresh_detail(student.student_id).await;
        }
        let mut outcome = format!("Student {verb}: {}", student.full_name());
        if !cleared.is_empty() {
          outcome.push_str(&format!("; {cleared} kept, fields cannot be cleared"));
        }
        self.reload_and_report(outcome).await;
      }
      Err(e) => {
        if let Some(form) = self.form.as_mut() {
          form.set_errors(e.field_errors());
        }
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  async fn refresh_detail(&mut self, id: i64) {
    if let Ok(detail) = self.client.get_student(id).await {
      self.detail = Some(detail);
    }
  }

  async fn delete_pending(&mut self) {
    let Some(pending) = self.pending_delete.take() else {
      self.screen = Screen::List;
      return;
    };
    match self.client.delete_student(pending.id).await {
      Ok(student) => {
        tracing::info!(student_id = student.student_id, "student deleted");
        if self.detail.as_ref().is_some_and(|d| d.student.student_id == pending.id) {
          self.detail = None;
        }
        self.screen = Screen::List;
        self.reload_and_report(format!("Deleted {}", pending.name)).await;
      }
      Err(e) if e.is_not_found() => {
        // Someone else got there first.
        self.screen = Screen::List;
        self.reload_and_report(format!("Error: {e}")).await;
      }
      Err(e) => {
        self.screen = pending.from;
        self.status_msg = format!("Error: {e}");
      }
    }
  }
}
