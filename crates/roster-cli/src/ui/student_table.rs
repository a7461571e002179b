//! Student table: left panel.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use roster_core::{pagination::Pagination, student::StudentStatus};

use crate::app::App;

/// "Page X of Y (N students)"; an empty listing reads as page 1 of 1.
pub fn page_indicator(p: &Pagination) -> String {
  format!(
    "Page {} of {} ({} students)",
    p.current_page,
    p.total_pages.max(1),
    p.total_records
  )
}

fn status_color(status: StudentStatus) -> Color {
  match status {
    StudentStatus::Active => Color::Green,
    StudentStatus::Inactive => Color::DarkGray,
    StudentStatus::Graduated => Color::Cyan,
    StudentStatus::Suspended => Color::Red,
  }
}

/// Render the student table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_students();

  let mut title = match &app.pagination {
    Some(p) => format!(" Students · {} ", page_indicator(p)),
    None => " Students ".to_owned(),
  };
  if !app.filter.is_empty() {
    title.push_str(&format!("[{}/{} shown] ", filtered.len(), app.students.len()));
  }

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  if (app.filter_active || !app.filter.is_empty()) && inner.height > 2 {
    let filter_area = Rect {
      x:      inner.x,
      y:      inner.y + inner.height - 1,
      width:  inner.width,
      height: 1,
    };
    inner.height -= 1;

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if filtered.is_empty() {
    let msg = if app.students.is_empty() {
      "No students found. Press a to add one."
    } else {
      "No students on this page match the filter."
    };
    f.render_widget(
      Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let header = Row::new(["ID", "Name", "Email", "Phone", "City", "Status"]).style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let rows: Vec<Row> = filtered
    .iter()
    .map(|s| {
      Row::new(vec![
        Cell::from(s.student_id.to_string()),
        Cell::from(s.full_name()),
        Cell::from(s.email.clone()),
        Cell::from(s.phone.clone().unwrap_or_else(|| "—".into())),
        Cell::from(s.city.clone().unwrap_or_else(|| "—".into())),
        Cell::from(s.status.as_str())
          .style(Style::default().fg(status_color(s.status))),
      ])
    })
    .collect();

  let widths = [
    Constraint::Length(6),
    Constraint::Percentage(24),
    Constraint::Percentage(32),
    Constraint::Length(15),
    Constraint::Percentage(14),
    Constraint::Length(10),
  ];

  let mut state = TableState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    Table::new(rows, widths).header(header).row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}

#[cfg(test)]
mod tests {
  use roster_core::pagination::PageRequest;

  use super::*;

  #[test]
  fn indicator_reads_naturally() {
    let p = Pagination::new(PageRequest::new(2, 10).unwrap(), 15);
    assert_eq!(page_indicator(&p), "Page 2 of 2 (15 students)");
  }

  #[test]
  fn empty_listing_is_page_one_of_one() {
    let p = Pagination::new(PageRequest::default(), 0);
    assert_eq!(page_indicator(&p), "Page 1 of 1 (0 students)");
  }
}
