//! Student detail pane: right panel.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use roster_core::{
  mark::{MarkDetail, MarkResult},
  student::{DATE_FORMAT, Student},
};

use crate::app::{App, Screen};

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(detail) = &app.detail else { return };
  let student = &detail.student;

  let border = if app.screen == Screen::Detail {
    Color::Cyan
  } else {
    Color::DarkGray
  };
  let block = Block::default()
    .title(format!(" {} ", student.full_name()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let profile = profile_lines(student);
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(profile.len() as u16 + 1),
      Constraint::Min(0),
    ])
    .split(inner);

  f.render_widget(Paragraph::new(profile), rows[0]);

  let mut lines = vec![Line::from(Span::styled(
    format!("Marks ({})", detail.marks.len()),
    Style::default().add_modifier(Modifier::BOLD),
  ))];
  if detail.marks.is_empty() {
    lines.push(Line::from(Span::styled(
      "No marks recorded.",
      Style::default().fg(Color::DarkGray),
    )));
  } else {
    lines.extend(detail.marks.iter().skip(app.detail_scroll).map(mark_line));
  }
  f.render_widget(Paragraph::new(lines), rows[1]);
}

// ─── Formatting ───────────────────────────────────────────────────────────────

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
  Line::from(vec![
    Span::styled(
      format!("{label:<12}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

fn or_dash(v: &Option<String>) -> String { v.clone().unwrap_or_else(|| "—".into()) }

fn profile_lines(s: &Student) -> Vec<Line<'static>> {
  let place = [&s.address, &s.city, &s.state, &s.postal_code]
    .into_iter()
    .flatten()
    .cloned()
    .chain(std::iter::once(s.country.clone()))
    .collect::<Vec<_>>()
    .join(", ");

  vec![
    field("ID", s.student_id.to_string()),
    field("Email", s.email.clone()),
    field("Phone", or_dash(&s.phone)),
    field("Born", s.date_of_birth.format(DATE_FORMAT).to_string()),
    field("Enrolled", s.enrollment_date.format(DATE_FORMAT).to_string()),
    field("Address", place),
    field("Status", s.status.to_string()),
  ]
}

/// `MATH101  45/50  90.00%  Pass  final 2024-03-01  A`
pub fn mark_line(m: &MarkDetail) -> Line<'static> {
  let result_style = match m.result {
    MarkResult::Pass => Style::default().fg(Color::Green),
    MarkResult::Fail => Style::default().fg(Color::Red),
  };
  let result = match m.result {
    MarkResult::Pass => "Pass",
    MarkResult::Fail => "Fail",
  };

  let mut spans = vec![
    Span::styled(
      format!("{:<10}", m.subject_code),
      Style::default().add_modifier(Modifier::BOLD),
    ),
    Span::raw(format!("{:>6}/{:<6}", m.marks_obtained, m.max_marks)),
    Span::raw(format!("{:>7.2}%  ", m.percentage)),
    Span::styled(format!("{result:<5}"), result_style),
    Span::styled(
      format!(" {} {}", m.exam_type, m.exam_date.format(DATE_FORMAT)),
      Style::default().fg(Color::DarkGray),
    ),
  ];
  if let Some(grade) = &m.grade {
    spans.push(Span::raw(format!("  {grade}")));
  }
  Line::from(spans)
}
