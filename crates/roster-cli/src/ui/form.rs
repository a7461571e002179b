//! Create/edit form: replaces the body while open.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use roster_core::student::StudentStatus;

use crate::form::{FIELDS, StudentForm};

/// Render `form` into `area`: one line per field, its error (if any) beside it.
pub fn draw(f: &mut Frame, area: Rect, form: &StudentForm) {
  let block = Block::default()
    .title(format!(" {} ", form.title()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = Vec::with_capacity(FIELDS.len() + 2);
  for (i, field) in FIELDS.iter().enumerate() {
    let focused = i == form.cursor;
    let marker = if field.required { "*" } else { " " };

    let label_style = if focused {
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };
    let value = if focused {
      format!("{}_", form.value(i))
    } else {
      form.value(i).to_owned()
    };

    let mut spans = vec![
      Span::styled(format!("{:<14}{marker} ", field.label), label_style),
      Span::raw(format!("{value:<40}")),
    ];
    if let Some(err) = form.error(field.key) {
      spans.push(Span::styled(format!("  {err}"), Style::default().fg(Color::Red)));
    }
    lines.push(Line::from(spans));
  }

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!(
      "* required   dates as YYYY-MM-DD   status: {}",
      StudentStatus::names().join(" | ")
    ),
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines), inner);
}
