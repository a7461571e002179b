//! TUI rendering: orchestrates all panes.

pub mod form;
pub mod student_detail;
pub mod student_table;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0]);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  if app.screen == Screen::ConfirmDelete {
    draw_confirm(f, rows[1], app);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " roster  [a] add  [/] search  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::DarkGray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  if app.screen == Screen::Form {
    if let Some(form) = &app.form {
      form::draw(f, area, form);
      return;
    }
  }

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(area);

  student_table::draw(f, cols[0], app);

  if app.detail.is_some() {
    student_detail::draw(f, cols[1], app);
  } else {
    draw_empty_detail(f, cols[1]);
  }
}

fn draw_empty_detail(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new("Select a student and press Enter.")
      .style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

// ─── Delete confirmation ──────────────────────────────────────────────────────

fn draw_confirm(f: &mut Frame, area: Rect, app: &App) {
  let Some(pending) = &app.pending_delete else { return };

  let popup = centered(area, 50, 5);
  let block = Block::default()
    .title(" Delete student ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let text = vec![
    Line::from(format!("Delete {} (#{})?", pending.name, pending.id)),
    Line::from(Span::styled(
      "Marks recorded for this student are removed too.  [y] yes  [n] no",
      Style::default().fg(Color::DarkGray),
    )),
  ];

  f.render_widget(Clear, popup);
  f.render_widget(
    Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
    popup,
  );
}

/// A `width`-percent wide, `height`-row tall rectangle centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let w = area.width * width / 100;
  let h = height.min(area.height);
  Rect {
    x:      area.x + (area.width - w) / 2,
    y:      area.y + (area.height - h) / 2,
    width:  w,
    height: h,
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen {
    Screen::List if app.filter_active => {
      ("SEARCH", "Type to filter  Esc cancel  Enter select")
    }
    Screen::List => (
      "NORMAL",
      "jk move  ←→/pn page  Enter detail  a add  e edit  d delete  r refresh  q quit",
    ),
    Screen::Detail => ("DETAIL", "jk scroll marks  e edit  d delete  Esc back  q quit"),
    Screen::Form => ("FORM", "Tab/↑↓ field  Enter save  Esc cancel"),
    Screen::ConfirmDelete => ("CONFIRM", "y delete  n cancel"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
