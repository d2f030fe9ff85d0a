//! Centered overlay for the open form.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::form::Form;

pub fn draw(f: &mut Frame, area: Rect, form: &Form) {
  let height = form.fields.len() as u16 + 2;
  let area = centered(area, 70, height);

  let block = Block::default()
    .title(format!(" {} ", form.title()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(Clear, area);
  f.render_widget(block, area);

  let lines: Vec<Line> = form
    .fields
    .iter()
    .enumerate()
    .map(|(i, field)| {
      let focused = i == form.focus;
      let label = if field.optional {
        format!("{:<14}", field.label)
      } else {
        format!("{:<13}*", field.label)
      };
      let cursor = if focused { "_" } else { "" };
      let value_style = if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(format!("{}{cursor}", field.value), value_style),
      ])
    })
    .collect();

  f.render_widget(Paragraph::new(lines), inner);
}

fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(0),
      Constraint::Length(height),
      Constraint::Min(0),
    ])
    .split(area);
  Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage((100 - percent_x) / 2),
      Constraint::Percentage(percent_x),
      Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(rows[1])[1]
}
