//! Restaurant list pane, left panel.

use makan_core::restaurant::PrivateRoom;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, Screen};

/// Render the search results into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let border = if app.screen == Screen::RestaurantList {
    Color::Gray
  } else {
    Color::DarkGray
  };
  let block = Block::default()
    .title(format!(" Restaurants ({}) ", app.restaurants.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let items: Vec<ListItem> = app
    .restaurants
    .iter()
    .map(|r| {
      let room = if r.private_room == PrivateRoom::Yes { " ⌂" } else { "" };
      ListItem::new(Line::from(vec![
        Span::raw(r.name.clone()),
        Span::styled(
          format!("  {:.1} {}{room}", r.rating, r.price_range),
          Style::default().fg(Color::DarkGray),
        ),
      ]))
    })
    .collect();

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  // Query line at the bottom while typing or while a query is applied.
  let shown_query = if app.query_active {
    Some(format!("/{}_", app.query))
  } else {
    app.params.q.as_ref().map(|q| format!("/{q}"))
  };
  if let Some(text) = shown_query
    && inner.height > 2
  {
    let query_area = Rect {
      x:      inner.x,
      y:      inner.y + inner.height - 1,
      width:  inner.width,
      height: 1,
    };
    inner.height -= 1;
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      query_area,
    );
  }

  if app.restaurants.is_empty() {
    f.render_widget(
      Paragraph::new("No restaurants match the selected filters.")
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}
