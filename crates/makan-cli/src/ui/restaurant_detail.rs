//! Restaurant detail pane, right panel: card, menus, gallery, reviews.

use makan_core::asset::{Asset, MIME_PDF, decoded_len};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(detail) = &app.detail else { return };
  let card = &detail.card;

  let block = Block::default()
    .title(format!(" {} ", card.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Gray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = Vec::new();

  if let Some(flash) = &detail.flash {
    lines.push(Line::from(Span::styled(
      flash.clone(),
      Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
  }

  lines.push(Line::from(card.description.clone()));
  lines.push(Line::from(""));
  for (label, value) in [
    ("Cuisine", &card.cuisine),
    ("Location", &card.location),
    ("Address", &card.address),
    ("Rating", &card.rating),
    ("Price", &card.price),
    ("Private Room", &card.private_room),
  ] {
    lines.push(field(label, value.clone()));
  }
  lines.push(field("Image", image_summary(&card.image)));

  // Menus
  lines.push(Line::from(""));
  lines.push(heading(format!("Menus ({})", detail.menus.len())));
  if detail.menus.is_empty() {
    lines.push(dim("No menus uploaded."));
  }
  for menu in &detail.menus {
    lines.push(Line::from(vec![
      Span::raw(format!("  {}", menu.file_name)),
      Span::styled(format!("  {}", describe(menu)), Style::default().fg(Color::DarkGray)),
    ]));
  }

  // Gallery
  lines.push(Line::from(""));
  lines.push(heading("Gallery".to_string()));
  match app.gallery_position() {
    Some((index, len)) if len > 0 => {
      let photo = &detail.gallery[index];
      let prev = if index > 0 { "[ ◀ " } else { "    " };
      let next = if index + 1 < len { " ▶ ]" } else { "" };
      lines.push(Line::from(vec![
        Span::styled(prev, Style::default().fg(Color::Cyan)),
        Span::raw(format!("{} of {len}: {}", index + 1, photo.file_name)),
        Span::styled(next, Style::default().fg(Color::Cyan)),
      ]));
      lines.push(dim(&format!("  {}", describe(photo))));
    }
    _ => lines.push(dim("No photos yet.")),
  }

  // Reviews
  lines.push(Line::from(""));
  lines.push(heading(format!("Reviews ({})", detail.reviews.len())));
  if detail.reviews.is_empty() {
    lines.push(dim("No reviews yet."));
  }
  for review in &detail.reviews {
    lines.push(Line::from(vec![
      Span::styled(
        format!("  {:.1}★ ", review.rating),
        Style::default().fg(Color::Yellow),
      ),
      Span::raw(review.attribution()),
      Span::styled(
        format!("  {}", review.timestamp.format("%Y-%m-%d %H:%M")),
        Style::default().fg(Color::DarkGray),
      ),
    ]));
    lines.push(Line::from(format!("    {}", review.review_text)));
  }

  let para = Paragraph::new(lines)
    .wrap(Wrap { trim: false })
    .scroll((app.detail_scroll, 0));
  f.render_widget(para, inner);
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn field(label: &str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<14}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

fn heading(text: String) -> Line<'static> {
  Line::from(Span::styled(
    text,
    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
  ))
}

fn dim(text: &str) -> Line<'static> {
  Line::from(Span::styled(
    text.to_owned(),
    Style::default().fg(Color::DarkGray),
  ))
}

/// Terminals cannot show the file itself, so summarise what a browser would.
fn describe(asset: &Asset) -> String {
  if asset.file_type.starts_with("image/") {
    format!("{} image, {} bytes", asset.file_type, asset.size())
  } else if asset.file_type == MIME_PDF {
    format!("PDF download, {} bytes", asset.size())
  } else {
    "unsupported file type".to_string()
  }
}

/// Embedded images are summarised; links are shown as-is.
fn image_summary(url: &str) -> String {
  let Some(rest) = url.strip_prefix("data:") else {
    return url.to_owned();
  };
  match rest.split_once(";base64,") {
    Some((mime, payload)) => format!("embedded {mime}, {} bytes", decoded_len(payload)),
    None => "embedded image".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use makan_core::asset::{AssetKind, NewAsset};

  use super::*;

  #[test]
  fn data_url_is_summarised() {
    let url = format!("data:image/png;base64,{}", "A".repeat(4000));
    assert_eq!(image_summary(&url), "embedded image/png, 3000 bytes");
    assert_eq!(image_summary("data:image/svg+xml,<svg/>"), "embedded image");
  }

  #[test]
  fn link_is_shown_verbatim() {
    let url = "https://example.com/odette.jpg";
    assert_eq!(image_summary(url), url);
  }

  #[test]
  fn assets_described_by_decoded_size() {
    let menu = NewAsset::from_bytes("Odette", "menu.pdf", MIME_PDF, &[0u8; 1000])
      .validate(AssetKind::Menu, Utc::now())
      .unwrap();
    assert_eq!(describe(&menu), "PDF download, 1000 bytes");

    let photo = NewAsset::from_bytes("Odette", "room.jpg", "image/jpeg", b"jpeg")
      .validate(AssetKind::Gallery, Utc::now())
      .unwrap();
    assert_eq!(describe(&photo), "image/jpeg image, 4 bytes");
  }
}
