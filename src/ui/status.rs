//! The one-line status bar at the bottom of the frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

use super::render::truncate_to_width;

pub(super) fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let base = Style::default().bg(Color::DarkGray).fg(Color::White);

    // An active toast takes over the whole bar until it expires.
    if let Some((message, level)) = model.active_toast() {
        let style = match level {
            ToastLevel::Info => base,
            ToastLevel::Warning => base.fg(Color::Yellow),
            ToastLevel::Error => base.fg(Color::Red).add_modifier(Modifier::BOLD),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", truncate_to_width(message, area.width.into())),
                style,
            ))
            .style(base),
            area,
        );
        return;
    }

    let deck_name = model.deck.title.as_deref().map_or_else(
        || {
            model
                .deck_path
                .file_name()
                .map_or_else(|| "deck".to_string(), |n| n.to_string_lossy().into_owned())
        },
        ToOwned::to_owned,
    );

    let mut spans = vec![Span::styled(
        format!(" {deck_name} "),
        base.add_modifier(Modifier::BOLD),
    )];
    if let Some(announcement) = model.focused_announcement() {
        spans.push(Span::styled("│ ", base.fg(Color::Gray)));
        spans.push(Span::styled(format!("{announcement} "), base));
    }
    if !model.deck.rows.is_empty() {
        spans.push(Span::styled("│ ", base.fg(Color::Gray)));
        spans.push(Span::styled(
            format!("Row {}/{} ", model.focused_row + 1, model.deck.rows.len()),
            base,
        ));
    }
    if model.watch_enabled {
        spans.push(Span::styled("[watching] ", base.fg(Color::Green)));
    }
    spans.push(Span::styled(
        "│ ←→ slides  ↑↓ rows  r reload  w watch  q quit",
        base.fg(Color::Gray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(base), area);
}
