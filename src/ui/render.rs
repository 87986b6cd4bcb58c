//! Frame rendering: carousel rows, slide cards, arrows, and dots.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui_image::StatefulImage;
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::carousel::CarouselController;
use crate::deck::Row;

use super::{CARD_HEIGHT, RowLayout, SLIDE_GAP, row_layouts, split_frame, status};

/// Render the whole frame: the visible carousel rows plus the status bar.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let (rows_area, status_area) = split_frame(frame.area());
    let layouts = row_layouts(model.deck.rows.len(), model.focused_row, rows_area);

    let Model {
        deck,
        controllers,
        image_protocols,
        focused_row,
        ..
    } = model;

    for layout in &layouts {
        let Some(row) = deck.rows.get(layout.index) else {
            continue;
        };
        let Some(controller) = controllers.get(&row.id) else {
            continue;
        };
        render_row(
            frame,
            layout,
            row,
            controller,
            image_protocols,
            layout.index == *focused_row,
        );
    }

    status::render_status_bar(model, frame, status_area);
}

fn render_row(
    frame: &mut Frame,
    layout: &RowLayout,
    row: &Row,
    controller: &CarouselController,
    image_protocols: &mut std::collections::HashMap<
        String,
        (ratatui_image::protocol::StatefulProtocol, u16, u16),
    >,
    focused: bool,
) {
    render_title(frame, layout.title, row, focused);
    render_cards(frame, layout.viewport, row, controller, image_protocols);

    if row.arrows && controller.slide_count() > 1 {
        let controls = controller.controls();
        render_arrow(frame, layout.prev_arrow, "❮", controls.prev_enabled);
        render_arrow(frame, layout.next_arrow, "❯", controls.next_enabled);
    }
    if row.dots && !controller.is_empty() {
        render_dots(frame, layout.dots, controller);
    }
}

fn render_title(frame: &mut Frame, area: Rect, row: &Row, focused: bool) {
    let text = row.title.as_deref().unwrap_or(&row.id);
    let line = if focused {
        Line::from(vec![
            Span::styled("▸ ", Style::default().fg(Color::Cyan)),
            Span::styled(
                truncate_to_width(text, area.width.saturating_sub(2).into()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(Span::styled(
            format!("  {}", truncate_to_width(text, area.width.saturating_sub(2).into())),
            Style::default().fg(Color::Gray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_arrow(frame: &mut Frame, gutter: Rect, glyph: &str, enabled: bool) {
    if gutter.width == 0 || gutter.height == 0 {
        return;
    }
    let style = if enabled {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        // Present but visibly inert at the bounds
        Style::default().fg(Color::DarkGray)
    };
    let area = Rect {
        y: gutter.y + gutter.height / 2,
        height: 1,
        ..gutter
    };
    frame.render_widget(Paragraph::new(Span::styled(glyph, style)), area);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
// Offsets and pitches are bounded by the track length, far below any
// integer precision limits.
fn render_cards(
    frame: &mut Frame,
    viewport: Rect,
    row: &Row,
    controller: &CarouselController,
    image_protocols: &mut std::collections::HashMap<
        String,
        (ratatui_image::protocol::StatefulProtocol, u16, u16),
    >,
) {
    let pitch = controller.pitch();
    let slide_width = (pitch as u16).saturating_sub(SLIDE_GAP);
    let offset = controller.scroll_offset();
    let viewport_left = i32::from(viewport.x);
    let viewport_right = i32::from(viewport.x) + i32::from(viewport.width);

    for (index, slide) in row.slides.iter().enumerate() {
        let card_left =
            (f64::from(viewport.x) + index as f64 * pitch - offset).round() as i32;
        let card_right = card_left + i32::from(slide_width);
        if card_right <= viewport_left || card_left >= viewport_right {
            continue;
        }
        let visible_left = card_left.max(viewport_left);
        let visible_right = card_right.min(viewport_right);
        let card = Rect {
            x: visible_left as u16,
            y: viewport.y,
            width: (visible_right - visible_left) as u16,
            height: CARD_HEIGHT.min(viewport.height),
        };

        let border_style = if index == controller.current_index() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(Block::bordered().border_style(border_style), card);

        if card.width > 2 && card.height > 2 {
            render_card_body(
                frame,
                card,
                slide,
                controller,
                index,
                image_protocols,
                card_left >= viewport_left && card_right <= viewport_right,
            );
        }
    }
}

fn render_card_body(
    frame: &mut Frame,
    card: Rect,
    slide: &crate::deck::Slide,
    controller: &CarouselController,
    index: usize,
    image_protocols: &mut std::collections::HashMap<
        String,
        (ratatui_image::protocol::StatefulProtocol, u16, u16),
    >,
    fully_visible: bool,
) {
    let image_area = Rect {
        x: card.x + 1,
        y: card.y + 1,
        width: card.width - 2,
        height: card.height.saturating_sub(3),
    };

    if let Some(src) = slide.image.as_deref() {
        let protocol = image_protocols.get_mut(src);
        match protocol {
            // Image cells cannot be clipped mid-glyph, so partially
            // visible cards show their placeholder instead.
            Some((protocol, _, _)) if fully_visible && image_area.height > 0 => {
                frame.render_stateful_widget(StatefulImage::default(), image_area, protocol);
            }
            _ => {
                render_placeholder(frame, image_area, controller.is_loaded(index));
            }
        }
    }

    if let Some(caption) = slide.caption.as_deref() {
        let caption_area = Rect {
            x: card.x + 1,
            y: card.y + card.height - 2,
            width: card.width - 2,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(truncate_to_width(caption, caption_area.width.into())),
            caption_area,
        );
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, loaded: bool) {
    if area.height == 0 {
        return;
    }
    // Loaded but undecodable (or clipped) vs. still deferred
    let glyph = if loaded { "· · ·" } else { "▒▒▒" };
    let centered = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    frame.render_widget(
        Paragraph::new(Span::styled(glyph, Style::default().fg(Color::DarkGray)))
            .centered(),
        centered,
    );
}

fn render_dots(frame: &mut Frame, area: Rect, controller: &CarouselController) {
    let active = controller.controls().active_dot;
    let mut spans = Vec::with_capacity(controller.slide_count() * 2);
    for index in 0..controller.slide_count() {
        let (glyph, style) = if active == Some(index) {
            ("●", Style::default().fg(Color::Cyan))
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(glyph, style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Truncate a string to a display width, appending an ellipsis when cut.
pub(super) fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|ch| ch.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut width = 0_usize;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > budget {
            break;
        }
        width += ch_width;
        out.push(ch);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}
