//! Rendering and shared layout geometry.
//!
//! Layout math lives here in one place so rendering and mouse hit-testing
//! can never disagree about where a viewport, arrow, or dot sits.

mod render;
mod status;

pub use render::render;

use ratatui::layout::{Position, Rect};

use crate::deck::Deck;

/// Default slide card width in columns when neither the CLI nor the row
/// specifies one.
pub const DEFAULT_SLIDE_WIDTH: u16 = 26;
/// Gap between slide cards in columns.
pub const SLIDE_GAP: u16 = 2;
/// Height of a slide card: border, image area, caption, border.
pub const CARD_HEIGHT: u16 = 9;
/// Width of the prev/next arrow gutters flanking a row viewport.
pub const ARROW_GUTTER: u16 = 2;
/// Total height of one carousel row: title, card, dots, spacer.
pub const ROW_HEIGHT: u16 = CARD_HEIGHT + 3;
/// Columns each progress dot occupies ("● " including trailing space).
pub const DOT_STRIDE: u16 = 2;

/// Where a mouse event landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Inside a row's slide viewport
    Viewport { row: usize, x: u16 },
    /// On a row's prev arrow gutter
    PrevArrow { row: usize },
    /// On a row's next arrow gutter
    NextArrow { row: usize },
    /// On a progress dot
    Dot { row: usize, index: usize },
}

/// Screen rectangles for one visible carousel row.
#[derive(Debug, Clone, Copy)]
pub struct RowLayout {
    /// Index into `deck.rows`
    pub index: usize,
    pub title: Rect,
    pub prev_arrow: Rect,
    pub next_arrow: Rect,
    pub viewport: Rect,
    pub dots: Rect,
}

/// Split the frame into the rows area and the one-line status bar.
pub fn split_frame(area: Rect) -> (Rect, Rect) {
    let status_height = 1.min(area.height);
    let rows = Rect {
        height: area.height - status_height,
        ..area
    };
    let status = Rect {
        y: area.y + rows.height,
        height: status_height,
        ..area
    };
    (rows, status)
}

/// Compute layouts for the rows visible in `area`.
///
/// Rows page in blocks: the page containing the focused row is shown, so
/// focus always stays on screen without persisted scroll state.
pub fn row_layouts(total_rows: usize, focused_row: usize, area: Rect) -> Vec<RowLayout> {
    if total_rows == 0 || area.height < ROW_HEIGHT || area.width <= 2 * ARROW_GUTTER {
        return Vec::new();
    }
    let slots = usize::from(area.height / ROW_HEIGHT).max(1);
    let first = (focused_row.min(total_rows - 1) / slots) * slots;

    let mut layouts = Vec::new();
    for slot in 0..slots {
        let index = first + slot;
        if index >= total_rows {
            break;
        }
        let y = area.y + u16::try_from(slot).unwrap_or(0) * ROW_HEIGHT;
        layouts.push(RowLayout {
            index,
            title: Rect {
                x: area.x + 1,
                y,
                width: area.width.saturating_sub(2),
                height: 1,
            },
            prev_arrow: Rect {
                x: area.x,
                y: y + 1,
                width: ARROW_GUTTER,
                height: CARD_HEIGHT,
            },
            next_arrow: Rect {
                x: area.right().saturating_sub(ARROW_GUTTER),
                y: y + 1,
                width: ARROW_GUTTER,
                height: CARD_HEIGHT,
            },
            viewport: Rect {
                x: area.x + ARROW_GUTTER,
                y: y + 1,
                width: area.width.saturating_sub(2 * ARROW_GUTTER),
                height: CARD_HEIGHT,
            },
            dots: Rect {
                x: area.x + ARROW_GUTTER,
                y: y + 1 + CARD_HEIGHT,
                width: area.width.saturating_sub(2 * ARROW_GUTTER),
                height: 1,
            },
        });
    }
    layouts
}

/// Resolve a mouse position to a carousel target.
///
/// Arrows and dots only count as targets on rows that actually render
/// them, so clicks on blank gutter space fall through.
pub fn hit_test(layouts: &[RowLayout], deck: &Deck, column: u16, line: u16) -> Option<HitTarget> {
    let position = Position::new(column, line);
    for layout in layouts {
        let Some(row) = deck.rows.get(layout.index) else {
            continue;
        };
        if row.arrows && !row.slides.is_empty() {
            if layout.prev_arrow.contains(position) {
                return Some(HitTarget::PrevArrow { row: layout.index });
            }
            if layout.next_arrow.contains(position) {
                return Some(HitTarget::NextArrow { row: layout.index });
            }
        }
        if row.dots && layout.dots.contains(position) {
            let offset = column - layout.dots.x;
            let index = usize::from(offset / DOT_STRIDE);
            if index < row.slides.len()
                && offset < u16::try_from(row.slides.len()).unwrap_or(u16::MAX) * DOT_STRIDE
            {
                return Some(HitTarget::Dot {
                    row: layout.index,
                    index,
                });
            }
            return None;
        }
        if layout.viewport.contains(position) {
            return Some(HitTarget::Viewport {
                row: layout.index,
                x: column,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::parse_deck;

    fn two_row_deck() -> Deck {
        parse_deck(
            r#"{
                "rows": [
                    { "id": "a", "slides": [ {}, {}, {} ] },
                    { "id": "b", "dots": false, "slides": [ {}, {} ] }
                ]
            }"#,
        )
        .unwrap()
    }

    fn area() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    #[test]
    fn test_row_layouts_fit_available_height() {
        let layouts = row_layouts(5, 0, area());
        // 24 rows / 12 per row = 2 visible rows on the first page
        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].index, 0);
        assert_eq!(layouts[1].index, 1);
    }

    #[test]
    fn test_focused_row_pages_into_view() {
        let layouts = row_layouts(5, 3, area());
        assert_eq!(layouts[0].index, 2);
        assert_eq!(layouts[1].index, 3);
    }

    #[test]
    fn test_hit_test_finds_viewport_and_arrows() {
        let deck = two_row_deck();
        let layouts = row_layouts(deck.rows.len(), 0, area());

        let viewport = layouts[0].viewport;
        assert_eq!(
            hit_test(&layouts, &deck, viewport.x + 5, viewport.y + 2),
            Some(HitTarget::Viewport {
                row: 0,
                x: viewport.x + 5
            })
        );
        assert_eq!(
            hit_test(&layouts, &deck, 0, layouts[0].prev_arrow.y + 1),
            Some(HitTarget::PrevArrow { row: 0 })
        );
        assert_eq!(
            hit_test(&layouts, &deck, 79, layouts[0].next_arrow.y + 1),
            Some(HitTarget::NextArrow { row: 0 })
        );
    }

    #[test]
    fn test_hit_test_maps_dot_positions_to_slide_indices() {
        let deck = two_row_deck();
        let layouts = row_layouts(deck.rows.len(), 0, area());
        let dots = layouts[0].dots;

        assert_eq!(
            hit_test(&layouts, &deck, dots.x, dots.y),
            Some(HitTarget::Dot { row: 0, index: 0 })
        );
        assert_eq!(
            hit_test(&layouts, &deck, dots.x + 4, dots.y),
            Some(HitTarget::Dot { row: 0, index: 2 })
        );
        // Past the rendered dots: no target
        assert_eq!(hit_test(&layouts, &deck, dots.x + 20, dots.y), None);
    }

    #[test]
    fn test_hit_test_skips_dots_on_row_without_dots() {
        let deck = two_row_deck();
        let layouts = row_layouts(deck.rows.len(), 0, area());
        let dots = layouts[1].dots;
        assert_eq!(hit_test(&layouts, &deck, dots.x, dots.y), None);
    }

    #[test]
    fn test_no_layouts_for_empty_deck_or_tiny_area() {
        assert!(row_layouts(0, 0, area()).is_empty());
        assert!(row_layouts(3, 0, Rect::new(0, 0, 80, 5)).is_empty());
    }
}
