use crossterm::event::KeyCode;

use crate::carousel::PointerKind;

use super::model::Model;

/// Messages represent things that happened. The update function is the
/// only place that decides how state changes in response.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Advance the focused row one slide
    NextSlide,
    /// Step the focused row back one slide
    PrevSlide,
    /// Jump the focused row to a slide index
    GoToSlide(usize),
    /// A carousel navigation key (Left/Right/Home/End) for the focused row
    CarouselKey(KeyCode),
    /// Move focus to the previous row
    FocusUp,
    /// Move focus to the next row
    FocusDown,
    /// A pointer press began a drag inside a row's viewport
    DragStart {
        row: usize,
        x: u16,
        kind: PointerKind,
    },
    /// The pointer moved during a drag
    DragMove { x: u16 },
    /// The pointer was released, ending the drag
    DragEnd,
    /// Wheel scroll over a row, in columns
    Scroll { row: usize, delta: f64 },
    /// A prev-arrow glyph was clicked
    ArrowPrev(usize),
    /// A next-arrow glyph was clicked
    ArrowNext(usize),
    /// A progress dot was clicked
    DotClick { row: usize, index: usize },
    /// Toggle deck watching
    ToggleWatch,
    /// Reparse the deck file now
    ForceReload,
    /// The watcher reported a deck change
    DeckChanged,
    /// Terminal was resized
    Resize(u16, u16),
    /// Request a redraw with no state change
    Redraw,
    /// Quit the application
    Quit,
}

/// Pure state transition: model + message -> new model.
///
/// `now_ms` is the caller's monotonic clock; the controllers use it for
/// glide animation and scroll settling. Reload and watcher side effects
/// live in `effects.rs`, not here.
pub fn update(mut model: Model, msg: Message, now_ms: u64) -> Model {
    match msg {
        Message::NextSlide => {
            if let Some(controller) = model.focused_controller() {
                controller.next(now_ms);
            }
        }
        Message::PrevSlide => {
            if let Some(controller) = model.focused_controller() {
                controller.prev(now_ms);
            }
        }
        Message::GoToSlide(index) => {
            if let Some(controller) = model.focused_controller() {
                controller.go_to_slide(isize::try_from(index).unwrap_or(isize::MAX), now_ms);
            }
        }
        Message::CarouselKey(code) => {
            if let Some(controller) = model.focused_controller() {
                controller.handle_key(code, now_ms);
            }
        }
        Message::FocusUp => {
            model.focused_row = model.focused_row.saturating_sub(1);
        }
        Message::FocusDown => {
            let last = model.deck.rows.len().saturating_sub(1);
            model.focused_row = (model.focused_row + 1).min(last);
        }
        Message::DragStart { row, x, kind } => {
            if row < model.deck.rows.len() {
                model.focused_row = row;
            }
            if let Some(controller) = model.controller_at(row) {
                controller.handle_drag_start(x, kind);
            }
        }
        Message::DragMove { x } => {
            if let Some(controller) = model.focused_controller() {
                controller.handle_drag_move(x);
            }
        }
        Message::DragEnd => {
            if let Some(controller) = model.focused_controller() {
                controller.handle_drag_end(now_ms);
            }
        }
        Message::Scroll { row, delta } => {
            if row < model.deck.rows.len() {
                model.focused_row = row;
            }
            if let Some(controller) = model.controller_at(row) {
                controller.handle_scroll(delta, now_ms);
            }
        }
        Message::ArrowPrev(row) => {
            if row < model.deck.rows.len() {
                model.focused_row = row;
            }
            if let Some(controller) = model.controller_at(row) {
                controller.prev(now_ms);
            }
        }
        Message::ArrowNext(row) => {
            if row < model.deck.rows.len() {
                model.focused_row = row;
            }
            if let Some(controller) = model.controller_at(row) {
                controller.next(now_ms);
            }
        }
        Message::DotClick { row, index } => {
            if row < model.deck.rows.len() {
                model.focused_row = row;
            }
            if let Some(controller) = model.controller_at(row) {
                controller.go_to_slide(isize::try_from(index).unwrap_or(isize::MAX), now_ms);
            }
        }
        Message::ToggleWatch => {
            model.watch_enabled = !model.watch_enabled;
        }
        // Reload work happens in handle_message_side_effects so update
        // stays pure and testable without a filesystem.
        Message::ForceReload | Message::DeckChanged => {}
        Message::Resize(width, height) => {
            model.apply_resize(width, height);
        }
        Message::Redraw => {}
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}
