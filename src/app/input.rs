use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::carousel::PointerKind;
use crate::ui::{self, HitTarget};

use super::model::Model;
use super::update::Message;

/// Columns of travel one wheel notch applies to a row.
const WHEEL_SCROLL_COLS: f64 = 6.0;

/// Translate a terminal event into a message. Returns None for events we
/// don't care about (key releases, moves outside any carousel).
pub fn handle_event(event: &Event, model: &Model) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(key),
        Event::Mouse(mouse) => handle_mouse(mouse, model),
        Event::Resize(width, height) => Some(Message::Resize(*width, *height)),
        _ => None,
    }
}

fn handle_key(key: &KeyEvent) -> Option<Message> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Message::Quit);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
        KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {
            Some(Message::CarouselKey(key.code))
        }
        KeyCode::Up => Some(Message::FocusUp),
        KeyCode::Down | KeyCode::Tab => Some(Message::FocusDown),
        KeyCode::Char('r') => Some(Message::ForceReload),
        KeyCode::Char('w') => Some(Message::ToggleWatch),
        KeyCode::Char(c @ '1'..='9') => {
            let index = usize::from(u8::try_from(c).ok()? - b'1');
            Some(Message::GoToSlide(index))
        }
        _ => None,
    }
}

fn handle_mouse(mouse: &MouseEvent, model: &Model) -> Option<Message> {
    let area = Rect::new(0, 0, model.terminal_size.0, model.terminal_size.1);
    let (rows_area, _) = ui::split_frame(area);
    let layouts = ui::row_layouts(model.deck.rows.len(), model.focused_row, rows_area);
    let target = ui::hit_test(&layouts, &model.deck, mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match target? {
            HitTarget::Viewport { row, x } => Some(Message::DragStart {
                row,
                x,
                kind: PointerKind::Mouse,
            }),
            HitTarget::PrevArrow { row } => Some(Message::ArrowPrev(row)),
            HitTarget::NextArrow { row } => Some(Message::ArrowNext(row)),
            HitTarget::Dot { row, index } => Some(Message::DotClick { row, index }),
        },
        // Drags can leave the viewport; the controller keeps tracking the
        // pointer until release, like pointer capture.
        MouseEventKind::Drag(MouseButton::Left) => Some(Message::DragMove { x: mouse.column }),
        MouseEventKind::Up(MouseButton::Left) => Some(Message::DragEnd),
        MouseEventKind::ScrollLeft | MouseEventKind::ScrollUp => match target? {
            HitTarget::Viewport { row, .. } => Some(Message::Scroll {
                row,
                delta: -WHEEL_SCROLL_COLS,
            }),
            _ => None,
        },
        MouseEventKind::ScrollRight | MouseEventKind::ScrollDown => match target? {
            HitTarget::Viewport { row, .. } => Some(Message::Scroll {
                row,
                delta: WHEEL_SCROLL_COLS,
            }),
            _ => None,
        },
        _ => None,
    }
}
