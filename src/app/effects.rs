use std::time::Duration;

use crate::watcher::DeckWatcher;

use super::model::{Model, ToastLevel};
use super::update::Message;

/// Debounce applied to watcher events before a reload fires.
pub(super) const WATCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Run the side effects a message implies after the pure update: watcher
/// lifecycle and deck reloads. Kept out of `update` so state transitions
/// stay testable without a filesystem.
pub fn handle_message_side_effects(
    mut model: Model,
    msg: &Message,
    watcher: &mut Option<DeckWatcher>,
) -> Model {
    match msg {
        Message::ToggleWatch => {
            if model.watch_enabled {
                match DeckWatcher::new(&model.deck_path, WATCH_DEBOUNCE) {
                    Ok(created) => {
                        *watcher = Some(created);
                        model.show_toast(
                            ToastLevel::Info,
                            format!("Watching {}", model.deck_path.display()),
                        );
                    }
                    Err(err) => {
                        model.watch_enabled = false;
                        model.show_toast(ToastLevel::Error, format!("Watch failed: {err}"));
                    }
                }
            } else {
                *watcher = None;
                model.show_toast(ToastLevel::Info, "Watch off");
            }
        }
        Message::ForceReload | Message::DeckChanged => match model.reload_from_disk() {
            Ok(()) => {
                model.materialize_pending_images();
                if matches!(msg, Message::ForceReload) {
                    model.show_toast(ToastLevel::Info, "Deck reloaded");
                }
            }
            Err(err) => {
                // Keep showing the previous deck; the author gets the
                // parse error and can fix the file while we watch.
                model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
            }
        },
        _ => {}
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::parse_deck;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn deck_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_force_reload_picks_up_new_rows() {
        let file = deck_file(r#"{ "rows": [ { "id": "a", "slides": [ {} ] } ] }"#);
        let deck = parse_deck(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        let mut model = Model::new(file.path().to_path_buf(), deck, (80, 24));
        assert_eq!(model.controllers.len(), 1);

        std::fs::write(
            file.path(),
            r#"{ "rows": [ { "id": "a", "slides": [ {} ] }, { "id": "b", "slides": [ {}, {} ] } ] }"#,
        )
        .unwrap();

        let mut watcher = None;
        model = handle_message_side_effects(model, &Message::ForceReload, &mut watcher);
        assert_eq!(model.controllers.len(), 2);
        assert!(model.registry.is_bound("b"));
    }

    #[test]
    fn test_reload_error_keeps_previous_deck_and_toasts() {
        let file = deck_file(r#"{ "rows": [ { "id": "a", "slides": [ {} ] } ] }"#);
        let deck = parse_deck(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        let mut model = Model::new(file.path().to_path_buf(), deck, (80, 24));

        std::fs::write(file.path(), "not json").unwrap();

        let mut watcher = None;
        model = handle_message_side_effects(model, &Message::DeckChanged, &mut watcher);
        assert_eq!(model.deck.rows.len(), 1, "previous deck stays");
        let (message, level) = model.active_toast().expect("toast");
        assert_eq!(level, ToastLevel::Error);
        assert!(message.starts_with("Reload failed"));
    }

    #[test]
    fn test_toggle_watch_creates_and_drops_watcher() {
        let file = deck_file(r#"{ "rows": [] }"#);
        let deck = parse_deck(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        let mut model = Model::new(file.path().to_path_buf(), deck, (80, 24));
        let mut watcher = None;

        model.watch_enabled = true;
        model = handle_message_side_effects(model, &Message::ToggleWatch, &mut watcher);
        assert!(watcher.is_some());
        assert!(model.watch_enabled);

        model.watch_enabled = false;
        model = handle_message_side_effects(model, &Message::ToggleWatch, &mut watcher);
        assert!(watcher.is_none());
    }
}
