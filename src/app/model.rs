use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::carousel::{CarouselController, CarouselOptions, CarouselRegistry};
use crate::deck::{Deck, DeckError, Row};
use crate::image::SlideImageLoader;
use crate::ui::{ARROW_GUTTER, CARD_HEIGHT, DEFAULT_SLIDE_WIDTH, SLIDE_GAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. Each carousel row
/// has its own independent controller; controllers never communicate with
/// each other.
pub struct Model {
    /// The loaded deck
    pub deck: Deck,
    /// Path to the deck file
    pub deck_path: PathBuf,
    /// Base directory for resolving relative image paths
    pub base_dir: PathBuf,
    /// Bound-root bookkeeping for re-scans
    pub registry: CarouselRegistry,
    /// One controller per bound row, keyed by row id
    pub controllers: HashMap<String, CarouselController>,
    /// Index into `deck.rows` of the row receiving keyboard input
    pub focused_row: usize,
    /// Whether deck watching is enabled
    pub watch_enabled: bool,
    /// Whether inline images are enabled
    pub images_enabled: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Terminal dimensions (columns, rows)
    pub terminal_size: (u16, u16),
    /// Forced slide width from the CLI (overrides per-row preference)
    pub slide_width_override: Option<u16>,
    /// Image picker for terminal rendering
    pub picker: Option<Picker>,
    /// Materialized image protocols, keyed by slide image src.
    /// Stores (protocol, `width_cols`, `height_rows`)
    pub image_protocols: HashMap<String, (StatefulProtocol, u16, u16)>,
    /// Slide image loader with its decode cache
    pub loader: SlideImageLoader,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("deck_path", &self.deck_path)
            .field("rows", &self.deck.rows.len())
            .field("focused_row", &self.focused_row)
            .field("watch_enabled", &self.watch_enabled)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a new model and bind controllers to every deck row.
    pub fn new(deck_path: PathBuf, deck: Deck, terminal_size: (u16, u16)) -> Self {
        let base_dir = deck_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let mut model = Self {
            deck,
            deck_path,
            base_dir: base_dir.clone(),
            registry: CarouselRegistry::new(),
            controllers: HashMap::new(),
            focused_row: 0,
            watch_enabled: false,
            images_enabled: true,
            should_quit: false,
            terminal_size,
            slide_width_override: None,
            picker: None,
            image_protocols: HashMap::new(),
            loader: SlideImageLoader::new(base_dir),
            toast: None,
        };
        model.bind_new_rows();
        model
    }

    /// Set the image picker.
    #[must_use]
    pub fn with_picker(mut self, picker: Option<Picker>) -> Self {
        self.picker = picker;
        self
    }

    /// Construction options for a row under the current layout.
    pub fn carousel_options_for(&self, row: &Row) -> CarouselOptions {
        options_for(row, self.slide_width_override, self.terminal_size.0)
    }

    /// Bind controllers for rows the registry has not seen yet.
    pub fn bind_new_rows(&mut self) {
        let override_width = self.slide_width_override;
        let terminal_width = self.terminal_size.0;
        let discovered = self
            .registry
            .scan(&self.deck, |row| {
                options_for(row, override_width, terminal_width)
            });
        for (id, controller) in discovered {
            self.controllers.insert(id, controller);
        }
    }

    /// The deck row currently focused, if any.
    pub fn focused_row_def(&self) -> Option<&Row> {
        self.deck.rows.get(self.focused_row)
    }

    /// Mutable controller for the focused row.
    pub fn focused_controller(&mut self) -> Option<&mut CarouselController> {
        let id = self.deck.rows.get(self.focused_row)?.id.clone();
        self.controllers.get_mut(&id)
    }

    /// Controller for a row index.
    pub fn controller_at(&mut self, row: usize) -> Option<&mut CarouselController> {
        let id = self.deck.rows.get(row)?.id.clone();
        self.controllers.get_mut(&id)
    }

    /// The focused row's "Slide i of N" announcement.
    pub fn focused_announcement(&self) -> Option<&str> {
        let id = &self.deck.rows.get(self.focused_row)?.id;
        self.controllers.get(id)?.announcement()
    }

    /// Reparse the deck file and re-scan for carousel roots.
    ///
    /// Surviving rows keep their controller state (index, loaded window);
    /// removed rows drop theirs; rows whose slide set changed size are
    /// rebound, since a controller's slide list is fixed at construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck cannot be read or fails validation;
    /// the previous deck stays in place.
    pub fn reload_from_disk(&mut self) -> Result<(), DeckError> {
        let deck = Deck::load(&self.deck_path)?;
        self.deck = deck;

        for id in self.registry.release_missing(&self.deck) {
            self.controllers.remove(&id);
        }
        let resized: Vec<String> = self
            .controllers
            .iter()
            .filter(|(id, controller)| {
                self.deck
                    .row(id)
                    .is_some_and(|row| row.slides.len() != controller.slide_count())
            })
            .map(|(id, _)| id.clone())
            .collect();
        for id in resized {
            self.controllers.remove(&id);
            self.registry.release(&id);
        }
        self.bind_new_rows();

        // Drop cached protocols for images no longer referenced, and the
        // decoded originals wholesale; survivors re-decode on demand.
        let live_srcs: std::collections::HashSet<&str> = self
            .deck
            .rows
            .iter()
            .flat_map(|row| &row.slides)
            .filter_map(|slide| slide.image.as_deref())
            .collect();
        self.image_protocols
            .retain(|src, _| live_srcs.contains(src.as_str()));
        self.loader.clear();

        self.focused_row = self
            .focused_row
            .min(self.deck.rows.len().saturating_sub(1));
        crate::perf::log_event(
            "deck.reload",
            format!(
                "rows={} bound={}",
                self.deck.rows.len(),
                self.registry.bound_count()
            ),
        );
        Ok(())
    }

    /// Apply a terminal resize: geometry bookkeeping only.
    pub fn apply_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        let geometry: Vec<(String, CarouselOptions)> = self
            .deck
            .rows
            .iter()
            .map(|row| (row.id.clone(), self.carousel_options_for(row)))
            .collect();
        for (id, options) in geometry {
            if let Some(controller) = self.controllers.get_mut(&id) {
                controller.set_geometry(options.slide_width, options.gap);
            }
        }
    }

    /// Materialize images for slides that just entered a load window.
    ///
    /// Idempotent per slide: once a slide's image is loaded it stays
    /// loaded. With images disabled, deferred sources stay untouched.
    pub fn materialize_pending_images(&mut self) {
        if !self.images_enabled {
            return;
        }
        let Some(picker) = &self.picker else { return };
        let font_size = picker.font_size();

        let mut pending: Vec<(String, u16, u16)> = Vec::new();
        for row in &self.deck.rows {
            let Some(controller) = self.controllers.get_mut(&row.id) else {
                continue;
            };
            let newly_windowed = controller.take_pending_loads();
            if newly_windowed.is_empty() {
                continue;
            }
            let image_cols = (self.slide_width_override.or(row.slide_width))
                .unwrap_or(DEFAULT_SLIDE_WIDTH)
                .saturating_sub(2);
            let image_rows = CARD_HEIGHT.saturating_sub(3);
            for index in newly_windowed {
                if let Some(src) = row.slides.get(index).and_then(|s| s.image.clone()) {
                    pending.push((src, image_cols, image_rows));
                }
            }
        }

        for (src, cols, rows) in pending {
            if self.image_protocols.contains_key(&src) {
                continue;
            }
            let Some(img) = self.loader.load(&src) else {
                continue;
            };
            let target_w_px = u32::from(cols) * u32::from(font_size.0);
            let target_h_px = u32::from(rows) * u32::from(font_size.1);
            let scaled = img.resize(
                target_w_px.max(1),
                target_h_px.max(1),
                image::imageops::FilterType::CatmullRom,
            );
            let protocol = picker.new_resize_protocol(scaled);
            crate::perf::log_event(
                "image.materialize",
                format!("src={src} cols={cols} rows={rows}"),
            );
            self.image_protocols.insert(src, (protocol, cols, rows));
        }
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

fn options_for(row: &Row, override_width: Option<u16>, terminal_width: u16) -> CarouselOptions {
    let width_cap = terminal_width.saturating_sub(2 * ARROW_GUTTER + 2).max(8);
    let slide_width = override_width
        .or(row.slide_width)
        .unwrap_or(DEFAULT_SLIDE_WIDTH)
        .clamp(8, width_cap);
    CarouselOptions {
        slide_width,
        gap: SLIDE_GAP,
        arrows: row.arrows,
        dots: row.dots,
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            deck: Deck {
                title: None,
                rows: Vec::new(),
            },
            deck_path: PathBuf::new(),
            base_dir: PathBuf::from("."),
            registry: CarouselRegistry::new(),
            controllers: HashMap::new(),
            focused_row: 0,
            watch_enabled: false,
            images_enabled: true,
            should_quit: false,
            terminal_size: (80, 24),
            slide_width_override: None,
            picker: None,
            image_protocols: HashMap::new(),
            loader: SlideImageLoader::new(PathBuf::from(".")),
            toast: None,
        }
    }
}
