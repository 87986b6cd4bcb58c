//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    deck_path: PathBuf,
    watch_enabled: bool,
    images_enabled: bool,
    force_half_cell: bool,
    slide_width: Option<u16>,
}

impl App {
    /// Create a new application for the given deck file.
    pub fn new(deck_path: PathBuf) -> Self {
        Self {
            deck_path,
            watch_enabled: false,
            images_enabled: true,
            force_half_cell: false,
            slide_width: None,
        }
    }

    /// Enable or disable deck watching.
    pub fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Enable or disable inline image rendering.
    pub fn with_images_enabled(mut self, enabled: bool) -> Self {
        self.images_enabled = enabled;
        self
    }

    /// Force half-cell image rendering, bypassing protocol detection.
    pub const fn with_force_half_cell(mut self, force: bool) -> Self {
        self.force_half_cell = force;
        self
    }

    /// Override every row's slide width.
    pub const fn with_slide_width(mut self, width: Option<u16>) -> Self {
        self.slide_width = width;
        self
    }
}
