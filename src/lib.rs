// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. deck::DeckError)
    clippy::module_name_repetitions
)]

//! # Reel
//!
//! A terminal carousel viewer for JSON slide decks.
//!
//! Reel renders a deck of carousel rows in the terminal with:
//! - Drag, wheel-scroll, and keyboard slide navigation
//! - Inline slide images (Kitty, Sixel, half-block fallback)
//! - Lazy image loading around the focused slide
//! - Deck watching for live reload
//!
//! ## Architecture
//!
//! Reel uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`carousel`]: Per-row controller state machine and root registry
//! - [`deck`]: Deck file parsing and validation
//! - [`ui`]: Terminal UI components
//! - [`image`]: Slide image loading and rendering
//! - [`watcher`]: Deck file watching

pub mod app;
pub mod carousel;
pub mod config;
pub mod deck;
pub mod image;
pub mod perf;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::carousel::{CarouselController, CarouselOptions, CarouselRegistry};
    pub use crate::deck::Deck;
}
