//! Deck model: the JSON description of carousel rows and slides.
//!
//! A deck file is the contract between content and the carousel layer:
//! each row is a carousel root the registry may bind, and each slide's
//! `image` field is a deferred source that stays untouched until the slide
//! enters a controller's lazy-load window.

mod parser;
mod types;

pub use parser::{DeckError, parse_deck};
pub use types::{Deck, Row, Slide};

use std::path::Path;

impl Deck {
    /// Read and validate a deck file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError`] if the file cannot be read or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeckError> {
        let text = std::fs::read_to_string(path)?;
        parse_deck(&text)
    }
}
