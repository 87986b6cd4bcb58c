//! Deck parsing and validation.

use std::collections::HashSet;

use super::types::Deck;

/// Errors from reading or validating a deck file.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("failed to read deck file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid deck JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("row {position} has an empty id")]
    EmptyRowId { position: usize },
    #[error("duplicate row id {id:?}")]
    DuplicateRowId { id: String },
}

/// Parse and validate a deck from JSON text.
///
/// # Errors
///
/// Returns [`DeckError`] for malformed JSON, an empty row id, or a
/// duplicated row id. Rows with zero slides are valid: their controllers
/// come up inert.
pub fn parse_deck(text: &str) -> Result<Deck, DeckError> {
    let deck: Deck = serde_json::from_str(text)?;
    validate(&deck)?;
    Ok(deck)
}

fn validate(deck: &Deck) -> Result<(), DeckError> {
    let mut seen = HashSet::new();
    for (position, row) in deck.rows.iter().enumerate() {
        if row.id.trim().is_empty() {
            return Err(DeckError::EmptyRowId { position });
        }
        if !seen.insert(row.id.as_str()) {
            return Err(DeckError::DuplicateRowId {
                id: row.id.clone(),
            });
        }
    }
    Ok(())
}
