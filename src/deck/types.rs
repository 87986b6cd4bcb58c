use serde::{Deserialize, Serialize};

/// A deck file: the set of carousel rows to bring under control.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Deck {
    /// Optional deck title shown in the status bar.
    #[serde(default)]
    pub title: Option<String>,
    /// Carousel rows, in display order.
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Deck {
    /// Look up a row by id.
    pub fn row(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }
}

/// One carousel root: an ordered, fixed set of slides plus optional
/// controls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Row {
    /// Stable identity used by the registry to avoid double-binding.
    pub id: String,
    /// Optional heading rendered above the row.
    #[serde(default)]
    pub title: Option<String>,
    /// Whether the row has prev/next controls.
    #[serde(default = "default_true")]
    pub arrows: bool,
    /// Whether the row has progress dots.
    #[serde(default = "default_true")]
    pub dots: bool,
    /// Preferred slide width in columns; clamped to the terminal.
    #[serde(default)]
    pub slide_width: Option<u16>,
    /// Slides in track order. May be empty (the row renders nothing).
    #[serde(default)]
    pub slides: Vec<Slide>,
}

/// One slide. The image path is a deferred source: nothing is read from
/// disk until the slide enters a controller's load window.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Slide {
    /// Caption rendered at the bottom of the card.
    #[serde(default)]
    pub caption: Option<String>,
    /// Image path, relative to the deck file's directory.
    #[serde(default)]
    pub image: Option<String>,
}

const fn default_true() -> bool {
    true
}
