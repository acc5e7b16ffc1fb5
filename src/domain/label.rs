//! Label chip types.
//!
//! A label chip is the small tag the host renders on a message row. Bundles
//! are keyed by the chip's title.

use serde::{Deserialize, Serialize};

/// Presentation captured from a label chip the first time its bundle is seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStyle {
    /// Chip background color (CSS color string).
    pub background: Option<String>,
    /// Chip text color (CSS color string).
    pub color: Option<String>,
    /// Chip border (CSS shorthand).
    pub border: Option<String>,
}

impl LabelStyle {
    /// Returns whether no presentation attribute was captured.
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.color.is_none() && self.border.is_none()
    }
}

/// A label chip on a message row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelChip {
    /// Display title of the label, e.g. "Trips" or "Work/Clients".
    pub title: String,
    /// Chip presentation as rendered by the host.
    #[serde(default)]
    pub style: LabelStyle,
}

impl LabelChip {
    /// Creates an unstyled chip.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            style: LabelStyle::default(),
        }
    }

    /// Sets the chip presentation.
    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }
}
