//! Rows of the bundled view.
//!
//! The sequencer produces a list of [`Row`]s and the renderer assigns each
//! one a visual order. Only the three kinds below exist, so every consumer
//! matches exhaustively.

use super::{Bundle, Divider, MessageRow};

/// One row of the bundled view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    /// An unbundled message.
    Message(&'a MessageRow),
    /// A bundle header standing in for all of its members.
    Bundle(&'a Bundle),
    /// A date divider.
    Divider(Divider),
}

impl<'a> Row<'a> {
    /// The most recent message the row stands for; `None` for dividers.
    pub fn latest_message(&self) -> Option<&'a MessageRow> {
        match self {
            Row::Message(message) => Some(message),
            Row::Bundle(bundle) => bundle.latest_message(),
            Row::Divider(_) => None,
        }
    }

    /// Whether this row is a divider.
    pub fn is_divider(&self) -> bool {
        matches!(self, Row::Divider(_))
    }
}
