//! Bundle domain types.
//!
//! A bundle groups the messages of one label into a single collapsible row.
//! Bundles are rebuilt from scratch on every bundling cycle and never
//! mutated afterwards; rendering wraps them in [`RenderedBundle`].

use super::{LabelStyle, MessageRow, RowId};

/// Member counts at or above this are shown as `25+`.
pub const MAX_DISPLAYED_COUNT: usize = 25;

/// Messages sharing one label, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    label: String,
    style: LabelStyle,
    messages: Vec<MessageRow>,
}

impl Bundle {
    /// Creates a bundle. `messages` must be non-empty and in scan order.
    pub fn new(label: impl Into<String>, style: LabelStyle, messages: Vec<MessageRow>) -> Self {
        Self {
            label: label.into(),
            style,
            messages,
        }
    }

    /// The label title this bundle is keyed by.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Chip presentation captured at the label's first occurrence.
    pub fn style(&self) -> &LabelStyle {
        &self.style
    }

    /// Member messages in scan order.
    pub fn messages(&self) -> &[MessageRow] {
        &self.messages
    }

    /// The topmost (most recent) member.
    pub fn latest_message(&self) -> Option<&MessageRow> {
        self.messages.first()
    }

    /// Whether any member is unread.
    pub fn has_unread(&self) -> bool {
        self.messages.iter().any(|m| m.unread)
    }

    /// Whether the row with the given id is a member.
    pub fn contains(&self, id: &RowId) -> bool {
        self.messages.iter().any(|m| &m.id == id)
    }

    /// Member count as shown in the header, capped at `25+`.
    pub fn display_count(&self) -> String {
        if self.messages.len() >= MAX_DISPLAYED_COUNT {
            format!("{MAX_DISPLAYED_COUNT}+")
        } else {
            self.messages.len().to_string()
        }
    }
}

/// A bundle after rendering: its header row and visual order base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBundle {
    /// The bundle itself.
    pub bundle: Bundle,
    /// Visual order of the header row; members open at `order + k + 1`.
    pub order: u32,
    /// Id of the synthesized header row.
    pub header: RowId,
}

impl RenderedBundle {
    /// The label title.
    pub fn label(&self) -> &str {
        self.bundle.label()
    }

    /// Member messages in scan order.
    pub fn messages(&self) -> &[MessageRow] {
        self.bundle.messages()
    }
}
