//! Message row snapshot.
//!
//! The host owns message rows; the bundler only ever sees this scraped,
//! read-only view of one row plus its id for writing order and classes back.

use serde::{Deserialize, Serialize};

use super::{LabelChip, RowId};

/// Snapshot of one message row in the list container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRow {
    /// Host element id of the row.
    pub id: RowId,
    /// Label chips in DOM order.
    #[serde(default)]
    pub labels: Vec<LabelChip>,
    /// Whether the star toggle is on.
    #[serde(default)]
    pub starred: bool,
    /// Whether the host renders the row as unread.
    #[serde(default)]
    pub unread: bool,
    /// Raw date string as formatted by the host (the date cell's title).
    #[serde(default)]
    pub date: String,
    /// Whether the row shows the host's snoozed marker.
    #[serde(default)]
    pub snoozed: bool,
    /// Whether the row is selected (checkbox checked).
    #[serde(default)]
    pub selected: bool,
}

impl MessageRow {
    /// Creates a read, unstarred, unlabeled row.
    pub fn new(id: impl Into<RowId>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: Vec::new(),
            starred: false,
            unread: false,
            date: date.into(),
            snoozed: false,
            selected: false,
        }
    }

    /// Adds unstyled label chips with the given titles.
    pub fn with_labels<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(titles.into_iter().map(LabelChip::new));
        self
    }

    /// Adds a styled label chip.
    pub fn with_chip(mut self, chip: LabelChip) -> Self {
        self.labels.push(chip);
        self
    }

    /// Marks the row starred.
    pub fn starred(mut self) -> Self {
        self.starred = true;
        self
    }

    /// Marks the row unread.
    pub fn unread(mut self) -> Self {
        self.unread = true;
        self
    }

    /// Marks the row snoozed.
    pub fn snoozed(mut self) -> Self {
        self.snoozed = true;
        self
    }

    /// Marks the row selected.
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Titles of the row's label chips in DOM order.
    pub fn label_titles(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.title.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_flags() {
        let row = MessageRow::new("m1", "Sun, Mar 15, 2020, 9:00 AM")
            .with_labels(["Bank", "Trips"])
            .starred()
            .unread();

        assert_eq!(row.id, RowId::from("m1"));
        assert!(row.starred);
        assert!(row.unread);
        assert!(!row.snoozed);
        assert_eq!(row.label_titles().collect::<Vec<_>>(), vec!["Bank", "Trips"]);
    }

    #[test]
    fn deserialize_minimal_row() {
        let row: MessageRow = serde_json::from_str(r#"{"id":"m9"}"#).unwrap();
        assert_eq!(row.id.0, "m9");
        assert!(row.labels.is_empty());
        assert!(row.date.is_empty());
    }
}
