//! Date divider types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Date range a divider introduces, ordered from most to least recent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DividerKind {
    /// Messages from today.
    Today,
    /// Messages from yesterday.
    Yesterday,
    /// Earlier this month (used when yesterday is still in the current month).
    ThisMonth,
    /// Last month (used when yesterday already belongs to the previous month).
    LastMonth,
    /// Everything older.
    Earlier,
}

impl DividerKind {
    /// Text shown on the divider row.
    pub fn text(&self) -> &'static str {
        match self {
            DividerKind::Today => "Today",
            DividerKind::Yesterday => "Yesterday",
            DividerKind::ThisMonth => "This month",
            DividerKind::LastMonth => "Last month",
            DividerKind::Earlier => "Earlier",
        }
    }
}

/// A date divider: the section kind plus the exclusive upper bound of the
/// section (host-local time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divider {
    /// Which section this divider opens.
    pub kind: DividerKind,
    /// Messages strictly before this instant belong to the section or older.
    pub end: NaiveDateTime,
}

impl Divider {
    /// Text shown on the divider row.
    pub fn text(&self) -> &'static str {
        self.kind.text()
    }
}
