//! Core identifier types for list entities.
//!
//! These newtype wrappers keep host row ids and registry keys from being
//! mixed up with label names and other plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a row element in the message list container.
///
/// Message rows carry the host's own element id; header and divider rows
/// synthesized by the bundler get generated ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub String);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Tab name used when the inbox has no category tabs.
pub const NO_TAB: &str = "__NO_TAB";

/// Registry key for one rendered message list: page number plus inbox tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageKey {
    /// 1-based message page number.
    pub page: u32,
    /// Name of the selected inbox tab, or [`NO_TAB`].
    pub tab: String,
}

impl PageKey {
    /// Creates a key, falling back to [`NO_TAB`] when no tab is selected.
    pub fn new(page: u32, tab: Option<&str>) -> Self {
        Self {
            page,
            tab: tab.unwrap_or(NO_TAB).to_owned(),
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}/{}", self.page, self.tab)
    }
}
