//! Bundling settings.
//!
//! Settings are written by the options surface and read here under the same
//! camelCase keys. Every key is optional; missing keys take the defaults.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// User settings consumed by the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// When true, `labels` lists labels to exclude; otherwise labels to include.
    pub exclude: bool,
    /// Label names, matched case-insensitively.
    pub labels: Vec<String>,
    /// Whether to insert Today/Yesterday/... dividers.
    pub group_messages_by_date: bool,
    /// Whether bundle headers take the label chip's colors.
    pub use_label_colors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exclude: true,
            labels: Vec::new(),
            group_messages_by_date: true,
            use_label_colors: true,
        }
    }
}

impl Settings {
    /// The configured label names, lowercased.
    pub fn label_set(&self) -> HashSet<String> {
        self.labels.iter().map(|l| l.to_lowercase()).collect()
    }
}

/// Shared, eventually consistent settings handle.
///
/// Starts out at [`Settings::default`]; a background load replaces the
/// contents once the store answers. Readers take a snapshot per use.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    /// Creates a handle holding the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle holding the given settings.
    pub fn with(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Returns a copy of the current settings.
    pub fn snapshot(&self) -> Settings {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replaces the current settings.
    pub fn replace(&self, settings: Settings) {
        match self.inner.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
    }
}
