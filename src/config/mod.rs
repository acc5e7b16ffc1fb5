//! Configuration and settings management.
//!
//! This module provides the bundling settings and the stores they are read
//! from. Settings are stored by the options surface as JSON.

mod settings;
mod store;

pub use settings::{Settings, SharedSettings};
pub use store::{JsonSettingsStore, MemorySettingsStore, SettingsError, SettingsStore};

#[cfg(test)]
pub use store::MockSettingsStore;
