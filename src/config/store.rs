//! Settings persistence.
//!
//! The bundler only reads settings. Reads are asynchronous and happen once
//! per consumer; until they complete the defaults apply.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use directories::ProjectDirs;
use thiserror::Error;

use super::{Settings, SharedSettings};

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No config directory available on this platform")]
    NoConfigDir,
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Key-value store the settings are read from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Loads the settings, applying defaults for missing keys.
    async fn load(&self) -> Result<Settings>;
}

/// Store holding a fixed settings value.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    settings: Settings,
}

impl MemorySettingsStore {
    /// Creates a store that always answers with `settings`.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }
}

/// Store backed by a JSON file.
///
/// A missing file is not an error; it yields the defaults.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    /// Creates a store reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at `settings.json` in the platform config directory.
    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "inboxy").ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join("settings.json")))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn load(&self) -> Result<Settings> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
                Ok(Settings::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl SharedSettings {
    /// Loads settings from `store` into this handle.
    ///
    /// On failure the handle keeps its current contents.
    pub async fn load_from(&self, store: &dyn SettingsStore) -> Result<()> {
        let settings = store.load().await?;
        tracing::debug!(
            exclude = settings.exclude,
            labels = settings.labels.len(),
            group_by_date = settings.group_messages_by_date,
            "settings loaded"
        );
        self.replace(settings);
        Ok(())
    }
}
