// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor preferences.
//!
//! The session only needs a handful of values (the last opened document,
//! whether autosave starts enabled, the autosave interval) and reaches them
//! through [`SettingsStore`]. The file-backed store keeps them in a RON file.

use crate::store::DocumentRef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "dialogue_settings.ron";

/// Ticks between autosaves unless configured otherwise
pub const DEFAULT_AUTOSAVE_INTERVAL_TICKS: u32 = 120;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing RON failed
    #[error("RON serialization error: {0}")]
    Encode(#[from] ron::Error),

    /// Reading RON failed
    #[error("RON parse error: {0}")]
    Decode(#[from] ron::error::SpannedError),

    /// Written by a newer version of the editor
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },
}

/// Persisted editor preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Format version
    pub version: u32,
    /// Whether autosave starts enabled
    #[serde(default = "default_true")]
    pub auto_save_default: bool,
    /// Document to reopen on startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_open_document: Option<DocumentRef>,
    /// Ticks between autosaves
    #[serde(default = "default_interval")]
    pub autosave_interval_ticks: u32,
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u32 {
    DEFAULT_AUTOSAVE_INTERVAL_TICKS
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            auto_save_default: true,
            last_open_document: None,
            autosave_interval_ticks: DEFAULT_AUTOSAVE_INTERVAL_TICKS,
        }
    }
}

impl EditorSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: EditorSettings = ron::from_str(&content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to read settings {:?}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        let content = ron::ser::to_string_pretty(self, config)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Opaque access to the host's preferences
pub trait SettingsStore {
    /// Document to reopen on startup
    fn last_open_document(&self) -> Option<DocumentRef>;

    /// Record the document being edited
    fn set_last_open_document(&mut self, doc: Option<DocumentRef>);

    /// Whether autosave starts enabled
    fn auto_save_default(&self) -> bool;

    /// Ticks between autosaves
    fn autosave_interval_ticks(&self) -> u32;

    /// Write pending changes
    fn persist(&mut self) -> Result<(), SettingsError>;
}

/// Settings kept in a RON file
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
    settings: EditorSettings,
}

impl FileSettingsStore {
    /// Open the settings file in `dir`, using defaults if it does not exist yet
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE_NAME);
        let settings = EditorSettings::load_or_default(&path);
        Self { path, settings }
    }

    /// Current values
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Mutable values; call [`SettingsStore::persist`] to write them
    pub fn settings_mut(&mut self) -> &mut EditorSettings {
        &mut self.settings
    }

    /// Settings file location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn last_open_document(&self) -> Option<DocumentRef> {
        self.settings.last_open_document.clone()
    }

    fn set_last_open_document(&mut self, doc: Option<DocumentRef>) {
        self.settings.last_open_document = doc;
    }

    fn auto_save_default(&self) -> bool {
        self.settings.auto_save_default
    }

    fn autosave_interval_ticks(&self) -> u32 {
        self.settings.autosave_interval_ticks
    }

    fn persist(&mut self) -> Result<(), SettingsError> {
        self.settings.save(&self.path)
    }
}

/// Settings held in memory only
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    /// Current values
    pub settings: EditorSettings,
    /// Number of times [`SettingsStore::persist`] was called
    pub persist_count: usize,
}

impl MemorySettingsStore {
    /// Wrap existing settings
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            settings,
            persist_count: 0,
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn last_open_document(&self) -> Option<DocumentRef> {
        self.settings.last_open_document.clone()
    }

    fn set_last_open_document(&mut self, doc: Option<DocumentRef>) {
        self.settings.last_open_document = doc;
    }

    fn auto_save_default(&self) -> bool {
        self.settings.auto_save_default
    }

    fn autosave_interval_ticks(&self) -> u32 {
        self.settings.autosave_interval_ticks
    }

    fn persist(&mut self) -> Result<(), SettingsError> {
        self.persist_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert!(settings.auto_save_default);
        assert!(settings.last_open_document.is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileSettingsStore::open(tmp.path());
        assert_eq!(store.settings(), &EditorSettings::default());

        store.settings_mut().auto_save_default = false;
        store.set_last_open_document(Some(DocumentRef::new("Intro", "Intro.ron")));
        store.persist().unwrap();

        let reopened = FileSettingsStore::open(tmp.path());
        assert!(!reopened.auto_save_default());
        assert_eq!(
            reopened.last_open_document(),
            Some(DocumentRef::new("Intro", "Intro.ron"))
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: EditorSettings = ron::from_str("(version: 1)").unwrap();
        assert!(settings.auto_save_default);
        assert_eq!(settings.autosave_interval_ticks, DEFAULT_AUTOSAVE_INTERVAL_TICKS);
    }

    #[test]
    fn test_newer_version_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "(version: 7)").unwrap();
        assert!(matches!(
            EditorSettings::load(&path),
            Err(SettingsError::UnsupportedVersion { found: 7, .. })
        ));
        assert_eq!(EditorSettings::load_or_default(&path), EditorSettings::default());
    }
}
