//! UI configuration, read from a TOML file with every field optional

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fixzhuyin_core::hint::FLASH_DURATION;
use fixzhuyin_core::settings_panel::{FAILED_FEEDBACK, SAVED_FEEDBACK};
use fixzhuyin_core::ModifierPolicy;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::TomlFlagStore;

/// Storage key of the "never show the IME hint" flag
pub const HIDE_IME_HINT_KEY: &str = "hideImeHint";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub feedback: FeedbackConfig,
    pub hint: HintConfig,
    pub settings: PanelConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub saved_ms: u64,
    pub failed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintConfig {
    pub flash_ms: u64,
    pub storage_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub modifiers: ModifierPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the flag file location
    pub path: Option<PathBuf>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            saved_ms: SAVED_FEEDBACK.as_millis() as u64,
            failed_ms: FAILED_FEEDBACK.as_millis() as u64,
        }
    }
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            flash_ms: FLASH_DURATION.as_millis() as u64,
            storage_key: HIDE_IME_HINT_KEY.to_string(),
        }
    }
}

impl UiConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn saved_feedback(&self) -> Duration {
        Duration::from_millis(self.feedback.saved_ms)
    }

    pub fn failed_feedback(&self) -> Duration {
        Duration::from_millis(self.feedback.failed_ms)
    }

    pub fn hint_flash(&self) -> Duration {
        Duration::from_millis(self.hint.flash_ms)
    }

    /// Flag file location, configured or the platform default
    pub fn flag_store_path(&self) -> Result<PathBuf> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => TomlFlagStore::default_path(),
        }
    }
}
