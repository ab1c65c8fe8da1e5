//! Small persisted UI flags, such as "never show the IME hint again"

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{Result, UiError};

pub trait FlagStore: Send + Sync {
    /// Read a flag; unset flags are `false`
    fn get(&self, key: &str) -> Result<bool>;
    fn set(&self, key: &str, value: bool) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    flags: BTreeMap<String, bool>,
}

/// Flags kept in a TOML file, by default `<config dir>/fix-zhuyin/ui-state.toml`
pub struct TomlFlagStore {
    path: PathBuf,
}

impl TomlFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(UiError::NoConfigDir)?;
        Ok(dir.join("fix-zhuyin").join("ui-state.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StateFile> {
        if !self.path.exists() {
            return Ok(StateFile::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&contents)?)
    }
}

impl FlagStore for TomlFlagStore {
    fn get(&self, key: &str) -> Result<bool> {
        Ok(self.load()?.flags.get(key).copied().unwrap_or(false))
    }

    fn set(&self, key: &str, value: bool) -> Result<()> {
        let mut state = self.load()?;
        state.flags.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(&state)?)?;
        log::info!("stored flag {} = {} in {}", key, value, self.path.display());
        Ok(())
    }
}

/// Process-local flags, for tests and hosts without a writable config dir
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flags: Mutex<HashMap<String, bool>>,
}

impl MemoryFlagStore {
    pub fn with_flag(key: &str, value: bool) -> Self {
        let store = Self::default();
        store
            .flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        store
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Result<bool> {
        let flags = self.flags.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(flags.get(key).copied().unwrap_or(false))
    }

    fn set(&self, key: &str, value: bool) -> Result<()> {
        self.flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}
