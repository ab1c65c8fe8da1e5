//! Error types for the runtime layer

use thiserror::Error;

use crate::host::HostError;

#[derive(Error, Debug)]
pub enum UiError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("Widget error: {0}")]
    Widget(#[from] fixzhuyin_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("No configuration directory available")]
    NoConfigDir,

    #[error("No async runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

pub type Result<T> = std::result::Result<T, UiError>;
