//! Error types for the Fix Zhuyin widget layer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Hotkey parse error: {0}")]
    ParseError(String),

    #[error("Unsupported key code: {0}")]
    UnsupportedKeyCode(String),

    #[error("Unknown host event: {0}")]
    UnknownEvent(String),

    #[error("Invalid payload for '{event}': {source}")]
    InvalidPayload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
