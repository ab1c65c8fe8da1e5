//! Messages exchanged with the host shell
//!
//! Inbound events are pushed by the host with a JSON payload. Outbound
//! commands are dispatched by name; the host owns their implementation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hotkey::Settings;

pub const SHOW_CANDIDATES: &str = "show-candidates";
pub const OPEN_SETTINGS: &str = "open-settings";
pub const SHOW_IME_HINT: &str = "show-ime-hint";

/// Names of every inbound event the page listens to
pub const EVENT_NAMES: [&str; 3] = [SHOW_CANDIDATES, OPEN_SETTINGS, SHOW_IME_HINT];

/// Screen coordinates reported with a candidate list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowCandidates {
    pub origin: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ShowCandidates(ShowCandidates),
    OpenSettings,
    ShowImeHint,
}

impl HostEvent {
    /// Decode an event from its name and JSON payload.
    ///
    /// Payload-less events ignore whatever payload they carry.
    pub fn from_json(name: &str, payload: &str) -> Result<Self> {
        match name {
            SHOW_CANDIDATES => serde_json::from_str(payload)
                .map(HostEvent::ShowCandidates)
                .map_err(|source| Error::InvalidPayload {
                    event: SHOW_CANDIDATES,
                    source,
                }),
            OPEN_SETTINGS => Ok(HostEvent::OpenSettings),
            SHOW_IME_HINT => Ok(HostEvent::ShowImeHint),
            other => Err(Error::UnknownEvent(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::ShowCandidates(_) => SHOW_CANDIDATES,
            HostEvent::OpenSettings => OPEN_SETTINGS,
            HostEvent::ShowImeHint => SHOW_IME_HINT,
        }
    }
}

/// Outbound command names understood by the host
pub mod command {
    pub const GET_SETTINGS: &str = "get_settings";
    pub const SET_SETTINGS: &str = "set_settings";
    pub const REPLACE_WITH: &str = "replace_with";
    pub const GET_HOTKEY_DISPLAY: &str = "get_hotkey_display";
}

/// Arguments of `set_settings`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSettingsArgs {
    pub new_settings: Settings,
}

/// Arguments of `replace_with`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceWithArgs {
    pub text: String,
}
