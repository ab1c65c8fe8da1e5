//! Hotkey settings and their textual representations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Key codes the host is able to register as the global hotkey.
///
/// The string form matches the DOM `KeyboardEvent.code` names the host
/// expects in [`HotkeySettings::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Semicolon,
    KeyJ,
    KeyK,
    KeyL,
}

impl KeyCode {
    /// Every supported code, in the order the settings form lists them
    pub const ALL: [KeyCode; 4] = [
        KeyCode::Semicolon,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
    ];

    /// Code name as sent to the host
    pub fn code(self) -> &'static str {
        match self {
            KeyCode::Semicolon => "Semicolon",
            KeyCode::KeyJ => "KeyJ",
            KeyCode::KeyK => "KeyK",
            KeyCode::KeyL => "KeyL",
        }
    }

    /// Short label used in hotkey descriptions
    pub fn label(self) -> &'static str {
        match self {
            KeyCode::Semicolon => ";",
            KeyCode::KeyJ => "J",
            KeyCode::KeyK => "K",
            KeyCode::KeyL => "L",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }
}

impl FromStr for KeyCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s).ok_or_else(|| Error::UnsupportedKeyCode(s.to_string()))
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One keyboard shortcut, in the shape the host stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeySettings {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Key code name, e.g. "Semicolon" or "KeyJ"
    pub code: String,
}

impl HotkeySettings {
    /// A Ctrl-only shortcut on the given key
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            ctrl: true,
            shift: false,
            alt: false,
            code: code.code().to_string(),
        }
    }

    /// Resolve `code` against the supported key codes
    pub fn key_code(&self) -> Result<KeyCode> {
        self.code.parse()
    }

    /// Parse a hotkey string like "CTRL+SHIFT+K" or "ctrl ;"
    ///
    /// # Examples
    /// ```
    /// use fixzhuyin_core::hotkey::HotkeySettings;
    ///
    /// let hotkey = HotkeySettings::parse("ctrl+shift+k").unwrap();
    /// assert!(hotkey.ctrl);
    /// assert!(hotkey.shift);
    /// assert_eq!(hotkey.code, "KeyK");
    /// ```
    pub fn parse(hotkey_str: &str) -> Result<Self> {
        if hotkey_str.trim().is_empty() {
            return Err(Error::ParseError("Empty hotkey string".to_string()));
        }

        let parts: Vec<String> = hotkey_str
            .split(|c| c == '+' || c == ' ')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            return Err(Error::ParseError("No valid components in hotkey string".to_string()));
        }

        let mut ctrl = false;
        let mut alt = false;
        let mut shift = false;
        let mut key: Option<KeyCode> = None;

        for part in parts {
            match part.as_str() {
                "CTRL" | "CONTROL" => ctrl = true,
                "ALT" | "OPTION" => alt = true,
                "SHIFT" => shift = true,
                "META" | "CMD" | "COMMAND" | "WIN" | "SUPER" => {
                    return Err(Error::ParseError("Meta modifier cannot be registered".to_string()));
                }
                _ => {
                    if key.is_some() {
                        return Err(Error::ParseError(format!("Multiple keys specified: {:?}", part)));
                    }
                    key = Some(parse_key(&part)?);
                }
            }
        }

        match key {
            Some(k) => Ok(HotkeySettings {
                ctrl,
                shift,
                alt,
                code: k.code().to_string(),
            }),
            None => Err(Error::ParseError("No key specified in hotkey".to_string())),
        }
    }
}

impl Default for HotkeySettings {
    fn default() -> Self {
        Self::ctrl(KeyCode::Semicolon)
    }
}

impl fmt::Display for HotkeySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        // Codes the form does not know are shown raw
        match KeyCode::from_code(&self.code) {
            Some(k) => f.write_str(k.label()),
            None => f.write_str(&self.code),
        }
    }
}

/// Settings record exchanged with the host through `get_settings` / `set_settings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub hotkey: HotkeySettings,
}

/// Parse an uppercased key token to a supported KeyCode
fn parse_key(key_str: &str) -> Result<KeyCode> {
    match key_str {
        ";" | "SEMICOLON" => Ok(KeyCode::Semicolon),
        "J" | "KEYJ" => Ok(KeyCode::KeyJ),
        "K" | "KEYK" => Ok(KeyCode::KeyK),
        "L" | "KEYL" => Ok(KeyCode::KeyL),
        _ => Err(Error::UnsupportedKeyCode(key_str.to_string())),
    }
}
