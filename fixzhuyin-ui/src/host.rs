//! Outbound requests to the host shell
//!
//! The host owns settings persistence, hotkey registration and text
//! insertion. This module only describes the calls and adapts a generic
//! command dispatcher into typed methods.

use fixzhuyin_core::event::{command, ReplaceWithArgs, SetSettingsArgs};
use fixzhuyin_core::Settings;
use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A host command that failed. The host reports failures as plain strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{command} failed: {message}")]
pub struct HostError {
    pub command: &'static str,
    pub message: String,
}

impl HostError {
    pub fn new(command: &'static str, message: impl Into<String>) -> Self {
        Self {
            command,
            message: message.into(),
        }
    }
}

pub trait Host: Send + Sync {
    /// Current settings as stored by the host
    fn get_settings(&self) -> BoxFuture<'_, Result<Settings, HostError>>;

    /// Persist settings and re-register the hotkey. Fails when the hotkey
    /// is already claimed by another program.
    fn set_settings(&self, settings: Settings) -> BoxFuture<'_, Result<(), HostError>>;

    /// Put `text` in place of the text being corrected
    fn replace_with(&self, text: String) -> BoxFuture<'_, Result<(), HostError>>;

    /// Human readable description of the active hotkey
    fn get_hotkey_display(&self) -> BoxFuture<'_, Result<String, HostError>>;
}

/// Generic command dispatch, as offered by webview shells
pub trait Invoke: Send + Sync {
    fn invoke(&self, command: &'static str, args: Value) -> BoxFuture<'_, Result<Value, String>>;
}

/// [`Host`] over any [`Invoke`] implementation, using the host's argument names
pub struct CommandHost<I> {
    invoker: I,
}

impl<I: Invoke> CommandHost<I> {
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    async fn call<T: DeserializeOwned>(&self, command: &'static str, args: Value) -> Result<T, HostError> {
        let value = self
            .invoker
            .invoke(command, args)
            .await
            .map_err(|e| HostError::new(command, e))?;
        serde_json::from_value(value)
            .map_err(|e| HostError::new(command, format!("unexpected response: {}", e)))
    }
}

fn to_args<T: serde::Serialize>(command: &'static str, args: &T) -> Result<Value, HostError> {
    serde_json::to_value(args).map_err(|e| HostError::new(command, e.to_string()))
}

impl<I: Invoke> Host for CommandHost<I> {
    fn get_settings(&self) -> BoxFuture<'_, Result<Settings, HostError>> {
        self.call(command::GET_SETTINGS, Value::Null).boxed()
    }

    fn set_settings(&self, settings: Settings) -> BoxFuture<'_, Result<(), HostError>> {
        async move {
            let args = to_args(command::SET_SETTINGS, &SetSettingsArgs { new_settings: settings })?;
            self.call(command::SET_SETTINGS, args).await
        }
        .boxed()
    }

    fn replace_with(&self, text: String) -> BoxFuture<'_, Result<(), HostError>> {
        async move {
            let args = to_args(command::REPLACE_WITH, &ReplaceWithArgs { text })?;
            self.call(command::REPLACE_WITH, args).await
        }
        .boxed()
    }

    fn get_hotkey_display(&self) -> BoxFuture<'_, Result<String, HostError>> {
        self.call(command::GET_HOTKEY_DISPLAY, Value::Null).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(&'static str, Value)>>,
    }

    impl Invoke for Recorder {
        fn invoke(&self, command: &'static str, args: Value) -> BoxFuture<'_, Result<Value, String>> {
            self.calls.lock().unwrap().push((command, args.clone()));
            let reply = match command {
                "get_settings" => Ok(json!({
                    "hotkey": { "ctrl": true, "shift": true, "alt": false, "code": "KeyK" }
                })),
                "get_hotkey_display" => Ok(json!("Ctrl+Shift+K")),
                "set_settings" => Err("hotkey already registered".to_string()),
                _ => Ok(Value::Null),
            };
            async move { reply }.boxed()
        }
    }

    #[tokio::test]
    async fn test_typed_calls_decode_responses() {
        let host = CommandHost::new(Recorder::default());
        let settings = host.get_settings().await.unwrap();
        assert!(settings.hotkey.shift);
        assert_eq!(settings.hotkey.code, "KeyK");
        assert_eq!(host.get_hotkey_display().await.unwrap(), "Ctrl+Shift+K");
    }

    #[tokio::test]
    async fn test_arguments_use_host_names() {
        let host = CommandHost::new(Recorder::default());
        host.replace_with("tech".to_string()).await.unwrap();
        let _ = host.set_settings(Settings::default()).await;

        let calls = host.invoker.calls.lock().unwrap();
        assert_eq!(calls[0], ("replace_with", json!({ "text": "tech" })));
        assert_eq!(calls[1].0, "set_settings");
        assert_eq!(calls[1].1["newSettings"]["hotkey"]["code"], json!("Semicolon"));
    }

    #[tokio::test]
    async fn test_host_error_carries_command() {
        let host = CommandHost::new(Recorder::default());
        let err = host.set_settings(Settings::default()).await.unwrap_err();
        assert_eq!(err, HostError::new("set_settings", "hotkey already registered"));
        assert_eq!(err.to_string(), "set_settings failed: hotkey already registered");
    }
}
