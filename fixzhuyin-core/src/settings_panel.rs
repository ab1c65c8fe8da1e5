//! Hotkey settings panel
//!
//! Holds an editable copy of the host's [`HotkeySettings`] while the panel
//! is open, plus the host-provided description of the active hotkey and a
//! transient save feedback message.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hotkey::{HotkeySettings, KeyCode, Settings};

/// Default time the "saved" message stays up
pub const SAVED_FEEDBACK: Duration = Duration::from_millis(2000);
/// Default time the "save failed" message stays up
pub const FAILED_FEEDBACK: Duration = Duration::from_millis(2500);

/// Which modifiers the form lets the user change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModifierPolicy {
    /// Ctrl, Shift and Alt are independent toggles
    #[default]
    Editable,
    /// Always Ctrl alone; only the key code is chosen
    FixedCtrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Saved,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
}

/// Token identifying one shown feedback message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackToken(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsView {
    pub visible: bool,
    pub form: HotkeySettings,
    pub modifiers_editable: bool,
    /// (code, label) pairs for the key selector
    pub codes: Vec<(&'static str, &'static str)>,
    pub hotkey_display: String,
    pub feedback: Option<Feedback>,
}

#[derive(Debug)]
pub struct SettingsPanel {
    visible: bool,
    policy: ModifierPolicy,
    form: HotkeySettings,
    display: String,
    feedback: Option<Feedback>,
    generation: u64,
    /// The form was edited since it was last filled from the host
    edited: bool,
}

impl SettingsPanel {
    pub fn new(policy: ModifierPolicy) -> Self {
        Self {
            visible: false,
            policy,
            form: HotkeySettings::default(),
            display: String::new(),
            feedback: None,
            generation: 0,
            edited: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn policy(&self) -> ModifierPolicy {
        self.policy
    }

    pub fn form(&self) -> &HotkeySettings {
        &self.form
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    /// Show the panel and drop any earlier feedback
    pub fn open(&mut self) {
        self.visible = true;
        self.feedback = None;
        self.edited = false;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Populate the form from the host's current settings
    pub fn load(&mut self, settings: &Settings) {
        self.form = settings.hotkey.clone();
        self.edited = false;
        if self.policy == ModifierPolicy::FixedCtrl {
            self.form.ctrl = true;
            self.form.shift = false;
            self.form.alt = false;
        }
    }

    /// Like [`load`](Self::load), but keeps the form if the user has edited
    /// it. Returns whether the form was replaced.
    pub fn refresh(&mut self, settings: &Settings) -> bool {
        if self.edited {
            return false;
        }
        self.load(settings);
        true
    }

    pub fn set_display(&mut self, display: impl Into<String>) {
        self.display = display.into();
    }

    /// Toggle a modifier checkbox. Returns false when the policy locks it.
    pub fn set_modifier(&mut self, modifier: Modifier, on: bool) -> bool {
        if self.policy == ModifierPolicy::FixedCtrl {
            return false;
        }
        match modifier {
            Modifier::Ctrl => self.form.ctrl = on,
            Modifier::Shift => self.form.shift = on,
            Modifier::Alt => self.form.alt = on,
        }
        self.edited = true;
        true
    }

    /// Pick the key code from the selector
    pub fn select_code(&mut self, code: &str) -> Result<()> {
        let key: KeyCode = code.parse()?;
        self.form.code = key.code().to_string();
        self.edited = true;
        Ok(())
    }

    /// Settings to submit, built from the form fields
    pub fn draft(&self) -> Settings {
        let hotkey = match self.policy {
            ModifierPolicy::Editable => self.form.clone(),
            ModifierPolicy::FixedCtrl => HotkeySettings {
                ctrl: true,
                shift: false,
                alt: false,
                code: self.form.code.clone(),
            },
        };
        Settings { hotkey }
    }

    /// Record a successful save; `display` is the refreshed hotkey description
    pub fn save_succeeded(&mut self, display: impl Into<String>) -> FeedbackToken {
        self.display = display.into();
        // The host now holds what the form shows
        self.edited = false;
        self.show_feedback(FeedbackKind::Saved, "Settings saved".to_string())
    }

    /// Record a rejected save; the display string stays as it was
    pub fn save_failed(&mut self, reason: &str) -> FeedbackToken {
        let text = if reason.is_empty() {
            "Save failed, please try again".to_string()
        } else {
            format!("Save failed: {}", reason)
        };
        self.show_feedback(FeedbackKind::Failed, text)
    }

    /// Hide the feedback if `token` still names the current message
    pub fn expire_feedback(&mut self, token: FeedbackToken) -> bool {
        if token.0 != self.generation || self.feedback.is_none() {
            return false;
        }
        self.feedback = None;
        true
    }

    pub fn view(&self) -> SettingsView {
        SettingsView {
            visible: self.visible,
            form: self.form.clone(),
            modifiers_editable: self.policy == ModifierPolicy::Editable,
            codes: KeyCode::ALL.iter().map(|k| (k.code(), k.label())).collect(),
            hotkey_display: self.display.clone(),
            feedback: self.feedback.clone(),
        }
    }

    fn show_feedback(&mut self, kind: FeedbackKind, text: String) -> FeedbackToken {
        self.generation += 1;
        self.feedback = Some(Feedback { kind, text });
        FeedbackToken(self.generation)
    }
}

impl Default for SettingsPanel {
    fn default() -> Self {
        Self::new(ModifierPolicy::default())
    }
}
