pub mod error;
pub mod event;
pub mod hint;
pub mod hotkey;
pub mod popup;
pub mod settings_panel;

// Re-export commonly used types
pub use error::{Error, Result};
pub use event::{HostEvent, Position, ShowCandidates};
pub use hint::{FlashToken, HintBanner};
pub use hotkey::{HotkeySettings, KeyCode, Settings};
pub use popup::{CandidatePopup, CandidateRow, CandidateSet, PopupKey, PopupOutcome, PopupView, MAX_CANDIDATES};
pub use settings_panel::{
    Feedback, FeedbackKind, FeedbackToken, Modifier, ModifierPolicy, SettingsPanel, SettingsView,
};
