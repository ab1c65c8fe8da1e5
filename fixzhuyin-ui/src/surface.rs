use fixzhuyin_core::{PopupView, SettingsView};

/// Where the widgets draw. Each call carries the complete state of one
/// widget; implementations redraw it wholesale.
pub trait Surface: Send + Sync {
    fn render_popup(&self, view: &PopupView);
    fn render_settings(&self, view: &SettingsView);
    fn render_hint(&self, visible: bool);
}
