//! The page hosting the three widgets
//!
//! A [`Page`] is built once per UI instance. It owns the widget states,
//! routes host events and user input to them, pushes fresh view models to
//! the [`Surface`] after every change and turns widget outcomes into host
//! requests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fixzhuyin_core::event::EVENT_NAMES;
use fixzhuyin_core::{
    CandidatePopup, CandidateSet, FeedbackToken, FlashToken, HintBanner, HostEvent, Modifier,
    PopupKey, PopupOutcome, PopupView, SettingsPanel, SettingsView,
};

use crate::config::UiConfig;
use crate::error::{Result, UiError};
use crate::host::{Host, HostError};
use crate::source::{Attachment, EventHandler, EventSource};
use crate::storage::FlagStore;
use crate::surface::Surface;
use crate::tasks::{ErrorReporter, LogReporter, TaskRunner};

#[derive(Clone)]
pub struct Page {
    inner: Arc<PageInner>,
}

struct PageInner {
    host: Arc<dyn Host>,
    surface: Arc<dyn Surface>,
    flags: Arc<dyn FlagStore>,
    config: UiConfig,
    tasks: TaskRunner,
    popup: Mutex<CandidatePopup>,
    panel: Mutex<SettingsPanel>,
    hint: Mutex<HintBanner>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Page {
    /// Build a page reporting background failures to the log.
    /// Must be called from within a tokio runtime.
    pub fn new(
        host: Arc<dyn Host>,
        surface: Arc<dyn Surface>,
        flags: Arc<dyn FlagStore>,
        config: UiConfig,
    ) -> Result<Self> {
        Self::with_reporter(host, surface, flags, config, Arc::new(LogReporter))
    }

    pub fn with_reporter(
        host: Arc<dyn Host>,
        surface: Arc<dyn Surface>,
        flags: Arc<dyn FlagStore>,
        config: UiConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self> {
        let tasks = TaskRunner::new(reporter)?;
        let panel = SettingsPanel::new(config.settings.modifiers);
        Ok(Self {
            inner: Arc::new(PageInner {
                host,
                surface,
                flags,
                config,
                tasks,
                popup: Mutex::new(CandidatePopup::new()),
                panel: Mutex::new(panel),
                hint: Mutex::new(HintBanner::default()),
            }),
        })
    }

    pub fn config(&self) -> &UiConfig {
        &self.inner.config
    }

    /// Startup: restore the hint banner from the persisted flag, draw every
    /// widget and fetch the current settings in the background.
    pub fn start(&self) {
        let key = &self.inner.config.hint.storage_key;
        let dismissed = match self.inner.flags.get(key) {
            Ok(dismissed) => dismissed,
            Err(e) => {
                self.inner.tasks.report("read hint flag", &e);
                false
            }
        };

        {
            let mut hint = lock(&self.inner.hint);
            *hint = HintBanner::new(dismissed);
            hint.show_if_not_dismissed();
        }
        log::debug!("page started, hint dismissed: {}", dismissed);

        self.inner.render_popup();
        self.inner.render_settings();
        self.inner.render_hint();
        self.spawn_load_settings();
    }

    /// Subscribe to the host's events. Dropping the returned attachment
    /// unsubscribes again.
    pub fn attach(&self, source: Arc<dyn EventSource>) -> Attachment {
        let ids = EVENT_NAMES
            .iter()
            .map(|&name| {
                let page = self.clone();
                let handler: EventHandler = Arc::new(move |payload: &str| {
                    match HostEvent::from_json(name, payload) {
                        Ok(event) => page.handle_event(event),
                        Err(e) => page.inner.tasks.report("decode host event", &UiError::from(e)),
                    }
                });
                source.listen(name, handler)
            })
            .collect();
        Attachment::new(source, ids)
    }

    pub fn handle_event(&self, event: HostEvent) {
        log::debug!("host event: {}", event.name());
        match event {
            HostEvent::ShowCandidates(payload) => {
                let outcome = lock(&self.inner.popup).show_candidates(CandidateSet::from(payload));
                self.apply_popup(outcome);
            }
            HostEvent::OpenSettings => self.open_settings(),
            HostEvent::ShowImeHint => self.flash_hint(),
        }
    }

    /// Feed a `KeyboardEvent.key` to the popup. Returns false when the popup
    /// ignored the key, including every key while it is hidden.
    pub fn key_down(&self, key: &str) -> bool {
        let Some(key) = PopupKey::from_key(key) else {
            return false;
        };
        let outcome = lock(&self.inner.popup).key_down(key);
        let handled = outcome != PopupOutcome::Ignored;
        self.apply_popup(outcome);
        handled
    }

    pub fn click_candidate(&self, index: usize) {
        let outcome = lock(&self.inner.popup).click(index);
        self.apply_popup(outcome);
    }

    fn apply_popup(&self, outcome: PopupOutcome) {
        match outcome {
            PopupOutcome::Ignored => {}
            PopupOutcome::Redraw | PopupOutcome::Hidden => self.inner.render_popup(),
            PopupOutcome::Confirmed(text) => {
                self.inner.render_popup();
                let host = self.inner.host.clone();
                self.inner.tasks.spawn("replace text", async move {
                    host.replace_with(text).await?;
                    Ok(())
                });
            }
        }
    }

    /// Show the panel and refresh it from the host in the background
    pub fn open_settings(&self) {
        lock(&self.inner.panel).open();
        self.inner.render_settings();
        self.spawn_load_settings();
    }

    pub fn close_settings(&self) {
        lock(&self.inner.panel).close();
        self.inner.render_settings();
    }

    pub fn set_modifier(&self, modifier: Modifier, on: bool) -> bool {
        let changed = lock(&self.inner.panel).set_modifier(modifier, on);
        if changed {
            self.inner.render_settings();
        } else {
            log::debug!("modifier {:?} is fixed by policy", modifier);
        }
        changed
    }

    pub fn select_code(&self, code: &str) -> Result<()> {
        lock(&self.inner.panel).select_code(code)?;
        self.inner.render_settings();
        Ok(())
    }

    /// Fetch settings and the hotkey description from the host. The form is
    /// only replaced if the user has not edited it in the meantime.
    pub async fn load_settings(&self) -> Result<()> {
        let settings = self.inner.host.get_settings().await?;
        if !lock(&self.inner.panel).refresh(&settings) {
            log::debug!("settings form has unsaved edits, kept");
        }
        self.inner.render_settings();

        let display = self.inner.host.get_hotkey_display().await?;
        lock(&self.inner.panel).set_display(display);
        self.inner.render_settings();
        Ok(())
    }

    fn spawn_load_settings(&self) {
        let page = self.clone();
        self.inner
            .tasks
            .spawn("load settings", async move { page.load_settings().await });
    }

    /// Submit the form. Success and failure are both shown in the panel as
    /// a message that hides itself; the host error is also returned.
    pub async fn save_settings(&self) -> std::result::Result<(), HostError> {
        let draft = lock(&self.inner.panel).draft();

        match self.inner.host.set_settings(draft.clone()).await {
            Ok(()) => {
                log::info!("hotkey saved: {}", draft.hotkey);
                let display = match self.inner.host.get_hotkey_display().await {
                    Ok(display) => display,
                    Err(e) => {
                        self.inner.tasks.report("refresh hotkey display", &UiError::from(e));
                        draft.hotkey.to_string()
                    }
                };
                let token = lock(&self.inner.panel).save_succeeded(display);
                self.inner.render_settings();
                self.expire_feedback_after(token, self.inner.config.saved_feedback());
                Ok(())
            }
            Err(e) => {
                log::warn!("saving hotkey {} rejected: {}", draft.hotkey, e.message);
                let token = lock(&self.inner.panel).save_failed(&e.message);
                self.inner.render_settings();
                self.expire_feedback_after(token, self.inner.config.failed_feedback());
                Err(e)
            }
        }
    }

    /// Fire-and-forget [`save_settings`](Self::save_settings), as a save button does
    pub fn submit_settings(&self) {
        let page = self.clone();
        self.inner.tasks.spawn("save settings", async move {
            // Rejections are already shown in the panel
            let _ = page.save_settings().await;
            Ok(())
        });
    }

    fn expire_feedback_after(&self, token: FeedbackToken, delay: std::time::Duration) {
        let inner = self.inner.clone();
        self.inner.tasks.defer(delay, move || {
            if lock(&inner.panel).expire_feedback(token) {
                inner.render_settings();
            }
        });
    }

    /// Close the hint banner; `permanent` keeps it hidden on later starts
    pub fn dismiss_hint(&self, permanent: bool) {
        let persist = lock(&self.inner.hint).dismiss(permanent);
        self.inner.render_hint();

        if persist {
            let key = &self.inner.config.hint.storage_key;
            match self.inner.flags.set(key, true) {
                Ok(()) => {
                    lock(&self.inner.hint).mark_dismissed();
                    log::info!("IME hint dismissed permanently");
                }
                // Left unmarked so the next permanent dismissal retries
                Err(e) => self.inner.tasks.report("store hint flag", &e),
            }
        }
    }

    fn flash_hint(&self) {
        let token: FlashToken = lock(&self.inner.hint).flash();
        self.inner.render_hint();

        let inner = self.inner.clone();
        self.inner.tasks.defer(self.inner.config.hint_flash(), move || {
            if lock(&inner.hint).expire_flash(token) {
                inner.render_hint();
            }
        });
    }

    pub fn popup_view(&self) -> PopupView {
        lock(&self.inner.popup).view()
    }

    pub fn settings_view(&self) -> SettingsView {
        lock(&self.inner.panel).view()
    }

    pub fn hint_visible(&self) -> bool {
        lock(&self.inner.hint).is_visible()
    }

    /// Wait for outstanding host requests
    pub async fn idle(&self) {
        self.inner.tasks.idle().await;
    }

    /// Abort outstanding requests and pending auto-hides
    pub fn shutdown(&self) {
        self.inner.tasks.shutdown();
    }
}

impl PageInner {
    // Views are built under the lock and drawn after releasing it

    fn render_popup(&self) {
        let view = lock(&self.popup).view();
        self.surface.render_popup(&view);
    }

    fn render_settings(&self) {
        let view = lock(&self.panel).view();
        self.surface.render_settings(&view);
    }

    fn render_hint(&self) {
        let visible = lock(&self.hint).is_visible();
        self.surface.render_hint(visible);
    }
}
