#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fixzhuyin_core::{HotkeySettings, PopupView, Settings, SettingsView};
use fixzhuyin_ui::{ErrorReporter, FlagStore, Host, HostError, MemoryFlagStore, Page, Surface, UiConfig, UiError};
use futures::future::{BoxFuture, FutureExt};

/// In-memory host recording every request
#[derive(Default)]
pub struct MockHost {
    pub settings: Mutex<Settings>,
    /// Hotkeys "owned by another program"
    pub taken: Mutex<Vec<HotkeySettings>>,
    pub replaced: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<Settings>>,
    pub fail_replace: AtomicBool,
}

impl MockHost {
    pub fn with_taken(hotkeys: &[&str]) -> Self {
        let host = Self::default();
        *host.taken.lock().unwrap() = hotkeys.iter().map(|h| HotkeySettings::parse(h).unwrap()).collect();
        host
    }

    pub fn replaced(&self) -> Vec<String> {
        self.replaced.lock().unwrap().clone()
    }
}

impl Host for MockHost {
    fn get_settings(&self) -> BoxFuture<'_, Result<Settings, HostError>> {
        let settings = self.settings.lock().unwrap().clone();
        async move { Ok(settings) }.boxed()
    }

    fn set_settings(&self, settings: Settings) -> BoxFuture<'_, Result<(), HostError>> {
        self.submitted.lock().unwrap().push(settings.clone());
        let result = if self.taken.lock().unwrap().contains(&settings.hotkey) {
            Err(HostError::new("set_settings", "hotkey is used by another program"))
        } else {
            *self.settings.lock().unwrap() = settings;
            Ok(())
        };
        async move { result }.boxed()
    }

    fn replace_with(&self, text: String) -> BoxFuture<'_, Result<(), HostError>> {
        let result = if self.fail_replace.load(Ordering::SeqCst) {
            Err(HostError::new("replace_with", "no focused window"))
        } else {
            self.replaced.lock().unwrap().push(text);
            Ok(())
        };
        async move { result }.boxed()
    }

    fn get_hotkey_display(&self) -> BoxFuture<'_, Result<String, HostError>> {
        let display = self.settings.lock().unwrap().hotkey.to_string();
        async move { Ok(display) }.boxed()
    }
}

/// Surface keeping the last view of each widget
#[derive(Default)]
pub struct RecordingSurface {
    pub popup: Mutex<Option<PopupView>>,
    pub settings: Mutex<Option<SettingsView>>,
    pub hint: Mutex<Vec<bool>>,
}

impl RecordingSurface {
    pub fn popup(&self) -> PopupView {
        self.popup.lock().unwrap().clone().expect("popup never rendered")
    }

    pub fn settings(&self) -> SettingsView {
        self.settings.lock().unwrap().clone().expect("settings never rendered")
    }

    pub fn hint_shown(&self) -> bool {
        self.hint.lock().unwrap().last().copied().unwrap_or(false)
    }
}

impl Surface for RecordingSurface {
    fn render_popup(&self, view: &PopupView) {
        *self.popup.lock().unwrap() = Some(view.clone());
    }

    fn render_settings(&self, view: &SettingsView) {
        *self.settings.lock().unwrap() = Some(view.clone());
    }

    fn render_hint(&self, visible: bool) {
        self.hint.lock().unwrap().push(visible);
    }
}

#[derive(Default)]
pub struct CollectReporter(pub Mutex<Vec<String>>);

impl ErrorReporter for CollectReporter {
    fn report(&self, context: &str, error: &UiError) {
        self.0.lock().unwrap().push(format!("{}: {}", context, error));
    }
}

impl CollectReporter {
    pub fn reports(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Flag store whose first `failures` writes fail like a read-only disk
pub struct FlakyFlagStore {
    pub inner: MemoryFlagStore,
    failures: AtomicUsize,
    pub writes: AtomicUsize,
}

impl FlakyFlagStore {
    pub fn failing(failures: usize) -> Self {
        Self {
            inner: MemoryFlagStore::default(),
            failures: AtomicUsize::new(failures),
            writes: AtomicUsize::new(0),
        }
    }
}

impl FlagStore for FlakyFlagStore {
    fn get(&self, key: &str) -> fixzhuyin_ui::Result<bool> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: bool) -> fixzhuyin_ui::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into());
        }
        self.inner.set(key, value)
    }
}

/// Everything a page test needs to look at
pub struct Harness {
    pub host: Arc<MockHost>,
    pub surface: Arc<RecordingSurface>,
    pub flags: Arc<MemoryFlagStore>,
    pub reporter: Arc<CollectReporter>,
    pub page: Page,
}

impl Harness {
    pub fn new(host: MockHost, flags: MemoryFlagStore, config: UiConfig) -> Self {
        let host = Arc::new(host);
        let surface = Arc::new(RecordingSurface::default());
        let flags = Arc::new(flags);
        let reporter = Arc::new(CollectReporter::default());
        let page = Page::with_reporter(
            host.clone(),
            surface.clone(),
            flags.clone(),
            config,
            reporter.clone(),
        )
        .unwrap();
        Self {
            host,
            surface,
            flags,
            reporter,
            page,
        }
    }

    /// Default host, empty flags, default config; already started
    pub async fn started() -> Self {
        let harness = Self::new(MockHost::default(), MemoryFlagStore::default(), UiConfig::default());
        harness.page.start();
        harness.page.idle().await;
        harness
    }

    pub fn hint_flag(&self) -> bool {
        self.flags.get("hideImeHint").unwrap()
    }
}
