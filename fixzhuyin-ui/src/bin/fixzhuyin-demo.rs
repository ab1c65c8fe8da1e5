use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::Parser;
use fixzhuyin_core::event::{OPEN_SETTINGS, SHOW_CANDIDATES, SHOW_IME_HINT};
use fixzhuyin_core::{HotkeySettings, Modifier, PopupView, Settings, SettingsView};
use fixzhuyin_ui::{
    EventBus, FlagStore, Host, HostError, MemoryFlagStore, Page, Surface, TomlFlagStore, UiConfig,
};
use futures::future::{BoxFuture, FutureExt};
use log::{error, info};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive the Fix Zhuyin widgets from a terminal", long_about = None)]
struct Args {
    /// UI configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hotkey the stand-in host refuses as taken, e.g. "ctrl+k" (repeatable)
    #[arg(long)]
    taken: Vec<String>,

    /// Keep the hint flag in memory instead of the config directory
    #[arg(long)]
    ephemeral: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Stand-in for the desktop shell: keeps settings in memory and prints
/// replacements instead of typing them.
struct DemoHost {
    settings: Mutex<Settings>,
    taken: Vec<HotkeySettings>,
}

impl Host for DemoHost {
    fn get_settings(&self) -> BoxFuture<'_, Result<Settings, HostError>> {
        let settings = self.settings.lock().map(|s| s.clone()).unwrap_or_default();
        async move { Ok(settings) }.boxed()
    }

    fn set_settings(&self, settings: Settings) -> BoxFuture<'_, Result<(), HostError>> {
        let result = if self.taken.contains(&settings.hotkey) {
            Err(HostError::new("set_settings", "hotkey is used by another program"))
        } else {
            if let Ok(mut current) = self.settings.lock() {
                *current = settings;
            }
            Ok(())
        };
        async move { result }.boxed()
    }

    fn replace_with(&self, text: String) -> BoxFuture<'_, Result<(), HostError>> {
        async move {
            println!("  >> replace with {:?}", text);
            Ok(())
        }
        .boxed()
    }

    fn get_hotkey_display(&self) -> BoxFuture<'_, Result<String, HostError>> {
        let display = self
            .settings
            .lock()
            .map(|s| s.hotkey.to_string())
            .unwrap_or_default();
        async move { Ok(display) }.boxed()
    }
}

struct TerminalSurface;

impl Surface for TerminalSurface {
    fn render_popup(&self, view: &PopupView) {
        if !view.visible {
            println!("[popup] hidden");
            return;
        }
        println!("[popup] {}", view.title);
        for row in &view.rows {
            let marker = if row.selected { '>' } else { ' ' };
            println!("  {} {}. {}", marker, row.ordinal, row.text);
        }
    }

    fn render_settings(&self, view: &SettingsView) {
        if !view.visible {
            return;
        }
        let f = &view.form;
        println!(
            "[settings] ctrl={} shift={} alt={} code={} (active: {})",
            f.ctrl, f.shift, f.alt, f.code, view.hotkey_display
        );
        if let Some(feedback) = &view.feedback {
            println!("[settings] {:?}: {}", feedback.kind, feedback.text);
        }
    }

    fn render_hint(&self, visible: bool) {
        println!("[hint] {}", if visible { "shown" } else { "hidden" });
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {} - {}", record.level(), record.target(), record.args()))
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn parse_modifier(name: &str) -> Result<Modifier> {
    Ok(match name {
        "ctrl" => Modifier::Ctrl,
        "shift" => Modifier::Shift,
        "alt" => Modifier::Alt,
        other => bail!("unknown modifier {:?}", other),
    })
}

/// Zero-based index of a row numbered from 1 as shown in the popup
fn row_index(row: &str) -> Result<usize> {
    let n: usize = row.parse().context("click takes a row number")?;
    match n.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("rows are numbered from 1"),
    }
}

/// Run one input line. Returns false on `quit`.
async fn run_command(page: &Page, bus: &EventBus, line: &str) -> Result<bool> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(true);
    };
    let rest: Vec<&str> = words.collect();

    match (cmd, rest.as_slice()) {
        ("show", [origin, items]) => {
            let items: Vec<&str> = items.split(',').collect();
            let payload = json!({ "origin": origin, "items": items, "position": null });
            bus.emit(SHOW_CANDIDATES, &payload.to_string());
        }
        ("key", [key]) => {
            if !page.key_down(key) {
                println!("  (key {:?} not handled)", key);
            }
        }
        ("click", [n]) => page.click_candidate(row_index(n)?),
        ("open", []) => {
            bus.emit(OPEN_SETTINGS, "");
        }
        ("close", []) => page.close_settings(),
        ("mod", [name, state]) => {
            let on = matches!(*state, "on" | "true" | "1");
            if !page.set_modifier(parse_modifier(name)?, on) {
                println!("  (modifiers are fixed)");
            }
        }
        ("code", [code]) => page.select_code(code)?,
        ("save", []) => {
            if let Err(e) = page.save_settings().await {
                info!("save rejected: {}", e);
            }
        }
        ("hint", []) => {
            bus.emit(SHOW_IME_HINT, "");
        }
        ("dismiss", []) => page.dismiss_hint(true),
        ("dismiss", ["--once"]) => page.dismiss_hint(false),
        ("quit", []) | ("exit", []) => return Ok(false),
        _ => bail!("unknown command: {}", line.trim()),
    }

    page.idle().await;
    Ok(true)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => UiConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => UiConfig::default(),
    };

    let taken = args
        .taken
        .iter()
        .map(|s| HotkeySettings::parse(s).with_context(|| format!("invalid --taken hotkey {:?}", s)))
        .collect::<Result<Vec<_>>>()?;

    let flags: Arc<dyn FlagStore> = if args.ephemeral {
        Arc::new(MemoryFlagStore::default())
    } else {
        let path = config.flag_store_path()?;
        info!("hint flag stored in {}", path.display());
        Arc::new(TomlFlagStore::new(path))
    };

    let host = Arc::new(DemoHost {
        settings: Mutex::new(Settings::default()),
        taken,
    });
    let page = Page::new(host, Arc::new(TerminalSurface), flags, config)?;
    let bus = Arc::new(EventBus::new());
    let attachment = page.attach(bus.clone());

    page.start();
    page.idle().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match run_command(&page, &bus, &line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("  error: {:#}", e),
        }
    }

    attachment.detach();
    page.shutdown();
    Ok(())
}
