mod app;
mod msg;
mod workspace;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use notify::{EventKind, RecursiveMode, Watcher};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::App;
use msg::Msg;
use peoplelink::model::config::AppConfig;
use peoplelink::vault::watch::roster_events;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Debounce deadlines are checked this often.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let _log_guard = init_logging()?;
    tracing::info!("peoplelink starting");

    let config = AppConfig::load().context("loading configuration")?;
    tracing::info!(
        "vault {} (people from {:?}, prefix {:?})",
        config.vault_path().display(),
        config.people.entity_source,
        config.people.trigger_prefix
    );

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(&mut terminal, config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("peoplelink stopped: {e:?}");
    }
    result
}

/// File logging under the platform data dir; the terminal belongs to the UI.
fn init_logging() -> Result<WorkerGuard> {
    let log_dir = directories::ProjectDirs::from("", "", "peoplelink")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::daily(&log_dir, "peoplelink.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("peoplelink=info"));
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn run(terminal: &mut Tui, config: AppConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel::<Msg>();
    let vault_path = config.vault_path();
    let mut app = App::new(config, tx.clone())?;

    spawn_input_reader(tx.clone());
    spawn_ticker(tx.clone());
    spawn_vault_watcher(vault_path, tx);

    let size = terminal.size()?;
    app.update(Msg::Resize(size.width, size.height))?;

    while !app.should_quit {
        terminal.draw(|f| app.view(f))?;
        pump(&mut app, &rx)?;
    }

    app.update(Msg::SaveAllBuffers)?;
    tracing::info!("peoplelink exiting");
    Ok(())
}

/// Block for one message, then apply everything already queued so a burst
/// of keys or watcher events costs a single redraw.
fn pump(app: &mut App, rx: &Receiver<Msg>) -> Result<()> {
    app.update(rx.recv()?)?;
    for msg in rx.try_iter() {
        app.update(msg)?;
        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn spawn_input_reader(tx: Sender<Msg>) {
    thread::spawn(move || {
        loop {
            let msg = match event::read() {
                Ok(Event::Key(key)) => Msg::Key(key),
                Ok(Event::Resize(w, h)) => Msg::Resize(w, h),
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!("terminal input error: {err}");
                    continue;
                }
            };
            if tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn spawn_ticker(tx: Sender<Msg>) {
    thread::spawn(move || {
        while tx.send(Msg::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}

/// Turn one filesystem notification into messages: roster events for notes,
/// plus `FileChanged` so open buffers can reload. `false` once the loop is gone.
fn forward_watch_event(event: notify::Event, tx: &Sender<Msg>) -> bool {
    let roster = roster_events(&event).into_iter().map(Msg::Roster);
    let touches_files = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    let changed = event
        .paths
        .into_iter()
        .filter(|_| touches_files)
        .map(Msg::FileChanged);

    roster.chain(changed).all(|msg| tx.send(msg).is_ok())
}

fn spawn_vault_watcher(vault_path: PathBuf, tx: Sender<Msg>) {
    thread::spawn(move || {
        if let Err(err) = watch_vault(&vault_path, tx) {
            tracing::warn!("not watching {}: {err}", vault_path.display());
        }
    });
}

fn watch_vault(vault_path: &Path, tx: Sender<Msg>) -> notify::Result<()> {
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                if !forward_watch_event(event, &tx) {
                    tracing::debug!("event loop closed, dropping watcher event");
                }
            }
            Err(err) => tracing::warn!("file watcher error: {err}"),
        }
    })?;
    watcher.watch(vault_path, RecursiveMode::Recursive)?;

    // The watcher stops when dropped.
    loop {
        thread::park();
    }
}
