//! Startup, the UI loop and shutdown
//!
//! `start` runs: version check, config, wiring, queue restore, signal
//! listener, then the blocking UI loop until the app reaches
//! [`AppState::Terminated`](crate::tui::AppState::Terminated).

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{error, info};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::cli::Args;
use crate::config::{self, Config};
use crate::library::{FileQueue, LocalLibrary};
use crate::tui::request::{self, QuitReason, UiReceiver, UiRequest, UiSender};
use crate::tui::{App, PlaylistPanel, Services, renderer};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const FRAME: Duration = Duration::from_millis(16);

/// Load the config. Only the per-user default is created on first run; a
/// path given with `-config` is read as is. Never fails: problems are
/// logged and defaults are used.
pub fn load_config(args: &Args) -> Config {
    if let Some(path) = &args.config {
        return Config::open(&config::expand_path(&path.to_string_lossy()));
    }

    match Config::default_path() {
        Ok(path) => Config::load(&path),
        Err(e) => {
            error!("{:#}", e);
            Config::builtin()
        }
    }
}

fn music_dir(args: &Args, config: &Config) -> PathBuf {
    if let Some(dir) = &args.music {
        return config::expand_path(&dir.to_string_lossy());
    }
    config
        .get_path("general.music_dir")
        .unwrap_or_else(|| config::expand_path("~/music"))
}

fn default_services(config: &Config, music_dir: PathBuf) -> Services {
    let queue_path = FileQueue::default_path().unwrap_or_else(|e| {
        error!("{:#}", e);
        PathBuf::from("queue")
    });
    let history_path = config
        .get_path("general.history_path")
        .unwrap_or_else(|| config::expand_path("~/.local/share/gomu/urls"));

    Services {
        queue: Arc::new(FileQueue::new(queue_path)),
        library: Arc::new(LocalLibrary::new(music_dir, history_path)),
    }
}

/// Wire the application together without touching the terminal
pub fn build_app(args: &Args, config: &Config, services: Services, tx: UiSender) -> App {
    let dir = music_dir(args, config);
    let playlist = PlaylistPanel::load(&dir).unwrap_or_else(|e| {
        error!("{:#}", e);
        PlaylistPanel::new(dir.clone(), Vec::new())
    });

    let mut app = App::new(config, playlist, services, tx);

    if !args.empty && config.get_bool("general.load_prev_queue") {
        app.restore_queue();
    }

    app
}

/// Listen for SIGINT/SIGTERM once and ask the UI task to quit.
///
/// Handlers are registered before this returns, so a signal sent right
/// after is not missed.
pub fn install_signal_listener(tx: UiSender) -> Result<JoinHandle<()>> {
    let mut signals = Signals::new()?;
    Ok(tokio::spawn(async move {
        match signals.recv().await {
            Ok(name) => {
                error!("Received {}. Exiting program", name);
                let reason = QuitReason::Signal(name.to_string());
                if tx.send(UiRequest::Quit(reason)).is_err() {
                    error!("Unable to quit program: UI already stopped");
                }
            }
            Err(e) => error!("Failed to listen for signals: {:#}", e),
        }
    }))
}

#[cfg(unix)]
struct Signals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn new() -> Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) -> Result<&'static str> {
        let name = tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        };
        Ok(name)
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn new() -> Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> Result<&'static str> {
        tokio::signal::ctrl_c().await?;
        Ok("Ctrl-C")
    }
}

/// Entry point used by `main`
pub async fn start(args: Args) -> Result<()> {
    if args.version {
        println!("Gomu {}", VERSION);
        return Ok(());
    }

    let config = load_config(&args);
    let (tx, mut rx) = request::channel();
    let services = default_services(&config, music_dir(&args, &config));
    let mut app = build_app(&args, &config, services, tx.clone());

    if let Err(e) = install_signal_listener(tx) {
        error!("Failed to listen for signals: {:#}", e);
    }
    info!("Starting gomu {}", VERSION);

    launch_tui(&mut app, &mut rx).await
}

async fn launch_tui(app: &mut App, rx: &mut UiReceiver) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui(&mut terminal, app, rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut UiReceiver,
) -> Result<()> {
    app.mark_running();

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Raw mode swallows SIGINT, treat Ctrl-C the same way
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.quit(QuitReason::User);
                break;
            }
            app.handle_key(key);
        }

        app.drain_requests(rx);
        if app.should_exit() {
            break;
        }

        terminal.draw(|frame| renderer::draw(frame, app))?;

        if let Some(remaining) = FRAME.checked_sub(frame_start.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }

    info!("UI loop finished");
    Ok(())
}
