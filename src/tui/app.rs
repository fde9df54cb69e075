//! Application context shared by commands, popups and the renderer
//!
//! [`App`] owns all UI state. Only the UI task touches it; background work
//! reaches it through [`UiRequest`]s drained once per frame.

use anyhow::Result;
use crossterm::event::KeyEvent;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::command::CommandRegistry;
use super::keys::{self, Dispatch};
use super::page::{Focus, FocusTracker, PageId, PageStack};
use super::panel::{NowPlayingPanel, Panel, PanelId, PlaylistPanel, QueuePanel};
use super::popup::{
    Choice, ConfirmFn, HelpAction, InputAction, InputPrompt, Popup, PopupRegistry, SubmitFn,
    CONFIRMATION_ID, volume_bar,
};
use super::request::{QuitReason, UiReceiver, UiRequest, UiSender};
use super::theme::Theme;
use super::timer::PopupTimer;
use crate::config::Config;
use crate::library::{Library, QueueStore};

/// Process lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Starting,
    Running,
    Quitting,
    Terminated,
}

/// External collaborators
#[derive(Clone)]
pub struct Services {
    pub queue: Arc<dyn QueueStore>,
    pub library: Arc<dyn Library>,
}

/// Behaviour switches read once from the config
#[derive(Debug, Clone)]
pub struct Settings {
    pub popup_timeout: Duration,
    pub confirm_on_exit: bool,
    pub confirm_bulk_add: bool,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            popup_timeout: config.popup_timeout(),
            confirm_on_exit: config.get_bool("general.confirm_on_exit"),
            confirm_bulk_add: config.get_bool("general.confirm_bulk_add"),
        }
    }
}

/// Outcome of a key handled by a popup
enum PopupOutcome {
    Stay,
    Close,
    Confirm(Option<ConfirmFn>, Choice),
    Submit(Option<SubmitFn>, String),
}

pub struct App {
    pub pages: PageStack,
    pub focus: FocusTracker,
    pub popups: PopupRegistry,
    pub playlist: PlaylistPanel,
    pub queue: QueuePanel,
    pub now_playing: NowPlayingPanel,
    pub theme: Theme,
    commands: CommandRegistry,
    services: Services,
    settings: Settings,
    tx: UiSender,
    state: AppState,
}

impl App {
    pub fn new(
        config: &Config,
        playlist: PlaylistPanel,
        services: Services,
        tx: UiSender,
    ) -> Self {
        let mut commands = CommandRegistry::new();
        commands.define_commands();

        Self {
            pages: PageStack::new(),
            focus: FocusTracker::new(PanelId::Playlist),
            popups: PopupRegistry::new(PopupTimer::new(tx.clone())),
            playlist,
            queue: QueuePanel::default(),
            now_playing: NowPlayingPanel::new(config.volume()),
            theme: Theme::from_config(config),
            commands,
            services,
            settings: Settings::from_config(config),
            tx,
            state: AppState::Starting,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn mark_running(&mut self) {
        if self.state == AppState::Starting {
            self.state = AppState::Running;
        }
    }

    pub fn should_exit(&self) -> bool {
        self.state == AppState::Terminated
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn sender(&self) -> UiSender {
        self.tx.clone()
    }

    pub fn library(&self) -> Arc<dyn Library> {
        self.services.library.clone()
    }

    pub fn panel(&self, id: PanelId) -> &dyn Panel {
        match id {
            PanelId::Playlist => &self.playlist,
            PanelId::Queue => &self.queue,
            PanelId::NowPlaying => &self.now_playing,
        }
    }

    pub fn panel_mut(&mut self, id: PanelId) -> &mut dyn Panel {
        match id {
            PanelId::Playlist => &mut self.playlist,
            PanelId::Queue => &mut self.queue,
            PanelId::NowPlaying => &mut self.now_playing,
        }
    }

    pub fn cycle_panels(&mut self) {
        let current = self.focus.panel().unwrap_or(self.focus.previous());
        self.focus.focus_panel(current.next());
    }

    /// Restore the queue saved by the previous session
    pub fn restore_queue(&mut self) {
        match self.services.queue.load_queue() {
            Ok(tracks) => self.queue.extend(tracks),
            Err(e) => log::error!("{:#}", e),
        }
    }

    pub fn enqueue_playlist(&mut self, playlist: &Path) -> Result<()> {
        let tracks = self.services.library.playlist_tracks(playlist)?;
        log::info!("Adding {} tracks from {:?}", tracks.len(), playlist);
        self.queue.extend(tracks);
        Ok(())
    }

    // Popups

    pub fn confirm(&mut self, text: impl Into<String>, on_choice: ConfirmFn) {
        if self.pages.contains(&PageId::new(CONFIRMATION_ID)) {
            log::debug!("Confirmation already open, ignoring new one");
            return;
        }
        self.popups
            .open_confirmation(&mut self.pages, &mut self.focus, text, on_choice);
    }

    pub fn timed_popup(&mut self, title: impl Into<String>, text: impl Into<String>) -> PageId {
        let timeout = self.settings.popup_timeout;
        self.popups
            .open_timed_info(&mut self.pages, &mut self.focus, title, text, timeout, 0, 0)
    }

    pub fn volume_popup(&mut self, volume: u8) -> PageId {
        self.timed_popup(" Volume ", volume_bar(volume))
    }

    /// Help for the focused panel, or the last focused one
    pub fn show_help(&mut self) -> PageId {
        let panel = self.focus.panel().unwrap_or(self.focus.previous());
        let lines = self.panel(panel).help();
        self.popups.open_help(&mut self.pages, &mut self.focus, lines)
    }

    pub fn prompt(&mut self, prompt: InputPrompt, on_submit: SubmitFn) -> PageId {
        self.popups
            .open_text_input(&mut self.pages, &mut self.focus, prompt, on_submit)
    }

    /// Close a popup by id. Unknown ids are ignored.
    pub fn close_popup(&mut self, id: &PageId) -> bool {
        self.popups
            .close(&mut self.pages, &mut self.focus, id)
            .is_some()
    }

    /// Run an async action without blocking the UI. Failures are logged.
    pub fn spawn_action<F>(&self, name: &'static str, action: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        tokio::spawn(async move {
            if let Err(e) = action.await {
                log::error!("{} failed: {:#}", name, e);
            }
        });
    }

    // Input

    pub fn run_command(&mut self, name: &str) {
        match self.commands.get_fn(name) {
            Ok(command) => {
                if let Err(e) = command(self) {
                    log::error!("Command {} failed: {:#}", name, e);
                }
            }
            Err(e) => log::error!("{:#}", e),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.state != AppState::Running {
            return;
        }

        if keys::intercept(self, key) == Dispatch::Consumed {
            return;
        }

        match self.focus.current().clone() {
            Focus::Popup(id) => self.handle_popup_key(id, key),
            Focus::Panel(panel) => {
                if let Some(command) = self.panel_mut(panel).handle_key(key) {
                    self.run_command(command);
                }
            }
        }
    }

    fn handle_popup_key(&mut self, id: PageId, key: KeyEvent) {
        let Some(page) = self.pages.get_mut(&id) else {
            // Focus must never stay on a page that is gone
            self.focus.restore();
            return;
        };

        let outcome = match &mut page.popup {
            Popup::Confirmation(popup) => match popup.handle_key(key) {
                Some(choice) => PopupOutcome::Confirm(popup.take_callback(), choice),
                None => PopupOutcome::Stay,
            },
            Popup::Help(popup) => match popup.handle_key(key) {
                HelpAction::Close => PopupOutcome::Close,
                HelpAction::None => PopupOutcome::Stay,
            },
            Popup::TextInput(popup) => match popup.handle_key(key) {
                Some(InputAction::Submit(value)) => {
                    PopupOutcome::Submit(popup.take_callback(), value)
                }
                Some(InputAction::Cancel) => PopupOutcome::Close,
                None => PopupOutcome::Stay,
            },
            Popup::TimedInfo(_) => PopupOutcome::Stay,
        };

        match outcome {
            PopupOutcome::Stay => {}
            PopupOutcome::Close => {
                self.close_popup(&id);
            }
            // Close before the callback so a popup it opens keeps focus
            PopupOutcome::Confirm(callback, choice) => {
                self.close_popup(&id);
                if let Some(callback) = callback {
                    callback(self, choice);
                }
            }
            PopupOutcome::Submit(callback, value) => {
                self.close_popup(&id);
                if let Some(callback) = callback {
                    callback(self, value);
                }
            }
        }
    }

    // Background requests

    pub fn handle_request(&mut self, request: UiRequest) {
        match request {
            UiRequest::ClosePage(id) => {
                if !self.close_popup(&id) {
                    log::debug!("Popup {} already closed", id);
                }
            }
            UiRequest::Quit(reason) => {
                self.quit(reason);
            }
            UiRequest::PlaylistCreated(path) => self.playlist.add(path),
        }
    }

    /// Apply every pending background request
    pub fn drain_requests(&mut self, rx: &mut UiReceiver) {
        while let Ok(request) = rx.try_recv() {
            self.handle_request(request);
        }
    }

    // Shutdown

    /// Quit command entry point, asking first when configured to
    pub fn request_quit(&mut self) {
        if !self.settings.confirm_on_exit {
            self.quit(QuitReason::User);
            return;
        }

        self.confirm(
            "Are you sure to exit?",
            Box::new(|app, choice| {
                if choice.is_yes() {
                    app.quit(QuitReason::User);
                }
            }),
        );
    }

    /// Orderly quit. Only the first call persists state; returns whether
    /// this call did the work.
    pub fn quit(&mut self, reason: QuitReason) -> bool {
        if matches!(self.state, AppState::Quitting | AppState::Terminated) {
            log::debug!("Quit already in progress, ignoring {:?}", reason);
            return false;
        }

        self.state = AppState::Quitting;
        log::info!("Quitting ({:?})", reason);

        let mut tracks: Vec<PathBuf> = self
            .now_playing
            .track()
            .map(Path::to_path_buf)
            .into_iter()
            .collect();
        tracks.extend(self.queue.items().iter().cloned());
        if let Err(e) = self.services.queue.save_queue(&tracks) {
            log::error!("Unable to quit program: {:#}", e);
        }

        self.state = AppState::Terminated;
        true
    }
}
