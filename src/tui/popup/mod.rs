//! Popup open/close protocol
//!
//! Every popup goes through [`PopupRegistry`]: opening captures the focused
//! panel, pushes a page and (except for timed popups) moves focus onto it.
//! Closing removes the page by id and hands focus back. Closing an id that
//! is no longer on the stack does nothing.

pub mod confirmation;
pub mod help;
pub mod input;
pub mod timed;

use std::time::Duration;

pub use confirmation::{Choice, ConfirmFn, ConfirmationPopup};
pub use help::{HelpAction, HelpPopup, GLOBAL_HELP};
pub use input::{InputAction, InputPopup, SubmitFn, MAX_INPUT_LEN};
pub use timed::{TimedPopup, volume_bar};

use super::page::{Focus, FocusTracker, Page, PageId, PageStack, Placement};
use super::timer::PopupTimer;

pub const CONFIRMATION_ID: &str = "confirmation-popup";
pub const HELP_ID: &str = "help-page";
const TIMEOUT_PREFIX: &str = "timeout-popup";

const DEFAULT_TIMED_WIDTH: u16 = 70;
const DEFAULT_TIMED_HEIGHT: u16 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    Confirmation,
    TimedInfo,
    Help,
    TextInput,
}

/// Content of a page
pub enum Popup {
    Confirmation(ConfirmationPopup),
    TimedInfo(TimedPopup),
    Help(HelpPopup),
    TextInput(InputPopup),
}

impl Popup {
    pub fn kind(&self) -> PopupKind {
        match self {
            Popup::Confirmation(_) => PopupKind::Confirmation,
            Popup::TimedInfo(_) => PopupKind::TimedInfo,
            Popup::Help(_) => PopupKind::Help,
            Popup::TextInput(_) => PopupKind::TextInput,
        }
    }
}

/// The text prompts the player can show. At most one of each is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPrompt {
    DownloadUrl,
    PlaylistName,
    Command,
}

impl InputPrompt {
    pub fn id(&self) -> PageId {
        PageId::new(match self {
            InputPrompt::DownloadUrl => "download-input-popup",
            InputPrompt::PlaylistName => "mkdir-input-popup",
            InputPrompt::Command => "command-input-popup",
        })
    }

    pub fn title(&self) -> &'static str {
        match self {
            InputPrompt::DownloadUrl => " Ytdl ",
            InputPrompt::PlaylistName => " New Playlist ",
            InputPrompt::Command => " Command ",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputPrompt::DownloadUrl => "Enter a url: ",
            InputPrompt::PlaylistName => "Enter a playlist name: ",
            InputPrompt::Command => "Command: ",
        }
    }
}

pub struct PopupRegistry {
    next_id: u64,
    timer: PopupTimer,
}

impl PopupRegistry {
    pub fn new(timer: PopupTimer) -> Self {
        Self { next_id: 0, timer }
    }

    /// Fresh id for popups that may be open several times at once
    pub fn allocate(&mut self) -> PageId {
        let id = PageId::new(format!("{} {}", TIMEOUT_PREFIX, self.next_id));
        self.next_id += 1;
        id
    }

    fn open(
        &mut self,
        pages: &mut PageStack,
        focus: &mut FocusTracker,
        page: Page,
        take_focus: bool,
    ) -> PageId {
        let id = page.id.clone();
        focus.capture();
        log::debug!("Opening {:?} popup {}", page.kind, id);
        pages.add(page);
        if take_focus {
            focus.focus_popup(id.clone());
        }
        id
    }

    pub fn open_confirmation(
        &mut self,
        pages: &mut PageStack,
        focus: &mut FocusTracker,
        text: impl Into<String>,
        on_choice: ConfirmFn,
    ) -> PageId {
        let page = Page {
            id: PageId::new(CONFIRMATION_ID),
            kind: PopupKind::Confirmation,
            visible: true,
            width: 40,
            height: 10,
            placement: Placement::Center,
            popup: Popup::Confirmation(ConfirmationPopup::new(text, on_choice)),
        };
        self.open(pages, focus, page, true)
    }

    /// Show a message that closes itself after `timeout`.
    ///
    /// A zero width and height picks the default size. Focus stays where it
    /// is since the popup takes no input.
    pub fn open_timed_info(
        &mut self,
        pages: &mut PageStack,
        focus: &mut FocusTracker,
        title: impl Into<String>,
        text: impl Into<String>,
        timeout: Duration,
        width: u16,
        height: u16,
    ) -> PageId {
        let (width, height) = if width == 0 && height == 0 {
            (DEFAULT_TIMED_WIDTH, DEFAULT_TIMED_HEIGHT)
        } else {
            (width, height)
        };
        let page = Page {
            id: self.allocate(),
            kind: PopupKind::TimedInfo,
            visible: true,
            width,
            height,
            placement: Placement::TopRight,
            popup: Popup::TimedInfo(TimedPopup::new(title, text)),
        };
        let id = self.open(pages, focus, page, false);
        self.timer.schedule(id.clone(), timeout);
        id
    }

    pub fn open_help(
        &mut self,
        pages: &mut PageStack,
        focus: &mut FocusTracker,
        panel_lines: Vec<String>,
    ) -> PageId {
        let page = Page {
            id: PageId::new(HELP_ID),
            kind: PopupKind::Help,
            visible: true,
            width: 50,
            height: 30,
            placement: Placement::Center,
            popup: Popup::Help(HelpPopup::new(panel_lines)),
        };
        self.open(pages, focus, page, true)
    }

    pub fn open_text_input(
        &mut self,
        pages: &mut PageStack,
        focus: &mut FocusTracker,
        prompt: InputPrompt,
        on_submit: SubmitFn,
    ) -> PageId {
        let page = Page {
            id: prompt.id(),
            kind: PopupKind::TextInput,
            visible: true,
            width: 50,
            height: 4,
            placement: Placement::Center,
            popup: Popup::TextInput(InputPopup::new(prompt.title(), prompt.label(), on_submit)),
        };
        self.open(pages, focus, page, true)
    }

    /// Remove a popup and hand focus on.
    ///
    /// Returns the removed page, or `None` when the id was already gone.
    /// Focus is only moved when it was on the closed popup: the front-most
    /// popup that still takes input gets it, or the last panel when none is
    /// left.
    pub fn close(
        &self,
        pages: &mut PageStack,
        focus: &mut FocusTracker,
        id: &PageId,
    ) -> Option<Page> {
        let page = pages.remove(id)?;
        log::debug!("Closed popup {}", id);

        let was_focused = match focus.current() {
            Focus::Popup(current) => current == id || !pages.contains(current),
            Focus::Panel(_) => false,
        };
        if !was_focused {
            return Some(page);
        }

        match pages.front_focusable() {
            Some(below) => focus.focus_popup(below.id.clone()),
            None => focus.restore(),
        }
        Some(page)
    }
}
