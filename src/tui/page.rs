//! Page stack and focus tracking
//!
//! Popups are layered on top of the panel layout as pages. The stack only
//! holds popups; an empty stack means the panels are front-most.

use std::fmt;

use super::panel::PanelId;
use super::popup::{Popup, PopupKind};

/// Unique identifier of a page within the stack
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a popup is anchored on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Center,
    TopRight,
}

/// A popup layered over the panels
pub struct Page {
    pub id: PageId,
    pub kind: PopupKind,
    pub visible: bool,
    pub width: u16,
    pub height: u16,
    pub placement: Placement,
    pub popup: Popup,
}

/// Ordered collection of pages, last element is front-most
#[derive(Default)]
pub struct PageStack {
    pages: Vec<Page>,
}

impl PageStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a page as front-most. A page with the same id is replaced.
    pub fn add(&mut self, page: Page) {
        if self.remove(&page.id).is_some() {
            log::debug!("Replaced existing page {}", page.id);
        }
        self.pages.push(page);
    }

    /// Remove a page by id, returning it if it was present
    pub fn remove(&mut self, id: &PageId) -> Option<Page> {
        let index = self.pages.iter().position(|p| &p.id == id)?;
        Some(self.pages.remove(index))
    }

    pub fn contains(&self, id: &PageId) -> bool {
        self.pages.iter().any(|p| &p.id == id)
    }

    pub fn get(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    pub fn get_mut(&mut self, id: &PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| &p.id == id)
    }

    /// Front-most visible page
    pub fn front(&self) -> Option<&Page> {
        self.pages.iter().rev().find(|p| p.visible)
    }

    pub fn front_kind(&self) -> Option<PopupKind> {
        self.front().map(|p| p.kind)
    }

    /// Front-most visible page that can take focus. Timed popups never do.
    pub fn front_focusable(&self) -> Option<&Page> {
        self.pages
            .iter()
            .rev()
            .find(|p| p.visible && p.kind != PopupKind::TimedInfo)
    }

    /// Kind of the popup holding `focus`, if any
    pub fn focused_kind(&self, focus: &FocusTracker) -> Option<PopupKind> {
        match focus.current() {
            Focus::Popup(id) => self.get(id).map(|p| p.kind),
            Focus::Panel(_) => None,
        }
    }

    /// Pages in draw order (back to front)
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// What currently receives key input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Panel(PanelId),
    Popup(PageId),
}

/// Tracks the current focus and the last focused panel.
///
/// `previous` is always a panel, never a popup, so restoring focus after a
/// popup closes can never land on a removed page.
#[derive(Debug, Clone)]
pub struct FocusTracker {
    current: Focus,
    previous: PanelId,
}

impl FocusTracker {
    pub fn new(panel: PanelId) -> Self {
        Self {
            current: Focus::Panel(panel),
            previous: panel,
        }
    }

    pub fn current(&self) -> &Focus {
        &self.current
    }

    pub fn previous(&self) -> PanelId {
        self.previous
    }

    /// Focused panel, if focus is not on a popup
    pub fn panel(&self) -> Option<PanelId> {
        match self.current {
            Focus::Panel(panel) => Some(panel),
            Focus::Popup(_) => None,
        }
    }

    pub fn is_on(&self, id: &PageId) -> bool {
        matches!(&self.current, Focus::Popup(current) if current == id)
    }

    /// Remember the focused panel before a popup takes over
    pub fn capture(&mut self) {
        if let Focus::Panel(panel) = self.current {
            self.previous = panel;
        }
    }

    pub fn focus_popup(&mut self, id: PageId) {
        self.current = Focus::Popup(id);
    }

    pub fn focus_panel(&mut self, panel: PanelId) {
        self.current = Focus::Panel(panel);
        self.previous = panel;
    }

    /// Hand focus back to the last focused panel
    pub fn restore(&mut self) {
        self.current = Focus::Panel(self.previous);
    }
}
