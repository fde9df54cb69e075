use std::path::PathBuf;

use tokio::sync::mpsc;

use super::page::PageId;

/// Why the player is shutting down
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuitReason {
    User,
    Signal(String),
}

/// Mutations posted to the UI task by background work.
///
/// Timers, the signal listener and library actions never touch UI state
/// themselves. The UI task drains these once per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiRequest {
    ClosePage(PageId),
    Quit(QuitReason),
    PlaylistCreated(PathBuf),
}

pub type UiSender = mpsc::UnboundedSender<UiRequest>;
pub type UiReceiver = mpsc::UnboundedReceiver<UiRequest>;

pub fn channel() -> (UiSender, UiReceiver) {
    mpsc::unbounded_channel()
}
