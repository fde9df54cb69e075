pub mod app;
pub mod command;
pub mod keys;
pub mod page;
pub mod panel;
pub mod popup;
pub mod renderer;
pub mod request;
pub mod theme;
pub mod timer;

pub use app::{App, AppState, Services, Settings};
pub use command::{CommandFn, CommandRegistry};
pub use keys::{Dispatch, GLOBAL_COMMANDS, intercept};
pub use page::{Focus, FocusTracker, Page, PageId, PageStack, Placement};
pub use panel::{NowPlayingPanel, Panel, PanelId, PlaylistPanel, QueuePanel};
pub use popup::{InputPrompt, Popup, PopupKind, PopupRegistry};
pub use request::{QuitReason, UiRequest};
pub use theme::Theme;
pub use timer::PopupTimer;
