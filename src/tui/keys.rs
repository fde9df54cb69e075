//! Global key interception
//!
//! Every key goes through [`intercept`] before reaching the focused popup
//! or panel. Routing depends on the kind of the focused popup.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use once_cell::sync::Lazy;

use super::App;
use super::popup::PopupKind;

/// Key that moves focus to the next panel
pub const CYCLE_KEY: KeyCode = KeyCode::Tab;

/// Single-key global bindings
pub static GLOBAL_COMMANDS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ('q', "quit"),
        (' ', "toggle_pause"),
        ('+', "volume_up"),
        ('-', "volume_down"),
        ('n', "skip"),
        (':', "command_search"),
        ('?', "toggle_help"),
    ])
});

/// What happens to a key after interception
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Hand the key on to the focused popup or panel
    Forward,
    /// A global binding handled the key
    Consumed,
}

pub fn intercept(app: &mut App, key: KeyEvent) -> Dispatch {
    // Timed popups never hold focus and never gate keys
    let front = app.pages.focused_kind(&app.focus);

    // Typing into a prompt must never trigger global bindings
    if front == Some(PopupKind::TextInput) {
        return Dispatch::Forward;
    }

    if key.code == CYCLE_KEY {
        if front == Some(PopupKind::Confirmation) {
            return Dispatch::Forward;
        }
        app.cycle_panels();
        return Dispatch::Consumed;
    }

    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return Dispatch::Forward;
    }

    let KeyCode::Char(c) = key.code else {
        return Dispatch::Forward;
    };
    let Some(name) = GLOBAL_COMMANDS.get(&c) else {
        return Dispatch::Forward;
    };

    match app.commands().get_fn(name) {
        Ok(command) => {
            log::debug!("Global key {:?} -> {}", c, name);
            if let Err(e) = command(app) {
                log::error!("Command {} failed: {:#}", name, e);
            }
            Dispatch::Consumed
        }
        Err(e) => {
            log::error!("{:#}", e);
            Dispatch::Forward
        }
    }
}
