use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::App;

/// Answer picked on a confirmation popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    No,
    Yes,
}

impl Choice {
    pub fn label(&self) -> &'static str {
        match self {
            Choice::No => "no",
            Choice::Yes => "yes",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Choice::Yes)
    }
}

/// Called once with the picked answer, after the popup has closed
pub type ConfirmFn = Box<dyn FnOnce(&mut App, Choice)>;

/// Two-button yes/no dialog
pub struct ConfirmationPopup {
    text: String,
    selected: Choice,
    on_choice: Option<ConfirmFn>,
}

impl ConfirmationPopup {
    pub fn new(text: impl Into<String>, on_choice: ConfirmFn) -> Self {
        Self {
            text: text.into(),
            selected: Choice::No,
            on_choice: Some(on_choice),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selected(&self) -> Choice {
        self.selected
    }

    pub fn buttons() -> [Choice; 2] {
        [Choice::No, Choice::Yes]
    }

    fn toggle(&mut self) {
        self.selected = match self.selected {
            Choice::No => Choice::Yes,
            Choice::Yes => Choice::No,
        };
    }

    /// Returns the answer once the user has made one
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Choice> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.toggle();
                None
            }
            KeyCode::Char('h') | KeyCode::Char('l') => {
                self.toggle();
                None
            }
            KeyCode::Enter => Some(self.selected),
            KeyCode::Esc => Some(Choice::No),
            _ => None,
        }
    }

    pub fn take_callback(&mut self) -> Option<ConfirmFn> {
        self.on_choice.take()
    }
}
