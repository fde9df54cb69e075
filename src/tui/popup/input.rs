use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::App;

/// Longest text an input field accepts
pub const MAX_INPUT_LEN: usize = 50;

/// Called with the entered text after the popup has closed
pub type SubmitFn = Box<dyn FnOnce(&mut App, String)>;

pub enum InputAction {
    Submit(String),
    Cancel,
}

/// Single-line text prompt
pub struct InputPopup {
    title: String,
    label: String,
    value: String,
    on_submit: Option<SubmitFn>,
}

impl InputPopup {
    pub fn new(title: impl Into<String>, label: impl Into<String>, on_submit: SubmitFn) -> Self {
        Self {
            title: title.into(),
            label: label.into(),
            value: String::new(),
            on_submit: Some(on_submit),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<InputAction> {
        match key.code {
            KeyCode::Enter => Some(InputAction::Submit(self.value.clone())),
            KeyCode::Esc => Some(InputAction::Cancel),
            KeyCode::Backspace => {
                self.value.pop();
                None
            }
            KeyCode::Char(c) => {
                if self.value.chars().count() < MAX_INPUT_LEN {
                    self.value.push(c);
                }
                None
            }
            _ => None,
        }
    }

    pub fn take_callback(&mut self) -> Option<SubmitFn> {
        self.on_submit.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(popup: &mut InputPopup, text: &str) {
        for c in text.chars() {
            popup.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut popup = InputPopup::new(" T ", "Name: ", Box::new(|_, _| {}));
        type_str(&mut popup, "rockx");
        popup.handle_key(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(popup.value(), "rock");

        match popup.handle_key(KeyEvent::from(KeyCode::Enter)) {
            Some(InputAction::Submit(value)) => assert_eq!(value, "rock"),
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_max_length() {
        let mut popup = InputPopup::new(" T ", "Name: ", Box::new(|_, _| {}));
        type_str(&mut popup, &"a".repeat(MAX_INPUT_LEN + 10));
        assert_eq!(popup.value().len(), MAX_INPUT_LEN);
    }

    #[test]
    fn test_escape_cancels() {
        let mut popup = InputPopup::new(" T ", "Name: ", Box::new(|_, _| {}));
        assert!(matches!(
            popup.handle_key(KeyEvent::from(KeyCode::Esc)),
            Some(InputAction::Cancel)
        ));
    }
}
