use crossterm::event::{KeyCode, KeyEvent};

/// Lines shown under every panel's own help text
pub const GLOBAL_HELP: &[&str] = &[
    " ",
    "tab    change panel",
    "space  toggle play/pause",
    "esc    close popup",
    "n      skip",
    "q      quit",
    "+      volume up",
    "-      volume down",
    "?      toggle help",
];

pub enum HelpAction {
    Close,
    None,
}

/// Navigable list of key bindings
pub struct HelpPopup {
    lines: Vec<String>,
    selected: usize,
}

impl HelpPopup {
    /// Panel lines first, then the global lines
    pub fn new(panel_lines: Vec<String>) -> Self {
        let mut lines = panel_lines;
        lines.extend(GLOBAL_HELP.iter().map(|line| line.to_string()));
        Self { lines, selected: 0 }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Moves down, wrapping from the last line to the first
    pub fn next(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.selected = if self.selected + 1 >= self.lines.len() {
            0
        } else {
            self.selected + 1
        };
    }

    /// Moves up, stopping at the first line
    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> HelpAction {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.next(),
            KeyCode::Char('k') | KeyCode::Up => self.prev(),
            KeyCode::Esc => return HelpAction::Close,
            _ => {}
        }
        HelpAction::None
    }
}
