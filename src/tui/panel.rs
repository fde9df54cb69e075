//! The three persistent panels: playlists, queue and now-playing

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Playlist,
    Queue,
    NowPlaying,
}

impl PanelId {
    /// Next panel in cycle order
    pub fn next(&self) -> Self {
        match self {
            PanelId::Playlist => PanelId::Queue,
            PanelId::Queue => PanelId::NowPlaying,
            PanelId::NowPlaying => PanelId::Playlist,
        }
    }
}

/// Behaviour shared by every panel
pub trait Panel {
    fn id(&self) -> PanelId;

    fn title(&self) -> &str;

    /// Panel specific lines for the help popup
    fn help(&self) -> Vec<String>;

    /// Handle a key while the panel is focused. Keys bound to actions are
    /// returned as command names to run through the command registry.
    fn handle_key(&mut self, key: KeyEvent) -> Option<&'static str>;
}

fn step_down(selected: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (selected + 1).min(len - 1) }
}

pub struct PlaylistPanel {
    root: PathBuf,
    playlists: Vec<PathBuf>,
    selected: usize,
}

impl PlaylistPanel {
    pub fn new(root: PathBuf, playlists: Vec<PathBuf>) -> Self {
        Self {
            root,
            playlists,
            selected: 0,
        }
    }

    /// List the playlist directories directly under `root`
    pub fn load(root: &Path) -> Result<Self> {
        let mut playlists = Vec::new();
        let entries = fs::read_dir(root)
            .with_context(|| format!("Failed to read music directory: {:?}", root))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                playlists.push(path);
            }
        }
        playlists.sort();
        Ok(Self::new(root.to_path_buf(), playlists))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn playlists(&self) -> &[PathBuf] {
        &self.playlists
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Path> {
        self.playlists.get(self.selected).map(PathBuf::as_path)
    }

    pub fn add(&mut self, playlist: PathBuf) {
        if !self.playlists.contains(&playlist) {
            self.playlists.push(playlist);
            self.playlists.sort();
        }
    }
}

impl Panel for PlaylistPanel {
    fn id(&self) -> PanelId {
        PanelId::Playlist
    }

    fn title(&self) -> &str {
        " Playlists "
    }

    fn help(&self) -> Vec<String> {
        vec![
            "j      down".to_string(),
            "k      up".to_string(),
            "l      add playlist to queue".to_string(),
            "a      create playlist".to_string(),
            "Y      download audio".to_string(),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<&'static str> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = step_down(self.selected, self.playlists.len());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Char('l') | KeyCode::Enter => Some("add_playlist"),
            KeyCode::Char('a') => Some("create_playlist"),
            KeyCode::Char('Y') => Some("download_audio"),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct QueuePanel {
    items: Vec<PathBuf>,
    selected: usize,
}

impl QueuePanel {
    pub fn new(items: Vec<PathBuf>) -> Self {
        Self { items, selected: 0 }
    }

    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn extend(&mut self, tracks: impl IntoIterator<Item = PathBuf>) {
        self.items.extend(tracks);
    }

    /// Take the next track to play
    pub fn pop_front(&mut self) -> Option<PathBuf> {
        if self.items.is_empty() {
            return None;
        }
        let track = self.items.remove(0);
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        Some(track)
    }

    pub fn remove_selected(&mut self) -> Option<PathBuf> {
        if self.selected >= self.items.len() {
            return None;
        }
        let track = self.items.remove(self.selected);
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        Some(track)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = 0;
    }
}

impl Panel for QueuePanel {
    fn id(&self) -> PanelId {
        PanelId::Queue
    }

    fn title(&self) -> &str {
        " Queue "
    }

    fn help(&self) -> Vec<String> {
        vec![
            "j      down".to_string(),
            "k      up".to_string(),
            "d      remove from queue".to_string(),
            "D      clear queue".to_string(),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<&'static str> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = step_down(self.selected, self.items.len());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Char('d') => Some("delete_item"),
            KeyCode::Char('D') => Some("clear_queue"),
            _ => None,
        }
    }
}

/// Playback state. Audio output itself lives outside the UI.
pub struct NowPlayingPanel {
    track: Option<PathBuf>,
    paused: bool,
    volume: u8,
}

impl NowPlayingPanel {
    pub const VOLUME_STEP: u8 = 5;

    pub fn new(volume: u8) -> Self {
        Self {
            track: None,
            paused: false,
            volume: volume.min(100),
        }
    }

    pub fn track(&self) -> Option<&Path> {
        self.track.as_deref()
    }

    pub fn set_track(&mut self, track: Option<PathBuf>) {
        self.track = track;
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn volume_up(&mut self) -> u8 {
        self.volume = self.volume.saturating_add(Self::VOLUME_STEP).min(100);
        self.volume
    }

    pub fn volume_down(&mut self) -> u8 {
        self.volume = self.volume.saturating_sub(Self::VOLUME_STEP);
        self.volume
    }
}

impl Panel for NowPlayingPanel {
    fn id(&self) -> PanelId {
        PanelId::NowPlaying
    }

    fn title(&self) -> &str {
        " Now Playing "
    }

    fn help(&self) -> Vec<String> {
        vec!["space  toggle play/pause".to_string()]
    }

    fn handle_key(&mut self, _key: KeyEvent) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_order() {
        assert_eq!(PanelId::Playlist.next(), PanelId::Queue);
        assert_eq!(PanelId::Queue.next(), PanelId::NowPlaying);
        assert_eq!(PanelId::NowPlaying.next(), PanelId::Playlist);
    }

    #[test]
    fn test_playlist_keys_map_to_commands() {
        let mut panel = PlaylistPanel::new(PathBuf::from("/music"), vec![]);
        assert_eq!(panel.handle_key(KeyEvent::from(KeyCode::Char('a'))), Some("create_playlist"));
        assert_eq!(panel.handle_key(KeyEvent::from(KeyCode::Char('Y'))), Some("download_audio"));
        assert_eq!(panel.handle_key(KeyEvent::from(KeyCode::Char('j'))), None);
        assert_eq!(panel.selected_index(), 0);
    }

    #[test]
    fn test_queue_remove_keeps_selection_in_range() {
        let mut queue = QueuePanel::new(vec![PathBuf::from("a"), PathBuf::from("b")]);
        queue.handle_key(KeyEvent::from(KeyCode::Char('j')));
        assert_eq!(queue.remove_selected(), Some(PathBuf::from("b")));
        assert_eq!(queue.selected_index(), 0);
        assert_eq!(queue.pop_front(), Some(PathBuf::from("a")));
        assert_eq!(queue.pop_front(), None);
    }

    #[test]
    fn test_volume_bounds() {
        let mut player = NowPlayingPanel::new(98);
        assert_eq!(player.volume_up(), 100);
        let mut player = NowPlayingPanel::new(3);
        assert_eq!(player.volume_down(), 0);
    }
}
