#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use gomu::config::Config;
use gomu::library::{Library, QueueStore};
use gomu::tui::request::{self, UiReceiver};
use gomu::tui::{App, PlaylistPanel, Services};

/// Queue store that records every save
#[derive(Default)]
pub struct RecordingQueue {
    pub saves: Mutex<Vec<Vec<PathBuf>>>,
}

impl RecordingQueue {
    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }
}

impl QueueStore for RecordingQueue {
    fn load_queue(&self) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }

    fn save_queue(&self, tracks: &[PathBuf]) -> Result<()> {
        self.saves.lock().unwrap().push(tracks.to_vec());
        Ok(())
    }
}

/// Library whose actions always fail
pub struct FailingLibrary;

#[async_trait]
impl Library for FailingLibrary {
    async fn fetch(&self, url: &str, _dest: &Path) -> Result<()> {
        anyhow::bail!("cannot fetch {}", url)
    }

    async fn create_playlist(&self, name: &str) -> Result<PathBuf> {
        anyhow::bail!("cannot create {}", name)
    }

    fn playlist_tracks(&self, _playlist: &Path) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

pub fn running_app(config: &Config) -> (App, UiReceiver, Arc<RecordingQueue>) {
    let (tx, rx) = request::channel();
    let queue = Arc::new(RecordingQueue::default());
    let services = Services {
        queue: queue.clone(),
        library: Arc::new(FailingLibrary),
    };
    let playlist = PlaylistPanel::new(PathBuf::from("/music"), vec![PathBuf::from("/music/pop")]);
    let mut app = App::new(config, playlist, services, tx);
    app.mark_running();
    (app, rx, queue)
}
