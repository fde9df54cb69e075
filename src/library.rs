//! Storage and download collaborators used by the UI
//!
//! The UI only talks to the [`QueueStore`] and [`Library`] traits. The
//! local implementations keep the queue in a text file, playlists as
//! directories under the music dir and download through `youtube-dl`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Queue file location relative to the home directory
pub const QUEUE_PATH: &str = ".local/share/gomu/queue";

/// Persists the play queue between sessions
pub trait QueueStore: Send + Sync {
    fn load_queue(&self) -> Result<Vec<PathBuf>>;

    fn save_queue(&self, tracks: &[PathBuf]) -> Result<()>;
}

/// Playlist management and audio downloads
#[async_trait]
pub trait Library: Send + Sync {
    /// Download audio from `url` into the `dest` playlist
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()>;

    /// Create an empty playlist, returning its path
    async fn create_playlist(&self, name: &str) -> Result<PathBuf>;

    /// Tracks in a playlist, in name order
    fn playlist_tracks(&self, playlist: &Path) -> Result<Vec<PathBuf>>;
}

/// Queue stored as one track path per line
pub struct FileQueue {
    path: PathBuf,
}

impl FileQueue {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .context("Failed to get home directory")?
            .join(QUEUE_PATH))
    }
}

impl QueueStore for FileQueue {
    fn load_queue(&self) -> Result<Vec<PathBuf>> {
        if !self.path.exists() {
            log::debug!("No saved queue at {:?}", self.path);
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read queue file: {:?}", self.path))?;
        let tracks: Vec<PathBuf> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();
        log::info!("Loaded {} tracks from previous queue", tracks.len());
        Ok(tracks)
    }

    fn save_queue(&self, tracks: &[PathBuf]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create queue directory: {:?}", dir))?;
        }

        let mut content = String::new();
        for track in tracks {
            content.push_str(&track.to_string_lossy());
            content.push('\n');
        }
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write queue file: {:?}", self.path))?;
        log::info!("Saved {} tracks to {:?}", tracks.len(), self.path);
        Ok(())
    }
}

/// Playlists as directories under the music dir
pub struct LocalLibrary {
    music_dir: PathBuf,
    history_path: PathBuf,
}

impl LocalLibrary {
    pub fn new(music_dir: PathBuf, history_path: PathBuf) -> Self {
        Self {
            music_dir,
            history_path,
        }
    }

    async fn record_history(&self, url: &str) -> Result<()> {
        if let Some(dir) = self.history_path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create history directory: {:?}", dir))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history_path)
            .await
            .with_context(|| format!("Failed to open history file: {:?}", self.history_path))?;
        file.write_all(format!("{}\n", url).as_bytes()).await?;
        Ok(())
    }
}

#[async_trait]
impl Library for LocalLibrary {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let url = url.trim();
        if url.is_empty() {
            anyhow::bail!("No url given");
        }

        log::info!("Downloading {} into {:?}", url, dest);
        let output = tokio::process::Command::new("youtube-dl")
            .arg("--extract-audio")
            .arg("--audio-format")
            .arg("mp3")
            .arg("--output")
            .arg(dest.join("%(title)s.%(ext)s"))
            .arg(url)
            .output()
            .await
            .context("Failed to run youtube-dl")?;

        if !output.status.success() {
            anyhow::bail!(
                "youtube-dl failed for {}: {}",
                url,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        self.record_history(url).await?;
        log::info!("Finished downloading {}", url);
        Ok(())
    }

    async fn create_playlist(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.is_empty() || name.contains(std::path::MAIN_SEPARATOR) || name == ".." {
            anyhow::bail!("Invalid playlist name: {:?}", name);
        }

        let path = self.music_dir.join(name);
        tokio::fs::create_dir(&path)
            .await
            .with_context(|| format!("Failed to create playlist: {:?}", path))?;
        log::info!("Created playlist {:?}", path);
        Ok(path)
    }

    fn playlist_tracks(&self, playlist: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(playlist)
            .with_context(|| format!("Failed to read playlist: {:?}", playlist))?;
        let mut tracks = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() {
                tracks.push(path);
            }
        }
        tracks.sort();
        Ok(tracks)
    }
}
