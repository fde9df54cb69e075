//! Named commands invoked from key bindings and the command prompt

use anyhow::Result;
use std::collections::HashMap;

use super::App;
use super::popup::{InputPrompt, HELP_ID};
use super::page::PageId;
use super::request::UiRequest;

/// A command acting on the whole application
pub type CommandFn = fn(&mut App) -> Result<()>;

/// Maps command names to their implementation
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &'static str, command: CommandFn) {
        if self.commands.insert(name, command).is_some() {
            log::warn!("Command {} was defined twice", name);
        }
    }

    pub fn get_fn(&self, name: &str) -> Result<CommandFn> {
        self.commands
            .get(name)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Command not defined: {}", name))
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort();
        names
    }

    /// Register every built-in command
    pub fn define_commands(&mut self) {
        self.define("quit", quit);
        self.define("toggle_pause", toggle_pause);
        self.define("volume_up", volume_up);
        self.define("volume_down", volume_down);
        self.define("skip", skip);
        self.define("command_search", command_search);
        self.define("toggle_help", toggle_help);
        self.define("create_playlist", create_playlist);
        self.define("download_audio", download_audio);
        self.define("add_playlist", add_playlist);
        self.define("delete_item", delete_item);
        self.define("clear_queue", clear_queue);
    }
}

fn quit(app: &mut App) -> Result<()> {
    app.request_quit();
    Ok(())
}

fn toggle_pause(app: &mut App) -> Result<()> {
    app.now_playing.toggle_pause();
    Ok(())
}

fn volume_up(app: &mut App) -> Result<()> {
    let volume = app.now_playing.volume_up();
    app.volume_popup(volume);
    Ok(())
}

fn volume_down(app: &mut App) -> Result<()> {
    let volume = app.now_playing.volume_down();
    app.volume_popup(volume);
    Ok(())
}

fn skip(app: &mut App) -> Result<()> {
    let next = app.queue.pop_front();
    app.now_playing.set_track(next);
    Ok(())
}

fn command_search(app: &mut App) -> Result<()> {
    app.prompt(
        InputPrompt::Command,
        Box::new(|app, name| app.run_command(name.trim())),
    );
    Ok(())
}

fn toggle_help(app: &mut App) -> Result<()> {
    let help = PageId::new(HELP_ID);
    if app.pages.contains(&help) {
        app.close_popup(&help);
    } else {
        app.show_help();
    }
    Ok(())
}

fn create_playlist(app: &mut App) -> Result<()> {
    app.prompt(
        InputPrompt::PlaylistName,
        Box::new(|app, name| {
            let library = app.library();
            let tx = app.sender();
            app.spawn_action("create playlist", async move {
                let path = library.create_playlist(&name).await?;
                if let Err(e) = tx.send(UiRequest::PlaylistCreated(path)) {
                    log::debug!("Playlist created after UI closed: {}", e);
                }
                Ok(())
            });
        }),
    );
    Ok(())
}

fn download_audio(app: &mut App) -> Result<()> {
    let Some(dest) = app.playlist.selected().map(|p| p.to_path_buf()) else {
        anyhow::bail!("No playlist selected to download into");
    };

    app.prompt(
        InputPrompt::DownloadUrl,
        Box::new(move |app, url| {
            let library = app.library();
            app.spawn_action("download", async move { library.fetch(&url, &dest).await });
        }),
    );
    Ok(())
}

fn add_playlist(app: &mut App) -> Result<()> {
    let Some(playlist) = app.playlist.selected().map(|p| p.to_path_buf()) else {
        return Ok(());
    };

    if !app.settings().confirm_bulk_add {
        return app.enqueue_playlist(&playlist);
    }

    app.confirm(
        "Are you sure to add this whole directory into queue?",
        Box::new(move |app, choice| {
            if !choice.is_yes() {
                return;
            }
            if let Err(e) = app.enqueue_playlist(&playlist) {
                log::error!("{:#}", e);
            }
        }),
    );
    Ok(())
}

fn delete_item(app: &mut App) -> Result<()> {
    if let Some(track) = app.queue.remove_selected() {
        log::debug!("Removed {:?} from queue", track);
    }
    Ok(())
}

fn clear_queue(app: &mut App) -> Result<()> {
    app.queue.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut App) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_unknown_command_errors() {
        let registry = CommandRegistry::new();
        let err = registry.get_fn("nope").err().unwrap();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_define_and_get() {
        let mut registry = CommandRegistry::new();
        registry.define("noop", noop);
        assert!(registry.get_fn("noop").is_ok());
    }

    #[test]
    fn test_builtin_commands_present() {
        let mut registry = CommandRegistry::new();
        registry.define_commands();
        for name in super::super::keys::GLOBAL_COMMANDS.values() {
            assert!(registry.get_fn(name).is_ok(), "missing {}", name);
        }
        for name in ["create_playlist", "download_audio", "add_playlist", "delete_item", "clear_queue"] {
            assert!(registry.get_fn(name).is_ok(), "missing {}", name);
        }
    }
}
