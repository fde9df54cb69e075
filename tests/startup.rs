//! Startup and shutdown scenarios

mod common;

use std::fs;

use common::running_app;
use gomu::cli::Args;
use gomu::config::{Config, DEFAULT_CONFIG};
use gomu::lifecycle;
use gomu::tui::{AppState, QuitReason, UiRequest};

#[test]
fn test_first_run_creates_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".config").join("gomu").join("config");

    let config = Config::load(&path);
    assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    assert_eq!(config.path(), Some(path.as_path()));

    // Second start reads the same file back untouched
    fs::write(&path, "[general]\nvolume = 40\n").unwrap();
    let config = Config::load(&path);
    assert_eq!(config.volume(), 40);
    assert_eq!(fs::read_to_string(&path).unwrap(), "[general]\nvolume = 40\n");
}

#[test]
fn test_config_flag_reads_without_creating() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("elsewhere");
    let args = Args {
        config: Some(path.clone()),
        ..Default::default()
    };

    let config = lifecycle::load_config(&args);
    assert!(!path.exists());
    assert!(config.get_bool("general.confirm_on_exit"));
}

#[test]
fn test_existing_config_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");
    let custom = "[general]\npopup_timeout = \"2s\"\n";
    fs::write(&path, custom).unwrap();

    let args = Args {
        config: Some(path.clone()),
        ..Default::default()
    };
    let config = lifecycle::load_config(&args);

    assert_eq!(fs::read_to_string(&path).unwrap(), custom);
    assert_eq!(config.popup_timeout(), std::time::Duration::from_secs(2));
    assert!(!Config::ensure_exists(&path).unwrap());
}

#[test]
fn test_unwritable_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "").unwrap();
    let args = Args {
        config: Some(blocker.join("config")),
        ..Default::default()
    };

    let config = lifecycle::load_config(&args);
    assert_eq!(config.popup_timeout(), std::time::Duration::from_secs(5));
    assert!(config.get_bool("general.load_prev_queue"));
}

#[tokio::test]
async fn test_quit_and_signal_persist_once() {
    let config = Config::parse("[general]\nconfirm_on_exit = false").unwrap();
    let (mut app, mut rx, queue) = running_app(&config);

    app.sender()
        .send(UiRequest::Quit(QuitReason::Signal("SIGINT".to_string())))
        .unwrap();
    app.handle_key(crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Char('q')));
    app.drain_requests(&mut rx);

    assert_eq!(app.state(), AppState::Terminated);
    assert_eq!(queue.save_count(), 1);
}

#[tokio::test]
async fn test_signal_then_quit_persist_once() {
    let (mut app, mut rx, queue) = running_app(&Config::builtin());

    app.sender()
        .send(UiRequest::Quit(QuitReason::Signal("SIGTERM".to_string())))
        .unwrap();
    app.drain_requests(&mut rx);
    assert!(app.should_exit());

    // Keys after termination are ignored
    app.handle_key(crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Char('q')));
    app.run_command("quit");
    assert_eq!(queue.save_count(), 1);
}
