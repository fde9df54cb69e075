//! Popup open/close behaviour observed through the public App API

mod common;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashSet;
use std::time::Duration;

use common::running_app;
use gomu::config::Config;
use gomu::tui::popup::{InputPrompt, HELP_ID};
use gomu::tui::{Focus, GLOBAL_COMMANDS, PageId, PanelId, PopupKind};

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn code(code: KeyCode) -> KeyEvent {
    KeyEvent::from(code)
}

#[tokio::test]
async fn test_close_is_idempotent_for_every_kind() {
    let (mut app, _rx, _) = running_app(&Config::builtin());

    let ids = vec![
        {
            app.confirm("Sure?", Box::new(|_, _| {}));
            PageId::new("confirmation-popup")
        },
        app.timed_popup(" Info ", "hello"),
        app.show_help(),
        app.prompt(InputPrompt::DownloadUrl, Box::new(|_, _| {})),
    ];

    for id in &ids {
        assert!(app.close_popup(id), "{} should have been open", id);
        assert!(!app.close_popup(id), "{} closed twice", id);
    }
    assert!(app.pages.is_empty());
    assert_eq!(app.focus.current(), &Focus::Panel(PanelId::Playlist));
}

#[tokio::test]
async fn test_timed_popups_are_independent() {
    let (mut app, _rx, _) = running_app(&Config::builtin());
    let ids: Vec<PageId> = (0..5).map(|i| app.timed_popup(" Info ", format!("{}", i))).collect();

    let unique: HashSet<&PageId> = ids.iter().collect();
    assert_eq!(unique.len(), 5);
    assert_eq!(app.pages.len(), 5);

    assert!(app.close_popup(&ids[2]));
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(app.pages.contains(id), i != 2);
    }
}

#[tokio::test]
async fn test_focus_restored_after_each_kind() {
    let (mut app, _rx, _) = running_app(&Config::builtin());
    app.cycle_panels();
    let before = app.focus.current().clone();
    assert_eq!(before, Focus::Panel(PanelId::Queue));

    let help = app.show_help();
    assert_ne!(app.focus.current(), &before);
    app.close_popup(&help);
    assert_eq!(app.focus.current(), &before);

    let input = app.prompt(InputPrompt::PlaylistName, Box::new(|_, _| {}));
    app.close_popup(&input);
    assert_eq!(app.focus.current(), &before);

    let timed = app.timed_popup(" Info ", "x");
    assert_eq!(app.focus.current(), &before);
    app.close_popup(&timed);
    assert_eq!(app.focus.current(), &before);
}

#[tokio::test]
async fn test_global_keys_suppressed_while_typing() {
    let (mut app, _rx, queue) = running_app(&Config::builtin());
    app.handle_key(key('Y'));
    assert_eq!(app.pages.front_kind(), Some(PopupKind::TextInput));

    let volume = app.now_playing.volume();
    let mut typed = String::new();
    for c in GLOBAL_COMMANDS.keys() {
        app.handle_key(key(*c));
        typed.push(*c);
    }
    app.handle_key(code(KeyCode::Tab));

    assert_eq!(app.pages.len(), 1);
    assert_eq!(app.pages.front_kind(), Some(PopupKind::TextInput));
    assert_eq!(app.now_playing.volume(), volume);
    assert!(!app.now_playing.is_paused());
    assert!(!app.should_exit());
    assert_eq!(queue.save_count(), 0);

    let page = app.pages.front().unwrap();
    let gomu::tui::Popup::TextInput(input) = &page.popup else {
        panic!("expected text input");
    };
    assert_eq!(input.value(), typed);
}

#[tokio::test]
async fn test_cycle_key_swallowed_by_confirmation() {
    let (mut app, _rx, _) = running_app(&Config::builtin());
    app.handle_key(key('q'));
    assert_eq!(app.pages.front_kind(), Some(PopupKind::Confirmation));

    app.handle_key(code(KeyCode::Tab));
    app.handle_key(code(KeyCode::Tab));
    assert!(matches!(app.focus.current(), Focus::Popup(_)));

    app.handle_key(code(KeyCode::Esc));
    assert!(app.pages.is_empty());
    assert_eq!(app.focus.current(), &Focus::Panel(PanelId::Playlist));
    assert!(!app.should_exit());
}

#[tokio::test]
async fn test_help_navigation_through_keys() {
    let (mut app, _rx, _) = running_app(&Config::builtin());
    app.handle_key(key('?'));

    let len = match &app.pages.front().unwrap().popup {
        gomu::tui::Popup::Help(help) => help.lines().len(),
        _ => panic!("expected help"),
    };
    app.handle_key(key('k'));
    for _ in 0..len {
        app.handle_key(key('j'));
    }

    match &app.pages.get(&PageId::new(HELP_ID)).unwrap().popup {
        gomu::tui::Popup::Help(help) => assert_eq!(help.selected(), 0),
        _ => panic!("expected help"),
    }
}

#[tokio::test]
async fn test_failed_action_does_not_reopen_popup() {
    let (mut app, mut rx, _) = running_app(&Config::builtin());
    app.handle_key(key('a'));
    for c in "rock".chars() {
        app.handle_key(key(c));
    }
    app.handle_key(code(KeyCode::Enter));
    assert!(app.pages.is_empty());

    // Let the failing action run; it only logs
    tokio::time::sleep(Duration::from_millis(10)).await;
    app.drain_requests(&mut rx);
    assert!(app.pages.is_empty());
    assert_eq!(app.playlist.playlists().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_volume_popup_expires() {
    let (mut app, mut rx, _) = running_app(&Config::builtin());
    app.cycle_panels();
    let before = app.focus.current().clone();

    app.handle_key(key('+'));
    assert_eq!(app.pages.front_kind(), Some(PopupKind::TimedInfo));

    tokio::time::sleep(Duration::from_millis(4900)).await;
    app.drain_requests(&mut rx);
    assert_eq!(app.pages.len(), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    tokio::task::yield_now().await;
    app.drain_requests(&mut rx);
    assert!(app.pages.is_empty());
    assert_eq!(app.focus.current(), &before);
}

#[tokio::test(start_paused = true)]
async fn test_timer_after_manual_close_is_noop() {
    let (mut app, mut rx, _) = running_app(&Config::builtin());
    let id = app.timed_popup(" Info ", "x");
    assert!(app.close_popup(&id));

    let help = app.show_help();
    tokio::time::sleep(Duration::from_secs(6)).await;
    tokio::task::yield_now().await;
    app.drain_requests(&mut rx);

    assert!(app.pages.contains(&help));
    assert_eq!(app.focus.current(), &Focus::Popup(help));
}
