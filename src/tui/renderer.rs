use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
};
use std::path::Path;

use super::App;
use super::page::{Page, Placement};
use super::panel::{Panel, PanelId};
use super::popup::{ConfirmationPopup, HelpPopup, InputPopup, Popup, TimedPopup};
use super::theme::Theme;

/// Draw the panels, then every visible popup back to front
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let [left, right] =
        Layout::horizontal([Constraint::Ratio(1, 4), Constraint::Ratio(3, 4)]).areas(area);
    let [queue_area, playing_area] =
        Layout::vertical([Constraint::Ratio(5, 6), Constraint::Ratio(1, 6)]).areas(right);

    draw_playlists(frame, app, left);
    draw_queue(frame, app, queue_area);
    draw_now_playing(frame, app, playing_area);

    for page in app.pages.iter().filter(|p| p.visible) {
        draw_page(frame, &app.theme, page, area);
    }
}

fn panel_block<'a>(app: &App, panel: &'a dyn Panel) -> Block<'a> {
    let focused = app.focus.panel() == Some(panel.id());
    let color = if focused { app.theme.accent } else { app.theme.foreground };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(color))
        .title(Span::styled(panel.title(), Style::default().fg(color)))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn draw_list(
    frame: &mut Frame,
    block: Block,
    items: Vec<ListItem>,
    selected: usize,
    accent: Color,
    area: Rect,
) {
    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(selected));
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(accent).bold());
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_playlists(frame: &mut Frame, app: &App, area: Rect) {
    let items = app
        .playlist
        .playlists()
        .iter()
        .map(|p| ListItem::new(file_name(p)))
        .collect();
    let block = panel_block(app, app.panel(PanelId::Playlist));
    draw_list(frame, block, items, app.playlist.selected_index(), app.theme.accent, area);
}

fn draw_queue(frame: &mut Frame, app: &App, area: Rect) {
    let items = app
        .queue
        .items()
        .iter()
        .enumerate()
        .map(|(i, p)| ListItem::new(format!("{}. {}", i + 1, file_name(p))))
        .collect();
    let block = panel_block(app, app.panel(PanelId::Queue));
    draw_list(frame, block, items, app.queue.selected_index(), app.theme.accent, area);
}

fn draw_now_playing(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel_block(app, app.panel(PanelId::NowPlaying));
    let player = &app.now_playing;
    let title = player.track().map(file_name).unwrap_or_else(|| "-".to_string());
    let status = if player.is_paused() { "paused" } else { "playing" };

    let lines = vec![
        Line::from(Span::styled(title, Style::default().fg(app.theme.now_playing).bold())),
        Line::from(format!("{}  volume {}", status, player.volume())),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}

/// Area of a popup of the given size, clipped to `area`
pub fn popup_area(area: Rect, width: u16, height: u16, placement: Placement) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = match placement {
        Placement::Center => area.x + (area.width - width) / 2,
        Placement::TopRight => area.x + area.width - width - (area.width - width).min(2),
    };
    let y = match placement {
        Placement::Center => area.y + (area.height - height) / 2,
        Placement::TopRight => area.y + (area.height - height).min(1),
    };
    Rect::new(x, y, width, height)
}

fn draw_page(frame: &mut Frame, theme: &Theme, page: &Page, area: Rect) {
    let rect = popup_area(area, page.width, page.height, page.placement);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(theme.popup));

    match &page.popup {
        Popup::Confirmation(popup) => draw_confirmation(frame, theme, popup, block, rect),
        Popup::TimedInfo(popup) => draw_timed(frame, theme, popup, block, rect),
        Popup::Help(popup) => draw_help(frame, theme, popup, block, rect),
        Popup::TextInput(popup) => draw_input(frame, theme, popup, block, rect),
    }
}

fn draw_confirmation(
    frame: &mut Frame,
    theme: &Theme,
    popup: &ConfirmationPopup,
    block: Block,
    rect: Rect,
) {
    let buttons: Vec<Span> = ConfirmationPopup::buttons()
        .iter()
        .flat_map(|choice| {
            let style = if *choice == popup.selected() {
                Style::default().bg(theme.accent).fg(theme.popup)
            } else {
                Style::default().fg(theme.accent)
            };
            [Span::styled(format!(" {} ", choice.label()), style), Span::raw("   ")]
        })
        .collect();

    let lines = vec![
        Line::from(""),
        Line::from(popup.text().to_string()),
        Line::from(""),
        Line::from(buttons),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        rect,
    );
}

fn draw_timed(frame: &mut Frame, theme: &Theme, popup: &TimedPopup, block: Block, rect: Rect) {
    frame.render_widget(
        Paragraph::new(popup.text().to_string())
            .block(block.title(popup.title().to_string()))
            .style(Style::default().fg(theme.accent))
            .alignment(Alignment::Center),
        rect,
    );
}

fn draw_help(frame: &mut Frame, theme: &Theme, popup: &HelpPopup, block: Block, rect: Rect) {
    let items: Vec<ListItem> = popup.lines().iter().map(|l| ListItem::new(l.as_str())).collect();
    draw_list(frame, block.title(" Help "), items, popup.selected(), theme.accent, rect);
}

fn draw_input(frame: &mut Frame, theme: &Theme, popup: &InputPopup, block: Block, rect: Rect) {
    let line = Line::from(vec![
        Span::raw(popup.label().to_string()),
        Span::styled(popup.value().to_string(), Style::default().fg(theme.popup).bg(theme.accent)),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(block.title(popup.title().to_string())),
        rect,
    );

    let typed = popup.label().chars().count() + popup.value().chars().count();
    let cursor_x = rect.x + 1 + typed as u16;
    if cursor_x < rect.x + rect.width.saturating_sub(1) {
        frame.set_cursor_position((cursor_x, rect.y + 1));
    }
}
