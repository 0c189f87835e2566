//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Screen, TrackRow};
use crate::config::{ControlsSettings, UiSettings};
use crate::library::Artwork;
use crate::player::PlayerSurface;

const LIBRARY_CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected song"),
    ("q", "quit"),
];

const PLAYER_CONTROLS: &[(&str, &str)] = &[
    ("space/p", "play/pause"),
    ("h/l", "prev/next song"),
    ("0-9", "jump"),
    ("s", "shuffle"),
    ("r", "repeat one"),
    ("esc", "back"),
    ("q", "quit"),
];

fn padding_left() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the controls help text for `screen`, incorporating scrub seconds.
fn controls_text(screen: &Screen, scrub_seconds: u64) -> String {
    let pairs = match screen {
        Screen::Library => LIBRARY_CONTROLS,
        Screen::Player => PLAYER_CONTROLS,
        _ => &[("q", "quit")][..],
    };
    let mut parts: Vec<String> = pairs.iter().map(|(k, v)| format!("[{k}] {v}")).collect();
    if *screen == Screen::Player {
        parts.insert(2, format!("[H/L] scrub -/+{scrub_seconds}s"));
    }
    parts.join(" | ")
}

fn artwork_marker(artwork: &Artwork) -> &'static str {
    match artwork {
        Artwork::Image(_) => "▣",
        Artwork::Placeholder => "♪",
    }
}

fn row_item(row: TrackRow<'_>) -> ListItem<'_> {
    ListItem::new(Line::from(vec![
        Span::raw(artwork_marker(&row.artwork)),
        Span::raw(" "),
        Span::raw(row.title).bold(),
        Span::raw("  "),
        Span::raw(row.artist).dim(),
    ]))
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    player: Option<&PlayerSurface>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
    now: Instant,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" spindle ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    match (&app.screen, player) {
        (Screen::Player, Some(surface)) => draw_player(frame, surface, chunks[1], now),
        (Screen::Library | Screen::Player, _) => draw_library(frame, app, chunks[1]),
        (Screen::Loading, _) => draw_message(frame, chunks[1], " library ", "Loading…"),
        (Screen::Denied(msg), _) => draw_message(frame, chunks[1], " permission ", msg),
        (Screen::Empty(msg), _) => draw_message(frame, chunks[1], " library ", msg),
    }

    let footer = Paragraph::new(controls_text(&app.screen, controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(padding_left()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);
}

fn draw_message(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = u16::try_from(text.chars().count() + 4).unwrap_or(u16::MAX);
    let msg = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(msg, centered_rect_sized(width, 3, inner));
}

fn draw_library(frame: &mut Frame, app: &App, area: Rect) {
    let list = &app.list;

    // Only build ListItems for the visible window, centered on the cursor
    // when possible.
    let total = list.len();
    let height = area.height.saturating_sub(2) as usize;
    let selected = list.selected();
    let (start, end) = if total <= height || height == 0 {
        (0, total)
    } else {
        let half = height / 2;
        let start = selected.saturating_sub(half).min(total - height);
        (start, start + height)
    };

    let items: Vec<ListItem> = list
        .rows()
        .skip(start)
        .take(end - start)
        .map(row_item)
        .collect();

    let title = match &app.current_dir {
        Some(dir) => format!(" tracks • {dir} "),
        None => " tracks ".to_string(),
    };
    let widget = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !list.is_empty() {
        state.select(Some(selected - start));
    }
    frame.render_stateful_widget(widget, area, &mut state);
}

fn draw_player(frame: &mut Frame, surface: &PlayerSurface, area: Rect, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" now playing ")
        .padding(padding_left());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let artwork = match &surface.artwork {
        Artwork::Image(locator) => format!("{} {locator}", artwork_marker(&surface.artwork)),
        Artwork::Placeholder => format!("{} no artwork", artwork_marker(&surface.artwork)),
    };

    frame.render_widget(Paragraph::new(surface.title.as_str()).bold(), rows[0]);
    frame.render_widget(Paragraph::new(surface.artist.as_str()), rows[1]);
    frame.render_widget(Paragraph::new(artwork).dim(), rows[2]);

    let gauge = Gauge::default()
        .ratio(surface.progress.clamp(0.0, 1.0))
        .label(format!("{} / {}", surface.elapsed, surface.duration))
        .use_unicode(true);
    frame.render_widget(gauge, rows[4]);

    let flags = format!(
        "{} • Shuffle: {} • Repeat one: {}",
        if surface.playing { "Playing" } else { "Paused" },
        if surface.shuffle { "ON" } else { "OFF" },
        if surface.repeat { "ON" } else { "OFF" },
    );
    frame.render_widget(Paragraph::new(flags), rows[5]);

    if let Some(toast) = surface.toast(now) {
        frame.render_widget(Paragraph::new(toast).slow_blink(), rows[6]);
    }
}
