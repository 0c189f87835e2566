use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::{App, Screen};
use crate::audio::RodioEngine;
use crate::config;
use crate::library::LibraryEvent;
use crate::player::{Controller, MediaEngine, PlayerSurface, ScrubOrigin};
use crate::ui;

pub type Player = Controller<RodioEngine, PlayerSurface>;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// The open player session, if the player screen is showing.
    pub player: Option<Player>,
}

/// Main terminal event loop: handles input, library and engine events, the
/// progress tick and drawing. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    library_rx: &mpsc::Receiver<LibraryEvent>,
    activate_rx: &mpsc::Receiver<usize>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(LibraryEvent::Loaded(result)) = library_rx.try_recv() {
            app.library_loaded(result);
        }

        while let Ok(index) = activate_rx.try_recv() {
            open_player(settings, app, state, index);
        }

        if let Some(player) = state.player.as_mut() {
            player.pump_engine_events();
            player.poll_timer(Instant::now());
        }

        let surface = state.player.as_ref().map(|p| p.view());
        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                surface,
                &settings.ui,
                &settings.controls,
                Instant::now(),
            )
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, state) {
                    break;
                }
            }
        }
    }

    close_player(app, state);
    Ok(())
}

fn open_player(settings: &config::Settings, app: &mut App, state: &mut EventLoopState, index: usize) {
    let Some(handoff) = app.open_player(index) else {
        return;
    };
    if let Some(mut old) = state.player.take() {
        old.teardown();
    }

    let surface = PlayerSurface::new(Duration::from_millis(settings.ui.toast_ms));
    let tick = Duration::from_millis(settings.playback.tick_interval_ms);
    let mut player = Controller::new(RodioEngine::new(), surface, tick);

    match player.load(handoff.tracks, handoff.start) {
        Ok(()) => state.player = Some(player),
        Err(e) => {
            warn!(error = %e, "could not start playback");
            app.close_player();
        }
    }
}

fn close_player(app: &mut App, state: &mut EventLoopState) {
    if let Some(mut player) = state.player.take() {
        player.teardown();
    }
    app.close_player();
}

/// Seek through the scrubber as if the user dragged it to `fraction`.
fn scrub_to(player: &mut Player, fraction: f64) {
    player.begin_scrub();
    player.scrubber_moved(fraction, ScrubOrigin::User);
    player.end_scrub();
}

fn scrub_by(player: &mut Player, delta_secs: i64) {
    let Some(engine) = player.engine() else {
        return;
    };
    let duration = engine.duration();
    if duration == 0 {
        return;
    }
    let position = engine.current_position() as i64;
    let target = (position + delta_secs * 1000).clamp(0, duration as i64);
    scrub_to(player, target as f64 / duration as f64);
}

/// Handle one key press. Returns `true` when the app should quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
) -> bool {
    match app.screen {
        Screen::Library => handle_library_key(key, app, state),
        Screen::Player => handle_player_key(key, settings, app, state),
        Screen::Loading | Screen::Denied(_) | Screen::Empty(_) => {
            matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        }
    }
}

fn handle_library_key(key: KeyEvent, app: &mut App, state: &mut EventLoopState) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.list.first();
            } else {
                state.pending_gg = true;
            }
            return false;
        }
        KeyCode::Char('G') => app.list.last(),
        KeyCode::Char('j') | KeyCode::Down => app.list.next(),
        KeyCode::Char('k') | KeyCode::Up => app.list.prev(),
        KeyCode::Enter => {
            // The activation observer forwards the index to the loop.
            app.list.activate();
        }
        _ => {}
    }
    // g pending should clear on any other key
    state.pending_gg = false;
    false
}

fn handle_player_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
) -> bool {
    let Some(player) = state.player.as_mut() else {
        app.close_player();
        return false;
    };
    let scrub = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;

    match key.code {
        KeyCode::Char('q') => {
            close_player(app, state);
            return true;
        }
        KeyCode::Esc | KeyCode::Backspace => close_player(app, state),
        KeyCode::Char('p') | KeyCode::Char(' ') => player.toggle_play_pause(),
        KeyCode::Char('l') | KeyCode::Right => player.next(),
        KeyCode::Char('h') | KeyCode::Left => player.previous(),
        KeyCode::Char('s') => player.toggle_shuffle(),
        KeyCode::Char('r') => player.toggle_repeat(),
        KeyCode::Char('L') => scrub_by(player, scrub),
        KeyCode::Char('H') => scrub_by(player, -scrub),
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = c.to_digit(10).unwrap_or(0);
            debug!(tenth, "jump");
            scrub_to(player, f64::from(tenth) / 10.0);
        }
        _ => {}
    }
    false
}
