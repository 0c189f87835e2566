use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::library::Track;

use super::engine::{EngineEvent, EngineState, MediaEngine, RepeatMode};
use super::format::format_time;
use super::playlist::Playlist;
use super::ticker::Ticker;
use super::view::PlayerView;

/// Where the controller is in the life of the current track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    /// Source handed to the engine, waiting for it to become ready.
    Preparing(u64),
    Ready {
        track: u64,
        playing: bool,
    },
    Ended,
    Error,
}

/// Who moved the scrubber.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScrubOrigin {
    /// Direct user interaction; honored as a seek.
    User,
    /// The controller's own progress feedback; ignored.
    Program,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    #[error("no songs found")]
    EmptyLibrary,

    #[error("start index {index} is out of range for {len} tracks")]
    StartOutOfRange { index: usize, len: usize },

    #[error("player session already closed")]
    Released,
}

/// Playback controller for one player session.
///
/// All methods run on the UI thread. The engine is owned exclusively and
/// released exactly once, by [`Controller::teardown`] or on drop.
pub struct Controller<E: MediaEngine, V: PlayerView> {
    engine: Option<E>,
    view: V,
    playlist: Option<Playlist>,
    state: PlaybackState,
    repeat: RepeatMode,
    ticker: Ticker,
    scrubbing: bool,
    rng: StdRng,
}

impl<E: MediaEngine, V: PlayerView> Controller<E, V> {
    pub fn new(engine: E, view: V, tick_interval: Duration) -> Self {
        Self {
            engine: Some(engine),
            view,
            playlist: None,
            state: PlaybackState::Idle,
            repeat: RepeatMode::Off,
            ticker: Ticker::new(tick_interval),
            scrubbing: false,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Start a session over `tracks`, playing `start` first.
    ///
    /// An empty list is rejected before the engine is touched.
    pub fn load(&mut self, tracks: Vec<Track>, start: usize) -> Result<(), PlayerError> {
        let playlist = Playlist::new(tracks, start)?;
        let Some(engine) = self.engine.as_mut() else {
            return Err(PlayerError::Released);
        };

        info!(tracks = playlist.len(), start, "player session started");
        engine.set_repeat_mode(self.repeat);
        self.view.show_shuffle(false);
        self.view.show_repeat(self.repeat == RepeatMode::One);
        self.playlist = Some(playlist);
        self.play_track(start);
        Ok(())
    }

    /// Load and start the track at `index` of the active ordering.
    ///
    /// The view shows the new track right away, before the engine is ready.
    pub fn play_track(&mut self, index: usize) {
        let (Some(engine), Some(playlist)) = (self.engine.as_mut(), self.playlist.as_mut()) else {
            return;
        };

        let index = playlist.select(index);
        let track = playlist.current();
        debug!(index, id = track.id, source = %track.source, "play track");

        self.ticker.cancel();
        engine.stop();
        engine.clear();
        engine.set_source(&track.source);
        engine.prepare();
        engine.play();

        self.view.show_track(
            track.display_title(),
            track.display_artist(),
            &track.artwork_or_placeholder(),
        );
        self.view.show_playing(engine.is_playing());
        self.state = PlaybackState::Preparing(track.id);
    }

    /// Drain and handle every pending engine event.
    pub fn pump_engine_events(&mut self) {
        loop {
            let Some(event) = self.engine.as_mut().and_then(|e| e.poll_event()) else {
                break;
            };
            self.handle_engine_event(event);
        }
    }

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if self.engine.is_none() || self.state == PlaybackState::Idle {
            return;
        }

        match event {
            EngineEvent::StateChanged(EngineState::Ready) => self.on_ready(),
            EngineEvent::StateChanged(EngineState::Ended) => {
                debug!("track ended");
                self.state = PlaybackState::Ended;
                self.ticker.cancel();
                self.next();
            }
            EngineEvent::Error(details) => {
                warn!(%details, "playback error");
                self.ticker.cancel();
                self.state = PlaybackState::Error;
                self.view.notify(&format!("Error: {details}"));
                self.view.show_playing(false);
            }
        }
    }

    fn on_ready(&mut self) {
        let (Some(engine), Some(playlist)) = (self.engine.as_ref(), self.playlist.as_ref()) else {
            return;
        };

        let playing = engine.is_playing();
        self.view.show_duration(&format_time(engine.duration() / 1000));
        self.view.show_playing(playing);
        self.state = PlaybackState::Ready {
            track: playlist.current().id,
            playing,
        };
        if !self.scrubbing {
            self.ticker.start();
        }
    }

    /// Pause when playing, resume otherwise. After an engine error this
    /// retries the current track.
    pub fn toggle_play_pause(&mut self) {
        match self.state {
            PlaybackState::Idle => return,
            PlaybackState::Error => {
                if let Some(index) = self.playlist.as_ref().map(Playlist::current_index) {
                    self.play_track(index);
                }
                return;
            }
            _ => {}
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        if engine.is_playing() {
            engine.pause();
            self.ticker.cancel();
        } else {
            engine.play();
            if !self.scrubbing {
                self.ticker.start();
            }
        }

        let playing = engine.is_playing();
        if let PlaybackState::Ready { playing: p, .. } = &mut self.state {
            *p = playing;
        }
        self.view.show_playing(playing);
    }

    pub fn next(&mut self) {
        if let Some(index) = self.playlist.as_mut().map(Playlist::advance) {
            self.play_track(index);
        }
    }

    pub fn previous(&mut self) {
        if let Some(index) = self.playlist.as_mut().map(Playlist::retreat) {
            self.play_track(index);
        }
    }

    /// Flip shuffle. Only index bookkeeping changes; playback continues.
    pub fn toggle_shuffle(&mut self) {
        let Some(playlist) = self.playlist.as_mut() else {
            return;
        };
        let on = playlist.toggle_shuffle(&mut self.rng);
        debug!(on, index = playlist.current_index(), "shuffle toggled");
        self.view.show_shuffle(on);
    }

    /// Flip repeat-one and hand it to the engine, which loops on its own.
    pub fn toggle_repeat(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        self.repeat = match self.repeat {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        };
        engine.set_repeat_mode(self.repeat);
        debug!(repeat = ?self.repeat, "repeat toggled");
        self.view.show_repeat(self.repeat == RepeatMode::One);
    }

    /// The user grabbed the scrubber: suspend the progress tick.
    pub fn begin_scrub(&mut self) {
        self.scrubbing = true;
        self.ticker.cancel();
    }

    /// Scrubber moved to `fraction` of the track. Seeks only on user input.
    pub fn scrubber_moved(&mut self, fraction: f64, origin: ScrubOrigin) {
        if origin != ScrubOrigin::User || fraction.is_nan() {
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if self.state == PlaybackState::Idle {
            return;
        }

        let duration = engine.duration();
        let target = (fraction.clamp(0.0, 1.0) * duration as f64) as u64;
        engine.seek_to(target);
        self.view.show_elapsed(&format_time(target / 1000));
    }

    /// The user let go of the scrubber: resume the progress tick.
    pub fn end_scrub(&mut self) {
        self.scrubbing = false;
        if self.engine.is_some() && self.state != PlaybackState::Idle {
            self.ticker.start();
        }
    }

    /// Run the progress tick if it is due at `now`.
    pub fn poll_timer(&mut self, now: Instant) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        if !self.ticker.fire(now) {
            return;
        }
        // A paused engine ends the tick chain; resuming starts a new one.
        if !engine.is_playing() {
            return;
        }

        let position = engine.current_position();
        let duration = engine.duration();
        if duration > 0 {
            let fraction = position as f64 / duration as f64;
            self.view.show_progress(
                fraction,
                &format_time(position / 1000),
                &format_time(duration / 1000),
            );
        }
        self.ticker.reschedule(now);
    }

    /// Cancel the tick and release the engine. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.ticker.cancel();
        self.scrubbing = false;
        if let Some(mut engine) = self.engine.take() {
            engine.release();
            info!(state = ?self.state, "player session closed");
        }
        self.playlist = None;
        self.state = PlaybackState::Idle;
    }
}

/// Inspection hooks for the controller tests.
#[cfg(test)]
impl<E: MediaEngine, V: PlayerView> Controller<E, V> {
    /// Replace the random source used for shuffling.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn is_shuffled(&self) -> bool {
        self.playlist.as_ref().is_some_and(Playlist::is_shuffled)
    }

    pub fn is_released(&self) -> bool {
        self.engine.is_none()
    }

    pub fn tick_scheduled(&self) -> bool {
        self.ticker.is_scheduled()
    }
}

impl<E: MediaEngine, V: PlayerView> Drop for Controller<E, V> {
    fn drop(&mut self) {
        self.teardown();
    }
}
