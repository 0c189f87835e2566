use std::time::{Duration, Instant};

use crate::library::Artwork;

/// Display surface of the player screen.
///
/// The controller only writes to it. Scrubber changes made through
/// [`PlayerView::show_progress`] are feedback, never seeks.
pub trait PlayerView {
    fn show_track(&mut self, title: &str, artist: &str, artwork: &Artwork);
    fn show_duration(&mut self, text: &str);
    /// Scrubber position in `[0, 1]` plus elapsed and total time text.
    fn show_progress(&mut self, fraction: f64, elapsed: &str, duration: &str);
    fn show_elapsed(&mut self, text: &str);
    fn show_playing(&mut self, playing: bool);
    fn show_shuffle(&mut self, on: bool);
    fn show_repeat(&mut self, on: bool);
    /// Transient, non-fatal message.
    fn notify(&mut self, message: &str);
}

/// In-memory player surface rendered by the terminal UI.
#[derive(Debug, Clone)]
pub struct PlayerSurface {
    pub title: String,
    pub artist: String,
    pub artwork: Artwork,
    pub elapsed: String,
    pub duration: String,
    pub progress: f64,
    pub playing: bool,
    pub shuffle: bool,
    pub repeat: bool,
    toast: Option<(String, Instant)>,
    toast_ttl: Duration,
}

impl PlayerSurface {
    pub fn new(toast_ttl: Duration) -> Self {
        Self {
            title: String::new(),
            artist: String::new(),
            artwork: Artwork::Placeholder,
            elapsed: "00:00".to_string(),
            duration: "00:00".to_string(),
            progress: 0.0,
            playing: false,
            shuffle: false,
            repeat: false,
            toast: None,
            toast_ttl,
        }
    }

    /// The current notification, unless it has expired at `now`.
    pub fn toast(&self, now: Instant) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|(_, at)| now.saturating_duration_since(*at) < self.toast_ttl)
            .map(|(msg, _)| msg.as_str())
    }
}

impl PlayerView for PlayerSurface {
    fn show_track(&mut self, title: &str, artist: &str, artwork: &Artwork) {
        self.title = title.to_string();
        self.artist = artist.to_string();
        self.artwork = artwork.clone();
        self.elapsed = "00:00".to_string();
        self.progress = 0.0;
    }

    fn show_duration(&mut self, text: &str) {
        self.duration = text.to_string();
    }

    fn show_progress(&mut self, fraction: f64, elapsed: &str, duration: &str) {
        self.progress = fraction.clamp(0.0, 1.0);
        self.elapsed = elapsed.to_string();
        self.duration = duration.to_string();
    }

    fn show_elapsed(&mut self, text: &str) {
        self.elapsed = text.to_string();
    }

    fn show_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    fn show_shuffle(&mut self, on: bool) {
        self.shuffle = on;
    }

    fn show_repeat(&mut self, on: bool) {
        self.repeat = on;
    }

    fn notify(&mut self, message: &str) {
        self.toast = Some((message.to_string(), Instant::now()));
    }
}
