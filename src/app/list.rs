//! The track list presenter: rows, cursor and row activation.

use std::fmt;

use crate::library::{Artwork, Track};

/// One rendered row of the track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow<'a> {
    pub title: &'a str,
    pub artist: &'a str,
    pub artwork: Artwork,
}

impl<'a> From<&'a Track> for TrackRow<'a> {
    fn from(track: &'a Track) -> Self {
        Self {
            title: track.display_title(),
            artist: track.display_artist(),
            artwork: track.artwork_or_placeholder(),
        }
    }
}

type ActivateFn = Box<dyn FnMut(usize)>;

/// Holds the loaded tracks and a cursor. Activating a row hands its index
/// to the registered observer.
pub struct TrackList {
    tracks: Vec<Track>,
    selected: usize,
    on_activate: Option<ActivateFn>,
}

impl fmt::Debug for TrackList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackList")
            .field("tracks", &self.tracks.len())
            .field("selected", &self.selected)
            .finish()
    }
}

impl Default for TrackList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TrackList {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            on_activate: None,
        }
    }

    /// Register the observer called with the index of each activated row.
    pub fn on_activate(&mut self, f: impl FnMut(usize) + 'static) {
        self.on_activate = Some(Box::new(f));
    }

    /// Replace the bound tracks, keeping the observer.
    pub fn bind(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.selected = 0;
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn rows(&self) -> impl Iterator<Item = TrackRow<'_>> + '_ {
        self.tracks.iter().map(TrackRow::from)
    }

    /// Move the cursor to `index` if it exists.
    pub fn select(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.selected = index;
        }
    }

    /// Move the cursor down. Wraps around to the first row.
    pub fn next(&mut self) {
        if !self.tracks.is_empty() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move the cursor up. Wraps around to the last row.
    pub fn prev(&mut self) {
        let n = self.tracks.len();
        if n > 0 {
            self.selected = (self.selected + n - 1) % n;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    /// Activate the row under the cursor.
    pub fn activate(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        let index = self.selected;
        if let Some(f) = self.on_activate.as_mut() {
            f(index);
        }
        Some(index)
    }
}
