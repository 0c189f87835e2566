//! Application model: which screen is showing and what the library screen
//! holds.

use tracing::{info, warn};

use crate::library::{LibraryError, Track};

use super::list::TrackList;

/// The screen currently shown by the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// The library query is still running.
    Loading,
    /// Access to the library root was refused.
    Denied(String),
    /// The query finished but produced nothing playable, or failed.
    Empty(String),
    Library,
    Player,
}

/// Everything the player screen needs to start: the full collection and
/// the index to start from. The player screen never re-queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handoff {
    pub tracks: Vec<Track>,
    pub start: usize,
}

/// The main application model.
#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    pub list: TrackList,
    pub current_dir: Option<String>,
}

impl App {
    pub fn new(current_dir: Option<String>) -> Self {
        Self {
            screen: Screen::Loading,
            list: TrackList::default(),
            current_dir,
        }
    }

    pub fn access_denied(&mut self) {
        let dir = self.current_dir.as_deref().unwrap_or("the library");
        self.screen = Screen::Denied(format!("Permission to read {dir} was denied"));
    }

    /// Apply the result of a library load.
    pub fn library_loaded(&mut self, result: Result<Vec<Track>, LibraryError>) {
        match result {
            Ok(tracks) if tracks.is_empty() => {
                self.list.bind(Vec::new());
                self.screen = Screen::Empty(LibraryError::EmptyLibrary.to_string());
            }
            Ok(tracks) => {
                info!(count = tracks.len(), "library ready");
                self.list.bind(tracks);
                self.screen = Screen::Library;
            }
            Err(LibraryError::PermissionDenied(path)) => {
                warn!(path = %path.display(), "library access denied");
                self.list.bind(Vec::new());
                self.screen = Screen::Denied(format!(
                    "Permission to read {} was denied",
                    path.display()
                ));
            }
            Err(e) => {
                warn!(error = %e, "library load failed");
                self.list.bind(Vec::new());
                self.screen = Screen::Empty(e.to_string());
            }
        }
    }

    /// Build the handoff for the row at `start` and switch to the player
    /// screen. Returns `None` when `start` is not a row of the list.
    pub fn open_player(&mut self, start: usize) -> Option<Handoff> {
        if self.screen != Screen::Library || start >= self.list.len() {
            return None;
        }
        self.list.select(start);
        self.screen = Screen::Player;
        info!(start, count = self.list.len(), "opening player");
        Some(Handoff {
            tracks: self.list.tracks().to_vec(),
            start,
        })
    }

    pub fn close_player(&mut self) {
        if self.screen == Screen::Player {
            self.screen = Screen::Library;
        }
    }
}
