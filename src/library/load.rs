use std::collections::{HashMap, HashSet};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use super::index::MediaIndex;
use super::model::{LibraryError, Track};

/// Message delivered to the event loop when a background load finishes.
#[derive(Debug)]
pub enum LibraryEvent {
    Loaded(Result<Vec<Track>, LibraryError>),
}

/// Query `index` once and assemble the tracks, sorted by title ascending.
///
/// Artwork lookups are best-effort: a failing lookup leaves the track
/// without artwork. Entries without a file path are dropped. Only a failing
/// music query fails the load.
pub fn load<I: MediaIndex + ?Sized>(index: &mut I) -> Result<Vec<Track>, LibraryError> {
    let entries = index.query_music()?;

    let mut artwork: HashMap<u64, Option<String>> = HashMap::new();
    let mut seen: HashSet<u64> = HashSet::new();
    let mut tracks = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.path.trim().is_empty() {
            debug!(id = entry.id, "skipping index entry without a file path");
            continue;
        }
        if !seen.insert(entry.id) {
            warn!(id = entry.id, "skipping index entry with duplicate id");
            continue;
        }

        let album_id = entry.album_id;
        let art = artwork
            .entry(album_id)
            .or_insert_with(|| match index.album_artwork(album_id) {
                Ok(art) => art,
                Err(e) => {
                    debug!(album_id, error = %e, "artwork unavailable");
                    None
                }
            })
            .clone();

        tracks.push(Track {
            id: entry.id,
            title: entry.title,
            artist: entry.artist,
            source: entry.path,
            album_id,
            artwork: art,
        });
    }

    tracks.sort_by(|a, b| {
        a.display_title()
            .to_lowercase()
            .cmp(&b.display_title().to_lowercase())
            .then(a.id.cmp(&b.id))
    });

    info!(tracks = tracks.len(), albums = artwork.len(), "library loaded");
    Ok(tracks)
}

/// Run [`load`] on a background thread and deliver the result on `tx`.
pub fn spawn_load<I>(mut index: I, tx: Sender<LibraryEvent>) -> JoinHandle<()>
where
    I: MediaIndex + Send + 'static,
{
    thread::spawn(move || {
        let result = load(&mut index);
        if let Err(ref e) = result {
            warn!(error = %e, "library load failed");
        }
        // The receiver is gone if the UI already quit.
        let _ = tx.send(LibraryEvent::Loaded(result));
    })
}
