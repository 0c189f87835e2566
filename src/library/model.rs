use std::path::PathBuf;

/// Title shown for tracks without a title tag.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Artist shown for tracks without an artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A playable track as produced by the loader.
///
/// Tracks are plain values: once the loader has built them they are only
/// cloned and compared, never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: u64,
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Locator handed to the media engine (an absolute file path).
    pub source: String,
    pub album_id: u64,
    pub artwork: Option<String>,
}

impl Track {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or(UNKNOWN_ARTIST)
    }

    pub fn artwork_or_placeholder(&self) -> Artwork {
        match self.artwork.as_deref() {
            Some(a) if !a.is_empty() => Artwork::Image(a.to_string()),
            _ => Artwork::Placeholder,
        }
    }
}

/// Artwork to show for a track: an image locator, or the placeholder note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artwork {
    Image(String),
    Placeholder,
}

/// One row returned by the media index's music query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: u64,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub path: String,
    pub album_id: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("permission denied to read audio files in {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("media library at {} is unavailable: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no songs found")]
    EmptyLibrary,

    #[error("artwork lookup failed for album {album_id}: {source}")]
    Artwork {
        album_id: u64,
        #[source]
        source: std::io::Error,
    },
}
