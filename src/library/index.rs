use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use lofty::file::TaggedFileExt;
use lofty::tag::ItemKey;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{IndexEntry, LibraryError};

/// Read-only query interface of the host media index.
pub trait MediaIndex {
    /// Return every entry flagged as music.
    fn query_music(&mut self) -> Result<Vec<IndexEntry>, LibraryError>;

    /// Look up the artwork locator for `album_id`, if the album has any.
    fn album_artwork(&self, album_id: u64) -> Result<Option<String>, LibraryError>;
}

/// Media index backed by a directory tree.
///
/// Ids are assigned in path order, so the same tree always yields the same
/// ids. Albums are keyed by album tag and directory; untagged files group by
/// directory.
pub struct FsMediaIndex {
    root: PathBuf,
    settings: LibrarySettings,
    album_dirs: HashMap<u64, PathBuf>,
}

impl FsMediaIndex {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
            album_dirs: HashMap::new(),
        }
    }

    fn unavailable(&self, source: io::Error) -> LibraryError {
        if source.kind() == ErrorKind::PermissionDenied {
            LibraryError::PermissionDenied(self.root.clone())
        } else {
            LibraryError::Unavailable {
                path: self.root.clone(),
                source,
            }
        }
    }

    fn audio_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(root).follow_links(self.settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if self.settings.recursive {
            self.settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let include_hidden = self.settings.include_hidden;
        let mut paths: Vec<PathBuf> = walker
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() || (e.path_is_symlink() && e.path().is_file()))
            .map(|e| e.into_path())
            .filter(|p| is_audio_file(p, &self.settings.extensions))
            .collect();
        paths.sort();
        paths
    }
}

impl MediaIndex for FsMediaIndex {
    fn query_music(&mut self) -> Result<Vec<IndexEntry>, LibraryError> {
        let root = fs::canonicalize(&self.root).map_err(|e| self.unavailable(e))?;
        if !root.is_dir() {
            return Err(self.unavailable(io::Error::other("not a directory")));
        }
        // Surface permission problems on the root itself instead of an empty walk.
        fs::read_dir(&root).map_err(|e| self.unavailable(e))?;

        self.album_dirs.clear();
        let mut album_ids: HashMap<(Option<String>, PathBuf), u64> = HashMap::new();
        let mut entries = Vec::new();

        for path in self.audio_files(&root) {
            // The engine opens tracks by string locator; a lossy one would
            // name a different file.
            let Some(locator) = path.to_str().map(str::to_string) else {
                debug!(path = %path.display(), "skipping non-UTF-8 path");
                continue;
            };
            let tags = read_tags(&path);
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| root.clone());

            let next_album = album_ids.len() as u64 + 1;
            let album_id = *album_ids
                .entry((tags.album, dir.clone()))
                .or_insert(next_album);
            self.album_dirs.entry(album_id).or_insert(dir);

            let title = tags.title.or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            });

            entries.push(IndexEntry {
                id: entries.len() as u64 + 1,
                title,
                artist: tags.artist,
                path: locator,
                album_id,
            });
        }

        Ok(entries)
    }

    fn album_artwork(&self, album_id: u64) -> Result<Option<String>, LibraryError> {
        let Some(dir) = self.album_dirs.get(&album_id) else {
            return Ok(None);
        };

        let names: Vec<String> = fs::read_dir(dir)
            .map_err(|source| LibraryError::Artwork { album_id, source })?
            .filter_map(Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();

        // Configured names are in priority order.
        for wanted in &self.settings.artwork_names {
            if let Some(found) = names.iter().find(|n| n.eq_ignore_ascii_case(wanted)) {
                let path = dir.join(found);
                let locator = path.to_str().map(str::to_string);
                if locator.is_none() {
                    debug!(path = %path.display(), "skipping non-UTF-8 artwork path");
                }
                return Ok(locator);
            }
        }
        Ok(None)
    }
}

#[derive(Default)]
struct Tags {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
}

fn read_tags(path: &Path) -> Tags {
    let mut tags = Tags::default();
    let Ok(tagged) = lofty::read_from_path(path) else {
        return tags;
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        let get = |key: &ItemKey| {
            tag.get_string(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        tags.title = get(&ItemKey::TrackTitle);
        tags.artist = get(&ItemKey::TrackArtist);
        tags.album = get(&ItemKey::AlbumTitle);
    }
    tags
}

fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
