use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

/// Outcome of asking the host for read access to audio media.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

/// Grants or denies the right to read the user's audio files.
///
/// The loader never asks for access itself; callers obtain consent first
/// and only run the library query once access is granted.
pub trait AccessBroker {
    fn request_audio_access(&mut self) -> Access;
}

/// Access broker for a directory-backed library.
///
/// Access is denied only when the OS refuses to list the library root. A
/// missing root is reported later by the index as unavailable.
pub struct FsAccess {
    root: PathBuf,
}

impl FsAccess {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AccessBroker for FsAccess {
    fn request_audio_access(&mut self) -> Access {
        let access = match fs::read_dir(&self.root) {
            Ok(_) => Access::Granted,
            Err(e) => access_for(e.kind()),
        };
        if access == Access::Denied {
            debug!(root = %self.root.display(), "read access to library root refused");
        }
        access
    }
}

/// Map a failed listing of the root to an access decision.
fn access_for(kind: ErrorKind) -> Access {
    match kind {
        ErrorKind::PermissionDenied => Access::Denied,
        _ => Access::Granted,
    }
}
