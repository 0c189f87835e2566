//! Library loading: access checks, the media index and track assembly.
//!
//! The loader asks a [`MediaIndex`] for everything flagged as music,
//! resolves album artwork for each album it sees and returns immutable
//! [`Track`] records sorted by title.

mod access;
mod index;
mod load;
mod model;

pub use access::{Access, AccessBroker, FsAccess};
pub use index::{FsMediaIndex, MediaIndex};
pub use load::{LibraryEvent, load, spawn_load};
pub use model::{Artwork, IndexEntry, LibraryError, Track, UNKNOWN_ARTIST, UNKNOWN_TITLE};
