//! Playback: the controller state machine and the seams it drives.
//!
//! The [`Controller`] owns the session (orderings, current index, shuffle
//! and repeat flags), issues commands to a [`MediaEngine`] and mirrors the
//! result into a [`PlayerView`]. Engine callbacks arrive as
//! [`EngineEvent`]s; the progress tick is a [`Ticker`] polled with the
//! current instant.

mod controller;
mod engine;
mod format;
mod playlist;
mod ticker;
mod view;

pub use controller::{Controller, PlaybackState, PlayerError, ScrubOrigin};
pub use engine::{EngineEvent, EngineState, MediaEngine, RepeatMode};
pub use format::format_time;
pub use playlist::Playlist;
pub use ticker::Ticker;
pub use view::{PlayerSurface, PlayerView};
