//! Application module: the track list presenter and the screen model used
//! by the TUI and runtime.

mod list;
mod model;

pub use list::{TrackList, TrackRow};
pub use model::{App, Handoff, Screen};

#[cfg(test)]
mod tests;
