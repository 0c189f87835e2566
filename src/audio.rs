//! Audio output: the `rodio`-backed media engine.

mod engine;
mod sink;

pub use engine::{EngineError, RodioEngine};
