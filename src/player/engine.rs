/// Repeat setting forwarded to the engine's native loop support.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    /// Loop the current source forever. The engine never reports
    /// [`EngineState::Ended`] while this is set.
    One,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
    Ready,
    Ended,
}

/// Asynchronous notifications from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StateChanged(EngineState),
    Error(String),
}

/// A media engine that decodes and renders one source at a time.
///
/// Commands never fail synchronously: problems are reported through
/// [`MediaEngine::poll_event`] as [`EngineEvent::Error`]. Positions and
/// durations are in milliseconds; a duration of 0 means unknown.
pub trait MediaEngine {
    fn set_source(&mut self, locator: &str);
    fn prepare(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    /// Drop the queued source.
    fn clear(&mut self);
    fn seek_to(&mut self, position_ms: u64);
    fn current_position(&self) -> u64;
    fn duration(&self) -> u64;
    fn is_playing(&self) -> bool;
    fn set_repeat_mode(&mut self, mode: RepeatMode);
    /// Next pending event, if any.
    fn poll_event(&mut self) -> Option<EngineEvent>;
    /// Free the output device and decoder. The engine is unusable afterwards.
    fn release(&mut self);
}
