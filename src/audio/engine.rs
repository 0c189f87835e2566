use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::player::{EngineEvent, EngineState, MediaEngine, RepeatMode};

use super::sink::{create_sink_at, open_source, source_duration};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no audio output device: {0}")]
    NoOutput(String),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("no source set")]
    NoSource,
}

/// [`MediaEngine`] on top of a `rodio` output stream.
///
/// The output device is opened on the first `prepare`. Playback position is
/// tracked as time accumulated before the last pause plus time since the
/// last resume. The end of a source is noticed while polling for events.
pub struct RodioEngine {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    source: Option<PathBuf>,
    duration: Duration,
    prepared: bool,
    play_when_ready: bool,
    started_at: Option<Instant>,
    accumulated: Duration,
    repeat: RepeatMode,
    events: VecDeque<EngineEvent>,
    released: bool,
}

impl Default for RodioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RodioEngine {
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            source: None,
            duration: Duration::ZERO,
            prepared: false,
            play_when_ready: false,
            started_at: None,
            accumulated: Duration::ZERO,
            repeat: RepeatMode::Off,
            events: VecDeque::new(),
            released: false,
        }
    }

    fn elapsed(&self) -> Duration {
        let elapsed = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        if self.duration.is_zero() {
            elapsed
        } else {
            elapsed.min(self.duration)
        }
    }

    fn fail(&mut self, err: EngineError) {
        warn!(error = %err, "engine error");
        self.prepared = false;
        self.started_at = None;
        self.events.push_back(EngineEvent::Error(err.to_string()));
    }

    fn stream(&mut self) -> Result<&OutputStream, EngineError> {
        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| EngineError::NoOutput(e.to_string()))?;
            // rodio logs to stderr when OutputStream is dropped, which would
            // scribble over the terminal UI.
            stream.log_on_drop(false);
            self.stream = Some(stream);
        }
        self.stream.as_ref().ok_or(EngineError::NoSource)
    }

    /// Replace the sink with a fresh one positioned at `at`, keeping the
    /// current play/pause state.
    fn rebuild_sink(&mut self, at: Duration) -> Result<(), EngineError> {
        let path = self.source.clone().ok_or(EngineError::NoSource)?;
        let decoder = open_source(&path)?;
        let sink = create_sink_at(self.stream()?, decoder, at);

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.accumulated = at;
        if self.started_at.is_some() {
            sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(sink);
        Ok(())
    }

    fn check_finished(&mut self) {
        let finished = self.started_at.is_some()
            && self.sink.as_ref().is_some_and(|s| s.empty());
        if !finished {
            return;
        }

        match self.repeat {
            RepeatMode::One => {
                debug!("looping current source");
                if let Err(e) = self.rebuild_sink(Duration::ZERO) {
                    self.fail(e);
                }
            }
            RepeatMode::Off => {
                self.accumulated = self.duration.max(self.elapsed());
                self.started_at = None;
                self.play_when_ready = false;
                self.events
                    .push_back(EngineEvent::StateChanged(EngineState::Ended));
            }
        }
    }
}

impl MediaEngine for RodioEngine {
    fn set_source(&mut self, locator: &str) {
        self.source = Some(PathBuf::from(locator));
        self.prepared = false;
    }

    fn prepare(&mut self) {
        if self.released {
            return;
        }
        let Some(path) = self.source.clone() else {
            self.fail(EngineError::NoSource);
            return;
        };

        let decoder = match open_source(&path) {
            Ok(d) => d,
            Err(e) => return self.fail(e),
        };
        let duration = source_duration(&decoder, &path);
        let sink = match self.stream() {
            Ok(stream) => create_sink_at(stream, decoder, Duration::ZERO),
            Err(e) => return self.fail(e),
        };

        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.duration = duration;
        self.accumulated = Duration::ZERO;
        self.started_at = None;
        self.prepared = true;
        self.events
            .push_back(EngineEvent::StateChanged(EngineState::Ready));

        if self.play_when_ready {
            self.play();
        }
    }

    fn play(&mut self) {
        self.play_when_ready = true;
        if !self.prepared || self.started_at.is_some() {
            return;
        }
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.play_when_ready = false;
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.prepared = false;
        self.play_when_ready = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.events.clear();
    }

    fn clear(&mut self) {
        self.source = None;
        self.duration = Duration::ZERO;
    }

    fn seek_to(&mut self, position_ms: u64) {
        if !self.prepared {
            return;
        }
        let mut target = Duration::from_millis(position_ms);
        if !self.duration.is_zero() {
            target = target.min(self.duration);
        }
        debug!(?target, "seek");
        if let Err(e) = self.rebuild_sink(target) {
            self.fail(e);
        }
    }

    fn current_position(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    fn duration(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        if !self.released {
            self.check_finished();
        }
        self.events.pop_front()
    }

    fn release(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.stream = None;
        self.source = None;
        self.prepared = false;
        self.play_when_ready = false;
        self.started_at = None;
        self.events.clear();
        self.released = true;
    }
}
