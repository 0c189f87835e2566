//! Utilities for opening tracks and creating `rodio` sinks from them.
//!
//! Opening and decoding happen before a sink exists, so a broken file is
//! reported without touching the output device.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::engine::EngineError;

pub(super) type FileDecoder = Decoder<BufReader<File>>;

/// Open and decode `path`.
pub(super) fn open_source(path: &Path) -> Result<FileDecoder, EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Total duration reported by the decoder, or by the file's tags.
pub(super) fn source_duration(decoder: &FileDecoder, path: &Path) -> Duration {
    decoder
        .total_duration()
        .or_else(|| {
            lofty::read_from_path(path)
                .ok()
                .map(|tagged| tagged.properties().duration())
        })
        .unwrap_or(Duration::ZERO)
}

/// Create a paused `Sink` playing `decoder` from `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    decoder: FileDecoder,
    start_at: Duration,
) -> Sink {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    sink
}
