//! Rodio-backed impact cue
//!
//! The sound file is read once; every [`AudioCue::play`] decodes the cached
//! bytes into a fresh sink and stops the previous one, so rapid impacts
//! retrigger the cue from the start instead of stacking.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::audio::{AudioCue, AudioError};

/// Impact cue playing a single sound through the default output device
pub struct RodioCue {
    /// Audio output stream (must be kept alive)
    _output_stream: OutputStream,
    /// Output stream handle for creating sinks
    stream_handle: OutputStreamHandle,
    /// Encoded sound bytes
    data: Arc<[u8]>,
    /// Sink of the most recent playback
    current: Option<Sink>,
}

impl RodioCue {
    /// Open the default output device and load the sound at `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AudioError::AssetLoad {
            path: path.display().to_string(),
            source,
        })?;
        let cue = Self::from_bytes(bytes)?;
        log::info!("Loaded impact sound from {}", path.display());
        Ok(cue)
    }

    /// Open the default output device and use `bytes` (WAV or MP3) as the sound
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::BackendInitFailed(format!("Failed to create audio output: {}", e)))?;

        Ok(Self {
            _output_stream: stream,
            stream_handle,
            data: bytes.into(),
            current: None,
        })
    }
}

impl AudioCue for RodioCue {
    fn play(&mut self, volume: f32) -> Result<(), AudioError> {
        if let Some(previous) = self.current.take() {
            previous.stop();
        }

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {}", e)))?;
        let source = Decoder::new(Cursor::new(Arc::clone(&self.data)))
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to decode audio: {}", e)))?;

        sink.set_volume(volume.clamp(0.0, 1.0));
        sink.append(source);
        self.current = Some(sink);
        Ok(())
    }
}
