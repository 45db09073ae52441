//! Audio module
//!
//! Collisions produce a short "hit" cue whose loudness follows the impact
//! speed. Playback goes through the [`AudioCue`] trait so the frame loop never
//! depends on an output device; the rodio cue is only compiled with the
//! `audio` feature.

#[cfg(feature = "audio")]
pub mod backend;

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::core::config::AudioConfig;

/// Audio errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// No output device could be opened
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// The sound asset could not be read
    #[error("Failed to load sound '{path}': {source}")]
    AssetLoad {
        /// Asset path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Decoding or sink creation failed
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Fire-and-forget sound cue
///
/// Playing while the previous playback is still running restarts the cue.
pub trait AudioCue {
    /// Play the cue at `volume` in `[0, 1]`
    fn play(&mut self, volume: f32) -> Result<(), AudioError>;
}

/// Cue that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&mut self, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Cue that remembers every volume it was played at
///
/// Clones share the same record, so a test can keep one while the app owns
/// the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingCue {
    played: Rc<RefCell<Vec<f32>>>,
}

impl RecordingCue {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Volumes played so far
    pub fn played(&self) -> Vec<f32> {
        self.played.borrow().clone()
    }
}

impl AudioCue for RecordingCue {
    fn play(&mut self, volume: f32) -> Result<(), AudioError> {
        self.played.borrow_mut().push(volume);
        Ok(())
    }
}

/// Maps impact speed to a cue volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactSound {
    /// Impacts at or below this speed stay silent
    pub threshold: f32,
    /// Impact speed that maps to full volume
    pub volume_divisor: f32,
}

impl Default for ImpactSound {
    fn default() -> Self {
        Self {
            threshold: 1.5,
            volume_divisor: 10.0,
        }
    }
}

impl ImpactSound {
    /// Build the policy from configuration
    pub fn from_config(config: &AudioConfig) -> Self {
        Self {
            threshold: config.impact_threshold,
            volume_divisor: config.volume_divisor,
        }
    }

    /// Volume for an impact, or `None` when it is too soft to hear
    pub fn volume_for(&self, impact_velocity: f32) -> Option<f32> {
        if impact_velocity > self.threshold {
            Some((impact_velocity / self.volume_divisor).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

/// Build the cue the configuration asks for
///
/// Without the `audio` feature every configuration gets a [`SilentCue`].
pub fn create_cue(config: &AudioConfig) -> Result<Box<dyn AudioCue>, AudioError> {
    if !config.enabled {
        log::info!("Audio disabled by configuration");
        return Ok(Box::new(SilentCue));
    }

    #[cfg(feature = "audio")]
    {
        let cue = backend::rodio_backend::RodioCue::from_file(&config.sound_path)?;
        Ok(Box::new(cue))
    }

    #[cfg(not(feature = "audio"))]
    {
        log::info!("Built without the `audio` feature; impact sound is silent");
        Ok(Box::new(SilentCue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_volume_clamp() {
        let sound = ImpactSound::default();
        assert_relative_eq!(sound.volume_for(15.0).unwrap(), 1.0);
        assert_relative_eq!(sound.volume_for(5.0).unwrap(), 0.5);
        assert_eq!(sound.volume_for(1.0), None);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let sound = ImpactSound::default();
        assert_eq!(sound.volume_for(1.5), None);
        assert!(sound.volume_for(1.51).is_some());
    }

    #[test]
    fn test_recording_cue_shares_record() {
        let recorder = RecordingCue::new();
        let mut cue: Box<dyn AudioCue> = Box::new(recorder.clone());
        cue.play(0.25).unwrap();
        cue.play(1.0).unwrap();
        assert_eq!(recorder.played(), vec![0.25, 1.0]);
    }

    #[test]
    fn test_disabled_config_gives_silent_cue() {
        let config = AudioConfig { enabled: false, ..AudioConfig::default() };
        let mut cue = create_cue(&config).unwrap();
        assert!(cue.play(1.0).is_ok());
    }
}
