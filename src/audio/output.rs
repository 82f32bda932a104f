//! Audio contexts: a mixer plus, when available, the device stream pulling
//! samples from it.
//!
//! Device output needs the `sound` feature. Without it (or without a usable
//! device) [`AudioContext::open`] fails and the engine stays silent.

use super::mixer::{Mixer, SharedMixer, SAMPLE_RATE};
use std::sync::MutexGuard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    DeviceUnavailable(String),
    #[error("audio playback failed: {0}")]
    Playback(String),
    #[error("built without audio output support")]
    Unsupported,
}

pub struct AudioContext {
    mixer: SharedMixer,
    #[cfg(feature = "sound")]
    _device: Option<device::DeviceStream>,
}

impl std::fmt::Debug for AudioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioContext")
            .field("offline", &self.is_offline())
            .finish()
    }
}

impl AudioContext {
    /// Open the default output device and start streaming the mixer to it.
    #[cfg(feature = "sound")]
    pub fn open(volume: f32) -> Result<Self, AudioError> {
        let mixer = Mixer::new(SAMPLE_RATE, volume).shared();
        let device = device::DeviceStream::start(mixer.clone())?;
        Ok(Self {
            mixer,
            _device: Some(device),
        })
    }

    #[cfg(not(feature = "sound"))]
    pub fn open(_volume: f32) -> Result<Self, AudioError> {
        Err(AudioError::Unsupported)
    }

    /// A context with no device. Its clock only moves when the caller
    /// renders or advances the mixer.
    pub fn offline(volume: f32) -> Self {
        Self {
            mixer: Mixer::new(SAMPLE_RATE, volume).shared(),
            #[cfg(feature = "sound")]
            _device: None,
        }
    }

    #[cfg(feature = "sound")]
    pub fn is_offline(&self) -> bool {
        self._device.is_none()
    }

    #[cfg(not(feature = "sound"))]
    pub fn is_offline(&self) -> bool {
        true
    }

    /// Lock the mixer, recovering from a poisoned lock.
    pub fn mixer(&self) -> MutexGuard<'_, Mixer> {
        self.mixer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(feature = "sound")]
mod device {
    use super::{AudioError, SharedMixer, SAMPLE_RATE};
    use rodio::{OutputStream, Source};
    use std::time::Duration;

    const CHUNK: usize = 512;

    /// Keeps the device stream alive; dropping it stops playback.
    pub struct DeviceStream {
        _stream: OutputStream,
    }

    impl DeviceStream {
        pub fn start(mixer: SharedMixer) -> Result<Self, AudioError> {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;
            handle
                .play_raw(MixerSource::new(mixer))
                .map_err(|e| AudioError::Playback(e.to_string()))?;
            Ok(Self { _stream: stream })
        }
    }

    /// Endless mono source that renders the mixer in small chunks.
    struct MixerSource {
        mixer: SharedMixer,
        chunk: [f32; CHUNK],
        cursor: usize,
    }

    impl MixerSource {
        fn new(mixer: SharedMixer) -> Self {
            Self {
                mixer,
                chunk: [0.0; CHUNK],
                cursor: CHUNK,
            }
        }
    }

    impl Iterator for MixerSource {
        type Item = f32;

        fn next(&mut self) -> Option<f32> {
            if self.cursor == CHUNK {
                let mut mixer = self
                    .mixer
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                mixer.render(&mut self.chunk);
                self.cursor = 0;
            }
            let sample = self.chunk[self.cursor];
            self.cursor += 1;
            Some(sample)
        }
    }

    impl Source for MixerSource {
        fn current_frame_len(&self) -> Option<usize> {
            None
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            SAMPLE_RATE
        }

        fn total_duration(&self) -> Option<Duration> {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_context_starts_at_zero() {
        let ctx = AudioContext::offline(0.5);
        assert!(ctx.is_offline());
        assert_eq!(ctx.mixer().now(), 0.0);
        assert_eq!(ctx.mixer().master_gain(), 0.5);
    }

    #[cfg(not(feature = "sound"))]
    #[test]
    fn test_open_without_sound_feature_is_unsupported() {
        assert!(matches!(AudioContext::open(1.0), Err(AudioError::Unsupported)));
    }
}
