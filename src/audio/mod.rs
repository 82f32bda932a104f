//! Procedural audio: one-shot effects and looping background music rendered
//! by a software oscillator graph.
//!
//! Everything degrades to a no-op when the user has muted audio or no output
//! is available. Volume is a continuous master gain, not a bypass: at volume
//! 0 voices are still built and scheduled, they just render silence.

pub mod graph;
pub mod mixer;
pub mod music;
pub mod output;
pub mod param;
pub mod sfx;

pub use music::{CancelToken, MusicScheduler};
pub use output::{AudioContext, AudioError};
pub use sfx::Sfx;

use graph::{noise_buffer, VoiceGroup};
use mixer::SAMPLE_RATE;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, warn};

enum ContextState {
    /// Not opened yet; opened lazily on first use.
    Pending,
    Ready(AudioContext),
    /// Opening failed; every sound call is a no-op from now on.
    Unavailable,
}

pub struct AudioEngine {
    enabled: bool,
    volume: f32,
    context: ContextState,
    music: Option<MusicScheduler>,
    last_poll: Option<Instant>,
    rng: StdRng,
}

impl AudioEngine {
    /// Engine that opens the output device on first use.
    pub fn new(enabled: bool, volume: f32) -> Self {
        Self {
            enabled,
            volume: volume.clamp(0.0, 1.0),
            context: ContextState::Pending,
            music: None,
            last_poll: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine bound to an existing context (offline rendering, tests).
    pub fn with_context(context: AudioContext, enabled: bool, volume: f32) -> Self {
        context.mixer().set_master_gain(volume);
        Self {
            context: ContextState::Ready(context),
            ..Self::new(enabled, volume)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.context, ContextState::Unavailable)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_music_playing(&self) -> bool {
        self.music.is_some()
    }

    pub fn context(&self) -> Option<&AudioContext> {
        match &self.context {
            ContextState::Ready(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Current context, opening it if needed. `None` while muted or after
    /// the device failed to open.
    fn ensure_context(&mut self) -> Option<&AudioContext> {
        if !self.enabled {
            return None;
        }
        if let ContextState::Pending = self.context {
            self.context = match AudioContext::open(self.volume) {
                Ok(ctx) => {
                    debug!("audio output opened");
                    ContextState::Ready(ctx)
                }
                Err(e) => {
                    warn!(error = %e, "audio disabled");
                    ContextState::Unavailable
                }
            };
        }
        self.context()
    }

    /// Play a one-shot effect.
    pub fn play(&mut self, sfx: Sfx) {
        if self.ensure_context().is_none() {
            return;
        }
        let Self { context, rng, .. } = self;
        if let ContextState::Ready(ctx) = context {
            // Noise buffers are built outside the lock the render thread needs
            let now = ctx.mixer().now();
            let voices = sfx.voices(now, rng);
            ctx.mixer().schedule_all(voices);
        }
    }

    /// Set the master gain, clamped to 0..=1.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(ctx) = self.context() {
            ctx.mixer().set_master_gain(self.volume);
        }
    }

    /// Flip the enabled flag, starting or stopping music to match. Returns
    /// the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.start_music();
        } else {
            self.stop_music();
        }
    }

    /// (Re)start the music loop from the top.
    pub fn start_music(&mut self) {
        self.stop_music();
        if self.ensure_context().is_none() {
            return;
        }
        let noise = noise_buffer((SAMPLE_RATE as f64 * 1.5) as usize, None, &mut self.rng);
        let scheduler = {
            let Some(ctx) = self.context() else {
                return;
            };
            let mut mixer = ctx.mixer();
            mixer.configure_delay(music::DELAY_TIME, music::DELAY_FEEDBACK);
            let now = mixer.now();
            let mut scheduler = MusicScheduler::new(now, noise);
            mixer.schedule_all(scheduler.poll(now));
            scheduler
        };
        self.music = Some(scheduler);
        self.last_poll = Some(Instant::now());
        debug!("music started");
    }

    /// Cancel the music schedule and silence every queued or sounding note.
    pub fn stop_music(&mut self) {
        let Some(scheduler) = self.music.take() else {
            return;
        };
        scheduler.cancel();
        if let Some(ctx) = self.context() {
            ctx.mixer().cancel_group(VoiceGroup::Music);
        }
        self.last_poll = None;
        debug!(steps = scheduler.steps_scheduled(), "music stopped");
    }

    /// Drive the music scheduler. Call as often as convenient; scheduling
    /// only runs once per [`music::POLL_INTERVAL`].
    pub fn poll(&mut self, now: Instant) {
        if let Some(last) = self.last_poll {
            if now.duration_since(last) < music::POLL_INTERVAL {
                return;
            }
        }
        self.poll_music();
        self.last_poll = Some(now);
    }

    /// Run one scheduler pass immediately.
    pub fn poll_music(&mut self) {
        let Self { context, music, .. } = self;
        if let (ContextState::Ready(ctx), Some(scheduler)) = (context, music) {
            let mut mixer = ctx.mixer();
            let now = mixer.now();
            let voices = scheduler.poll(now);
            mixer.schedule_all(voices);
        }
    }
}
