//! Background music: a fixed-tempo step sequencer scheduled with a lookahead
//! window against the mixer clock.
//!
//! The host polls [`MusicScheduler::poll`] every [`POLL_INTERVAL`]; each poll
//! queues every step whose start time falls before `now + LOOKAHEAD`, so
//! notes are handed to the mixer ahead of their deadline.

use super::graph::{Bus, FilterKind, Voice, VoiceGroup, Waveform};
use super::param::Param;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const TEMPO_BPM: f64 = 110.0;
pub const MELODY: [f64; 8] = [440.0, 392.0, 330.0, 392.0, 440.0, 494.0, 440.0, 392.0];
pub const LOOKAHEAD: f64 = 0.6;
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const START_DELAY: f64 = 0.05;
pub const DELAY_TIME: f64 = 0.18;
pub const DELAY_FEEDBACK: f64 = 0.22;

/// Shared cancellation flag. Once cancelled, the scheduler it belongs to
/// never produces another voice.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MusicScheduler {
    /// Seconds per beat.
    beat: f64,
    step: u64,
    next_time: f64,
    noise: Arc<[f32]>,
    token: CancelToken,
}

impl MusicScheduler {
    /// Start a sequence whose first step sounds shortly after `now`.
    /// `noise` is the hi-hat source buffer.
    pub fn new(now: f64, noise: Arc<[f32]>) -> Self {
        Self {
            beat: 60.0 / TEMPO_BPM,
            step: 0,
            next_time: now + START_DELAY,
            noise,
            token: CancelToken::new(),
        }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Start time of the next unscheduled step.
    pub fn next_time(&self) -> f64 {
        self.next_time
    }

    pub fn steps_scheduled(&self) -> u64 {
        self.step
    }

    /// Queue everything inside the lookahead window from `now`.
    pub fn poll(&mut self, now: f64) -> Vec<Voice> {
        self.schedule_until(now + LOOKAHEAD)
    }

    /// Build voices for every step starting before `horizon`. Idempotent for
    /// a given horizon: a repeated call returns nothing new.
    pub fn schedule_until(&mut self, horizon: f64) -> Vec<Voice> {
        let mut voices = Vec::new();
        while !self.is_cancelled() && self.next_time < horizon {
            let t = self.next_time;
            let note = MELODY[(self.step % MELODY.len() as u64) as usize];

            voices.push(lead(t, note, self.beat * 0.9));
            if self.step % 2 == 0 {
                voices.push(bass(t, note / 2.0));
                voices.push(kick(t));
            }
            voices.push(hat(t + self.beat * 0.25, self.noise.clone()));

            self.next_time += self.beat * 0.5;
            self.step += 1;
        }
        voices
    }
}

fn music_voice(voice: Voice) -> Voice {
    voice.on_bus(Bus::Delay).in_group(VoiceGroup::Music)
}

fn lead(t: f64, freq: f64, duration: f64) -> Voice {
    let mut gain = Param::new(0.0);
    gain.set_value_at_time(0.0006, t)
        .linear_ramp_to_value_at_time(0.05, t + 0.02)
        .exponential_ramp_to_value_at_time(0.0001, t + duration);
    music_voice(
        Voice::oscillator(Waveform::Sawtooth, Param::new(freq), t, t + duration + 0.02)
            .with_gain(gain),
    )
}

fn bass(t: f64, freq: f64) -> Voice {
    let mut gain = Param::new(0.0);
    gain.set_value_at_time(0.0006, t)
        .linear_ramp_to_value_at_time(0.03, t + 0.03)
        .exponential_ramp_to_value_at_time(0.0001, t + 0.5);
    music_voice(Voice::oscillator(Waveform::Sine, Param::new(freq), t, t + 0.6).with_gain(gain))
}

fn kick(t: f64) -> Voice {
    let mut frequency = Param::new(120.0);
    frequency
        .set_value_at_time(120.0, t)
        .exponential_ramp_to_value_at_time(30.0, t + 0.18);
    let mut gain = Param::new(0.0);
    gain.set_value_at_time(0.001, t)
        .exponential_ramp_to_value_at_time(0.08, t + 0.01)
        .exponential_ramp_to_value_at_time(0.0001, t + 0.45);
    music_voice(Voice::oscillator(Waveform::Sine, frequency, t, t + 0.45).with_gain(gain))
}

fn hat(t: f64, noise: Arc<[f32]>) -> Voice {
    let mut gain = Param::new(0.0);
    gain.set_value_at_time(0.001, t)
        .exponential_ramp_to_value_at_time(0.06, t + 0.01)
        .exponential_ramp_to_value_at_time(0.0001, t + 0.12);
    music_voice(
        Voice::buffer(noise, t, t + 0.12)
            .with_filter(FilterKind::Highpass, 7000.0)
            .with_gain(gain),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::graph::Source;

    fn scheduler() -> MusicScheduler {
        let noise: Arc<[f32]> = vec![0.0; 16].into();
        MusicScheduler::new(0.0, noise)
    }

    #[test]
    fn test_first_poll_fills_lookahead_window() {
        let mut music = scheduler();
        let voices = music.poll(0.0);
        // Half-beat steps at 0.05, 0.3227, 0.5955 fall inside 0.6
        assert_eq!(music.steps_scheduled(), 3);
        // Steps 0 and 2 carry bass + kick: 3 leads + 3 hats + 2 bass + 2 kicks
        assert_eq!(voices.len(), 10);
        assert!(music.next_time() >= LOOKAHEAD);
        assert!(voices.iter().all(|v| v.bus == Bus::Delay));
        assert!(voices.iter().all(|v| v.group == VoiceGroup::Music));
    }

    #[test]
    fn test_poll_is_idempotent_for_same_time() {
        let mut music = scheduler();
        music.poll(0.0);
        assert!(music.poll(0.0).is_empty());
        assert!(music.poll(0.05).is_empty());
    }

    #[test]
    fn test_steps_follow_tempo() {
        let mut music = scheduler();
        let voices = music.schedule_until(10.0);
        let leads: Vec<&Voice> = voices
            .iter()
            .filter(|v| matches!(v.source, Source::Oscillator { waveform: Waveform::Sawtooth, .. }))
            .collect();
        let half_beat = 60.0 / TEMPO_BPM / 2.0;
        for pair in leads.windows(2) {
            assert!((pair[1].start - pair[0].start - half_beat).abs() < 1e-9);
        }
        assert!((leads[0].start - START_DELAY).abs() < 1e-12);
    }

    #[test]
    fn test_melody_loops_and_bass_is_octave_down() {
        let mut music = scheduler();
        let voices = music.schedule_until(10.0);
        let freq_at = |v: &Voice| match &v.source {
            Source::Oscillator { frequency, .. } => frequency.value_at(v.start),
            Source::Buffer { .. } => 0.0,
        };
        let leads: Vec<f64> = voices
            .iter()
            .filter(|v| matches!(v.source, Source::Oscillator { waveform: Waveform::Sawtooth, .. }))
            .map(freq_at)
            .collect();
        assert_eq!(&leads[..8], &MELODY[..]);
        assert_eq!(&leads[8..16], &MELODY[..]);

        let bass: Vec<f64> = voices
            .iter()
            .filter(|v| (v.stop - v.start - 0.6).abs() < 1e-9)
            .map(freq_at)
            .collect();
        assert_eq!(bass[0], MELODY[0] / 2.0);
        assert_eq!(bass[1], MELODY[2] / 2.0);
    }

    #[test]
    fn test_hat_offset_by_quarter_beat() {
        let mut music = scheduler();
        let voices = music.poll(0.0);
        let hat = voices
            .iter()
            .find(|v| matches!(v.source, Source::Buffer { .. }))
            .unwrap();
        let quarter = 60.0 / TEMPO_BPM * 0.25;
        assert!((hat.start - (START_DELAY + quarter)).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_stops_scheduling() {
        let mut music = scheduler();
        let token = music.token();
        music.poll(0.0);
        token.cancel();
        assert!(music.is_cancelled());
        assert!(music.poll(5.0).is_empty());
    }
}
