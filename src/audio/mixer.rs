//! Sample-accurate mixer: owns scheduled voices, the feedback delay bus and
//! the master gain. Its rendered-sample counter is the audio clock.

use super::graph::{Bus, Voice, VoiceGroup};
use std::sync::{Arc, Mutex};

pub const SAMPLE_RATE: u32 = 44_100;

/// Mixer shared between the game thread (scheduling) and the output stream
/// (rendering).
pub type SharedMixer = Arc<Mutex<Mixer>>;

/// Feedback delay: `y[n] = w[n - D]`, `w[n] = x[n] + feedback * y[n]`.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f64>,
    position: usize,
    feedback: f64,
}

impl DelayLine {
    pub fn new(delay_seconds: f64, feedback: f64, sample_rate: u32) -> Self {
        let len = ((delay_seconds * sample_rate as f64).round() as usize).max(1);
        Self {
            buffer: vec![0.0; len],
            position: 0,
            feedback,
        }
    }

    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.buffer[self.position];
        self.buffer[self.position] = input + self.feedback * output;
        self.position = (self.position + 1) % self.buffer.len();
        output
    }

    /// Drop everything still circulating.
    pub fn clear(&mut self) {
        self.buffer.iter_mut().for_each(|s| *s = 0.0);
    }
}

#[derive(Debug)]
pub struct Mixer {
    sample_rate: u32,
    /// Samples rendered so far.
    position: u64,
    master_gain: f32,
    voices: Vec<Voice>,
    delay: Option<DelayLine>,
    /// Voices scheduled since creation, for diagnostics.
    scheduled_total: u64,
}

impl Mixer {
    pub fn new(sample_rate: u32, master_gain: f32) -> Self {
        Self {
            sample_rate,
            position: 0,
            master_gain: master_gain.clamp(0.0, 1.0),
            voices: Vec::new(),
            delay: None,
            scheduled_total: 0,
        }
    }

    pub fn shared(self) -> SharedMixer {
        Arc::new(Mutex::new(self))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current mixer time in seconds.
    pub fn now(&self) -> f64 {
        self.position as f64 / self.sample_rate as f64
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = gain.clamp(0.0, 1.0);
    }

    /// Install (or replace) the delay bus.
    pub fn configure_delay(&mut self, delay_seconds: f64, feedback: f64) {
        self.delay = Some(DelayLine::new(delay_seconds, feedback, self.sample_rate));
    }

    pub fn schedule(&mut self, voice: Voice) {
        self.scheduled_total += 1;
        self.voices.push(voice);
    }

    pub fn schedule_all(&mut self, voices: impl IntoIterator<Item = Voice>) {
        for voice in voices {
            self.schedule(voice);
        }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn scheduled_total(&self) -> u64 {
        self.scheduled_total
    }

    /// Remove every pending and sounding voice in `group`. Cancelling music
    /// also silences the delay bus, which only music feeds.
    pub fn cancel_group(&mut self, group: VoiceGroup) {
        self.voices.retain(|v| v.group != group);
        if group == VoiceGroup::Music {
            if let Some(delay) = &mut self.delay {
                delay.clear();
            }
        }
    }

    /// Render the next sample and advance the clock.
    pub fn next_sample(&mut self) -> f32 {
        let time = self.now();
        let sample_rate = self.sample_rate as f64;

        let (mut dry, mut wet) = (0.0, 0.0);
        for voice in self.voices.iter_mut().filter(|v| v.is_active(time)) {
            let value = voice.render(time, sample_rate);
            match voice.bus {
                Bus::Master => dry += value,
                Bus::Delay => wet += value,
            }
        }
        let delayed = match &mut self.delay {
            Some(delay) => delay.process(wet),
            None => 0.0,
        };

        self.position += 1;
        if self.position % 512 == 0 {
            let now = self.now();
            self.voices.retain(|v| !v.is_finished(now));
        }

        ((dry + delayed) * self.master_gain as f64).clamp(-1.0, 1.0) as f32
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Advance the clock by `seconds`, discarding the output.
    pub fn advance(&mut self, seconds: f64) {
        let samples = (seconds * self.sample_rate as f64).round() as u64;
        for _ in 0..samples {
            self.next_sample();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::graph::Waveform;
    use crate::audio::param::Param;

    fn tone(start: f64, stop: f64) -> Voice {
        Voice::oscillator(Waveform::Sine, Param::new(1000.0), start, stop)
    }

    #[test]
    fn test_clock_advances_with_rendering() {
        let mut mixer = Mixer::new(SAMPLE_RATE, 1.0);
        assert_eq!(mixer.now(), 0.0);
        let mut out = vec![0.0; SAMPLE_RATE as usize / 2];
        mixer.render(&mut out);
        assert!((mixer.now() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_voice_only_sounds_inside_window() {
        let mut mixer = Mixer::new(SAMPLE_RATE, 1.0);
        mixer.schedule(tone(0.01, 0.02));
        let mut out = vec![0.0; 1323];
        mixer.render(&mut out);
        assert!(out[..441].iter().all(|s| *s == 0.0));
        assert!(out[441..882].iter().any(|s| s.abs() > 0.5));
        assert!(out[883..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_master_gain_zero_silences_but_keeps_voices() {
        let mut mixer = Mixer::new(SAMPLE_RATE, 0.0);
        mixer.schedule(tone(0.0, 1.0));
        let mut out = vec![1.0; 441];
        mixer.render(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));
        assert_eq!(mixer.voices().len(), 1);
    }

    #[test]
    fn test_finished_voices_are_culled() {
        let mut mixer = Mixer::new(SAMPLE_RATE, 1.0);
        mixer.schedule(tone(0.0, 0.001));
        mixer.advance(0.05);
        assert!(mixer.voices().is_empty());
        assert_eq!(mixer.scheduled_total(), 1);
    }

    #[test]
    fn test_cancel_group_keeps_other_groups() {
        let mut mixer = Mixer::new(SAMPLE_RATE, 1.0);
        mixer.schedule(tone(0.0, 1.0));
        mixer.schedule(tone(0.0, 1.0).in_group(VoiceGroup::Music));
        mixer.schedule(tone(5.0, 6.0).in_group(VoiceGroup::Music));
        mixer.cancel_group(VoiceGroup::Music);
        assert_eq!(mixer.voices().len(), 1);
        assert_eq!(mixer.voices()[0].group, VoiceGroup::Effect);
    }

    #[test]
    fn test_delay_echoes_with_feedback() {
        let mut delay = DelayLine::new(0.001, 0.5, 1000);
        assert_eq!(delay.process(1.0), 0.0);
        assert_eq!(delay.process(0.0), 1.0);
        assert_eq!(delay.process(0.0), 0.5);
        assert_eq!(delay.process(0.0), 0.25);
        delay.clear();
        assert_eq!(delay.process(0.0), 0.0);
    }

    #[test]
    fn test_delay_bus_routes_through_delay() {
        let mut mixer = Mixer::new(1000, 1.0);
        mixer.configure_delay(0.01, 0.0);
        let mut gain = Param::new(0.0);
        gain.set_value_at_time(1.0, 0.0);
        let impulse: std::sync::Arc<[f32]> = vec![1.0].into();
        mixer.schedule(
            Voice::buffer(impulse, 0.0, 0.002)
                .with_gain(gain)
                .on_bus(Bus::Delay)
                .in_group(VoiceGroup::Music),
        );
        let mut out = vec![0.0; 20];
        mixer.render(&mut out);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[10], 1.0);
    }
}
