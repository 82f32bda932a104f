//! One-shot sound effects, built as voice graphs starting at a given time.

use super::graph::{noise_buffer, FilterKind, Voice, Waveform};
use super::mixer::SAMPLE_RATE;
use super::param::Param;
use rand::Rng;

/// Sound effect cues triggered by game events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sfx {
    Flap,
    Point,
    Crash,
}

impl Sfx {
    pub fn voices<R: Rng>(self, at: f64, rng: &mut R) -> Vec<Voice> {
        match self {
            Sfx::Flap => vec![flap(at)],
            Sfx::Point => vec![bell(880.0, at), bell(1188.0, at + 0.06)],
            Sfx::Crash => crash(at, rng).into(),
        }
    }
}

/// Rising sawtooth chirp through a lowpass.
fn flap(t: f64) -> Voice {
    let mut frequency = Param::new(300.0);
    frequency
        .set_value_at_time(300.0, t)
        .exponential_ramp_to_value_at_time(750.0, t + 0.09);

    let mut gain = Param::new(0.0);
    gain.set_value_at_time(0.0001, t)
        .linear_ramp_to_value_at_time(0.18, t + 0.02)
        .exponential_ramp_to_value_at_time(0.0001, t + 0.28);

    Voice::oscillator(Waveform::Sawtooth, frequency, t, t + 0.35)
        .with_filter(FilterKind::Lowpass, 1800.0)
        .with_gain(gain)
}

/// Short sine chime.
fn bell(freq: f64, t: f64) -> Voice {
    let mut gain = Param::new(0.0);
    gain.set_value_at_time(0.0001, t)
        .linear_ramp_to_value_at_time(0.22, t + 0.006)
        .exponential_ramp_to_value_at_time(0.0001, t + 0.30);

    Voice::oscillator(Waveform::Sine, Param::new(freq), t, t + 0.32).with_gain(gain)
}

/// Low thud plus a high-passed noise burst.
fn crash<R: Rng>(t: f64, rng: &mut R) -> [Voice; 2] {
    let mut thud_gain = Param::new(0.0);
    thud_gain
        .set_value_at_time(0.0001, t)
        .linear_ramp_to_value_at_time(0.7, t + 0.02)
        .exponential_ramp_to_value_at_time(0.0001, t + 0.7);
    let thud = Voice::oscillator(Waveform::Sine, Param::new(60.0), t, t + 0.72).with_gain(thud_gain);

    let len = (SAMPLE_RATE as f64 * 0.25) as usize;
    let mut noise_gain = Param::new(0.0);
    noise_gain
        .set_value_at_time(0.5, t)
        .exponential_ramp_to_value_at_time(0.0001, t + 0.6);
    let noise = Voice::buffer(noise_buffer(len, Some(2400.0), rng), t, t + 0.28)
        .with_filter(FilterKind::Highpass, 800.0)
        .with_gain(noise_gain);

    [thud, noise]
}
