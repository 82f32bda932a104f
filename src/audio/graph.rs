//! Voice graph nodes: oscillators, noise buffers, biquad filters and gain
//! envelopes, wired source -> filter -> gain -> bus.

use super::param::Param;
use rand::Rng;
use std::f64::consts::{PI, TAU};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

impl Waveform {
    /// Sample the waveform at `phase` (cycles, wrapped to 0..1).
    fn sample(self, phase: f64) -> f64 {
        match self {
            Self::Sine => (TAU * phase).sin(),
            Self::Sawtooth => 2.0 * (phase - (phase + 0.5).floor()),
        }
    }
}

/// Where a voice's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bus {
    /// Straight to the master gain.
    Master,
    /// Through the shared feedback delay, then master.
    Delay,
}

/// Ownership tag so a whole group can be cancelled at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceGroup {
    Effect,
    Music,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Highpass,
}

/// Second-order IIR filter (RBJ cookbook), Butterworth Q.
#[derive(Debug, Clone, PartialEq)]
pub struct Biquad {
    pub kind: FilterKind,
    pub frequency: f64,
    coeffs: Option<[f64; 5]>,
    state: [f64; 4],
}

impl Biquad {
    const Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

    pub fn new(kind: FilterKind, frequency: f64) -> Self {
        Self {
            kind,
            frequency,
            coeffs: None,
            state: [0.0; 4],
        }
    }

    fn coefficients(&self, sample_rate: f64) -> [f64; 5] {
        let nyquist = sample_rate / 2.0;
        let freq = self.frequency.clamp(1.0, nyquist * 0.99);
        let w0 = 2.0 * PI * freq / sample_rate;
        let (sin, cos) = w0.sin_cos();
        let alpha = sin / (2.0 * Self::Q);

        let (b0, b1, b2) = match self.kind {
            FilterKind::Lowpass => ((1.0 - cos) / 2.0, 1.0 - cos, (1.0 - cos) / 2.0),
            FilterKind::Highpass => ((1.0 + cos) / 2.0, -(1.0 + cos), (1.0 + cos) / 2.0),
        };
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos;
        let a2 = 1.0 - alpha;
        [b0 / a0, b1 / a0, b2 / a0, a1 / a0, a2 / a0]
    }

    pub fn process(&mut self, input: f64, sample_rate: f64) -> f64 {
        let [b0, b1, b2, a1, a2] = match self.coeffs {
            Some(c) => c,
            None => {
                let c = self.coefficients(sample_rate);
                self.coeffs = Some(c);
                c
            }
        };
        let [x1, x2, y1, y2] = self.state;
        let output = b0 * input + b1 * x1 + b2 * x2 - a1 * y1 - a2 * y2;
        self.state = [input, x1, output, y1];
        output
    }
}

/// Signal generator at the head of a voice.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Oscillator {
        waveform: Waveform,
        frequency: Param,
        phase: f64,
    },
    /// Pre-rendered samples played from the voice's start time.
    Buffer { samples: Arc<[f32]> },
}

/// Generate `len` samples of white noise in -1..1, optionally shaped by a
/// per-sample exponential decay `exp(-i / decay)`.
pub fn noise_buffer<R: Rng>(len: usize, decay: Option<f64>, rng: &mut R) -> Arc<[f32]> {
    (0..len)
        .map(|i| {
            let white = rng.gen::<f64>() * 2.0 - 1.0;
            let shaped = match decay {
                Some(d) => white * (-(i as f64) / d).exp(),
                None => white,
            };
            shaped as f32
        })
        .collect()
}

/// One scheduled sound: source, optional filter, gain envelope, bus.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub source: Source,
    pub filter: Option<Biquad>,
    pub gain: Param,
    /// Start time on the mixer clock (seconds).
    pub start: f64,
    /// Stop time; the voice is silent and discarded afterwards.
    pub stop: f64,
    pub bus: Bus,
    pub group: VoiceGroup,
}

impl Voice {
    pub fn oscillator(waveform: Waveform, frequency: Param, start: f64, stop: f64) -> Self {
        Self::new(
            Source::Oscillator {
                waveform,
                frequency,
                phase: 0.0,
            },
            start,
            stop,
        )
    }

    pub fn buffer(samples: Arc<[f32]>, start: f64, stop: f64) -> Self {
        Self::new(Source::Buffer { samples }, start, stop)
    }

    fn new(source: Source, start: f64, stop: f64) -> Self {
        Self {
            source,
            filter: None,
            gain: Param::new(1.0),
            start,
            stop,
            bus: Bus::Master,
            group: VoiceGroup::Effect,
        }
    }

    pub fn with_filter(mut self, kind: FilterKind, frequency: f64) -> Self {
        self.filter = Some(Biquad::new(kind, frequency));
        self
    }

    pub fn with_gain(mut self, gain: Param) -> Self {
        self.gain = gain;
        self
    }

    pub fn on_bus(mut self, bus: Bus) -> Self {
        self.bus = bus;
        self
    }

    pub fn in_group(mut self, group: VoiceGroup) -> Self {
        self.group = group;
        self
    }

    pub fn is_active(&self, time: f64) -> bool {
        time >= self.start && time < self.stop
    }

    pub fn is_finished(&self, time: f64) -> bool {
        time >= self.stop
    }

    /// Render one sample at `time`. Callers only invoke this while active.
    pub fn render(&mut self, time: f64, sample_rate: f64) -> f64 {
        let raw = match &mut self.source {
            Source::Oscillator {
                waveform,
                frequency,
                phase,
            } => {
                let value = waveform.sample(*phase);
                *phase = (*phase + frequency.value_at(time) / sample_rate).fract();
                value
            }
            Source::Buffer { samples } => {
                let index = ((time - self.start) * sample_rate).round().max(0.0) as usize;
                samples.get(index).copied().unwrap_or(0.0) as f64
            }
        };

        let filtered = match &mut self.filter {
            Some(filter) => filter.process(raw, sample_rate),
            None => raw,
        };
        filtered * self.gain.value_at(time)
    }
}
