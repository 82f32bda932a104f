//! Automatable parameter with set / linear-ramp / exponential-ramp events.
//!
//! Values between events follow the usual audio-graph automation rules: a
//! ramp event interpolates from the previous event's value and time up to
//! its own; a set event holds the previous value until it takes effect.

#[derive(Debug, Clone, Copy, PartialEq)]
enum Automation {
    Set,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ParamEvent {
    kind: Automation,
    time: f64,
    value: f64,
}

/// A parameter value over time (seconds on the mixer clock).
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    default: f64,
    events: Vec<ParamEvent>,
}

impl Param {
    pub fn new(value: f64) -> Self {
        Self {
            default: value,
            events: Vec::new(),
        }
    }

    pub fn set_value_at_time(&mut self, value: f64, time: f64) -> &mut Self {
        self.insert(Automation::Set, value, time)
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f64, time: f64) -> &mut Self {
        self.insert(Automation::Linear, value, time)
    }

    pub fn exponential_ramp_to_value_at_time(&mut self, value: f64, time: f64) -> &mut Self {
        self.insert(Automation::Exponential, value, time)
    }

    fn insert(&mut self, kind: Automation, value: f64, time: f64) -> &mut Self {
        // Events stay time-ordered; ties keep insertion order.
        let index = self.events.partition_point(|e| e.time <= time);
        self.events.insert(index, ParamEvent { kind, time, value });
        self
    }

    /// Value at `time`.
    pub fn value_at(&self, time: f64) -> f64 {
        let (mut prev_time, mut prev_value) = (0.0, self.default);

        for event in &self.events {
            if event.time <= time {
                prev_time = event.time;
                prev_value = event.value;
                continue;
            }

            let span = event.time - prev_time;
            let progress = if span > 0.0 {
                ((time - prev_time) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            return match event.kind {
                Automation::Set => prev_value,
                Automation::Linear => prev_value + (event.value - prev_value) * progress,
                Automation::Exponential => {
                    // Only defined between non-zero values of the same sign
                    if prev_value == 0.0 || prev_value.signum() != event.value.signum() {
                        prev_value
                    } else {
                        prev_value * (event.value / prev_value).powf(progress)
                    }
                }
            };
        }

        prev_value
    }
}
