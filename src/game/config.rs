//! Difficulty policy: maps the difficulty level and the current score to the
//! pipe configuration used by one simulation step.
//!
//! Difficulty drives width, scroll speed and spawn cadence. Score drives the
//! gap, which tightens from [`gap_start`] to [`GAP_MIN`] over the first
//! [`GAP_SCORE_RANGE`] points.

use crate::constants::{
    BASE_GAP, BASE_PIPE_WIDTH, BASE_SPAWN_INTERVAL, BASE_SPEED, GAP_MIN, GAP_SCORE_RANGE,
    GAP_START_FACTOR, MIN_PIPE_WIDTH, MIN_SPAWN_INTERVAL, SPAWN_INTERVAL_PER_LEVEL,
    SPEED_PER_LEVEL, WIDTH_PER_LEVEL,
};

/// Pipe parameters for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeConfig {
    /// Vertical opening between the top and bottom segments (px).
    pub gap: f64,
    /// Pipe width (px).
    pub width: f64,
    /// Horizontal scroll per frame (px).
    pub speed: f64,
    /// Frames between scheduled spawns.
    pub spawn_interval: u64,
}

/// Gap at score 0.
pub fn gap_start() -> f64 {
    (BASE_GAP * GAP_START_FACTOR).floor()
}

/// Compute the pipe configuration. Pure; out-of-range difficulty values are
/// absorbed by clamping the outputs (width and spawn interval never drop
/// below their minimums).
pub fn current_config(difficulty: u32, score: u32) -> PipeConfig {
    let level = difficulty as f64 - 1.0;

    let width = (BASE_PIPE_WIDTH + (level * WIDTH_PER_LEVEL).floor()).max(MIN_PIPE_WIDTH);
    let speed = BASE_SPEED + level * SPEED_PER_LEVEL;
    let spawn_interval = (BASE_SPAWN_INTERVAL as f64 - level * SPAWN_INTERVAL_PER_LEVEL)
        .floor()
        .max(MIN_SPAWN_INTERVAL as f64) as u64;

    let t = (score as f64 / GAP_SCORE_RANGE).min(1.0);
    let start = gap_start();
    let gap = (start + (GAP_MIN - start) * t).round();

    PipeConfig {
        gap,
        width,
        speed,
        spawn_interval,
    }
}
