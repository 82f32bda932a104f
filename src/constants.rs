// Simulation timing
pub const FRAMES_PER_SECOND: u32 = 60;
pub const FRAME_INTERVAL_NANOS: u64 = 1_000_000_000 / FRAMES_PER_SECOND as u64;
pub const MAX_CATCH_UP_STEPS: u32 = 5;

// Base pipe configuration (difficulty 1, score 0)
pub const BASE_GAP: f64 = 150.0;
pub const BASE_PIPE_WIDTH: f64 = 72.0;
pub const BASE_SPEED: f64 = 2.6;
pub const BASE_SPAWN_INTERVAL: u64 = 92;

// Difficulty scaling per level above 1
pub const WIDTH_PER_LEVEL: f64 = 6.0;
pub const SPEED_PER_LEVEL: f64 = 0.6;
pub const SPAWN_INTERVAL_PER_LEVEL: f64 = 12.0;
pub const MIN_PIPE_WIDTH: f64 = 48.0;
pub const MIN_SPAWN_INTERVAL: u64 = 48;

// Score-driven gap: shrinks from GAP_START to GAP_MIN over GAP_SCORE_RANGE points
pub const GAP_START_FACTOR: f64 = 1.6;
pub const GAP_MIN: f64 = 100.0;
pub const GAP_SCORE_RANGE: f64 = 10.0;

// Pipe spawn placement
pub const PIPE_MIN_TOP: f64 = 60.0;
pub const PLAYABLE_HEIGHT_MARGIN: f64 = 140.0;
pub const PIPE_MIN_SWING: f64 = 80.0;
pub const PIPE_SWING_GAP_FACTOR: f64 = 0.9;
pub const PIPE_SPAWN_OFFSET: f64 = 20.0;
pub const PIPE_INITIAL_OFFSET_FACTOR: f64 = 0.02;
pub const PIPE_DESPAWN_X: f64 = -100.0;
pub const PIPE_WOBBLE_STEP: f64 = 0.02;
pub const PIPE_MAX_ROTATION: f64 = 0.04;

// Bird
pub const BIRD_START_X: f64 = 140.0;
pub const BIRD_START_Y: f64 = 240.0;
pub const BIRD_RADIUS: f64 = 20.0;
pub const BIRD_GRAVITY: f64 = 0.56;
pub const BIRD_LIFT: f64 = -11.0;
pub const BIRD_MAX_FALL: f64 = 14.0;
pub const BIRD_ROTATION_DIVISOR: f64 = 12.0;
pub const BIRD_MIN_ROTATION: f64 = -0.6;
pub const BIRD_MAX_ROTATION: f64 = 1.2;

// World
pub const GROUND_HEIGHT: f64 = 40.0;

// Crash particles
pub const PARTICLE_BURST: usize = 24;
pub const PARTICLE_LIFE: u32 = 60;
pub const PARTICLE_GRAVITY: f64 = 0.18;

// Parallax clouds
pub const CLOUD_COUNT: usize = 6;
pub const CLOUD_WRAP_X: f64 = -200.0;
pub const CLOUD_RESPAWN_MARGIN: f64 = 60.0;

// Terminal host: logical pixels per terminal cell
pub const CELL_WIDTH_PX: f64 = 12.0;
pub const CELL_HEIGHT_PX: f64 = 24.0;

// Settings
pub const DEFAULT_VOLUME: f32 = 0.9;
pub const MAX_DIFFICULTY: u32 = 10;
pub const VOLUME_STEP: f32 = 0.1;
pub const SETTINGS_FILE: &str = "settings.json";
pub const LOG_FILE: &str = "flappy.log";

// Score bubble ("+1") lifetime
pub const SCORE_BUBBLE_MS: u64 = 900;
