//! Flappy data structures: bird, pipes, particles, clouds and the session.

use super::config::{current_config, PipeConfig};
use crate::color::Rgb;
use crate::constants::*;
use rand::Rng;

/// Drawable surface size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Top edge of the ground strip.
    pub fn ground_y(&self) -> f64 {
        self.height - GROUND_HEIGHT
    }

    /// Vertical band available for pipe gaps.
    pub fn playable_height(&self) -> f64 {
        (self.height - PLAYABLE_HEIGHT_MARGIN).max(0.0)
    }

    /// Leftmost x the bird may sit at: a third of the width, never less than
    /// the classic start column.
    pub fn bird_min_x(&self) -> f64 {
        (self.width / 3.0).floor().max(BIRD_START_X)
    }
}

/// The player.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Vertical velocity, positive = down. Never exceeds `max_fall`.
    pub dy: f64,
    pub gravity: f64,
    /// Velocity assigned on flap (negative = up).
    pub lift: f64,
    pub max_fall: f64,
    /// Visual tilt in radians, derived from `dy`.
    pub rotation: f64,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            x: BIRD_START_X,
            y: BIRD_START_Y,
            radius: BIRD_RADIUS,
            dy: 0.0,
            gravity: BIRD_GRAVITY,
            lift: BIRD_LIFT,
            max_fall: BIRD_MAX_FALL,
            rotation: 0.0,
        }
    }
}

impl Bird {
    pub fn top(&self) -> f64 {
        self.y - self.radius
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.radius
    }

    pub fn left(&self) -> f64 {
        self.x - self.radius
    }

    pub fn right(&self) -> f64 {
        self.x + self.radius
    }
}

/// A top + bottom pipe pair separated by a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge.
    pub x: f64,
    /// Y of the gap's upper edge (bottom of the top segment).
    pub top: f64,
    pub gap: f64,
    pub width: f64,
    /// Set once when the bird clears the pipe.
    pub passed: bool,
    /// Wobble rotation amplitude in radians.
    pub rotation: f64,
    /// Wobble phase, advanced every frame.
    pub wobble: f64,
}

impl Pipe {
    /// Trailing (right) edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Y of the gap's lower edge (top of the bottom segment).
    pub fn bottom(&self) -> f64 {
        self.top + self.gap
    }

    /// Current wobble angle.
    pub fn tilt(&self) -> f64 {
        self.wobble.sin() * self.rotation
    }
}

/// Crash debris.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Remaining frames.
    pub life: u32,
    pub color: Rgb,
}

impl Particle {
    /// Random debris particle at `(x, y)`, biased upward, in warm yellow hues.
    pub fn debris<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vx: (rng.gen::<f64>() - 0.5) * 6.0,
            vy: (rng.gen::<f64>() - 0.9) * 6.0,
            life: PARTICLE_LIFE,
            color: Rgb::from_hsl(40.0 + rng.gen::<f64>() * 40.0, 0.8, 0.55),
        }
    }

    /// Advance one frame. Returns false once the particle has expired.
    pub fn advance(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += PARTICLE_GRAVITY;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    /// Opacity, fading linearly with remaining life.
    pub fn alpha(&self) -> f64 {
        (self.life as f64 / PARTICLE_LIFE as f64).clamp(0.0, 1.0)
    }

    /// Draw radius, shrinking with remaining life.
    pub fn radius(&self) -> f64 {
        (self.life as f64 / 6.0).max(1.0)
    }
}

/// Decorative parallax cloud. Recycled at the right edge, never destroyed.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub scale: f64,
}

/// The cloud layer. Owned by the host and advanced by the render step only.
#[derive(Debug, Clone, Default)]
pub struct Sky {
    pub clouds: Vec<Cloud>,
}

impl Sky {
    pub fn new<R: Rng>(viewport: Viewport, rng: &mut R) -> Self {
        let clouds = (0..CLOUD_COUNT)
            .map(|_| Cloud {
                x: rng.gen::<f64>() * viewport.width,
                y: 40.0 + rng.gen::<f64>() * 150.0,
                speed: 0.2 + rng.gen::<f64>() * 0.6,
                scale: 0.6 + rng.gen::<f64>() * 0.8,
            })
            .collect();
        Self { clouds }
    }

    /// Scroll every cloud by its own speed, wrapping past the left edge.
    pub fn advance(&mut self, viewport_width: f64) {
        for cloud in &mut self.clouds {
            cloud.x -= cloud.speed;
            if cloud.x < CLOUD_WRAP_X {
                cloud.x = viewport_width + CLOUD_RESPAWN_MARGIN;
            }
        }
    }
}

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for the first interaction; nothing simulates.
    #[default]
    Idle,
    Running,
    /// Simulation frozen after a crash until the next reset.
    GameOver,
}

/// Main game state, owned by the driver and borrowed by the simulation and
/// render steps.
#[derive(Debug, Clone)]
pub struct FlappyGame {
    pub phase: Phase,
    pub viewport: Viewport,

    pub bird: Bird,
    /// Front-to-back by spawn time.
    pub pipes: Vec<Pipe>,
    pub particles: Vec<Particle>,

    /// Pipes cleared this session.
    pub score: u32,
    /// Best score across sessions; never decreases.
    pub best: u32,
    /// Frames simulated since the session started.
    pub frames: u64,
    /// User-selected difficulty level (1..).
    pub difficulty: u32,
    /// Gap-top of the most recently spawned pipe.
    pub last_pipe_top: Option<f64>,
}

impl FlappyGame {
    pub fn new(viewport: Viewport, best: u32, difficulty: u32) -> Self {
        let mut bird = Bird::default();
        bird.x = bird.x.max(viewport.bird_min_x());
        Self {
            phase: Phase::Idle,
            viewport,
            bird,
            pipes: Vec::new(),
            particles: Vec::new(),
            score: 0,
            best,
            frames: 0,
            difficulty,
            last_pipe_top: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Pipe configuration for the current difficulty and score.
    pub fn config(&self) -> PipeConfig {
        current_config(self.difficulty, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_game_defaults() {
        let game = FlappyGame::new(Viewport::new(300.0, 600.0), 7, 2);
        assert_eq!(game.phase, Phase::Idle);
        assert_eq!(game.score, 0);
        assert_eq!(game.best, 7);
        assert_eq!(game.difficulty, 2);
        assert!(game.pipes.is_empty());
        assert!(game.particles.is_empty());
        assert!(game.last_pipe_top.is_none());
        assert_eq!(game.bird.x, BIRD_START_X);
        assert_eq!(game.bird.max_fall, BIRD_MAX_FALL);
    }

    #[test]
    fn test_bird_min_x_on_wide_viewport() {
        let viewport = Viewport::new(1200.0, 600.0);
        assert_eq!(viewport.bird_min_x(), 400.0);
        let game = FlappyGame::new(viewport, 0, 1);
        assert_eq!(game.bird.x, 400.0);
    }

    #[test]
    fn test_viewport_geometry() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.ground_y(), 560.0);
        assert_eq!(viewport.playable_height(), 460.0);
        assert_eq!(Viewport::new(800.0, 100.0).playable_height(), 0.0);
    }

    #[test]
    fn test_particle_lifecycle() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut p = Particle::debris(10.0, 10.0, &mut rng);
        assert_eq!(p.life, PARTICLE_LIFE);
        assert!((p.alpha() - 1.0).abs() < f64::EPSILON);
        assert_eq!(p.radius(), 10.0);

        let vy = p.vy;
        assert!(p.advance());
        assert!((p.vy - (vy + PARTICLE_GRAVITY)).abs() < 1e-9);

        let mut frames = 1;
        while p.advance() {
            frames += 1;
        }
        // The final advance reports expiry instead of counting.
        assert_eq!(frames, PARTICLE_LIFE - 1);
        assert_eq!(p.alpha(), 0.0);
        assert_eq!(p.radius(), 1.0);
    }

    #[test]
    fn test_particle_velocity_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            let p = Particle::debris(0.0, 0.0, &mut rng);
            assert!(p.vx >= -3.0 && p.vx < 3.0);
            assert!(p.vy >= -5.4 && p.vy < 0.6);
        }
    }

    #[test]
    fn test_sky_wraps_clouds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let viewport = Viewport::new(640.0, 480.0);
        let mut sky = Sky::new(viewport, &mut rng);
        assert_eq!(sky.clouds.len(), CLOUD_COUNT);
        for cloud in &sky.clouds {
            assert!(cloud.x >= 0.0 && cloud.x < 640.0);
            assert!(cloud.y >= 40.0 && cloud.y < 190.0);
            assert!(cloud.speed >= 0.2 && cloud.speed < 0.8);
            assert!(cloud.scale >= 0.6 && cloud.scale < 1.4);
        }

        sky.clouds[0].x = CLOUD_WRAP_X + 0.1;
        sky.clouds[0].speed = 0.5;
        sky.advance(viewport.width);
        assert_eq!(sky.clouds[0].x, viewport.width + CLOUD_RESPAWN_MARGIN);
        assert_eq!(sky.clouds.len(), CLOUD_COUNT);
    }

    #[test]
    fn test_pipe_geometry() {
        let pipe = Pipe {
            x: 100.0,
            top: 80.0,
            gap: 200.0,
            width: 72.0,
            passed: false,
            rotation: 0.02,
            wobble: 0.0,
        };
        assert_eq!(pipe.right(), 172.0);
        assert_eq!(pipe.bottom(), 280.0);
        assert_eq!(pipe.tilt(), 0.0);
    }
}
