//! Game logic for Flappy: session transitions, the per-frame simulation step,
//! pipe spawning and collision handling.
//!
//! Every operation returns the [`GameEvent`]s it produced; audio, persistence
//! and presentation are left to the caller.

use super::config::PipeConfig;
use super::events::GameEvent;
use super::types::{FlappyGame, Particle, Phase, Pipe, Viewport};
use crate::constants::*;
use rand::Rng;
use tracing::{debug, info};

/// Start a new session (Idle/GameOver/Running -> Running).
///
/// Clears pipes, particles, score and frame counter, centers the bird
/// vertically and spawns the first pipe immediately.
pub fn reset<R: Rng>(game: &mut FlappyGame, rng: &mut R) -> Vec<GameEvent> {
    game.frames = 0;
    game.pipes.clear();
    game.particles.clear();
    game.score = 0;
    game.last_pipe_top = None;
    game.phase = Phase::Running;

    let viewport = game.viewport;
    game.bird.y = if viewport.height > 0.0 {
        viewport.height / 2.0
    } else {
        BIRD_START_Y
    };
    game.bird.x = viewport.bird_min_x();
    game.bird.dy = 0.0;
    game.bird.rotation = 0.0;

    let cfg = game.config();
    spawn_pipe(game, &cfg, true, rng);

    info!(
        difficulty = game.difficulty,
        width = viewport.width,
        height = viewport.height,
        "session started"
    );
    vec![GameEvent::Started]
}

/// Apply the flap impulse. No-op unless Running.
pub fn flap(game: &mut FlappyGame) -> Vec<GameEvent> {
    if !game.is_running() {
        return Vec::new();
    }
    game.bird.dy = game.bird.lift;
    vec![GameEvent::Flapped]
}

/// Primary gesture (tap, click, space): starts a session when not Running,
/// then flaps. The first interaction both starts and flaps.
pub fn primary_action<R: Rng>(game: &mut FlappyGame, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !game.is_running() {
        events.extend(reset(game, rng));
    }
    events.extend(flap(game));
    events
}

/// End the session (Running -> GameOver).
///
/// Refused outside Running, so several crash conditions in one step produce
/// a single best-score update and a single particle burst.
pub fn end_game<R: Rng>(game: &mut FlappyGame, rng: &mut R) -> Vec<GameEvent> {
    if !game.is_running() {
        return Vec::new();
    }
    game.phase = Phase::GameOver;

    let new_best = game.score > game.best;
    if new_best {
        game.best = game.score;
    }

    let (x, y) = (game.bird.x, game.bird.y);
    explode(game, x, y, rng);

    info!(
        score = game.score,
        best = game.best,
        frames = game.frames,
        "session ended"
    );
    vec![GameEvent::Crashed {
        x,
        y,
        score: game.score,
        best: game.best,
        new_best,
    }]
}

/// Advance the simulation by one frame. No-op unless Running.
pub fn step<R: Rng>(game: &mut FlappyGame, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !game.is_running() {
        return events;
    }

    game.frames += 1;
    let cfg = game.config();

    integrate_bird(game);

    if game.frames % cfg.spawn_interval == 0 {
        spawn_pipe(game, &cfg, false, rng);
    }

    advance_pipes(game, &cfg, &mut events);

    // Ceiling clamps; ground crashes
    if game.bird.top() <= 0.0 {
        game.bird.y = game.bird.radius;
        game.bird.dy = 0.0;
    }
    let ground_y = game.viewport.ground_y();
    if game.bird.bottom() >= ground_y {
        game.bird.y = ground_y - game.bird.radius;
        events.extend(end_game(game, rng));
    }

    if hits_pipe(game) {
        events.extend(end_game(game, rng));
    }

    settle_particles(game);
    events
}

/// Advance and cull particles. Also called by the host after game over so the
/// crash burst keeps animating while the rest of the world stays frozen.
pub fn settle_particles(game: &mut FlappyGame) {
    game.particles.retain_mut(Particle::advance);
}

/// Adopt a new drawable size. Only the bird's horizontal floor is re-derived;
/// in-flight velocity and pipes are untouched.
pub fn resize(game: &mut FlappyGame, viewport: Viewport) {
    game.viewport = viewport;
    game.bird.x = game.bird.x.max(viewport.bird_min_x());
    debug!(
        width = viewport.width,
        height = viewport.height,
        bird_x = game.bird.x,
        "viewport resized"
    );
}

/// Spawn a pipe at the right edge.
///
/// The gap-top is drawn uniformly from `[min_top, max_top]`, then clamped so
/// it moves at most `max(80, 0.9 * gap)` from the previous pipe's gap-top.
pub fn spawn_pipe<R: Rng>(game: &mut FlappyGame, cfg: &PipeConfig, initial: bool, rng: &mut R) {
    let viewport = game.viewport;
    let min_top = PIPE_MIN_TOP;
    let max_top = min_top.max(min_top + viewport.playable_height() - cfg.gap);

    let mut top = min_top + rng.gen::<f64>() * (max_top - min_top).max(0.0);

    if let Some(last) = game.last_pipe_top {
        let max_delta = max_pipe_swing(cfg.gap);
        let allowed_min = min_top.max(last - max_delta);
        let allowed_max = max_top.min(last + max_delta);
        top = top.max(allowed_min).min(allowed_max);
    }

    let offset = if initial {
        PIPE_SPAWN_OFFSET.max(viewport.width * PIPE_INITIAL_OFFSET_FACTOR)
    } else {
        PIPE_SPAWN_OFFSET
    };

    game.pipes.push(Pipe {
        x: (viewport.width - offset).round(),
        top,
        gap: cfg.gap,
        width: cfg.width,
        passed: false,
        rotation: (rng.gen::<f64>() - 0.5) * PIPE_MAX_ROTATION,
        wobble: 0.0,
    });
    game.last_pipe_top = Some(top);

    debug!(
        frame = game.frames,
        top,
        gap = cfg.gap,
        pipes = game.pipes.len(),
        "pipe spawned"
    );
}

/// Largest allowed change in gap-top between consecutive pipes.
pub fn max_pipe_swing(gap: f64) -> f64 {
    PIPE_MIN_SWING.max((gap * PIPE_SWING_GAP_FACTOR).floor())
}

fn integrate_bird(game: &mut FlappyGame) {
    let bird = &mut game.bird;
    bird.dy += bird.gravity;
    if bird.dy > bird.max_fall {
        bird.dy = bird.max_fall;
    }
    bird.y += bird.dy;
    bird.rotation = (bird.dy / BIRD_ROTATION_DIVISOR).clamp(BIRD_MIN_ROTATION, BIRD_MAX_ROTATION);
}

/// Scroll pipes, score the ones the bird has cleared and drop the ones far
/// off the left edge.
fn advance_pipes(game: &mut FlappyGame, cfg: &PipeConfig, events: &mut Vec<GameEvent>) {
    let bird_left = game.bird.left();
    let (bubble_x, bubble_y) = (game.bird.x, game.bird.y - 30.0);
    let mut score = game.score;

    game.pipes.retain_mut(|pipe| {
        pipe.x -= cfg.speed;
        pipe.wobble += PIPE_WOBBLE_STEP;

        if !pipe.passed && pipe.right() < bird_left {
            pipe.passed = true;
            score += 1;
            events.push(GameEvent::Scored {
                x: bubble_x,
                y: bubble_y,
                score,
            });
        }

        pipe.right() >= PIPE_DESPAWN_X
    });

    game.score = score;
}

/// True when the bird overlaps a pipe horizontally without sitting strictly
/// inside its gap.
fn hits_pipe(game: &FlappyGame) -> bool {
    let bird = &game.bird;
    game.pipes.iter().any(|pipe| {
        let overlaps = bird.right() > pipe.x && bird.left() < pipe.right();
        overlaps && (bird.top() < pipe.top || bird.bottom() > pipe.bottom())
    })
}

fn explode<R: Rng>(game: &mut FlappyGame, x: f64, y: f64, rng: &mut R) {
    game.particles
        .extend((0..PARTICLE_BURST).map(|_| Particle::debris(x, y, rng)));
}
