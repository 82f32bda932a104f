//! Host controller: owns the session, cosmetic layers, audio and settings,
//! and turns input and elapsed time into simulation steps.

use crate::audio::{AudioEngine, Sfx};
use crate::constants::*;
use crate::game::{self, FlappyGame, GameEvent, Phase, Sky, Viewport};
use crate::input::HostInput;
use crate::render::Assets;
use crate::settings::{Settings, SettingsStore};
use crate::ui::hud::{age_bubbles, ScoreBubble};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Logical pixels covered by a play area of `cols` x `rows` terminal cells.
pub fn viewport_for_cells(cols: u16, rows: u16) -> Viewport {
    Viewport::new(cols as f64 * CELL_WIDTH_PX, rows as f64 * CELL_HEIGHT_PX)
}

pub fn frame_interval() -> Duration {
    Duration::from_nanos(FRAME_INTERVAL_NANOS)
}

pub struct App {
    pub game: FlappyGame,
    pub sky: Sky,
    pub audio: AudioEngine,
    pub settings: SettingsStore,
    pub assets: Assets,
    pub bubbles: Vec<ScoreBubble>,
    /// Whether the last crash raised the best score.
    pub last_new_best: bool,
    rng: StdRng,
    accumulator: Duration,
    should_quit: bool,
}

impl App {
    pub fn new(settings: SettingsStore, audio: AudioEngine, assets: Assets, viewport: Viewport) -> Self {
        Self::with_rng(settings, audio, assets, viewport, StdRng::from_entropy())
    }

    pub fn with_rng(
        settings: SettingsStore,
        audio: AudioEngine,
        assets: Assets,
        viewport: Viewport,
        mut rng: StdRng,
    ) -> Self {
        let Settings {
            best, difficulty, ..
        } = settings.settings().clone();
        let sky = Sky::new(viewport, &mut rng);
        Self {
            game: FlappyGame::new(viewport, best, difficulty),
            sky,
            audio,
            settings,
            assets,
            bubbles: Vec::new(),
            last_new_best: false,
            rng,
            accumulator: Duration::ZERO,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_input(&mut self, input: HostInput) {
        match input {
            HostInput::Primary => {
                let events = game::primary_action(&mut self.game, &mut self.rng);
                self.apply_events(events);
            }
            HostInput::Start | HostInput::Restart => self.start(),
            HostInput::ToggleAudio => self.toggle_audio(),
            HostInput::VolumeUp => self.adjust_volume(VOLUME_STEP),
            HostInput::VolumeDown => self.adjust_volume(-VOLUME_STEP),
            HostInput::DifficultyUp => self.adjust_difficulty(1),
            HostInput::DifficultyDown => self.adjust_difficulty(-1),
            HostInput::Quit => self.should_quit = true,
        }
    }

    /// Begin a new session from any state.
    pub fn start(&mut self) {
        let events = game::reset(&mut self.game, &mut self.rng);
        self.apply_events(events);
    }

    pub fn toggle_audio(&mut self) {
        let enabled = self.audio.toggle();
        self.persist(|s| s.audio_enabled = enabled);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        // Round to the step so repeated presses land on clean values
        let volume = ((self.audio.volume() + delta) * 10.0).round() / 10.0;
        self.audio.set_volume(volume);
        let volume = self.audio.volume();
        self.persist(|s| s.volume = volume);
    }

    /// Takes effect on the next config computation.
    pub fn adjust_difficulty(&mut self, delta: i32) {
        let difficulty = (self.game.difficulty as i32 + delta).clamp(1, MAX_DIFFICULTY as i32) as u32;
        if difficulty == self.game.difficulty {
            return;
        }
        self.game.difficulty = difficulty;
        self.persist(|s| s.difficulty = difficulty);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.game.viewport {
            game::resize(&mut self.game, viewport);
        }
    }

    /// Run as many fixed steps as `elapsed` covers, capped at
    /// [`MAX_CATCH_UP_STEPS`]. Returns the number of steps taken.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        age_bubbles(&mut self.bubbles, elapsed);

        let interval = frame_interval();
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= interval && steps < MAX_CATCH_UP_STEPS {
            self.accumulator -= interval;
            self.step_once();
            steps += 1;
        }
        if steps == MAX_CATCH_UP_STEPS {
            // Drop the backlog after a stall
            self.accumulator = Duration::ZERO;
        }
        steps
    }

    fn step_once(&mut self) {
        match self.game.phase {
            Phase::Running => {
                let events = game::step(&mut self.game, &mut self.rng);
                self.apply_events(events);
            }
            Phase::GameOver => game::settle_particles(&mut self.game),
            Phase::Idle => {}
        }
    }

    /// Drive the music scheduler.
    pub fn poll_audio(&mut self, now: Instant) {
        self.audio.poll(now);
    }

    fn apply_events(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Started => {
                    self.bubbles.clear();
                    self.last_new_best = false;
                    self.audio.start_music();
                }
                GameEvent::Flapped => self.audio.play(Sfx::Flap),
                GameEvent::Scored { x, y, score } => {
                    debug!(score, "scored");
                    self.audio.play(Sfx::Point);
                    self.bubbles.push(ScoreBubble::new(x, y, "+1"));
                }
                GameEvent::Crashed { best, new_best, .. } => {
                    self.audio.play(Sfx::Crash);
                    self.audio.stop_music();
                    self.last_new_best = new_best;
                    if new_best {
                        self.persist(|s| s.best = best);
                    }
                }
            }
        }
    }

    fn persist(&mut self, change: impl FnOnce(&mut Settings)) {
        if let Err(e) = self.settings.update(change) {
            warn!(error = %e, "failed to save settings");
        }
    }
}
