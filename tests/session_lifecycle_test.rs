//! Integration test: host session lifecycle
//!
//! Drives the App the way the terminal loop does: input, elapsed time and
//! draws, with settings persisted to a temp directory.

use flappy::app::{frame_interval, App};
use flappy::audio::{AudioContext, AudioEngine};
use flappy::constants::*;
use flappy::game::{Phase, Viewport};
use flappy::input::HostInput;
use flappy::render::Assets;
use flappy::settings::SettingsStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

fn app_at(path: &Path) -> App {
    let settings = SettingsStore::at(path);
    let audio = AudioEngine::with_context(
        AudioContext::offline(settings.settings().volume),
        settings.settings().audio_enabled,
        settings.settings().volume,
    );
    App::with_rng(
        settings,
        audio,
        Assets::none(),
        Viewport::new(960.0, 720.0),
        StdRng::seed_from_u64(99),
    )
}

/// Keep stepping until the bird falls into the ground.
fn crash(app: &mut App) {
    for _ in 0..600 {
        if app.game.phase == Phase::GameOver {
            return;
        }
        app.advance(frame_interval());
    }
    panic!("session never ended");
}

#[test]
fn test_full_session_persists_best_score() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut app = app_at(&path);
    assert_eq!(app.game.phase, Phase::Idle);

    app.handle_input(HostInput::Primary);
    assert_eq!(app.game.phase, Phase::Running);
    assert_eq!(app.game.pipes.len(), 1);

    app.game.score = 7;
    crash(&mut app);
    assert_eq!(app.game.best, 7);
    assert!(!app.audio.is_music_playing());

    // Best survives a restart of the program
    let reloaded = app_at(&path);
    assert_eq!(reloaded.game.best, 7);
    assert_eq!(reloaded.game.phase, Phase::Idle);
}

#[test]
fn test_restart_from_game_over() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_at(&dir.path().join("settings.json"));

    app.handle_input(HostInput::Start);
    app.game.score = 2;
    crash(&mut app);
    let best = app.game.best;

    app.handle_input(HostInput::Restart);
    assert!(app.game.is_running());
    assert_eq!(app.game.score, 0);
    assert_eq!(app.game.frames, 0);
    assert_eq!(app.game.best, best);
    assert!(app.game.particles.is_empty());
    assert!(app.audio.is_music_playing());
}

#[test]
fn test_flapping_keeps_bird_airborne() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_at(&dir.path().join("settings.json"));
    app.handle_input(HostInput::Primary);
    // Remove pipes from the equation
    app.game.pipes.clear();

    for frame in 0..300 {
        if frame % 20 == 0 {
            app.handle_input(HostInput::Primary);
        }
        app.advance(frame_interval());
        app.game.pipes.clear();
    }
    assert!(app.game.is_running());
    assert_eq!(app.game.frames, 300);
}

#[test]
fn test_preferences_written_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut app = app_at(&path);

    app.handle_input(HostInput::ToggleAudio);
    app.handle_input(HostInput::VolumeDown);
    app.handle_input(HostInput::DifficultyUp);
    app.handle_input(HostInput::DifficultyUp);

    let stored = SettingsStore::at(&path).settings().clone();
    assert!(!stored.audio_enabled);
    assert!((stored.volume - (DEFAULT_VOLUME - VOLUME_STEP)).abs() < 1e-6);
    assert_eq!(stored.difficulty, 3);

    let reloaded = app_at(&path);
    assert_eq!(reloaded.game.difficulty, 3);
    assert!(!reloaded.audio.is_enabled());
}

#[test]
fn test_muted_session_plays_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_at(&dir.path().join("settings.json"));
    app.handle_input(HostInput::ToggleAudio);

    app.handle_input(HostInput::Primary);
    crash(&mut app);

    let ctx = app.audio.context().unwrap();
    assert_eq!(ctx.mixer().scheduled_total(), 0);
}
