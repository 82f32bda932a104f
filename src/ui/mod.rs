//! Terminal presentation: the rasterized world plus ratatui chrome on top.

pub mod hud;
pub mod overlay;

use crate::app::App;
use crate::game::Phase;
use crate::render::{render_world, Raster};
use overlay::{
    game_layout, render_frame, render_game_over, render_info_panel, render_start_overlay,
    render_status_bar, AudioStatus, InfoPanel,
};
use ratatui::{layout::Rect, style::Color, Frame};

const PLAY_CONTROLS: &[(&str, &str)] = &[
    ("[Space]", "Flap"),
    ("[M]", "Audio"),
    ("[+/-]", "Volume"),
    ("[Q]", "Quit"),
];

const MENU_CONTROLS: &[(&str, &str)] = &[
    ("[Space/S]", "Start"),
    ("[[/]]", "Difficulty"),
    ("[M]", "Audio"),
    ("[+/-]", "Volume"),
    ("[Q]", "Quit"),
];

/// Draw one frame. Scrolls the cloud layer as a side effect.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.size();
    render_frame(frame, area);
    let layout = game_layout(area);

    render_play_area(frame, layout.content, app);
    render_status(frame, layout.status_bar, app);
    render_info_panel(frame, layout.info_panel, &info_for(app));
}

fn render_play_area(frame: &mut Frame, area: Rect, app: &mut App) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let viewport = app.game.viewport;
    let mut raster = Raster::for_area(area, viewport.width, viewport.height);
    render_world(&mut raster, &app.game, &mut app.sky, &app.assets);
    raster.blit(area, frame.buffer_mut());

    hud::render_bubbles(frame, area, viewport, &app.bubbles);
    hud::render_score(frame, area, app.game.score);

    match app.game.phase {
        Phase::Idle => render_start_overlay(frame, area, app.game.best),
        Phase::GameOver => render_game_over(
            frame,
            area,
            app.game.score,
            app.game.best,
            app.last_new_best,
        ),
        Phase::Running => {}
    }
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    match app.game.phase {
        Phase::Running => render_status_bar(
            frame,
            area,
            &format!("Score: {}", app.game.score),
            Color::Green,
            PLAY_CONTROLS,
        ),
        Phase::Idle => render_status_bar(
            frame,
            area,
            "Press Space to start!",
            Color::Yellow,
            MENU_CONTROLS,
        ),
        Phase::GameOver => render_status_bar(
            frame,
            area,
            &format!("Crashed with {} points", app.game.score),
            Color::Red,
            MENU_CONTROLS,
        ),
    }
}

fn info_for(app: &App) -> InfoPanel {
    let audio = if !app.audio.is_available() {
        AudioStatus::Unavailable
    } else if app.audio.is_enabled() {
        AudioStatus::On
    } else {
        AudioStatus::Muted
    };
    InfoPanel {
        best: app.game.best,
        difficulty: app.game.difficulty,
        config: app.game.config(),
        audio,
        volume: app.audio.volume(),
        assets_loaded: app.assets.loaded_count(),
    }
}
