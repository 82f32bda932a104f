use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use flappy::app::{frame_interval, viewport_for_cells, App};
use flappy::audio::AudioEngine;
use flappy::build_info;
use flappy::input::map_event;
use flappy::render::Assets;
use flappy::settings::{data_path, SettingsStore};
use flappy::{logging, ui};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

struct Options {
    assets: Option<PathBuf>,
    mute: bool,
}

const HELP: &str = "\
Flappy - terminal arcade game

Usage: flappy [options]

Options:
  --assets DIR  Load bg.png, bird.png, pipe.png, cloud.png from DIR
  --mute        Start with audio off (saved)
  --version     Show version information
  --help        Show this help message

Audio needs a build with `--features sound`; otherwise the
status bar reports no audio device.";

fn parse_args() -> Options {
    let mut options = Options {
        assets: None,
        mute: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("{}", HELP);
                std::process::exit(0);
            }
            "--mute" => options.mute = true,
            "--assets" => match args.next() {
                Some(dir) => options.assets = Some(PathBuf::from(dir)),
                None => {
                    eprintln!("--assets needs a directory");
                    std::process::exit(1);
                }
            },
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'flappy --help' for usage.");
                std::process::exit(1);
            }
        }
    }
    options
}

fn main() -> io::Result<()> {
    let options = parse_args();

    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }
    info!(
        commit = build_info::BUILD_COMMIT,
        date = build_info::BUILD_DATE,
        "flappy starting"
    );

    let mut settings = SettingsStore::open_default();
    if options.mute {
        if let Err(e) = settings.update(|s| s.audio_enabled = false) {
            warn!(error = %e, "failed to save settings");
        }
    }

    let assets_dir = options.assets.or_else(|| data_path("assets").ok());
    let assets = match &assets_dir {
        Some(dir) => Assets::load_dir(dir),
        None => Assets::none(),
    };

    let audio = AudioEngine::new(
        settings.settings().audio_enabled,
        settings.settings().volume,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let content = ui::overlay::game_layout(terminal.size()?).content;
    let viewport = viewport_for_cells(content.width, content.height);
    let mut app = App::new(settings, audio, assets, viewport);

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(best = app.game.best, "flappy exiting");
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let content = ui::overlay::game_layout(terminal.size()?).content;
        app.resize(viewport_for_cells(content.width, content.height));

        let now = Instant::now();
        app.advance(now.duration_since(last_frame));
        last_frame = now;
        app.poll_audio(now);

        terminal.draw(|f| ui::draw(f, app))?;

        // Drain input until the next frame is due
        let deadline = last_frame + frame_interval();
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            if let Some(input) = map_event(&event::read()?) {
                app.handle_input(input);
            }
            if app.should_quit() {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_mentions_sound_feature() {
        assert!(HELP.contains("--features sound"));
        assert!(HELP.contains("--assets DIR"));
    }
}
