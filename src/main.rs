use anyhow::Context;
use crossterm::event::{self, Event};
use flappy::audio::{AudioSink, TerminalBell};
use flappy::build_info;
use flappy::core::{FrameClock, GameConfig, Session};
use flappy::input::{apply_input, map_key, InputOutcome};
use flappy::ui::{self, flappy_scene::SceneView, terminal::TerminalGuard};
use flappy::utils::persistence::{
    data_dir, BestScoreStore, JsonBestScoreStore, MemoryBestScoreStore,
};
use flappy::utils::settings::{parse_args, Command, PlayOptions, Settings, USAGE};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Target frame time (~60 FPS).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const LOG_FILE: &str = "flappy.log";

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn main() -> anyhow::Result<()> {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Play(options)) => options,
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Ok(Command::Version) => {
            println!("{}", build_info::version_line());
            return Ok(());
        }
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'flappy --help' for usage.");
            std::process::exit(2);
        }
    };

    init_logging();

    let saved_settings = Settings::load();
    let settings = options.apply(saved_settings.clone());
    let config = settings.preset.config();
    config
        .validate()
        .with_context(|| format!("preset {} is not playable", settings.preset.name()))?;

    info!(
        version = %build_info::version_line(),
        preset = settings.preset.name(),
        sound = settings.sound,
        "starting"
    );

    let audio = TerminalBell::stdout(settings.sound);
    let sound = if options.ephemeral {
        play(config, MemoryBestScoreStore::default(), audio, &settings, true)?
    } else {
        match JsonBestScoreStore::new() {
            Ok(store) => play(config, store, audio, &settings, false)?,
            Err(e) => {
                warn!(error = %e, "no best score file, playing without one");
                play(config, MemoryBestScoreStore::default(), audio, &settings, true)?
            }
        }
    };

    remember_sound(&options, saved_settings, sound);
    Ok(())
}

/// Log to a file in the data directory so output never lands on the game screen.
fn init_logging() {
    let Ok(dir) = data_dir() else {
        return;
    };
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    {
        Ok(file) => file,
        Err(_) => return,
    };

    let filter =
        EnvFilter::try_from_env("FLAPPY_LOG").unwrap_or_else(|_| EnvFilter::new("flappy=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Persist a sound toggle made during play, unless `--mute` forced it.
fn remember_sound(options: &PlayOptions, saved: Settings, sound: bool) {
    if options.mute || saved.sound == sound {
        return;
    }
    let updated = Settings { sound, ..saved };
    if let Err(e) = updated.save() {
        warn!(error = %e, "could not save settings");
    }
}

/// Set up the terminal, run the game, and always restore the terminal.
///
/// Returns whether sound was on when the player quit.
fn play<S: BestScoreStore>(
    config: GameConfig,
    store: S,
    audio: TerminalBell<Stdout>,
    settings: &Settings,
    memory_only: bool,
) -> anyhow::Result<bool> {
    let mut session = Session::new(config, store, audio);

    let guard = TerminalGuard::enter().context("failed to set up the terminal")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run_loop(&mut terminal, &mut session, settings, memory_only);

    drop(terminal);
    guard.restore().context("failed to restore the terminal")?;

    result?;
    info!(best = session.best_score(), "bye");
    Ok(session.audio().is_enabled())
}

fn run_loop<S: BestScoreStore>(
    terminal: &mut Tui,
    session: &mut Session<S, TerminalBell<Stdout>>,
    settings: &Settings,
    memory_only: bool,
) -> anyhow::Result<()> {
    let mut clock = FrameClock::new(session.game().config.max_dt);

    loop {
        let frame_start = Instant::now();
        let dt = clock.delta(frame_start);
        session.advance(dt);

        terminal.draw(|frame| {
            let view = SceneView {
                game: session.game(),
                best: session.best_score(),
                new_best: session.is_new_best(),
                preset: settings.preset,
                sound: session.audio().is_enabled(),
                memory_only: memory_only || session.persistence_degraded(),
            };
            ui::draw(frame, &view);
        })?;

        // Wait out the rest of the frame, then drain every pending key
        let timeout = FRAME_INTERVAL.saturating_sub(frame_start.elapsed());
        if !event::poll(timeout)? {
            continue;
        }
        loop {
            if let Event::Key(key) = event::read()? {
                match apply_input(session, map_key(key)) {
                    InputOutcome::Quit => return Ok(()),
                    InputOutcome::Started => clock.restart(Instant::now()),
                    InputOutcome::Continue => {}
                }
            }
            if !event::poll(Duration::ZERO)? {
                break;
            }
        }
    }
}
