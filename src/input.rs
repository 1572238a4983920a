//! Key mapping and input dispatch for the terminal host.

use crate::audio::AudioSink;
use crate::core::{RunState, Session};
use crate::utils::persistence::BestScoreStore;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// UI-agnostic input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlappyInput {
    /// Flap (Space, Up, k or w).
    Flap,
    /// Start or restart a run (Enter or r).
    Start,
    /// Sound on/off (m).
    ToggleSound,
    /// Leave the game-over screen, or quit from the menu (Esc).
    Back,
    /// Quit (q or Ctrl-C).
    Quit,
    /// Any other key.
    Other,
}

/// What the host loop should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Continue,
    /// A run (re)started; the frame clock should be re-anchored.
    Started,
    Quit,
}

pub fn map_key(key: KeyEvent) -> FlappyInput {
    // Ignore key-release events on terminals that report them
    if key.kind == KeyEventKind::Release {
        return FlappyInput::Other;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return FlappyInput::Quit;
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => {
            FlappyInput::Flap
        }
        KeyCode::Enter | KeyCode::Char('r') => FlappyInput::Start,
        KeyCode::Char('m') => FlappyInput::ToggleSound,
        KeyCode::Esc => FlappyInput::Back,
        KeyCode::Char('q') => FlappyInput::Quit,
        _ => FlappyInput::Other,
    }
}

/// Apply one input to the session.
///
/// Flap only acts while a run is in progress; starting and restarting are
/// explicit and only happen from the menu or the game-over screen.
pub fn apply_input<S: BestScoreStore, A: AudioSink>(
    session: &mut Session<S, A>,
    input: FlappyInput,
) -> InputOutcome {
    let state = session.game().state;
    match input {
        FlappyInput::Flap => {
            session.flap();
            InputOutcome::Continue
        }
        FlappyInput::Start => match state {
            RunState::Idle | RunState::GameOver => {
                session.start();
                InputOutcome::Started
            }
            RunState::Running => InputOutcome::Continue,
        },
        FlappyInput::ToggleSound => {
            let enabled = session.audio_mut().toggle();
            tracing::debug!(enabled, "sound toggled");
            InputOutcome::Continue
        }
        FlappyInput::Back => match state {
            RunState::Idle => InputOutcome::Quit,
            RunState::GameOver => {
                session.return_to_menu();
                InputOutcome::Continue
            }
            RunState::Running => InputOutcome::Continue,
        },
        FlappyInput::Quit => InputOutcome::Quit,
        FlappyInput::Other => InputOutcome::Continue,
    }
}
