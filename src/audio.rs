//! Fire-and-forget sound cues.
//!
//! Sinks never report failure back to the simulation.

use crate::core::GameEvent;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Flap,
    Score,
    Crash,
}

impl Cue {
    pub fn from_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::Flapped => Cue::Flap,
            GameEvent::Scored { .. } => Cue::Score,
            GameEvent::Collided { .. } => Cue::Crash,
        }
    }
}

pub trait AudioSink {
    fn play(&mut self, cue: Cue);

    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;

    /// Flip sound on or off. Returns the state the sink ends up in.
    fn toggle(&mut self) -> bool {
        self.set_enabled(!self.is_enabled());
        self.is_enabled()
    }
}

/// Discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Muted;

impl AudioSink for Muted {
    fn play(&mut self, _cue: Cue) {}

    fn set_enabled(&mut self, _enabled: bool) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Rings the terminal bell on scores and crashes.
///
/// Flaps are too frequent for a bell and stay silent.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
    enabled: bool,
}

impl TerminalBell<std::io::Stdout> {
    pub fn stdout(enabled: bool) -> Self {
        Self::new(std::io::stdout(), enabled)
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self { out, enabled }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rings_for(cue: Cue) -> bool {
        matches!(cue, Cue::Score | Cue::Crash)
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: Cue) {
        if !self.enabled || !Self::rings_for(cue) {
            return;
        }
        if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            tracing::debug!(error = %e, ?cue, "bell failed");
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
