//! User settings and command-line overrides.

use super::persistence::{data_dir, load_json_or_default, save_json, PersistenceError};
use crate::core::config::Preset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";

/// Persistent user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub preset: Preset,
    pub sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: Preset::Arcade,
            sound: true,
        }
    }
}

impl Settings {
    pub fn path() -> Result<PathBuf, PersistenceError> {
        Ok(data_dir()?.join(SETTINGS_FILE))
    }

    /// Load from the data directory, falling back to defaults.
    pub fn load() -> Self {
        match Self::path() {
            Ok(path) => load_json_or_default(&path),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), PersistenceError> {
        save_json(&Self::path()?, self)
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(PlayOptions),
    Help,
    Version,
}

/// Per-run overrides layered over [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayOptions {
    pub preset: Option<Preset>,
    pub mute: bool,
    /// Keep the best score in memory only.
    pub ephemeral: bool,
}

impl PlayOptions {
    /// Settings with these overrides applied.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(preset) = self.preset {
            settings.preset = preset;
        }
        if self.mute {
            settings.sound = false;
        }
        settings
    }
}

pub const USAGE: &str = "\
Flappy - a terminal flappy bird

Usage: flappy [options]

Options:
  --preset <arcade|classic>  Physics tuning for this run
  --mute                     Start with sound off
  --ephemeral                Do not read or write the best score file
  --version, -v              Show version information
  --help, -h                 Show this help message";

/// Parse arguments (without the program name).
pub fn parse_args<I, S>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = PlayOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_ref() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-v" => return Ok(Command::Version),
            "--mute" => options.mute = true,
            "--ephemeral" => options.ephemeral = true,
            "--preset" => {
                let name = args
                    .next()
                    .ok_or_else(|| "--preset needs a value".to_string())?;
                let preset = Preset::from_name(name.as_ref())
                    .ok_or_else(|| format!("Unknown preset: {}", name.as_ref()))?;
                options.preset = Some(preset);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(Command::Play(options))
}
