//! Physics and layout tuning for a game session.
//!
//! All distances are world pixels, all times are seconds. The world origin is
//! the top-left corner with y growing downward.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a [`GameConfig`] cannot host a playable game.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("flap impulse must point upward (negative), got {0}")]
    FlapNotUpward(f64),

    #[error("speed ramp must not be negative, got {0}")]
    NegativeRamp(f64),

    #[error("gap of {gap_height} with margin {gap_margin} does not fit a {height}-tall world")]
    GapDoesNotFit {
        gap_height: f64,
        gap_margin: f64,
        height: f64,
    },

    #[error("bird of radius {radius} does not fit between ceiling and ground")]
    BirdDoesNotFit { radius: f64 },
}

/// Named tunings, one per variant of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Fixed 720x540 stage with a ground strip and a slow speed ramp.
    #[default]
    Arcade,
    /// Tall stage without ground strip, faster fall, constant speed.
    Classic,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Arcade, Preset::Classic];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Arcade => "Arcade",
            Self::Classic => "Classic",
        }
    }

    /// Case-insensitive lookup used by the `--preset` flag.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn config(&self) -> GameConfig {
        match self {
            Self::Arcade => GameConfig::arcade(),
            Self::Classic => GameConfig::classic(),
        }
    }
}

/// Every constant the simulation reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// World width.
    pub width: f64,
    /// World height, including the ground strip.
    pub height: f64,
    /// Height of the fatal ground strip at the bottom (0 = the screen edge).
    pub ground_height: f64,

    /// Fixed horizontal position of the bird's centre.
    pub bird_x: f64,
    /// Collision radius of the bird.
    pub bird_radius: f64,
    /// Downward acceleration (px/s²).
    pub gravity: f64,
    /// Velocity set by a flap (px/s, negative = upward).
    pub flap_impulse: f64,

    pub pipe_width: f64,
    /// Vertical size of the passable gap.
    pub gap_height: f64,
    /// Minimum distance between the gap and the top/bottom of the world.
    pub gap_margin: f64,
    /// Seconds between pipe spawns.
    pub spawn_interval: f64,
    /// How far past the right edge new pipes appear.
    pub spawn_offset: f64,
    /// How far past the left edge a pipe's trailing edge travels before removal.
    pub despawn_margin: f64,

    /// Scroll speed at the start of a run (px/s).
    pub base_speed: f64,
    /// Scroll speed gained per second of play (px/s²).
    pub speed_ramp: f64,

    /// Upper bound on a single tick's delta time.
    pub max_dt: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::arcade()
    }
}

impl GameConfig {
    pub fn arcade() -> Self {
        Self {
            width: 720.0,
            height: 540.0,
            ground_height: 40.0,
            bird_x: 160.0,
            bird_radius: 18.0,
            gravity: 850.0,
            flap_impulse: -290.0,
            pipe_width: 80.0,
            gap_height: 160.0,
            gap_margin: 80.0,
            spawn_interval: 1.4,
            spawn_offset: 50.0,
            despawn_margin: 50.0,
            base_speed: 180.0,
            speed_ramp: 0.5,
            max_dt: 0.040,
        }
    }

    /// Frame-stepped tuning (0.5 px/frame², -8.5 px/frame, 2.2 px/frame)
    /// expressed per second at 60 frames per second.
    pub fn classic() -> Self {
        Self {
            width: 480.0,
            height: 640.0,
            ground_height: 0.0,
            bird_x: 80.0,
            bird_radius: 14.0,
            gravity: 1800.0,
            flap_impulse: -510.0,
            pipe_width: 60.0,
            gap_height: 140.0,
            gap_margin: 60.0,
            spawn_interval: 1.5,
            spawn_offset: 20.0,
            despawn_margin: 20.0,
            base_speed: 132.0,
            speed_ramp: 0.0,
            max_dt: 0.040,
        }
    }

    /// Y coordinate of the top of the ground strip.
    pub fn ground_y(&self) -> f64 {
        self.height - self.ground_height
    }

    /// Inclusive range of valid `gap_start` values for a new pipe.
    pub fn gap_start_range(&self) -> (f64, f64) {
        (
            self.gap_margin,
            self.height - self.gap_height - self.gap_margin,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("ground_height", self.ground_height),
            ("bird_x", self.bird_x),
            ("bird_radius", self.bird_radius),
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
            ("pipe_width", self.pipe_width),
            ("gap_height", self.gap_height),
            ("gap_margin", self.gap_margin),
            ("spawn_interval", self.spawn_interval),
            ("spawn_offset", self.spawn_offset),
            ("despawn_margin", self.despawn_margin),
            ("base_speed", self.base_speed),
            ("speed_ramp", self.speed_ramp),
            ("max_dt", self.max_dt),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite { field });
        }

        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("bird_radius", self.bird_radius),
            ("pipe_width", self.pipe_width),
            ("gap_height", self.gap_height),
            ("spawn_interval", self.spawn_interval),
            ("base_speed", self.base_speed),
            ("max_dt", self.max_dt),
        ];
        if let Some(&(field, value)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(ConfigError::NotPositive { field, value });
        }

        if self.flap_impulse >= 0.0 {
            return Err(ConfigError::FlapNotUpward(self.flap_impulse));
        }
        if self.speed_ramp < 0.0 {
            return Err(ConfigError::NegativeRamp(self.speed_ramp));
        }

        let (min_gap, max_gap) = self.gap_start_range();
        if self.gap_margin < 0.0 || max_gap < min_gap {
            return Err(ConfigError::GapDoesNotFit {
                gap_height: self.gap_height,
                gap_margin: self.gap_margin,
                height: self.height,
            });
        }

        if self.ground_height < 0.0 || self.bird_radius * 2.0 >= self.ground_y() {
            return Err(ConfigError::BirdDoesNotFit {
                radius: self.bird_radius,
            });
        }

        Ok(())
    }
}
