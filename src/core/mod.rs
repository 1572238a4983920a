//! Host-independent simulation core.
//!
//! Owns the bird, pipes, score and speed of one session and advances them
//! once per frame. Rendering, input, audio and persistence live outside and
//! talk to the core through [`logic`] functions and [`GameEvent`]s.

pub mod clock;
pub mod collision;
pub mod config;
pub mod logic;
pub mod session;
pub mod types;

pub use clock::{sanitize_dt, FrameClock};
pub use collision::{circle_intersects_rect, Rect};
pub use config::{ConfigError, GameConfig, Preset};
pub use logic::{flap, pipe_collides, reset, return_to_menu, start, tick};
pub use session::Session;
pub use types::*;
