//! Flappy - terminal flappy bird.
//!
//! The simulation lives in [`core`] and knows nothing about terminals. The
//! rest of the crate hosts it: persistence, sound cues, key mapping and
//! rendering.

pub mod audio;
pub mod build_info;
pub mod core;
pub mod input;
pub mod ui;
pub mod utils;

pub use crate::core::{
    FlappyGame, FrameClock, GameConfig, GameEvent, Pipe, Preset, RunState, Session,
};
