//! A game session wired to its best-score store and audio sink.
//!
//! The host drives a [`Session`] once per frame with [`Session::advance`] and
//! forwards player input between frames. Storage and audio failures never
//! reach the simulation.

use super::config::GameConfig;
use super::logic;
use super::types::{FlappyGame, GameEvent};
use crate::audio::{AudioSink, Cue};
use crate::utils::persistence::BestScoreStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

pub struct Session<S: BestScoreStore, A: AudioSink> {
    game: FlappyGame,
    store: S,
    audio: A,
    rng: StdRng,
    best: u32,
    new_best: bool,
    /// Set after the first storage failure; the best score is then memory-only.
    degraded: bool,
}

impl<S: BestScoreStore, A: AudioSink> Session<S, A> {
    pub fn new(config: GameConfig, store: S, audio: A) -> Self {
        Self::with_rng(config, store, audio, StdRng::from_entropy())
    }

    /// Deterministic pipe placement, for tests.
    pub fn with_seed(config: GameConfig, store: S, audio: A, seed: u64) -> Self {
        Self::with_rng(config, store, audio, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut store: S, audio: A, rng: StdRng) -> Self {
        let (best, degraded) = match store.load() {
            Ok(best) => (best, false),
            Err(e) => {
                warn!(error = %e, "best score unavailable, keeping it in memory");
                (0, true)
            }
        };
        info!(best, "session ready");

        Self {
            game: FlappyGame::new(config),
            store,
            audio,
            rng,
            best,
            new_best: false,
            degraded,
        }
    }

    pub fn game(&self) -> &FlappyGame {
        &self.game
    }

    pub fn best_score(&self) -> u32 {
        self.best
    }

    /// True if the last finished run set a new best.
    pub fn is_new_best(&self) -> bool {
        self.new_best
    }

    pub fn persistence_degraded(&self) -> bool {
        self.degraded
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start (or restart) a run.
    pub fn start(&mut self) {
        self.new_best = false;
        logic::start(&mut self.game);
    }

    pub fn return_to_menu(&mut self) {
        self.new_best = false;
        logic::return_to_menu(&mut self.game);
    }

    pub fn flap(&mut self) -> Option<GameEvent> {
        let event = logic::flap(&mut self.game)?;
        self.audio.play(Cue::from_event(&event));
        Some(event)
    }

    /// Advance one frame and dispatch the resulting events.
    pub fn advance(&mut self, dt: f64) -> Vec<GameEvent> {
        let events = logic::tick(&mut self.game, dt, &mut self.rng);
        for event in &events {
            self.audio.play(Cue::from_event(event));
            if let GameEvent::Collided { .. } = event {
                self.record_game_over();
            }
        }
        events
    }

    fn record_game_over(&mut self) {
        let score = self.game.score;
        if score <= self.best {
            return;
        }
        self.best = score;
        self.new_best = true;
        info!(best = score, "new best score");

        if self.degraded {
            return;
        }
        if let Err(e) = self.store.save(score) {
            warn!(error = %e, "could not save best score, keeping it in memory");
            self.degraded = true;
        }
    }
}
