//! Flappy game data structures.

use super::collision::Rect;
use super::config::GameConfig;
use rand::Rng;

/// Rotation is `velocity / ROTATION_DIVISOR` radians, clamped to this range.
pub const ROTATION_DIVISOR: f64 = 700.0;
pub const MIN_ROTATION: f64 = -0.6;
pub const MAX_ROTATION: f64 = 1.2;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Menu: nothing moves until the host starts a run.
    #[default]
    Idle,
    Running,
    /// Frozen on the final frame until restarted.
    GameOver,
}

/// What ended a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionCause {
    Ground,
    Pipe,
}

/// Discrete things that happened during a tick or input, for audio and UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Flapped,
    Scored { score: u32 },
    Collided { cause: CollisionCause },
}

/// The player. Only `y` moves; the world scrolls past a fixed `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    /// Positive is downward.
    pub velocity: f64,
    pub radius: f64,
    /// Cosmetic tilt in radians derived from velocity.
    pub rotation: f64,
}

impl Bird {
    /// Bird at rest in the vertical middle of the world.
    pub fn at_start(config: &GameConfig) -> Self {
        Self {
            x: config.bird_x,
            y: config.height / 2.0,
            velocity: 0.0,
            radius: config.bird_radius,
            rotation: 0.0,
        }
    }

    pub fn update_rotation(&mut self) {
        self.rotation = (self.velocity / ROTATION_DIVISOR).clamp(MIN_ROTATION, MAX_ROTATION);
    }
}

/// A pipe pair with one passable gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge.
    pub x: f64,
    /// Top of the gap; the upper pipe spans `[0, gap_start]`.
    pub gap_start: f64,
    /// Set once the trailing edge has crossed the bird.
    pub passed: bool,
}

/// One game session: bird, pipes, score and speed.
#[derive(Debug, Clone)]
pub struct FlappyGame {
    pub config: GameConfig,
    pub state: RunState,

    pub bird: Bird,
    /// Spawn order, which is also left-to-right order on screen.
    pub pipes: Vec<Pipe>,

    pub score: u32,
    /// Current scroll speed (px/s).
    pub speed: f64,
    /// Seconds since the last pipe spawn.
    pub spawn_timer: f64,

    /// Seconds simulated in the current run.
    pub elapsed: f64,
    /// Ticks processed in the current run.
    pub tick_count: u64,
}

impl FlappyGame {
    /// A new session waiting in [`RunState::Idle`].
    pub fn new(config: GameConfig) -> Self {
        Self {
            bird: Bird::at_start(&config),
            pipes: Vec::new(),
            score: 0,
            speed: config.base_speed,
            spawn_timer: 0.0,
            elapsed: 0.0,
            tick_count: 0,
            state: RunState::Idle,
            config,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_over(&self) -> bool {
        self.state == RunState::GameOver
    }

    /// Restore every per-run value to its starting point without touching `state`.
    pub(crate) fn clear_run(&mut self) {
        self.bird = Bird::at_start(&self.config);
        self.pipes.clear();
        self.score = 0;
        self.speed = self.config.base_speed;
        self.spawn_timer = 0.0;
        self.elapsed = 0.0;
        self.tick_count = 0;
    }

    /// Push a pipe just beyond the right edge with a random gap.
    pub fn spawn_pipe<R: Rng>(&mut self, rng: &mut R) {
        let (min_start, max_start) = self.config.gap_start_range();
        let gap_start = if max_start > min_start {
            rng.gen_range(min_start..=max_start)
        } else {
            min_start
        };

        self.pipes.push(Pipe {
            x: self.config.width + self.config.spawn_offset,
            gap_start,
            passed: false,
        });
    }

    /// Upper pipe segment: from the top of the world to the gap.
    pub fn upper_rect(&self, pipe: &Pipe) -> Rect {
        Rect::new(pipe.x, 0.0, self.config.pipe_width, pipe.gap_start)
    }

    /// Lower pipe segment: from the end of the gap to the bottom of the world.
    pub fn lower_rect(&self, pipe: &Pipe) -> Rect {
        let gap_end = pipe.gap_start + self.config.gap_height;
        Rect::new(
            pipe.x,
            gap_end,
            self.config.pipe_width,
            self.config.height - gap_end,
        )
    }
}
