//! Per-frame simulation: gravity, pipe lifecycle, scoring and collisions.

use super::clock::sanitize_dt;
use super::collision::circle_intersects_rect;
use super::types::{CollisionCause, FlappyGame, GameEvent, Pipe, RunState};
use rand::Rng;
use tracing::{debug, info};

/// Begin a fresh run from any state.
pub fn start(game: &mut FlappyGame) {
    reset(game);
}

/// Reinitialise bird, pipes, score, timer and speed, then run.
pub fn reset(game: &mut FlappyGame) {
    game.clear_run();
    game.state = RunState::Running;
    info!(
        width = game.config.width,
        height = game.config.height,
        "run started"
    );
}

/// Abandon the current run and go back to the menu.
pub fn return_to_menu(game: &mut FlappyGame) {
    game.clear_run();
    game.state = RunState::Idle;
}

/// Upward impulse. Ignored unless a run is in progress.
pub fn flap(game: &mut FlappyGame) -> Option<GameEvent> {
    if !game.is_running() {
        return None;
    }
    game.bird.velocity = game.config.flap_impulse;
    Some(GameEvent::Flapped)
}

/// Advance the simulation by `dt` seconds.
///
/// `dt` is sanitised against the configured maximum first. Returns the
/// events produced, in order. Once the run is over nothing changes until
/// [`reset`] or [`start`].
pub fn tick<R: Rng>(game: &mut FlappyGame, dt: f64, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !game.is_running() {
        return events;
    }

    let dt = sanitize_dt(dt, game.config.max_dt);
    game.tick_count += 1;
    game.elapsed += dt;

    // 1. Gravity
    let bird = &mut game.bird;
    bird.velocity += game.config.gravity * dt;
    bird.y += bird.velocity * dt;
    bird.update_rotation();

    // 2. Vertical bounds: the ground kills, the ceiling only stops
    let ground_y = game.config.ground_y();
    if bird.y + bird.radius > ground_y {
        bird.y = ground_y - bird.radius;
        game_over(game, CollisionCause::Ground, &mut events);
        return events;
    }
    if bird.y - bird.radius < 0.0 {
        bird.y = bird.radius;
        bird.velocity = 0.0;
    }

    // 3. Spawn cadence
    game.spawn_timer += dt;
    if game.spawn_timer > game.config.spawn_interval {
        game.spawn_timer = 0.0;
        game.spawn_pipe(rng);
        debug!(
            gap_start = ?game.pipes.last().map(|p| p.gap_start),
            live = game.pipes.len(),
            "pipe spawned"
        );
    }

    // 4. Scroll, score and collide
    let step = game.speed * dt;
    let mut hit = false;
    for i in 0..game.pipes.len() {
        game.pipes[i].x -= step;

        let trailing_edge = game.pipes[i].x + game.config.pipe_width;
        if !game.pipes[i].passed && trailing_edge < game.bird.x {
            game.pipes[i].passed = true;
            game.score += 1;
            events.push(GameEvent::Scored { score: game.score });
        }

        if pipe_collides(game, &game.pipes[i]) {
            hit = true;
            break;
        }
    }
    if hit {
        game_over(game, CollisionCause::Pipe, &mut events);
        return events;
    }

    // 5. Despawn
    let despawn_x = -game.config.despawn_margin;
    let pipe_width = game.config.pipe_width;
    game.pipes.retain(|p| p.x + pipe_width >= despawn_x);

    // 6. Difficulty ramp
    game.speed += game.config.speed_ramp * dt;

    events
}

/// True if the bird overlaps either segment of `pipe`.
pub fn pipe_collides(game: &FlappyGame, pipe: &Pipe) -> bool {
    let bird = &game.bird;
    circle_intersects_rect(bird.x, bird.y, bird.radius, &game.upper_rect(pipe))
        || circle_intersects_rect(bird.x, bird.y, bird.radius, &game.lower_rect(pipe))
}

fn game_over(game: &mut FlappyGame, cause: CollisionCause, events: &mut Vec<GameEvent>) {
    game.state = RunState::GameOver;
    events.push(GameEvent::Collided { cause });
    info!(
        score = game.score,
        ?cause,
        elapsed = game.elapsed,
        "run ended"
    );
}
