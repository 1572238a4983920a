//! Integration test: simulation loop
//!
//! Drives the core through full runs: physics scenarios, pipe lifecycle,
//! scoring, and the invariants that must hold for any input sequence.

use flappy::core::collision::circle_intersects_rect;
use flappy::core::{
    flap, pipe_collides, reset, start, tick, CollisionCause, FlappyGame, GameConfig, GameEvent,
    Pipe, Preset, RunState,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FRAME: f64 = 1.0 / 60.0;

fn running(config: GameConfig) -> FlappyGame {
    let mut game = FlappyGame::new(config);
    start(&mut game);
    game
}

/// Flap whenever the bird sinks below the middle of the gap ahead (or the
/// middle of the screen when no pipe is ahead).
fn autopilot(game: &mut FlappyGame) {
    let target = game
        .pipes
        .iter()
        .find(|p| p.x + game.config.pipe_width >= game.bird.x - game.bird.radius)
        .map(|p| p.gap_start + game.config.gap_height * 0.5)
        .unwrap_or(game.config.height * 0.5);
    if game.bird.y > target + 10.0 && game.bird.velocity > 0.0 {
        flap(game);
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_gravity_scenario() {
    let mut game = running(GameConfig::arcade());
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!((game.bird.y - 270.0).abs() < f64::EPSILON);

    tick(&mut game, FRAME, &mut rng);

    assert!((game.bird.velocity - 14.17).abs() < 0.01);
    assert!((game.bird.y - 270.24).abs() < 0.01);
}

#[test]
fn test_gap_scenario() {
    let mut game = running(GameConfig::arcade());
    let pipe = Pipe {
        x: 120.0,
        gap_start: 200.0,
        passed: false,
    };
    let lower = game.lower_rect(&pipe);
    assert!((lower.y - 360.0).abs() < f64::EPSILON);
    assert!((lower.bottom() - 540.0).abs() < f64::EPSILON);

    // Inside the pipe's x-range and inside the lower span: hit
    game.bird.y = 450.0;
    assert!(pipe_collides(&game, &pipe));

    // Same height, but the pipe is far to the right: no hit
    let distant = Pipe { x: 400.0, ..pipe };
    assert!(!pipe_collides(&game, &distant));

    // Inside the x-range but in the middle of the gap: no hit
    game.bird.y = 280.0;
    assert!(!pipe_collides(&game, &pipe));
}

#[test]
fn test_passing_scenario() {
    let mut game = running(GameConfig::arcade());
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    game.pipes.push(Pipe {
        x: 90.0,
        gap_start: 190.0,
        passed: false,
    });
    // One tick moves the pipe from x=90 to x=70
    game.speed = 20.0 / FRAME;

    let events = tick(&mut game, FRAME, &mut rng);
    assert!((game.pipes[0].x - 70.0).abs() < 1e-9);
    assert!(game.pipes[0].passed);
    assert_eq!(events, vec![GameEvent::Scored { score: 1 }]);

    game.speed = 180.0;
    for _ in 0..5 {
        game.bird.y = 270.0;
        game.bird.velocity = 0.0;
        tick(&mut game, FRAME, &mut rng);
    }
    assert_eq!(game.score, 1);
}

#[test]
fn test_ground_scenario() {
    let mut game = running(GameConfig::arcade());
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    game.bird.y = 539.0;

    let events = tick(&mut game, FRAME, &mut rng);
    assert_eq!(
        events,
        vec![GameEvent::Collided {
            cause: CollisionCause::Ground
        }]
    );
    assert_eq!(game.state, RunState::GameOver);

    let snapshot = (game.bird.clone(), game.pipes.clone(), game.score, game.speed);
    assert!(tick(&mut game, FRAME, &mut rng).is_empty());
    assert!(flap(&mut game).is_none());
    assert_eq!(
        snapshot,
        (game.bird.clone(), game.pipes.clone(), game.score, game.speed)
    );

    reset(&mut game);
    assert_eq!(game.state, RunState::Running);
}

// =============================================================================
// Full runs
// =============================================================================

#[test]
fn test_unattended_bird_hits_ground() {
    for preset in Preset::ALL {
        let mut game = running(preset.config());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut ground_hits = 0;
        for _ in 0..1000 {
            for event in tick(&mut game, FRAME, &mut rng) {
                if event == (GameEvent::Collided {
                    cause: CollisionCause::Ground,
                }) {
                    ground_hits += 1;
                }
            }
        }
        assert_eq!(ground_hits, 1, "{}", preset.name());
        assert!(game.is_over());
    }
}

#[test]
fn test_autopilot_scores_and_pipes_are_recycled() {
    // A gap wide enough that every pipe opens at 120..420, around the
    // band the autopilot holds the bird in
    let config = GameConfig {
        gap_height: 300.0,
        gap_margin: 120.0,
        ..GameConfig::arcade()
    };
    let mut game = running(config);
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut max_live = 0;

    // Ten seconds of play
    for _ in 0..600 {
        autopilot(&mut game);
        tick(&mut game, FRAME, &mut rng);
        max_live = max_live.max(game.pipes.len());
    }

    assert!(!game.is_over());
    // First pipe is passed after ~5.2s, then one every ~1.4s
    assert!(game.score >= 3, "scored {}", game.score);
    // 720px at ~180px/s with a spawn every 1.4s keeps only a handful alive
    assert!(max_live <= 6, "{} live pipes", max_live);
    for pair in game.pipes.windows(2) {
        assert!(pair[0].x < pair[1].x, "pipes out of spawn order");
    }
}

#[test]
fn test_instances_are_independent() {
    let mut a = running(GameConfig::arcade());
    let mut b = running(GameConfig::arcade());
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    flap(&mut a);
    tick(&mut a, FRAME, &mut rng);

    assert!(a.bird.y < b.bird.y);
    tick(&mut b, FRAME, &mut rng);
    assert!(b.bird.velocity > 0.0);
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Debug, Clone)]
enum Step {
    Tick(f64),
    Flap,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0.0f64..0.05).prop_map(Step::Tick),
        1 => Just(Step::Flap),
        1 => prop_oneof![
            Just(f64::NAN),
            Just(-1.0),
            Just(f64::INFINITY),
            Just(10.0)
        ]
        .prop_map(Step::Tick),
    ]
}

proptest! {
    #[test]
    fn prop_score_never_decreases(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..400),
    ) {
        let mut game = running(GameConfig::arcade());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut last_score = 0;
        let mut game_overs = 0;

        for step in steps {
            let events = match step {
                Step::Tick(dt) => tick(&mut game, dt, &mut rng),
                Step::Flap => flap(&mut game).into_iter().collect(),
            };
            prop_assert!(game.score >= last_score);
            last_score = game.score;
            let collisions = events
                .iter()
                .filter(|e| matches!(e, GameEvent::Collided { .. }))
                .count();
            prop_assert!(collisions <= 1);
            game_overs += collisions;
            prop_assert!(game.bird.y.is_finite());
            prop_assert!(game.bird.y - game.bird.radius >= 0.0);
            prop_assert!(game.bird.y + game.bird.radius <= game.config.ground_y() + 1e-9);
        }
        prop_assert!(game_overs <= 1);
    }

    #[test]
    fn prop_zero_tick_is_idempotent(
        seed in any::<u64>(),
        warmup in 0usize..120,
        repeats in 1usize..20,
    ) {
        let mut game = running(GameConfig::arcade());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..warmup {
            autopilot(&mut game);
            tick(&mut game, FRAME, &mut rng);
        }

        let bird_y = game.bird.y;
        let xs: Vec<f64> = game.pipes.iter().map(|p| p.x).collect();
        let score = game.score;
        for _ in 0..repeats {
            tick(&mut game, 0.0, &mut rng);
        }
        prop_assert_eq!(game.bird.y, bird_y);
        prop_assert_eq!(game.pipes.iter().map(|p| p.x).collect::<Vec<_>>(), xs);
        prop_assert_eq!(game.score, score);
    }

    #[test]
    fn prop_collision_order_independent(
        bird_x in 0.0f64..720.0,
        bird_y in 0.0f64..540.0,
        pipe_x in -100.0f64..800.0,
        gap_start in 80.0f64..300.0,
    ) {
        let mut game = running(GameConfig::arcade());
        game.bird.x = bird_x;
        game.bird.y = bird_y;
        let pipe = Pipe { x: pipe_x, gap_start, passed: false };
        let bird = &game.bird;
        let upper = game.upper_rect(&pipe);
        let lower = game.lower_rect(&pipe);

        let top_first = circle_intersects_rect(bird.x, bird.y, bird.radius, &upper)
            || circle_intersects_rect(bird.x, bird.y, bird.radius, &lower);
        let bottom_first = circle_intersects_rect(bird.x, bird.y, bird.radius, &lower)
            || circle_intersects_rect(bird.x, bird.y, bird.radius, &upper);

        prop_assert_eq!(top_first, bottom_first);
        prop_assert_eq!(pipe_collides(&game, &pipe), top_first);
    }
}
