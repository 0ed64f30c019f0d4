//! The simulation loop
//!
//! One `tick` advances the whole world by a wall-clock delta: intents first,
//! then character physics, horizon scroll and spawning, collision, scoring,
//! and the night cycle. Subsystems never self-schedule; the loop re-requests
//! the next advance and the host drives it.

use super::collision::check_for_collision;
use super::player::PlayerStatus;
use super::state::{Cue, GameEvent, GameState, Intent};
use crate::consts::MS_PER_FRAME;

/// Advance the simulation by `delta_ms` of real elapsed time.
///
/// Zero and negative deltas clamp to a zero-length step, and the first delta
/// after a resume is discarded. Returns the side effects the host should
/// dispatch to its audio/haptics/persistence adapters.
pub fn tick(state: &mut GameState, intents: &[Intent], delta_ms: f32) -> Vec<GameEvent> {
    state.update_pending = false;

    let mut events = Vec::new();

    let delta = delta_ms.max(0.0);

    for intent in intents {
        handle_intent(state, *intent, &mut events);
    }

    advance(state, delta, &mut events);

    events
}

/// Consume one abstract input intent
fn handle_intent(state: &mut GameState, intent: Intent, events: &mut Vec<GameEvent>) {
    match intent {
        Intent::JumpPressed => {
            if state.crashed {
                return;
            }
            if state.paused {
                state.player.reset(&mut state.rng);
                state.play();
            }
            if !state.playing {
                state.playing = true;
                state.schedule();
            }
            if !state.player.jumping && !state.player.ducking {
                state.player.start_jump(state.current_speed, &mut state.rng);
            }
        }

        Intent::JumpReleased => {
            if state.playing && !state.crashed {
                state.player.end_jump();
            } else if state.crashed {
                // Accidental-mash guard: the jump key only restarts once the
                // game-over screen has been up for a moment
                if state.gameover_timer >= state.config.gameover_clear_time {
                    restart(state, events);
                }
            } else if state.paused {
                state.player.reset(&mut state.rng);
                state.play();
            }
        }

        Intent::DuckPressed => {
            if state.playing && !state.crashed {
                if state.player.jumping {
                    state.player.set_speed_drop();
                } else if !state.player.ducking {
                    state.player.set_duck(true, &mut state.rng);
                }
            }
        }

        Intent::DuckReleased => {
            state.player.cancel_speed_drop();
            state.player.set_duck(false, &mut state.rng);
        }

        Intent::RestartRequested => {
            if state.crashed {
                restart(state, events);
            }
        }
    }
}

fn advance(state: &mut GameState, delta: f32, events: &mut Vec<GameEvent>) {
    // A restart or resume earlier in this tick invalidates the measured
    // delta; the world advances by a zero-length step instead
    let delta = if state.discard_next_delta {
        state.discard_next_delta = false;
        0.0
    } else {
        delta
    };

    if state.playing {
        if state.player.jumping {
            state.player.update_jump(delta, &mut state.rng);
        }

        state.running_time += delta;
        let has_obstacles = state.running_time > state.config.clear_time;

        // The first landing arms the walk-in intro
        if state.player.jump_count == 1 && !state.playing_intro && !state.activated {
            play_intro(state);
        }

        if state.playing_intro {
            state.intro_timer += delta;
            state
                .horizon
                .update(0.0, state.current_speed, has_obstacles, state.inverted, &mut state.rng);
            if state.intro_timer > state.config.player.intro_duration {
                start_game(state);
            }
        } else {
            let horizon_delta = if state.activated { delta } else { 0.0 };
            state.horizon.update(
                horizon_delta,
                state.current_speed,
                has_obstacles,
                state.inverted,
                &mut state.rng,
            );
        }

        let collision = has_obstacles
            && state
                .horizon
                .obstacles
                .first()
                .is_some_and(|obstacle| check_for_collision(obstacle, &state.player));

        if !collision {
            state.distance_ran += state.current_speed * delta / MS_PER_FRAME;

            // A zero-length step (clamped or discarded delta) moves nothing,
            // so it must not accelerate either
            if delta > 0.0 && state.current_speed < state.config.max_speed {
                state.current_speed += state.config.acceleration;
            }
        } else {
            game_over(state, events);
        }

        let raw_distance = state.distance_ran.ceil() as u32;
        if state.meter.update(delta, raw_distance) {
            events.push(GameEvent::Cue(Cue::Achievement));
        }

        update_invert_cycle(state, delta);
    } else if state.crashed {
        state.gameover_timer += delta;
    }

    // The idle blink keeps animating while the session waits for its first
    // input; everything else stays frozen
    if state.playing
        || (!state.activated && state.player.blink_count < state.config.max_blink_count)
    {
        state.player.update(delta, None, &mut state.rng);
        state.schedule();
    }
}

/// First input received: walk the character in from the left edge
fn play_intro(state: &mut GameState) {
    state.playing_intro = true;
    state.player.playing_intro = true;
    state.playing = true;
    state.activated = true;
    state.intro_timer = 0.0;
}

/// Intro finished; the run proper begins
fn start_game(state: &mut GameState) {
    state.running_time = 0.0;
    state.playing_intro = false;
    state.player.playing_intro = false;
    state.play_count += 1;
    log::info!("run {} started", state.play_count);
}

/// Night mode: trigger on each displayed-distance multiple, hold for the
/// fade duration, then flip back to day
fn update_invert_cycle(state: &mut GameState, delta: f32) {
    if state.invert_timer > state.config.invert_fade_duration {
        state.invert_timer = 0.0;
        state.invert_trigger = false;
        state.inverted = false;
    } else if state.invert_timer > 0.0 {
        state.invert_timer += delta;
    } else {
        let actual = state
            .meter
            .actual_distance(state.distance_ran.ceil() as u32);

        if actual > 0 {
            state.invert_trigger = actual % state.config.invert_distance == 0;

            if state.invert_trigger && state.invert_timer == 0.0 {
                state.invert_timer += delta;
                state.inverted = true;
            }
        }
    }
}

fn game_over(state: &mut GameState, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::Cue(Cue::Hit));
    events.push(GameEvent::Vibrate { ms: 200 });

    state.stop();
    state.crashed = true;
    state.gameover_timer = 0.0;
    state.meter.cancel_flash();

    state
        .player
        .update(100.0, Some(PlayerStatus::Crashed), &mut state.rng);

    let actual = state
        .meter
        .actual_distance(state.distance_ran.ceil() as u32);
    if actual > state.meter.high_score() {
        state.meter.set_high_score(actual);
        events.push(GameEvent::HighScore(actual));
        log::info!("new high score: {actual}");
    }
}

/// Tear the run down and start fresh; the high score survives
fn restart(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.play_count += 1;
    state.running_time = 0.0;
    state.playing = true;
    state.crashed = false;
    state.paused = false;
    state.distance_ran = 0.0;
    state.current_speed = state.config.speed;
    state.gameover_timer = 0.0;
    state.inverted = false;
    state.invert_timer = 0.0;
    state.invert_trigger = false;

    state.meter.reset();
    state.horizon.reset(&mut state.rng);
    state.player.reset(&mut state.rng);

    state.discard_next_delta = true;
    events.push(GameEvent::Cue(Cue::ButtonPress));
    log::info!("restart: play {}", state.play_count);
    state.schedule();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::obstacle::ObstacleKind;

    const DT: f32 = MS_PER_FRAME;

    /// Jump once and tick until the run is activated and underway
    fn start_run(state: &mut GameState) {
        tick(state, &[Intent::JumpPressed], DT);
        for _ in 0..400 {
            tick(state, &[], DT);
            if state.activated && !state.playing_intro {
                return;
            }
        }
        panic!("run never activated");
    }

    /// A config whose grace period never elapses, for obstacle-free runs
    fn no_obstacle_config() -> Config {
        Config {
            clear_time: f32::INFINITY,
            ..Config::default()
        }
    }

    #[test]
    fn test_waiting_state_only_blinks() {
        let mut state = GameState::new(1);
        let events = tick(&mut state, &[], DT);

        assert!(events.is_empty());
        assert!(!state.playing);
        assert_eq!(state.distance_ran, 0.0);
        assert_eq!(state.running_time, 0.0);
        // The attract loop keeps requesting frames until the blink budget runs out
        assert!(state.is_scheduled());
    }

    #[test]
    fn test_first_jump_starts_the_session() {
        let mut state = GameState::new(2);
        tick(&mut state, &[Intent::JumpPressed], DT);

        assert!(state.playing);
        assert!(state.player.jumping);
    }

    #[test]
    fn test_intro_walks_player_in() {
        let mut state = GameState::new(3);
        start_run(&mut state);

        assert!(state.activated);
        assert_eq!(state.play_count, 1);
        assert_eq!(state.player.x, state.config.player.start_x);
        // The run clock restarts when the intro hands over
        assert!(state.running_time < state.config.clear_time);
    }

    #[test]
    fn test_grace_period_gates_obstacles() {
        let mut state = GameState::new(4);
        start_run(&mut state);

        while state.running_time <= state.config.clear_time {
            assert!(state.horizon.obstacles.is_empty());
            tick(&mut state, &[], DT);
        }

        // Past the threshold the spawner takes over
        for _ in 0..10 {
            tick(&mut state, &[], DT);
        }
        assert!(!state.horizon.obstacles.is_empty());
    }

    #[test]
    fn test_speed_accelerates_to_cap() {
        let mut state = GameState::with_config(no_obstacle_config(), 5);
        start_run(&mut state);

        let start_speed = state.current_speed;
        for _ in 0..100 {
            tick(&mut state, &[], DT);
        }
        assert!(state.current_speed > start_speed);
        assert!(state.current_speed <= state.config.max_speed);
    }

    #[test]
    fn test_fixed_seed_reproduces_run() {
        let mut a = GameState::new(1234);
        let mut b = GameState::new(1234);
        start_run(&mut a);
        start_run(&mut b);

        let mut saw_obstacles = false;
        for _ in 0..2000 {
            let script = [Intent::JumpPressed, Intent::JumpReleased];
            tick(&mut a, &script, DT);
            tick(&mut b, &script, DT);

            let kinds_a: Vec<ObstacleKind> =
                a.horizon.obstacles.iter().map(|o| o.kind).collect();
            let kinds_b: Vec<ObstacleKind> =
                b.horizon.obstacles.iter().map(|o| o.kind).collect();
            assert_eq!(kinds_a, kinds_b);
            assert_eq!(a.distance_ran, b.distance_ran);
            assert_eq!(a.crashed, b.crashed);
            saw_obstacles |= !kinds_a.is_empty();

            if a.crashed {
                break;
            }
        }
        assert!(saw_obstacles);
        assert_eq!(a.current_speed, b.current_speed);
    }

    /// Tick until the spawner has produced at least one obstacle
    fn run_until_obstacles(state: &mut GameState) {
        while state.horizon.obstacles.is_empty() {
            tick(state, &[], DT);
        }
    }

    /// Drop the front obstacle onto the character and tick once
    fn crash_now(state: &mut GameState) -> Vec<GameEvent> {
        state.horizon.obstacles[0].x = state.player.x;
        state.horizon.obstacles[0].y = state.player.y;
        let events = tick(state, &[], DT);
        assert!(state.crashed);
        events
    }

    #[test]
    fn test_collision_crashes_and_freezes_world() {
        let mut state = GameState::new(6);
        start_run(&mut state);
        run_until_obstacles(&mut state);
        let events = crash_now(&mut state);

        assert!(state.crashed);
        assert!(!state.playing);
        assert!(events.contains(&GameEvent::Cue(Cue::Hit)));
        assert!(events.contains(&GameEvent::Vibrate { ms: 200 }));

        // The world stays frozen afterwards
        let distance = state.distance_ran;
        let speed = state.current_speed;
        let xs: Vec<f32> = state.horizon.obstacles.iter().map(|o| o.x).collect();
        tick(&mut state, &[], DT);
        assert_eq!(state.distance_ran, distance);
        assert_eq!(state.current_speed, speed);
        let xs_after: Vec<f32> = state.horizon.obstacles.iter().map(|o| o.x).collect();
        assert_eq!(xs, xs_after);
    }

    #[test]
    fn test_restart_resets_the_run() {
        let mut state = GameState::new(7);
        start_run(&mut state);
        run_until_obstacles(&mut state);
        crash_now(&mut state);

        let events = tick(&mut state, &[Intent::RestartRequested], DT);
        assert!(events.contains(&GameEvent::Cue(Cue::ButtonPress)));
        assert!(state.playing);
        assert!(!state.crashed);
        assert_eq!(state.distance_ran, 0.0);
        assert_eq!(state.current_speed, state.config.speed);
        assert!(state.horizon.obstacles.is_empty());
        assert!(!state.inverted);
    }

    #[test]
    fn test_jump_restart_needs_clear_window() {
        let mut state = GameState::new(8);
        start_run(&mut state);
        run_until_obstacles(&mut state);
        crash_now(&mut state);

        // Mashing jump right away is swallowed
        tick(&mut state, &[Intent::JumpReleased], DT);
        assert!(state.crashed);

        // After the clear window it restarts
        let clear_dt = state.config.gameover_clear_time + 1.0;
        tick(&mut state, &[], clear_dt);
        tick(&mut state, &[Intent::JumpReleased], DT);
        assert!(!state.crashed);
        assert!(state.playing);
    }

    #[test]
    fn test_high_score_only_improves() {
        let mut state = GameState::new(9);
        start_run(&mut state);
        run_until_obstacles(&mut state);
        state.distance_ran = 8000.0; // displays as 100
        crash_now(&mut state);
        assert_eq!(state.meter.high_score(), 100);

        tick(&mut state, &[Intent::RestartRequested], DT);
        start_run(&mut state);
        run_until_obstacles(&mut state);
        state.distance_ran = 800.0; // displays as 10
        crash_now(&mut state);

        assert_eq!(state.meter.high_score(), 100);
    }

    #[test]
    fn test_high_score_event_fires_on_new_best() {
        let mut state = GameState::new(10);
        start_run(&mut state);
        run_until_obstacles(&mut state);
        state.distance_ran = 8000.0;
        let events = crash_now(&mut state);

        assert!(events.contains(&GameEvent::HighScore(100)));
    }

    #[test]
    fn test_negative_delta_clamps_to_zero() {
        let mut state = GameState::with_config(no_obstacle_config(), 11);
        start_run(&mut state);
        let distance = state.distance_ran;

        tick(&mut state, &[], -250.0);
        assert_eq!(state.distance_ran, distance);
    }

    #[test]
    fn test_schedule_requests_coalesce() {
        let mut state = GameState::new(12);
        assert!(state.schedule());
        assert!(!state.schedule());
        assert!(state.is_scheduled());

        state.stop();
        assert!(!state.is_scheduled());
        // Stopping twice is safe
        state.stop();
        assert!(!state.is_scheduled());
    }

    #[test]
    fn test_resume_discards_stale_delta() {
        let mut state = GameState::with_config(no_obstacle_config(), 13);
        start_run(&mut state);

        state.set_visible(false);
        assert!(!state.playing);
        assert!(state.paused);

        state.set_visible(true);
        assert!(state.playing);

        // A tab hidden for a minute must not land as one huge step
        let distance = state.distance_ran;
        tick(&mut state, &[], 60_000.0);
        assert_eq!(state.distance_ran, distance);

        // The following tick advances normally
        tick(&mut state, &[], DT);
        assert!(state.distance_ran > distance);
    }

    #[test]
    fn test_duck_on_ground_and_speed_drop_in_air() {
        let mut state = GameState::with_config(no_obstacle_config(), 14);
        start_run(&mut state);

        tick(&mut state, &[Intent::DuckPressed], DT);
        assert!(state.player.ducking);
        tick(&mut state, &[Intent::DuckReleased], DT);
        assert!(!state.player.ducking);

        tick(&mut state, &[Intent::JumpPressed], DT);
        assert!(state.player.jumping);
        tick(&mut state, &[Intent::DuckPressed], DT);
        assert!(state.player.speed_drop);
        assert!(!state.player.ducking);
    }

    #[test]
    fn test_intents_ignored_while_crashed() {
        let mut state = GameState::new(15);
        start_run(&mut state);
        run_until_obstacles(&mut state);
        crash_now(&mut state);

        tick(&mut state, &[Intent::JumpPressed, Intent::DuckPressed], DT);
        assert!(state.crashed);
        assert!(!state.player.jumping);
        assert!(!state.player.ducking);
    }

    #[test]
    fn test_night_mode_cycles() {
        let mut state = GameState::with_config(no_obstacle_config(), 16);
        start_run(&mut state);

        // Park displayed distance so the next tick lands on an invert multiple
        state.distance_ran = 700.0 / 0.0125 - 10.0;
        tick(&mut state, &[], DT);
        assert!(state.inverted);

        // The fade window runs out and day returns
        for _ in 0..200 {
            tick(&mut state, &[], 100.0);
            if !state.inverted {
                break;
            }
        }
        assert!(!state.inverted);
    }
}
