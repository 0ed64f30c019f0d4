//! Root simulation state and the core's external vocabulary
//!
//! `GameState` owns every subsystem and is mutated only by the tick loop's
//! single call chain. There is no hidden global: the host constructs exactly
//! one state per session and passes it around explicitly.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::horizon::Horizon;
use super::player::{Player, PlayerStatus};
use super::score::ScoreMeter;
use crate::config::Config;

/// Abstract input intents, mapped from devices by the host's input adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    JumpPressed,
    JumpReleased,
    DuckPressed,
    DuckReleased,
    RestartRequested,
}

/// Fire-and-forget sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Hit,
    Achievement,
    ButtonPress,
}

/// Side effects a tick requests from the host's adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Cue(Cue),
    Vibrate { ms: u32 },
    /// A new best run, in displayed-distance units; the host persists it
    HighScore(u32),
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: Config,
    /// Run seed; the same seed and intent script replay identically
    pub seed: u64,
    pub(crate) rng: Pcg32,

    pub current_speed: f32,
    /// Raw accumulated distance in simulation units
    pub distance_ran: f32,
    /// Time spent in the running state since the last (re)start (ms)
    pub running_time: f32,

    /// First input has been received and the intro completed or started
    pub activated: bool,
    pub playing: bool,
    pub crashed: bool,
    pub paused: bool,

    /// Night mode
    pub inverted: bool,
    pub(crate) invert_timer: f32,
    pub(crate) invert_trigger: bool,

    pub playing_intro: bool,
    pub(crate) intro_timer: f32,
    /// Time since the crash, gating accidental jump-key restarts (ms)
    pub(crate) gameover_timer: f32,
    pub play_count: u32,

    pub(crate) update_pending: bool,
    pub(crate) discard_next_delta: bool,

    pub player: Player,
    pub horizon: Horizon,
    pub meter: ScoreMeter,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_config(Config::default(), seed)
    }

    pub fn with_config(config: Config, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::new(config.player, config.bottom_pad, &mut rng);
        let horizon = Horizon::new(&config, &mut rng);
        let meter = ScoreMeter::new(config.meter);

        Self {
            current_speed: config.speed,
            config,
            seed,
            rng,
            distance_ran: 0.0,
            running_time: 0.0,
            activated: false,
            playing: false,
            crashed: false,
            paused: false,
            inverted: false,
            invert_timer: 0.0,
            invert_trigger: false,
            playing_intro: false,
            intro_timer: 0.0,
            gameover_timer: 0.0,
            play_count: 0,
            update_pending: false,
            discard_next_delta: false,
            player,
            horizon,
            meter,
        }
    }

    /// Request the next tick. Coalesced: while one advance is already
    /// pending, further requests are no-ops and return false.
    pub fn schedule(&mut self) -> bool {
        if self.update_pending {
            false
        } else {
            self.update_pending = true;
            true
        }
    }

    /// Whether an advance is pending with the host
    pub fn is_scheduled(&self) -> bool {
        self.update_pending
    }

    /// Halt the loop and cancel any pending advance. Safe to call twice.
    pub fn stop(&mut self) {
        self.playing = false;
        self.paused = true;
        self.update_pending = false;
    }

    /// Resume from a pause. The first delta after a resume is discarded so a
    /// long suspension never lands as one giant simulation step.
    pub fn play(&mut self) {
        if !self.crashed {
            self.playing = true;
            self.paused = false;
            self.player
                .update(0.0, Some(PlayerStatus::Running), &mut self.rng);
            self.discard_next_delta = true;
            self.schedule();
        }
    }

    /// Host notification of window focus/visibility changes
    pub fn set_visible(&mut self, visible: bool) {
        if !visible {
            self.stop();
        } else if !self.crashed {
            self.player.reset(&mut self.rng);
            self.play();
        }
    }

    /// Seed the session with the persisted best run (displayed units)
    pub fn set_high_score(&mut self, actual_distance: u32) {
        self.meter.set_high_score(actual_distance);
    }
}
