//! Game tunables
//!
//! Every constant that shapes a run lives here as an immutable value injected
//! at construction, so two sessions built from the same `Config` and seed
//! replay identically.

use serde::{Deserialize, Serialize};

/// World-level tunables owned by the simulation loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Speed gained per non-colliding tick
    pub acceleration: f32,
    /// Cloud scroll speed as a fraction of world speed
    pub bg_cloud_speed: f32,
    /// Gap between the ground line and the viewport bottom
    pub bottom_pad: f32,
    /// Running time before obstacles start spawning (ms)
    pub clear_time: f32,
    /// Probability gate for spawning the next cloud
    pub cloud_frequency: f32,
    /// Time after a crash before a jump intent may restart (ms)
    pub gameover_clear_time: f32,
    /// Scales each obstacle kind's base minimum gap
    pub gap_coefficient: f32,
    /// How long night mode lasts before fading back out (ms)
    pub invert_fade_duration: f32,
    /// Displayed-distance interval between night-mode triggers
    pub invert_distance: u32,
    /// Idle blink cycles before the attract loop stops scheduling
    pub max_blink_count: u32,
    /// Cosmetic cloud cap
    pub max_clouds: usize,
    /// Largest multi-unit obstacle size
    pub max_obstacle_length: u32,
    /// Longest allowed run of one obstacle kind
    pub max_obstacle_duplication: usize,
    /// World speed ceiling
    pub max_speed: f32,
    /// World speed at the start of a run
    pub speed: f32,

    pub player: PlayerConfig,
    pub meter: MeterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            acceleration: 0.001,
            bg_cloud_speed: 0.2,
            bottom_pad: 10.0,
            clear_time: 3000.0,
            cloud_frequency: 0.5,
            gameover_clear_time: 750.0,
            gap_coefficient: 0.6,
            invert_fade_duration: 12000.0,
            invert_distance: 700,
            max_blink_count: 3,
            max_clouds: 6,
            max_obstacle_length: 3,
            max_obstacle_duplication: 2,
            max_speed: 26.0,
            speed: 12.0,
            player: PlayerConfig::default(),
            meter: MeterConfig::default(),
        }
    }
}

/// Character physics and sprite metrics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Velocity a released jump is forced down to (short-hop)
    pub drop_velocity: f32,
    /// Downward acceleration per animation-frame unit
    pub gravity: f32,
    pub height: f32,
    pub height_duck: f32,
    /// Upward launch velocity before the speed-dependent boost
    pub initial_jump_velocity: f32,
    /// Duration of the walk-in from the left viewport edge (ms)
    pub intro_duration: f32,
    /// Screen y above which a pending jump release is honored early
    pub max_jump_height: f32,
    /// Rise required before a release can shorten the jump
    pub min_jump_height: f32,
    /// Position-step multiplier while fast-falling
    pub speed_drop_coefficient: f32,
    /// Resting x once the intro walk-in completes
    pub start_x: f32,
    pub width: f32,
    pub width_duck: f32,
    /// Upper bound for the randomized idle blink delay (ms)
    pub blink_timing: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            drop_velocity: -5.0,
            gravity: 0.6,
            height: 94.0,
            height_duck: 50.0,
            initial_jump_velocity: -20.0,
            intro_duration: 1500.0,
            max_jump_height: 60.0,
            min_jump_height: 60.0,
            speed_drop_coefficient: 12.0,
            start_x: 50.0,
            width: 88.0,
            width_duck: 118.0,
            blink_timing: 7000.0,
        }
    }
}

/// Distance meter tunables
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MeterConfig {
    /// Digit width the display starts at
    pub max_distance_units: usize,
    /// Displayed-distance interval between celebration flashes
    pub achievement_distance: u32,
    /// Raw simulation units to displayed units
    pub coefficient: f32,
    /// Length of one on/off half of a flash cycle (ms)
    pub flash_duration: f32,
    /// Full flash cycles per achievement
    pub flash_iterations: u32,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            max_distance_units: 5,
            achievement_distance: 100,
            coefficient: 0.0125,
            flash_duration: 1000.0 / 4.0,
            flash_iterations: 3,
        }
    }
}
