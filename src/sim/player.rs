//! Character state machine and jump physics
//!
//! The character runs in place at a fixed x; only y moves. Velocity and
//! gravity are expressed per animation-frame unit, so elapsed time is
//! converted to frames before integration and jump height stays independent
//! of the host's frame rate.

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::CollisionBox;
use crate::config::PlayerConfig;
use crate::consts::VIEWPORT_HEIGHT;

/// Discrete character states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Waiting,
    Running,
    Jumping,
    Ducking,
    Crashed,
}

/// Per-status animation: sprite-sheet frame x offsets and frame period (ms)
pub fn anim_frames(status: PlayerStatus) -> (&'static [f32], f32) {
    match status {
        PlayerStatus::Waiting => (&[88.0, 0.0], 1000.0 / 3.0),
        PlayerStatus::Running => (&[176.0, 264.0], 1000.0 / 12.0),
        PlayerStatus::Crashed => (&[440.0], 1000.0 / 60.0),
        PlayerStatus::Jumping => (&[0.0], 1000.0 / 60.0),
        PlayerStatus::Ducking => (&[528.0, 646.0], 1000.0 / 8.0),
    }
}

/// Fine collision sub-boxes for the upright pose
const RUNNING_BOXES: [CollisionBox; 6] = [
    CollisionBox::new(44.0, 0.0, 34.0, 32.0),
    CollisionBox::new(2.0, 36.0, 60.0, 18.0),
    CollisionBox::new(20.0, 70.0, 28.0, 16.0),
    CollisionBox::new(2.0, 48.0, 58.0, 10.0),
    CollisionBox::new(10.0, 60.0, 42.0, 8.0),
    CollisionBox::new(18.0, 68.0, 30.0, 8.0),
];

/// Ducking collapses to a single low box
const DUCKING_BOXES: [CollisionBox; 1] = [CollisionBox::new(2.0, 26.0, 110.0, 50.0)];

/// The player-controlled character
#[derive(Debug, Clone)]
pub struct Player {
    pub config: PlayerConfig,
    pub x: f32,
    pub y: f32,
    /// Resting y; larger y is lower on screen
    pub ground_y: f32,
    /// y the character must rise above before a release can shorten the jump
    min_jump_y: f32,
    pub velocity: f32,
    pub status: PlayerStatus,
    pub jumping: bool,
    pub ducking: bool,
    pub speed_drop: bool,
    reached_min_height: bool,
    /// Landings since the last reset
    pub jump_count: u32,
    /// Walk-in from the left edge is in progress
    pub playing_intro: bool,

    // Animation
    pub current_frame: usize,
    frames: &'static [f32],
    ms_per_frame: f32,
    anim_timer: f32,

    // Idle blink
    blink_delay: f32,
    idle_timer: f32,
    pub blink_count: u32,
}

impl Player {
    pub fn new(config: PlayerConfig, bottom_pad: f32, rng: &mut Pcg32) -> Self {
        let ground_y = VIEWPORT_HEIGHT - config.height - bottom_pad;
        let (frames, ms_per_frame) = anim_frames(PlayerStatus::Waiting);

        let mut player = Self {
            config,
            x: 0.0,
            y: ground_y,
            ground_y,
            min_jump_y: ground_y - config.min_jump_height,
            velocity: 0.0,
            status: PlayerStatus::Waiting,
            jumping: false,
            ducking: false,
            speed_drop: false,
            reached_min_height: false,
            jump_count: 0,
            playing_intro: false,
            current_frame: 0,
            frames,
            ms_per_frame,
            anim_timer: 0.0,
            blink_delay: 0.0,
            idle_timer: 0.0,
            blink_count: 0,
        };
        player.set_blink_delay(rng);
        player
    }

    /// Advance the animation clock, optionally forcing a status change
    pub fn update(&mut self, delta_ms: f32, status: Option<PlayerStatus>, rng: &mut Pcg32) {
        self.anim_timer += delta_ms;

        if let Some(status) = status {
            self.status = status;
            self.current_frame = 0;
            let (frames, ms_per_frame) = anim_frames(status);
            self.frames = frames;
            self.ms_per_frame = ms_per_frame;

            if status == PlayerStatus::Waiting {
                self.idle_timer = 0.0;
                self.set_blink_delay(rng);
            }
        }

        if self.playing_intro && self.x < self.config.start_x {
            self.x +=
                ((self.config.start_x / self.config.intro_duration) * delta_ms).round();
            self.x = self.x.min(self.config.start_x);
        }

        if self.status == PlayerStatus::Waiting {
            self.blink(delta_ms, rng);
        }

        if self.anim_timer >= self.ms_per_frame {
            self.current_frame = if self.current_frame == self.frames.len() - 1 {
                0
            } else {
                self.current_frame + 1
            };
            self.anim_timer = 0.0;
        }

        // Holding duck through a fast-fall lands straight into the duck pose
        if self.speed_drop && self.y == self.ground_y {
            self.speed_drop = false;
            self.set_duck(true, rng);
        }
    }

    fn set_blink_delay(&mut self, rng: &mut Pcg32) {
        self.blink_delay = (rng.random::<f32>() * self.config.blink_timing).ceil();
    }

    /// Idle blink, independent of the main frame cadence
    fn blink(&mut self, delta_ms: f32, rng: &mut Pcg32) {
        self.idle_timer += delta_ms;

        if self.idle_timer >= self.blink_delay && self.current_frame == 1 {
            self.set_blink_delay(rng);
            self.idle_timer = 0.0;
            self.blink_count += 1;
        }
    }

    /// Launch a jump; faster worlds launch slightly harder
    pub fn start_jump(&mut self, speed: f32, rng: &mut Pcg32) {
        if !self.jumping {
            self.update(0.0, Some(PlayerStatus::Jumping), rng);
            self.velocity = self.config.initial_jump_velocity - speed / 10.0;
            self.jumping = true;
            self.reached_min_height = false;
            self.speed_drop = false;
        }
    }

    /// Honor a jump release: once past the minimum rise, cap the remaining
    /// ascent at the drop velocity (the short-hop mechanic)
    pub fn end_jump(&mut self) {
        if self.reached_min_height && self.velocity < self.config.drop_velocity {
            self.velocity = self.config.drop_velocity;
        }
    }

    /// Integrate one tick of jump physics
    pub fn update_jump(&mut self, delta_ms: f32, rng: &mut Pcg32) {
        let frames_elapsed = crate::frames_elapsed(delta_ms, self.ms_per_frame);

        if self.speed_drop {
            self.y +=
                (self.velocity * self.config.speed_drop_coefficient * frames_elapsed).round();
        } else {
            self.y += (self.velocity * frames_elapsed).round();
        }

        self.velocity += self.config.gravity * frames_elapsed;

        if self.y < self.min_jump_y || self.speed_drop {
            self.reached_min_height = true;
        }

        // Past the ceiling (or fast-falling) any pending release takes effect
        if self.y < self.config.max_jump_height || self.speed_drop {
            self.end_jump();
        }

        if self.y > self.ground_y {
            self.reset(rng);
            self.jump_count += 1;
        }

        self.update(delta_ms, None, rng);
    }

    /// Force an accelerated fast-fall; valid mid-jump only
    pub fn set_speed_drop(&mut self) {
        if self.jumping {
            self.speed_drop = true;
            self.velocity = 1.0;
        }
    }

    pub fn cancel_speed_drop(&mut self) {
        self.speed_drop = false;
    }

    /// Toggle the duck pose, swapping sprite width and collision boxes
    pub fn set_duck(&mut self, ducking: bool, rng: &mut Pcg32) {
        if ducking && self.status != PlayerStatus::Ducking {
            self.update(0.0, Some(PlayerStatus::Ducking), rng);
            self.ducking = true;
        } else if !ducking && self.status == PlayerStatus::Ducking {
            self.update(0.0, Some(PlayerStatus::Running), rng);
            self.ducking = false;
        }
    }

    /// Back on the ground, running, with all transient state cleared
    pub fn reset(&mut self, rng: &mut Pcg32) {
        self.y = self.ground_y;
        self.velocity = 0.0;
        self.jumping = false;
        self.ducking = false;
        self.update(0.0, Some(PlayerStatus::Running), rng);
        self.speed_drop = false;
        self.jump_count = 0;
    }

    /// Sprite-sheet x offset of the current animation frame
    pub fn frame_offset(&self) -> f32 {
        self.frames[self.current_frame]
    }

    /// Width of the current pose's sprite
    pub fn sprite_width(&self) -> f32 {
        if self.ducking {
            self.config.width_duck
        } else {
            self.config.width
        }
    }

    /// Fine collision boxes for the current pose
    pub fn collision_boxes(&self) -> &'static [CollisionBox] {
        if self.ducking {
            &DUCKING_BOXES
        } else {
            &RUNNING_BOXES
        }
    }
}
