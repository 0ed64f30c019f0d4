//! Night-mode moon and stars
//!
//! Fades in while the world is inverted and back out afterwards. The moon
//! advances one phase per activation; both full-ish phases draw at the same
//! width. Stars are re-placed every time the fade completes.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::VIEWPORT_WIDTH;

pub const MOON_WIDTH: f32 = 40.0;
pub const MOON_HEIGHT: f32 = 80.0;
pub const STAR_SIZE: f32 = 18.0;
pub const NUM_STARS: usize = 2;
const FADE_SPEED: f32 = 0.035;
const MOON_SPEED: f32 = 0.25;
const STAR_SPEED: f32 = 0.3;
const STAR_MAX_Y: f32 = 140.0;

/// Sprite-sheet x offsets for the moon's phases
pub const PHASES: [f32; 7] = [280.0, 240.0, 200.0, 120.0, 80.0, 40.0, 0.0];

#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub pos: Vec2,
    /// Row offset into the star sprite strip
    pub sprite_row: usize,
}

#[derive(Debug, Clone)]
pub struct NightMode {
    pub x: f32,
    pub y: f32,
    pub current_phase: usize,
    pub opacity: f32,
    pub stars: [Star; NUM_STARS],
    pub draw_stars: bool,
}

impl NightMode {
    pub fn new(rng: &mut Pcg32) -> Self {
        let mut night = Self {
            x: VIEWPORT_WIDTH - 50.0,
            y: 30.0,
            current_phase: 0,
            opacity: 0.0,
            stars: [Star {
                pos: Vec2::ZERO,
                sprite_row: 0,
            }; NUM_STARS],
            draw_stars: false,
        };
        night.place_stars(rng);
        night
    }

    /// Advance fade, moon phase and drift for one tick
    pub fn update(&mut self, activated: bool, rng: &mut Pcg32) {
        // A fresh activation at full daylight rolls the next phase
        if activated && self.opacity == 0.0 {
            self.current_phase = (self.current_phase + 1) % PHASES.len();
        }

        if activated && self.opacity < 1.0 {
            self.opacity = (self.opacity + FADE_SPEED).min(1.0);
        } else if !activated && self.opacity > 0.0 {
            self.opacity = (self.opacity - FADE_SPEED).max(0.0);
        }

        if self.opacity > 0.0 {
            self.x = wrap_x(self.x, MOON_SPEED);

            if self.draw_stars {
                for star in &mut self.stars {
                    star.pos.x = wrap_x(star.pos.x, STAR_SPEED);
                }
            }
        } else {
            self.place_stars(rng);
        }
        self.draw_stars = true;
    }

    /// Scatter the stars across evenly split viewport segments
    fn place_stars(&mut self, rng: &mut Pcg32) {
        let segment = (VIEWPORT_WIDTH / NUM_STARS as f32).round();

        for (i, star) in self.stars.iter_mut().enumerate() {
            star.pos.x = rng.random_range(segment * i as f32..=segment * (i + 1) as f32);
            star.pos.y = rng.random_range(0.0..=STAR_MAX_Y);
            star.sprite_row = i;
        }
    }

    pub fn reset(&mut self, rng: &mut Pcg32) {
        self.current_phase = 0;
        self.opacity = 0.0;
        self.update(false, rng);
    }
}

/// Drift left, wrapping back to the right edge once fully off-screen
fn wrap_x(current: f32, speed: f32) -> f32 {
    if current < -MOON_WIDTH {
        VIEWPORT_WIDTH
    } else {
        current - speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_activation_fades_in_and_advances_phase() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut night = NightMode::new(&mut rng);
        assert_eq!(night.current_phase, 0);

        night.update(true, &mut rng);
        assert_eq!(night.current_phase, 1);
        assert!(night.opacity > 0.0);

        // Further ticks keep the phase until the fade completes again
        for _ in 0..50 {
            night.update(true, &mut rng);
        }
        assert_eq!(night.current_phase, 1);
        assert_eq!(night.opacity, 1.0);
    }

    #[test]
    fn test_deactivation_fades_out() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut night = NightMode::new(&mut rng);
        for _ in 0..40 {
            night.update(true, &mut rng);
        }
        for _ in 0..40 {
            night.update(false, &mut rng);
        }
        assert_eq!(night.opacity, 0.0);
    }

    #[test]
    fn test_phase_wraps_around_catalog() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut night = NightMode::new(&mut rng);
        night.current_phase = PHASES.len() - 1;
        night.update(true, &mut rng);
        assert_eq!(night.current_phase, 0);
    }

    #[test]
    fn test_moon_wraps_at_left_edge() {
        assert_eq!(wrap_x(-MOON_WIDTH - 1.0, MOON_SPEED), VIEWPORT_WIDTH);
        assert!(wrap_x(100.0, MOON_SPEED) < 100.0);
    }
}
