//! Distance meter and achievement flash
//!
//! Raw simulation distance is scaled to displayed units, rendered as a
//! fixed-width digit sequence that widens once its all-nines capacity is
//! exceeded. Crossing an achievement multiple starts a flash sequence that
//! gates digit redraws and requests a one-shot celebration cue.

use crate::config::MeterConfig;

#[derive(Debug, Clone)]
pub struct ScoreMeter {
    config: MeterConfig,
    /// Current display width in digits; never shrinks within a session
    digit_width: usize,
    /// All-nines capacity of the current width
    max_score: u32,
    /// Digit values for the current frame, most significant first
    pub digits: Vec<u8>,
    /// Whether the digits should be redrawn this tick (flash gating)
    pub paint: bool,
    achievement: bool,
    flash_timer: f32,
    flash_iterations: u32,
    /// Last multiple celebrated, so one crossing fires exactly one flash
    last_flashed: u32,
    high_score: u32,
}

impl ScoreMeter {
    pub fn new(config: MeterConfig) -> Self {
        let digit_width = config.max_distance_units;
        let max_score = 10u32.pow(digit_width as u32) - 1;
        Self {
            config,
            digit_width,
            max_score,
            digits: vec![0; digit_width],
            paint: true,
            achievement: false,
            flash_timer: 0.0,
            flash_iterations: 0,
            last_flashed: 0,
            high_score: 0,
        }
    }

    /// Raw simulation units to displayed units
    pub fn actual_distance(&self, raw_distance: u32) -> u32 {
        if raw_distance > 0 {
            (raw_distance as f32 * self.config.coefficient).round() as u32
        } else {
            0
        }
    }

    /// Advance the meter one tick. Returns whether a celebration cue should
    /// play.
    pub fn update(&mut self, delta_ms: f32, raw_distance: u32) -> bool {
        let mut play_cue = false;
        self.paint = true;

        if !self.achievement {
            let distance = self.actual_distance(raw_distance);

            // Widen once past capacity; beyond the hard cap the width stays
            // put and the display keeps the trailing digits
            if distance > self.max_score && self.digit_width == self.config.max_distance_units {
                self.digit_width += 1;
                self.max_score = self.max_score * 10 + 9;
            }
            debug_assert!(
                (self.config.max_distance_units..=self.config.max_distance_units + 1)
                    .contains(&self.digit_width)
            );

            if distance > 0 {
                if distance % self.config.achievement_distance == 0
                    && distance != self.last_flashed
                {
                    self.achievement = true;
                    self.flash_timer = 0.0;
                    self.last_flashed = distance;
                    play_cue = true;
                }
                self.digits = self.format_digits(distance);
            } else {
                self.digits = vec![0; self.digit_width];
            }
        } else if self.flash_iterations <= self.config.flash_iterations {
            self.flash_timer += delta_ms;

            if self.flash_timer < self.config.flash_duration {
                self.paint = false;
            } else if self.flash_timer > self.config.flash_duration * 2.0 {
                self.flash_timer = 0.0;
                self.flash_iterations += 1;
            }
        } else {
            self.achievement = false;
            self.flash_iterations = 0;
            self.flash_timer = 0.0;
        }

        play_cue
    }

    /// Pad to the current width, keeping trailing digits on overflow
    fn format_digits(&self, value: u32) -> Vec<u8> {
        let mut digits = vec![0u8; self.digit_width];
        let mut rest = value;
        for slot in digits.iter_mut().rev() {
            *slot = (rest % 10) as u8;
            rest /= 10;
        }
        digits
    }

    pub fn digit_width(&self) -> usize {
        self.digit_width
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Record a best run, in displayed units
    pub fn set_high_score(&mut self, actual_distance: u32) {
        self.high_score = actual_distance;
    }

    pub fn high_score_digits(&self) -> Vec<u8> {
        self.format_digits(self.high_score)
    }

    /// Abort an in-flight flash so crashed digits stay visible
    pub fn cancel_flash(&mut self) {
        self.achievement = false;
        self.flash_timer = 0.0;
        self.flash_iterations = 0;
        self.paint = true;
    }

    /// Clear per-run state; the high score and any widened display survive
    pub fn reset(&mut self) {
        self.digits = vec![0; self.digit_width];
        self.paint = true;
        self.achievement = false;
        self.flash_timer = 0.0;
        self.flash_iterations = 0;
        self.last_flashed = 0;
    }
}
