//! Background clouds
//!
//! Purely cosmetic, but spawn timing follows the same oldest-first,
//! gap-gated pattern as obstacles and scrolls with the world speed.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::VIEWPORT_WIDTH;

pub const CLOUD_WIDTH: f32 = 92.0;
pub const CLOUD_HEIGHT: f32 = 28.0;
/// Sky band the spawn height is rolled from
const MAX_SKY_LEVEL: f32 = 30.0;
const MIN_SKY_LEVEL: f32 = 71.0;
/// Bounds for the randomized gap to the next cloud
const MIN_CLOUD_GAP: f32 = 100.0;
const MAX_CLOUD_GAP: f32 = 400.0;

#[derive(Debug, Clone)]
pub struct Cloud {
    pub pos: Vec2,
    /// Scrolled distance to cover before the next cloud may spawn
    pub gap: f32,
    pub removed: bool,
}

impl Cloud {
    /// Roll a new cloud at the right viewport edge
    pub fn spawn(rng: &mut Pcg32) -> Self {
        let y = rng.random_range(MAX_SKY_LEVEL..=MIN_SKY_LEVEL).round();
        let gap = rng.random_range(MIN_CLOUD_GAP..=MAX_CLOUD_GAP).round();
        Self {
            pos: Vec2::new(VIEWPORT_WIDTH, y),
            gap,
            removed: false,
        }
    }

    /// Drift leftward by the cloud-layer scroll increment
    pub fn update(&mut self, increment: f32) {
        if self.removed {
            return;
        }
        self.pos.x -= increment.ceil();
        if !self.is_visible() {
            self.removed = true;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.pos.x + CLOUD_WIDTH > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_within_sky_band() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let cloud = Cloud::spawn(&mut rng);
            assert!(cloud.pos.y >= MAX_SKY_LEVEL && cloud.pos.y <= MIN_SKY_LEVEL);
            assert!(cloud.gap >= MIN_CLOUD_GAP && cloud.gap <= MAX_CLOUD_GAP);
            assert_eq!(cloud.pos.x, VIEWPORT_WIDTH);
        }
    }

    #[test]
    fn test_removed_when_fully_offscreen() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut cloud = Cloud::spawn(&mut rng);
        cloud.pos.x = -CLOUD_WIDTH + 1.0;
        cloud.update(0.5);
        assert!(cloud.removed);
    }
}
