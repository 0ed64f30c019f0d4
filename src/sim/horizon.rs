//! Horizon: ground line, clouds, night mode, and the obstacle spawner
//!
//! Owns every scrolling entity. Obstacles live in a FIFO sequence (oldest
//! first); the next one spawns as soon as the rightmost obstacle is fully
//! visible and its gap would fall inside the viewport, so exactly one
//! pending slot exists at a time.

use rand::Rng;
use rand_pcg::Pcg32;

use super::cloud::Cloud;
use super::night::NightMode;
use super::obstacle::{CATALOG, Obstacle, ObstacleKind};
use crate::config::Config;
use crate::consts::{FPS, VIEWPORT_WIDTH};

/// Obstacle-kind rolls before giving up and taking any speed-valid kind
const MAX_SPAWN_ATTEMPTS: usize = 10;

/// The two-segment wrap-around ground line
#[derive(Debug, Clone)]
pub struct HorizonLine {
    pub x: [f32; 2],
    pub y: f32,
    /// Which source variant each segment shows; re-rolled on wrap
    pub bumpy: [bool; 2],
}

pub const LINE_WIDTH: f32 = VIEWPORT_WIDTH;
pub const LINE_HEIGHT: f32 = 24.0;
const LINE_Y: f32 = 254.0;
const BUMP_THRESHOLD: f32 = 0.5;

impl HorizonLine {
    pub fn new() -> Self {
        Self {
            x: [0.0, LINE_WIDTH],
            y: LINE_Y,
            bumpy: [false, true],
        }
    }

    pub fn update(&mut self, delta_ms: f32, speed: f32, rng: &mut Pcg32) {
        let increment = (speed * (FPS / 1000.0) * delta_ms).floor();

        if self.x[0] <= 0.0 {
            self.shift(0, increment, rng);
        } else {
            self.shift(1, increment, rng);
        }
    }

    /// Scroll the leading segment and keep the trailing one glued behind it
    fn shift(&mut self, leading: usize, increment: f32, rng: &mut Pcg32) {
        let trailing = 1 - leading;

        self.x[leading] -= increment;
        self.x[trailing] = self.x[leading] + LINE_WIDTH;

        if self.x[leading] <= -LINE_WIDTH {
            self.x[leading] += LINE_WIDTH * 2.0;
            self.x[trailing] = self.x[leading] - LINE_WIDTH;
            self.bumpy[leading] = rng.random::<f32>() > BUMP_THRESHOLD;
        }
    }

    pub fn reset(&mut self) {
        self.x = [0.0, LINE_WIDTH];
    }
}

impl Default for HorizonLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that scrolls past the character
#[derive(Debug, Clone)]
pub struct Horizon {
    pub obstacles: Vec<Obstacle>,
    /// Most recent obstacle kinds, newest first, capped at the duplication limit
    history: Vec<ObstacleKind>,
    pub clouds: Vec<Cloud>,
    pub night: NightMode,
    pub line: HorizonLine,

    gap_coefficient: f32,
    cloud_frequency: f32,
    bg_cloud_speed: f32,
    max_clouds: usize,
    max_obstacle_duplication: usize,
    max_obstacle_length: u32,
}

impl Horizon {
    pub fn new(config: &Config, rng: &mut Pcg32) -> Self {
        let mut horizon = Self {
            obstacles: Vec::new(),
            history: Vec::new(),
            clouds: Vec::new(),
            night: NightMode::new(rng),
            line: HorizonLine::new(),
            gap_coefficient: config.gap_coefficient,
            cloud_frequency: config.cloud_frequency,
            bg_cloud_speed: config.bg_cloud_speed,
            max_clouds: config.max_clouds,
            max_obstacle_duplication: config.max_obstacle_duplication,
            max_obstacle_length: config.max_obstacle_length,
        };
        horizon.clouds.push(Cloud::spawn(rng));
        horizon
    }

    /// Advance every scrolling entity one tick
    pub fn update(
        &mut self,
        delta_ms: f32,
        speed: f32,
        spawn_obstacles: bool,
        night_active: bool,
        rng: &mut Pcg32,
    ) {
        self.line.update(delta_ms, speed, rng);
        self.night.update(night_active, rng);
        self.update_clouds(delta_ms, speed, rng);

        if spawn_obstacles {
            self.update_obstacles(delta_ms, speed, rng);
        }
    }

    fn update_clouds(&mut self, delta_ms: f32, speed: f32, rng: &mut Pcg32) {
        if self.clouds.is_empty() {
            self.clouds.push(Cloud::spawn(rng));
            return;
        }

        let cloud_speed = self.bg_cloud_speed / 1000.0 * delta_ms * speed;
        for cloud in &mut self.clouds {
            cloud.update(cloud_speed);
        }

        if let Some(last) = self.clouds.last()
            && self.clouds.len() < self.max_clouds
            && (VIEWPORT_WIDTH - last.pos.x) > last.gap
            && self.cloud_frequency > rng.random::<f32>()
        {
            self.clouds.push(Cloud::spawn(rng));
        }

        self.clouds.retain(|cloud| !cloud.removed);
    }

    /// Scroll active obstacles, drop the ones gone off-screen, and queue the
    /// next one once the rightmost obstacle has fully entered the viewport
    pub fn update_obstacles(&mut self, delta_ms: f32, speed: f32, rng: &mut Pcg32) {
        for obstacle in &mut self.obstacles {
            obstacle.update(delta_ms, speed);
        }
        self.obstacles.retain(|obstacle| !obstacle.removed);

        let needs_next = match self.obstacles.last() {
            Some(last) => {
                !last.followed
                    && last.is_visible()
                    && last.x + last.width + last.gap < VIEWPORT_WIDTH
            }
            None => true,
        };

        if needs_next {
            if let Some(last) = self.obstacles.last_mut() {
                last.followed = true;
            }
            self.add_new_obstacle(speed, rng);
        }
    }

    /// Roll an obstacle kind, rejecting over-duplicated or too-fast kinds.
    /// The retry loop is bounded; exhaustion falls back to any kind whose
    /// speed gate passes rather than failing the tick.
    pub fn add_new_obstacle(&mut self, speed: f32, rng: &mut Pcg32) {
        let mut picked = None;
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let candidate = CATALOG[rng.random_range(0..CATALOG.len())];
            if self.is_duplicate(candidate) || speed < candidate.spec().min_speed {
                continue;
            }
            picked = Some(candidate);
            break;
        }

        let kind = picked.unwrap_or_else(|| {
            let fallback = CATALOG
                .iter()
                .copied()
                .find(|kind| !self.is_duplicate(*kind) && speed >= kind.spec().min_speed)
                .or_else(|| {
                    CATALOG
                        .iter()
                        .copied()
                        .find(|kind| speed >= kind.spec().min_speed)
                })
                .unwrap_or(ObstacleKind::SmallCactus);
            log::warn!(
                "obstacle roll exhausted {MAX_SPAWN_ATTEMPTS} attempts, using {fallback:?}"
            );
            fallback
        });

        self.obstacles.push(Obstacle::spawn(
            kind,
            speed,
            self.gap_coefficient,
            self.max_obstacle_length,
            rng,
        ));

        self.history.insert(0, kind);
        self.history.truncate(self.max_obstacle_duplication);
    }

    /// Would this kind extend a maximal run of identical obstacles?
    fn is_duplicate(&self, kind: ObstacleKind) -> bool {
        self.history.len() >= self.max_obstacle_duplication
            && self.history.iter().all(|recent| *recent == kind)
    }

    pub fn reset(&mut self, rng: &mut Pcg32) {
        self.obstacles.clear();
        self.line.reset();
        self.night.reset(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn new_horizon(seed: u64) -> (Horizon, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let horizon = Horizon::new(&Config::default(), &mut rng);
        (horizon, rng)
    }

    fn spawn_sequence(seed: u64, speed: f32, count: usize) -> Vec<ObstacleKind> {
        let (mut horizon, mut rng) = new_horizon(seed);
        let mut kinds = Vec::with_capacity(count);
        for _ in 0..count {
            horizon.add_new_obstacle(speed, &mut rng);
            kinds.push(horizon.obstacles.last().expect("just spawned").kind);
            horizon.obstacles.clear();
        }
        kinds
    }

    #[test]
    fn test_no_pterodactyl_below_speed_gate() {
        for kind in spawn_sequence(17, 8.0, 200) {
            assert_ne!(kind, ObstacleKind::Pterodactyl);
        }
    }

    #[test]
    fn test_spawn_sequence_is_deterministic() {
        let a = spawn_sequence(99, 13.0, 50);
        let b = spawn_sequence(99, 13.0, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cloud_population_stays_capped() {
        let (mut horizon, mut rng) = new_horizon(5);
        for _ in 0..5000 {
            horizon.update(1000.0 / 60.0, 13.0, false, false, &mut rng);
            assert!(horizon.clouds.len() <= Config::default().max_clouds);
            assert!(!horizon.clouds.is_empty());
        }
    }

    #[test]
    fn test_exactly_one_pending_obstacle_slot() {
        let (mut horizon, mut rng) = new_horizon(7);
        for _ in 0..2000 {
            horizon.update_obstacles(1000.0 / 60.0, 13.0, &mut rng);
            // Only the rightmost obstacle may have an unspawned follower
            let unfollowed = horizon
                .obstacles
                .iter()
                .filter(|obstacle| !obstacle.followed)
                .count();
            assert!(unfollowed <= 1);
        }
    }

    #[test]
    fn test_obstacles_removed_oldest_first() {
        let (mut horizon, mut rng) = new_horizon(11);
        for _ in 0..5000 {
            horizon.update_obstacles(1000.0 / 60.0, 13.0, &mut rng);
            // FIFO order: x positions strictly increase front to back
            for pair in horizon.obstacles.windows(2) {
                assert!(pair[0].x < pair[1].x);
            }
        }
    }

    #[test]
    fn test_line_segments_wrap_seamlessly() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut line = HorizonLine::new();
        for _ in 0..10000 {
            line.update(1000.0 / 60.0, 13.0, &mut rng);
            let gap = (line.x[0] - line.x[1]).abs();
            assert_eq!(gap, LINE_WIDTH);
            assert!(line.x[0].min(line.x[1]) <= 0.0);
        }
    }

    proptest! {
        #[test]
        fn test_no_three_consecutive_duplicates(seed in any::<u64>()) {
            let kinds = spawn_sequence(seed, 26.0, 60);
            for window in kinds.windows(3) {
                prop_assert!(
                    !(window[0] == window[1] && window[1] == window[2]),
                    "three consecutive {:?}",
                    window[0]
                );
            }
        }
    }
}
