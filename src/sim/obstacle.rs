//! Obstacles and their fixed catalog
//!
//! Each kind carries its sprite metrics, collision sub-box templates, speed
//! gates, and spawn-gap base. Instances clone the templates and adjust them
//! when a cactus rolls a multi-unit size.

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::CollisionBox;
use crate::consts::{FPS, VIEWPORT_WIDTH};

/// How far past the minimum the randomized gap may stretch
pub const MAX_GAP_COEFFICIENT: f32 = 1.5;

/// The fixed obstacle catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    SmallCactus,
    LargeCactus,
    Pterodactyl,
}

/// Static per-kind data
#[derive(Debug)]
pub struct ObstacleSpec {
    pub width: f32,
    pub height: f32,
    /// Candidate spawn heights; one is rolled at spawn
    pub y_positions: &'static [f32],
    /// World speed below which a multi-unit size collapses to 1
    pub multiple_speed: f32,
    /// World speed required before this kind may spawn at all
    pub min_speed: f32,
    /// Base gap before the coefficient and speed scaling
    pub min_gap: f32,
    pub collision_boxes: &'static [CollisionBox],
    /// Animation frames; 0 means a static sprite
    pub num_frames: usize,
    /// Time per animation frame (ms)
    pub frame_rate: f32,
    /// Magnitude of the erratic speed offset, signed at spawn
    pub speed_offset: f32,
}

const SMALL_CACTUS_BOXES: [CollisionBox; 3] = [
    CollisionBox::new(0.0, 14.0, 10.0, 54.0),
    CollisionBox::new(8.0, 0.0, 12.0, 68.0),
    CollisionBox::new(20.0, 8.0, 14.0, 28.0),
];

const LARGE_CACTUS_BOXES: [CollisionBox; 3] = [
    CollisionBox::new(0.0, 24.0, 14.0, 76.0),
    CollisionBox::new(16.0, 0.0, 14.0, 98.0),
    CollisionBox::new(26.0, 20.0, 20.0, 76.0),
];

const PTERODACTYL_BOXES: [CollisionBox; 5] = [
    CollisionBox::new(30.0, 30.0, 32.0, 10.0),
    CollisionBox::new(36.0, 42.0, 48.0, 12.0),
    CollisionBox::new(4.0, 28.0, 8.0, 6.0),
    CollisionBox::new(12.0, 20.0, 8.0, 14.0),
    CollisionBox::new(20.0, 16.0, 12.0, 18.0),
];

static SMALL_CACTUS: ObstacleSpec = ObstacleSpec {
    width: 34.0,
    height: 70.0,
    y_positions: &[210.0],
    multiple_speed: 4.0,
    min_speed: 0.0,
    min_gap: 120.0,
    collision_boxes: &SMALL_CACTUS_BOXES,
    num_frames: 0,
    frame_rate: 0.0,
    speed_offset: 0.0,
};

static LARGE_CACTUS: ObstacleSpec = ObstacleSpec {
    width: 50.0,
    height: 100.0,
    y_positions: &[180.0],
    multiple_speed: 7.0,
    min_speed: 0.0,
    min_gap: 120.0,
    collision_boxes: &LARGE_CACTUS_BOXES,
    num_frames: 0,
    frame_rate: 0.0,
    speed_offset: 0.0,
};

static PTERODACTYL: ObstacleSpec = ObstacleSpec {
    width: 92.0,
    height: 80.0,
    y_positions: &[200.0, 150.0, 100.0],
    // Effectively never multi-unit
    multiple_speed: 999.0,
    min_speed: 8.5,
    min_gap: 150.0,
    collision_boxes: &PTERODACTYL_BOXES,
    num_frames: 2,
    frame_rate: 1000.0 / 6.0,
    speed_offset: 0.8,
};

pub const CATALOG: [ObstacleKind; 3] = [
    ObstacleKind::SmallCactus,
    ObstacleKind::LargeCactus,
    ObstacleKind::Pterodactyl,
];

impl ObstacleKind {
    pub fn spec(&self) -> &'static ObstacleSpec {
        match self {
            ObstacleKind::SmallCactus => &SMALL_CACTUS,
            ObstacleKind::LargeCactus => &LARGE_CACTUS,
            ObstacleKind::Pterodactyl => &PTERODACTYL,
        }
    }
}

/// An active obstacle scrolling toward the character
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Size multiplier (1-3); only cacti above their speed gate exceed 1
    pub size: u32,
    pub x: f32,
    pub y: f32,
    /// Sprite width after the size multiplier
    pub width: f32,
    pub height: f32,
    /// Templates cloned from the kind, stretched for multi-unit sizes
    pub collision_boxes: Vec<CollisionBox>,
    /// Distance to hold before the next obstacle spawns
    pub gap: f32,
    /// Per-instance erratic drift, signed at spawn
    pub speed_offset: f32,
    pub current_frame: usize,
    frame_timer: f32,
    /// Whether the following obstacle has already been queued
    pub followed: bool,
    pub removed: bool,
}

impl Obstacle {
    /// Roll and place a new obstacle just past the right viewport edge
    pub fn spawn(
        kind: ObstacleKind,
        speed: f32,
        gap_coefficient: f32,
        max_length: u32,
        rng: &mut Pcg32,
    ) -> Self {
        let spec = kind.spec();

        let mut size = rng.random_range(1..=max_length);
        if size > 1 && spec.multiple_speed > speed {
            size = 1;
        }

        let width = spec.width * size as f32;
        let y = spec.y_positions[rng.random_range(0..spec.y_positions.len())];

        let mut collision_boxes = spec.collision_boxes.to_vec();
        if size > 1 {
            collision_boxes[1].width =
                width - collision_boxes[0].width - collision_boxes[2].width;
            collision_boxes[2].x = width - collision_boxes[2].width;
        }

        let speed_offset = if spec.speed_offset != 0.0 {
            if rng.random_bool(0.5) {
                spec.speed_offset
            } else {
                -spec.speed_offset
            }
        } else {
            0.0
        };

        let gap = roll_gap(width, spec.min_gap, gap_coefficient, speed, rng);

        Self {
            kind,
            size,
            x: VIEWPORT_WIDTH + spec.width,
            y,
            width,
            height: spec.height,
            collision_boxes,
            gap,
            speed_offset,
            current_frame: 0,
            frame_timer: 0.0,
            followed: false,
            removed: false,
        }
    }

    /// Scroll leftward and advance the animation frame
    pub fn update(&mut self, delta_ms: f32, speed: f32) {
        if self.removed {
            return;
        }

        let speed = speed + self.speed_offset;
        self.x -= (speed * (FPS / 1000.0) * delta_ms).floor();

        let spec = self.kind.spec();
        if spec.num_frames > 0 {
            self.frame_timer += delta_ms;
            if self.frame_timer >= spec.frame_rate {
                self.current_frame = (self.current_frame + 1) % spec.num_frames;
                self.frame_timer = 0.0;
            }
        }

        if !self.is_visible() {
            self.removed = true;
        }
    }

    /// Still at least partially inside the viewport
    pub fn is_visible(&self) -> bool {
        self.x + self.width > 0.0
    }
}

/// Uniform integer gap in [min_gap, round(min_gap * 1.5)]
fn roll_gap(
    width: f32,
    base_min_gap: f32,
    gap_coefficient: f32,
    speed: f32,
    rng: &mut Pcg32,
) -> f32 {
    let min_gap = (width * speed + base_min_gap * gap_coefficient).round() as i32;
    let max_gap = (min_gap as f32 * MAX_GAP_COEFFICIENT).round() as i32;
    rng.random_range(min_gap..=max_gap) as f32
}
