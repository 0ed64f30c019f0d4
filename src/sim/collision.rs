//! Axis-aligned collision detection
//!
//! Two stages: a cheap whole-sprite bounding test with a 1 px inward inset,
//! then the cartesian product of the character's pose sub-boxes against the
//! obstacle kind's sub-boxes. Sub-boxes are template-local and get translated
//! by their parent sprite's origin before comparison.

use super::obstacle::Obstacle;
use super::player::Player;

/// A rectangle in local sprite coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CollisionBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Translate a template box by its parent sprite's origin
    pub fn adjusted(&self, origin_x: f32, origin_y: f32) -> Self {
        Self {
            x: self.x + origin_x,
            y: self.y + origin_y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Strict rectangle overlap. Edges that merely touch do not collide.
pub fn boxes_intersect(a: &CollisionBox, b: &CollisionBox) -> bool {
    a.x < b.x + b.width
        && a.x + a.width > b.x
        && a.y < b.y + b.height
        && a.y + a.height > b.y
}

/// Test the character against one obstacle.
///
/// The obstacle's outer box is scaled by its size multiplier; both outer
/// boxes are inset by 1 px so grazing passes don't end the run.
pub fn check_for_collision(obstacle: &Obstacle, player: &Player) -> bool {
    let player_box = CollisionBox::new(
        player.x + 1.0,
        player.y + 1.0,
        player.sprite_width() - 2.0,
        player.config.height - 2.0,
    );

    let obstacle_box = CollisionBox::new(
        obstacle.x + 1.0,
        obstacle.y + 1.0,
        obstacle.width - 2.0,
        obstacle.height - 2.0,
    );

    if !boxes_intersect(&player_box, &obstacle_box) {
        return false;
    }

    for player_template in player.collision_boxes() {
        let adj_player = player_template.adjusted(player_box.x, player_box.y);

        for obstacle_template in &obstacle.collision_boxes {
            let adj_obstacle = obstacle_template.adjusted(obstacle_box.x, obstacle_box.y);

            if boxes_intersect(&adj_player, &adj_obstacle) {
                return true;
            }
        }
    }

    false
}
