//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One advance per tick, driven by the host's frame callback
//! - Seeded RNG only
//! - FIFO obstacle order (oldest first)
//! - No rendering or platform dependencies

pub mod cloud;
pub mod collision;
pub mod horizon;
pub mod night;
pub mod obstacle;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use cloud::Cloud;
pub use collision::{CollisionBox, boxes_intersect, check_for_collision};
pub use horizon::{Horizon, HorizonLine};
pub use night::NightMode;
pub use obstacle::{CATALOG, Obstacle, ObstacleKind};
pub use player::{Player, PlayerStatus};
pub use score::ScoreMeter;
pub use state::{Cue, GameEvent, GameState, Intent};
pub use tick::tick;
