//! Draw-request composition
//!
//! The core never touches a canvas. Each frame it emits an ordered list of
//! `{source region, destination rect, opacity}` requests against the fixed
//! 2x-density sprite atlas, and the host's renderer blits them however it
//! likes. Order is back to front: ground, night sky, clouds, obstacles,
//! character, score, then the game-over panel.

use glam::Vec2;

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::sim::horizon::{LINE_HEIGHT, LINE_WIDTH};
use crate::sim::night::{MOON_HEIGHT, MOON_WIDTH, PHASES, STAR_SIZE};
use crate::sim::player::PlayerStatus;
use crate::sim::{GameState, Obstacle, ObstacleKind, cloud};

/// Top-left corners of each sprite in the atlas (2x-density coordinates)
pub mod atlas {
    use glam::Vec2;

    pub const CACTUS_LARGE: Vec2 = Vec2::new(1304.0, 2.0);
    pub const CACTUS_SMALL: Vec2 = Vec2::new(892.0, 2.0);
    pub const CLOUD: Vec2 = Vec2::new(332.0, 2.0);
    pub const HORIZON: Vec2 = Vec2::new(2.0, 208.0);
    pub const MOON: Vec2 = Vec2::new(1908.0, 2.0);
    pub const PTERODACTYL: Vec2 = Vec2::new(520.0, 2.0);
    pub const RESTART: Vec2 = Vec2::new(2.0, 2.0);
    pub const TEXT: Vec2 = Vec2::new(2588.0, 2.0);
    pub const PLAYER: Vec2 = Vec2::new(3356.0, 2.0);
    pub const STAR: Vec2 = Vec2::new(2552.0, 2.0);
}

/// Score glyph metrics. Glyphs 0-9 are digits; 10 and 11 spell "HI".
const DIGIT_WIDTH: f32 = 20.0;
const DIGIT_HEIGHT: f32 = 26.0;
const DIGIT_DEST_WIDTH: f32 = 22.0;
const METER_Y: f32 = 5.0;
const HI_GLYPHS: [u8; 2] = [10, 11];

/// Game-over panel metrics
const PANEL_TEXT_Y: f32 = 26.0;
const PANEL_TEXT_WIDTH: f32 = 382.0;
const PANEL_TEXT_HEIGHT: f32 = 22.0;
const RESTART_WIDTH: f32 = 72.0;
const RESTART_HEIGHT: f32 = 64.0;

/// An axis-aligned rectangle in atlas or viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One sprite blit request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Atlas region, in 2x-density source pixels
    pub src: Rect,
    /// Destination in viewport coordinates
    pub dst: Rect,
    pub opacity: f32,
}

fn blit(src: Rect, dst: Rect) -> DrawCommand {
    DrawCommand {
        src,
        dst,
        opacity: 1.0,
    }
}

/// Build the frame's full draw list from the current simulation state
pub fn compose(state: &GameState) -> Vec<DrawCommand> {
    let mut frame = Vec::new();

    push_horizon_line(state, &mut frame);
    push_night(state, &mut frame);
    push_clouds(state, &mut frame);
    for obstacle in &state.horizon.obstacles {
        frame.push(obstacle_command(obstacle));
    }
    frame.push(player_command(state));
    push_score(state, &mut frame);

    if state.crashed {
        push_game_over_panel(&mut frame);
    }

    frame
}

fn push_horizon_line(state: &GameState, frame: &mut Vec<DrawCommand>) {
    let line = &state.horizon.line;
    for segment in 0..2 {
        let src_x = atlas::HORIZON.x + if line.bumpy[segment] { LINE_WIDTH * 2.0 } else { 0.0 };
        frame.push(blit(
            Rect::new(src_x, atlas::HORIZON.y, LINE_WIDTH * 2.0, LINE_HEIGHT * 2.0),
            Rect::new(line.x[segment], line.y, LINE_WIDTH, LINE_HEIGHT),
        ));
    }
}

fn push_night(state: &GameState, frame: &mut Vec<DrawCommand>) {
    let night = &state.horizon.night;
    if night.opacity <= 0.0 {
        return;
    }

    if night.draw_stars {
        for star in &night.stars {
            frame.push(DrawCommand {
                src: Rect::new(
                    atlas::STAR.x,
                    atlas::STAR.y + STAR_SIZE * 2.0 * star.sprite_row as f32,
                    STAR_SIZE * 2.0,
                    STAR_SIZE * 2.0,
                ),
                dst: Rect::new(star.pos.x.round(), star.pos.y, STAR_SIZE, STAR_SIZE),
                opacity: night.opacity,
            });
        }
    }

    // Every phase draws at the full moon width
    let src_x = atlas::MOON.x + PHASES[night.current_phase] * 2.0;
    frame.push(DrawCommand {
        src: Rect::new(src_x, atlas::MOON.y, MOON_WIDTH * 2.0, MOON_HEIGHT * 2.0),
        dst: Rect::new(night.x.round(), night.y, MOON_WIDTH, MOON_HEIGHT),
        opacity: night.opacity,
    });
}

fn push_clouds(state: &GameState, frame: &mut Vec<DrawCommand>) {
    for c in &state.horizon.clouds {
        frame.push(blit(
            Rect::new(
                atlas::CLOUD.x,
                atlas::CLOUD.y,
                cloud::CLOUD_WIDTH * 2.0,
                cloud::CLOUD_HEIGHT * 2.0,
            ),
            Rect::new(c.pos.x, c.pos.y, cloud::CLOUD_WIDTH, cloud::CLOUD_HEIGHT),
        ));
    }
}

fn obstacle_atlas(kind: ObstacleKind) -> Vec2 {
    match kind {
        ObstacleKind::SmallCactus => atlas::CACTUS_SMALL,
        ObstacleKind::LargeCactus => atlas::CACTUS_LARGE,
        ObstacleKind::Pterodactyl => atlas::PTERODACTYL,
    }
}

fn obstacle_command(obstacle: &Obstacle) -> DrawCommand {
    let spec = obstacle.kind.spec();
    let source_width = spec.width * 2.0;
    let size = obstacle.size as f32;

    // Multi-unit sprites sit to the right of the single-unit art
    let mut src_x = (source_width * size) * (0.5 * (size - 1.0)) + obstacle_atlas(obstacle.kind).x;
    if obstacle.current_frame > 0 {
        src_x += source_width * obstacle.current_frame as f32;
    }

    blit(
        Rect::new(
            src_x,
            obstacle_atlas(obstacle.kind).y,
            source_width * size,
            spec.height * 2.0,
        ),
        Rect::new(obstacle.x, obstacle.y, obstacle.width, obstacle.height),
    )
}

fn player_command(state: &GameState) -> DrawCommand {
    let player = &state.player;
    let crashed = player.status == PlayerStatus::Crashed;
    // The crash pose always draws at the upright width
    let width = if player.ducking && !crashed {
        player.config.width_duck
    } else {
        player.config.width
    };

    blit(
        Rect::new(
            atlas::PLAYER.x + player.frame_offset() * 2.0,
            atlas::PLAYER.y,
            width * 2.0,
            player.config.height * 2.0,
        ),
        Rect::new(player.x, player.y, width, player.config.height),
    )
}

fn digit_command(slot: usize, glyph: u8, origin_x: f32, opacity: f32) -> DrawCommand {
    DrawCommand {
        src: Rect::new(
            atlas::TEXT.x + glyph as f32 * DIGIT_WIDTH * 2.0,
            atlas::TEXT.y,
            DIGIT_WIDTH * 2.0,
            DIGIT_HEIGHT * 2.0,
        ),
        dst: Rect::new(
            origin_x + slot as f32 * DIGIT_DEST_WIDTH,
            METER_Y,
            DIGIT_WIDTH,
            DIGIT_HEIGHT,
        ),
        opacity,
    }
}

fn push_score(state: &GameState, frame: &mut Vec<DrawCommand>) {
    let meter = &state.meter;
    let width = meter.digit_width();
    let origin_x = VIEWPORT_WIDTH - DIGIT_DEST_WIDTH * (width as f32 + 1.0);

    // Flash gating: during the "off" half of a celebration cycle the current
    // distance is simply not drawn
    if meter.paint {
        for (slot, digit) in meter.digits.iter().enumerate() {
            frame.push(digit_command(slot, *digit, origin_x, 1.0));
        }
    }

    if meter.high_score() > 0 {
        let hs_origin = origin_x - (width as f32 * 2.0) * DIGIT_WIDTH;
        for (slot, glyph) in HI_GLYPHS.iter().enumerate() {
            frame.push(digit_command(slot, *glyph, hs_origin, 0.8));
        }
        // One blank slot between the label and the digits
        for (slot, digit) in meter.high_score_digits().iter().enumerate() {
            frame.push(digit_command(slot + 3, *digit, hs_origin, 0.8));
        }
    }
}

fn push_game_over_panel(frame: &mut Vec<DrawCommand>) {
    let center_x = VIEWPORT_WIDTH / 2.0;

    frame.push(blit(
        Rect::new(
            atlas::TEXT.x,
            atlas::TEXT.y + PANEL_TEXT_Y * 2.0,
            PANEL_TEXT_WIDTH * 2.0,
            PANEL_TEXT_HEIGHT * 2.0,
        ),
        Rect::new(
            (center_x - PANEL_TEXT_WIDTH / 2.0).round(),
            ((VIEWPORT_HEIGHT - 25.0) / 3.0).round(),
            PANEL_TEXT_WIDTH,
            PANEL_TEXT_HEIGHT,
        ),
    ));

    frame.push(blit(
        Rect::new(
            atlas::RESTART.x,
            atlas::RESTART.y,
            RESTART_WIDTH * 2.0,
            RESTART_HEIGHT * 2.0,
        ),
        Rect::new(
            center_x - RESTART_WIDTH / 2.0,
            VIEWPORT_HEIGHT / 2.0,
            RESTART_WIDTH,
            RESTART_HEIGHT,
        ),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_frame_composition() {
        let state = GameState::new(1);
        let frame = compose(&state);

        // Two ground segments, one seed cloud, the character, five zeros
        assert_eq!(frame.len(), 2 + 1 + 1 + 5);
    }

    #[test]
    fn test_moon_drawn_only_at_night() {
        let mut state = GameState::new(2);
        let is_moon = |cmd: &DrawCommand| cmd.src.height == MOON_HEIGHT * 2.0;

        assert!(!compose(&state).iter().any(is_moon));

        state.horizon.night.opacity = 0.5;
        let frame = compose(&state);
        let moon = frame.iter().find(|cmd| is_moon(cmd)).expect("moon drawn");
        assert_eq!(moon.opacity, 0.5);
        assert_eq!(moon.src.width, MOON_WIDTH * 2.0);
    }

    #[test]
    fn test_high_score_prefixed_with_hi_glyphs() {
        let mut state = GameState::new(3);
        state.set_high_score(42);
        let frame = compose(&state);

        let hi_glyph_x = atlas::TEXT.x + 10.0 * DIGIT_WIDTH * 2.0;
        let hi = frame
            .iter()
            .find(|cmd| cmd.src.x == hi_glyph_x)
            .expect("HI glyph drawn");
        assert_eq!(hi.opacity, 0.8);

        // Label, spacer, then five digits
        let faded = frame.iter().filter(|cmd| cmd.opacity == 0.8).count();
        assert_eq!(faded, 2 + 5);
    }

    #[test]
    fn test_flash_off_phase_hides_distance_digits() {
        let mut state = GameState::new(4);
        state.meter.paint = false;
        let frame = compose(&state);

        let digit_strip = |cmd: &&DrawCommand| {
            cmd.src.y == atlas::TEXT.y
                && cmd.src.height == DIGIT_HEIGHT * 2.0
                && cmd.opacity == 1.0
        };
        assert_eq!(frame.iter().filter(digit_strip).count(), 0);
    }

    #[test]
    fn test_crash_adds_game_over_panel() {
        let mut state = GameState::new(5);
        let before = compose(&state).len();
        state.crashed = true;
        let frame = compose(&state);

        assert_eq!(frame.len(), before + 2);
        let restart = frame
            .iter()
            .find(|cmd| cmd.src.x == atlas::RESTART.x && cmd.src.y == atlas::RESTART.y)
            .expect("restart button drawn");
        assert_eq!(restart.dst.width, RESTART_WIDTH);
    }
}
