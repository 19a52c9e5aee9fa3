//! Shape generation for 2D primitives
//!
//! Everything is emitted in playfield pixels (top-left origin, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors, rgb};
use crate::Rect;
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::sim::{Block, GameState, PowerupKind};
use crate::sim::laser::muzzle_offsets;

/// Side of the square blaster nubs drawn on the paddle
const BLASTER_NUB: f32 = 5.0;

/// Generate vertices for a filled rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    quad(
        Vec2::new(r.x, r.y),
        Vec2::new(r.right(), r.y),
        Vec2::new(r.right(), r.bottom()),
        Vec2::new(r.x, r.bottom()),
        color,
    )
}

/// Generate vertices for a rectangle border drawn inside `r`
pub fn rect_outline(r: &Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(r.w / 2.0).min(r.h / 2.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(&Rect::new(r.x, r.y, r.w, t), color));
    vertices.extend(rect(&Rect::new(r.x, r.bottom() - t, r.w, t), color));
    vertices.extend(rect(&Rect::new(r.x, r.y + t, t, r.h - 2.0 * t), color));
    vertices.extend(rect(&Rect::new(r.right() - t, r.y + t, t, r.h - 2.0 * t), color));
    vertices
}

/// Two triangles through four corners in order
pub fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(from + perp, to + perp, to - perp, from - perp, color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Crack lines for a damaged block; more hits, more damage
pub fn block_cracks(block: &Block) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    if !block.is_cracked() {
        return vertices;
    }
    let r = &block.rect;
    let at = |fx: f32, fy: f32| Vec2::new(r.x + r.w * fx, r.y + r.h * fy);

    // First impact: a small web
    let c = at(0.3, 0.4);
    for (to, width) in [
        (c + Vec2::new(25.0, 0.0), 1.0),
        (c + Vec2::new(20.0, -15.0), 1.0),
        (c + Vec2::new(15.0, 12.0), 1.0),
        (c + Vec2::new(-10.0, -10.0), 1.0),
        (c + Vec2::new(-15.0, 0.0), 1.0),
    ] {
        vertices.extend(line(c, to, width, colors::CRACK));
    }
    vertices.extend(line(
        c + Vec2::new(15.0, 0.0),
        c + Vec2::new(12.0, -8.0),
        0.5,
        colors::CRACK,
    ));
    vertices.extend(line(
        c + Vec2::new(5.0, 0.0),
        c + Vec2::new(8.0, 5.0),
        0.5,
        colors::CRACK,
    ));

    if block.hits >= 2 {
        let c2 = at(0.7, 0.6);
        for offset in [
            Vec2::new(25.0, 10.0),
            Vec2::new(-20.0, 5.0),
            Vec2::new(-10.0, -15.0),
            Vec2::new(5.0, -10.0),
        ] {
            vertices.extend(line(c2, c2 + offset, 1.5, colors::CRACK));
        }
        // Joins the two impacts
        vertices.extend(line(
            c + Vec2::new(15.0, 0.0),
            c2 - Vec2::new(15.0, 0.0),
            1.5,
            colors::CRACK,
        ));
        vertices.extend(quad(
            c2,
            c2 + Vec2::new(15.0, 5.0),
            c2 + Vec2::new(10.0, 15.0),
            c2 + Vec2::new(-5.0, 10.0),
            colors::DAMAGE_SHADE,
        ));
        for (offset, radius) in [
            (Vec2::new(15.0, 5.0), 1.0),
            (Vec2::new(-10.0, 3.0), 1.5),
            (Vec2::new(5.0, -5.0), 1.0),
        ] {
            vertices.extend(circle(c2 + offset, radius, colors::DEBRIS, 6));
        }
    }

    vertices
}

pub fn powerup_color(kind: PowerupKind) -> [f32; 4] {
    match kind {
        PowerupKind::Blasters => colors::POWERUP_BLASTERS,
        PowerupKind::Small => colors::POWERUP_SMALL,
        PowerupKind::Big => colors::POWERUP_BIG,
    }
}

/// Tessellate a whole frame, back to front
pub fn frame_vertices(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(4096);

    for block in state.blocks.iter().filter(|b| b.visible) {
        vertices.extend(rect(&block.rect, rgb(block.color)));
        vertices.extend(rect_outline(&block.rect, 1.0, colors::BLOCK_OUTLINE));
        vertices.extend(block_cracks(block));
    }

    let paddle = &state.paddle;
    vertices.extend(rect(&paddle.rect(), colors::PADDLE));

    // Nubs sit above the paddle where each laser leaves
    for dx in muzzle_offsets(state.active.blaster_level, paddle.width()) {
        let nub = Rect::new(paddle.x + dx, paddle.y - BLASTER_NUB, BLASTER_NUB, BLASTER_NUB);
        vertices.extend(rect(&nub, colors::BLASTER));
    }

    vertices.extend(circle(state.ball.pos, state.ball.radius, colors::BALL, 24));

    for powerup in &state.powerups {
        vertices.extend(rect(&powerup.rect, powerup_color(powerup.kind)));
        vertices.extend(rect_outline(&powerup.rect, 1.0, colors::POWERUP_OUTLINE));
    }

    for laser in &state.lasers {
        vertices.extend(rect(&laser.rect, colors::LASER));
    }

    if state.phase.is_terminal() {
        let field = Rect::new(0.0, 0.0, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
        vertices.extend(rect(&field, colors::OVERLAY));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BlasterLevel, GamePhase, Laser, Powerup};
    use crate::tuning::{Difficulty, Tuning};

    fn state() -> GameState {
        GameState::new(3, Difficulty::Medium, &Tuning::default())
    }

    #[test]
    fn test_rect_covers_corners() {
        let vertices = rect(&Rect::new(10.0, 20.0, 30.0, 40.0), colors::LASER);
        assert_eq!(vertices.len(), 6);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_cracks_by_stage() {
        let mut block = state().blocks[32].clone();
        assert!(block_cracks(&block).is_empty());

        block.hits = 1;
        let first = block_cracks(&block).len();
        assert!(first > 0);

        block.hits = 2;
        assert!(block_cracks(&block).len() > first);

        block.visible = false;
        assert!(block_cracks(&block).is_empty());
    }

    #[test]
    fn test_hidden_blocks_are_not_drawn() {
        let mut state = state();
        let full = frame_vertices(&state).len();
        state.blocks[0].visible = false;
        // Fill plus four border strips
        assert_eq!(frame_vertices(&state).len(), full - 30);
    }

    #[test]
    fn test_blasters_lasers_and_overlay() {
        let mut state = state();
        let base = frame_vertices(&state).len();

        state.active.blaster_level = BlasterLevel::Double;
        assert_eq!(frame_vertices(&state).len(), base + 4 * 6);

        state.lasers.push(Laser::new(100.0, 300.0));
        state.powerups.push(Powerup::from_block(&state.blocks[0].rect, PowerupKind::Big));
        assert_eq!(frame_vertices(&state).len(), base + 4 * 6 + 6 + 30);

        state.phase = GamePhase::GameOver;
        let vertices = frame_vertices(&state);
        assert_eq!(vertices.last().map(|v| v.color), Some(colors::OVERLAY));
    }
}
