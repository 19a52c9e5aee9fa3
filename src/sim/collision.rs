//! Collision detection and response
//!
//! Everything here is axis-aligned: the ball is tested either by its centre
//! (paddle) or by its bounding box (blocks), and the response is a sign flip
//! or an angle picked from where the ball met the paddle.

use glam::Vec2;

use crate::Rect;
use crate::consts::PADDLE_MAX_BOUNCE_DEG;

/// Playfield boundaries the ball crossed this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// Left or right wall
    pub side: bool,
    pub top: bool,
    /// Fell past the bottom edge
    pub floor: bool,
}

/// Check which playfield edges a ball overlaps
pub fn ball_wall_contact(pos: Vec2, radius: f32, width: f32, height: f32) -> WallContact {
    WallContact {
        side: pos.x + radius > width || pos.x - radius < 0.0,
        top: pos.y - radius < 0.0,
        floor: pos.y + radius > height,
    }
}

/// Where along the paddle the ball centre touched, in `[0, 1]`.
///
/// The centre must be strictly inside the paddle's horizontal span and the
/// ball must vertically overlap the paddle band.
pub fn ball_paddle_contact(pos: Vec2, radius: f32, paddle: &Rect) -> Option<f32> {
    let vertical = pos.y + radius > paddle.y && pos.y - radius < paddle.bottom();
    let horizontal = pos.x > paddle.x && pos.x < paddle.right();
    if vertical && horizontal {
        Some(((pos.x - paddle.x) / paddle.w).clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Launch angle in radians from vertical: 0 -> -60°, 0.5 -> 0°, 1 -> +60°
#[inline]
pub fn launch_angle(hit_position: f32) -> f32 {
    let max = PADDLE_MAX_BOUNCE_DEG;
    (-max + 2.0 * max * hit_position.clamp(0.0, 1.0)).to_radians()
}

/// Velocity leaving the paddle; always travels upward
pub fn paddle_bounce(hit_position: f32, speed: f32) -> Vec2 {
    let angle = launch_angle(hit_position);
    let dx = speed * angle.sin();
    let dy = -speed * angle.cos();
    Vec2::new(dx, -dy.abs())
}

/// Ball bounding box against a block
#[inline]
pub fn ball_rect_overlap(pos: Vec2, radius: f32, rect: &Rect) -> bool {
    let bounds = Rect::new(pos.x - radius, pos.y - radius, radius * 2.0, radius * 2.0);
    bounds.overlaps(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_launch_angle_extremes() {
        assert!((launch_angle(0.0) - (-60f32).to_radians()).abs() < EPS);
        assert!((launch_angle(1.0) - 60f32.to_radians()).abs() < EPS);
        assert!(launch_angle(0.5).abs() < EPS);
    }

    #[test]
    fn test_paddle_bounce_center_is_straight_up() {
        let v = paddle_bounce(0.5, 5.0);
        assert!(v.x.abs() < EPS);
        assert!((v.y + 5.0).abs() < EPS);
    }

    #[test]
    fn test_paddle_bounce_edges() {
        let left = paddle_bounce(0.0, 5.0);
        assert!(left.x < 0.0);
        assert!(left.y < 0.0);
        let right = paddle_bounce(1.0, 5.0);
        assert!(right.x > 0.0);
        assert!((left.x + right.x).abs() < EPS);
    }

    #[test]
    fn test_wall_contact() {
        let contact = ball_wall_contact(Vec2::new(5.0, 300.0), 10.0, 780.0, 600.0);
        assert!(contact.side);
        assert!(!contact.top);
        assert!(!contact.floor);

        let contact = ball_wall_contact(Vec2::new(400.0, 595.0), 10.0, 780.0, 600.0);
        assert!(contact.floor);

        // Exactly touching is not a contact
        let contact = ball_wall_contact(Vec2::new(10.0, 10.0), 10.0, 780.0, 600.0);
        assert_eq!(contact, WallContact::default());
    }

    #[test]
    fn test_paddle_contact() {
        let paddle = Rect::new(100.0, 575.0, 100.0, 15.0);
        assert_eq!(
            ball_paddle_contact(Vec2::new(150.0, 570.0), 10.0, &paddle),
            Some(0.5)
        );
        // Centre outside the span misses, even if the radius overlaps
        assert_eq!(ball_paddle_contact(Vec2::new(95.0, 570.0), 10.0, &paddle), None);
        // Too high above the paddle
        assert_eq!(ball_paddle_contact(Vec2::new(150.0, 560.0), 10.0, &paddle), None);
    }

    #[test]
    fn test_ball_rect_overlap() {
        let block = Rect::new(35.0, 60.0, 80.0, 30.0);
        assert!(ball_rect_overlap(Vec2::new(50.0, 95.0), 10.0, &block));
        assert!(!ball_rect_overlap(Vec2::new(50.0, 100.0), 10.0, &block));
        assert!(!ball_rect_overlap(Vec2::new(25.0, 75.0), 10.0, &block)); // touching
    }

    proptest! {
        #[test]
        fn prop_bounce_is_upward_at_target_speed(hit in 0.0f32..=1.0, speed in 1.0f32..20.0) {
            let v = paddle_bounce(hit, speed);
            prop_assert!(v.y < 0.0);
            prop_assert!((v.length() - speed).abs() < 1e-3);
        }

        #[test]
        fn prop_angle_stays_within_sixty_degrees(hit in -1.0f32..2.0) {
            let angle = launch_angle(hit).to_degrees();
            prop_assert!((-60.0 - EPS..=60.0 + EPS).contains(&angle));
        }

        #[test]
        fn prop_contact_position_in_unit_range(x in 0.0f32..780.0, y in 550.0f32..600.0) {
            let paddle = Rect::new(300.0, 575.0, 100.0, 15.0);
            if let Some(hit) = ball_paddle_contact(Vec2::new(x, y), 10.0, &paddle) {
                prop_assert!((0.0..=1.0).contains(&hit));
            }
        }
    }
}
