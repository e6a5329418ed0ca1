//! Collision detection and response
//!
//! Everything in the field is axis-aligned: the ball is tested as its
//! bounding box (center +- radius) against walls, the paddle and bricks.

use glam::Vec2;

use super::state::{Ball, Brick, Paddle};
use crate::consts::*;

/// Which field boundaries the ball was pushed back from this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top
    }
}

/// Clamp the ball inside the side walls and under the HUD strip, turning
/// the velocity inward on contact. The bottom is open.
pub fn bounce_off_walls(ball: &mut Ball) -> WallContact {
    let mut contact = WallContact::default();

    if ball.pos.x <= BALL_RADIUS {
        ball.pos.x = BALL_RADIUS;
        ball.vel.x = ball.vel.x.abs();
        contact.left = true;
    }
    if ball.pos.x >= FIELD_WIDTH - BALL_RADIUS {
        ball.pos.x = FIELD_WIDTH - BALL_RADIUS;
        ball.vel.x = -ball.vel.x.abs();
        contact.right = true;
    }
    let ceiling = BALL_RADIUS + HUD_HEIGHT;
    if ball.pos.y <= ceiling {
        ball.pos.y = ceiling;
        ball.vel.y = ball.vel.y.abs();
        contact.top = true;
    }

    contact
}

/// Normalized hit offset if a descending ball touches the paddle
///
/// Returns `(ball_x - paddle_x) / paddle_width - 0.5`: about -0.5 at the left
/// edge, 0 at the center, 0.5 at the right edge (slightly beyond with the
/// forgiveness margin).
pub fn paddle_contact(ball: &Ball, paddle: &Paddle) -> Option<f32> {
    if ball.vel.y <= 0.0 {
        return None;
    }

    let overlaps_y =
        ball.pos.y + BALL_RADIUS >= paddle.y && ball.pos.y - BALL_RADIUS <= paddle.y + paddle.height;
    let overlaps_x = ball.pos.x >= paddle.x - PADDLE_MARGIN
        && ball.pos.x <= paddle.x + paddle.width + PADDLE_MARGIN;

    if overlaps_y && overlaps_x {
        Some((ball.pos.x - paddle.x) / paddle.width - 0.5)
    } else {
        None
    }
}

/// Outgoing velocity after a paddle hit: always upward, horizontal component
/// taken from where the ball landed, overall speed capped
pub fn deflect_from_paddle(vel: Vec2, hit_offset: f32) -> Vec2 {
    let deflected = Vec2::new(hit_offset * PADDLE_DEFLECTION, -vel.y.abs());
    clamp_speed(deflected, BALL_MAX_SPEED)
}

/// Uniformly rescale `vel` so its length does not exceed `max_speed`
#[inline]
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max_speed {
        vel * (max_speed / speed)
    } else {
        vel
    }
}

/// Strict overlap between the ball's bounding box and a rectangle
#[inline]
pub fn ball_overlaps_rect(center: Vec2, radius: f32, min: Vec2, size: Vec2) -> bool {
    center.x + radius > min.x
        && center.x - radius < min.x + size.x
        && center.y + radius > min.y
        && center.y - radius < min.y + size.y
}

/// Index of the first alive brick (in grid order) the ball overlaps
pub fn first_brick_hit(ball: &Ball, bricks: &[Brick]) -> Option<usize> {
    let size = Brick::size();
    bricks
        .iter()
        .position(|b| b.alive && ball_overlaps_rect(ball.pos, BALL_RADIUS, b.pos, size))
}

/// True once the ball has dropped far enough below the field to cost a life
#[inline]
pub fn ball_lost(ball: &Ball) -> bool {
    ball.pos.y > FIELD_HEIGHT + BOTTOM_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        Ball {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
        }
    }

    #[test]
    fn test_left_wall_reflects_inward() {
        let mut ball = ball_at(-3.0, 100.0, -2.0, 1.0);
        let contact = bounce_off_walls(&mut ball);
        assert!(contact.left && !contact.right && !contact.top);
        assert_eq!(ball.pos.x, BALL_RADIUS);
        assert_eq!(ball.vel.x, 2.0);
        assert_eq!(ball.vel.y, 1.0);
    }

    #[test]
    fn test_right_wall_reflects_inward() {
        let mut ball = ball_at(330.0, 100.0, 3.0, 0.0);
        assert!(bounce_off_walls(&mut ball).right);
        assert_eq!(ball.pos.x, FIELD_WIDTH - BALL_RADIUS);
        assert_eq!(ball.vel.x, -3.0);
    }

    #[test]
    fn test_ceiling_sits_under_hud() {
        let mut ball = ball_at(100.0, 10.0, 1.0, -2.5);
        assert!(bounce_off_walls(&mut ball).top);
        assert_eq!(ball.pos.y, 18.0);
        assert_eq!(ball.vel.y, 2.5);
    }

    #[test]
    fn test_no_contact_mid_field() {
        let mut ball = ball_at(160.0, 120.0, 2.0, 2.0);
        let before = ball;
        assert!(!bounce_off_walls(&mut ball).any());
        assert_eq!(ball, before);
    }

    #[test]
    fn test_paddle_contact_requires_descent() {
        let paddle = Paddle::default();
        let rising = ball_at(paddle.center_x(), paddle.y, 0.0, -2.0);
        assert_eq!(paddle_contact(&rising, &paddle), None);

        let falling = ball_at(paddle.center_x(), paddle.y, 0.0, 2.0);
        let hit = paddle_contact(&falling, &paddle).expect("center hit");
        assert!(hit.abs() < 1e-6);
    }

    #[test]
    fn test_paddle_forgiveness_margin() {
        let paddle = Paddle::default();
        let just_inside = ball_at(paddle.x - 2.0, paddle.y, 0.0, 1.0);
        assert!(paddle_contact(&just_inside, &paddle).is_some());

        let outside = ball_at(paddle.x - 2.5, paddle.y, 0.0, 1.0);
        assert!(paddle_contact(&outside, &paddle).is_none());
    }

    #[test]
    fn test_paddle_edges_steer_ball() {
        let left = deflect_from_paddle(Vec2::new(0.0, 3.0), -0.5);
        let right = deflect_from_paddle(Vec2::new(0.0, 3.0), 0.5);
        assert!(left.x < -3.0 && left.y < 0.0);
        assert!(right.x > 3.0 && right.y < 0.0);
    }

    #[test]
    fn test_clamp_speed_rescales_uniformly() {
        let vel = clamp_speed(Vec2::new(6.0, -8.0), 6.5);
        assert!((vel.length() - 6.5).abs() < 1e-5);
        assert!((vel.x / vel.y - 6.0 / -8.0).abs() < 1e-6);

        let slow = Vec2::new(1.0, -1.0);
        assert_eq!(clamp_speed(slow, 6.5), slow);
    }

    #[test]
    fn test_brick_overlap_is_strict() {
        let brick = Brick::at_cell(0, 0);
        // Touching the left edge exactly does not count
        let touching = ball_at(brick.pos.x - BALL_RADIUS, brick.center().y, 0.0, 0.0);
        assert_eq!(first_brick_hit(&touching, &[brick]), None);

        let inside = ball_at(brick.pos.x - BALL_RADIUS + 0.5, brick.center().y, 0.0, 0.0);
        assert_eq!(first_brick_hit(&inside, &[brick]), Some(0));
    }

    #[test]
    fn test_first_brick_hit_skips_dead() {
        let mut a = Brick::at_cell(0, 0);
        let b = Brick::at_cell(0, 1);
        a.alive = false;
        let ball = ball_at(43.0, 27.0, 0.0, 0.0);
        assert_eq!(first_brick_hit(&ball, &[a, b]), Some(1));
    }

    #[test]
    fn test_ball_lost_below_margin() {
        assert!(!ball_lost(&ball_at(100.0, 260.0, 0.0, 1.0)));
        assert!(ball_lost(&ball_at(100.0, 260.5, 0.0, 1.0)));
    }
}
