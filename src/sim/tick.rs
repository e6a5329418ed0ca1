//! Fixed-rate simulation tick
//!
//! One call advances the game by exactly one tick. Motion is in units per
//! tick, so a run is reproducible from the starting state, the key flags and
//! the random source alone.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    ball_lost, bounce_off_walls, deflect_from_paddle, first_brick_hit, paddle_contact,
};
use super::state::{GameState, Spark};
use crate::consts::*;

/// Advance the game state by one tick
///
/// Stages run in a fixed order and each sees the positions written by the
/// stages before it.
pub fn advance<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    state.phase += 1;

    steer_paddle(state);

    state.ball.pos += state.ball.vel;
    bounce_off_walls(&mut state.ball);

    if let Some(hit) = paddle_contact(&state.ball, &state.paddle) {
        state.ball.vel = deflect_from_paddle(state.ball.vel, hit);
    }

    if ball_lost(&state.ball) {
        state.lives = state.lives.saturating_sub(1);
        if state.lives == 0 {
            log::info!(
                "Game over at level {} with score {}, starting over",
                state.level,
                state.score
            );
            state.reset();
            return;
        }
        log::debug!("Ball lost, {} lives left", state.lives);
        reserve_ball(state, rng);
    }

    break_first_brick(state, rng);

    update_sparks(state);

    if state.all_bricks_cleared() {
        let carry = state.carryover_for_next_level();
        log::info!(
            "Level {} cleared (score {}), advancing to level {}",
            state.level,
            carry.score,
            carry.level
        );
        state.start_level(carry);
    }
}

/// Human control moves at a fixed speed per held key; the autopilot eases
/// toward the ball and deliberately lags behind it
fn steer_paddle(state: &mut GameState) {
    let paddle = &mut state.paddle;
    if state.player_controlled {
        if state.keys.left {
            paddle.x -= PADDLE_SPEED;
        }
        if state.keys.right {
            paddle.x += PADDLE_SPEED;
        }
    } else {
        let target = state.ball.pos.x - paddle.width / 2.0;
        paddle.x += (target - paddle.x) * PADDLE_AI_EASING;
    }
    paddle.clamp_to_field();
}

/// Put the ball back in play after a lost life, serving up at a random angle
fn reserve_ball<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let direction = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
    let vx = direction * (BALL_RESPAWN_MIN_VX + rng.random::<f32>());

    state.ball.pos = Vec2::new(FIELD_WIDTH / 2.0, BALL_RESPAWN_Y);
    state.ball.vel = Vec2::new(vx, BALL_RESPAWN_VY);
}

/// Destroy at most one brick per tick: the first overlapping one in grid order
fn break_first_brick<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let Some(index) = first_brick_hit(&state.ball, &state.bricks) else {
        return;
    };

    let brick = &mut state.bricks[index];
    brick.alive = false;
    let (center, color) = (brick.center(), brick.color);

    state.ball.vel.y = -state.ball.vel.y;
    state.score += BRICK_POINTS;

    for _ in 0..SPARKS_PER_BRICK {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * SPARK_SPREAD,
            (rng.random::<f32>() - 0.5) * SPARK_SPREAD,
        );
        state.sparks.push(Spark {
            pos: center,
            vel,
            life: 1.0,
            color,
        });
    }
}

fn update_sparks(state: &mut GameState) {
    for spark in state.sparks.iter_mut() {
        spark.pos += spark.vel;
        spark.life -= SPARK_DECAY;
    }
    state.sparks.retain(|s| s.life > 0.0);
}
