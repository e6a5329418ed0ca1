//! Game screen compositor
//!
//! Draws one `GameState` onto the 320x240 canvas, back to front: background,
//! scanlines, HUD strip, bricks, sparks, paddle, ball, border, hint.

use super::canvas::{Canvas, Color};
use super::font;
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GameState, Spark};

pub const BACKGROUND: Color = Color::hex(0x04080f);
const SCANLINE: Color = Color::rgba(0, 0, 0, 0.11);
const SCANLINE_PITCH: usize = 3;

const HUD_STRIP_HEIGHT: f32 = 14.0;
const HUD_FILL: Color = Color::rgba(0, 18, 32, 0.9);
const HUD_RULE: Color = Color::rgba(0, 130, 170, 0.45);
const HUD_BASELINE: i32 = 10;
const SCORE_COLOR: Color = Color::hex(0x0082aa);
const LEVEL_COLOR: Color = Color::hex(0x00d4ff);
const LIVES_COLOR: Color = Color::hex(0x7b4fff);

const BRICK_HIGHLIGHT: Color = Color::rgba(255, 255, 255, 0.17);
/// `#rrggbb88`
const BRICK_OUTLINE_ALPHA: f32 = 136.0 / 255.0;

const SPARK_SIZE: f32 = 4.0;

const PADDLE_EDGE: [u8; 3] = [0x00, 0x50, 0x70];
const PADDLE_CORE: [u8; 3] = [0x00, 0xd4, 0xff];
const PADDLE_SHINE: Color = Color::rgba(255, 255, 255, 0.25);

const BALL_GLOW_RADIUS: f32 = 16.0;
const BALL_GLOW: Color = Color::rgba(0, 212, 255, 0.4);

const BORDER: Color = Color::rgba(0, 130, 170, 0.2);
const BORDER_INSET: f32 = 2.0;

pub const HINT_TEXT: &str = "← → TAKE CONTROL, USE ARROW KEYS TO PLAY";
const HINT_COLOR: Color = Color::rgba(0, 212, 255, 0.5);

/// Blink the control hint while the autopilot has the paddle
pub fn hint_visible(state: &GameState) -> bool {
    !state.player_controlled && state.phase % HINT_CYCLE < HINT_VISIBLE_TICKS
}

pub fn draw_game(canvas: &mut Canvas, state: &GameState, settings: &Settings) {
    canvas.fill(BACKGROUND);

    if settings.scanlines {
        for y in (0..FIELD_HEIGHT as i32).step_by(SCANLINE_PITCH) {
            canvas.hline(y, 0, FIELD_WIDTH as i32, SCANLINE);
        }
    }

    draw_hud(canvas, state);
    draw_bricks(canvas, state, settings.glow);
    for spark in &state.sparks {
        draw_spark(canvas, spark, settings.glow);
    }
    draw_paddle(canvas, state, settings.glow);
    draw_ball(canvas, state, settings.glow);

    canvas.stroke_rect(
        BORDER_INSET,
        BORDER_INSET,
        FIELD_WIDTH - 2.0 * BORDER_INSET,
        FIELD_HEIGHT - 2.0 * BORDER_INSET,
        BORDER,
    );

    if settings.show_hint && hint_visible(state) {
        let x = (FIELD_WIDTH as i32 - font::text_width(HINT_TEXT)) / 2;
        canvas.text(x, FIELD_HEIGHT as i32 - 5, HINT_TEXT, HINT_COLOR);
    }
}

fn draw_hud(canvas: &mut Canvas, state: &GameState) {
    canvas.fill_rect(0.0, 0.0, FIELD_WIDTH, HUD_STRIP_HEIGHT, HUD_FILL);
    canvas.hline(HUD_STRIP_HEIGHT as i32, 0, FIELD_WIDTH as i32, HUD_RULE);

    canvas.text(6, HUD_BASELINE, &format!("SCORE {}", state.score), SCORE_COLOR);
    canvas.text(
        FIELD_WIDTH as i32 / 2 - 10,
        HUD_BASELINE,
        &format!("LV {}", state.level),
        LEVEL_COLOR,
    );
    let hearts = "♥".repeat(state.lives as usize);
    canvas.text(FIELD_WIDTH as i32 - 52, HUD_BASELINE, &hearts, LIVES_COLOR);
}

fn draw_bricks(canvas: &mut Canvas, state: &GameState, glow: bool) {
    for brick in state.bricks.iter().filter(|b| b.alive) {
        let color = Color::from_rgb(brick.color.rgb());
        let (x, y) = (brick.pos.x, brick.pos.y);

        canvas.fill_rect(x + 1.0, y + 1.0, BRICK_WIDTH - 2.0, BRICK_HEIGHT - 2.0, color);
        canvas.fill_rect(x + 1.0, y + 1.0, BRICK_WIDTH - 2.0, 3.0, BRICK_HIGHLIGHT);
        if glow {
            canvas.glow_rect(x, y, BRICK_WIDTH, BRICK_HEIGHT, 3.0, color.with_alpha(0.35));
        }
        canvas.stroke_rect(
            x,
            y,
            BRICK_WIDTH,
            BRICK_HEIGHT,
            color.with_alpha(BRICK_OUTLINE_ALPHA),
        );
    }
}

fn draw_spark(canvas: &mut Canvas, spark: &Spark, glow: bool) {
    let color = Color::from_rgb(spark.color.rgb()).with_alpha(spark.life.clamp(0.0, 1.0));
    let half = SPARK_SIZE / 2.0;
    let (x, y) = (spark.pos.x - half, spark.pos.y - half);
    if glow {
        canvas.glow_rect(x, y, SPARK_SIZE, SPARK_SIZE, 4.0, color.fade(0.5));
    }
    canvas.fill_rect(x, y, SPARK_SIZE, SPARK_SIZE, color);
}

fn draw_paddle(canvas: &mut Canvas, state: &GameState, glow: bool) {
    let p = &state.paddle;
    if glow {
        canvas.glow_rect(p.x, p.y, p.width, p.height, 5.0, Color::from_rgb(PADDLE_CORE).with_alpha(0.45));
    }
    canvas.horizontal_gradient_rect(
        p.x,
        p.y,
        p.width,
        p.height,
        &[(0.0, PADDLE_EDGE), (0.5, PADDLE_CORE), (1.0, PADDLE_EDGE)],
    );
    canvas.fill_rect(p.x + 3.0, p.y + 1.0, p.width - 6.0, 3.0, PADDLE_SHINE);
}

fn draw_ball(canvas: &mut Canvas, state: &GameState, glow: bool) {
    let pos = state.ball.pos;
    canvas.radial_glow(pos.x, pos.y, BALL_GLOW_RADIUS, BALL_GLOW);
    if glow {
        canvas.radial_glow(pos.x, pos.y, BALL_RADIUS + 6.0, Color::from_rgb(PADDLE_CORE).with_alpha(0.5));
    }
    canvas.fill_circle(pos.x, pos.y, BALL_RADIUS, Color::WHITE);
}
