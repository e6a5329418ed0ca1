//! Game state and core simulation types
//!
//! A `GameState` is self-contained: the renderer reads it, input handlers
//! flip its key flags, and `advance` owns every other mutation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Brick colour, fixed per row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    DeepTeal,
    Teal,
    Cyan,
    Violet,
    Indigo,
}

impl BrickColor {
    /// Row colours from top to bottom
    pub const ROWS: [BrickColor; BRICK_ROWS] = [
        BrickColor::DeepTeal,
        BrickColor::Teal,
        BrickColor::Cyan,
        BrickColor::Violet,
        BrickColor::Indigo,
    ];

    pub fn for_row(row: usize) -> Self {
        Self::ROWS[row % Self::ROWS.len()]
    }

    /// sRGB bytes
    pub fn rgb(self) -> [u8; 3] {
        match self {
            BrickColor::DeepTeal => [0x00, 0x82, 0xaa],
            BrickColor::Teal => [0x00, 0xa8, 0xcc],
            BrickColor::Cyan => [0x00, 0xd4, 0xff],
            BrickColor::Violet => [0x7b, 0x4f, 0xff],
            BrickColor::Indigo => [0x55, 0x33, 0xcc],
        }
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Vec2::new(BALL_START_X, BALL_START_Y),
            vel: Vec2::new(BALL_START_VX, BALL_START_VY),
        }
    }
}

impl Ball {
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// The paddle. Only `x` moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: FIELD_WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
            y: PADDLE_Y,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }
}

impl Paddle {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Keep the paddle fully inside the field
    pub fn clamp_to_field(&mut self) {
        self.x = self.x.clamp(0.0, FIELD_WIDTH - self.width);
    }
}

/// A brick. Position and colour never change; `alive` only goes true -> false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub alive: bool,
    pub color: BrickColor,
}

impl Brick {
    pub fn at_cell(row: usize, col: usize) -> Self {
        Self {
            pos: Vec2::new(
                BRICK_LEFT + col as f32 * (BRICK_WIDTH + BRICK_GAP_X),
                BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP_Y),
            ),
            alive: true,
            color: BrickColor::for_row(row),
        }
    }

    pub fn size() -> Vec2 {
        Vec2::new(BRICK_WIDTH, BRICK_HEIGHT)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Self::size() / 2.0
    }
}

/// Directional input flags, written by input handlers only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    pub left: bool,
    pub right: bool,
}

/// A short-lived particle from a destroyed brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases every tick; removed once it reaches 0
    pub life: f32,
    pub color: BrickColor,
}

/// Fields that survive a brick-clear transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carryover {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub player_controlled: bool,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub ball: Ball,
    pub paddle: Paddle,
    /// Row-major, `BRICK_ROWS * BRICK_COLS` entries
    pub bricks: Vec<Brick>,
    pub score: u64,
    pub lives: u8,
    /// 1-based
    pub level: u32,
    /// True once a human took the paddle; false means autopilot
    pub player_controlled: bool,
    pub keys: Keys,
    pub sparks: Vec<Spark>,
    /// Tick counter, drives the hint blink only
    pub phase: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh level-1 state with a full brick wall
    pub fn new() -> Self {
        let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                bricks.push(Brick::at_cell(row, col));
            }
        }

        Self {
            ball: Ball::default(),
            paddle: Paddle::default(),
            bricks,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            player_controlled: false,
            keys: Keys::default(),
            sparks: Vec::new(),
            phase: 0,
        }
    }

    /// Replace every field with a fresh state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn alive_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    pub fn all_bricks_cleared(&self) -> bool {
        self.bricks.iter().all(|b| !b.alive)
    }

    /// Snapshot taken on brick-clear: next level, one bonus life (capped)
    pub fn carryover_for_next_level(&self) -> Carryover {
        Carryover {
            score: self.score,
            lives: (self.lives + 1).min(MAX_LIVES),
            level: self.level + 1,
            player_controlled: self.player_controlled,
        }
    }

    /// Fresh field with the carried-over progress applied and the serve
    /// sped up by `LEVEL_SPEEDUP` per level above the first
    pub fn start_level(&mut self, carry: Carryover) {
        self.reset();
        self.score = carry.score;
        self.lives = carry.lives;
        self.level = carry.level;
        self.player_controlled = carry.player_controlled;
        self.ball.vel *= level_speed_factor(self.level);
    }
}

/// Ball speed multiplier relative to level 1
pub fn level_speed_factor(level: u32) -> f32 {
    LEVEL_SPEEDUP.powi(level.saturating_sub(1) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new();
        assert_eq!(state.bricks.len(), 40);
        assert_eq!(state.alive_bricks(), 40);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert!(!state.player_controlled);
        assert_eq!(state.paddle.x, 128.0);
        assert_eq!(state.paddle.y, 216.0);
        assert!((state.ball.pos.y - 139.2).abs() < 1e-4);

        // Last brick of the first row, first brick of the last row
        assert_eq!(state.bricks[7].pos, Vec2::new(272.0, 20.0));
        assert_eq!(state.bricks[32].pos, Vec2::new(6.0, 92.0));
        assert_eq!(state.bricks[32].color, BrickColor::Indigo);
    }

    #[test]
    fn test_bricks_do_not_overlap() {
        let state = GameState::new();
        let size = Brick::size();
        for (i, a) in state.bricks.iter().enumerate() {
            for b in &state.bricks[i + 1..] {
                let overlap_x = a.pos.x < b.pos.x + size.x && b.pos.x < a.pos.x + size.x;
                let overlap_y = a.pos.y < b.pos.y + size.y && b.pos.y < a.pos.y + size.y;
                assert!(!(overlap_x && overlap_y), "{:?} overlaps {:?}", a.pos, b.pos);
            }
        }
    }

    #[test]
    fn test_carryover_caps_lives() {
        let mut state = GameState::new();
        state.lives = 5;
        state.score = 400;
        state.level = 3;
        state.player_controlled = true;

        let carry = state.carryover_for_next_level();
        assert_eq!(carry.lives, 5);
        assert_eq!(carry.level, 4);

        state.start_level(carry);
        assert_eq!(state.score, 400);
        assert_eq!(state.level, 4);
        assert!(state.player_controlled);
        assert_eq!(state.alive_bricks(), 40);

        let expected = Vec2::new(BALL_START_VX, BALL_START_VY) * 1.08f32.powi(3);
        assert!((state.ball.vel - expected).length() < 1e-4);
    }

    #[test]
    fn test_level_speed_factor() {
        assert_eq!(level_speed_factor(1), 1.0);
        assert!((level_speed_factor(2) - 1.08).abs() < 1e-6);
        assert!((level_speed_factor(3) - 1.1664).abs() < 1e-5);
    }
}
