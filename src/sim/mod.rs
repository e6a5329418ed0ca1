//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per call, no wall-clock time
//! - Randomness only through the caller's RNG
//! - Stable iteration order (brick grid order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{WallContact, ball_overlaps_rect, bounce_off_walls, clamp_speed};
pub use state::{Ball, Brick, BrickColor, Carryover, GameState, Keys, Paddle, Spark};
pub use tick::advance;
