//! Handheld Breakout - the arcade toy on the landing page's handheld console
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring, levels)
//! - `mode`: Idle/Active play mode switch with change notification
//! - `camera`: Scroll-driven camera rig and the handheld's decorative pose
//! - `renderer`: Software framebuffer drawing plus WebGPU presentation
//! - `platform`: Frame scheduling, input mapping, shared page telemetry
//! - `settings`: Presentation preferences

pub mod camera;
pub mod mode;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use mode::{Mode, ModeSwitch};
pub use settings::{CameraSettings, Settings, SettingsError};

/// Game configuration constants
///
/// Motion is expressed in field units per tick; there is no time delta.
pub mod consts {
    /// Logical field dimensions (also the framebuffer resolution)
    pub const FIELD_WIDTH: f32 = 320.0;
    pub const FIELD_HEIGHT: f32 = 240.0;
    /// Height of the HUD strip the ball bounces under
    pub const HUD_HEIGHT: f32 = 13.0;
    /// How far below the field the ball may fall before a life is lost
    pub const BOTTOM_MARGIN: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 5.0;
    pub const BALL_START_X: f32 = FIELD_WIDTH / 2.0;
    pub const BALL_START_Y: f32 = FIELD_HEIGHT * 0.58;
    pub const BALL_START_VX: f32 = 2.4;
    pub const BALL_START_VY: f32 = -2.9;
    /// Re-serve after a lost life
    pub const BALL_RESPAWN_Y: f32 = FIELD_HEIGHT * 0.55;
    pub const BALL_RESPAWN_VY: f32 = -2.9;
    pub const BALL_RESPAWN_MIN_VX: f32 = 2.0;
    /// Speed cap applied after a paddle bounce (units/tick)
    pub const BALL_MAX_SPEED: f32 = 6.5;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 64.0;
    pub const PADDLE_HEIGHT: f32 = 9.0;
    pub const PADDLE_Y: f32 = FIELD_HEIGHT - 24.0;
    pub const PADDLE_SPEED: f32 = 5.5;
    /// Fraction of the gap the autopilot closes each tick
    pub const PADDLE_AI_EASING: f32 = 0.075;
    /// Horizontal forgiveness on each side of the paddle
    pub const PADDLE_MARGIN: f32 = 2.0;
    /// Horizontal velocity at the paddle edges is +-half of this
    pub const PADDLE_DEFLECTION: f32 = 7.0;

    /// Brick grid
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_COLS: usize = 8;
    pub const BRICK_WIDTH: f32 = 36.0;
    pub const BRICK_HEIGHT: f32 = 14.0;
    pub const BRICK_LEFT: f32 = 6.0;
    pub const BRICK_TOP: f32 = 20.0;
    pub const BRICK_GAP_X: f32 = 2.0;
    pub const BRICK_GAP_Y: f32 = 4.0;
    pub const BRICK_POINTS: u64 = 10;

    /// Spark bursts
    pub const SPARKS_PER_BRICK: usize = 7;
    pub const SPARK_SPREAD: f32 = 5.0;
    pub const SPARK_DECAY: f32 = 0.055;

    /// Lives and levels
    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;
    pub const LEVEL_SPEEDUP: f32 = 1.08;

    /// Blinking control hint: visible for the first part of every cycle
    pub const HINT_CYCLE: u64 = 100;
    pub const HINT_VISIBLE_TICKS: u64 = 65;
}
