//! Keyboard and drag input
//!
//! Handlers only flip flags on the game state, the mode switch and the
//! handheld pose; `advance` picks the flags up on its next tick.

use glam::Vec2;

use super::context::SiteContext;
use crate::camera::HandheldPose;
use crate::sim::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }

    pub fn is_directional(self) -> bool {
        matches!(self, Key::Left | Key::Right)
    }
}

/// What a handler did, for the host to decide on default actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    Ignored,
    /// A direction flag changed
    Steered,
    /// The game entered or left Active mode
    ModeChanged,
}

/// Directional keys take the paddle and enter Active mode in the same call
pub fn key_down(key: Key, game: &mut GameState, ctx: &mut SiteContext) -> InputEffect {
    match key {
        Key::Left | Key::Right => {
            game.player_controlled = true;
            let was_playing = ctx.is_playing();
            ctx.start_playing();
            set_key(game, key, true);
            if was_playing {
                InputEffect::Steered
            } else {
                InputEffect::ModeChanged
            }
        }
        Key::Escape => {
            if ctx.is_playing() {
                ctx.stop_playing(game);
                InputEffect::ModeChanged
            } else {
                InputEffect::Ignored
            }
        }
    }
}

pub fn key_up(key: Key, game: &mut GameState) -> InputEffect {
    if key.is_directional() {
        set_key(game, key, false);
        InputEffect::Steered
    } else {
        InputEffect::Ignored
    }
}

fn set_key(game: &mut GameState, key: Key, down: bool) {
    match key {
        Key::Left => game.keys.left = down,
        Key::Right => game.keys.right = down,
        Key::Escape => {}
    }
}

/// Start rotating the handheld. Ignored while playing and when the press
/// landed on a button, link or form control.
pub fn pointer_down(
    pose: &mut HandheldPose,
    ctx: &SiteContext,
    at: Vec2,
    on_interactive: bool,
) -> InputEffect {
    if ctx.is_playing() || on_interactive {
        return InputEffect::Ignored;
    }
    pose.begin_drag(at);
    InputEffect::Steered
}

pub fn pointer_move(pose: &mut HandheldPose, ctx: &SiteContext, at: Vec2) -> InputEffect {
    if !pose.is_dragging() || ctx.is_playing() {
        return InputEffect::Ignored;
    }
    pose.drag_to(at);
    InputEffect::Steered
}

pub fn pointer_up(pose: &mut HandheldPose) {
    pose.end_drag();
}
