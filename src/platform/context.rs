//! Page-session state shared by the game driver and the camera
//!
//! One `SiteContext` exists per page. Scroll and pointer handlers write it,
//! the frame loop reads it. The play-mode flag lives here too so the camera,
//! the scroll lock and the paddle all agree on a single owner.

use glam::Vec2;

use crate::mode::{ListenerId, Mode, ModeSwitch};
use crate::sim::GameState;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollTelemetry {
    /// 0-1 across the whole page
    pub progress: f32,
    /// Scroll offset in CSS pixels
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerTelemetry {
    /// -1 (left) to 1 (right)
    pub x: f32,
    /// -1 (bottom) to 1 (top)
    pub y: f32,
    /// Client coordinates in CSS pixels
    pub raw: Vec2,
}

impl PointerTelemetry {
    pub fn normalized(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Default)]
pub struct SiteContext {
    pub scroll: ScrollTelemetry,
    pub pointer: PointerTelemetry,
    modes: ModeSwitch,
}

impl SiteContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// `scroll_range` is the scrollable height (document height minus
    /// viewport). A page that cannot scroll reports progress 0.
    pub fn set_scroll(&mut self, y: f32, scroll_range: f32) {
        let progress = if scroll_range > 0.0 { y / scroll_range } else { 0.0 };
        self.scroll = ScrollTelemetry {
            progress: progress.clamp(0.0, 1.0),
            y,
        };
    }

    /// Normalize a client-space pointer position against the viewport
    pub fn set_pointer(&mut self, client: Vec2, viewport: Vec2) {
        let viewport = viewport.max(Vec2::ONE);
        self.pointer = PointerTelemetry {
            x: (client.x / viewport.x - 0.5) * 2.0,
            y: (client.y / viewport.y - 0.5) * -2.0,
            raw: client,
        };
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn is_playing(&self) -> bool {
        self.modes.is_playing()
    }

    pub fn scroll_locked(&self) -> bool {
        self.modes.scroll_locked()
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.modes.set_playing(playing);
    }

    /// Play affordance
    pub fn start_playing(&mut self) {
        self.modes.start_playing();
    }

    /// Exit affordance or Escape
    pub fn stop_playing(&mut self, game: &mut GameState) {
        self.modes.stop_playing(game);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Mode) + 'static) -> ListenerId {
        self.modes.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.modes.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_scroll_progress_clamped() {
        let mut ctx = SiteContext::new();
        ctx.set_scroll(500.0, 2000.0);
        assert_eq!(ctx.scroll.progress, 0.25);
        assert_eq!(ctx.scroll.y, 500.0);

        // Overscroll bounce on touch devices
        ctx.set_scroll(-40.0, 2000.0);
        assert_eq!(ctx.scroll.progress, 0.0);
        ctx.set_scroll(2100.0, 2000.0);
        assert_eq!(ctx.scroll.progress, 1.0);

        ctx.set_scroll(0.0, 0.0);
        assert_eq!(ctx.scroll.progress, 0.0);
    }

    #[test]
    fn test_pointer_normalization() {
        let mut ctx = SiteContext::new();
        let viewport = Vec2::new(1000.0, 800.0);

        ctx.set_pointer(Vec2::new(500.0, 400.0), viewport);
        assert_eq!(ctx.pointer.normalized(), Vec2::ZERO);

        ctx.set_pointer(Vec2::new(0.0, 0.0), viewport);
        assert_eq!(ctx.pointer.normalized(), Vec2::new(-1.0, 1.0));

        ctx.set_pointer(Vec2::new(1000.0, 800.0), viewport);
        assert_eq!(ctx.pointer.normalized(), Vec2::new(1.0, -1.0));
        assert_eq!(ctx.pointer.raw, Vec2::new(1000.0, 800.0));
    }

    #[test]
    fn test_scroll_lock_follows_mode() {
        let mut ctx = SiteContext::new();
        let locked = Rc::new(Cell::new(false));
        let sink = locked.clone();
        ctx.subscribe(move |mode| sink.set(mode.is_active()));

        ctx.start_playing();
        assert!(ctx.scroll_locked());
        assert!(locked.get());

        let mut game = GameState::new();
        ctx.stop_playing(&mut game);
        assert!(!ctx.scroll_locked());
        assert!(!locked.get());
    }
}
