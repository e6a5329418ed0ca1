//! Play mode switch
//!
//! `Idle`: the camera follows the page scroll and the autopilot plays.
//! `Active`: the camera is locked on the handheld's screen, the human plays
//! and page scrolling is disabled.
//!
//! Every `set_playing` call notifies subscribers synchronously, so camera and
//! page chrome can react without polling.

use std::fmt;

use crate::sim::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Active,
}

impl Mode {
    pub fn from_playing(playing: bool) -> Self {
        if playing { Mode::Active } else { Mode::Idle }
    }

    pub fn is_active(self) -> bool {
        self == Mode::Active
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Listener = Box<dyn FnMut(Mode)>;

/// Owner of the shared "playing" flag
#[derive(Default)]
pub struct ModeSwitch {
    mode: Mode,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u32,
}

impl fmt::Debug for ModeSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeSwitch")
            .field("mode", &self.mode)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ModeSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_playing(&self) -> bool {
        self.mode.is_active()
    }

    /// Page scrolling is locked for as long as the game is active
    pub fn scroll_locked(&self) -> bool {
        self.is_playing()
    }

    /// Set the flag and notify every subscriber, even if unchanged
    pub fn set_playing(&mut self, playing: bool) {
        self.mode = Mode::from_playing(playing);
        log::info!("Play mode: {:?}", self.mode);
        for (_, listener) in self.listeners.iter_mut() {
            listener(self.mode);
        }
    }

    /// Idle -> Active. No-op when already active.
    pub fn start_playing(&mut self) {
        if !self.is_playing() {
            self.set_playing(true);
        }
    }

    /// Active -> Idle, handing the paddle back to the autopilot. Score,
    /// lives, level and bricks are left alone. No-op when already idle.
    pub fn stop_playing(&mut self, game: &mut GameState) {
        if self.is_playing() {
            self.set_playing(false);
            game.player_controlled = false;
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Mode) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(switch: &mut ModeSwitch) -> (Rc<RefCell<Vec<Mode>>>, ListenerId) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = switch.subscribe(move |mode| sink.borrow_mut().push(mode));
        (seen, id)
    }

    #[test]
    fn test_starts_idle() {
        let switch = ModeSwitch::new();
        assert_eq!(switch.mode(), Mode::Idle);
        assert!(!switch.scroll_locked());
    }

    #[test]
    fn test_set_playing_notifies_every_call() {
        let mut switch = ModeSwitch::new();
        let (seen, _) = recorder(&mut switch);

        switch.set_playing(true);
        switch.set_playing(true);
        switch.set_playing(false);

        assert_eq!(*seen.borrow(), vec![Mode::Active, Mode::Active, Mode::Idle]);
    }

    #[test]
    fn test_start_and_stop_are_edge_triggered() {
        let mut switch = ModeSwitch::new();
        let (seen, _) = recorder(&mut switch);
        let mut game = GameState::new();

        switch.start_playing();
        switch.start_playing();
        assert!(switch.scroll_locked());

        game.player_controlled = true;
        switch.stop_playing(&mut game);
        switch.stop_playing(&mut game);

        assert_eq!(*seen.borrow(), vec![Mode::Active, Mode::Idle]);
        assert!(!game.player_controlled);
    }

    #[test]
    fn test_stop_keeps_progress() {
        let mut switch = ModeSwitch::new();
        let mut game = GameState::new();
        game.player_controlled = true;
        game.score = 250;
        game.lives = 2;
        game.level = 3;
        game.bricks[4].alive = false;
        let bricks = game.bricks.clone();

        switch.start_playing();
        switch.stop_playing(&mut game);

        assert_eq!(game.score, 250);
        assert_eq!(game.lives, 2);
        assert_eq!(game.level, 3);
        assert_eq!(game.bricks, bricks);
    }

    #[test]
    fn test_unsubscribe() {
        let mut switch = ModeSwitch::new();
        let (seen, id) = recorder(&mut switch);

        assert!(switch.unsubscribe(id));
        assert!(!switch.unsubscribe(id));
        switch.set_playing(true);

        assert!(seen.borrow().is_empty());
    }
}
