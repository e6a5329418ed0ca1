//! Frame pacing for the host animation-frame loop
//!
//! The host calls `frame` from every animation-frame callback and re-arms
//! only while `should_rearm` holds. Each call that returns a tick means
//! exactly one simulation step; hidden time is never replayed.

/// Lifecycle of the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Running,
    /// Page hidden; frames are dropped until it is visible again
    Suspended,
    /// Torn down; never runs again
    Stopped,
}

/// One scheduled step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Seconds since the previous tick; 0 on the first tick after a (re)start
    pub dt: f32,
    /// Seconds spent running, excluding suspended time
    pub elapsed: f32,
    /// Ticks issued so far, including this one
    pub count: u64,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    state: SchedulerState,
    /// Timestamp of the previous tick; `None` after start or resume
    last_ms: Option<f64>,
    elapsed: f64,
    count: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    /// Handle an animation-frame timestamp in milliseconds
    pub fn frame(&mut self, now_ms: f64) -> Option<FrameTick> {
        if self.state != SchedulerState::Running {
            return None;
        }

        // Timestamps can repeat or step back across a resume; never go negative
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.elapsed += dt;
        self.count += 1;

        Some(FrameTick {
            dt: dt as f32,
            elapsed: self.elapsed as f32,
            count: self.count,
        })
    }

    /// Suspend while hidden, resume with a fresh time base when visible
    pub fn set_visible(&mut self, visible: bool) {
        match (self.state, visible) {
            (SchedulerState::Running, false) => {
                self.state = SchedulerState::Suspended;
                log::debug!("Frame loop suspended");
            }
            (SchedulerState::Suspended, true) => {
                self.state = SchedulerState::Running;
                self.last_ms = None;
                log::debug!("Frame loop resumed");
            }
            _ => {}
        }
    }

    pub fn stop(&mut self) {
        if self.state != SchedulerState::Stopped {
            self.state = SchedulerState::Stopped;
            log::info!("Frame loop stopped after {} ticks", self.count);
        }
    }

    /// Whether the host should request another animation frame
    pub fn should_rearm(&self) -> bool {
        self.state == SchedulerState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_has_zero_dt() {
        let mut sched = FrameScheduler::new();
        let tick = sched.frame(1234.0).expect("running");
        assert_eq!(tick.dt, 0.0);
        assert_eq!(tick.count, 1);

        let tick = sched.frame(1250.0).expect("running");
        assert!((tick.dt - 0.016).abs() < 1e-6);
        assert!((tick.elapsed - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_hidden_frames_are_dropped() {
        let mut sched = FrameScheduler::new();
        sched.frame(0.0);
        sched.frame(16.0);

        sched.set_visible(false);
        assert!(!sched.should_rearm());
        assert_eq!(sched.frame(32.0), None);
        assert_eq!(sched.frame(48.0), None);
        assert_eq!(sched.state(), SchedulerState::Suspended);
    }

    #[test]
    fn test_resume_does_not_catch_up() {
        let mut sched = FrameScheduler::new();
        sched.frame(0.0);
        sched.frame(16.0);
        sched.set_visible(false);
        sched.set_visible(true);

        // Ten seconds hidden produce exactly one tick with no elapsed jump
        let tick = sched.frame(10_016.0).expect("resumed");
        assert_eq!(tick.dt, 0.0);
        assert_eq!(tick.count, 3);
        assert!((tick.elapsed - 0.016).abs() < 1e-6);

        let tick = sched.frame(10_032.0).expect("running");
        assert!((tick.dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_visible_while_running_keeps_time_base() {
        let mut sched = FrameScheduler::new();
        sched.frame(0.0);
        sched.set_visible(true);
        let tick = sched.frame(20.0).expect("running");
        assert!((tick.dt - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_stop_is_terminal() {
        let mut sched = FrameScheduler::new();
        sched.frame(0.0);
        sched.stop();
        sched.set_visible(true);

        assert_eq!(sched.state(), SchedulerState::Stopped);
        assert!(!sched.should_rearm());
        assert_eq!(sched.frame(16.0), None);
    }

    #[test]
    fn test_backwards_timestamp_clamps() {
        let mut sched = FrameScheduler::new();
        sched.frame(100.0);
        let tick = sched.frame(90.0).expect("running");
        assert_eq!(tick.dt, 0.0);
    }
}
