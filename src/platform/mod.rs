//! Host plumbing between the page and the game
//!
//! Handles:
//! - Shared page telemetry and the play-mode flag (`context`)
//! - Key and drag input (`input`)
//! - Frame pacing with visibility suspend/resume (`scheduler`)

pub mod context;
pub mod input;
pub mod scheduler;

pub use context::{PointerTelemetry, ScrollTelemetry, SiteContext};
pub use input::{InputEffect, Key};
pub use scheduler::{FrameScheduler, FrameTick, SchedulerState};
