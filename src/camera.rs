//! Scene camera and handheld pose
//!
//! `CameraRig` eases the camera along a scroll-driven path while idle and
//! locks it onto the handheld's screen while playing. `HandheldPose` is the
//! decorative drag/float motion of the device itself. Both are stepped once
//! per rendered frame and expose glam matrices for the presenter.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::mode::Mode;
use crate::settings::CameraSettings;

/// Vertical field of view in degrees
pub const FOV_Y_DEGREES: f32 = 58.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 120.0;

/// Camera pose while the game has focus
pub const PLAY_POS: Vec3 = Vec3::new(0.0, 0.88, 2.0);
pub const PLAY_LOOK: Vec3 = Vec3::new(0.0, 0.88, 0.30);

/// Scroll path, evenly spaced over progress 0..1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub pos: Vec3,
    pub look: Vec3,
}

const fn waypoint(pos: [f32; 3], look: [f32; 3]) -> Waypoint {
    Waypoint {
        pos: Vec3::new(pos[0], pos[1], pos[2]),
        look: Vec3::new(look[0], look[1], look[2]),
    }
}

pub const WAYPOINTS: [Waypoint; 6] = [
    waypoint([0.0, 0.4, 5.5], [0.0, 0.0, 0.0]),
    waypoint([-1.8, 0.2, 7.0], [0.0, 0.0, 0.0]),
    waypoint([0.0, -0.6, 6.0], [0.0, -0.3, 0.0]),
    waypoint([1.8, 0.2, 7.0], [0.0, 0.0, 0.0]),
    waypoint([0.0, 1.2, 8.5], [0.0, 0.5, 0.0]),
    waypoint([0.0, 0.0, 3.8], [0.0, 0.0, 0.0]),
];

/// Pointer parallax scale (x, y) applied to the look target
const POINTER_SWAY: Vec2 = Vec2::new(0.25, 0.15);
/// Fraction of the parallax that also moves the camera
const POINTER_POS_FACTOR: f32 = 0.4;

/// Idle target for a scroll progress in 0..1 and a pointer in -1..1
pub fn scroll_target(progress: f32, pointer: Vec2) -> Waypoint {
    let max = (WAYPOINTS.len() - 1) as f32;
    let raw = (progress * max).clamp(0.0, max);
    let i = (raw.floor() as usize).min(WAYPOINTS.len() - 2);
    let t = raw - i as f32;
    let (a, b) = (WAYPOINTS[i], WAYPOINTS[i + 1]);

    let sway = pointer * POINTER_SWAY;
    Waypoint {
        pos: a.pos.lerp(b.pos, t) + (sway * POINTER_POS_FACTOR).extend(0.0),
        look: a.look.lerp(b.look, t) + sway.extend(0.0),
    }
}

/// Smoothed camera that trails its target
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub pos: Vec3,
    pub look: Vec3,
    rates: CameraSettings,
}

impl CameraRig {
    pub fn new(rates: CameraSettings) -> Self {
        Self {
            pos: WAYPOINTS[0].pos,
            look: WAYPOINTS[0].look,
            rates,
        }
    }

    /// Step one frame toward the target for the current mode
    pub fn update(&mut self, mode: Mode, scroll_progress: f32, pointer: Vec2) {
        let (target, rate) = match mode {
            Mode::Active => (
                Waypoint {
                    pos: PLAY_POS,
                    look: PLAY_LOOK,
                },
                self.rates.play_follow,
            ),
            Mode::Idle => (scroll_target(scroll_progress, pointer), self.rates.idle_follow),
        };

        self.pos = self.pos.lerp(target.pos, rate);
        self.look = self.look.lerp(target.look, self.rates.look_follow);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.pos, self.look, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect.max(1e-3), Z_NEAR, Z_FAR)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

// Drag response
const DRAG_YAW_PER_PX: f32 = 0.007;
const DRAG_PITCH_PER_PX: f32 = 0.004;
const PITCH_LIMIT: f32 = 0.45;
const INERTIA_DECAY: f32 = 0.88;

// Play-mode settling
const SNAP_BACK_RATE: f32 = 0.07;
const SNAP_VELOCITY_DAMP: f32 = 0.5;
const TRANSFORM_SETTLE_RATE: f32 = 0.09;

// Idle motion
const FLOAT_FREQ: f32 = 0.55;
const FLOAT_AMPLITUDE: f32 = 0.08;
const WOBBLE_FREQ: f32 = 0.16;
const WOBBLE_AMPLITUDE: f32 = 0.06;

/// Device shrinks away as the page scrolls past the hero section
const FADE_RATE: f32 = 4.5;
const MIN_SCALE: f32 = 0.001;

/// Rotation and float of the handheld model
#[derive(Debug, Clone, Default)]
pub struct HandheldPose {
    /// Drag-accumulated yaw
    base_yaw: f32,
    /// Drag-accumulated pitch, within +-PITCH_LIMIT
    base_pitch: f32,
    yaw_vel: f32,
    pitch_vel: f32,
    dragging: bool,
    last_pointer: Vec2,

    // Rendered transform
    pub yaw: f32,
    pub pitch: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl HandheldPose {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            ..Default::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn base_rotation(&self) -> (f32, f32) {
        (self.base_yaw, self.base_pitch)
    }

    /// Pointer pressed at client coordinates. Zeroes the inertia.
    pub fn begin_drag(&mut self, at: Vec2) {
        self.dragging = true;
        self.last_pointer = at;
        self.yaw_vel = 0.0;
        self.pitch_vel = 0.0;
    }

    pub fn drag_to(&mut self, at: Vec2) {
        if !self.dragging {
            return;
        }
        let delta = at - self.last_pointer;
        self.yaw_vel = delta.x * DRAG_YAW_PER_PX;
        self.pitch_vel = delta.y * DRAG_PITCH_PER_PX;
        self.base_yaw += self.yaw_vel;
        self.base_pitch = (self.base_pitch + self.pitch_vel).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.last_pointer = at;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Step one frame. `elapsed` is wall-clock seconds since start.
    pub fn update(&mut self, mode: Mode, elapsed: f32, scroll_progress: f32, reduced_motion: bool) {
        self.scale = (1.0 - scroll_progress * FADE_RATE).max(MIN_SCALE);

        match mode {
            Mode::Active => {
                self.base_yaw = lerp(self.base_yaw, 0.0, SNAP_BACK_RATE);
                self.base_pitch = lerp(self.base_pitch, 0.0, SNAP_BACK_RATE);
                self.yaw_vel *= SNAP_VELOCITY_DAMP;
                self.pitch_vel *= SNAP_VELOCITY_DAMP;
                self.offset_y = lerp(self.offset_y, 0.0, TRANSFORM_SETTLE_RATE);
                self.yaw = lerp(self.yaw, 0.0, TRANSFORM_SETTLE_RATE);
                self.pitch = lerp(self.pitch, 0.0, TRANSFORM_SETTLE_RATE);
            }
            Mode::Idle => {
                if !self.dragging {
                    self.yaw_vel *= INERTIA_DECAY;
                    self.pitch_vel *= INERTIA_DECAY;
                    self.base_yaw += self.yaw_vel;
                    self.base_pitch =
                        (self.base_pitch + self.pitch_vel).clamp(-PITCH_LIMIT, PITCH_LIMIT);
                }

                let (float, wobble) = if reduced_motion {
                    (0.0, 0.0)
                } else {
                    (
                        (elapsed * FLOAT_FREQ).sin() * FLOAT_AMPLITUDE,
                        (elapsed * WOBBLE_FREQ).sin() * WOBBLE_AMPLITUDE,
                    )
                };
                self.offset_y = float;
                self.yaw = self.base_yaw + wobble;
                self.pitch = self.base_pitch;
            }
        }
    }

    /// Model matrix: uniform scale, then pitch and yaw, then the float offset
    pub fn model(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch),
            Vec3::new(0.0, self.offset_y, 0.0),
        )
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_scroll_target_endpoints() {
        let start = scroll_target(0.0, Vec2::ZERO);
        assert!(approx(start.pos, WAYPOINTS[0].pos));

        let end = scroll_target(1.0, Vec2::ZERO);
        assert!(approx(end.pos, WAYPOINTS[5].pos));
        assert!(approx(end.look, WAYPOINTS[5].look));

        // Out-of-range progress clamps
        let past = scroll_target(3.0, Vec2::ZERO);
        assert!(approx(past.pos, WAYPOINTS[5].pos));
    }

    #[test]
    fn test_scroll_target_interpolates() {
        // Halfway between waypoints 0 and 1
        let mid = scroll_target(0.1, Vec2::ZERO);
        assert!(approx(mid.pos, Vec3::new(-0.9, 0.3, 6.25)));
    }

    #[test]
    fn test_pointer_sway() {
        let target = scroll_target(0.0, Vec2::new(1.0, -1.0));
        assert!(approx(target.look, Vec3::new(0.25, -0.15, 0.0)));
        assert!(approx(target.pos, Vec3::new(0.1, 0.4 - 0.06, 5.5)));
    }

    #[test]
    fn test_rig_converges_on_play_pose() {
        let mut rig = CameraRig::new(CameraSettings::default());
        for _ in 0..600 {
            rig.update(Mode::Active, 0.0, Vec2::ZERO);
        }
        assert!(approx(rig.pos, PLAY_POS));
        assert!(approx(rig.look, PLAY_LOOK));
    }

    #[test]
    fn test_rig_rates_follow_mode() {
        let mut idle = CameraRig::new(CameraSettings::default());
        idle.update(Mode::Idle, 1.0, Vec2::ZERO);
        // Moved 4% of the way toward the last waypoint
        let expected = WAYPOINTS[0].pos.lerp(WAYPOINTS[5].pos, 0.04);
        assert!(approx(idle.pos, expected));

        let mut active = CameraRig::new(CameraSettings::default());
        active.update(Mode::Active, 0.0, Vec2::ZERO);
        let expected = WAYPOINTS[0].pos.lerp(PLAY_POS, 0.055);
        assert!(approx(active.pos, expected));
        let expected_look = WAYPOINTS[0].look.lerp(PLAY_LOOK, 0.065);
        assert!(approx(active.look, expected_look));
    }

    #[test]
    fn test_view_looks_at_target() {
        let mut rig = CameraRig::new(CameraSettings::default());
        rig.pos = PLAY_POS;
        rig.look = PLAY_LOOK;
        // The look target sits straight ahead on the -Z view axis
        let p = rig.view().transform_point3(PLAY_LOOK);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!((p.z + 1.7).abs() < 1e-5);
    }

    #[test]
    fn test_drag_clamps_pitch() {
        let mut pose = HandheldPose::new();
        pose.begin_drag(Vec2::ZERO);
        pose.drag_to(Vec2::new(100.0, 500.0));

        let (yaw, pitch) = pose.base_rotation();
        assert!((yaw - 0.7).abs() < 1e-5);
        assert_eq!(pitch, 0.45);
    }

    #[test]
    fn test_drag_ignored_when_not_pressed() {
        let mut pose = HandheldPose::new();
        pose.drag_to(Vec2::new(100.0, 100.0));
        assert_eq!(pose.base_rotation(), (0.0, 0.0));
    }

    #[test]
    fn test_inertia_decays_after_release() {
        let mut pose = HandheldPose::new();
        pose.begin_drag(Vec2::ZERO);
        pose.drag_to(Vec2::new(10.0, 0.0));
        pose.end_drag();

        pose.update(Mode::Idle, 0.0, 0.0, true);
        let (yaw, _) = pose.base_rotation();
        assert!((yaw - (0.07 + 0.07 * 0.88)).abs() < 1e-5);

        // Geometric series bound: 0.07 / (1 - 0.88)
        for _ in 0..500 {
            pose.update(Mode::Idle, 0.0, 0.0, true);
        }
        let (yaw, _) = pose.base_rotation();
        assert!(yaw < 0.07 / 0.12 + 1e-4);
    }

    #[test]
    fn test_active_settles_to_rest() {
        let mut pose = HandheldPose::new();
        pose.begin_drag(Vec2::ZERO);
        pose.drag_to(Vec2::new(200.0, 50.0));
        pose.end_drag();
        pose.update(Mode::Idle, 3.0, 0.0, false);

        for _ in 0..400 {
            pose.update(Mode::Active, 3.0, 0.0, false);
        }
        assert!(pose.yaw.abs() < 1e-4);
        assert!(pose.pitch.abs() < 1e-4);
        assert!(pose.offset_y.abs() < 1e-4);
    }

    #[test]
    fn test_reduced_motion_disables_float() {
        let mut pose = HandheldPose::new();
        pose.update(Mode::Idle, 2.0, 0.0, true);
        assert_eq!(pose.offset_y, 0.0);
        assert_eq!(pose.yaw, 0.0);

        pose.update(Mode::Idle, 2.0, 0.0, false);
        assert!((pose.offset_y - (1.1f32).sin() * 0.08).abs() < 1e-6);
        assert!((pose.yaw - (0.32f32).sin() * 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_scale_fades_with_scroll() {
        let mut pose = HandheldPose::new();
        pose.update(Mode::Idle, 0.0, 0.1, true);
        assert!((pose.scale - 0.55).abs() < 1e-5);

        pose.update(Mode::Idle, 0.0, 0.5, true);
        assert_eq!(pose.scale, 0.001);
    }
}
