//! Hoop Shot - swipe-to-shoot arcade basketball
//!
//! Core modules:
//! - `sim`: Deterministic gameplay (shot physics, ball lifecycle, turns, clock)
//! - `audio`: Audio cue vocabulary and queue for the host to play
//! - `settings`: Data-driven tuning, loadable from JSON
//! - `demo`: Toy physics world and bot player for headless runs
//!
//! Rendering, asset loading and the real physics engine live outside this
//! crate. They talk to the core through the `sim::BallBody` and `sim::World`
//! traits.

pub mod audio;
pub mod demo;
pub mod settings;
pub mod sim;

pub use audio::{AudioCue, AudioManager};
pub use settings::{AudioSettings, Settings, SettingsError, ShotTuning};
pub use sim::Game;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Gravity used by the shot solver (m/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Fudge factor that turns the solved launch velocity into an impulse
    /// the engine's ball body converts into a clean make
    pub const PERFECT_SHOT_CONSTANT: f32 = 0.12231;
    /// Magnitude of the backspin applied on release (rad/s)
    pub const SPIN_RATE: f32 = 30.0;

    /// Fixed timestep for the toy world (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ball radius (m)
    pub const BALL_RADIUS: f32 = 0.3;
    /// Rim sensor radius (m)
    pub const RIM_SENSOR_RADIUS: f32 = 0.5;

    /// Off-screen parking spot for removed balls; each ball sits one unit
    /// lower than the previous so parked bodies never overlap
    pub const PARK_X: f32 = -100.0;
    pub const PARK_Y: f32 = -100.0;
    pub const PARK_Z: f32 = -100.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Horizontal (XZ plane) offset from `from` to `to`
#[inline]
pub fn horizontal_delta(from: Vec3, to: Vec3) -> (f32, f32) {
    (to.x - from.x, to.z - from.z)
}

/// Horizontal (XZ plane) distance between two points
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let (dx, dz) = horizontal_delta(a, b);
    (dx * dx + dz * dz).sqrt()
}

/// Point on a circle of radius `r` around `center` in the XZ plane,
/// keeping `center.y`
#[inline]
pub fn polar_to_xz(center: Vec3, r: f32, theta: f32) -> Vec3 {
    Vec3::new(center.x + r * theta.cos(), center.y, center.z + r * theta.sin())
}
