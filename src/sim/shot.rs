//! Shot physics
//!
//! Turns a 2D swipe into a 3D launch. The solver first finds the "perfect"
//! projectile that peaks above the rim and comes down through it, then lets
//! the swipe quality scale the vertical power and steer the horizontal aim.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::horizontal_delta;
use crate::settings::ShotTuning;

/// A press-drag-release swipe aimed at one ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    /// Ball the swipe was aimed at
    pub ball: usize,
    /// Horizontal travel (press x - release x, px)
    pub dx: f32,
    /// Vertical travel (press y - release y, px); positive for an upward swipe
    pub dy: f32,
    /// Press-to-release duration (seconds)
    pub duration: f32,
    /// Release timestamp (seconds)
    pub time: f64,
}

/// Launch parameters for one shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotVector {
    /// Impulse to apply to the ball body
    pub impulse: Vec3,
    /// Angular velocity to set on the ball body (backspin)
    pub spin: Vec3,
    /// Vertical power multiplier derived from the swipe (0-1)
    pub power: f32,
}

/// How close `value` is to `expected`, as a score
///
/// 1.0 within `range`, falling linearly to 0.0 at three times `range`, then
/// keeps falling (negative) at a steeper slope beyond that.
pub fn proximity_to_target(value: f32, expected: f32, range: f32) -> f32 {
    let off = (value - expected).abs();
    let penalty = if off <= range {
        0.0
    } else if off <= range * 3.0 {
        (off - range) / (range * 2.0)
    } else {
        (off - range * 3.0) / range + 1.0
    };
    1.0 - penalty
}

/// Vertical power multiplier for a swipe (0-1)
///
/// Mean of the drag-distance and drag-duration proximities.
pub fn shot_power(gesture: &Gesture, tuning: &ShotTuning) -> f32 {
    let drag = proximity_to_target(gesture.dy, tuning.expected_drag, tuning.drag_tolerance);
    let timing = proximity_to_target(
        gesture.duration * tuning.duration_scale,
        tuning.expected_duration,
        tuning.duration_tolerance,
    );
    ((drag + timing) / 2.0).clamp(0.0, 1.0)
}

/// Aim rotation (radians, about Y) from the swipe direction
pub fn aim_rotation(gesture: &Gesture, tuning: &ShotTuning) -> f32 {
    gesture.dx.atan2(gesture.dy) * tuning.aim_factor
}

/// Compute impulse and backspin for a swipe
pub fn compute_shot(gesture: &Gesture, ball_pos: Vec3, rim_pos: Vec3, tuning: &ShotTuning) -> ShotVector {
    let g = tuning.gravity;

    // Horizontal offset to the rim; distance clamped so a ball right under
    // the rim still yields a finite arc
    let (delta_x, delta_z) = horizontal_delta(ball_pos, rim_pos);
    let distance = (delta_x * delta_x + delta_z * delta_z)
        .sqrt()
        .max(tuning.min_horizontal);

    // Higher arc for longer shots
    let apex = rim_pos.y + tuning.apex_base + distance * tuning.apex_per_distance;
    let rise = (apex - ball_pos.y).max(0.0);

    let v_y = (2.0 * g * rise).sqrt();
    // Time to climb to the apex and fall back to launch height
    let flight_time = (2.0 * v_y / g).max(f32::EPSILON);
    let v_x = delta_x / flight_time;
    let v_z = delta_z / flight_time;

    let power = shot_power(gesture, tuning);
    let theta = aim_rotation(gesture, tuning);
    let (sin, cos) = theta.sin_cos();
    let k = tuning.perfect_shot_constant;

    let impulse = Vec3::new(
        (v_x * cos - v_z * sin) * k,
        v_y * power * k,
        (v_x * sin + v_z * cos) * k,
    );

    // Backspin: axis perpendicular to the horizontal travel direction
    let spread = (v_x.abs() + v_z.abs()).max(tuning.min_horizontal);
    let spin = Vec3::new(
        -v_z / spread * tuning.spin_rate,
        0.0,
        v_x / spread * tuning.spin_rate,
    );

    ShotVector { impulse, spin, power }
}
