//! Engine boundary
//!
//! The physics engine owns the real rigid bodies. The core only needs to
//! read a ball's translation and velocity and to push a few commands back.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A ball rigid body owned by the physics engine
pub trait BallBody {
    fn translation(&self) -> Vec3;
    fn linvel(&self) -> Vec3;
    fn set_translation(&mut self, pos: Vec3);
    fn set_linvel(&mut self, vel: Vec3);
    fn set_angvel(&mut self, angvel: Vec3);
    fn apply_impulse(&mut self, impulse: Vec3);

    /// Stop all motion
    fn freeze(&mut self) {
        self.set_linvel(Vec3::ZERO);
        self.set_angvel(Vec3::ZERO);
    }
}

/// The engine scene as seen by the game
///
/// Returning `None` means the engine is not ready yet; the game treats that
/// frame as a no-op for the affected ball.
pub trait World {
    type Body: BallBody;

    /// Body for a ball index
    fn ball_mut(&mut self, index: usize) -> Option<&mut Self::Body>;

    /// Current rim center
    fn rim_position(&self) -> Option<Vec3>;
}

/// What a ball bumped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Floor,
    Ring,
    Ball,
    Net,
}

impl Surface {
    /// Map an engine body name to a surface
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "floor" => Some(Surface::Floor),
            "ring" => Some(Surface::Ring),
            "ball" => Some(Surface::Ball),
            "net" => Some(Surface::Net),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Floor => "floor",
            Surface::Ring => "ring",
            Surface::Ball => "ball",
            Surface::Net => "net",
        }
    }
}

/// Collision start reported by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub ball: usize,
    pub surface: Surface,
    /// Ball height at contact
    pub ball_y: f32,
}
