//! Press/release tracking
//!
//! Mouse and touch both arrive as a press followed by a release. The deltas
//! are press minus release, so dragging upward on screen (towards smaller y)
//! gives a positive `dy`.

use serde::{Deserialize, Serialize};

use super::shot::Gesture;

/// Pointer press or release in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressEvent {
    pub x: f32,
    pub y: f32,
    /// Seconds, same clock as the frame driver
    pub time: f64,
}

impl PressEvent {
    pub fn new(x: f32, y: f32, time: f64) -> Self {
        Self { x, y, time }
    }
}

/// Completed press-drag-release, not yet bound to a ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swipe {
    pub dx: f32,
    pub dy: f32,
    pub duration: f32,
    /// Release timestamp
    pub time: f64,
}

impl Swipe {
    /// Aim this swipe at a ball
    pub fn at_ball(&self, ball: usize) -> Gesture {
        Gesture {
            ball,
            dx: self.dx,
            dy: self.dy,
            duration: self.duration,
            time: self.time,
        }
    }

    /// Vertical travel is enough to count as a swipe
    pub fn is_upward_enough(&self, min_vertical_delta: f32) -> bool {
        self.dy.abs() > min_vertical_delta
    }
}

/// Pairs presses with releases
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    pressed: Option<PressEvent>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.is_some()
    }

    pub fn press(&mut self, event: PressEvent) {
        self.pressed = Some(event);
    }

    /// Finish the swipe; a release without a press yields nothing
    pub fn release(&mut self, event: PressEvent) -> Option<Swipe> {
        let start = self.pressed.take()?;
        Some(Swipe {
            dx: start.x - event.x,
            dy: start.y - event.y,
            duration: (event.time - start.time).max(0.0) as f32,
            time: event.time,
        })
    }

    /// Drop a half-finished swipe (restart, focus loss)
    pub fn cancel(&mut self) {
        self.pressed = None;
    }
}
