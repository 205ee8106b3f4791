//! Per-ball lifecycle
//!
//! Each ball walks through its own phases while the physics engine moves it:
//!
//! ```text
//! Waiting -> Entering -> Settled -> Playing -> Exiting -> Ended
//! ```
//!
//! Several balls can be mid-animation at once (the last shot still falling
//! while the next ball rises onto its rack); each one only touches its own
//! phase and its own entries in the store.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::BallBody;
use super::rack::park_position;
use super::store::GameStore;
use super::tick::GameEvent;
use crate::lerp;
use crate::settings::Settings;

/// Phase of one ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallPhase {
    /// Off-screen until its turn comes
    Waiting,
    /// Rising onto the rack
    Entering,
    /// On the rack, spawn delay running
    Settled,
    /// Shootable / in flight
    Playing,
    /// Resolved, lingering before removal
    Exiting,
    /// Final ball resolved (terminal)
    Ended,
}

/// State machine for one ball
#[derive(Debug, Clone)]
pub struct BallLifecycle {
    index: usize,
    spawn: Vec3,
    phase: BallPhase,
    /// Seconds spent in the current phase
    phase_time: f32,
    /// Eased height while rising onto the rack
    rise_y: f32,
    /// How long a thrown ball has been stopped low on the court
    rest_time: f32,
}

impl BallLifecycle {
    pub fn new(index: usize, spawn: Vec3) -> Self {
        Self {
            index,
            spawn,
            phase: BallPhase::Waiting,
            phase_time: 0.0,
            rise_y: spawn.y,
            rest_time: 0.0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> BallPhase {
        self.phase
    }

    pub fn phase_time(&self) -> f32 {
        self.phase_time
    }

    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }

    /// Back to `Waiting` for a new game
    pub fn reset(&mut self) {
        self.phase = BallPhase::Waiting;
        self.phase_time = 0.0;
        self.rest_time = 0.0;
    }

    fn set_phase(&mut self, phase: BallPhase, events: &mut Vec<GameEvent>) {
        log::debug!("Ball {} {:?} -> {:?}", self.index, self.phase, phase);
        self.phase = phase;
        self.phase_time = 0.0;
        self.rest_time = 0.0;
        events.push(GameEvent::BallPhase {
            ball: self.index,
            phase,
        });
    }

    /// Move the body off-screen and stop it
    pub fn park<B: BallBody + ?Sized>(&self, body: &mut B) {
        body.set_translation(park_position(self.index));
        body.freeze();
    }

    /// Advance one frame
    ///
    /// Without a body handle (engine not ready) the frame is skipped.
    pub fn update<B: BallBody + ?Sized>(
        &mut self,
        body: Option<&mut B>,
        store: &mut GameStore,
        rim: Vec3,
        dt: f32,
        settings: &Settings,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(body) = body else { return };
        self.phase_time += dt;

        match self.phase {
            BallPhase::Waiting => {
                let is_up = store.current_ball() == self.index
                    && store.ball(self.index).is_some_and(|b| b.active);
                if is_up {
                    // Appear just under the rack and rise into place
                    self.rise_y = self.spawn.y - settings.spawn_drop;
                    body.set_translation(Vec3::new(self.spawn.x, self.rise_y, self.spawn.z));
                    body.freeze();
                    self.set_phase(BallPhase::Entering, events);
                }
            }

            BallPhase::Entering => {
                // Eased on our own height so gravity in the engine can't hold it back
                let t = (dt * settings.enter_ease_rate).clamp(0.0, 1.0);
                self.rise_y = lerp(self.rise_y, self.spawn.y, t);
                if (self.spawn.y - self.rise_y).abs() <= settings.settle_epsilon {
                    self.rise_y = self.spawn.y;
                }

                body.set_translation(Vec3::new(self.spawn.x, self.rise_y, self.spawn.z));
                body.set_linvel(Vec3::ZERO);

                if self.rise_y >= self.spawn.y {
                    self.set_phase(BallPhase::Settled, events);
                }
            }

            BallPhase::Settled => {
                if self.phase_time > settings.spawn_delay() {
                    self.set_phase(BallPhase::Playing, events);
                }
            }

            BallPhase::Exiting => {
                let still_out = store.ball(self.index).is_some_and(|b| b.active);
                if still_out && self.phase_time > settings.exit_delay {
                    let is_final =
                        self.index == store.current_ball() && self.index == store.last_ball();
                    if is_final {
                        self.set_phase(BallPhase::Ended, events);
                        store.finish();
                        log::info!("Last ball resolved - game over");
                        events.push(GameEvent::GameOver);
                    } else {
                        store.set_ball_active(self.index, false);
                        self.park(body);
                        events.push(GameEvent::BallRemoved { ball: self.index });
                    }
                }
            }

            BallPhase::Playing | BallPhase::Ended => {}
        }

        let pos = body.translation();

        // Fell out of the world
        if pos.y < settings.floor_threshold {
            let parked = park_position(self.index);
            if pos != parked {
                log::debug!("Ball {} fell out of the world", self.index);
                events.push(GameEvent::FellOut { ball: self.index });
            }
            self.park(body);
            if store.is_shooting(self.index) {
                store.register_miss(self.index);
            }
            return;
        }

        // Coming down under the rim without having gone in
        let descending_past_rim = pos.y < rim.y - settings.miss_margin
            && pos.y > settings.miss_floor
            && body.linvel().y < 0.0;
        if self.phase == BallPhase::Playing && descending_past_rim {
            if store.is_shooting(self.index) {
                store.register_miss(self.index);
                log::info!("Miss: ball {}", self.index);
                events.push(GameEvent::Miss { ball: self.index });
            }
            if self.phase_time > settings.miss_grace {
                self.set_phase(BallPhase::Exiting, events);
            }
            return;
        }

        // Thrown too weakly to leave the floor
        let stopped_low = pos.y < settings.miss_floor
            && body.linvel().length() < settings.rest_speed
            && store.is_shooting(self.index);
        if self.phase != BallPhase::Playing || !stopped_low {
            self.rest_time = 0.0;
            return;
        }
        self.rest_time += dt;
        if self.rest_time > settings.miss_grace {
            store.register_miss(self.index);
            log::info!("Miss: ball {} stopped short", self.index);
            events.push(GameEvent::Miss { ball: self.index });
            self.set_phase(BallPhase::Exiting, events);
        }
    }
}
