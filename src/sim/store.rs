//! Game store
//!
//! Turn pointer, roster, shooting flags and counters. Every mutation goes
//! through one of the methods below so a caller never sees a half-applied
//! transition.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::BallBody;
use super::shot::{Gesture, ShotVector, compute_shot};
use crate::settings::Settings;

/// Roster entry for one ball
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    /// Spawned and visible
    pub active: bool,
    /// Went in this game
    pub made: bool,
}

/// Why a shot attempt was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotRejected {
    /// Game is not accepting shots
    NotPlaying,
    /// Ball index outside the roster
    UnknownBall(usize),
    /// Shot aimed at a ball that is not up
    OutOfTurn { ball: usize, current: usize },
    /// Ball is already in the air
    AlreadyShooting(usize),
    /// Swipe too short or zero duration
    WeakGesture,
    /// Previous shot was too recent
    TooSoon,
}

impl fmt::Display for ShotRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShotRejected::NotPlaying => write!(f, "game is not playing"),
            ShotRejected::UnknownBall(ball) => write!(f, "no ball {ball}"),
            ShotRejected::OutOfTurn { ball, current } => {
                write!(f, "ball {ball} shot out of turn (current is {current})")
            }
            ShotRejected::AlreadyShooting(ball) => write!(f, "ball {ball} is already in the air"),
            ShotRejected::WeakGesture => write!(f, "gesture too short"),
            ShotRejected::TooSoon => write!(f, "previous shot too recent"),
        }
    }
}

impl std::error::Error for ShotRejected {}

/// Read-only view for UI layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub remaining_time: f64,
    pub makes: u32,
    pub total_shots: u32,
    pub current_ball: usize,
    pub is_playing: bool,
    pub is_game_over: bool,
    pub is_time_up: bool,
}

/// Shared game state and its transition rules
#[derive(Debug, Clone)]
pub struct GameStore {
    total_balls: usize,
    game_time: f64,
    balls: Vec<Ball>,
    current_ball: usize,
    total_shots: u32,
    makes: u32,
    shooting: Vec<bool>,
    is_playing: bool,
    last_shot: f64,
    last_gesture: Option<Gesture>,
    // Clock-published fields
    remaining_time: f64,
    is_time_up: bool,
    is_game_over: bool,
}

impl GameStore {
    pub fn new(settings: &Settings) -> Self {
        let total_balls = settings.total_balls.max(1);
        Self {
            total_balls,
            game_time: settings.game_time,
            balls: vec![Ball::default(); total_balls],
            current_ball: 0,
            total_shots: 0,
            makes: 0,
            shooting: vec![false; total_balls],
            is_playing: false,
            last_shot: 0.0,
            last_gesture: None,
            remaining_time: settings.game_time,
            is_time_up: false,
            is_game_over: false,
        }
    }

    // === Queries ===

    pub fn total_balls(&self) -> usize {
        self.total_balls
    }

    pub fn last_ball(&self) -> usize {
        self.total_balls - 1
    }

    pub fn current_ball(&self) -> usize {
        self.current_ball
    }

    pub fn ball(&self, index: usize) -> Option<Ball> {
        self.balls.get(index).copied()
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn is_shooting(&self, index: usize) -> bool {
        self.shooting.get(index).copied().unwrap_or(false)
    }

    pub fn total_shots(&self) -> u32 {
        self.total_shots
    }

    pub fn makes(&self) -> u32 {
        self.makes
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_time_up(&self) -> bool {
        self.is_time_up
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn remaining_time(&self) -> f64 {
        self.remaining_time
    }

    pub fn game_time(&self) -> f64 {
        self.game_time
    }

    pub fn last_shot(&self) -> f64 {
        self.last_shot
    }

    pub fn last_gesture(&self) -> Option<&Gesture> {
        self.last_gesture.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            remaining_time: self.remaining_time,
            makes: self.makes,
            total_shots: self.total_shots,
            current_ball: self.current_ball,
            is_playing: self.is_playing,
            is_game_over: self.is_game_over,
            is_time_up: self.is_time_up,
        }
    }

    // === Turn & scoring ===

    /// Hand out the next ball
    ///
    /// Play stops once the last ball has been thrown; balls still in the air
    /// keep resolving.
    pub fn advance_turn(&mut self) {
        let is_last = self.current_ball + 1 >= self.total_balls;
        let next = if is_last {
            self.last_ball()
        } else {
            self.current_ball + 1
        };

        self.balls[next].active = true;
        self.current_ball = next;
        self.is_playing = !is_last;
        log::debug!("Turn -> ball {} (playing: {})", next, self.is_playing);
    }

    /// Validate a swipe against the turn protocol without changing anything
    pub fn check_throw(
        &self,
        ball: usize,
        gesture: &Gesture,
        now: f64,
        settings: &Settings,
    ) -> Result<(), ShotRejected> {
        if !self.is_playing {
            return Err(ShotRejected::NotPlaying);
        }
        if ball >= self.total_balls {
            return Err(ShotRejected::UnknownBall(ball));
        }
        if ball != self.current_ball || gesture.ball != ball {
            return Err(ShotRejected::OutOfTurn {
                ball: gesture.ball,
                current: self.current_ball,
            });
        }
        if self.shooting[ball] {
            return Err(ShotRejected::AlreadyShooting(ball));
        }
        if gesture.dy.abs() <= settings.min_vertical_delta || gesture.duration <= 0.0 {
            return Err(ShotRejected::WeakGesture);
        }
        if now - self.last_shot <= settings.shot_interval() {
            return Err(ShotRejected::TooSoon);
        }
        Ok(())
    }

    /// Shoot a ball
    ///
    /// Flags, counters and the turn pointer are all updated before the
    /// impulse reaches the body, so a second throw in the same tick sees the
    /// ball as already shooting.
    pub fn throw_ball<B: BallBody + ?Sized>(
        &mut self,
        ball: usize,
        gesture: &Gesture,
        now: f64,
        body: &mut B,
        rim: Vec3,
        settings: &Settings,
    ) -> Result<ShotVector, ShotRejected> {
        self.check_throw(ball, gesture, now, settings)?;

        self.shooting[ball] = true;
        self.last_shot = now;
        self.last_gesture = Some(*gesture);
        self.total_shots += 1;
        self.advance_turn();

        // Ball must be still before the launch
        body.freeze();
        let shot = compute_shot(gesture, body.translation(), rim, &settings.shot);
        body.apply_impulse(shot.impulse);
        body.set_angvel(shot.spin);

        log::info!(
            "Shot {} with ball {} (power {:.2})",
            self.total_shots,
            ball,
            shot.power
        );
        Ok(shot)
    }

    /// Count a make; repeated calls for the same ball are ignored
    pub fn register_make(&mut self, ball: usize) -> bool {
        let Some(entry) = self.balls.get_mut(ball) else {
            return false;
        };
        if entry.made {
            return false;
        }
        entry.made = true;
        self.shooting[ball] = false;
        self.makes += 1;
        log::info!("Make! ball {} ({}/{})", ball, self.makes, self.total_shots);
        true
    }

    /// Ball came down without going in
    pub fn register_miss(&mut self, ball: usize) {
        if let Some(flag) = self.shooting.get_mut(ball) {
            *flag = false;
        }
    }

    pub fn set_ball_active(&mut self, ball: usize, active: bool) {
        if let Some(entry) = self.balls.get_mut(ball) {
            entry.active = active;
        }
    }

    // === Game flow ===

    /// Back to the pre-game state: no active balls, nothing counted
    pub fn reset_game(&mut self, now: f64) {
        self.balls.iter_mut().for_each(|b| *b = Ball::default());
        self.shooting.iter_mut().for_each(|s| *s = false);
        self.current_ball = 0;
        self.total_shots = 0;
        self.makes = 0;
        self.is_playing = false;
        self.last_shot = now;
        self.last_gesture = None;
        self.remaining_time = self.game_time;
        self.is_time_up = false;
        self.is_game_over = false;
    }

    /// Put ball 0 on the rack and open play
    pub fn start(&mut self) {
        self.balls[0].active = true;
        self.is_playing = true;
    }

    /// Last ball resolved
    pub fn finish(&mut self) {
        self.is_playing = false;
        self.is_game_over = true;
    }

    // === Clock-published fields ===

    pub(crate) fn publish_remaining(&mut self, remaining: f64) {
        self.remaining_time = remaining.max(0.0);
    }

    pub(crate) fn publish_time_up(&mut self) {
        self.remaining_time = 0.0;
        self.is_time_up = true;
        self.is_game_over = true;
        self.is_playing = false;
    }

    pub(crate) fn publish_clock_reset(&mut self, duration: f64) {
        self.remaining_time = duration.max(0.0);
        self.is_time_up = false;
        self.is_game_over = false;
    }
}
