//! Game settings and tuning
//!
//! Every empirically tuned number of the game lives here so hosts can tweak
//! feel without touching the simulation. Loaded from JSON; any missing field
//! falls back to its default.

use std::fmt;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITY, PERFECT_SHOT_CONSTANT, SPIN_RATE};

/// Error raised while loading settings
#[derive(Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    Io(std::io::Error),
    /// Settings file is not valid JSON for `Settings`
    Parse(serde_json::Error),
    /// Settings parsed but a value is out of range
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {e}"),
            SettingsError::Invalid(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Shot solver tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotTuning {
    /// Gravity used to solve the launch arc (m/s²)
    pub gravity: f32,
    /// Apex height above the rim for a shot from right under it
    pub apex_base: f32,
    /// Extra apex height per meter of horizontal distance
    pub apex_per_distance: f32,
    /// Scales the solved velocity into an engine impulse
    pub perfect_shot_constant: f32,

    /// Vertical drag (px) of a perfect swipe
    pub expected_drag: f32,
    /// Drag error (px) that still counts as perfect
    pub drag_tolerance: f32,
    /// Multiplier applied to the swipe duration before comparing
    pub duration_scale: f32,
    /// Scaled duration of a perfect swipe
    pub expected_duration: f32,
    /// Scaled duration error that still counts as perfect
    pub duration_tolerance: f32,

    /// Converts swipe angle (radians) into aim rotation
    pub aim_factor: f32,
    /// Backspin magnitude (rad/s)
    pub spin_rate: f32,
    /// Lower bound for horizontal distance and spin denominator
    pub min_horizontal: f32,
}

impl Default for ShotTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            apex_base: 1.0,
            apex_per_distance: 0.1,
            perfect_shot_constant: PERFECT_SHOT_CONSTANT,

            expected_drag: 200.0,
            drag_tolerance: 10.0,
            duration_scale: 8.0,
            expected_duration: 1.0,
            duration_tolerance: 1.0,

            aim_factor: -0.09,
            spin_rate: SPIN_RATE,
            min_horizontal: 1e-3,
        }
    }
}

/// Audio preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start muted
    pub muted: bool,
    /// Contact cues closer together than this (seconds) are dropped
    pub repeat_window: f64,
    /// Apply `repeat_window` to bounce and ring cues; off plays every contact
    pub throttle_contacts: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            repeat_window: 0.1,
            throttle_contacts: true,
        }
    }
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Game ===
    /// Seconds to finish the game
    pub game_time: f64,
    /// Balls per game
    pub total_balls: usize,
    /// Racks laid out on a half circle around the hoop (odd keeps rack 0 on
    /// the free-throw line)
    pub total_racks: usize,
    /// Distance from the rim to each rack (m)
    pub rack_distance: f32,
    /// Rim center in world space
    pub ring_position: Vec3,

    // === Shooting ===
    /// Base spacing between shots (seconds); also drives the spawn delay
    pub shot_spawn_time: f64,
    /// Extra wait on top of `shot_spawn_time` before the next shot
    pub shot_cooldown: f64,
    /// Swipes with less vertical travel (px) are ignored
    pub min_vertical_delta: f32,

    // === Ball lifecycle ===
    /// Resting height of a ball on its rack
    pub spawn_height: f32,
    /// How far below `spawn_height` a ball appears before rising
    pub spawn_drop: f32,
    /// Easing rate (per second) while a ball rises onto its rack
    pub enter_ease_rate: f32,
    /// Snap to the rack once this close
    pub settle_epsilon: f32,
    /// Balls below this height fell out of the world
    pub floor_threshold: f32,
    /// A descending ball this far below the rim has missed
    pub miss_margin: f32,
    /// Miss detection only above this height (ignores rolling balls)
    pub miss_floor: f32,
    /// Minimum time in play before a miss can remove the ball (seconds)
    pub miss_grace: f32,
    /// A thrown ball slower than this (m/s) below `miss_floor` has stopped
    pub rest_speed: f32,
    /// Time a resolved ball lingers before leaving (seconds)
    pub exit_delay: f32,

    // === Scoring ===
    /// Rim-sensor exits this far below the rim count as makes
    pub make_depth: f32,
    /// Floor contacts below this height are silent
    pub bounce_min_height: f32,
    /// Delay between game over and the result (seconds)
    pub result_delay: f64,
    /// Makes needed for the success jingle
    pub success_threshold: u32,
    /// Remaining time is published at most this often while running
    pub display_interval: f64,

    pub shot: ShotTuning,
    pub audio: AudioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Game
            game_time: 24.0,
            total_balls: 10,
            total_racks: 5,
            rack_distance: 8.0,
            ring_position: Vec3::new(0.0, 3.0, -2.4),

            // Shooting
            shot_spawn_time: 0.5,
            shot_cooldown: 0.3,
            min_vertical_delta: 0.02,

            // Ball lifecycle
            spawn_height: 0.31,
            spawn_drop: 0.3,
            enter_ease_rate: 8.0,
            settle_epsilon: 1e-3,
            floor_threshold: -2.0,
            miss_margin: 0.8,
            miss_floor: 1.0,
            miss_grace: 0.2,
            rest_speed: 0.05,
            exit_delay: 1.5,

            // Scoring
            make_depth: 0.15,
            bounce_min_height: 0.1,
            result_delay: 1.5,
            success_threshold: 4,
            display_interval: 0.1,

            shot: ShotTuning::default(),
            audio: AudioSettings::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate().map_err(SettingsError::Invalid)?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Wait after a ball settles before it can be shot (seconds)
    ///
    /// The spawn time is expressed in tenths of the settle wait, so the
    /// default 0.5 gives 50ms.
    pub fn spawn_delay(&self) -> f32 {
        (self.shot_spawn_time * 100.0 / 1000.0) as f32
    }

    /// Minimum spacing between two accepted shots (seconds)
    pub fn shot_interval(&self) -> f64 {
        self.shot_spawn_time + self.shot_cooldown
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.game_time.is_finite() || self.game_time <= 0.0 {
            return Err("game_time must be finite and > 0".to_string());
        }
        if self.total_balls == 0 {
            return Err("total_balls must be >= 1".to_string());
        }
        if self.total_racks == 0 || self.total_racks > self.total_balls {
            return Err("total_racks must be between 1 and total_balls".to_string());
        }
        if !self.rack_distance.is_finite() || self.rack_distance <= 0.0 {
            return Err("rack_distance must be finite and > 0".to_string());
        }
        if !self.ring_position.is_finite() {
            return Err("ring_position must be finite".to_string());
        }
        if self.spawn_height >= self.ring_position.y {
            return Err("spawn_height must be below the rim".to_string());
        }
        if self.shot_spawn_time < 0.0 || self.shot_cooldown < 0.0 {
            return Err("shot_spawn_time and shot_cooldown must be >= 0".to_string());
        }
        if self.min_vertical_delta < 0.0 {
            return Err("min_vertical_delta must be >= 0".to_string());
        }
        if self.enter_ease_rate <= 0.0 || self.settle_epsilon <= 0.0 {
            return Err("enter_ease_rate and settle_epsilon must be > 0".to_string());
        }
        if self.miss_grace < 0.0 || self.exit_delay < 0.0 || self.result_delay < 0.0 {
            return Err("lifecycle delays must be >= 0".to_string());
        }
        if !self.rest_speed.is_finite() || self.rest_speed < 0.0 {
            return Err("rest_speed must be finite and >= 0".to_string());
        }
        if self.display_interval < 0.0 {
            return Err("display_interval must be >= 0".to_string());
        }

        let shot = &self.shot;
        if shot.gravity <= 0.0 {
            return Err("shot.gravity must be > 0".to_string());
        }
        if shot.drag_tolerance <= 0.0 || shot.duration_tolerance <= 0.0 {
            return Err("shot tolerances must be > 0".to_string());
        }
        if shot.min_horizontal <= 0.0 {
            return Err("shot.min_horizontal must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.audio.master_volume)
            || !(0.0..=1.0).contains(&self.audio.sfx_volume)
        {
            return Err("audio volumes must be within 0.0 - 1.0".to_string());
        }
        Ok(())
    }
}
