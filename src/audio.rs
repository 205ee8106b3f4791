//! Audio cues
//!
//! The core never touches an audio device. Cues are queued here with their
//! volume and the engine drains and plays them once per frame.

use serde::{Deserialize, Serialize};

use crate::settings::AudioSettings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCue {
    /// Ball launched (also the start swipe)
    Throw,
    /// Ball hits the floor
    Bounce,
    /// Ball hits the ring
    Ring,
    /// Ball drops through the net
    Swish,
    /// Clock ran out
    Buzzer,
    /// Game ended with a passing score
    Success,
    /// Game ended below the passing score
    Fail,
}

impl AudioCue {
    /// Asset name the engine loads for this cue
    pub fn asset(&self) -> &'static str {
        match self {
            AudioCue::Throw => "throw",
            AudioCue::Bounce => "bounce",
            AudioCue::Ring => "ring",
            AudioCue::Swish => "swish",
            AudioCue::Buzzer => "buzzer",
            AudioCue::Success => "success",
            AudioCue::Fail => "fail",
        }
    }

    /// Collision noises, which can fire many times a second
    pub fn is_contact(&self) -> bool {
        matches!(self, AudioCue::Bounce | AudioCue::Ring)
    }
}

/// A cue waiting for the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueuedCue {
    pub cue: AudioCue,
    pub volume: f32,
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    /// Off until the first user gesture
    enabled: bool,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    repeat_window: f64,
    /// Contact cues inside `repeat_window` are dropped
    throttle_contacts: bool,
    last_played: Option<f64>,
    queue: Vec<QueuedCue>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(&AudioSettings::default())
    }
}

impl AudioManager {
    pub fn new(settings: &AudioSettings) -> Self {
        Self {
            enabled: false,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            repeat_window: settings.repeat_window.max(0.0),
            throttle_contacts: settings.throttle_contacts,
            last_played: None,
            queue: Vec::new(),
        }
    }

    /// Allow playback (required after user gesture)
    pub fn enable(&mut self) {
        if !self.enabled {
            log::debug!("Audio enabled");
        }
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue a cue at time `now`; returns whether it was queued
    pub fn play(&mut self, cue: AudioCue, now: f64) -> bool {
        if !self.enabled {
            return false;
        }
        if self.throttle_contacts
            && cue.is_contact()
            && self
                .last_played
                .is_some_and(|last| now - last < self.repeat_window)
        {
            return false;
        }
        self.last_played = Some(now);

        let volume = self.effective_volume();
        if volume <= 0.0 {
            return false;
        }

        self.queue.push(QueuedCue { cue, volume });
        true
    }

    /// Cues queued since the last drain
    pub fn pending(&self) -> &[QueuedCue] {
        &self.queue
    }

    /// Hand queued cues to the engine
    pub fn drain(&mut self) -> Vec<QueuedCue> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> AudioManager {
        let mut audio = AudioManager::default();
        audio.enable();
        audio
    }

    #[test]
    fn test_silent_until_enabled() {
        let mut audio = AudioManager::default();
        assert!(!audio.play(AudioCue::Throw, 0.0));
        assert!(audio.drain().is_empty());

        audio.enable();
        assert!(audio.play(AudioCue::Throw, 0.0));
        assert_eq!(
            audio.drain(),
            vec![QueuedCue {
                cue: AudioCue::Throw,
                volume: 0.8
            }]
        );
        assert!(audio.pending().is_empty());
    }

    #[test]
    fn test_contact_cues_throttled() {
        let mut audio = enabled();
        assert!(audio.play(AudioCue::Bounce, 1.0));
        assert!(!audio.play(AudioCue::Bounce, 1.05));
        assert!(!audio.play(AudioCue::Ring, 1.09));
        assert!(audio.play(AudioCue::Ring, 1.2));
        assert_eq!(audio.drain().len(), 2);
    }

    #[test]
    fn test_contact_throttle_can_be_disabled() {
        let mut audio = AudioManager::new(&AudioSettings {
            throttle_contacts: false,
            ..Default::default()
        });
        audio.enable();
        assert!(audio.play(AudioCue::Bounce, 1.0));
        assert!(audio.play(AudioCue::Bounce, 1.01));
        assert!(audio.play(AudioCue::Ring, 1.02));
        assert_eq!(audio.drain().len(), 3);
    }

    #[test]
    fn test_forced_cues_ignore_window() {
        let mut audio = enabled();
        assert!(audio.play(AudioCue::Ring, 1.0));
        assert!(audio.play(AudioCue::Swish, 1.01));
        assert!(audio.play(AudioCue::Buzzer, 1.02));
        let cues: Vec<AudioCue> = audio.drain().iter().map(|q| q.cue).collect();
        assert_eq!(cues, vec![AudioCue::Ring, AudioCue::Swish, AudioCue::Buzzer]);
    }

    #[test]
    fn test_muted_queues_nothing() {
        let mut audio = enabled();
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
        assert!(!audio.play(AudioCue::Success, 0.0));
        assert!(audio.drain().is_empty());
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = enabled();
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }

    #[test]
    fn test_asset_names() {
        assert_eq!(AudioCue::Swish.asset(), "swish");
        assert_eq!(
            serde_json::to_string(&AudioCue::Buzzer).expect("serialize"),
            "\"buzzer\""
        );
    }
}
