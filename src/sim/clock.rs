//! Countdown clock
//!
//! Each tick subtracts the real time elapsed since the previous tick, so the
//! countdown stays correct at any frame rate and across dropped frames.
//! Timestamps are monotonic seconds supplied by the frame driver.

use super::store::GameStore;

/// Leftover below this counts as zero (absorbs float error from summing
/// frame deltas)
const TIME_EPSILON: f64 = 1e-9;

/// Emitted by the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// Countdown reached zero
    TimeUp,
}

/// Drift-compensated countdown
#[derive(Debug, Clone)]
pub struct GameClock {
    remaining: f64,
    last_tick: f64,
    last_publish: f64,
    display_interval: f64,
    /// A tick is pending; cleared by stop/reset/time-up so stale ticks no-op
    scheduled: bool,
}

impl GameClock {
    pub fn new(duration: f64, display_interval: f64) -> Self {
        Self {
            remaining: duration.max(0.0),
            last_tick: 0.0,
            last_publish: 0.0,
            display_interval: display_interval.max(0.0),
            scheduled: false,
        }
    }

    /// Exact remaining time (may be ahead of what the store shows)
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.scheduled
    }

    /// Begin ticking from `now` if the game is live
    pub fn start(&mut self, now: f64, store: &GameStore) -> bool {
        self.last_tick = now;
        self.last_publish = now;
        self.scheduled = store.is_playing() && !store.is_time_up() && !store.is_game_over();
        if self.scheduled {
            log::debug!("Clock started with {:.2}s left", self.remaining);
        }
        self.scheduled
    }

    /// Advance to `now`
    pub fn tick(&mut self, now: f64, store: &mut GameStore) -> Option<ClockEvent> {
        if !self.scheduled {
            return None;
        }

        let elapsed = (now - self.last_tick).max(0.0);
        self.last_tick = now;
        self.remaining -= elapsed;

        if self.remaining <= TIME_EPSILON {
            self.remaining = 0.0;
            self.scheduled = false;
            store.publish_time_up();
            log::info!("Time's up!");
            return Some(ClockEvent::TimeUp);
        }

        if now - self.last_publish >= self.display_interval {
            store.publish_remaining(self.remaining);
            self.last_publish = now;
        }

        // Keep ticking only while the game is live
        self.scheduled = store.is_playing() && !store.is_time_up() && !store.is_game_over();
        if !self.scheduled {
            store.publish_remaining(self.remaining);
        }
        None
    }

    /// Halt, flushing the exact remaining time into the store
    pub fn stop(&mut self, store: &mut GameStore) {
        if self.scheduled {
            log::debug!("Clock stopped with {:.2}s left", self.remaining);
        }
        store.publish_remaining(self.remaining);
        self.scheduled = false;
    }

    /// Rewind to `duration`, cancelling any pending tick
    pub fn reset(&mut self, duration: f64, store: &mut GameStore) {
        self.remaining = duration.max(0.0);
        self.scheduled = false;
        store.publish_clock_reset(self.remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn live_store() -> GameStore {
        let mut store = GameStore::new(&Settings::default());
        store.reset_game(0.0);
        store.start();
        store
    }

    #[test]
    fn test_does_not_start_when_idle() {
        let store = GameStore::new(&Settings::default());
        let mut clock = GameClock::new(24.0, 0.1);
        assert!(!clock.start(0.0, &store));
        assert!(!clock.is_running());
    }

    #[test]
    fn test_countdown_follows_elapsed_time_not_ticks() {
        let mut store = live_store();
        let mut clock = GameClock::new(24.0, 0.0);
        clock.start(0.0, &store);

        // Uneven frame spacing, including a long hitch
        for now in [0.016, 0.05, 0.051, 1.5, 2.0] {
            assert_eq!(clock.tick(now, &mut store), None);
        }
        assert!((clock.remaining() - 22.0).abs() < 1e-9);
        assert!((store.remaining_time() - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_up_fires_once() {
        let mut store = live_store();
        let mut clock = GameClock::new(24.0, 0.1);
        clock.start(0.0, &store);

        let mut now = 0.0;
        let mut fired = 0;
        for _ in 0..24 * 4 {
            now += 0.25;
            if clock.tick(now, &mut store) == Some(ClockEvent::TimeUp) {
                fired += 1;
            }
        }
        // Further ticks are stale
        assert_eq!(clock.tick(now + 1.0, &mut store), None);

        assert_eq!(fired, 1);
        assert!(store.is_time_up() && store.is_game_over() && !store.is_playing());
        assert_eq!(store.remaining_time(), 0.0);
        assert_eq!(clock.remaining(), 0.0);
    }

    #[test]
    fn test_overshoot_clamps_to_zero() {
        let mut store = live_store();
        let mut clock = GameClock::new(1.0, 0.1);
        clock.start(10.0, &store);
        assert_eq!(clock.tick(15.0, &mut store), Some(ClockEvent::TimeUp));
        assert_eq!(store.remaining_time(), 0.0);
    }

    #[test]
    fn test_stop_flushes_exact_remaining() {
        let mut store = live_store();
        let mut clock = GameClock::new(24.0, 10.0);
        clock.start(0.0, &store);
        clock.tick(0.5, &mut store);
        clock.tick(0.75, &mut store);
        // Throttled: store still shows the start value
        assert_eq!(store.remaining_time(), 24.0);

        clock.stop(&mut store);
        assert!((store.remaining_time() - 23.25).abs() < 1e-9);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_stops_and_flushes_when_play_ends() {
        let mut store = live_store();
        let mut clock = GameClock::new(24.0, 10.0);
        clock.start(0.0, &store);

        store.finish();
        assert_eq!(clock.tick(1.0, &mut store), None);
        assert!(!clock.is_running());
        assert!((store.remaining_time() - 23.0).abs() < 1e-9);
        // No further decrements
        clock.tick(5.0, &mut store);
        assert!((clock.remaining() - 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_cancels_pending_tick() {
        let mut store = live_store();
        let mut clock = GameClock::new(24.0, 0.1);
        clock.start(0.0, &store);
        clock.tick(3.0, &mut store);

        clock.reset(24.0, &mut store);
        assert!(!clock.is_running());
        assert_eq!(clock.tick(100.0, &mut store), None);
        assert_eq!(clock.remaining(), 24.0);
        assert_eq!(store.remaining_time(), 24.0);
    }

    #[test]
    fn test_restart_measures_from_new_start() {
        let mut store = live_store();
        let mut clock = GameClock::new(24.0, 0.0);
        clock.start(0.0, &store);
        clock.tick(2.0, &mut store);
        clock.stop(&mut store);

        // Long pause, then resume
        clock.start(50.0, &store);
        clock.tick(51.0, &mut store);
        assert!((clock.remaining() - 21.0).abs() < 1e-9);
    }
}
