//! End-of-game summary

use serde::{Deserialize, Serialize};

use super::store::GameStore;

/// How the game went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    TimeUp,
    Perfect,
    AlmostPerfect,
    Good,
    NotBad,
    Tough,
    Zero,
}

impl Rating {
    /// Rate a finished game
    pub fn from_result(makes: u32, total_balls: usize, time_up: bool) -> Self {
        if time_up {
            return Rating::TimeUp;
        }
        match makes {
            m if m as usize >= total_balls => Rating::Perfect,
            8.. => Rating::AlmostPerfect,
            6..=7 => Rating::Good,
            4..=5 => Rating::NotBad,
            1..=3 => Rating::Tough,
            0 => Rating::Zero,
        }
    }

    /// Two wordings per tier so repeat games don't read the same
    pub fn headlines(&self) -> [&'static str; 2] {
        match self {
            Rating::TimeUp => ["Time's up!", "Time's up!"],
            Rating::Perfect => ["Hey, are you Curry?", "Curry, is that you?"],
            Rating::AlmostPerfect => ["Almost perfect!", "Almost there!"],
            Rating::Good => ["Good aim!", "That's good!"],
            Rating::NotBad => ["Not bad", "Keep going"],
            Rating::Tough => ["Better luck next time", "That was tough :("],
            Rating::Zero => ["Oops, try again", "Ouch!!!"],
        }
    }

    pub fn headline(&self, variant: usize) -> &'static str {
        self.headlines()[variant % 2]
    }
}

/// Final result shown after the game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub makes: u32,
    pub total_shots: u32,
    /// Seconds of game time used
    pub elapsed: f64,
    pub rating: Rating,
    /// Made at least the success threshold
    pub success: bool,
}

impl GameSummary {
    pub fn from_store(store: &GameStore, success_threshold: u32) -> Self {
        let remaining = store.remaining_time();
        let time_up = remaining <= 0.0;
        Self {
            makes: store.makes(),
            total_shots: store.total_shots(),
            elapsed: (store.game_time() - remaining).max(0.0),
            rating: Rating::from_result(store.makes(), store.total_balls(), time_up),
            success: store.makes() >= success_threshold,
        }
    }

    /// Elapsed time as shown on the score card, e.g. `"13.7s"`
    pub fn elapsed_label(&self) -> String {
        format!("{:.1}s", self.elapsed)
    }
}
