//! Game simulation
//!
//! All gameplay logic lives here. The physics engine is reached only through
//! the `BallBody` / `World` traits:
//! - Time only advances through frame deltas
//! - Balls are always visited in index order
//! - No rendering or audio device dependencies

pub mod ball;
pub mod body;
pub mod clock;
pub mod input;
pub mod rack;
pub mod shot;
pub mod store;
pub mod summary;
pub mod tick;

pub use ball::{BallLifecycle, BallPhase};
pub use body::{BallBody, Contact, Surface, World};
pub use clock::{ClockEvent, GameClock};
pub use input::{PressEvent, Swipe, SwipeTracker};
pub use rack::{park_position, rack_index, rack_positions, spawn_position};
pub use shot::{Gesture, ShotVector, compute_shot, proximity_to_target, shot_power};
pub use store::{Ball, GameStore, ShotRejected, Snapshot};
pub use summary::{GameSummary, Rating};
pub use tick::{Game, GameEvent, PointerInput, TickInput};
