//! Cattle Run - a falling-obstacle dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (session state, obstacles, collisions, timers)
//! - `tuning`: Data-driven game balance
//! - `input`: Key/touch mapping into simulation commands
//! - `coin`: Coin-flip side widget

pub mod coin;
pub mod input;
pub mod sim;
pub mod tuning;

pub use coin::{CoinFace, CoinFlip};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Game loop period in milliseconds (~50 Hz)
    pub const TICK_MS: u32 = 20;

    /// Obstacle fall speed at the start of a run (units per tick)
    pub const START_SPEED: f32 = 5.0;
    /// Spawn trigger period at the start of a run
    pub const START_SPAWN_INTERVAL_MS: u32 = 1500;

    /// Score multiple that triggers a difficulty increase
    pub const MILESTONE_EVERY: u64 = 500;
    pub const SPEED_STEP: f32 = 0.5;
    pub const SPAWN_INTERVAL_STEP_MS: u32 = 100;
    /// Spawn interval only shrinks while strictly above this
    pub const SPAWN_INTERVAL_FLOOR_MS: u32 = 500;

    /// Obstacles start above the visible top edge
    pub const OBSTACLE_SPAWN_TOP: f32 = -60.0;
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const OBSTACLE_HEIGHT: f32 = 50.0;

    /// Player moves in jumps of playable width / STEP_DIVISOR
    pub const STEP_DIVISOR: f32 = 6.0;

    /// Default playable area (overridden by the container size in the browser)
    pub const DEFAULT_WIDTH: f32 = 400.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_BOTTOM_OFFSET: f32 = 10.0;

    /// Largest frame delta fed to the simulation (prevents catch-up bursts)
    pub const MAX_FRAME_MS: f64 = 100.0;
}

/// Clamp `value` into `[0, max]`, treating a negative `max` as 0
#[inline]
pub fn clamp_to_bound(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}
