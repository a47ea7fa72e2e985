//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only, time is simulated milliseconds
//! - Seeded RNG only
//! - Stable obstacle order (spawn order)
//! - No DOM or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod obstacles;
pub mod runner;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_collision, obstacle_rect, player_rect};
pub use difficulty::{Difficulty, DifficultyChange};
pub use obstacles::ObstacleRegistry;
pub use runner::Runner;
pub use schedule::{Firing, Schedule, Timer, TimerKind};
pub use state::{
    Direction, GameEvent, GamePhase, GameSession, Geometry, Obstacle, ObstacleId, Player,
};
