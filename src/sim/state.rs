//! Game session state and core simulation types
//!
//! A `GameSession` owns everything one run needs. There is no global state,
//! so several sessions can run side by side (tests rely on this).

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::obstacles::ObstacleRegistry;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing simulated yet
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run ended, waiting for restart
    Over,
}

/// Horizontal movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Opaque obstacle handle. The UI maps it to its visual element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obstacle#{}", self.0)
    }
}

/// A falling obstacle. `pos` is its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub pos: Vec2,
}

/// Playable area and entity sizes, supplied by the UI collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: f32,
    pub height: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Gap between the player's bottom edge and the playable bottom
    pub player_bottom_offset: f32,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Geometry {
    /// Playable area of the given size with default entity sizes
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
        }
    }

    /// Largest allowed player x
    #[inline]
    pub fn player_max_x(&self) -> f32 {
        (self.width - self.player_width).max(0.0)
    }

    /// Obstacles spawn with x in `[0, spawn_bound)`
    #[inline]
    pub fn spawn_bound(&self) -> f32 {
        (self.width - self.obstacle_width).max(0.0)
    }

    /// Player x that centers it horizontally
    #[inline]
    pub fn center_x(&self) -> f32 {
        crate::clamp_to_bound(self.width / 2.0 - self.player_width / 2.0, self.player_max_x())
    }

    /// Fixed top edge of the player
    #[inline]
    pub fn player_top(&self) -> f32 {
        self.height - self.player_bottom_offset - self.player_height
    }
}

/// The player's avatar. Only `x` ever changes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
}

/// Output signals for the UI collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    ScoreChanged(u64),
    GameOver { final_score: u64 },
    ObstacleSpawned { id: ObstacleId, pos: Vec2 },
    ObstacleRemoved(ObstacleId),
    ObstacleAdvanced { id: ObstacleId, pos: Vec2 },
    PlayerMoved(f32),
    DifficultyIncreased { speed: f32, spawn_interval_ms: u32 },
}

/// One player's game: phase, score, difficulty, obstacles and player
///
/// Every operation appends [`GameEvent`]s to an internal queue. The queue is
/// only emptied by [`GameSession::drain_events`], so the UI must drain it once
/// per frame; a caller that never drains will see it grow with every tick.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) tuning: Tuning,
    pub(crate) geometry: Geometry,
    /// Movement step, derived from geometry
    pub(crate) step: f32,
    pub(crate) phase: GamePhase,
    pub(crate) score: u64,
    pub(crate) final_score: Option<u64>,
    /// Highest final score since this session was created. Never persisted.
    pub(crate) best_score: Option<u64>,
    pub(crate) difficulty: Difficulty,
    pub(crate) player: Player,
    pub(crate) obstacles: ObstacleRegistry,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    /// New spawn period waiting to be applied to the spawn timer
    pub(crate) pending_spawn_interval: Option<u32>,
}

impl GameSession {
    /// Create an idle session with the given RNG seed
    pub fn new(seed: u64, tuning: Tuning, geometry: Geometry) -> Self {
        let step = geometry.width / tuning.step_divisor;
        let difficulty = Difficulty::new(&tuning);
        Self {
            tuning,
            geometry,
            step,
            phase: GamePhase::Idle,
            score: 0,
            final_score: None,
            best_score: None,
            difficulty,
            player: Player {
                x: geometry.center_x(),
            },
            obstacles: ObstacleRegistry::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            pending_spawn_interval: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Score recorded by the last game over
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Best final score of this page session, `None` before the first game over
    pub fn best_score(&self) -> Option<u64> {
        self.best_score
    }

    pub fn speed(&self) -> f32 {
        self.difficulty.speed
    }

    pub fn spawn_interval_ms(&self) -> u32 {
        self.difficulty.spawn_interval_ms
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn obstacles(&self) -> &ObstacleRegistry {
        &self.obstacles
    }

    /// Take all events emitted since the last drain. Call once per frame.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take the spawn period change requested by the difficulty controller
    pub fn take_spawn_interval_change(&mut self) -> Option<u32> {
        self.pending_spawn_interval.take()
    }
}
