//! Data-driven game balance
//!
//! Defaults come from `consts`. An override can be supplied as JSON
//! (LocalStorage in the browser, a file named by `CATTLE_RUN_TUNING` natively).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Failure to load or validate a tuning override
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Io(std::io::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "tuning JSON is malformed: {err}"),
            Self::Io(err) => write!(f, "tuning file could not be read: {err}"),
            Self::Invalid { field, reason } => write!(f, "tuning field `{field}` {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Game loop period
    pub tick_ms: u32,
    /// Obstacle fall speed when a run starts (units per tick)
    pub start_speed: f32,
    /// Spawn trigger period when a run starts
    pub start_spawn_interval_ms: u32,
    /// Score multiple that triggers a difficulty increase
    pub milestone_every: u64,
    pub speed_step: f32,
    pub spawn_interval_step_ms: u32,
    pub spawn_interval_floor_ms: u32,
    /// Vertical position new obstacles appear at
    pub obstacle_spawn_top: f32,
    /// Movement step is playable width divided by this
    pub step_divisor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            start_speed: START_SPEED,
            start_spawn_interval_ms: START_SPAWN_INTERVAL_MS,
            milestone_every: MILESTONE_EVERY,
            speed_step: SPEED_STEP,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            spawn_interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,
            obstacle_spawn_top: OBSTACLE_SPAWN_TOP,
            step_divisor: STEP_DIVISOR,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cattle_run_tuning";

    /// Environment variable naming a JSON override file (native only)
    pub const ENV_VAR: &'static str = "CATTLE_RUN_TUNING";

    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.tick_ms == 0 {
            return invalid("tick_ms", "must be positive");
        }
        if !(self.start_speed.is_finite() && self.start_speed >= 0.0) {
            return invalid("start_speed", "must be a non-negative number");
        }
        if self.start_spawn_interval_ms == 0 {
            return invalid("start_spawn_interval_ms", "must be positive");
        }
        if self.milestone_every == 0 {
            return invalid("milestone_every", "must be positive");
        }
        if !(self.speed_step.is_finite() && self.speed_step >= 0.0) {
            return invalid("speed_step", "must be a non-negative number");
        }
        if self.spawn_interval_floor_ms == 0 {
            return invalid("spawn_interval_floor_ms", "must be positive");
        }
        if self.spawn_interval_floor_ms > self.start_spawn_interval_ms {
            return invalid(
                "spawn_interval_floor_ms",
                "must not exceed start_spawn_interval_ms",
            );
        }
        if !self.obstacle_spawn_top.is_finite() {
            return invalid("obstacle_spawn_top", "must be a finite number");
        }
        if !(self.step_divisor.is_finite() && self.step_divisor > 0.0) {
            return invalid("step_divisor", "must be positive");
        }
        Ok(())
    }

    /// Load the override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(err) => log::warn!("Ignoring tuning override: {}", err),
                }
            }
        }

        Self::default()
    }

    /// Load the override from the file named by `CATTLE_RUN_TUNING`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning override from {}", path);
                tuning
            }
            Err(err) => {
                log::warn!("Ignoring tuning override {}: {}", path, err);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &str) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
