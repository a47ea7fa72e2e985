//! Keyboard and touch mapping
//!
//! Turns raw browser input into simulation commands. Which commands are
//! accepted depends on the current phase.

use crate::sim::{Direction, GamePhase};

/// A command for the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Start,
}

/// Map a `KeyboardEvent.key` value
pub fn command_for_key(key: &str, phase: GamePhase) -> Option<Command> {
    match phase {
        GamePhase::Running => match key {
            "ArrowLeft" | "a" => Some(Command::Move(Direction::Left)),
            "ArrowRight" | "d" => Some(Command::Move(Direction::Right)),
            _ => None,
        },
        // Restart from the game over screen
        GamePhase::Over => match key {
            "Enter" | " " => Some(Command::Start),
            _ => None,
        },
        GamePhase::Idle => None,
    }
}

/// Map a touch at `touch_x` on a container spanning `[left, left + width)`.
/// The left half moves left, the right half moves right.
pub fn command_for_touch(touch_x: f32, left: f32, width: f32, phase: GamePhase) -> Option<Command> {
    if phase != GamePhase::Running {
        return None;
    }
    let midpoint = left + width / 2.0;
    let direction = if touch_x < midpoint {
        Direction::Left
    } else {
        Direction::Right
    };
    Some(Command::Move(direction))
}
