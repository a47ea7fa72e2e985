//! Difficulty ramp driven by score milestones

use crate::tuning::Tuning;

/// What a milestone changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyChange {
    pub speed: f32,
    pub spawn_interval_ms: u32,
    /// Spawn timer must be restarted at `spawn_interval_ms`
    pub interval_changed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    /// Obstacle fall speed (units per tick)
    pub speed: f32,
    pub spawn_interval_ms: u32,
    /// Highest milestone index already applied (score / milestone_every)
    last_milestone: u64,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.start_speed,
            spawn_interval_ms: tuning.start_spawn_interval_ms,
            last_milestone: 0,
        }
    }

    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Apply every milestone reached since the last call.
    ///
    /// The score moves by exactly one per tick, so at most one milestone is
    /// crossed per call. Comparing milestone indices rather than testing
    /// `score % milestone_every == 0` keeps this correct for larger
    /// increments and makes a repeated call for the same score a no-op.
    pub fn update(&mut self, score: u64, tuning: &Tuning) -> Option<DifficultyChange> {
        let milestone = score / tuning.milestone_every;
        if milestone <= self.last_milestone {
            return None;
        }

        let mut interval_changed = false;
        for _ in self.last_milestone..milestone {
            self.speed += tuning.speed_step;
            if self.spawn_interval_ms > tuning.spawn_interval_floor_ms {
                self.spawn_interval_ms = self
                    .spawn_interval_ms
                    .saturating_sub(tuning.spawn_interval_step_ms)
                    .max(tuning.spawn_interval_floor_ms);
                interval_changed = true;
            }
        }
        self.last_milestone = milestone;

        Some(DifficultyChange {
            speed: self.speed,
            spawn_interval_ms: self.spawn_interval_ms,
            interval_changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_milestones() {
        let tuning = Tuning::default();
        let mut difficulty = Difficulty::new(&tuning);

        for score in 1..500 {
            assert!(difficulty.update(score, &tuning).is_none());
        }
        let change = difficulty.update(500, &tuning).unwrap();
        assert_eq!(change.speed, 5.5);
        assert_eq!(change.spawn_interval_ms, 1400);
        assert!(change.interval_changed);

        for score in 501..1000 {
            assert!(difficulty.update(score, &tuning).is_none());
        }
        let change = difficulty.update(1000, &tuning).unwrap();
        assert_eq!(change.speed, 6.0);
        assert_eq!(change.spawn_interval_ms, 1300);
    }

    #[test]
    fn test_same_score_applies_once() {
        let tuning = Tuning::default();
        let mut difficulty = Difficulty::new(&tuning);

        assert!(difficulty.update(500, &tuning).is_some());
        assert!(difficulty.update(500, &tuning).is_none());
        assert_eq!(difficulty.speed, 5.5);
        assert_eq!(difficulty.spawn_interval_ms, 1400);
    }

    #[test]
    fn test_zero_score_is_not_a_milestone() {
        let tuning = Tuning::default();
        let mut difficulty = Difficulty::new(&tuning);
        assert!(difficulty.update(0, &tuning).is_none());
        assert_eq!(difficulty.speed, 5.0);
    }

    #[test]
    fn test_interval_floor() {
        let tuning = Tuning::default();
        let mut difficulty = Difficulty::new(&tuning);

        // 1500 -> 500 takes ten milestones
        for n in 1..=10u64 {
            let change = difficulty.update(n * 500, &tuning).unwrap();
            assert!(change.interval_changed);
        }
        assert_eq!(difficulty.spawn_interval_ms, 500);
        assert_eq!(difficulty.speed, 10.0);

        let change = difficulty.update(11 * 500, &tuning).unwrap();
        assert!(!change.interval_changed);
        assert_eq!(change.spawn_interval_ms, 500);
        assert_eq!(change.speed, 10.5);
    }

    #[test]
    fn test_skipped_milestones_all_apply() {
        let tuning = Tuning::default();
        let mut difficulty = Difficulty::new(&tuning);

        let change = difficulty.update(1003, &tuning).unwrap();
        assert_eq!(change.speed, 6.0);
        assert_eq!(change.spawn_interval_ms, 1300);
    }
}
