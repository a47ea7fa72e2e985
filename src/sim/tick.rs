//! Game loop and state machine
//!
//! Every operation is a no-op unless the session is in the phase it applies to.

use glam::Vec2;
use rand::Rng;

use super::collision::{first_collision, player_rect};
use super::state::{Direction, GameEvent, GamePhase, GameSession, Geometry, ObstacleId};

impl GameSession {
    /// Begin a fresh run (also used for restart)
    pub fn start(&mut self) {
        if self.phase == GamePhase::Running {
            log::info!("Restarting run at score {}", self.score);
        }

        self.phase = GamePhase::Running;
        self.score = 0;
        self.final_score = None;
        self.difficulty.reset(&self.tuning);
        self.pending_spawn_interval = None;
        self.obstacles.clear(&mut self.events);

        self.player.x = self.geometry.center_x();
        self.events.push(GameEvent::Started);
        self.events.push(GameEvent::PlayerMoved(self.player.x));
        self.events.push(GameEvent::ScoreChanged(0));

        log::info!(
            "Run started: speed={:.1}, spawn every {}ms",
            self.difficulty.speed,
            self.difficulty.spawn_interval_ms
        );
    }

    /// Finish the run and record the final score
    pub fn end(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::Over;
        self.final_score = Some(self.score);
        self.best_score = self.best_score.max(Some(self.score));
        self.pending_spawn_interval = None;
        self.events.push(GameEvent::GameOver {
            final_score: self.score,
        });
        log::info!("Game over, final score {}", self.score);
    }

    /// Advance the simulation by one fixed tick
    pub fn tick(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }

        // 1. Move obstacles, dropping the ones that left the playable area
        self.obstacles
            .advance(self.difficulty.speed, self.geometry.height, &mut self.events);

        // 2. Collision ends the run before anything else happens this tick
        let player = player_rect(&self.geometry, self.player.x);
        if let Some(id) = first_collision(&player, &self.geometry, self.obstacles.iter()) {
            log::debug!("Player hit {}", id);
            self.end();
            return;
        }

        // 3. Score
        self.score += 1;
        self.events.push(GameEvent::ScoreChanged(self.score));

        // 4. Difficulty. Milestones assume the +1 score step above.
        if let Some(change) = self.difficulty.update(self.score, &self.tuning) {
            if change.interval_changed {
                self.pending_spawn_interval = Some(change.spawn_interval_ms);
            }
            self.events.push(GameEvent::DifficultyIncreased {
                speed: change.speed,
                spawn_interval_ms: change.spawn_interval_ms,
            });
            log::info!(
                "Difficulty increase: speed={:.1}, spawn every {}ms",
                change.speed,
                change.spawn_interval_ms
            );
        }
    }

    /// Create one obstacle above the visible top at a random x
    pub fn spawn(&mut self) -> Option<ObstacleId> {
        if self.phase != GamePhase::Running {
            return None;
        }

        let bound = self.geometry.spawn_bound();
        let x = if bound > 0.0 {
            self.rng.random::<f32>() * bound
        } else {
            0.0
        };
        let pos = Vec2::new(x, self.tuning.obstacle_spawn_top);
        let id = self.obstacles.insert(pos);
        self.events.push(GameEvent::ObstacleSpawned { id, pos });
        log::debug!("Spawned {} at x={:.1}", id, x);
        Some(id)
    }

    /// Jump one step left or right, clamped to the playable area
    pub fn move_player(&mut self, direction: Direction) {
        if self.phase != GamePhase::Running {
            return;
        }
        let x = self.player.x + direction.sign() * self.step;
        self.player.x = crate::clamp_to_bound(x, self.geometry.player_max_x());
        self.events.push(GameEvent::PlayerMoved(self.player.x));
    }

    /// Replace the playable geometry and recompute derived values
    pub fn resize(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.step = geometry.width / self.tuning.step_divisor;

        self.player.x = if self.phase == GamePhase::Running {
            crate::clamp_to_bound(self.player.x, geometry.player_max_x())
        } else {
            geometry.center_x()
        };
        self.events.push(GameEvent::PlayerMoved(self.player.x));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn session(width: f32, height: f32) -> GameSession {
        GameSession::new(12345, Tuning::default(), Geometry::new(width, height))
    }

    #[test]
    fn test_idle_ignores_everything() {
        let mut s = session(300.0, 600.0);
        let x = s.player().x;

        s.tick();
        s.move_player(Direction::Right);
        assert_eq!(s.spawn(), None);

        assert_eq!(s.phase(), GamePhase::Idle);
        assert_eq!(s.score(), 0);
        assert_eq!(s.player().x, x);
        assert!(s.obstacles().is_empty());
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_start_resets_run() {
        let mut s = session(300.0, 600.0);
        s.start();
        s.spawn();
        for _ in 0..10 {
            s.tick();
        }
        s.move_player(Direction::Left);
        s.drain_events();

        s.start();
        assert_eq!(s.phase(), GamePhase::Running);
        assert_eq!(s.score(), 0);
        assert_eq!(s.speed(), 5.0);
        assert_eq!(s.spawn_interval_ms(), 1500);
        assert!(s.obstacles().is_empty());
        assert_eq!(s.player().x, 300.0 / 2.0 - 50.0 / 2.0);

        let events = s.drain_events();
        assert!(matches!(events[0], GameEvent::ObstacleRemoved(_)));
        assert!(events.contains(&GameEvent::Started));
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
    }

    #[test]
    fn test_score_increments_once_per_tick() {
        let mut s = session(300.0, 600.0);
        s.start();
        for expected in 1..=25 {
            s.tick();
            assert_eq!(s.score(), expected);
        }
    }

    #[test]
    fn test_three_right_moves_from_left_edge() {
        let mut geometry = Geometry::new(300.0, 600.0);
        geometry.player_width = 30.0;
        let mut s = GameSession::new(1, Tuning::default(), geometry);
        s.start();
        assert_eq!(s.step(), 50.0);

        for _ in 0..3 {
            s.move_player(Direction::Left);
        }
        assert_eq!(s.player().x, 0.0);

        for _ in 0..3 {
            s.move_player(Direction::Right);
        }
        assert_eq!(s.player().x, 150.0);

        for _ in 0..5 {
            s.move_player(Direction::Right);
        }
        assert_eq!(s.player().x, 270.0);
    }

    #[test]
    fn test_spawn_position() {
        let mut s = session(300.0, 600.0);
        s.start();
        for _ in 0..50 {
            let id = s.spawn().unwrap();
            let obstacle = s.obstacles().get(id).unwrap();
            assert_eq!(obstacle.pos.y, -60.0);
            assert!(obstacle.pos.x >= 0.0 && obstacle.pos.x < 250.0);
        }
    }

    #[test]
    fn test_narrow_area_spawns_at_zero() {
        let mut s = session(40.0, 600.0);
        s.start();
        let id = s.spawn().unwrap();
        assert_eq!(s.obstacles().get(id).unwrap().pos.x, 0.0);
    }

    #[test]
    fn test_collision_ends_game_once() {
        let mut s = session(300.0, 600.0);
        s.start();
        // Two obstacles sitting right on top of the player
        let top = s.geometry().player_top();
        let x = s.player().x;
        s.obstacles.insert(Vec2::new(x, top - 5.0));
        s.obstacles.insert(Vec2::new(x + 10.0, top - 5.0));
        s.drain_events();

        s.tick();
        assert_eq!(s.phase(), GamePhase::Over);
        assert_eq!(s.final_score(), Some(0));
        assert_eq!(s.score(), 0);

        let events = s.drain_events();
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ScoreChanged(_))));

        // Further ticks are no-ops
        s.tick();
        s.end();
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_best_score_survives_restart() {
        let mut s = session(300.0, 600.0);
        assert_eq!(s.best_score(), None);

        // 30 ticks, then 10 ticks, each run ended by a direct hit
        for (ticks, best) in [(30, 30), (10, 30)] {
            s.start();
            for _ in 0..ticks {
                s.tick();
            }
            let top = s.geometry().player_top();
            let x = s.player().x;
            s.obstacles.insert(Vec2::new(x, top - 5.0));
            s.tick();
            assert_eq!(s.final_score(), Some(ticks));
            assert_eq!(s.best_score(), Some(best));
        }

        s.start();
        assert_eq!(s.final_score(), None);
        assert_eq!(s.best_score(), Some(30));
    }

    #[test]
    fn test_expired_obstacle_pruned_before_collision() {
        // Player hangs past the bottom edge so an unpruned obstacle would hit it
        let mut geometry = Geometry::new(300.0, 600.0);
        geometry.player_bottom_offset = -20.0;
        let mut s = GameSession::new(7, Tuning::default(), geometry);
        s.start();
        let x = s.player().x;
        s.obstacles.insert(Vec2::new(x, 598.0));
        s.tick();
        assert!(s.obstacles().is_empty());
        assert_eq!(s.phase(), GamePhase::Running);
    }

    #[test]
    fn test_milestone_requests_spawn_reschedule() {
        let mut s = session(300.0, 600.0);
        s.start();
        for _ in 0..499 {
            s.tick();
        }
        assert_eq!(s.take_spawn_interval_change(), None);

        s.tick();
        assert_eq!(s.score(), 500);
        assert_eq!(s.speed(), 5.5);
        assert_eq!(s.spawn_interval_ms(), 1400);
        assert_eq!(s.take_spawn_interval_change(), Some(1400));
        assert_eq!(s.take_spawn_interval_change(), None);
    }

    #[test]
    fn test_resize_recomputes_step_and_clamps() {
        let mut s = session(600.0, 600.0);
        s.start();
        for _ in 0..10 {
            s.move_player(Direction::Right);
        }
        assert_eq!(s.player().x, 550.0);

        s.resize(Geometry::new(300.0, 600.0));
        assert_eq!(s.step(), 50.0);
        assert_eq!(s.player().x, 250.0);
    }

    #[test]
    fn test_resize_while_idle_recenters() {
        let mut s = session(300.0, 600.0);
        s.resize(Geometry::new(500.0, 700.0));
        assert_eq!(s.player().x, 225.0);
    }
}
