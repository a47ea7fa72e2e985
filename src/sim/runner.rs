//! Drives a `GameSession` from elapsed time through a `Schedule`

use super::schedule::{Firing, Schedule, TimerKind};
use super::state::{Direction, GameEvent, GameSession, Geometry};
use crate::input::Command;

/// A session plus the two timers that feed it
#[derive(Debug, Clone)]
pub struct Runner {
    session: GameSession,
    schedule: Schedule,
}

impl Runner {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            schedule: Schedule::new(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn now_ms(&self) -> u64 {
        self.schedule.now_ms()
    }

    /// Start (or restart) a run and arm both timers
    pub fn start(&mut self) {
        self.schedule.cancel_all();
        self.session.start();
        self.schedule.start(
            self.session.tuning().tick_ms,
            self.session.spawn_interval_ms(),
        );
    }

    pub fn move_player(&mut self, direction: Direction) {
        self.session.move_player(direction);
    }

    pub fn resize(&mut self, geometry: Geometry) {
        self.session.resize(geometry);
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Move(direction) => self.move_player(direction),
            Command::Start => self.start(),
        }
    }

    /// Take the session's pending events. The queue is unbounded, so the
    /// frame loop must call this every frame.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }

    /// Let `elapsed_ms` of simulated time pass, running every due firing in order
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.schedule.now_ms() + elapsed_ms;
        while let Some(firing) = self.schedule.next_due(until) {
            self.dispatch(firing);
        }
        self.schedule.advance_to(until);
    }

    /// Run one firing. Stale or cancelled firings are ignored.
    pub fn dispatch(&mut self, firing: Firing) -> bool {
        if !self.schedule.accept(&firing) {
            return false;
        }
        self.schedule.fire(&firing);

        match firing.kind {
            TimerKind::Tick => self.session.tick(),
            TimerKind::Spawn => {
                self.session.spawn();
            }
        }

        if !self.session.is_running() {
            self.schedule.cancel_all();
        } else if let Some(interval) = self.session.take_spawn_interval_change() {
            self.schedule.reschedule(TimerKind::Spawn, interval);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn runner() -> Runner {
        Runner::new(GameSession::new(
            42,
            Tuning::default(),
            Geometry::new(300.0, 600.0),
        ))
    }

    #[test]
    fn test_idle_runner_does_nothing() {
        let mut r = runner();
        r.advance(10_000);
        assert_eq!(r.session().phase(), GamePhase::Idle);
        assert_eq!(r.session().score(), 0);
        assert_eq!(r.now_ms(), 10_000);
    }

    #[test]
    fn test_ticks_and_spawns_follow_periods() {
        let mut r = runner();
        r.start();
        r.advance(1499);
        assert_eq!(r.session().score(), 74);
        assert!(r.session().obstacles().is_empty());

        r.advance(1);
        assert_eq!(r.session().score(), 75);
        assert_eq!(r.session().obstacles().len(), 1);
    }

    #[test]
    fn test_stale_spawn_firing_is_rejected() {
        let mut r = runner();
        r.start();
        let stale = r.schedule().peek(TimerKind::Spawn).unwrap();

        r.start();
        assert!(!r.dispatch(stale));
        assert!(r.session().obstacles().is_empty());
    }

    #[test]
    fn test_milestone_reschedules_spawn_timer() {
        let mut r = runner();
        r.start();
        // Dispatch ticks only so no obstacle ever spawns
        let before = r.schedule().peek(TimerKind::Spawn).unwrap();
        for _ in 0..500 {
            let tick = r.schedule().peek(TimerKind::Tick).unwrap();
            r.dispatch(tick);
        }
        assert_eq!(r.session().score(), 500);

        let spawn = r.schedule().timer(TimerKind::Spawn);
        assert_eq!(spawn.period_ms, 1400);
        assert_eq!(spawn.next_due_ms, r.now_ms() + 1400);
        assert!(!r.schedule().accept(&before));
    }

    #[test]
    fn test_game_over_cancels_timers() {
        let mut r = runner();
        r.start();
        // Obstacle resting on the player: the next tick collides
        let top = r.session().geometry().player_top();
        let x = r.session().player().x;
        r.session.obstacles.insert(Vec2::new(x, top - 5.0));
        let spawn = r.schedule().peek(TimerKind::Spawn).unwrap();

        let tick = r.schedule().peek(TimerKind::Tick).unwrap();
        assert!(r.dispatch(tick));
        assert_eq!(r.session().phase(), GamePhase::Over);
        assert!(r.schedule().next_due(u64::MAX).is_none());
        assert!(!r.schedule().timer(TimerKind::Tick).active);
        assert!(!r.schedule().accept(&spawn));

        let score = r.session().score();
        r.advance(5_000);
        assert_eq!(r.session().score(), score);
        assert_eq!(r.session().obstacles().len(), 1);
    }

    #[test]
    fn test_drain_empties_queue_each_frame() {
        let mut r = runner();
        r.start();
        assert!(!r.drain_events().is_empty());
        for _ in 0..50 {
            r.advance(20);
            let frame = r.drain_events();
            assert!(frame.contains(&GameEvent::ScoreChanged(r.session().score())));
            assert!(r.drain_events().is_empty());
        }
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut r = runner();
        r.start();
        // Drive ticks until an obstacle eventually lands on the idle player
        r.advance(120_000);
        assert_eq!(r.session().phase(), GamePhase::Over);
        assert!(r.schedule().next_due(u64::MAX).is_none());

        r.apply(Command::Start);
        assert_eq!(r.session().phase(), GamePhase::Running);
        assert_eq!(r.session().score(), 0);
        assert_eq!(r.session().spawn_interval_ms(), 1500);
        r.advance(20);
        assert_eq!(r.session().score(), 1);
    }
}
