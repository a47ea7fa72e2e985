//! Deterministic periodic timers in simulated milliseconds
//!
//! Two timers drive a run: the game tick and the spawn trigger. Every
//! cancel or reschedule bumps the timer's generation, so a firing taken
//! before the change is rejected by `accept`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    Tick,
    Spawn,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timer {
    pub period_ms: u32,
    pub next_due_ms: u64,
    pub generation: u32,
    pub active: bool,
}

/// One due occurrence of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub kind: TimerKind,
    pub generation: u32,
    pub at_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    now_ms: u64,
    tick: Timer,
    spawn: Timer,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn timer(&self, kind: TimerKind) -> &Timer {
        match kind {
            TimerKind::Tick => &self.tick,
            TimerKind::Spawn => &self.spawn,
        }
    }

    fn timer_mut(&mut self, kind: TimerKind) -> &mut Timer {
        match kind {
            TimerKind::Tick => &mut self.tick,
            TimerKind::Spawn => &mut self.spawn,
        }
    }

    /// Arm both timers from the current time, replacing any earlier schedule
    pub fn start(&mut self, tick_ms: u32, spawn_ms: u32) {
        self.reschedule(TimerKind::Tick, tick_ms);
        self.reschedule(TimerKind::Spawn, spawn_ms);
    }

    /// Cancel `kind` and re-arm it with a new period starting now
    pub fn reschedule(&mut self, kind: TimerKind, period_ms: u32) {
        let now = self.now_ms;
        let timer = self.timer_mut(kind);
        timer.generation = timer.generation.wrapping_add(1);
        timer.period_ms = period_ms.max(1);
        timer.next_due_ms = now + u64::from(timer.period_ms);
        timer.active = true;
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        let timer = self.timer_mut(kind);
        timer.generation = timer.generation.wrapping_add(1);
        timer.active = false;
    }

    pub fn cancel_all(&mut self) {
        self.cancel(TimerKind::Tick);
        self.cancel(TimerKind::Spawn);
    }

    /// Next pending firing of one timer
    pub fn peek(&self, kind: TimerKind) -> Option<Firing> {
        let timer = self.timer(kind);
        timer.active.then_some(Firing {
            kind,
            generation: timer.generation,
            at_ms: timer.next_due_ms,
        })
    }

    /// Earliest firing due at or before `until_ms`. Tick wins ties.
    pub fn next_due(&self, until_ms: u64) -> Option<Firing> {
        let tick = self.peek(TimerKind::Tick);
        let spawn = self.peek(TimerKind::Spawn);
        let earliest = match (tick, spawn) {
            (Some(t), Some(s)) => Some(if s.at_ms < t.at_ms { s } else { t }),
            (t, s) => t.or(s),
        };
        earliest.filter(|f| f.at_ms <= until_ms)
    }

    /// Whether `firing` still belongs to the live schedule
    pub fn accept(&self, firing: &Firing) -> bool {
        let timer = self.timer(firing.kind);
        timer.active && timer.generation == firing.generation && timer.next_due_ms == firing.at_ms
    }

    /// Consume an accepted firing: move the clock to it and queue the next period
    pub fn fire(&mut self, firing: &Firing) {
        self.now_ms = self.now_ms.max(firing.at_ms);
        let timer = self.timer_mut(firing.kind);
        timer.next_due_ms += u64::from(timer.period_ms);
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}
