//! Obstacle registry
//!
//! Live obstacles in spawn order, addressed by `ObstacleId`.

use glam::Vec2;

use super::state::{GameEvent, Obstacle, ObstacleId};

#[derive(Debug, Clone)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
    /// Never reset, so ids stay unique across restarts
    next_id: u32,
}

impl Default for ObstacleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert a new obstacle with its top-left corner at `pos`
    pub fn insert(&mut self, pos: Vec2) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        // Wraps after u32::MAX inserts
        self.next_id = self.next_id.wrapping_add(1);
        self.obstacles.push(Obstacle { id, pos });
        id
    }

    /// Move every obstacle down by `speed`, then drop the ones whose top is
    /// past `floor`. Survivors keep their relative order.
    pub fn advance(&mut self, speed: f32, floor: f32, events: &mut Vec<GameEvent>) {
        self.obstacles.retain_mut(|obstacle| {
            obstacle.pos.y += speed;
            if obstacle.pos.y > floor {
                events.push(GameEvent::ObstacleRemoved(obstacle.id));
                false
            } else {
                events.push(GameEvent::ObstacleAdvanced {
                    id: obstacle.id,
                    pos: obstacle.pos,
                });
                true
            }
        });
    }

    /// Remove all obstacles
    pub fn clear(&mut self, events: &mut Vec<GameEvent>) {
        events.extend(
            self.obstacles
                .drain(..)
                .map(|obstacle| GameEvent::ObstacleRemoved(obstacle.id)),
        );
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
