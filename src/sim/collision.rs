//! Axis-aligned bounding box collision between the player and obstacles

use glam::Vec2;

use super::state::{Geometry, Obstacle, ObstacleId};

/// Axis-aligned rectangle in playable-area coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Player rectangle for a given x
pub fn player_rect(geometry: &Geometry, x: f32) -> Rect {
    Rect::new(
        Vec2::new(x, geometry.player_top()),
        Vec2::new(geometry.player_width, geometry.player_height),
    )
}

pub fn obstacle_rect(geometry: &Geometry, obstacle: &Obstacle) -> Rect {
    Rect::new(
        obstacle.pos,
        Vec2::new(geometry.obstacle_width, geometry.obstacle_height),
    )
}

/// First obstacle (in registry order) overlapping the player, if any
pub fn first_collision<'a>(
    player: &Rect,
    geometry: &Geometry,
    obstacles: impl IntoIterator<Item = &'a Obstacle>,
) -> Option<ObstacleId> {
    obstacles
        .into_iter()
        .find(|obstacle| player.overlaps(&obstacle_rect(geometry, obstacle)))
        .map(|obstacle| obstacle.id)
}
