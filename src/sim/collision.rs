//! Axis-aligned collision detection
//!
//! Everything in the runner is a box: the dragon's hitbox, obstacles and the
//! pickup area around each ring. Hitboxes are deliberately not the sprite
//! bounds: the dragon's is smaller (forgiving), a ring's is larger (generous).

use glam::Vec2;

use super::state::{Obstacle, Ring};
use crate::consts::DRAGON_SIZE;
use crate::tuning::Tuning;

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Square of side `side` centred on `center`
    pub fn centered(center: Vec2, side: f32) -> Self {
        let half = Vec2::splat(side / 2.0);
        Self {
            pos: center - half,
            size: half * 2.0,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Open-interval overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x < b_max.x
            && a_max.x > other.pos.x
            && self.pos.y < b_max.y
            && a_max.y > other.pos.y
    }
}

/// Dragon hitbox for a given vertical centre
pub fn player_hitbox(player_x: f32, player_y: f32, tuning: &Tuning) -> Rect {
    Rect::centered(Vec2::new(player_x, player_y), DRAGON_SIZE * tuning.hitbox_scale)
}

pub fn obstacle_hitbox(obstacle: &Obstacle) -> Rect {
    Rect::new(obstacle.x, obstacle.y, obstacle.width, obstacle.height)
}

pub fn ring_hitbox(ring: &Ring, tuning: &Tuning) -> Rect {
    Rect::centered(Vec2::new(ring.x, ring.y), tuning.ring_pickup_half * 2.0)
}

/// First obstacle the hitbox touches, in spawn order
pub fn first_obstacle_hit<'a>(hitbox: &Rect, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles.iter().find(|o| hitbox.overlaps(&obstacle_hitbox(o)))
}
