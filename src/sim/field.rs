//! Procedural field generation
//!
//! Two kinds of content:
//! - Backdrop: parallax skyline silhouettes and stars, built once per run
//! - Batches: one obstacle plus a short trail of rings, spawned by distance
//!
//! All randomness comes from the caller's RNG so runs replay from a seed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Ring, RingKind, RunState};
use crate::tuning::{Tuning, Viewport};

/// One skyline silhouette
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Silhouette {
    /// Left edge relative to the layer origin
    pub offset: f32,
    pub width: f32,
    pub height: f32,
}

/// A horizontally tileable row of silhouettes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub elements: Vec<Silhouette>,
    /// Width of one tile, including the trailing gap
    pub total_span: f32,
}

impl ParallaxLayer {
    /// Wrapped draw offset for a background scroll and depth factor.
    ///
    /// Result lies in `(-total_span, 0]`; draw the layer at this offset and
    /// again one span to the right.
    pub fn scroll_offset(&self, bg_offset: f32, factor: f32) -> f32 {
        let span = if self.total_span > 0.0 {
            self.total_span
        } else {
            1.0
        };
        -(bg_offset * factor) % span
    }
}

/// Lay out `count` silhouettes left to right with random sizes and gaps
pub fn generate_parallax_layer<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    max_width_jitter: f32,
    max_height_jitter: f32,
) -> ParallaxLayer {
    let mut elements = Vec::with_capacity(count);
    let mut offset = 0.0;
    for _ in 0..count {
        let width = 18.0 + rng.random::<f32>() * max_width_jitter;
        let height = 20.0 + rng.random::<f32>() * max_height_jitter;
        elements.push(Silhouette {
            offset,
            width,
            height,
        });
        offset += width + 6.0 + rng.random::<f32>() * 28.0;
    }
    ParallaxLayer {
        elements,
        total_span: offset,
    }
}

/// A background star
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Depth factor of the far skyline
pub const FAR_PARALLAX: f32 = 0.3;
/// Depth factor of the near skyline
pub const NEAR_PARALLAX: f32 = 0.6;
/// Near silhouettes are drawn at this fraction of their rolled height
pub const NEAR_HEIGHT_SCALE: f32 = 0.6;

const STAR_COUNT: usize = 20;

/// Static scenery for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backdrop {
    pub far: ParallaxLayer,
    pub near: ParallaxLayer,
    pub stars: Vec<Star>,
}

impl Backdrop {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, viewport: &Viewport) -> Self {
        let far = generate_parallax_layer(rng, 14, 45.0, 90.0);
        let mut near = generate_parallax_layer(rng, 12, 35.0, 55.0);
        for s in &mut near.elements {
            s.height *= NEAR_HEIGHT_SCALE;
        }
        let sky_height = viewport.ground_y() * 0.6;
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                x: rng.random::<f32>() * viewport.width,
                y: rng.random::<f32>() * sky_height,
                size: 1.0 + rng.random::<f32>() * 2.0,
            })
            .collect();
        Self { far, near, stars }
    }
}

/// Dimensions of an obstacle before it is placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleRoll {
    pub width: f32,
    pub height: f32,
    pub from_ceiling: bool,
}

/// Roll an obstacle's shape
pub fn roll_obstacle<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> ObstacleRoll {
    let from_ceiling = rng.random_bool(tuning.ceiling_chance);
    let width = 28.0 + rng.random::<f32>() * 28.0;
    let height = if from_ceiling {
        70.0 + rng.random::<f32>() * 90.0
    } else {
        45.0 + rng.random::<f32>() * 75.0
    };
    ObstacleRoll {
        width,
        height,
        from_ceiling,
    }
}

/// Number of rings trailing an obstacle
pub fn roll_ring_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    rng.random_range(2..=4)
}

/// Spawn one obstacle and its ring trail at the right edge, then schedule
/// the next batch.
pub fn spawn_batch(run: &mut RunState, tuning: &Tuning) {
    let viewport = tuning.viewport;
    let ground_y = viewport.ground_y();
    let base_x = viewport.spawn_x();

    let shape = roll_obstacle(&mut run.rng, tuning);
    let obstacle = Obstacle {
        id: run.next_entity_id(),
        x: base_x,
        y: if shape.from_ceiling {
            0.0
        } else {
            ground_y - shape.height
        },
        width: shape.width,
        height: shape.height,
        from_ceiling: shape.from_ceiling,
    };
    log::debug!(
        "spawn obstacle {} at distance {:.0} ({:.0}x{:.0}, ceiling: {})",
        obstacle.id,
        run.distance,
        shape.width,
        shape.height,
        shape.from_ceiling
    );
    run.obstacles.push(obstacle);

    let ring_count = roll_ring_count(&mut run.rng);
    for i in 0..ring_count {
        let y = ground_y - 65.0 - run.rng.random::<f32>() * (ground_y * 0.45);
        let kind = RingKind::ALL[run.rng.random_range(0..RingKind::ALL.len())];
        let ring = Ring {
            id: run.next_entity_id(),
            x: base_x + 90.0 + i as f32 * 36.0,
            y,
            kind,
            collected: false,
        };
        run.rings.push(ring);
    }

    let jitter = if tuning.spawn_jitter > 0.0 {
        run.rng.random::<f32>() * tuning.spawn_jitter
    } else {
        0.0
    };
    run.next_spawn_at = run.distance + tuning.spawn_distance + jitter;
}
