//! Data-driven game balance
//!
//! Every gameplay number that is a matter of feel rather than structure lives
//! here, so it can be overridden from JSON without touching the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Screen dimensions the world is laid out against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Y of the ground surface
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height * GROUND_PERCENT
    }

    /// Fixed X of the dragon's centre
    #[inline]
    pub fn player_x(&self) -> f32 {
        self.width * DRAGON_X_PERCENT
    }

    /// Lowest dragon centre (resting on the ground)
    #[inline]
    pub fn ground_line(&self) -> f32 {
        self.ground_y() - DRAGON_SIZE / 2.0
    }

    /// X at which new batches enter, just past the right edge
    #[inline]
    pub fn spawn_x(&self) -> f32 {
        self.width + 60.0
    }
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport: Viewport,

    // === Physics ===
    pub gravity: f32,
    pub glide_gravity: f32,
    pub jump_force: f32,
    /// Multiplier on `jump_force` for jumps after the first
    pub air_jump_factor: f32,
    /// Downward velocity applied when the dragon hits the ceiling
    pub ceiling_bounce: f32,

    // === Scrolling ===
    pub base_speed: f32,
    pub max_speed: f32,
    pub speed_increment: f32,

    // === Spawning ===
    pub spawn_distance: f32,
    pub spawn_jitter: f32,
    /// Probability an obstacle hangs from the ceiling
    pub ceiling_chance: f64,

    // === Scoring / world ===
    /// Distance units per score point
    pub score_divisor: f32,
    pub world_shift_distance: f32,

    // === Hitboxes ===
    /// Player hitbox side as a fraction of the sprite
    pub hitbox_scale: f32,
    /// Half side of the square ring pickup box
    pub ring_pickup_half: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),

            gravity: 0.55,
            glide_gravity: 0.13,
            jump_force: -12.0,
            air_jump_factor: 0.75,
            ceiling_bounce: 1.0,

            base_speed: 3.5,
            max_speed: 10.0,
            speed_increment: 0.002,

            spawn_distance: 260.0,
            spawn_jitter: 130.0,
            ceiling_chance: 0.15,

            score_divisor: 10.0,
            world_shift_distance: 2500.0,

            hitbox_scale: 0.4,
            ring_pickup_half: 14.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("viewport.width", self.viewport.width),
            ("viewport.height", self.viewport.height),
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("spawn_distance", self.spawn_distance),
            ("score_divisor", self.score_divisor),
            ("world_shift_distance", self.world_shift_distance),
            ("hitbox_scale", self.hitbox_scale),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }

        let non_negative = [
            ("spawn_jitter", self.spawn_jitter),
            ("speed_increment", self.speed_increment),
            ("gravity", self.gravity),
            ("glide_gravity", self.glide_gravity),
            ("ceiling_bounce", self.ceiling_bounce),
            ("ring_pickup_half", self.ring_pickup_half),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }

        // Jumps go up (negative y)
        if !(self.jump_force < 0.0) {
            return Err(TuningError::OutOfRange {
                field: "jump_force",
                value: self.jump_force,
            });
        }
        if !(self.air_jump_factor > 0.0 && self.air_jump_factor <= 1.0) {
            return Err(TuningError::OutOfRange {
                field: "air_jump_factor",
                value: self.air_jump_factor,
            });
        }
        if self.max_speed < self.base_speed {
            return Err(TuningError::OutOfRange {
                field: "max_speed",
                value: self.max_speed,
            });
        }
        if !(0.0..=1.0).contains(&self.ceiling_chance) {
            return Err(TuningError::OutOfRange {
                field: "ceiling_chance",
                value: self.ceiling_chance as f32,
            });
        }
        // Ground must sit below the ceiling margin or the clamp range is empty
        if self.viewport.ground_line() < CEILING_MARGIN {
            return Err(TuningError::OutOfRange {
                field: "viewport.height",
                value: self.viewport.height,
            });
        }
        Ok(())
    }

    /// Jump impulse for the given number of remaining charges
    pub fn jump_impulse(&self, jumps_remaining: u8) -> f32 {
        if jumps_remaining == MAX_JUMPS {
            self.jump_force
        } else {
            self.jump_force * self.air_jump_factor
        }
    }
}
