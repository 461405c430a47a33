//! Run state and core simulation types
//!
//! One `RunState` holds everything a single playthrough mutates. It is built
//! fresh for every run and never reset in place.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::Backdrop;
use crate::consts::*;
use crate::tuning::Tuning;

/// Cosmetic world palette, alternating with distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorldTheme {
    #[default]
    Futuristic,
    Ancient,
}

impl WorldTheme {
    /// Theme for a cumulative distance: even intervals are futuristic
    pub fn for_distance(distance: f32, shift_distance: f32) -> Self {
        let index = (distance / shift_distance).floor() as u64;
        if index % 2 == 0 {
            WorldTheme::Futuristic
        } else {
            WorldTheme::Ancient
        }
    }

    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            WorldTheme::Futuristic => "NEON CITY",
            WorldTheme::Ancient => "ANCIENT REALM",
        }
    }
}

/// Ring categories (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RingKind {
    Fire,
    Jade,
    Chaos,
}

impl RingKind {
    pub const ALL: [RingKind; 3] = [RingKind::Fire, RingKind::Jade, RingKind::Chaos];
}

/// The dragon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Vertical centre (pixels, y grows downward)
    pub y: f32,
    /// Vertical velocity (pixels per tick)
    pub vy: f32,
    pub on_ground: bool,
    pub gliding: bool,
    pub jumps_remaining: u8,
}

impl Player {
    /// Player resting on the ground with full jump charges
    pub fn grounded(ground_line: f32) -> Self {
        Self {
            y: ground_line,
            vy: 0.0,
            on_ground: true,
            gliding: false,
            jumps_remaining: MAX_JUMPS,
        }
    }
}

/// A wall segment rising from the ground or hanging from the ceiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub from_ceiling: bool,
}

/// A collectible ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub id: u32,
    /// Centre
    pub x: f32,
    pub y: f32,
    pub kind: RingKind,
    pub collected: bool,
}

/// Things that happened during a tick, for feedback/audio consumers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A jump charge was spent
    Jumped { air: bool },
    /// Dragon touched down after being airborne
    Landed,
    RingCollected { id: u32, kind: RingKind },
    /// Run ended against an obstacle
    Crashed { obstacle_id: u32 },
    ThemeChanged(WorldTheme),
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct RunState {
    /// Seed the run's RNG was built from
    pub seed: u64,
    pub rng: Pcg32,
    pub player: Player,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Active rings in spawn order (collected ones linger until the next prune)
    pub rings: Vec<Ring>,
    pub distance: f32,
    pub speed: f32,
    pub score: u64,
    pub rings_collected: u32,
    pub next_spawn_at: f32,
    pub theme: WorldTheme,
    pub is_running: bool,
    pub is_game_over: bool,
    /// Background scroll, same units as distance
    pub bg_offset: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Parallax scenery, generated once per run
    pub backdrop: Backdrop,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl RunState {
    /// Create a run in the ready (not running) sub-state
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self::with_rng(seed, Pcg32::seed_from_u64(seed), tuning)
    }

    /// Create a run drawing from an existing RNG
    pub fn with_rng(seed: u64, mut rng: Pcg32, tuning: &Tuning) -> Self {
        let viewport = tuning.viewport;
        let backdrop = Backdrop::generate(&mut rng, &viewport);
        Self {
            seed,
            rng,
            player: Player::grounded(viewport.ground_line()),
            obstacles: Vec::new(),
            rings: Vec::new(),
            distance: 0.0,
            speed: tuning.base_speed,
            score: 0,
            rings_collected: 0,
            next_spawn_at: tuning.spawn_distance,
            theme: WorldTheme::Futuristic,
            is_running: false,
            is_game_over: false,
            bg_offset: 0.0,
            time_ticks: 0,
            backdrop,
            events: Vec::new(),
            next_id: 0,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// ID the next spawned entity will receive
    pub fn peek_next_id(&self) -> u32 {
        self.next_id
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
