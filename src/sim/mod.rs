//! Runner simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One call to `tick` per display refresh
//! - Seeded RNG only (reproducible from `RunState::seed`)
//! - Stable iteration order (spawn order, ids strictly increasing)

pub mod collision;
pub mod field;
pub mod physics;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_obstacle_hit, player_hitbox};
pub use field::{Backdrop, ParallaxLayer, Silhouette, generate_parallax_layer, spawn_batch};
pub use physics::{integrate, try_jump};
pub use snapshot::{ObstacleView, PlayerView, RingView, Snapshot};
pub use state::{GameEvent, Obstacle, Player, Ring, RingKind, RunState, WorldTheme};
pub use tick::{TickInput, TickOutcome, score_for_distance, tick};
