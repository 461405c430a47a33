//! Vertical physics for the dragon
//!
//! Units are pixels and ticks: velocities are pixels per tick and gravity is
//! added to velocity once per tick.

use super::state::Player;
use crate::consts::*;
use crate::tuning::Tuning;

/// What changed during one integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Integration {
    /// Touched down this tick after being airborne
    pub landed: bool,
    /// Clamped against the ceiling this tick
    pub hit_ceiling: bool,
}

/// Spend a jump charge if one is left.
///
/// Returns false (and leaves the player untouched) when out of charges.
pub fn try_jump(player: &mut Player, tuning: &Tuning) -> bool {
    if player.jumps_remaining == 0 {
        return false;
    }
    player.vy = tuning.jump_impulse(player.jumps_remaining);
    player.jumps_remaining -= 1;
    player.on_ground = false;
    true
}

/// Advance the player by one tick.
///
/// `hold` is the sustained press used for gliding.
pub fn integrate(player: &mut Player, hold: bool, tuning: &Tuning) -> Integration {
    let ground_line = tuning.viewport.ground_line();
    let was_airborne = !player.on_ground;
    let mut result = Integration::default();

    let gravity = if player.gliding {
        tuning.glide_gravity
    } else {
        tuning.gravity
    };
    player.vy += gravity;
    player.y += player.vy;

    if player.y > ground_line {
        player.y = ground_line;
        player.vy = 0.0;
        player.on_ground = true;
        player.gliding = false;
        player.jumps_remaining = MAX_JUMPS;
        result.landed = was_airborne;
    } else {
        player.on_ground = false;
    }

    if player.y < CEILING_MARGIN {
        player.y = CEILING_MARGIN;
        player.vy = tuning.ceiling_bounce;
        result.hit_ceiling = true;
    }

    player.gliding = hold && !player.on_ground;
    result
}
