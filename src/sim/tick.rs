//! Per-tick simulation step
//!
//! Core game loop that advances a run by exactly one tick. Speeds are in
//! pixels per tick, so one call corresponds to one display refresh.

use super::collision::{first_obstacle_hit, player_hitbox, ring_hitbox};
use super::field::spawn_batch;
use super::physics::{integrate, try_jump};
use super::state::{GameEvent, RunState, WorldTheme};
use crate::consts::*;
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// A press began since the last tick
    pub jump: bool,
    /// Press is being held (glide)
    pub hold: bool,
}

/// Result of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Run is not running; nothing happened
    Idle,
    /// Run continues, schedule another tick
    Continue,
    /// An obstacle was hit on this tick
    GameOver,
}

/// Advance the run by one tick
pub fn tick(state: &mut RunState, input: &TickInput, tuning: &Tuning) -> TickOutcome {
    if !state.is_running || state.is_game_over {
        return TickOutcome::Idle;
    }

    state.time_ticks += 1;

    // --- PLAYER ---
    if input.jump && try_jump(&mut state.player, tuning) {
        let air = state.player.jumps_remaining + 1 < MAX_JUMPS;
        state.events.push(GameEvent::Jumped { air });
    }
    let integration = integrate(&mut state.player, input.hold, tuning);
    if integration.landed {
        state.events.push(GameEvent::Landed);
    }

    // --- SCROLL & PRUNE ---
    let speed = state.speed;
    for obstacle in &mut state.obstacles {
        obstacle.x -= speed;
    }
    for ring in &mut state.rings {
        ring.x -= speed;
    }
    state.obstacles.retain(|o| o.x > OBSTACLE_PRUNE_X);
    // Collected rings linger for one snapshot, then go here
    state.rings.retain(|r| r.x > RING_PRUNE_X && !r.collected);

    state.distance += speed;
    state.bg_offset += speed;

    // --- SPAWN ---
    if state.distance >= state.next_spawn_at {
        spawn_batch(state, tuning);
    }

    // --- COLLISIONS ---
    let hitbox = player_hitbox(tuning.viewport.player_x(), state.player.y, tuning);

    if let Some(obstacle) = first_obstacle_hit(&hitbox, &state.obstacles) {
        let obstacle_id = obstacle.id;
        state.is_game_over = true;
        state.is_running = false;
        state.events.push(GameEvent::Crashed { obstacle_id });
        log::info!(
            "Crashed into obstacle {} at distance {:.0} (score {})",
            obstacle_id,
            state.distance,
            state.score
        );
        return TickOutcome::GameOver;
    }

    for ring in state.rings.iter_mut().filter(|r| !r.collected) {
        if hitbox.overlaps(&ring_hitbox(ring, tuning)) {
            ring.collected = true;
            state.rings_collected += 1;
            state.events.push(GameEvent::RingCollected {
                id: ring.id,
                kind: ring.kind,
            });
        }
    }

    // --- PROGRESSION ---
    state.speed = (state.speed + tuning.speed_increment).min(tuning.max_speed);
    state.score = state.score.max(score_for_distance(state.distance, tuning));

    let theme = WorldTheme::for_distance(state.distance, tuning.world_shift_distance);
    if theme != state.theme {
        state.theme = theme;
        state.events.push(GameEvent::ThemeChanged(theme));
    }

    TickOutcome::Continue
}

/// Score earned for a cumulative distance
#[inline]
pub fn score_for_distance(distance: f32, tuning: &Tuning) -> u64 {
    (distance / tuning.score_divisor).floor().max(0.0) as u64
}
