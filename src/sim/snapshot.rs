//! Immutable per-tick view of a run
//!
//! This is all a renderer (or any other observer) gets to see. It owns its
//! data so it can outlive the tick that produced it.

use serde::Serialize;

use super::field::{FAR_PARALLAX, NEAR_PARALLAX};
use super::state::{RingKind, RunState, WorldTheme};
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub gliding: bool,
    pub on_ground: bool,
    pub jumps_remaining: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub from_ceiling: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub kind: RingKind,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    /// Uncollected rings only
    pub rings: Vec<RingView>,
    pub score: u64,
    pub rings_collected: u32,
    pub distance: f32,
    pub speed: f32,
    pub theme: WorldTheme,
    pub is_running: bool,
    pub is_game_over: bool,
    pub bg_offset: f32,
    /// Wrapped draw offsets of the far and near skyline layers
    pub far_offset: f32,
    pub near_offset: f32,
}

impl Snapshot {
    pub fn capture(state: &RunState, tuning: &Tuning) -> Self {
        let player = &state.player;
        Self {
            tick: state.time_ticks,
            player: PlayerView {
                x: tuning.viewport.player_x(),
                y: player.y,
                vy: player.vy,
                gliding: player.gliding,
                on_ground: player.on_ground,
                jumps_remaining: player.jumps_remaining,
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    x: o.x,
                    y: o.y,
                    width: o.width,
                    height: o.height,
                    from_ceiling: o.from_ceiling,
                })
                .collect(),
            rings: state
                .rings
                .iter()
                .filter(|r| !r.collected)
                .map(|r| RingView {
                    id: r.id,
                    x: r.x,
                    y: r.y,
                    kind: r.kind,
                })
                .collect(),
            score: state.score,
            rings_collected: state.rings_collected,
            distance: state.distance,
            speed: state.speed,
            theme: state.theme,
            is_running: state.is_running,
            is_game_over: state.is_game_over,
            bg_offset: state.bg_offset,
            far_offset: state.backdrop.far.scroll_offset(state.bg_offset, FAR_PARALLAX),
            near_offset: state.backdrop.near.scroll_offset(state.bg_offset, NEAR_PARALLAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Ring;

    #[test]
    fn test_capture_filters_collected_rings() {
        let tuning = Tuning::default();
        let mut state = RunState::new(4, &tuning);
        for collected in [false, true, false] {
            let id = state.next_entity_id();
            state.rings.push(Ring {
                id,
                x: 200.0,
                y: 300.0,
                kind: RingKind::Fire,
                collected,
            });
        }
        let snapshot = Snapshot::capture(&state, &tuning);
        let ids: Vec<u32> = snapshot.rings.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(snapshot.player.x, tuning.viewport.player_x());
        assert!(!snapshot.is_running);
    }

    #[test]
    fn test_snapshot_serializes() {
        let tuning = Tuning::default();
        let state = RunState::new(4, &tuning);
        let json = serde_json::to_string(&Snapshot::capture(&state, &tuning)).unwrap();
        assert!(json.contains("\"theme\":\"Futuristic\""));
        assert!(json.contains("\"is_game_over\":false"));
    }
}
