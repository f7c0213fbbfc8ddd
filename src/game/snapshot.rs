//! State snapshots for host/guest mirroring
//!
//! The host captures a [`GameSnapshot`] at the session's publish rate
//! and broadcasts it; non-authoritative guests apply received snapshots
//! directly over their local state, bypassing tick integration. The wire
//! encoding is JSON; transport is the caller's problem.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::game::state::{ArenaBounds, GameState, PlayerId};
use crate::game::trail::Trail;
use crate::util::vec2::Vec2;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Per-player mirrored state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub position: Vec2,
    pub heading: f32,
    pub alive: bool,
    pub active: bool,
    pub score: u32,
    pub trail: Vec<Vec2>,
}

/// Full mirrored match state, as broadcast by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub frame: u64,
    pub bounds: ArenaBounds,
    pub players: Vec<PlayerSnapshot>,
}

/// Capture the host's current state for broadcast
pub fn capture(state: &GameState) -> GameSnapshot {
    GameSnapshot {
        frame: state.frame,
        bounds: state.bounds,
        players: state
            .players
            .iter()
            .map(|p| PlayerSnapshot {
                id: p.id,
                position: p.position,
                heading: p.heading,
                alive: p.alive,
                active: p.active,
                score: p.score,
                trail: p.trail.iter().collect(),
            })
            .collect(),
    }
}

/// Overwrite local state from a received snapshot (guest role)
///
/// Matches players by id; snapshot entries with no local roster slot are
/// skipped. Trails are replaced wholesale and the grid is rebuilt, so a
/// guest promoted to host mid-match resumes with consistent collision
/// state.
pub fn apply_snapshot(state: &mut GameState, snapshot: &GameSnapshot) {
    state.update_bounds(snapshot.bounds);
    state.frame = snapshot.frame;

    for remote in &snapshot.players {
        let Some(player) = state.get_player_mut(remote.id) else {
            debug!(id = remote.id, "snapshot references unknown player, skipping");
            continue;
        };
        player.position = remote.position;
        player.heading = remote.heading;
        player.alive = remote.alive;
        player.active = remote.active;
        player.score = remote.score;
        player.trail = Trail::from_points(remote.trail.clone());
    }

    let frame = state.frame;
    state.grid.rebuild_from_trails(&state.players, frame);
}

/// Encode a snapshot for broadcast
pub fn encode(snapshot: &GameSnapshot) -> Result<Vec<u8>, SnapshotError> {
    serde_json::to_vec(snapshot).map_err(SnapshotError::Encode)
}

/// Decode a received snapshot
pub fn decode(bytes: &[u8]) -> Result<GameSnapshot, SnapshotError> {
    serde_json::from_slice(bytes).map_err(SnapshotError::Decode)
}
