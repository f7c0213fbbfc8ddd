//! Trail collision detection
//!
//! Two paths decide whether a candidate head position hits a trail. The
//! spatial grid is the fast path and is authoritative whenever its cells
//! are allocated; its stamp sampling and bounded cells make it an
//! approximation, accepted per the grid module's contract. The exact
//! per-segment scan is the ground truth: it runs when no grid is sized
//! yet (before the first viewport arrives) and serves as the oracle the
//! grid is tested against.

use crate::game::constants::player::HEAD_RADIUS;
use crate::game::constants::trail::HALF_WIDTH;
use crate::game::state::{GameState, PlayerId};
use crate::util::vec2::{distance_to_segment_sq, Vec2};

/// Decide hit/no-hit for a candidate head position
///
/// Boundary handling lives in the tick loop; this only answers whether
/// the point touches a lethal trail.
pub fn check_trail_collision(candidate: Vec2, player_id: PlayerId, state: &GameState) -> bool {
    if state.grid.is_ready() {
        return state
            .grid
            .check_collision(candidate, HEAD_RADIUS, player_id, state.frame);
    }
    check_trail_collision_exact(candidate, player_id, state)
}

/// Brute-force point-to-segment scan over every roster trail
///
/// O(total trail length); exempts the most recent `own_safe_frames`
/// segments of the querying player's own trail (one segment per tick).
pub fn check_trail_collision_exact(
    candidate: Vec2,
    player_id: PlayerId,
    state: &GameState,
) -> bool {
    let hit_radius = HEAD_RADIUS + HALF_WIDTH;
    let hit_radius_sq = hit_radius * hit_radius;
    let safe_frames = state.config().own_safe_frames as usize;

    for player in state.players.iter().filter(|p| p.active) {
        let segment_count = player.trail.segment_count();
        // Newest own segments are inside the grace window
        let lethal_count = if player.id == player_id {
            segment_count.saturating_sub(safe_frames)
        } else {
            segment_count
        };

        for (a, b) in player.trail.segments().take(lethal_count) {
            if distance_to_segment_sq(candidate, a, b) < hit_radius_sq {
                return true;
            }
        }
    }
    false
}
