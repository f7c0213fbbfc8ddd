//! Look-ahead steering for computer-driven players
//!
//! Probes a short ray along each candidate heading and turns toward the
//! side with the most clearance. Decisions read only the shared state,
//! so the same roster produces the same inputs on every peer.

use crate::game::collision;
use crate::game::constants::physics::DT;
use crate::game::state::{GameState, PlayerId};
use crate::util::vec2::Vec2;

/// Ticks of travel covered by each probe ray
const LOOKAHEAD_TICKS: u32 = 24;
/// Probe points sampled along each ray
const PROBE_STEPS: u32 = 6;
/// Heading offset of the side probes, degrees
const PROBE_ANGLE: f32 = 45.0;

/// Steering decision for one tick, as (turn_left, turn_right)
pub fn steer(player_id: PlayerId, state: &GameState) -> (bool, bool) {
    let Some(player) = state.get_player(player_id) else {
        return (false, false);
    };
    if !player.in_play() {
        return (false, false);
    }

    let reach = player.speed * DT * LOOKAHEAD_TICKS as f32;
    let ahead = clearance(player.position, player.heading, reach, player_id, state);
    if ahead == PROBE_STEPS {
        return (false, false);
    }

    let left = clearance(
        player.position,
        player.heading + PROBE_ANGLE,
        reach,
        player_id,
        state,
    );
    let right = clearance(
        player.position,
        player.heading - PROBE_ANGLE,
        reach,
        player_id,
        state,
    );

    if left >= right {
        (true, false)
    } else {
        (false, true)
    }
}

/// Number of probe points along the ray that are safe, front to back
fn clearance(origin: Vec2, heading: f32, reach: f32, player_id: PlayerId, state: &GameState) -> u32 {
    let direction = Vec2::from_heading_deg(heading);
    for step in 1..=PROBE_STEPS {
        let probe = origin + direction * (reach * step as f32 / PROBE_STEPS as f32);
        if !state.bounds.contains(probe) || collision::check_trail_collision(probe, player_id, state)
        {
            return step - 1;
        }
    }
    PROBE_STEPS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::game::game_loop::GameLoop;

    fn state_with_player_at(position: Vec2, heading: f32) -> (GameState, PlayerId) {
        let mut state = GameState::new(SimConfig::default());
        let id = state.add_player("Bot".into()).unwrap();
        let player = state.get_player_mut(id).unwrap();
        player.spawn(position, heading);
        (state, id)
    }

    #[test]
    fn test_open_space_goes_straight() {
        let (state, id) = state_with_player_at(Vec2::new(8.0, 4.5), 0.0);
        assert_eq!(steer(id, &state), (false, false));
    }

    #[test]
    fn test_turns_away_from_wall() {
        // Close to the east wall, heading straight at it
        let (state, id) = state_with_player_at(Vec2::new(15.8, 4.5), 0.0);
        let (left, right) = steer(id, &state);
        assert!(left ^ right);
    }

    #[test]
    fn test_prefers_open_side() {
        // Heading northeast close under the north wall: the left probe
        // points straight at the wall, the right probe runs parallel to
        // it with full clearance
        let (state, id) = state_with_player_at(Vec2::new(8.0, 8.8), 45.0);
        assert_eq!(steer(id, &state), (false, true));
    }

    #[test]
    fn test_avoids_other_trail() {
        let (mut state, id) = state_with_player_at(Vec2::new(7.8, 4.5), 0.0);
        let other = state.add_player("Wall".into()).unwrap();
        let blocker = state.get_player_mut(other).unwrap();
        blocker.spawn(Vec2::new(8.1, 4.2), 90.0);
        for i in 1..=30 {
            blocker.trail.push(Vec2::new(8.1, 4.2 + i as f32 * 0.02));
        }
        state.grid.rebuild_from_trails(&state.players, state.frame);

        let (left, right) = steer(id, &state);
        assert!(left || right);
    }

    #[test]
    fn test_dead_player_emits_no_input() {
        let (mut state, id) = state_with_player_at(Vec2::new(8.0, 4.5), 0.0);
        state.get_player_mut(id).unwrap().alive = false;
        assert_eq!(steer(id, &state), (false, false));
    }

    #[test]
    fn test_bot_outlives_straight_driver() {
        let mut game_loop = GameLoop::new(SimConfig::default());
        let bot = game_loop.add_player("Bot".into()).unwrap();
        let dummy = game_loop.add_player("Dummy".into()).unwrap();
        game_loop.force_reset();
        {
            let state = game_loop.state_mut();
            state.get_player_mut(bot).unwrap().spawn(Vec2::new(14.0, 4.5), 0.0);
            state.get_player_mut(dummy).unwrap().spawn(Vec2::new(14.0, 2.0), 0.0);
            state.grid.rebuild_from_trails(&state.players, state.frame);
        }

        for _ in 0..400 {
            let (left, right) = steer(bot, game_loop.state());
            game_loop.set_input(bot, left, right);
            game_loop.advance(DT);
            if game_loop.state().is_terminal() {
                break;
            }
        }

        let state = game_loop.state();
        assert!(!state.get_player(dummy).unwrap().alive);
        assert!(state.get_player(bot).unwrap().alive);
    }
}
