//! Fixed-timestep simulation loop
//!
//! An external frame driver feeds real elapsed time into [`GameLoop::advance`];
//! the accumulator converts it into zero or more fixed Δt ticks so simulation
//! time never depends on render cadence. Each tick integrates every active
//! player's heading and position, runs collision, applies death scoring, and
//! detects the terminal win/draw conditions.

use tracing::{debug, info};

use crate::config::SimConfig;
use crate::game::collision;
use crate::game::constants::physics::{DT, MAX_FRAME_TIME};
use crate::game::constants::trail::HALF_WIDTH;
use crate::game::state::{ArenaBounds, GameState, PlayerId};
use crate::util::vec2::Vec2;

/// Events emitted by the tick loop, consumed by the session layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    PlayerDied { id: PlayerId, frame: u64 },
    /// Exactly one player left alive; state is terminal until reset
    Winner { id: PlayerId },
    /// Zero players left alive; state is terminal until reset
    Draw,
}

/// Owns the authoritative [`GameState`] and the fixed-step accumulator
pub struct GameLoop {
    state: GameState,
    accumulator: f32,
}

impl GameLoop {
    pub fn new(config: SimConfig) -> Self {
        Self {
            state: GameState::new(config),
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Publish a player's intent flags for the coming ticks.
    /// The simulation only ever reads these.
    pub fn set_input(&mut self, id: PlayerId, left: bool, right: bool) {
        if let Some(player) = self.state.get_player_mut(id) {
            player.turning_left = left;
            player.turning_right = right;
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.state.paused = paused;
    }

    /// Feed real elapsed seconds from the frame driver and run the fixed
    /// steps that fit. The elapsed time is capped at one step's worth so
    /// a stalled driver catches up gradually instead of spiraling.
    pub fn advance(&mut self, elapsed: f32) -> Vec<SimEvent> {
        self.accumulator += elapsed.min(MAX_FRAME_TIME);

        let mut events = Vec::new();
        while self.accumulator >= DT {
            self.accumulator -= DT;
            events.extend(self.tick());
        }
        events
    }

    /// Run exactly one fixed simulation step
    pub fn tick(&mut self) -> Vec<SimEvent> {
        if self.state.paused || self.state.is_terminal() {
            return Vec::new();
        }

        self.state.frame += 1;
        let frame = self.state.frame;
        let mut events = Vec::new();

        for i in 0..self.state.players.len() {
            if !self.state.players[i].in_play() {
                continue;
            }

            // Intent flags are read-only during the tick; both set means
            // the turns cancel
            let player = &self.state.players[i];
            let id = player.id;
            let prev = player.position;
            let mut heading = player.heading;
            if player.turning_left {
                heading += player.turn_rate * DT;
            }
            if player.turning_right {
                heading -= player.turn_rate * DT;
            }
            heading = heading.rem_euclid(360.0);

            let candidate = prev + Vec2::from_heading_deg(heading) * (player.speed * DT);

            let lethal = !self.state.bounds.contains(candidate)
                || collision::check_trail_collision(candidate, id, &self.state);

            let player = &mut self.state.players[i];
            player.heading = heading;

            if lethal {
                player.alive = false;
                debug!(id, frame, "player eliminated");
                events.push(SimEvent::PlayerDied { id, frame });
                self.apply_death_scoring(i);
            } else {
                player.position = candidate;
                player.trail.push(candidate);
                self.state
                    .grid
                    .occupy_segment(prev, candidate, id, frame, HALF_WIDTH);
            }
        }

        // A solo round (or an empty roster) never produces a winner;
        // running out of live heads is still a draw
        let alive = self.state.alive_count();
        if alive == 1 && self.state.round_participants >= 2 {
            let survivor = self
                .state
                .players
                .iter()
                .find(|p| p.in_play())
                .map(|p| p.id)
                .unwrap_or_default();
            self.state.winner_declared = true;
            info!(winner = survivor, frame, "round won");
            events.push(SimEvent::Winner { id: survivor });
        } else if alive == 0 && self.state.round_participants >= 1 {
            self.state.draw_declared = true;
            info!(frame, "round drawn");
            events.push(SimEvent::Draw);
        }

        events
    }

    /// Award +1 to every other currently-alive player, exactly once per
    /// death. Simultaneous deaths within a tick score in roster order by
    /// design: a player already eliminated earlier in the same tick no
    /// longer collects points.
    fn apply_death_scoring(&mut self, dead_index: usize) {
        if self.state.players[dead_index].death_processed {
            return;
        }
        self.state.players[dead_index].death_processed = true;

        for (j, player) in self.state.players.iter_mut().enumerate() {
            if j != dead_index && player.in_play() {
                player.score += 1;
            }
        }
    }

    // Thin delegations so callers drive one handle

    pub fn add_player(&mut self, name: String) -> Option<PlayerId> {
        self.state.add_player(name)
    }

    pub fn update_bounds(&mut self, bounds: ArenaBounds) {
        self.state.update_bounds(bounds);
    }

    pub fn soft_reset(&mut self) -> bool {
        self.state.soft_reset()
    }

    pub fn force_reset(&mut self) {
        self.state.force_reset();
    }
}
