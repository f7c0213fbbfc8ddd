//! Game state definitions
//!
//! The aggregate root: player roster, arena bounds, frame counter, and
//! pause/terminal flags. All mutation routes through the tick loop or
//! the explicit reset/rebuild operations here; nothing else touches the
//! grid or trails directly.

use hashbrown::HashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimConfig;
use crate::game::constants::{arena, player as player_consts};
use crate::game::spatial::SpatialHashGrid;
use crate::game::trail::Trail;
use crate::util::vec2::Vec2;

/// Stable per-match player identifier, used as the grid owner tag
pub type PlayerId = u32;

/// Rectangular world-space arena; leaving it is an instant-death
/// boundary collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl ArenaBounds {
    pub const ZERO: ArenaBounds = ArenaBounds {
        min_x: 0.0,
        max_x: 0.0,
        min_y: 0.0,
        max_y: 0.0,
    };

    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Edge-inclusive containment
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Random point inset from every wall by the spawn margin
    pub fn random_spawn_point<R: Rng>(&self, rng: &mut R) -> Vec2 {
        let margin_x = self.width() * arena::SPAWN_MARGIN_RATIO;
        let margin_y = self.height() * arena::SPAWN_MARGIN_RATIO;
        Vec2::new(
            rng.gen_range(self.min_x + margin_x..self.max_x - margin_x),
            rng.gen_range(self.min_y + margin_y..self.max_y - margin_y),
        )
    }
}

/// Player slot state
#[derive(Debug, Clone)]
pub struct Player {
    /// Stable small positive integer, unique per match
    pub id: PlayerId,
    /// Display name, relayed from the lobby layer
    pub name: String,
    /// Current head position in world units
    pub position: Vec2,
    /// Heading in degrees, normalized to [0, 360)
    pub heading: f32,
    /// Forward speed in world units per second (fixed for the match)
    pub speed: f32,
    /// Turn rate in degrees per second (fixed for the match)
    pub turn_rate: f32,
    pub alive: bool,
    /// Inactive slots are fully skipped by simulation and collision
    pub active: bool,
    /// Owned path history; replaced, never mutated, on respawn
    pub trail: Trail,
    /// Intent flag written by the input layer, only read by the tick
    pub turning_left: bool,
    /// Intent flag written by the input layer, only read by the tick
    pub turning_right: bool,
    /// Incremented when another player dies
    pub score: u32,
    /// Guards against double-scoring a single death
    pub death_processed: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            position: Vec2::ZERO,
            heading: 0.0,
            speed: player_consts::DEFAULT_SPEED,
            turn_rate: player_consts::DEFAULT_TURN_RATE,
            alive: false,
            active: true,
            trail: Trail::new(),
            turning_left: false,
            turning_right: false,
            score: 0,
            death_processed: false,
        }
    }

    /// Place the player at a fresh spawn: alive, clean flags, and a
    /// brand-new single-point trail
    pub fn spawn(&mut self, position: Vec2, heading: f32) {
        self.position = position;
        self.heading = heading;
        self.alive = true;
        self.turning_left = false;
        self.turning_right = false;
        self.death_processed = false;
        self.trail = Trail::from_spawn(position);
    }

    /// Whether this slot participates in simulation this tick
    #[inline]
    pub fn in_play(&self) -> bool {
        self.active && self.alive
    }
}

/// Authoritative match state
pub struct GameState {
    /// Roster in fixed processing order
    pub players: Vec<Player>,
    pub grid: SpatialHashGrid,
    pub bounds: ArenaBounds,
    /// Monotone tick counter, reset to 0 on every round reset
    pub frame: u64,
    pub paused: bool,
    pub winner_declared: bool,
    pub draw_declared: bool,
    /// Active slots at the last round start; drives win/draw detection
    /// (a solo practice round never declares a winner)
    pub round_participants: usize,
    config: SimConfig,
    /// id -> roster index
    index: HashMap<PlayerId, usize>,
    next_id: PlayerId,
}

impl GameState {
    pub fn new(config: SimConfig) -> Self {
        let bounds = ArenaBounds::new(0.0, config.arena_width, 0.0, config.arena_height);
        let mut grid = SpatialHashGrid::new(config.cell_size, config.own_safe_frames);
        grid.update_bounds(bounds, &[], 0);

        Self {
            players: Vec::with_capacity(config.max_players),
            grid,
            bounds,
            frame: 0,
            paused: false,
            winner_declared: false,
            draw_declared: false,
            round_participants: 0,
            config,
            index: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Add a player to the roster; `None` when all slots are taken.
    /// The new player is inactive-in-play until the next reset spawns it.
    pub fn add_player(&mut self, name: String) -> Option<PlayerId> {
        if self.players.len() >= self.config.max_players {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;

        info!(id, name = %name, "player added to roster");
        self.index.insert(id, self.players.len());
        self.players.push(Player::new(id, name));
        Some(id)
    }

    /// Withdraw a slot from simulation and collision entirely
    pub fn deactivate_player(&mut self, id: PlayerId) {
        if let Some(player) = self.get_player_mut(id) {
            player.active = false;
            player.alive = false;
            info!(id, "player deactivated");
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.index.get(&id).map(|&i| &self.players[i])
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.players[i]),
            None => None,
        }
    }

    /// Players currently participating and alive
    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.in_play()).count()
    }

    /// Terminal until an external reset
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.winner_declared || self.draw_declared
    }

    /// Apply new viewport-derived bounds. Safe at any time: triggers a
    /// grid rebuild from existing trail data, never a trail reset.
    pub fn update_bounds(&mut self, bounds: ArenaBounds) {
        self.bounds = bounds;
        self.grid.update_bounds(bounds, &self.players, self.frame);
    }

    /// Start a fresh round only when no active player is still alive.
    /// Returns `false` (no-op) otherwise; the caller can retry or force.
    pub fn soft_reset(&mut self) -> bool {
        if self.players.iter().any(|p| p.in_play()) {
            return false;
        }
        self.respawn_round();
        true
    }

    /// Unconditional restart: same respawn as a soft reset, and also
    /// clears the pause flag. The only way out of a stuck match.
    pub fn force_reset(&mut self) {
        self.paused = false;
        self.respawn_round();
    }

    fn respawn_round(&mut self) {
        let mut rng = rand::thread_rng();
        for player in self.players.iter_mut().filter(|p| p.active) {
            let position = self.bounds.random_spawn_point(&mut rng);
            let heading = rng.gen_range(0.0..360.0);
            player.spawn(position, heading);
        }

        self.frame = 0;
        self.winner_declared = false;
        self.draw_declared = false;
        self.round_participants = self.players.iter().filter(|p| p.active).count();
        self.grid.rebuild_from_trails(&self.players, self.frame);
        info!(players = self.alive_count(), "round reset");
    }
}
