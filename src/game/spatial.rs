//! Spatial hash grid for trail collision queries
//!
//! Divides the arena into uniform square cells; each cell keeps a small
//! fixed-capacity list of circular "stamps" laid down as trails grow.
//! A collision query inspects only the single cell containing the query
//! point, so per-tick cost stays flat as trails accumulate thousands of
//! segments over a round.
//!
//! Cells at capacity silently drop further stamps: in extremely dense
//! regions collision fidelity degrades instead of memory growing
//! unbounded. The worst case is a missed collision, never a crash.

use smallvec::SmallVec;
use tracing::debug;

use crate::game::constants::grid::CELL_CAPACITY;
use crate::game::constants::trail::HALF_WIDTH;
use crate::game::state::{ArenaBounds, Player, PlayerId};
use crate::util::vec2::Vec2;

/// A recorded occupied circle: one sample of a trail segment
#[derive(Debug, Clone, Copy)]
pub struct Stamp {
    pub position: Vec2,
    pub radius: f32,
    pub owner: PlayerId,
    /// Frame the stamp was written; drives the self-collision grace window
    pub tick_written: u64,
}

/// Fixed-capacity stamp list; stays inline, never spills to the heap
type Cell = SmallVec<[Stamp; CELL_CAPACITY]>;

/// Uniform-cell spatial hash over the arena rectangle
pub struct SpatialHashGrid {
    bounds: ArenaBounds,
    cell_size: f32,
    inv_cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    /// Grace window (ticks) during which a player's own stamps are exempt
    own_safe_frames: u64,
    /// Stamps discarded because their cell was full
    dropped_stamps: u64,
}

impl SpatialHashGrid {
    /// Create an unsized grid; cells are allocated on the first
    /// `update_bounds` call once the viewport is known
    pub fn new(cell_size: f32, own_safe_frames: u64) -> Self {
        Self {
            bounds: ArenaBounds::ZERO,
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            own_safe_frames,
            dropped_stamps: 0,
        }
    }

    /// Whether cell storage has been allocated for some bounds
    #[inline]
    pub fn is_ready(&self) -> bool {
        !self.cells.is_empty()
    }

    pub fn bounds(&self) -> ArenaBounds {
        self.bounds
    }

    /// Resize to new arena bounds and rebuild stamps from existing trails.
    /// No-op when the bounds are unchanged, so it is cheap to call every
    /// tick with the current viewport.
    pub fn update_bounds(&mut self, bounds: ArenaBounds, players: &[Player], frame: u64) {
        if self.is_ready() && bounds == self.bounds {
            return;
        }

        self.bounds = bounds;
        self.cols = ((bounds.width() * self.inv_cell_size).ceil() as usize).max(1);
        self.rows = ((bounds.height() * self.inv_cell_size).ceil() as usize).max(1);
        self.cells = vec![Cell::new(); self.cols * self.rows];
        debug!(
            cols = self.cols,
            rows = self.rows,
            "spatial grid resized, rebuilding from trails"
        );

        self.rebuild_from_trails(players, frame);
    }

    /// Clear every stamp and re-stamp all active players' trails.
    /// O(total trail length); used on structural changes (reset, resize),
    /// never in the steady-state tick path.
    pub fn rebuild_from_trails(&mut self, players: &[Player], frame: u64) {
        self.clear();

        for player in players.iter().filter(|p| p.active) {
            // Segment sampling skips each start point (its predecessor
            // covered it), so the leading point is stamped explicitly
            if let Some(first) = player.trail.get(0) {
                self.stamp_circle(first, HALF_WIDTH, player.id, frame);
            }
            for (a, b) in player.trail.segments() {
                self.occupy_segment(a, b, player.id, frame, HALF_WIDTH);
            }
        }
    }

    /// Drop all stamps, keeping cell storage allocated
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.dropped_stamps = 0;
    }

    /// Stamp a segment by sampling it at half-cell steps
    ///
    /// The step guarantees no coverage gap wider than ~half a cell, so a
    /// head moving at game speeds cannot tunnel between samples at grid
    /// granularity. The start point is not re-stamped: for per-tick
    /// segments it was the previous segment's end.
    pub fn occupy_segment(
        &mut self,
        a: Vec2,
        b: Vec2,
        owner: PlayerId,
        frame: u64,
        radius: f32,
    ) {
        let step = self.cell_size * 0.5;
        let length = a.distance_to(b);
        let steps = ((length / step).ceil() as usize).max(1);

        let delta = b - a;
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.stamp_circle(a + delta * t, radius, owner, frame);
        }
    }

    /// Test a query circle against the stamps in its containing cell.
    /// Points strictly outside the grid report a collision: the arena
    /// boundary is a wall.
    pub fn check_collision(
        &self,
        point: Vec2,
        radius: f32,
        owner: PlayerId,
        frame: u64,
    ) -> bool {
        let Some(index) = self.cell_index(point) else {
            return true;
        };

        for stamp in &self.cells[index] {
            if stamp.owner == owner
                && frame.saturating_sub(stamp.tick_written) <= self.own_safe_frames
            {
                continue;
            }
            let hit_radius = radius + stamp.radius;
            if point.distance_sq_to(stamp.position) < hit_radius * hit_radius {
                return true;
            }
        }
        false
    }

    /// Cell index for a point, or `None` when outside the bounds
    #[inline]
    fn cell_index(&self, point: Vec2) -> Option<usize> {
        if !self.bounds.contains(point) || !self.is_ready() {
            return None;
        }
        let col = (((point.x - self.bounds.min_x) * self.inv_cell_size) as usize)
            .min(self.cols - 1);
        let row = (((point.y - self.bounds.min_y) * self.inv_cell_size) as usize)
            .min(self.rows - 1);
        Some(row * self.cols + col)
    }

    /// Insert a stamp into every cell its circle overlaps
    fn stamp_circle(&mut self, position: Vec2, radius: f32, owner: PlayerId, frame: u64) {
        if !self.is_ready() {
            return;
        }

        let min_col = ((position.x - radius - self.bounds.min_x) * self.inv_cell_size)
            .floor()
            .max(0.0) as usize;
        let min_row = ((position.y - radius - self.bounds.min_y) * self.inv_cell_size)
            .floor()
            .max(0.0) as usize;
        let max_col = (((position.x + radius - self.bounds.min_x) * self.inv_cell_size)
            .floor()
            .max(0.0) as usize)
            .min(self.cols - 1);
        let max_row = (((position.y + radius - self.bounds.min_y) * self.inv_cell_size)
            .floor()
            .max(0.0) as usize)
            .min(self.rows - 1);

        // Circle entirely outside the grid
        if min_col > max_col || min_row > max_row || min_col >= self.cols || min_row >= self.rows {
            return;
        }

        let stamp = Stamp {
            position,
            radius,
            owner,
            tick_written: frame,
        };

        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let cell = &mut self.cells[row * self.cols + col];
                if cell.len() >= CELL_CAPACITY {
                    // Full cell: drop the stamp, keep memory fixed
                    self.dropped_stamps += 1;
                    continue;
                }
                cell.push(stamp);
            }
        }
    }

    /// Occupancy statistics for diagnostics
    pub fn stats(&self) -> GridStats {
        GridStats {
            cols: self.cols,
            rows: self.rows,
            non_empty_cells: self.cells.iter().filter(|c| !c.is_empty()).count(),
            total_stamps: self.cells.iter().map(|c| c.len()).sum(),
            dropped_stamps: self.dropped_stamps,
        }
    }
}

/// Statistics about grid occupancy
#[derive(Debug, Clone)]
pub struct GridStats {
    pub cols: usize,
    pub rows: usize,
    pub non_empty_cells: usize,
    pub total_stamps: usize,
    pub dropped_stamps: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::trail::OWN_SAFE_FRAMES;
    use crate::game::state::Player;

    fn test_bounds() -> ArenaBounds {
        ArenaBounds::new(0.0, 16.0, 0.0, 9.0)
    }

    /// Coarse 0.5 cells so segment sampling spans several samples per
    /// cell and the geometry below stays easy to reason about by hand;
    /// the production default is covered separately
    fn sized_grid() -> SpatialHashGrid {
        let mut grid = SpatialHashGrid::new(0.5, OWN_SAFE_FRAMES);
        grid.update_bounds(test_bounds(), &[], 0);
        grid
    }

    #[test]
    fn test_default_cell_size_grid() {
        use crate::game::constants::grid::CELL_SIZE;

        let mut grid = SpatialHashGrid::new(CELL_SIZE, OWN_SAFE_FRAMES);
        grid.update_bounds(test_bounds(), &[], 0);
        let stats = grid.stats();
        assert_eq!(stats.cols, 160);
        assert_eq!(stats.rows, 90);

        // One tick's worth of movement stamps and detects
        grid.occupy_segment(Vec2::new(4.0, 4.0), Vec2::new(4.02, 4.0), 1, 5, 0.025);
        assert!(grid.check_collision(Vec2::new(4.02, 4.01), 0.035, 2, 5));
        assert!(!grid.check_collision(Vec2::new(4.5, 4.0), 0.035, 2, 5));
    }

    #[test]
    fn test_unsized_grid_not_ready() {
        let grid = SpatialHashGrid::new(0.5, OWN_SAFE_FRAMES);
        assert!(!grid.is_ready());
    }

    #[test]
    fn test_update_bounds_allocates_cells() {
        let grid = sized_grid();
        assert!(grid.is_ready());
        let stats = grid.stats();
        assert_eq!(stats.cols, 32);
        assert_eq!(stats.rows, 18);
    }

    #[test]
    fn test_out_of_bounds_is_collision() {
        let grid = sized_grid();
        // Empty grid, but outside points are the boundary wall
        assert!(grid.check_collision(Vec2::new(-0.1, 1.0), 0.035, 1, 0));
        assert!(grid.check_collision(Vec2::new(16.1, 1.0), 0.035, 1, 0));
        assert!(grid.check_collision(Vec2::new(1.0, -0.1), 0.035, 1, 0));
        assert!(grid.check_collision(Vec2::new(1.0, 9.1), 0.035, 1, 0));
        // Inside and empty: no collision
        assert!(!grid.check_collision(Vec2::new(8.0, 4.5), 0.035, 1, 0));
    }

    #[test]
    fn test_stamp_and_detect() {
        let mut grid = sized_grid();
        grid.occupy_segment(Vec2::new(4.0, 4.0), Vec2::new(5.0, 4.0), 1, 10, 0.025);

        // Player 2 touching the segment collides
        assert!(grid.check_collision(Vec2::new(4.5, 4.02), 0.035, 2, 12));
        // Far away: no collision
        assert!(!grid.check_collision(Vec2::new(10.0, 7.0), 0.035, 2, 12));
    }

    #[test]
    fn test_own_recent_stamps_exempt() {
        let mut grid = sized_grid();
        grid.occupy_segment(Vec2::new(4.0, 4.0), Vec2::new(5.0, 4.0), 1, 100, 0.025);

        // Within the grace window the owner passes through
        assert!(!grid.check_collision(Vec2::new(4.5, 4.0), 0.035, 1, 100 + OWN_SAFE_FRAMES));
        // One tick past the window the owner's own trail is lethal
        assert!(grid.check_collision(Vec2::new(4.5, 4.0), 0.035, 1, 101 + OWN_SAFE_FRAMES));
        // Another player is never exempt
        assert!(grid.check_collision(Vec2::new(4.5, 4.0), 0.035, 2, 100));
    }

    #[test]
    fn test_long_segment_leaves_no_gap() {
        let mut grid = sized_grid();
        // Segment spanning many cells
        grid.occupy_segment(Vec2::new(1.0, 4.0), Vec2::new(14.0, 4.0), 1, 0, 0.025);

        // Probe along the span; half-cell sampling must cover it
        let mut x = 1.3;
        while x <= 14.0 {
            assert!(
                grid.check_collision(Vec2::new(x, 4.0), 0.2, 2, 0),
                "gap at x={x}"
            );
            x += 0.1;
        }
    }

    #[test]
    fn test_cell_capacity_silent_drop() {
        let mut grid = sized_grid();
        // Hammer one spot with more stamps than a cell can hold
        for i in 0..(CELL_CAPACITY as u64 + 6) {
            grid.occupy_segment(
                Vec2::new(4.1, 4.1),
                Vec2::new(4.1, 4.1),
                1,
                i,
                0.025,
            );
        }

        let stats = grid.stats();
        assert!(stats.dropped_stamps > 0, "overflow stamps should be dropped");
        // No cell ever exceeds its capacity
        assert!(stats.total_stamps <= stats.non_empty_cells * CELL_CAPACITY);
    }

    #[test]
    fn test_update_bounds_noop_when_unchanged() {
        let mut grid = sized_grid();
        grid.occupy_segment(Vec2::new(4.0, 4.0), Vec2::new(5.0, 4.0), 1, 0, 0.025);
        let before = grid.stats().total_stamps;

        // Same bounds: stamps must survive untouched
        grid.update_bounds(test_bounds(), &[], 50);
        assert_eq!(grid.stats().total_stamps, before);
    }

    #[test]
    fn test_resize_rebuilds_from_trails() {
        let mut grid = sized_grid();

        let mut player = Player::new(1, "P1".to_string());
        player.spawn(Vec2::new(2.0, 2.0), 0.0);
        player.trail.push(Vec2::new(3.0, 2.0));
        player.trail.push(Vec2::new(4.0, 2.0));
        let players = vec![player];

        // Growing the arena re-stamps the existing trail
        grid.update_bounds(ArenaBounds::new(0.0, 20.0, 0.0, 12.0), &players, 5);
        assert!(grid.check_collision(Vec2::new(3.5, 2.0), 0.035, 2, 5));
        // And the new region is in bounds now
        assert!(!grid.check_collision(Vec2::new(18.0, 11.0), 0.035, 2, 5));
    }

    #[test]
    fn test_rebuild_stamps_single_point_trails() {
        let mut grid = sized_grid();

        let mut player = Player::new(1, "P1".to_string());
        player.spawn(Vec2::new(6.0, 6.0), 90.0);
        let players = vec![player];

        grid.rebuild_from_trails(&players, 0);
        // Another player brushing the spawn point collides
        assert!(grid.check_collision(Vec2::new(6.01, 6.0), 0.035, 2, 0));
    }

    #[test]
    fn test_inactive_players_skipped_on_rebuild() {
        let mut grid = sized_grid();

        let mut player = Player::new(1, "P1".to_string());
        player.spawn(Vec2::new(6.0, 6.0), 0.0);
        player.trail.push(Vec2::new(7.0, 6.0));
        player.active = false;
        let players = vec![player];

        grid.rebuild_from_trails(&players, 0);
        assert_eq!(grid.stats().total_stamps, 0);
    }
}
