/// Simulation timing constants
pub mod physics {
    /// Fixed simulation tick rate in Hz
    pub const TICK_RATE: u32 = 60;
    /// Delta time per tick in seconds
    pub const DT: f32 = 1.0 / TICK_RATE as f32;
    /// Cap on elapsed time accepted per driver callback (seconds).
    /// A stalled driver catches up by at most one step instead of
    /// spiraling, per the fixed-timestep accumulator contract.
    pub const MAX_FRAME_TIME: f32 = DT;
}

/// Player movement constants
pub mod player {
    /// Forward speed in world units per second
    pub const DEFAULT_SPEED: f32 = 1.2;
    /// Turn rate in degrees per second
    pub const DEFAULT_TURN_RATE: f32 = 180.0;
    /// Radius of the moving head used in collision queries
    pub const HEAD_RADIUS: f32 = 0.035;
    /// Maximum roster slots per match
    pub const MAX_SLOTS: usize = 8;
}

/// Trail constants
pub mod trail {
    /// Half the rendered trail width; stamps and exact segment tests
    /// both use it, so head + trail touch at HEAD_RADIUS + HALF_WIDTH.
    pub const HALF_WIDTH: f32 = 0.025;
    /// Initial point capacity per trail (one point per tick while alive)
    pub const INITIAL_CAPACITY: usize = 256;
    /// Ticks during which a player's own newest segments cannot kill them,
    /// letting the head clear its tail after a tight turn
    pub const OWN_SAFE_FRAMES: u64 = 10;
}

/// Spatial hash grid constants
pub mod grid {
    /// Cell edge length in world units. Sized so one trail crossing a
    /// cell leaves roughly CELL_CAPACITY stamps at game speed.
    pub const CELL_SIZE: f32 = 0.1;
    /// Stamps retained per cell; later stamps into a full cell are
    /// silently dropped (fixed memory, approximate accuracy)
    pub const CELL_CAPACITY: usize = 4;
}

/// Arena constants
pub mod arena {
    /// Default arena width in world units (viewport-derived in production)
    pub const DEFAULT_WIDTH: f32 = 16.0;
    /// Default arena height in world units
    pub const DEFAULT_HEIGHT: f32 = 9.0;
    /// Spawn inset from each wall, as a fraction of the arena dimension
    pub const SPAWN_MARGIN_RATIO: f32 = 0.1;
}

/// Host-role networking cadence
pub mod net {
    /// Snapshot publish rate in Hz (independent of the tick rate)
    pub const SNAPSHOT_RATE: u32 = 20;
}
