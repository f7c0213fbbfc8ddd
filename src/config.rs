use crate::game::constants::{arena, grid, net, player, trail};

/// Simulation configuration
///
/// Defaults come from `game::constants`; every field can be overridden
/// through a `KURVE_*` environment variable.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Arena width in world units (viewport-derived in production)
    pub arena_width: f32,
    /// Arena height in world units
    pub arena_height: f32,
    /// Spatial grid cell edge length
    pub cell_size: f32,
    /// Self-collision grace window in ticks
    pub own_safe_frames: u64,
    /// Host snapshot publish rate in Hz (independent of tick rate)
    pub snapshot_rate: u32,
    /// Maximum roster slots
    pub max_players: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena_width: arena::DEFAULT_WIDTH,
            arena_height: arena::DEFAULT_HEIGHT,
            cell_size: grid::CELL_SIZE,
            own_safe_frames: trail::OWN_SAFE_FRAMES,
            snapshot_rate: net::SNAPSHOT_RATE,
            max_players: player::MAX_SLOTS,
        }
    }
}

impl SimConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(width) = std::env::var("KURVE_ARENA_WIDTH") {
            if let Ok(parsed) = width.parse::<f32>() {
                if parsed > 0.0 {
                    config.arena_width = parsed;
                } else {
                    tracing::warn!("KURVE_ARENA_WIDTH must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid KURVE_ARENA_WIDTH '{}', using default", width);
            }
        }

        if let Ok(height) = std::env::var("KURVE_ARENA_HEIGHT") {
            if let Ok(parsed) = height.parse::<f32>() {
                if parsed > 0.0 {
                    config.arena_height = parsed;
                } else {
                    tracing::warn!("KURVE_ARENA_HEIGHT must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid KURVE_ARENA_HEIGHT '{}', using default", height);
            }
        }

        if let Ok(cell) = std::env::var("KURVE_CELL_SIZE") {
            if let Ok(parsed) = cell.parse::<f32>() {
                if parsed > 0.0 {
                    config.cell_size = parsed;
                } else {
                    tracing::warn!("KURVE_CELL_SIZE must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid KURVE_CELL_SIZE '{}', using default", cell);
            }
        }

        if let Ok(frames) = std::env::var("KURVE_OWN_SAFE_FRAMES") {
            if let Ok(parsed) = frames.parse::<u64>() {
                config.own_safe_frames = parsed;
            } else {
                tracing::warn!("Invalid KURVE_OWN_SAFE_FRAMES '{}', using default", frames);
            }
        }

        if let Ok(rate) = std::env::var("KURVE_SNAPSHOT_RATE") {
            if let Ok(parsed) = rate.parse::<u32>() {
                if parsed > 0 {
                    config.snapshot_rate = parsed;
                } else {
                    tracing::warn!("KURVE_SNAPSHOT_RATE must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid KURVE_SNAPSHOT_RATE '{}', using default", rate);
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err("arena dimensions must be positive".to_string());
        }
        if self.cell_size <= 0.0 {
            return Err("cell_size must be positive".to_string());
        }
        if self.cell_size > self.arena_width.min(self.arena_height) {
            return Err("cell_size cannot exceed the smaller arena dimension".to_string());
        }
        if self.snapshot_rate == 0 {
            return Err("snapshot_rate must be at least 1".to_string());
        }
        if self.max_players == 0 {
            return Err("max_players must be at least 1".to_string());
        }
        Ok(())
    }
}
