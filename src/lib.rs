//! Kurve Engine
//!
//! Deterministic simulation core for a multiplayer "growing trail" arena
//! game: every player steers a continuously moving point that leaves a
//! permanent lethal trail; the last survivor wins.
//!
//! The crate owns fixed-timestep integration, trail history, and the
//! spatial-hash collision detector. Rendering, raw input capture, and
//! network transport live outside; they talk to the engine through intent
//! flags on [`game::state::Player`], read-only access to
//! [`game::state::GameState`], and [`session::HostSession`] events and
//! snapshots.

pub mod config;
pub mod util;
pub mod game;
pub mod session;
