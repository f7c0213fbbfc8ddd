//! Host-role session wrapper
//!
//! Bridges the simulation core to the external network layer: terminal
//! events are forwarded to registered callbacks and a state snapshot is
//! published at a configurable rate, independent of the tick rate. The
//! session never lets a failing publish stall the simulation; transport
//! errors are logged and the loop keeps advancing.

use tracing::{debug, warn};

use crate::config::SimConfig;
use crate::game::constants::physics::TICK_RATE;
use crate::game::game_loop::{GameLoop, SimEvent};
use crate::game::snapshot::{self, GameSnapshot};
use crate::game::state::PlayerId;

pub type WinnerCallback = Box<dyn FnMut(PlayerId)>;
pub type DrawCallback = Box<dyn FnMut()>;
pub type PublishCallback = Box<dyn FnMut(&GameSnapshot) -> anyhow::Result<()>>;

/// Drives a [`GameLoop`] on behalf of the hosting peer
pub struct HostSession {
    pub game_loop: GameLoop,
    /// Ticks between snapshot publishes
    snapshot_interval: u64,
    last_snapshot_frame: u64,
    on_winner: Option<WinnerCallback>,
    on_draw: Option<DrawCallback>,
    publish: Option<PublishCallback>,
}

impl HostSession {
    pub fn new(config: SimConfig) -> Self {
        let snapshot_interval = (TICK_RATE as u64 / config.snapshot_rate.max(1) as u64).max(1);
        Self {
            game_loop: GameLoop::new(config),
            snapshot_interval,
            last_snapshot_frame: 0,
            on_winner: None,
            on_draw: None,
            publish: None,
        }
    }

    pub fn on_winner(&mut self, callback: impl FnMut(PlayerId) + 'static) {
        self.on_winner = Some(Box::new(callback));
    }

    pub fn on_draw(&mut self, callback: impl FnMut() + 'static) {
        self.on_draw = Some(Box::new(callback));
    }

    pub fn on_publish(
        &mut self,
        callback: impl FnMut(&GameSnapshot) -> anyhow::Result<()> + 'static,
    ) {
        self.publish = Some(Box::new(callback));
    }

    /// Advance the simulation and fan out events and snapshots
    pub fn advance(&mut self, elapsed: f32) -> Vec<SimEvent> {
        let events = self.game_loop.advance(elapsed);

        for event in &events {
            match event {
                SimEvent::Winner { id } => {
                    if let Some(callback) = self.on_winner.as_mut() {
                        callback(*id);
                    }
                }
                SimEvent::Draw => {
                    if let Some(callback) = self.on_draw.as_mut() {
                        callback();
                    }
                }
                SimEvent::PlayerDied { id, frame } => {
                    debug!(id, frame, "relaying elimination");
                }
            }
        }

        self.maybe_publish();
        events
    }

    /// Publish a snapshot when the cadence is due. A failed publish is
    /// the transport's problem: log it and keep simulating.
    fn maybe_publish(&mut self) {
        let Some(publish) = self.publish.as_mut() else {
            return;
        };

        let frame = self.game_loop.state().frame;
        // A round reset rewinds the frame counter
        if frame < self.last_snapshot_frame {
            self.last_snapshot_frame = 0;
        }
        if frame == 0 || frame - self.last_snapshot_frame < self.snapshot_interval {
            return;
        }

        let snapshot = snapshot::capture(self.game_loop.state());
        if let Err(error) = publish(&snapshot) {
            warn!(%error, frame, "snapshot publish failed");
        }
        self.last_snapshot_frame = frame;
    }
}
