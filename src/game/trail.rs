//! Append-only trail history
//!
//! One point is recorded per simulation tick for the lifetime of a round
//! (easily tens of thousands of ticks), so storage is a contiguous buffer
//! with amortized-O(1) doubling growth. There is no deletion API: trails
//! are permanent until the round resets, at which point the whole trail
//! is replaced.

use crate::game::constants::trail::INITIAL_CAPACITY;
use crate::util::vec2::Vec2;

/// Growable point history for a single player
///
/// Owned exclusively by its `Player`; points are immutable once written
/// (appends and wholesale replacement only).
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: Vec<Vec2>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Create a trail seeded with a spawn point
    ///
    /// A spawned player always has at least one trail point.
    pub fn from_spawn(point: Vec2) -> Self {
        let mut trail = Self::new();
        trail.push(point);
        trail
    }

    /// Rebuild the trail from a received snapshot (guest mirroring)
    pub fn from_points(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Append a point; amortized O(1), never fails
    #[inline]
    pub fn push(&mut self, point: Vec2) {
        self.points.push(point);
    }

    /// 0-based point lookup; `None` when out of range
    #[inline]
    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    /// Most recent point, i.e. the player's current head position
    #[inline]
    pub fn last(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }

    /// Consecutive point pairs, oldest first
    ///
    /// Segment index `i` joins points `i` and `i + 1`; the newest segment
    /// has index `len() - 2`.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Number of segments (one fewer than points, zero when < 2 points)
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}
