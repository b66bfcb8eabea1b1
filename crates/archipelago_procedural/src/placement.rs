//! # Placement Policies
//!
//! Islands and clouds share one overlap rule (center distance must reach the
//! sum of radii plus a margin) but differ in what happens on a collision:
//!
//! - [`PlacementPolicy::PlaceOrReject`]: one candidate per slot. A collision
//!   drops the slot. Islands use this so every slot reads a fixed set of draws.
//! - [`PlacementPolicy::PlaceOrRetry`]: redraw up to `max_attempts` times.
//!   Clouds use this.
//!
//! Collapsing the two changes world density, so they stay separate.

use crate::tile::WorldPoint;

/// Circular footprint used for overlap tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    /// Center in world pixels.
    pub center: WorldPoint,
    /// Radius in pixels.
    pub radius: f64,
}

impl Footprint {
    /// Creates a new footprint.
    #[inline]
    #[must_use]
    pub const fn new(center: WorldPoint, radius: f64) -> Self {
        Self { center, radius }
    }

    /// True if this footprint keeps `radius + other.radius + margin` away
    /// from every footprint in `others`.
    #[must_use]
    pub fn clears(&self, others: &[Self], margin: f64) -> bool {
        others
            .iter()
            .all(|other| self.center.distance(other.center) >= self.radius + other.radius + margin)
    }
}

/// What to do when a candidate collides with already-placed footprints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementPolicy {
    /// Try once; drop the slot on collision.
    PlaceOrReject,
    /// Redraw up to `max_attempts` times before dropping the slot.
    PlaceOrRetry {
        /// Total attempts including the first.
        max_attempts: u32,
    },
}

impl PlacementPolicy {
    /// Number of candidates this policy will draw for one slot.
    #[must_use]
    pub const fn attempts(self) -> u32 {
        match self {
            Self::PlaceOrReject => 1,
            Self::PlaceOrRetry { max_attempts } => max_attempts,
        }
    }

    /// Draws candidates with `draw(attempt)` until one passes `accept`.
    ///
    /// Returns `None` once the attempt budget is spent.
    pub fn place<T, D, A>(self, mut draw: D, mut accept: A) -> Option<T>
    where
        D: FnMut(u32) -> T,
        A: FnMut(&T) -> bool,
    {
        (0..self.attempts()).find_map(|attempt| {
            let candidate = draw(attempt);
            accept(&candidate).then_some(candidate)
        })
    }
}
