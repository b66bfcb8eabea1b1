//! # World Streamer
//!
//! Drives a [`ChunkCache`] from a moving viewer position: keeps the load
//! window resident every update and evicts outside the keep window on a
//! fixed interval.
//!
//! Time is passed in by the caller; the streamer never reads a clock.

use std::sync::Arc;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

use crate::cache::{CacheStats, ChunkCache};
use crate::chunk::{Chunk, ChunkCoord};
use crate::config::WorldConfig;
use crate::error::ProceduralResult;
use crate::noise::WorldSeed;

/// What one [`WorldStreamer::update`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamUpdate {
    /// Chunk under the viewer.
    pub center: ChunkCoord,
    /// True if the viewer entered a new chunk.
    pub center_changed: bool,
    /// Chunks built by this update.
    pub loaded: u64,
    /// Chunks evicted by this update.
    pub evicted: usize,
}

/// Load/evict driver around a moving viewer.
pub struct WorldStreamer {
    cache: ChunkCache,
    load_radius: u32,
    keep_radius: u32,
    cleanup_interval: Duration,
    last_cleanup: Option<Instant>,
    center: Option<ChunkCoord>,
}

impl WorldStreamer {
    /// Creates a streamer with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails [`WorldConfig::validate`].
    pub fn new(seed: WorldSeed, config: WorldConfig) -> ProceduralResult<Self> {
        let (load_radius, keep_radius) = (config.load_radius, config.keep_radius);
        let cleanup_interval = Duration::from_millis(config.cleanup_interval_ms);
        let cache = ChunkCache::new(seed, config)?;

        tracing::info!(
            load_radius,
            keep_radius,
            cleanup_interval_ms = cache.config().cleanup_interval_ms,
            "world streamer created"
        );
        Ok(Self {
            cache,
            load_radius,
            keep_radius,
            cleanup_interval,
            last_cleanup: None,
            center: None,
        })
    }

    /// Moves the viewer to a world pixel position.
    ///
    /// Ensures the load window is resident, then runs a cleanup if at least
    /// one interval has passed since the last one (or none ran yet).
    pub fn update(&mut self, world_x: f64, world_y: f64, now: Instant) -> StreamUpdate {
        let center =
            ChunkCoord::from_world_pos(world_x, world_y, self.cache.config().tile_size_px);
        let center_changed = self.center != Some(center);
        self.center = Some(center);

        let generated_before = self.cache.stats().generated_this_session;
        self.cache.get_in_radius(center.x, center.y, self.load_radius);
        let loaded = self.cache.stats().generated_this_session - generated_before;

        let due = self.last_cleanup.map_or(true, |last| {
            now.saturating_duration_since(last) >= self.cleanup_interval
        });
        let evicted = if due {
            self.last_cleanup = Some(now);
            self.cache.cleanup(center.x, center.y, self.keep_radius)
        } else {
            0
        };

        StreamUpdate {
            center,
            center_changed,
            loaded,
            evicted,
        }
    }

    /// Chunks in the load window around the last update position.
    ///
    /// Empty before the first update.
    pub fn visible(&mut self) -> Vec<Arc<Chunk>> {
        match self.center {
            Some(center) => self.cache.get_in_radius(center.x, center.y, self.load_radius),
            None => Vec::new(),
        }
    }

    /// Chunk under the viewer after the last update.
    #[must_use]
    pub const fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Underlying cache.
    #[must_use]
    pub const fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    /// Cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streamer() -> WorldStreamer {
        WorldStreamer::new(WorldSeed::new(42.0), WorldConfig::default().with_radii(1, 2)).unwrap()
    }

    #[test]
    fn test_first_update_loads_window() {
        let mut streamer = streamer();
        let update = streamer.update(10.0, 10.0, Instant::now());

        assert_eq!(update.center, ChunkCoord::new(0, 0));
        assert!(update.center_changed);
        assert_eq!(update.loaded, 9);
        assert_eq!(update.evicted, 0);
        assert_eq!(streamer.visible().len(), 9);
    }

    #[test]
    fn test_cleanup_waits_for_interval() {
        let mut streamer = streamer();
        let start = Instant::now();
        let chunk_px = streamer.cache().config().chunk_size_px();

        streamer.update(0.0, 0.0, start);
        // walk five chunks east before the interval elapses
        for step in 1..=5 {
            let now = start + Duration::from_millis(10);
            let update = streamer.update(f64::from(step) * chunk_px, 0.0, now);
            assert_eq!(update.evicted, 0, "No cleanup before the interval");
        }
        assert!(streamer.cache().contains(ChunkCoord::new(-1, 0)));

        let update = streamer.update(5.0 * chunk_px, 0.0, start + Duration::from_secs(5));
        assert!(update.evicted > 0);
        assert!(!streamer.cache().contains(ChunkCoord::new(-1, 0)));
        assert!(streamer
            .cache()
            .coords()
            .all(|c| c.within(ChunkCoord::new(5, 0), 2)));
    }

    #[test]
    fn test_standing_still_is_free() {
        let mut streamer = streamer();
        let start = Instant::now();
        streamer.update(100.0, 100.0, start);
        let update = streamer.update(120.0, 90.0, start + Duration::from_secs(10));

        assert!(!update.center_changed);
        assert_eq!(update.loaded, 0);
        assert_eq!(update.evicted, 0);
        assert_eq!(streamer.stats().resident, 9);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = WorldConfig {
            cleanup_interval_ms: 0,
            ..WorldConfig::default()
        };
        assert!(WorldStreamer::new(WorldSeed::new(42.0), config).is_err());
    }

    #[test]
    fn test_visible_empty_before_update() {
        let mut streamer = streamer();
        assert!(streamer.visible().is_empty());
        assert_eq!(streamer.center(), None);
    }
}
