//! # Chunk Cache
//!
//! Memoizes built chunks by coordinate.
//!
//! ## Residency
//!
//! A coordinate is either **absent** or **resident**. The first `get` builds
//! the chunk synchronously and makes it resident; `cleanup` evicts every
//! resident chunk outside a square (Chebyshev) keep-window. A later `get` for
//! an evicted coordinate rebuilds it from scratch, identical in content but a
//! fresh allocation.
//!
//! The cache never evicts on its own. Calling `cleanup` is the owner's job;
//! [`CacheStats::resident`] is the metric to watch if it is forgotten.
//!
//! ## Sharing
//!
//! [`ChunkCache`] is the single-threaded owner. [`SharedChunkCache`] serves
//! several threads: resident chunks are read under a shared lock, misses are
//! built outside any lock, and the insert keeps whichever chunk was published
//! first so every caller sees one identity per coordinate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::chunk::{Chunk, ChunkBuilder, ChunkCoord};
use crate::config::WorldConfig;
use crate::error::ProceduralResult;
use crate::noise::WorldSeed;

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Chunks currently resident.
    pub resident: usize,
    /// Lookups served from residency.
    pub hits: u64,
    /// Lookups that had to build.
    pub misses: u64,
    /// Chunks built since the cache was created.
    pub generated_this_session: u64,
    /// Chunks evicted since the cache was created.
    pub evicted_this_session: u64,
}

/// Iterates the inclusive square `[center - radius, center + radius]²`.
fn square_window(center: ChunkCoord, radius: u32) -> impl Iterator<Item = ChunkCoord> {
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    let (x0, x1) = (center.x.saturating_sub(r), center.x.saturating_add(r));
    let (y0, y1) = (center.y.saturating_sub(r), center.y.saturating_add(r));
    (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| ChunkCoord::new(x, y)))
}

/// Single-owner chunk cache.
pub struct ChunkCache {
    builder: ChunkBuilder,
    chunks: HashMap<ChunkCoord, Arc<Chunk>>,
    stats: CacheStats,
}

impl ChunkCache {
    /// Creates an empty cache for one world.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails [`WorldConfig::validate`].
    pub fn new(seed: WorldSeed, config: WorldConfig) -> ProceduralResult<Self> {
        let builder = ChunkBuilder::new(seed, config)?;
        tracing::info!(seed = seed.value(), "chunk cache created");
        Ok(Self {
            builder,
            chunks: HashMap::new(),
            stats: CacheStats::default(),
        })
    }

    /// World seed.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.builder.seed()
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        self.builder.config()
    }

    /// Returns the chunk at `(chunk_x, chunk_y)`, building it on a miss.
    ///
    /// Repeated calls return the same `Arc` until the chunk is evicted.
    pub fn get(&mut self, chunk_x: i32, chunk_y: i32) -> Arc<Chunk> {
        self.get_coord(ChunkCoord::new(chunk_x, chunk_y))
    }

    /// Returns the chunk at `coord`, building it on a miss.
    pub fn get_coord(&mut self, coord: ChunkCoord) -> Arc<Chunk> {
        if let Some(chunk) = self.chunks.get(&coord) {
            self.stats.hits += 1;
            return Arc::clone(chunk);
        }

        tracing::debug!(chunk_x = coord.x, chunk_y = coord.y, "chunk miss, generating");
        let chunk = Arc::new(self.builder.build(coord));
        self.stats.misses += 1;
        self.stats.generated_this_session += 1;
        self.chunks.insert(coord, Arc::clone(&chunk));
        chunk
    }

    /// Returns every chunk in the square window of `radius` around the
    /// center, building the missing ones, in row-major order.
    pub fn get_in_radius(&mut self, center_x: i32, center_y: i32, radius: u32) -> Vec<Arc<Chunk>> {
        square_window(ChunkCoord::new(center_x, center_y), radius)
            .map(|coord| self.get_coord(coord))
            .collect()
    }

    /// Evicts every chunk with `|x - center_x| > keep_radius` or
    /// `|y - center_y| > keep_radius`. Returns the number evicted.
    pub fn cleanup(&mut self, center_x: i32, center_y: i32, keep_radius: u32) -> usize {
        let center = ChunkCoord::new(center_x, center_y);
        let before = self.chunks.len();
        self.chunks.retain(|coord, _| coord.within(center, keep_radius));
        let evicted = before - self.chunks.len();

        self.stats.evicted_this_session += evicted as u64;
        tracing::debug!(
            center_x,
            center_y,
            keep_radius,
            evicted,
            resident = self.chunks.len(),
            "chunk cleanup"
        );
        evicted
    }

    /// Resident chunk at `coord`, without building.
    #[must_use]
    pub fn peek(&self, coord: ChunkCoord) -> Option<&Arc<Chunk>> {
        self.chunks.get(&coord)
    }

    /// True if `coord` is resident.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Resident coordinates, in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Number of resident chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if nothing is resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Evicts everything.
    pub fn clear(&mut self) {
        self.stats.evicted_this_session += self.chunks.len() as u64;
        self.chunks.clear();
    }

    /// Counters, with `resident` filled in.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            resident: self.chunks.len(),
            ..self.stats
        }
    }
}

/// Chunk cache safe to share between threads.
pub struct SharedChunkCache {
    builder: ChunkBuilder,
    chunks: RwLock<HashMap<ChunkCoord, Arc<Chunk>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    generated: AtomicU64,
    evicted: AtomicU64,
}

impl SharedChunkCache {
    /// Creates an empty shared cache for one world.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails [`WorldConfig::validate`].
    pub fn new(seed: WorldSeed, config: WorldConfig) -> ProceduralResult<Self> {
        let builder = ChunkBuilder::new(seed, config)?;
        tracing::info!(seed = seed.value(), "shared chunk cache created");
        Ok(Self {
            builder,
            chunks: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            generated: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
        })
    }

    /// Returns the chunk at `(chunk_x, chunk_y)`, building it on a miss.
    pub fn get(&self, chunk_x: i32, chunk_y: i32) -> Arc<Chunk> {
        self.get_coord(ChunkCoord::new(chunk_x, chunk_y))
    }

    /// Returns the chunk at `coord`, building it on a miss.
    ///
    /// Two threads missing the same coordinate may both build it; only the
    /// first insert is kept and both receive that one.
    pub fn get_coord(&self, coord: ChunkCoord) -> Arc<Chunk> {
        let resident = self.chunks.read().get(&coord).cloned();
        if let Some(chunk) = resident {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return chunk;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let built = Arc::new(self.builder.build(coord));

        let mut chunks = self.chunks.write();
        let published = chunks.entry(coord).or_insert_with(|| {
            self.generated.fetch_add(1, Ordering::Relaxed);
            built
        });
        Arc::clone(published)
    }

    /// Returns every chunk in the square window of `radius`, building the
    /// missing ones, in row-major order.
    pub fn get_in_radius(&self, center_x: i32, center_y: i32, radius: u32) -> Vec<Arc<Chunk>> {
        square_window(ChunkCoord::new(center_x, center_y), radius)
            .map(|coord| self.get_coord(coord))
            .collect()
    }

    /// Evicts every chunk outside the keep-window. Returns the number evicted.
    pub fn cleanup(&self, center_x: i32, center_y: i32, keep_radius: u32) -> usize {
        let center = ChunkCoord::new(center_x, center_y);
        let mut chunks = self.chunks.write();
        let before = chunks.len();
        chunks.retain(|coord, _| coord.within(center, keep_radius));
        let evicted = before - chunks.len();

        self.evicted.fetch_add(evicted as u64, Ordering::Relaxed);
        tracing::debug!(center_x, center_y, keep_radius, evicted, "shared chunk cleanup");
        evicted
    }

    /// True if `coord` is resident.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.read().contains_key(&coord)
    }

    /// Number of resident chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    /// True if nothing is resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            resident: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            generated_this_session: self.generated.load(Ordering::Relaxed),
            evicted_this_session: self.evicted.load(Ordering::Relaxed),
        }
    }
}
