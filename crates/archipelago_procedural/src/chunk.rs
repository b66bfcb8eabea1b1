//! # Chunk System
//!
//! The world is organized into fixed-size square chunks for:
//! - Memory efficiency (only keep nearby chunks)
//! - Fast streaming (generate/discard on demand)
//! - Pure generation (a chunk is a function of seed and coordinate)
//!
//! ## Chunk Contents
//!
//! A chunk owns exactly the islands, deep-water patches and clouds its own
//! coordinate seeded, even when their footprint spills into a neighbour's
//! screen area. Chunks are immutable once built.

use crate::cloud::{CloudFormation, CloudSynthesizer};
use crate::config::WorldConfig;
use crate::deep_water::{DeepWaterPatch, DeepWaterSynthesizer};
use crate::error::ProceduralResult;
use crate::island::{Island, IslandSynthesizer};
use crate::noise::WorldSeed;
use crate::tile::WorldPoint;

/// Chunk width/height in tiles.
pub const CHUNK_SIZE: i32 = 64;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not tiles).
    pub x: i32,
    /// Y coordinate (in chunks, not tiles).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts world tile coordinates to chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_tile_pos(tile_x: i32, tile_y: i32) -> Self {
        Self {
            x: tile_x.div_euclid(CHUNK_SIZE),
            y: tile_y.div_euclid(CHUNK_SIZE),
        }
    }

    /// Converts a world pixel position to the chunk containing it.
    #[inline]
    #[must_use]
    pub fn from_world_pos(world_x: f64, world_y: f64, tile_size: f64) -> Self {
        let chunk_px = f64::from(CHUNK_SIZE) * tile_size;
        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = (
            (world_x / chunk_px).floor() as i32,
            (world_y / chunk_px).floor() as i32,
        );
        Self { x, y }
    }

    /// Returns the world pixel position of the chunk's origin (corner).
    #[inline]
    #[must_use]
    pub fn origin_px(self, tile_size: f64) -> WorldPoint {
        let chunk_px = f64::from(CHUNK_SIZE) * tile_size;
        WorldPoint::new(f64::from(self.x) * chunk_px, f64::from(self.y) * chunk_px)
    }

    /// Chebyshev distance in chunks.
    #[inline]
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy {
            dx
        } else {
            dy
        }
    }

    /// True if this coordinate lies inside the square window of `radius`
    /// chunks around `center`.
    #[inline]
    #[must_use]
    pub const fn within(self, center: Self, radius: u32) -> bool {
        self.chebyshev_distance(center) <= radius
    }
}

/// A generated chunk of world content.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    coord: ChunkCoord,
    islands: Vec<Island>,
    deep_water: Vec<DeepWaterPatch>,
    clouds: Vec<CloudFormation>,
}

impl Chunk {
    /// Chunk position in the world.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Islands seeded by this chunk.
    #[must_use]
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Deep-water patches seeded by this chunk.
    #[must_use]
    pub fn deep_water(&self) -> &[DeepWaterPatch] {
        &self.deep_water
    }

    /// Cloud formations seeded by this chunk.
    #[must_use]
    pub fn clouds(&self) -> &[CloudFormation] {
        &self.clouds
    }

    /// True if no island was placed.
    #[must_use]
    pub fn is_open_ocean(&self) -> bool {
        self.islands.is_empty()
    }

    /// Total island tiles across every island.
    #[must_use]
    pub fn island_tile_count(&self) -> usize {
        self.islands.iter().map(|island| island.tiles().len()).sum()
    }
}

/// Chunk builder composing the island, deep-water and cloud synthesizers.
pub struct ChunkBuilder {
    seed: WorldSeed,
    config: WorldConfig,
}

impl ChunkBuilder {
    /// Creates a new chunk builder.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails [`WorldConfig::validate`].
    pub fn new(seed: WorldSeed, config: WorldConfig) -> ProceduralResult<Self> {
        config.validate()?;
        Ok(Self { seed, config })
    }

    /// World seed.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Builds the chunk at the given coordinates.
    ///
    /// Islands first, then deep water (which needs the islands for
    /// clearance), then clouds. Never fails; any list may be empty.
    #[must_use]
    pub fn build(&self, coord: ChunkCoord) -> Chunk {
        let islands = IslandSynthesizer::new(self.seed, &self.config).synthesize(coord);
        let deep_water =
            DeepWaterSynthesizer::new(self.seed, &self.config).synthesize(coord, &islands);
        let clouds = CloudSynthesizer::new(self.seed, &self.config).synthesize(coord, &islands);

        tracing::trace!(
            chunk_x = coord.x,
            chunk_y = coord.y,
            islands = islands.len(),
            deep_water = deep_water.len(),
            clouds = clouds.len(),
            "chunk built"
        );

        Chunk {
            coord,
            islands,
            deep_water,
            clouds,
        }
    }
}

/// Builds one chunk with a throwaway builder.
///
/// Never fails. The config is not validated here; out-of-range values give a
/// degenerate chunk rather than a panic.
#[must_use]
pub fn build(chunk_x: i32, chunk_y: i32, seed: WorldSeed, config: &WorldConfig) -> Chunk {
    let builder = ChunkBuilder {
        seed,
        config: config.clone(),
    };
    builder.build(ChunkCoord::new(chunk_x, chunk_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Instant;

    use crate::cloud::MAX_CLOUD_TILES;
    use crate::error::ProceduralError;
    use crate::island::ShapeFamily;
    use crate::tile::{TileClass, TileOffset};

    #[test]
    fn test_chunk_coord_from_tile() {
        assert_eq!(ChunkCoord::from_tile_pos(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_tile_pos(63, 63), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_tile_pos(64, 64), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_tile_pos(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_tile_pos(-64, -64), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_tile_pos(-65, -65), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn test_chunk_coord_from_world() {
        assert_eq!(ChunkCoord::from_world_pos(0.0, 1023.9, 16.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world_pos(1024.0, -0.5, 16.0), ChunkCoord::new(1, -1));
        assert_eq!(
            ChunkCoord::new(-3, 2).origin_px(16.0),
            WorldPoint::new(-3072.0, 2048.0)
        );
    }

    #[test]
    fn test_chebyshev_window() {
        let center = ChunkCoord::new(0, 0);
        assert_eq!(ChunkCoord::new(2, -1).chebyshev_distance(center), 2);
        assert!(ChunkCoord::new(1, -1).within(center, 1));
        assert!(!ChunkCoord::new(2, 0).within(center, 1));
        assert!(ChunkCoord::new(i32::MIN, 0).chebyshev_distance(ChunkCoord::new(i32::MAX, 0)) > 0);
    }

    #[test]
    fn test_chunk_generation_determinism() {
        let builder1 = ChunkBuilder::new(WorldSeed::new(42.0), WorldConfig::default()).unwrap();
        let builder2 = ChunkBuilder::new(WorldSeed::new(42.0), WorldConfig::default()).unwrap();

        for (x, y) in [(0, 0), (0, -2), (5, 10), (-7, 3)] {
            let coord = ChunkCoord::new(x, y);
            let chunk1 = builder1.build(coord);
            let chunk2 = builder2.build(coord);
            assert_eq!(chunk1, chunk2, "Chunk ({x}, {y}) must be reproducible");
        }
    }

    #[test]
    fn test_free_build_matches_builder() {
        let config = WorldConfig::default();
        let seed = WorldSeed::new(42.0);
        assert_eq!(
            build(0, -2, seed, &config),
            ChunkBuilder::new(seed, config).unwrap().build(ChunkCoord::new(0, -2))
        );
    }

    #[test]
    fn test_seed_42_origin_scenario() {
        let chunk = build(0, 0, WorldSeed::new(42.0), &WorldConfig::default());

        assert!(chunk.is_open_ocean(), "Recorded: chunk (0, 0) of seed 42 holds no island");
        assert_eq!(chunk.island_tile_count(), 0);
        assert!(!chunk.deep_water().is_empty(), "Open ocean keeps its deep-water patches");
        assert!(!chunk.clouds().is_empty());
    }

    #[test]
    fn test_chunk_has_terrain() {
        let chunk = build(0, -2, WorldSeed::new(42.0), &WorldConfig::default());

        assert!((1..=3).contains(&chunk.islands().len()));
        assert!(chunk.island_tile_count() > 0, "Chunk should have island tiles");

        for island in chunk.islands() {
            let offsets: HashSet<TileOffset> = island.tiles().iter().map(|t| t.offset).collect();
            assert_eq!(offsets.len(), island.tiles().len());
            if island.shape().family() != ShapeFamily::Irregular {
                assert_eq!(
                    island.class_at(TileOffset::new(0, 0)),
                    Some(TileClass::Mountain),
                    "Center of a regular island is a peak"
                );
            }
        }
        println!("Chunk has {} island tiles", chunk.island_tile_count());
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = WorldConfig::default();
        let a: Vec<Chunk> = (0..10).map(|x| build(x, 0, WorldSeed::new(1.0), &config)).collect();
        let b: Vec<Chunk> = (0..10).map(|x| build(x, 0, WorldSeed::new(2.0), &config)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = WorldConfig {
            tile_size_px: 0.0,
            ..WorldConfig::default()
        };
        let err = ChunkBuilder::new(WorldSeed::new(42.0), config).err();
        assert!(
            matches!(
                err,
                Some(ProceduralError::InvalidConfig(ref msg)) if msg.contains("tile_size_px")
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn test_free_build_survives_invalid_config() {
        let zero_tiles = WorldConfig {
            tile_size_px: 0.0,
            ..WorldConfig::default()
        };
        let dense = WorldConfig {
            cloud_density: 1.0e12,
            ..WorldConfig::default()
        };

        for config in [zero_tiles, dense] {
            for (x, y) in [(0, 0), (0, -2), (3, 3)] {
                let chunk = build(x, y, WorldSeed::new(42.0), &config);
                for cloud in chunk.clouds() {
                    assert!(cloud.tiles().len() <= MAX_CLOUD_TILES);
                }
            }
        }
    }

    #[test]
    fn test_generation_performance() {
        let builder = ChunkBuilder::new(WorldSeed::new(42.0), WorldConfig::default()).unwrap();

        let start = Instant::now();
        let mut chunks_generated = 0u32;
        for y in 0..20 {
            for x in 0..20 {
                let _ = builder.build(ChunkCoord::new(x, y));
                chunks_generated += 1;
            }
        }

        let elapsed = start.elapsed();
        let rate = f64::from(chunks_generated) / elapsed.as_secs_f64();
        println!("Generated {chunks_generated} chunks in {elapsed:?} ({rate:.0} chunks/sec)");

        // Loose floor that holds in unoptimized test builds.
        assert!(rate > 10.0, "Chunk generation too slow: {rate:.1} chunks/sec");
    }
}
