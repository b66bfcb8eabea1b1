//! # Deep-Water Patches
//!
//! Small ragged clusters of far-ocean tiles scattered through open water for
//! background depth variation. Candidates landing near an island are dropped
//! without retry, so open-ocean chunks end up with more patches.

use crate::chunk::{ChunkCoord, CHUNK_SIZE};
use crate::config::WorldConfig;
use crate::island::Island;
use crate::noise::{rand, DrawStream, WorldSeed};
use crate::tile::{TileClass, TileOffset, WorldPoint};

/// Fewest patch candidates per chunk.
pub const MIN_PATCHES: u32 = 3;

/// Most patch candidates per chunk.
pub const MAX_PATCHES: u32 = 8;

/// Smallest patch radius in tiles.
pub const MIN_PATCH_RADIUS: i32 = 3;

/// Largest patch radius in tiles.
pub const MAX_PATCH_RADIUS: i32 = 8;

/// Extra clearance beyond an island's radius, in pixels.
pub const PATCH_CLEARANCE_PX: f64 = 100.0;

const LANE_DEEP_WATER: u32 = 8;
/// Patch `j` reads lane `LANE_PATCH + j`.
const LANE_PATCH: u32 = 9;

const PURPOSE_PATCH_EDGE: u64 = 0xD33E_0001;

/// A cluster of far-ocean tiles. Every point is [`TileClass::OceanSuperDeep`].
#[derive(Clone, Debug, PartialEq)]
pub struct DeepWaterPatch {
    center: WorldPoint,
    radius_tiles: i32,
    points: Vec<WorldPoint>,
}

impl DeepWaterPatch {
    /// Center in world pixels.
    #[must_use]
    pub const fn center(&self) -> WorldPoint {
        self.center
    }

    /// Nominal radius in tiles (3-8).
    #[must_use]
    pub const fn radius_tiles(&self) -> i32 {
        self.radius_tiles
    }

    /// World-space tile positions of the patch.
    #[must_use]
    pub fn points(&self) -> &[WorldPoint] {
        &self.points
    }

    /// Class shared by every point.
    #[must_use]
    pub const fn class(&self) -> TileClass {
        TileClass::OceanSuperDeep
    }
}

/// Produces the deep-water patches of one chunk.
pub struct DeepWaterSynthesizer<'a> {
    seed: WorldSeed,
    config: &'a WorldConfig,
}

impl<'a> DeepWaterSynthesizer<'a> {
    /// Creates a synthesizer for one world.
    #[must_use]
    pub const fn new(seed: WorldSeed, config: &'a WorldConfig) -> Self {
        Self { seed, config }
    }

    /// Builds the patches of `coord`, keeping clear of `islands`.
    #[must_use]
    pub fn synthesize(&self, coord: ChunkCoord, islands: &[Island]) -> Vec<DeepWaterPatch> {
        let mut head = DrawStream::new(coord.x, coord.y, LANE_DEEP_WATER, self.seed);
        let candidates = MIN_PATCHES + head.below(MAX_PATCHES - MIN_PATCHES + 1);

        let size = f64::from(CHUNK_SIZE);
        let tile_size = self.config.tile_size_px;
        let edge_seed = self.seed.derive(PURPOSE_PATCH_EDGE).value();

        let mut patches = Vec::with_capacity(candidates as usize);
        for slot in 0..candidates {
            let mut draws = DrawStream::new(coord.x, coord.y, LANE_PATCH + slot, self.seed);
            let tile_x = f64::from(coord.x) * size + (draws.next_f64() * size).floor();
            let tile_y = f64::from(coord.y) * size + (draws.next_f64() * size).floor();
            let center = WorldPoint::new(tile_x * tile_size, tile_y * tile_size);

            let clear = islands.iter().all(|island| {
                center.distance(island.center()) > island.radius() + PATCH_CLEARANCE_PX
            });
            if !clear {
                continue;
            }

            #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
            let radius_tiles = MIN_PATCH_RADIUS
                + draws.below((MAX_PATCH_RADIUS - MIN_PATCH_RADIUS + 1) as u32) as i32;
            let radius = f64::from(radius_tiles);

            let mut points = Vec::new();
            for dy in -radius_tiles..=radius_tiles {
                for dx in -radius_tiles..=radius_tiles {
                    let offset = TileOffset::new(dx, dy);
                    let roll = rand(tile_x + f64::from(dx), tile_y + f64::from(dy), edge_seed);
                    if offset.length() <= radius * (0.75 + 0.25 * roll) {
                        points.push(center.offset_by(offset, tile_size));
                    }
                }
            }

            patches.push(DeepWaterPatch {
                center,
                radius_tiles,
                points,
            });
        }

        patches
    }
}
