//! # Cloud Formations
//!
//! One to three elliptical cloud blobs per chunk, layered above terrain.
//!
//! Placement redraws a colliding candidate up to `cloud_max_attempts` times
//! ([`PlacementPolicy::PlaceOrRetry`]). Each accepted cloud picks an aspect
//! ratio and rotation, then scatters tiles with a center-weighted radial
//! distribution: the mean of two uniform draws. Tiles inside 0.7 of the
//! normalized radius are core, the rest edge. Offsets snap to whole tiles.

use std::collections::HashSet;
use std::f64::consts::{PI, TAU};

use crate::chunk::ChunkCoord;
use crate::config::WorldConfig;
use crate::island::Island;
use crate::noise::{DrawStream, WorldSeed};
use crate::placement::{Footprint, PlacementPolicy};
use crate::tile::{CloudBand, TileOffset, WorldPoint};

/// Most cloud slots per chunk.
pub const MAX_CLOUDS_PER_CHUNK: u32 = 3;

/// Smallest unscaled cloud radius in pixels.
pub const MIN_CLOUD_RADIUS_PX: f64 = 1.0;

/// Largest unscaled cloud radius in pixels.
pub const MAX_CLOUD_RADIUS_PX: f64 = 100.0;

/// Minimum gap between cloud footprints, in pixels.
pub const CLOUD_MARGIN_PX: f64 = 150.0;

/// Normalized distance below which a tile is core.
pub const CORE_THRESHOLD: f64 = 0.7;

/// Upper bound on tiles drawn for a single cloud.
pub const MAX_CLOUD_TILES: usize = 16_384;

const LANE_CLOUDS: u32 = 24;
/// Slot `i` reads lane `LANE_CLOUD_SLOT + i`.
const LANE_CLOUD_SLOT: u32 = 25;

/// Silhouette family of a cloud.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CloudAspect {
    /// Ratio 0.6-0.8.
    Tall,
    /// Ratio 1.2-1.6.
    Wide,
    /// Ratio 0.9-1.1.
    Round,
}

impl CloudAspect {
    /// Maps a draw in `[0, 1)` onto the three-way split.
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        if roll < 1.0 / 3.0 {
            Self::Tall
        } else if roll < 2.0 / 3.0 {
            Self::Wide
        } else {
            Self::Round
        }
    }

    /// Range the x/y ratio is drawn from.
    #[must_use]
    pub const fn ratio_range(self) -> (f64, f64) {
        match self {
            Self::Tall => (0.6, 0.8),
            Self::Wide => (1.2, 1.6),
            Self::Round => (0.9, 1.1),
        }
    }
}

/// One tile of a cloud.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CloudTile {
    /// Offset from the cloud center, in tiles.
    pub offset: TileOffset,
    /// Density band.
    pub band: CloudBand,
}

/// An elliptical cloud blob. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct CloudFormation {
    id: String,
    chunk: ChunkCoord,
    index: u32,
    center: WorldPoint,
    radius: f64,
    aspect: CloudAspect,
    ratio: f64,
    rotation: f64,
    tiles: Vec<CloudTile>,
}

impl CloudFormation {
    /// Identifier built from `(chunk_x, chunk_y, index)`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Chunk whose synthesis produced this cloud.
    #[must_use]
    pub const fn chunk(&self) -> ChunkCoord {
        self.chunk
    }

    /// Slot index inside the owning chunk.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Center in world pixels.
    #[must_use]
    pub const fn center(&self) -> WorldPoint {
        self.center
    }

    /// Footprint radius in pixels, size multiplier applied.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Silhouette family.
    #[must_use]
    pub const fn aspect(&self) -> CloudAspect {
        self.aspect
    }

    /// Drawn x/y ratio of the ellipse.
    #[must_use]
    pub const fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Rotation in radians, `[0, pi)`.
    #[must_use]
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Snapped tiles in draw order.
    #[must_use]
    pub fn tiles(&self) -> &[CloudTile] {
        &self.tiles
    }

    /// Footprint used for overlap tests.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        Footprint::new(self.center, self.radius)
    }
}

/// Produces the cloud formations of one chunk.
pub struct CloudSynthesizer<'a> {
    seed: WorldSeed,
    config: &'a WorldConfig,
}

impl<'a> CloudSynthesizer<'a> {
    /// Creates a synthesizer for one world.
    #[must_use]
    pub const fn new(seed: WorldSeed, config: &'a WorldConfig) -> Self {
        Self { seed, config }
    }

    /// Placement policy for cloud slots.
    #[must_use]
    pub const fn policy(&self) -> PlacementPolicy {
        PlacementPolicy::PlaceOrRetry {
            max_attempts: self.config.cloud_max_attempts,
        }
    }

    /// Builds the clouds of `coord`.
    ///
    /// `islands` only matter when `clouds_avoid_islands` is set.
    #[must_use]
    pub fn synthesize(&self, coord: ChunkCoord, islands: &[Island]) -> Vec<CloudFormation> {
        let mut head = DrawStream::new(coord.x, coord.y, LANE_CLOUDS, self.seed);
        let slots = head.below(MAX_CLOUDS_PER_CHUNK) + 1;

        let chunk_px = self.config.chunk_size_px();
        let origin = coord.origin_px(self.config.tile_size_px);
        let multiplier = self.config.cloud_size_multiplier;
        let island_footprints: Vec<Footprint> = if self.config.clouds_avoid_islands {
            islands.iter().map(Island::footprint).collect()
        } else {
            Vec::new()
        };

        let mut clouds: Vec<CloudFormation> = Vec::with_capacity(slots as usize);
        let mut footprints: Vec<Footprint> = Vec::with_capacity(slots as usize);

        for index in 0..slots {
            let mut draws = DrawStream::new(coord.x, coord.y, LANE_CLOUD_SLOT + index, self.seed);

            let placed = self.policy().place(
                |_| {
                    let center = WorldPoint::new(
                        origin.x + draws.next_f64() * chunk_px,
                        origin.y + draws.next_f64() * chunk_px,
                    );
                    let radius = draws.range(MIN_CLOUD_RADIUS_PX, MAX_CLOUD_RADIUS_PX) * multiplier;
                    Footprint::new(center, radius)
                },
                |candidate| {
                    candidate.clears(&footprints, CLOUD_MARGIN_PX)
                        && candidate.clears(&island_footprints, 0.0)
                },
            );
            let Some(footprint) = placed else {
                tracing::debug!(
                    chunk_x = coord.x,
                    chunk_y = coord.y,
                    index,
                    attempts = self.config.cloud_max_attempts,
                    "cloud slot dropped after exhausting attempts"
                );
                continue;
            };

            footprints.push(footprint);
            clouds.push(self.shape(coord, index, footprint, &mut draws));
        }

        clouds
    }

    fn shape(
        &self,
        coord: ChunkCoord,
        index: u32,
        footprint: Footprint,
        draws: &mut DrawStream,
    ) -> CloudFormation {
        let aspect = CloudAspect::from_roll(draws.next_f64());
        let (low, high) = aspect.ratio_range();
        let ratio = draws.range(low, high);
        let rotation = draws.range(0.0, PI);

        let tile_size = self.config.tile_size_px;
        let semi_x = footprint.radius * ratio;
        let semi_y = footprint.radius;
        let area_tiles = PI * semi_x * semi_y / (tile_size * tile_size);
        // f64::min maps NaN to the cap
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let tile_count = ((area_tiles * self.config.cloud_density)
            .floor()
            .min(MAX_CLOUD_TILES as f64) as usize)
            .max(1);

        let (rot_sin, rot_cos) = rotation.sin_cos();
        let mut seen = HashSet::with_capacity(tile_count);
        let mut tiles = Vec::with_capacity(tile_count);

        for _ in 0..tile_count {
            let angle = draws.range(0.0, TAU);
            let normalized = (draws.next_f64() + draws.next_f64()) * 0.5;

            let ex = angle.cos() * normalized * semi_x;
            let ey = angle.sin() * normalized * semi_y;
            let x = ex * rot_cos - ey * rot_sin;
            let y = ex * rot_sin + ey * rot_cos;

            #[allow(clippy::cast_possible_truncation)]
            let offset =
                TileOffset::new((x / tile_size).round() as i32, (y / tile_size).round() as i32);
            if !seen.insert(offset) {
                continue;
            }

            tiles.push(CloudTile {
                offset,
                band: classify_cloud_band(normalized),
            });
        }

        CloudFormation {
            id: format!("cloud_{}_{}_{}", coord.x, coord.y, index),
            chunk: coord,
            index,
            center: footprint.center,
            radius: footprint.radius,
            aspect,
            ratio,
            rotation,
            tiles,
        }
    }
}

/// Band of a tile at `normalized_dist` from its cloud center.
#[must_use]
pub fn classify_cloud_band(normalized_dist: f64) -> CloudBand {
    if normalized_dist < CORE_THRESHOLD {
        CloudBand::Core
    } else {
        CloudBand::Edge
    }
}
