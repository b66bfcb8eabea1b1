//! # Island Synthesis
//!
//! Decides whether a chunk holds land, how many islands, and rasterizes each
//! one into classified tile offsets around its center.
//!
//! ## Pipeline
//!
//! 1. Occupancy: `rand(chunk_x, chunk_y, seed) < 0.3`, roughly 30% of chunks.
//! 2. Count: 1-3 candidate slots.
//! 3. Per slot: center in the 0.2-0.8 interior of the chunk, base radius
//!    8-18 tiles. A slot that would overlap an accepted island is dropped
//!    ([`PlacementPolicy::PlaceOrReject`]).
//! 4. Shape family: circle 30%, oval 20%, diagonal 15%, irregular 35%.
//! 5. Rasterize a `2 * (radius + 8) + 1` square window and classify every
//!    offset by its shape-normalized distance.
//!
//! The scan window ignores stretch factors, so strongly stretched ovals and
//! diagonals are clipped along their long axis.

use std::f64::consts::FRAC_PI_2;

use crate::chunk::{ChunkCoord, CHUNK_SIZE};
use crate::config::WorldConfig;
use crate::noise::{noise2d, rand, DrawStream, WorldSeed};
use crate::placement::{Footprint, PlacementPolicy};
use crate::tile::{TileClass, TileOffset, WorldPoint};

/// Probability that a chunk contains any island at all.
pub const ISLAND_OCCUPANCY: f64 = 0.3;

/// Maximum candidate islands per chunk.
pub const MAX_ISLANDS_PER_CHUNK: u32 = 3;

/// Minimum gap between island footprints, in pixels.
pub const ISLAND_MARGIN_PX: f64 = 50.0;

/// Normalized distance where the outermost water ring ends.
pub const RING_EXTENT: f64 = 1.8;

/// Extra tiles scanned beyond the base radius.
pub const SCAN_PADDING: i32 = 8;

/// Smallest base radius in tiles.
pub const MIN_BASE_RADIUS: i32 = 8;

/// Largest base radius in tiles.
pub const MAX_BASE_RADIUS: i32 = 18;

/// Draw lane holding the occupancy and count draws.
const LANE_ISLANDS: u32 = 0;
/// First per-slot lane; slot `i` reads lane `LANE_ISLAND_SLOT + i`.
const LANE_ISLAND_SLOT: u32 = 1;

/// Sub-seed purpose for per-tile class mixing.
const PURPOSE_TILE_MIX: u64 = 0x7115_0001;
/// Sub-seed purpose for irregular edge noise.
const PURPOSE_EDGE_NOISE: u64 = 0x7115_0002;

/// Shape family of an island.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeFamily {
    /// Plain disk.
    Circle,
    /// Axis-aligned ellipse.
    Oval,
    /// Rotated ellipse.
    Diagonal,
    /// Disk with a noise-perturbed edge.
    Irregular,
}

impl ShapeFamily {
    /// Maps a draw in `[0, 1)` onto the family weights.
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.30 {
            Self::Circle
        } else if roll < 0.50 {
            Self::Oval
        } else if roll < 0.65 {
            Self::Diagonal
        } else {
            Self::Irregular
        }
    }
}

/// Concrete shape parameters for one island.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IslandShape {
    /// Plain disk.
    Circle,
    /// Axis-aligned stretch.
    Oval {
        /// Horizontal stretch.
        stretch_x: f64,
        /// Vertical stretch.
        stretch_y: f64,
    },
    /// Rotation followed by stretch.
    Diagonal {
        /// Rotation in radians, `[0, pi/2)`.
        angle: f64,
        /// Stretch along the rotated x axis.
        stretch_x: f64,
        /// Stretch along the rotated y axis.
        stretch_y: f64,
    },
    /// Disk whose radial distance is perturbed by multi-octave noise.
    Irregular,
}

impl IslandShape {
    /// Long-axis stretch of ovals.
    pub const OVAL_LONG: f64 = 1.5;
    /// Short-axis stretch of ovals.
    pub const OVAL_SHORT: f64 = 0.7;
    /// Long-axis stretch of diagonals.
    pub const DIAGONAL_LONG: f64 = 1.4;
    /// Short-axis stretch of diagonals.
    pub const DIAGONAL_SHORT: f64 = 0.8;

    /// The family this shape belongs to.
    #[must_use]
    pub const fn family(&self) -> ShapeFamily {
        match self {
            Self::Circle => ShapeFamily::Circle,
            Self::Oval { .. } => ShapeFamily::Oval,
            Self::Diagonal { .. } => ShapeFamily::Diagonal,
            Self::Irregular => ShapeFamily::Irregular,
        }
    }

    /// Draws the parameters of a shape from a slot stream.
    fn draw(draws: &mut DrawStream) -> Self {
        match ShapeFamily::from_roll(draws.next_f64()) {
            ShapeFamily::Circle => Self::Circle,
            ShapeFamily::Oval => {
                if draws.next_f64() < 0.5 {
                    Self::Oval {
                        stretch_x: Self::OVAL_LONG,
                        stretch_y: Self::OVAL_SHORT,
                    }
                } else {
                    Self::Oval {
                        stretch_x: Self::OVAL_SHORT,
                        stretch_y: Self::OVAL_LONG,
                    }
                }
            }
            ShapeFamily::Diagonal => Self::Diagonal {
                angle: draws.range(0.0, FRAC_PI_2),
                stretch_x: Self::DIAGONAL_LONG,
                stretch_y: Self::DIAGONAL_SHORT,
            },
            ShapeFamily::Irregular => Self::Irregular,
        }
    }

    /// Applies the inverse rotation and stretch to an offset.
    #[inline]
    fn normalize(&self, dx: f64, dy: f64) -> (f64, f64) {
        match *self {
            Self::Circle | Self::Irregular => (dx, dy),
            Self::Oval {
                stretch_x,
                stretch_y,
            } => (dx / stretch_x, dy / stretch_y),
            Self::Diagonal {
                angle,
                stretch_x,
                stretch_y,
            } => {
                let (sin, cos) = angle.sin_cos();
                let rx = dx * cos + dy * sin;
                let ry = -dx * sin + dy * cos;
                (rx / stretch_x, ry / stretch_y)
            }
        }
    }
}

/// One classified tile of an island.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IslandTile {
    /// Offset from the island center, in tiles.
    pub offset: TileOffset,
    /// Terrain class.
    pub class: TileClass,
}

/// A rasterized landmass. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Island {
    id: String,
    chunk: ChunkCoord,
    index: u32,
    center: WorldPoint,
    base_radius: i32,
    radius: f64,
    shape: IslandShape,
    tiles: Vec<IslandTile>,
}

impl Island {
    /// Identifier built from `(chunk_x, chunk_y, index)`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Chunk whose synthesis produced this island.
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

    /// Base radius in tiles (8-18).
    #[must_use]
    pub const fn base_radius(&self) -> i32 {
        self.base_radius
    }

    /// Estimated pixel radius including the water rings.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Shape parameters.
    #[must_use]
    pub const fn shape(&self) -> IslandShape {
        self.shape
    }

    /// Classified tiles in scan order.
    #[must_use]
    pub fn tiles(&self) -> &[IslandTile] {
        &self.tiles
    }

    /// Footprint used for overlap and clearance tests.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        Footprint::new(self.center, self.radius)
    }

    /// Class of the tile at `offset`, if one was emitted.
    #[must_use]
    pub fn class_at(&self, offset: TileOffset) -> Option<TileClass> {
        self.tiles
            .iter()
            .find(|tile| tile.offset == offset)
            .map(|tile| tile.class)
    }

    /// True if a tile was emitted at `offset`.
    #[must_use]
    pub fn contains_offset(&self, offset: TileOffset) -> bool {
        self.class_at(offset).is_some()
    }
}

/// Classifies a shape-normalized distance, innermost band first.
///
/// `roll` in `[0, 1)` picks between the classes of mixed bands.
/// Returns `None` past [`RING_EXTENT`], where background ocean shows through.
#[must_use]
pub fn classify_band(normalized_dist: f64, roll: f64) -> Option<TileClass> {
    let class = if normalized_dist < 0.2 {
        TileClass::Mountain
    } else if normalized_dist < 0.4 {
        if roll < 0.8 {
            TileClass::Rocks
        } else {
            TileClass::Tree
        }
    } else if normalized_dist < 0.6 {
        if roll < 0.35 {
            TileClass::Soil
        } else if roll < 0.6 {
            TileClass::Tree
        } else if roll < 0.85 {
            TileClass::Grass
        } else {
            TileClass::Sand
        }
    } else if normalized_dist < 0.8 {
        if roll < 0.5 {
            TileClass::Sand
        } else {
            TileClass::Grass
        }
    } else if normalized_dist < 1.0 {
        if roll < 0.6 {
            TileClass::Sand
        } else {
            TileClass::Shoal
        }
    } else if normalized_dist < 1.2 {
        TileClass::Shoal
    } else if normalized_dist < 1.5 {
        TileClass::OceanShallow
    } else if normalized_dist < RING_EXTENT {
        TileClass::OceanSemiDeep
    } else {
        return None;
    };
    Some(class)
}

/// Produces the islands of one chunk.
pub struct IslandSynthesizer<'a> {
    seed: WorldSeed,
    config: &'a WorldConfig,
}

impl<'a> IslandSynthesizer<'a> {
    /// Creates a synthesizer for one world.
    #[must_use]
    pub const fn new(seed: WorldSeed, config: &'a WorldConfig) -> Self {
        Self { seed, config }
    }

    /// True if the chunk's occupancy draw admits any island.
    #[must_use]
    pub fn is_occupied(&self, coord: ChunkCoord) -> bool {
        rand(f64::from(coord.x), f64::from(coord.y), self.seed.value()) < ISLAND_OCCUPANCY
    }

    /// Builds every accepted island of `coord`.
    #[must_use]
    pub fn synthesize(&self, coord: ChunkCoord) -> Vec<Island> {
        let mut head = DrawStream::new(coord.x, coord.y, LANE_ISLANDS, self.seed);
        if head.next_f64() >= ISLAND_OCCUPANCY {
            return Vec::new();
        }
        let candidates = head.below(MAX_ISLANDS_PER_CHUNK) + 1;

        let mut islands: Vec<Island> = Vec::with_capacity(candidates as usize);
        let mut footprints: Vec<Footprint> = Vec::with_capacity(candidates as usize);

        for index in 0..candidates {
            let mut draws = DrawStream::new(coord.x, coord.y, LANE_ISLAND_SLOT + index, self.seed);

            let placed = PlacementPolicy::PlaceOrReject.place(
                |_| self.draw_candidate(coord, &mut draws),
                |candidate| candidate.footprint.clears(&footprints, ISLAND_MARGIN_PX),
            );
            let Some(candidate) = placed else {
                tracing::debug!(
                    chunk_x = coord.x,
                    chunk_y = coord.y,
                    index,
                    "island candidate overlaps, slot dropped"
                );
                continue;
            };

            let shape = IslandShape::draw(&mut draws);
            let tiles = rasterize(
                &shape,
                candidate.base_radius,
                candidate.center_tile,
                self.seed,
                self.config,
            );

            footprints.push(candidate.footprint);
            islands.push(Island {
                id: format!("island_{}_{}_{}", coord.x, coord.y, index),
                chunk: coord,
                index,
                center: candidate.footprint.center,
                base_radius: candidate.base_radius,
                radius: candidate.footprint.radius,
                shape,
                tiles,
            });
        }

        islands
    }

    fn draw_candidate(&self, coord: ChunkCoord, draws: &mut DrawStream) -> Candidate {
        let size = f64::from(CHUNK_SIZE);
        let tile_x = f64::from(coord.x) * size + (draws.range(0.2, 0.8) * size).floor();
        let tile_y = f64::from(coord.y) * size + (draws.range(0.2, 0.8) * size).floor();

        #[allow(clippy::cast_sign_loss)]
        let spread = (MAX_BASE_RADIUS - MIN_BASE_RADIUS + 1) as u32;
        #[allow(clippy::cast_possible_wrap)]
        let base_radius = MIN_BASE_RADIUS + draws.below(spread) as i32;

        let tile_size = self.config.tile_size_px;
        let center = WorldPoint::new(tile_x * tile_size, tile_y * tile_size);
        let radius = f64::from(base_radius) * RING_EXTENT * tile_size;

        Candidate {
            center_tile: (tile_x, tile_y),
            base_radius,
            footprint: Footprint::new(center, radius),
        }
    }
}

/// A drawn but not yet accepted island slot.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    center_tile: (f64, f64),
    base_radius: i32,
    footprint: Footprint,
}

/// Rasterizes one island shape around `center_tile` (world tile units).
///
/// Scans the square window once per offset, so offsets never repeat.
/// A non-positive radius yields an empty, still valid, tile list.
#[must_use]
pub fn rasterize(
    shape: &IslandShape,
    base_radius: i32,
    center_tile: (f64, f64),
    seed: WorldSeed,
    config: &WorldConfig,
) -> Vec<IslandTile> {
    if base_radius <= 0 {
        return Vec::new();
    }

    let radius = f64::from(base_radius);
    let half = base_radius + SCAN_PADDING;
    let mix_seed = seed.derive(PURPOSE_TILE_MIX).value();
    let edge_seed = seed.derive(PURPOSE_EDGE_NOISE).value();
    let (center_x, center_y) = center_tile;

    #[allow(clippy::cast_sign_loss)]
    let side = (2 * half + 1) as usize;
    let mut tiles = Vec::with_capacity(side * side);

    for dy in -half..=half {
        for dx in -half..=half {
            let world_x = center_x + f64::from(dx);
            let world_y = center_y + f64::from(dy);

            let (rx, ry) = shape.normalize(f64::from(dx), f64::from(dy));
            let mut distance = rx.hypot(ry);
            if shape.family() == ShapeFamily::Irregular {
                let wobble =
                    noise2d(world_x, world_y, edge_seed, config.irregular_noise_scale) - 0.5;
                distance += wobble * 2.0 * config.irregular_noise_amplitude * radius;
            }

            let roll = rand(world_x, world_y, mix_seed);
            if let Some(class) = classify_band(distance / radius, roll) {
                tiles.push(IslandTile {
                    offset: TileOffset::new(dx, dy),
                    class,
                });
            }
        }
    }

    tiles
}
