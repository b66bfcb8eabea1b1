//! # ARCHIPELAGO Procedural Generation
//!
//! Deterministic content for an infinite 2D ocean world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and coordinate always produce the same chunk
//! 2. **Chunked**: World is generated in 64x64-tile chunks
//! 3. **Streamable**: Chunks are built on demand and evicted by distance
//! 4. **Pure**: A chunk depends on nothing but its seed, coordinate and config
//!
//! ## Core Components
//!
//! - `rand` / `noise2d` / `DrawStream`: Coordinate-hashed random source
//! - `IslandSynthesizer`: Island placement and terrain rasterization
//! - `DeepWaterSynthesizer`: Deep-water patches away from islands
//! - `CloudSynthesizer`: Elliptical cloud formations
//! - `ChunkBuilder`: Composes the three into a `Chunk`
//! - `ChunkCache` / `SharedChunkCache`: Coordinate-keyed chunk residency
//! - `WorldStreamer`: Load/evict around a moving viewer
//!
//! ## Example
//!
//! ```rust,ignore
//! use archipelago_procedural::{ChunkCache, WorldConfig, WorldSeed};
//!
//! let mut cache = ChunkCache::new(WorldSeed::new(42.0), WorldConfig::default())?;
//!
//! // Everything within two chunks of the origin
//! let visible = cache.get_in_radius(0, 0, 2);
//! assert_eq!(visible.len(), 25);
//!
//! // Drop what the viewer left behind
//! cache.cleanup(0, 0, 3);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cache;
pub mod chunk;
pub mod cloud;
pub mod config;
pub mod deep_water;
pub mod error;
pub mod island;
pub mod noise;
pub mod placement;
pub mod streamer;
pub mod tile;

pub use cache::{CacheStats, ChunkCache, SharedChunkCache};
pub use chunk::{build, Chunk, ChunkBuilder, ChunkCoord, CHUNK_SIZE};
pub use cloud::{classify_cloud_band, CloudAspect, CloudFormation, CloudSynthesizer, CloudTile};
pub use config::WorldConfig;
pub use deep_water::{DeepWaterPatch, DeepWaterSynthesizer};
pub use error::{ProceduralError, ProceduralResult};
pub use island::{
    classify_band, rasterize, Island, IslandShape, IslandSynthesizer, IslandTile, ShapeFamily,
};
pub use noise::{noise2d, rand, DrawStream, WorldSeed};
pub use placement::{Footprint, PlacementPolicy};
pub use streamer::{Instant, StreamUpdate, WorldStreamer};
pub use tile::{CloudBand, TileClass, TileOffset, WorldPoint};
