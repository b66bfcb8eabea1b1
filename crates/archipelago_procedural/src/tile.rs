//! # Tile Classification
//!
//! Symbolic tile classes. A class carries no pixel data; binding a class to
//! a texture is the rendering layer's lookup table, keyed by
//! [`TileClass::texture_key`].

use std::fmt;

/// Terrain, water, or cloud category of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TileClass {
    /// Island peak (normalized distance < 0.2).
    Mountain = 0,
    /// Rocky highland.
    Rocks = 1,
    /// Bare soil.
    Soil = 2,
    /// Beach sand.
    Sand = 3,
    /// Grassland.
    Grass = 4,
    /// Forest tile.
    Tree = 5,
    /// Shallow water right off the beach.
    Shoal = 6,
    /// Shallow ocean ring.
    OceanShallow = 7,
    /// Semi-deep ocean ring.
    OceanSemiDeep = 8,
    /// Background ocean; never emitted, shows through where nothing else is.
    OceanDeep = 9,
    /// Far-ocean patch tile.
    OceanSuperDeep = 10,
    /// Dense cloud interior.
    CloudCore = 11,
    /// Wispy cloud rim.
    CloudEdge = 12,
}

impl TileClass {
    /// Every class, in discriminant order.
    pub const ALL: [Self; 13] = [
        Self::Mountain,
        Self::Rocks,
        Self::Soil,
        Self::Sand,
        Self::Grass,
        Self::Tree,
        Self::Shoal,
        Self::OceanShallow,
        Self::OceanSemiDeep,
        Self::OceanDeep,
        Self::OceanSuperDeep,
        Self::CloudCore,
        Self::CloudEdge,
    ];

    /// Converts from u8. Returns `None` for unknown discriminants.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Mountain),
            1 => Some(Self::Rocks),
            2 => Some(Self::Soil),
            3 => Some(Self::Sand),
            4 => Some(Self::Grass),
            5 => Some(Self::Tree),
            6 => Some(Self::Shoal),
            7 => Some(Self::OceanShallow),
            8 => Some(Self::OceanSemiDeep),
            9 => Some(Self::OceanDeep),
            10 => Some(Self::OceanSuperDeep),
            11 => Some(Self::CloudCore),
            12 => Some(Self::CloudEdge),
            _ => None,
        }
    }

    /// Stable key for the external class-to-texture table.
    #[must_use]
    pub const fn texture_key(self) -> &'static str {
        match self {
            Self::Mountain => "mountain",
            Self::Rocks => "rocks",
            Self::Soil => "soil",
            Self::Sand => "sand",
            Self::Grass => "grass",
            Self::Tree => "tree",
            Self::Shoal => "shoal",
            Self::OceanShallow => "ocean_shallow",
            Self::OceanSemiDeep => "ocean_semi_deep",
            Self::OceanDeep => "ocean_deep",
            Self::OceanSuperDeep => "ocean_super_deep",
            Self::CloudCore => "cloud_core",
            Self::CloudEdge => "cloud_edge",
        }
    }

    /// Returns true for the water classes (shoal included).
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(
            self,
            Self::Shoal
                | Self::OceanShallow
                | Self::OceanSemiDeep
                | Self::OceanDeep
                | Self::OceanSuperDeep
        )
    }

    /// Returns true for the cloud bands.
    #[must_use]
    pub const fn is_cloud(self) -> bool {
        matches!(self, Self::CloudCore | Self::CloudEdge)
    }

    /// Returns true for walkable land.
    #[must_use]
    pub const fn is_land(self) -> bool {
        !self.is_water() && !self.is_cloud()
    }
}

impl fmt::Display for TileClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.texture_key())
    }
}

/// Cloud density band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CloudBand {
    /// Normalized distance < 0.7.
    Core,
    /// Everything further out.
    Edge,
}

impl CloudBand {
    /// The tile class this band renders as.
    #[must_use]
    pub const fn tile_class(self) -> TileClass {
        match self {
            Self::Core => TileClass::CloudCore,
            Self::Edge => TileClass::CloudEdge,
        }
    }
}

impl From<CloudBand> for TileClass {
    fn from(band: CloudBand) -> Self {
        band.tile_class()
    }
}

/// Offset of a tile from its owner's center, in whole tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileOffset {
    /// Horizontal offset in tiles.
    pub dx: i32,
    /// Vertical offset in tiles.
    pub dy: i32,
}

impl TileOffset {
    /// Creates a new offset.
    #[inline]
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length in tiles.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        f64::from(self.dx).hypot(f64::from(self.dy))
    }
}

/// A point in world pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPoint {
    /// X in pixels.
    pub x: f64,
    /// Y in pixels.
    pub y: f64,
}

impl WorldPoint {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// This point moved by `offset` tiles of `tile_size` pixels.
    #[inline]
    #[must_use]
    pub fn offset_by(self, offset: TileOffset, tile_size: f64) -> Self {
        Self {
            x: self.x + f64::from(offset.dx) * tile_size,
            y: self.y + f64::from(offset.dy) * tile_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_roundtrips_catalogue() {
        for class in TileClass::ALL {
            assert_eq!(TileClass::from_u8(class as u8), Some(class));
        }
        assert_eq!(TileClass::from_u8(13), None);
    }

    #[test]
    fn test_texture_keys_unique() {
        let mut keys: Vec<&str> = TileClass::ALL.iter().map(|c| c.texture_key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), TileClass::ALL.len(), "Texture keys must be unique");
    }

    #[test]
    fn test_categories_partition() {
        for class in TileClass::ALL {
            let hits = [class.is_water(), class.is_cloud(), class.is_land()]
                .iter()
                .filter(|&&hit| hit)
                .count();
            assert_eq!(hits, 1, "{class} must be exactly one of water/cloud/land");
        }
        assert!(TileClass::Shoal.is_water());
        assert!(TileClass::Tree.is_land());
    }

    #[test]
    fn test_cloud_band_classes() {
        assert_eq!(TileClass::from(CloudBand::Core), TileClass::CloudCore);
        assert_eq!(CloudBand::Edge.tile_class(), TileClass::CloudEdge);
    }

    #[test]
    fn test_point_offset() {
        let p = WorldPoint::new(100.0, 50.0).offset_by(TileOffset::new(2, -1), 16.0);
        assert_eq!(p, WorldPoint::new(132.0, 34.0));
        let distance = WorldPoint::new(0.0, 0.0).distance(WorldPoint::new(3.0, 4.0));
        assert!((distance - 5.0).abs() < 1e-12);
    }
}
