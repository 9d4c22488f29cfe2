//! Map window geometry
//!
//! A [`MapGeometry`] describes the raster the coordinates are projected onto:
//! its size in pixels and the geographic window it covers. Values are
//! validated once at construction, so a geometry that exists can always be
//! projected against without producing a degenerate (non-finite) window.

use crate::error::{GeoIpMapError, Result};
use serde::{Deserialize, Serialize};

/// Default westmost longitude of the map window
pub const DEFAULT_WEST_DEG: f64 = -180.0;
/// Default eastmost longitude of the map window
pub const DEFAULT_EAST_DEG: f64 = 180.0;
/// Default southmost latitude of the map window
pub const DEFAULT_SOUTH_DEG: f64 = -89.9;

/// Marker radius as a fraction of the largest image dimension
const MARKER_RADIUS_FACTOR: f64 = 0.003;

/// Validated map geometry, constant for a matching run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeometryBuilder", into = "GeometryBuilder")]
pub struct MapGeometry {
    width: u32,
    height: u32,
    west_deg: f64,
    east_deg: f64,
    south_deg: f64,
}

impl MapGeometry {
    /// Geometry of the given size using the default world window
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::builder(width, height).build()
    }

    /// Start building a geometry of the given size
    pub fn builder(width: u32, height: u32) -> GeometryBuilder {
        GeometryBuilder {
            width,
            height,
            west_deg: DEFAULT_WEST_DEG,
            east_deg: DEFAULT_EAST_DEG,
            south_deg: DEFAULT_SOUTH_DEG,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Westmost longitude in degrees
    pub fn west_deg(&self) -> f64 {
        self.west_deg
    }

    /// Eastmost longitude in degrees
    pub fn east_deg(&self) -> f64 {
        self.east_deg
    }

    /// Southmost latitude in degrees (bottom edge of the image)
    pub fn south_deg(&self) -> f64 {
        self.south_deg
    }

    /// Default marker radius for renderers: 0.3% of the larger dimension
    ///
    /// | Resolution | Radius |
    /// |------------|--------|
    /// | 800×600    | 2.400  |
    /// | 1920×1080  | 5.760  |
    /// | 2058×1746  | 6.174  |
    pub fn default_marker_radius(&self) -> f64 {
        MARKER_RADIUS_FACTOR * f64::from(self.width.max(self.height))
    }
}

/// Builder for [`MapGeometry`]
///
/// Also the serialized form of a geometry, so deserialized values go through
/// the same validation as hand-built ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryBuilder {
    width: u32,
    height: u32,
    #[serde(default = "default_west")]
    west_deg: f64,
    #[serde(default = "default_east")]
    east_deg: f64,
    #[serde(default = "default_south")]
    south_deg: f64,
}

fn default_west() -> f64 {
    DEFAULT_WEST_DEG
}

fn default_east() -> f64 {
    DEFAULT_EAST_DEG
}

fn default_south() -> f64 {
    DEFAULT_SOUTH_DEG
}

impl GeometryBuilder {
    /// Set the westmost longitude
    pub fn west_deg(mut self, deg: f64) -> Self {
        self.west_deg = deg;
        self
    }

    /// Set the eastmost longitude
    pub fn east_deg(mut self, deg: f64) -> Self {
        self.east_deg = deg;
        self
    }

    /// Set the southmost latitude
    pub fn south_deg(mut self, deg: f64) -> Self {
        self.south_deg = deg;
        self
    }

    /// Validate and build the geometry
    ///
    /// # Errors
    ///
    /// Returns [`GeoIpMapError::Config`] if:
    /// - width or height is zero
    /// - any degree value is not finite
    /// - the east and west bounds coincide (zero longitude span)
    /// - the south bound is at or beyond a pole
    pub fn build(self) -> Result<MapGeometry> {
        if self.width == 0 || self.height == 0 {
            return Err(GeoIpMapError::config(format!(
                "map size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        for (name, value) in [
            ("west", self.west_deg),
            ("east", self.east_deg),
            ("south", self.south_deg),
        ] {
            if !value.is_finite() {
                return Err(GeoIpMapError::config(format!(
                    "{} bound must be finite, got {}",
                    name, value
                )));
            }
        }
        if self.east_deg == self.west_deg {
            return Err(GeoIpMapError::config(format!(
                "east and west bounds are both {} degrees",
                self.west_deg
            )));
        }
        if self.south_deg.abs() >= 90.0 {
            return Err(GeoIpMapError::config(format!(
                "south bound must lie strictly between -90 and 90, got {}",
                self.south_deg
            )));
        }

        Ok(MapGeometry {
            width: self.width,
            height: self.height,
            west_deg: self.west_deg,
            east_deg: self.east_deg,
            south_deg: self.south_deg,
        })
    }
}

impl TryFrom<GeometryBuilder> for MapGeometry {
    type Error = GeoIpMapError;

    fn try_from(builder: GeometryBuilder) -> Result<Self> {
        builder.build()
    }
}

impl From<MapGeometry> for GeometryBuilder {
    fn from(geometry: MapGeometry) -> Self {
        GeometryBuilder {
            width: geometry.width,
            height: geometry.height,
            west_deg: geometry.west_deg,
            east_deg: geometry.east_deg,
            south_deg: geometry.south_deg,
        }
    }
}
