//! Mercator projection onto a bounded map window
//!
//! The projection is parameterized by the map's pixel size and its
//! west/east/south bounds rather than the usual ±85° clip: the bottom edge of
//! the image sits at `south_deg`, and y grows downward as in raster images.

use crate::coords::PixelCoordinate;
use crate::geometry::MapGeometry;
use std::f64::consts::PI;

/// Project a latitude/longitude pair (degrees) to pixel coordinates
///
/// The operation order is fixed; reordering the arithmetic changes the last
/// bits of the result.
///
/// Latitudes of exactly ±90 produce non-finite values; they are returned
/// as-is.
///
/// # Example
///
/// ```
/// use geoipmap::{project, MapGeometry};
///
/// let geometry = MapGeometry::new(2058, 1746)?;
/// let point = project(0.0, 0.0, &geometry);
/// assert_eq!(point.x, 1029.0);
/// # Ok::<(), geoipmap::GeoIpMapError>(())
/// ```
pub fn project(lat: f64, lon: f64, geometry: &MapGeometry) -> PixelCoordinate {
    let width = f64::from(geometry.width());
    let height = f64::from(geometry.height());

    let lat_south_rad = geometry.south_deg().to_radians();
    let lat_rad = lat.to_radians();
    let lon_span = geometry.east_deg() - geometry.west_deg();
    let map_width = (width / lon_span) * 360.0 / (2.0 * PI);
    let offset_y = map_width / 2.0 * mercator_ln(lat_south_rad);

    let x = (lon - geometry.west_deg()) * (width / lon_span);
    let y = height - (map_width / 2.0 * mercator_ln(lat_rad) - offset_y);

    PixelCoordinate::new(x, y)
}

#[inline]
fn mercator_ln(lat_rad: f64) -> f64 {
    let sin = lat_rad.sin();
    ((1.0 + sin) / (1.0 - sin)).ln()
}
