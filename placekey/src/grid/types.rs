//! Grid type definitions

use std::fmt;
use thiserror::Error;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Finest resolution of the hexagonal grid.
pub const MAX_RESOLUTION: u8 = 15;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting coordinates outside the valid ranges.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GridError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(GridError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lng) {
            return Err(GridError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Builds a point from values already known to be in range
    /// (cell centres and boundary vertices handed back by the grid engine).
    pub(crate) fn from_grid(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[inline]
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// A 64-bit hexagonal grid cell index.
///
/// Opaque apart from the bit arithmetic the placekey codec performs on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell(u64);

impl GridCell {
    /// Wraps a raw index. Validity is checked by the grid, not here.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw 64-bit index.
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for GridCell {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Errors reported by the grid engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Latitude is outside valid range (-90.0 to 90.0)
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
    /// Resolution is outside valid range (0 to 15)
    #[error("Invalid resolution: {0} (must be between 0 and 15)")]
    InvalidResolution(u8),
    /// Index does not address a cell
    #[error("Invalid cell index: {0:#x}")]
    InvalidCell(u64),
    /// Hex string form of a cell could not be parsed
    #[error("Invalid cell string: {0}")]
    InvalidCellString(String),
    /// Polygon could not be tiled
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_accepts_bounds() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_geo_point_rejects_out_of_range() {
        assert!(matches!(
            GeoPoint::new(90.5, 0.0),
            Err(GridError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoPoint::new(0.0, -180.1),
            Err(GridError::InvalidLongitude(_))
        ));
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_grid_cell_display_is_hex() {
        let cell = GridCell::new(0x8a2830828767fff);
        assert_eq!(cell.to_string(), "8a2830828767fff");
        assert_eq!(cell.as_u64(), 0x8a2830828767fff);
    }

    #[test]
    fn test_error_messages() {
        let msg = GridError::InvalidLatitude(91.0).to_string();
        assert!(msg.contains("91"));
        assert!(msg.contains("-90"));
    }
}
