//! Error types for spatial queries.

use crate::codec::CodecError;
use crate::grid::GridError;
use thiserror::Error;

/// Spatial query errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    /// Placekey could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Grid engine failure.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// WKT parsing error.
    #[error("WKT parse error: {0}")]
    WktParse(String),

    /// GeoJSON parsing error.
    #[error("GeoJSON parse error: {0}")]
    GeoJsonParse(String),

    /// Geometry parsed but is not a polygon.
    #[error("Unsupported geometry: expected a polygon, got {0}")]
    UnsupportedGeometry(String),

    /// Search radius needs more grid rings than a query may expand.
    #[error("Distance {distance_m}m is too large, at most {max_m:.0}m is supported")]
    DistanceTooLarge { distance_m: f64, max_m: f64 },
}

/// Result type for spatial operations.
pub type Result<T> = std::result::Result<T, SpatialError>;
