//! Hexagonal grid abstraction
//!
//! Placekeys are derived from H3 cell indexes. The grid engine is an external
//! collaborator: everything in this crate reaches it through the
//! [`GridAdapter`] trait, and [`H3Grid`] is the production implementation
//! backed by the `h3o` crate.
//!
//! Polygons handed to [`GridAdapter::polyfill`] use GeoJSON axis order
//! (`x` = longitude, `y` = latitude), in degrees.

mod types;

pub use types::{
    GeoPoint, GridCell, GridError, MAX_LAT, MAX_LON, MAX_RESOLUTION, MIN_LAT, MIN_LON,
};

use geo_types::Polygon;
use h3o::geom::{ContainmentMode, TilerBuilder};
use h3o::{CellIndex, LatLng, Resolution};

/// Capability interface over the hexagonal grid engine.
///
/// Implementations carry no placekey logic of their own; they only expose
/// the grid primitives the codec and spatial queries are built on.
pub trait GridAdapter: Send + Sync {
    /// Returns the cell containing `point` at `resolution`.
    fn coordinate_to_cell(&self, point: GeoPoint, resolution: u8) -> Result<GridCell, GridError>;

    /// Returns the centre of `cell`.
    fn cell_to_coordinate(&self, cell: GridCell) -> Result<GeoPoint, GridError>;

    /// Returns the boundary vertices of `cell` (6 for a hexagon).
    fn cell_to_boundary(&self, cell: GridCell) -> Result<Vec<GeoPoint>, GridError>;

    /// Parses the hexadecimal string form of a cell.
    fn string_to_cell(&self, s: &str) -> Result<GridCell, GridError>;

    /// Formats a cell as its hexadecimal string form.
    fn cell_to_string(&self, cell: GridCell) -> String;

    /// Checks whether `cell` addresses a real cell.
    fn is_valid_cell(&self, cell: GridCell) -> bool;

    /// Returns every cell within `k` grid steps of `cell`, including `cell`.
    fn k_ring(&self, cell: GridCell, k: u32) -> Result<Vec<GridCell>, GridError>;

    /// Returns the cells at `resolution` whose centres fall inside `polygon`.
    fn polyfill(&self, polygon: &Polygon<f64>, resolution: u8)
        -> Result<Vec<GridCell>, GridError>;
}

/// [`GridAdapter`] backed by the `h3o` implementation of H3.
#[derive(Debug, Clone, Copy, Default)]
pub struct H3Grid;

impl H3Grid {
    /// Creates a new H3 grid adapter.
    pub fn new() -> Self {
        Self
    }
}

fn resolution(res: u8) -> Result<Resolution, GridError> {
    Resolution::try_from(res).map_err(|_| GridError::InvalidResolution(res))
}

fn cell_index(cell: GridCell) -> Result<CellIndex, GridError> {
    CellIndex::try_from(cell.as_u64()).map_err(|_| GridError::InvalidCell(cell.as_u64()))
}

fn to_point(ll: LatLng) -> GeoPoint {
    GeoPoint::from_grid(ll.lat(), ll.lng())
}

impl GridAdapter for H3Grid {
    fn coordinate_to_cell(&self, point: GeoPoint, res: u8) -> Result<GridCell, GridError> {
        let ll = LatLng::new(point.lat(), point.lng())
            .map_err(|_| GridError::InvalidLatitude(point.lat()))?;
        Ok(GridCell::new(u64::from(ll.to_cell(resolution(res)?))))
    }

    fn cell_to_coordinate(&self, cell: GridCell) -> Result<GeoPoint, GridError> {
        Ok(to_point(LatLng::from(cell_index(cell)?)))
    }

    fn cell_to_boundary(&self, cell: GridCell) -> Result<Vec<GeoPoint>, GridError> {
        let boundary = cell_index(cell)?.boundary();
        Ok(boundary.iter().copied().map(to_point).collect())
    }

    fn string_to_cell(&self, s: &str) -> Result<GridCell, GridError> {
        s.parse::<CellIndex>()
            .map(|index| GridCell::new(u64::from(index)))
            .map_err(|_| GridError::InvalidCellString(s.to_string()))
    }

    fn cell_to_string(&self, cell: GridCell) -> String {
        cell.to_string()
    }

    fn is_valid_cell(&self, cell: GridCell) -> bool {
        CellIndex::try_from(cell.as_u64()).is_ok()
    }

    fn k_ring(&self, cell: GridCell, k: u32) -> Result<Vec<GridCell>, GridError> {
        let disk = cell_index(cell)?.grid_disk::<Vec<_>>(k);
        Ok(disk
            .into_iter()
            .map(|index| GridCell::new(u64::from(index)))
            .collect())
    }

    fn polyfill(&self, polygon: &Polygon<f64>, res: u8) -> Result<Vec<GridCell>, GridError> {
        let mut tiler = TilerBuilder::new(resolution(res)?)
            .containment_mode(ContainmentMode::ContainsCentroid)
            .build();
        tiler
            .add(polygon.clone())
            .map_err(|e| GridError::InvalidPolygon(e.to_string()))?;

        Ok(tiler
            .into_coverage()
            .map(|index| GridCell::new(u64::from(index)))
            .collect())
    }
}
