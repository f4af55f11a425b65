//! Spatial queries over placekeys
//!
//! Neighbourhoods, distances, cell outlines and polygon coverage, all
//! computed through the codec's grid adapter.
//!
//! Coordinates follow two conventions: `(lat, lng)` by default, or GeoJSON
//! order `(lng, lat)` when a `geo_json` flag is set. Polygons are stored
//! internally with `x` = longitude and `y` = latitude.

mod distance;
mod error;
mod geometry;

pub use distance::{
    haversine_meters, prefix_distance, ring_radius, EARTH_RADIUS_KM, EDGE_LENGTH_METERS,
    PREFIX_DISTANCE_METERS,
};
pub use error::{Result, SpatialError};
pub use geometry::{parse_geojson_polygon, parse_wkt_polygon, polygon_to_geojson, swap_axes};

use crate::codec::{Placekey, PlacekeyCodec, RESOLUTION};
use crate::grid::{GeoPoint, GridCell};
use geo::{Area, Buffer, Contains, Intersects, Relate};
use geo_types::{Coord, LineString, Polygon};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use wkt::ToWkt;

/// Degrees the input polygon is grown by before polyfilling, so cells whose
/// centres fall just outside still get classified.
pub const BUFFER_DEGREES: f64 = 2e-3;

/// Largest grid ring [`SpatialQuery::nearby`] expands to. The ring holds
/// `3k(k + 1) + 1` cells, so this keeps a query to about 12 500 cells.
pub const MAX_NEARBY_RINGS: u32 = 64;

/// Largest distance in meters [`SpatialQuery::nearby`] accepts.
pub fn max_nearby_distance() -> f64 {
    f64::from(MAX_NEARBY_RINGS) * EDGE_LENGTH_METERS[RESOLUTION as usize]
}

/// Cells covering a polygon, split by how they relate to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolygonFill {
    /// Cells fully inside the polygon.
    pub interior: BTreeSet<Placekey>,
    /// Cells crossing the polygon boundary.
    pub boundary: BTreeSet<Placekey>,
}

impl PolygonFill {
    /// Total number of cells in both sets.
    pub fn len(&self) -> usize {
        self.interior.len() + self.boundary.len()
    }

    /// Returns `true` when no cell covers the polygon.
    pub fn is_empty(&self) -> bool {
        self.interior.is_empty() && self.boundary.is_empty()
    }
}

/// Returns the maximum distance (meters) between placekeys sharing a code
/// prefix, indexed by prefix length.
pub fn prefix_distance_table() -> &'static [f64] {
    &PREFIX_DISTANCE_METERS
}

/// Spatial operations backed by a shared codec.
///
/// # Example
///
/// ```
/// use placekey::codec::PlacekeyCodec;
/// use placekey::spatial::SpatialQuery;
/// use std::sync::Arc;
///
/// let query = SpatialQuery::new(Arc::new(PlacekeyCodec::with_h3().unwrap()));
/// let ring = query.neighbors("@5vg-7gq-tvz", 1).unwrap();
/// assert_eq!(ring.len(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialQuery {
    codec: Arc<PlacekeyCodec>,
}

impl SpatialQuery {
    /// Creates a query engine using `codec`.
    pub fn new(codec: Arc<PlacekeyCodec>) -> Self {
        Self { codec }
    }

    /// Returns the codec this engine decodes with.
    pub fn codec(&self) -> &Arc<PlacekeyCodec> {
        &self.codec
    }

    /// Returns the placekeys within `k` grid steps of `placekey`, including
    /// the placekey itself.
    pub fn neighbors(&self, placekey: &str, k: u32) -> Result<BTreeSet<Placekey>> {
        let cell = self.codec.to_cell(placekey)?;
        self.ring(cell, k)
    }

    fn ring(&self, cell: GridCell, k: u32) -> Result<BTreeSet<Placekey>> {
        let cells = self.codec.grid().k_ring(cell, k)?;
        Ok(cells
            .into_iter()
            .map(|c| self.codec.encode_cell(c))
            .collect())
    }

    /// Great-circle distance in meters between the centres of two placekeys.
    pub fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let a = self.codec.decode(a)?;
        let b = self.codec.decode(b)?;
        Ok(haversine_meters(a, b))
    }

    /// Returns the vertices of the placekey's cell as `(lat, lng)` pairs, or
    /// `(lng, lat)` when `geo_json` is set.
    pub fn hex_boundary(&self, placekey: &str, geo_json: bool) -> Result<Vec<(f64, f64)>> {
        let vertices = self.vertices(placekey)?;
        Ok(vertices
            .into_iter()
            .map(|p| {
                if geo_json {
                    (p.lng(), p.lat())
                } else {
                    (p.lat(), p.lng())
                }
            })
            .collect())
    }

    fn vertices(&self, placekey: &str) -> Result<Vec<GeoPoint>> {
        let cell = self.codec.to_cell(placekey)?;
        Ok(self.codec.grid().cell_to_boundary(cell)?)
    }

    /// Returns the placekey's cell as a closed polygon.
    ///
    /// With `geo_json` the polygon has `x` = longitude; otherwise `x` =
    /// latitude, matching [`hex_boundary`](Self::hex_boundary).
    pub fn polygon(&self, placekey: &str, geo_json: bool) -> Result<Polygon<f64>> {
        let ring: LineString<f64> = self
            .hex_boundary(placekey, geo_json)?
            .into_iter()
            .map(|(x, y)| Coord { x, y })
            .collect();
        Ok(Polygon::new(ring, vec![]))
    }

    /// Returns the placekey's cell as WKT, in `(lng lat)` order.
    pub fn wkt(&self, placekey: &str) -> Result<String> {
        Ok(self.polygon(placekey, true)?.wkt_string())
    }

    /// Returns the placekey's cell as a GeoJSON `Polygon` geometry.
    pub fn geojson(&self, placekey: &str) -> Result<Value> {
        Ok(polygon_to_geojson(&self.polygon(placekey, true)?))
    }

    /// Finds the resolution 10 cells covering `polygon`.
    ///
    /// Cells entirely inside the polygon are `interior`. Cells that
    /// intersect it are `boundary`, except that cells merely touching its
    /// edge are left out unless `include_touching` is set. Set `geo_json`
    /// when the polygon is in `(lng, lat)` order.
    pub fn fill_polygon(
        &self,
        polygon: &Polygon<f64>,
        include_touching: bool,
        geo_json: bool,
    ) -> Result<PolygonFill> {
        let polygon = if geo_json {
            polygon.clone()
        } else {
            swap_axes(polygon)
        };

        let mut fill = PolygonFill::default();
        if polygon.unsigned_area() == 0.0 {
            return Ok(fill);
        }

        let mut candidates = BTreeSet::new();
        for part in polygon.buffer(BUFFER_DEGREES) {
            candidates.extend(self.codec.grid().polyfill(&part, RESOLUTION)?);
        }

        for cell in candidates {
            let placekey = self.codec.encode_cell(cell);
            let hexagon = self.polygon(placekey.as_str(), true)?;

            if polygon.contains(&hexagon) {
                fill.interior.insert(placekey);
            } else if polygon.intersects(&hexagon)
                && (include_touching || !polygon.relate(&hexagon).is_touches())
            {
                fill.boundary.insert(placekey);
            }
        }

        Ok(fill)
    }

    /// Parses a WKT polygon in `(lng lat)` order and fills it.
    pub fn fill_wkt(&self, wkt: &str, include_touching: bool) -> Result<PolygonFill> {
        let polygon = parse_wkt_polygon(wkt)?;
        self.fill_polygon(&polygon, include_touching, true)
    }

    /// Parses a GeoJSON polygon (or feature) and fills it.
    pub fn fill_geojson(&self, geojson: &str, include_touching: bool) -> Result<PolygonFill> {
        let polygon = parse_geojson_polygon(geojson)?;
        self.fill_polygon(&polygon, include_touching, true)
    }

    /// Returns the placekeys whose centres lie within `max_distance_m` of
    /// `center`, nearest first, with their distances in meters.
    ///
    /// Fails with [`SpatialError::DistanceTooLarge`] past
    /// [`max_nearby_distance`].
    pub fn nearby(&self, center: GeoPoint, max_distance_m: f64) -> Result<Vec<(Placekey, f64)>> {
        if max_distance_m > max_nearby_distance() {
            return Err(SpatialError::DistanceTooLarge {
                distance_m: max_distance_m,
                max_m: max_nearby_distance(),
            });
        }

        let k = ring_radius(max_distance_m, RESOLUTION).min(MAX_NEARBY_RINGS);
        let cell = self.codec.grid().coordinate_to_cell(center, RESOLUTION)?;

        let mut found = Vec::new();
        for candidate in self.codec.grid().k_ring(cell, k)? {
            let centre = self.codec.grid().cell_to_coordinate(candidate)?;
            let meters = haversine_meters(center, centre);
            if meters <= max_distance_m {
                found.push((self.codec.encode_cell(candidate), meters));
            }
        }

        found.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;

    const SF: &str = "@5vg-7gq-tvz";

    fn query() -> SpatialQuery {
        SpatialQuery::new(Arc::new(PlacekeyCodec::with_h3().unwrap()))
    }

    #[test]
    fn test_neighbors_contains_origin() {
        let origin: Placekey = SF.parse().unwrap();
        assert!(query().neighbors(SF, 1).unwrap().contains(&origin));
    }

    #[test]
    fn test_neighbors_grow_with_k() {
        let q = query();
        assert_eq!(q.neighbors(SF, 0).unwrap().len(), 1);
        assert_eq!(q.neighbors(SF, 1).unwrap().len(), 7);
        assert_eq!(q.neighbors(SF, 2).unwrap().len(), 19);

        let inner = q.neighbors(SF, 1).unwrap();
        let outer = q.neighbors(SF, 2).unwrap();
        assert!(inner.is_subset(&outer));
    }

    #[test]
    fn test_neighbors_rejects_bad_placekey() {
        assert!(matches!(
            query().neighbors("@5vg-7gq-tv1", 1),
            Err(SpatialError::Codec(_))
        ));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(query().distance(SF, SF).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let q = query();
        let other = "@5vg-82n-kzz";
        let ab = q.distance(SF, other).unwrap();
        let ba = q.distance(other, SF).unwrap();
        assert!(ab > 0.0);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_adjacent_cells_are_about_two_apothems_apart() {
        let q = query();
        for neighbor in q.neighbors(SF, 1).unwrap() {
            let d = q.distance(SF, neighbor.as_str()).unwrap();
            assert!(d < 2.5 * EDGE_LENGTH_METERS[10], "{} is {} m away", neighbor, d);
        }
    }

    #[test]
    fn test_hex_boundary_orders() {
        let q = query();
        let latlng = q.hex_boundary(SF, false).unwrap();
        let lnglat = q.hex_boundary(SF, true).unwrap();

        assert_eq!(latlng.len(), 6);
        assert_eq!(lnglat.len(), 6);
        for ((lat, lng), (x, y)) in latlng.iter().zip(lnglat.iter()) {
            assert_eq!(lat, y);
            assert_eq!(lng, x);
        }
        assert!(latlng[0].0 > 37.0 && latlng[0].1 < -122.0);
    }

    #[test]
    fn test_polygon_is_closed() {
        let polygon = query().polygon(SF, true).unwrap();
        let coords = &polygon.exterior().0;
        assert_eq!(coords.len(), 7);
        assert_eq!(coords.first(), coords.last());
    }

    #[test]
    fn test_wkt_output() {
        let wkt = query().wkt(SF).unwrap();
        assert!(wkt.starts_with("POLYGON(("), "{}", wkt);
        assert!(wkt.contains("-122.4"));
    }

    #[test]
    fn test_geojson_output() {
        let value = query().geojson(SF).unwrap();
        assert_eq!(value["type"], "Polygon");
        assert_eq!(value["coordinates"][0].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_fill_polygon_zero_area_is_empty() {
        let line = polygon![(x: 37.0, y: -122.0), (x: 37.0, y: -122.0), (x: 37.0, y: -122.0)];
        let fill = query().fill_polygon(&line, true, false).unwrap();
        assert!(fill.is_empty());
    }

    #[test]
    fn test_fill_polygon_sets_are_disjoint() {
        let square = polygon![
            (x: -122.45, y: 37.73),
            (x: -122.44, y: 37.73),
            (x: -122.44, y: 37.74),
            (x: -122.45, y: 37.74),
        ];
        let fill = query().fill_polygon(&square, true, true).unwrap();

        assert!(!fill.interior.is_empty());
        assert!(!fill.boundary.is_empty());
        assert!(fill.interior.is_disjoint(&fill.boundary));
    }

    #[test]
    fn test_fill_polygon_axis_order_flag() {
        let q = query();
        let lnglat = polygon![
            (x: -122.45, y: 37.73),
            (x: -122.44, y: 37.73),
            (x: -122.44, y: 37.74),
            (x: -122.45, y: 37.74),
        ];
        let latlng = swap_axes(&lnglat);

        assert_eq!(
            q.fill_polygon(&lnglat, false, true).unwrap(),
            q.fill_polygon(&latlng, false, false).unwrap()
        );
    }

    #[test]
    fn test_fill_polygon_single_cell() {
        let q = query();
        let hexagon = q.polygon(SF, true).unwrap();
        let fill = q.fill_polygon(&hexagon, false, true).unwrap();

        let origin: Placekey = SF.parse().unwrap();
        assert!(fill.interior.contains(&origin));
        assert!(!fill.boundary.contains(&origin));
    }

    #[test]
    fn test_fill_wkt_and_geojson_agree() {
        let q = query();
        let wkt = "POLYGON((-122.45 37.73, -122.44 37.73, -122.44 37.74, -122.45 37.74, -122.45 37.73))";
        let geojson = r#"{"type":"Polygon","coordinates":[[[-122.45,37.73],[-122.44,37.73],[-122.44,37.74],[-122.45,37.74],[-122.45,37.73]]]}"#;

        assert_eq!(
            q.fill_wkt(wkt, true).unwrap(),
            q.fill_geojson(geojson, true).unwrap()
        );
    }

    #[test]
    fn test_fill_wkt_rejects_non_polygon() {
        assert!(matches!(
            query().fill_wkt("POINT(1 2)", true),
            Err(SpatialError::UnsupportedGeometry(_))
        ));
    }

    #[test]
    fn test_nearby_sorted_and_bounded() {
        let q = query();
        let center = GeoPoint::new(37.7371, -122.44283).unwrap();
        let found = q.nearby(center, 200.0).unwrap();

        assert!(!found.is_empty());
        assert!(found.iter().all(|(_, d)| *d <= 200.0));
        assert!(found.windows(2).all(|w| w[0].1 <= w[1].1));
        assert_eq!(found[0].0.as_str(), SF);
    }

    #[test]
    fn test_nearby_zero_distance_is_at_most_one_cell() {
        let center = GeoPoint::new(37.7371, -122.44283).unwrap();
        assert!(query().nearby(center, 0.0).unwrap().len() <= 1);
    }

    #[test]
    fn test_nearby_at_ring_limit() {
        let center = GeoPoint::new(37.7371, -122.44283).unwrap();
        let found = query().nearby(center, max_nearby_distance()).unwrap();

        assert!(found.len() <= 3 * 64 * 65 + 1);
        assert!(found.iter().all(|(_, d)| *d <= max_nearby_distance()));
    }

    #[test]
    fn test_nearby_rejects_large_distance() {
        let q = query();
        let center = GeoPoint::new(37.7371, -122.44283).unwrap();

        for distance in [max_nearby_distance() + 100.0, 1_000_000.0, f64::INFINITY] {
            match q.nearby(center, distance) {
                Err(SpatialError::DistanceTooLarge { max_m, .. }) => {
                    assert_eq!(max_m, max_nearby_distance())
                }
                other => panic!("{} m: expected DistanceTooLarge, got {:?}", distance, other),
            }
        }
    }

    #[test]
    fn test_prefix_distance_table() {
        let table = prefix_distance_table();
        assert_eq!(table.len(), 10);
        assert!(table.windows(2).all(|w| w[0] >= w[1]));
    }
}
