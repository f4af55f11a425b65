//! Polygon parsing and serialization.
//!
//! WKT and GeoJSON inputs are read into `geo_types` polygons with
//! `x` = longitude and `y` = latitude. GeoJSON output is built directly as
//! `serde_json` values.

use super::error::{Result, SpatialError};
use geo_types::{Coord, Geometry, LineString, Polygon};
use serde::Deserialize;
use serde_json::{json, Value};
use wkt::TryFromWkt;

/// GeoJSON objects accepted as polygon input.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonInput {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    Feature { geometry: Box<GeoJsonInput> },
}

/// Parses a WKT `POLYGON`.
pub fn parse_wkt_polygon(text: &str) -> Result<Polygon<f64>> {
    let geometry = Geometry::<f64>::try_from_wkt_str(text)
        .map_err(|e| SpatialError::WktParse(e.to_string()))?;

    match geometry {
        Geometry::Polygon(polygon) => Ok(polygon),
        other => Err(SpatialError::UnsupportedGeometry(geometry_name(&other))),
    }
}

/// Parses a GeoJSON `Polygon` geometry, or a `Feature` wrapping one.
pub fn parse_geojson_polygon(text: &str) -> Result<Polygon<f64>> {
    let input: GeoJsonInput =
        serde_json::from_str(text).map_err(|e| SpatialError::GeoJsonParse(e.to_string()))?;
    geojson_to_polygon(input)
}

fn geojson_to_polygon(input: GeoJsonInput) -> Result<Polygon<f64>> {
    match input {
        GeoJsonInput::Feature { geometry } => geojson_to_polygon(*geometry),
        GeoJsonInput::Polygon { coordinates } => {
            let mut rings = coordinates
                .into_iter()
                .map(ring_from_positions)
                .collect::<Result<Vec<_>>>()?;
            if rings.is_empty() {
                return Err(SpatialError::GeoJsonParse(
                    "polygon has no exterior ring".to_string(),
                ));
            }
            let exterior = rings.remove(0);
            Ok(Polygon::new(exterior, rings))
        }
    }
}

fn ring_from_positions(positions: Vec<Vec<f64>>) -> Result<LineString<f64>> {
    positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(SpatialError::GeoJsonParse(format!(
                "position needs at least two values, got {}",
                position.len()
            ))),
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString::from)
}

/// Swaps the axes of every coordinate (`(lat, lng)` ↔ `(lng, lat)`).
pub fn swap_axes(polygon: &Polygon<f64>) -> Polygon<f64> {
    let swap = |ring: &LineString<f64>| {
        ring.coords()
            .map(|c| Coord { x: c.y, y: c.x })
            .collect::<LineString<f64>>()
    };
    Polygon::new(
        swap(polygon.exterior()),
        polygon.interiors().iter().map(swap).collect(),
    )
}

/// Serializes a polygon as a GeoJSON `Polygon` geometry.
pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> Value {
    let ring = |ring: &LineString<f64>| -> Vec<[f64; 2]> {
        ring.coords().map(|c| [c.x, c.y]).collect()
    };

    let mut rings = vec![ring(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring));

    json!({
        "type": "Polygon",
        "coordinates": rings,
    })
}

fn geometry_name(geometry: &Geometry<f64>) -> String {
    let name = match geometry {
        Geometry::Point(_) => "Point",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        _ => "GeometryCollection",
    };
    name.to_string()
}
