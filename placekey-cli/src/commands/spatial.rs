//! Spatial query commands.

use clap::ValueEnum;
use placekey::grid::GeoPoint;
use placekey::spatial::SpatialQuery;
use std::io::Read;

use crate::error::CliError;

/// Output shape for `boundary`.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum BoundaryFormat {
    /// One `lat lng` vertex per line
    Coords,
    /// WKT polygon
    Wkt,
    /// GeoJSON polygon
    Geojson,
}

/// Print the placekeys within `k` grid steps, the centre included.
pub fn run_neighbors(spatial: &SpatialQuery, placekey: &str, k: u32) -> Result<(), CliError> {
    for neighbor in spatial.neighbors(placekey, k)? {
        println!("{}", neighbor);
    }
    Ok(())
}

/// Print the distance in meters between two placekeys.
pub fn run_distance(spatial: &SpatialQuery, a: &str, b: &str) -> Result<(), CliError> {
    println!("{:.2}", spatial.distance(a, b)?);
    Ok(())
}

pub fn run_boundary(
    spatial: &SpatialQuery,
    placekey: &str,
    format: BoundaryFormat,
    geo_json: bool,
) -> Result<(), CliError> {
    match format {
        BoundaryFormat::Coords => {
            for (a, b) in spatial.hex_boundary(placekey, geo_json)? {
                println!("{} {}", a, b);
            }
        }
        BoundaryFormat::Wkt => println!("{}", spatial.wkt(placekey)?),
        BoundaryFormat::Geojson => println!("{}", spatial.geojson(placekey)?),
    }
    Ok(())
}

/// Print the placekeys covering a WKT or GeoJSON polygon read from `path`
/// (`-` for stdin). Interior cells come first, then boundary cells.
pub fn run_fill(
    spatial: &SpatialQuery,
    path: &str,
    include_touching: bool,
) -> Result<(), CliError> {
    let text = read_input(path)?;
    let fill = if text.trim_start().starts_with('{') {
        spatial.fill_geojson(&text, include_touching)?
    } else {
        spatial.fill_wkt(&text, include_touching)?
    };

    for placekey in &fill.interior {
        println!("interior\t{}", placekey);
    }
    for placekey in &fill.boundary {
        println!("boundary\t{}", placekey);
    }
    Ok(())
}

/// Print the placekeys whose centres lie within `distance_m` of a point.
pub fn run_nearby(
    spatial: &SpatialQuery,
    lat: f64,
    lng: f64,
    distance_m: f64,
) -> Result<(), CliError> {
    let center = GeoPoint::new(lat, lng).map_err(|e| CliError::Input(e.to_string()))?;
    for (placekey, meters) in spatial.nearby(center, distance_m)? {
        println!("{}\t{:.2}", placekey, meters);
    }
    Ok(())
}

pub(crate) fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|error| CliError::FileRead {
                path: "<stdin>".to_string(),
                error,
            })?;
        return Ok(text);
    }

    std::fs::read_to_string(path).map_err(|error| CliError::FileRead {
        path: path.to_string(),
        error,
    })
}
