//! Great-circle distance and grid scale tables.

use crate::grid::GeoPoint;

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average hexagon edge length in meters, indexed by resolution.
pub const EDGE_LENGTH_METERS: [f64; 16] = [
    1_107_712.591,
    418_676.0055,
    158_244.6558,
    59_810.85794,
    22_606.3794,
    8_544.408276,
    3_229.482772,
    1_220.629759,
    461.354_683_7,
    174.375_668_1,
    65.907_807_49,
    24.910_561_4,
    9.415_526_211,
    3.559_893_033,
    1.348_574_562,
    0.509_713_273,
];

/// Upper bound on the distance in meters between two placekeys whose codes
/// share a prefix of the given length (index = shared prefix length).
pub const PREFIX_DISTANCE_METERS: [f64; 10] = [
    2.004e7, 2.004e7, 2.777e6, 1.065e6, 1.524e5, 2.177e4, 8227.0, 1176.0, 444.3, 63.47,
];

/// Haversine distance between two points, in meters.
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlat = lat2 - lat1;
    let dlng = (b.lng() - a.lng()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}

/// Returns the maximum distance between placekeys sharing `prefix_len` code
/// characters, or `None` past the end of the table.
pub fn prefix_distance(prefix_len: usize) -> Option<f64> {
    PREFIX_DISTANCE_METERS.get(prefix_len).copied()
}

/// Estimates how many grid rings at `resolution` are needed to reach
/// `distance_m` from a cell centre.
///
/// Consecutive rings are at least one edge length apart, so this
/// over-approximates; callers filter the ring by exact distance.
pub fn ring_radius(distance_m: f64, resolution: u8) -> u32 {
    let edge = EDGE_LENGTH_METERS[resolution.min(15) as usize];
    if distance_m <= 0.0 {
        return 0;
    }
    (distance_m / edge).ceil() as u32
}
