//! Great-circle distance and the flat-plane steering approximations.

use swarmind_protocol::TelemetrySample;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Sentinel distance for agents with a missing coordinate.
///
/// Large enough to lose every nearest-neighbor comparison while staying
/// finite, so ordinary float ordering works on it.
pub const UNKNOWN_DISTANCE_M: f64 = 1e9;

/// Haversine great-circle distance in meters between two lat/lon points
/// given in degrees.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance between two agents, or [`UNKNOWN_DISTANCE_M`] when either
/// lacks a coordinate. Missing data never raises an error here; the
/// sentinel simply keeps such agents out of nearest-neighbor selection.
pub fn distance_between(a: &TelemetrySample, b: &TelemetrySample) -> f64 {
    match (a.latitude, a.longitude, b.latitude, b.longitude) {
        (Some(lat1), Some(lon1), Some(lat2), Some(lon2)) => {
            haversine_distance_m(lat1, lon1, lat2, lon2)
        }
        _ => UNKNOWN_DISTANCE_M,
    }
}

/// Steering angle from one point toward another, in radians.
///
/// Flat-plane approximation over lat/lon degree deltas: `atan2(Δlon, Δlat)`,
/// measured from north. Good enough at flocking ranges (tens of meters)
/// and cheap to compute every tick.
pub fn steer_angle_rad(from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> f64 {
    (to_lon - from_lon).atan2(to_lat - from_lat)
}

/// Same steering angle expressed as a yaw heading in degrees.
pub fn steer_angle_deg(from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> f64 {
    steer_angle_rad(from_lat, from_lon, to_lat, to_lon).to_degrees()
}

/// North/east velocity components of magnitude `speed` along `angle_rad`.
pub fn velocity_along(angle_rad: f64, speed: f64) -> (f64, f64) {
    (speed * angle_rad.cos(), speed * angle_rad.sin())
}
