//! Flat-earth geodesy for short distances
//!
//! All helpers use a local tangent-plane approximation: latitude deltas map
//! to meters through a fixed Earth radius, longitude deltas are additionally
//! scaled by the cosine of the reference latitude. Good to well under a
//! meter across a mine site.

use mineguard_types::Position;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
pub const KMH_TO_MS: f64 = 1.0 / 3.6;

/// Below this speed (m/s) a vehicle is treated as not moving at all
pub const NEGLIGIBLE_SPEED_MS: f64 = 0.01;

/// Distance in meters between two positions
pub fn distance_m(a: &Position, b: &Position) -> f64 {
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();
    let cos_lat = a.latitude.to_radians().cos();

    let dx = dlon * cos_lat * EARTH_RADIUS_M;
    let dy = dlat * EARTH_RADIUS_M;

    dx.hypot(dy)
}

/// Bearing from `from` to `to`, degrees clockwise from north in [0, 360)
pub fn bearing_deg(from: &Position, to: &Position) -> f64 {
    let dlat = to.latitude - from.latitude;
    let dlon = to.longitude - from.longitude;
    let dx = dlon * from.latitude.to_radians().cos();

    normalize_heading(dx.atan2(dlat).to_degrees())
}

/// Moves `pos` by `distance` meters along `heading_deg`. Altitude is kept.
pub fn displace(pos: &Position, distance: f64, heading_deg: f64) -> Position {
    let heading = heading_deg.to_radians();
    let east = distance * heading.sin();
    let north = distance * heading.cos();
    offset_m(pos, north, east)
}

/// Moves `pos` by the given north/east offsets in meters
pub fn offset_m(pos: &Position, north: f64, east: f64) -> Position {
    let dlat = (north / EARTH_RADIUS_M).to_degrees();
    let dlon = (east / (EARTH_RADIUS_M * pos.latitude.to_radians().cos())).to_degrees();

    Position {
        latitude: pos.latitude + dlat,
        longitude: pos.longitude + dlon,
        altitude: pos.altitude,
    }
}

/// Constant-velocity straight-line extrapolation.
///
/// Returns `pos` unchanged when the speed is negligible.
pub fn project(pos: &Position, speed_kmh: f64, heading_deg: f64, seconds_ahead: f64) -> Position {
    let speed_ms = speed_kmh * KMH_TO_MS;
    if speed_ms < NEGLIGIBLE_SPEED_MS {
        return *pos;
    }
    displace(pos, speed_ms * seconds_ahead, heading_deg)
}

/// Wraps any angle into [0, 360)
pub fn normalize_heading(heading: f64) -> f64 {
    let h = heading.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Absolute difference between two headings, folded into [0, 180]
pub fn heading_difference(h1: f64, h2: f64) -> f64 {
    let diff = (normalize_heading(h1) - normalize_heading(h2)).abs();
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Position {
        Position::new(-20.122, -43.952, 820.0)
    }

    #[test]
    fn test_distance_zero() {
        assert_eq!(distance_m(&origin(), &origin()), 0.0);
    }

    #[test]
    fn test_offset_round_trips_through_distance() {
        let a = origin();
        let north = offset_m(&a, 100.0, 0.0);
        let east = offset_m(&a, 0.0, 100.0);
        assert!((distance_m(&a, &north) - 100.0).abs() < 1e-6);
        assert!((distance_m(&a, &east) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_displace_keeps_altitude() {
        let moved = displace(&origin(), 50.0, 135.0);
        assert_eq!(moved.altitude, 820.0);
        assert!((distance_m(&origin(), &moved) - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let a = origin();
        assert!(bearing_deg(&a, &offset_m(&a, 100.0, 0.0)).abs() < 1e-6);
        assert!((bearing_deg(&a, &offset_m(&a, 0.0, 100.0)) - 90.0).abs() < 1e-6);
        assert!((bearing_deg(&a, &offset_m(&a, -100.0, 0.0)) - 180.0).abs() < 1e-6);
        assert!((bearing_deg(&a, &offset_m(&a, 0.0, -100.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_project_stationary_returns_input() {
        assert_eq!(project(&origin(), 0.0, 45.0, 10.0), origin());
        assert_eq!(project(&origin(), 0.02, 45.0, 10.0), origin());
    }

    #[test]
    fn test_project_moves_speed_times_time() {
        // 36 km/h = 10 m/s
        let p = project(&origin(), 36.0, 0.0, 3.0);
        assert!((distance_m(&origin(), &p) - 30.0).abs() < 1e-6);
        assert!(p.latitude > origin().latitude);
    }

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(0.0), 0.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        assert_eq!(normalize_heading(-90.0), 270.0);
        assert_eq!(normalize_heading(725.0), 5.0);
        assert_eq!(normalize_heading(-1e-20), 0.0);
    }

    #[test]
    fn test_heading_difference_folds() {
        assert_eq!(heading_difference(10.0, 350.0), 20.0);
        assert_eq!(heading_difference(350.0, 10.0), 20.0);
        assert_eq!(heading_difference(0.0, 180.0), 180.0);
        assert_eq!(heading_difference(90.0, 90.0), 0.0);
    }
}
