//! Geodetic transforms
//!
//! Pure functions and position types used by the navigation pipeline. All distances are in
//! meters, all angles in radians unless the name says otherwise.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Square of one minus the WGS84 flattening.
pub const ONE_MINUS_FLATTENING_SQUARED: f64 = 0.99330561993959;

/// Square of the WGS84 equatorial radius, in meters squared.
pub const EARTH_RADIUS_SQUARED_M2: f64 = 40_680_631_590_769.0;

/// Scale of the integer degree encoding used on the wire.
const DEG_E7: f64 = 1e7;

/// Millimeters in a meter.
const MM_PER_M: f64 = 1e3;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A geodetic position, as given by a GPS fix.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
}

/// A position in the Earth-Centered-Earth-Fixed frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct EcefPosition {
    pub pos_m_ecef: Vector3<f64>,
}

/// A position in the local North-East-Down frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct NedPosition {
    pub pos_m_ned: Vector3<f64>,
}

/// A position in the race frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RacePosition {
    pub pos_m_race: Vector2<f64>,
}

/// The origin of the NED frame: its ECEF position and the terms of the ECEF to NED rotation.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct NedOrigin {
    pub origin_m_ecef: Vector3<f64>,
    pub cos_lat: f64,
    pub sin_lat: f64,
    pub cos_lon: f64,
    pub sin_lon: f64,
}

/// Parameters of the race frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RaceFrame {
    pub mean_wind_cos: f64,
    pub mean_wind_sin: f64,

    /// The mean wind angle exactly as it was set
    pub mean_wind_angle_rad: f64,

    /// North and east of the race origin in the NED frame
    pub race_origin_m_ned: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GeodeticPosition {
    pub fn new(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m,
        }
    }

    /// Build a position from the integer wire encoding, degrees * 1e7 and millimeters.
    pub fn from_e7(lat_deg_e7: i32, lon_deg_e7: i32, alt_mm: i32) -> Self {
        Self {
            lat_deg: lat_deg_e7 as f64 / DEG_E7,
            lon_deg: lon_deg_e7 as f64 / DEG_E7,
            alt_m: alt_mm as f64 / MM_PER_M,
        }
    }

    pub fn lat_rad(&self) -> f64 {
        self.lat_deg * (PI / 180.0)
    }

    pub fn lon_rad(&self) -> f64 {
        self.lon_deg * (PI / 180.0)
    }
}

impl NedPosition {
    pub fn new(north_m: f64, east_m: f64, down_m: f64) -> Self {
        Self {
            pos_m_ned: Vector3::new(north_m, east_m, down_m),
        }
    }

    pub fn north(&self) -> f64 {
        self.pos_m_ned[0]
    }

    pub fn east(&self) -> f64 {
        self.pos_m_ned[1]
    }

    pub fn down(&self) -> f64 {
        self.pos_m_ned[2]
    }
}

impl RacePosition {
    pub fn new(x_m: f64, y_m: f64) -> Self {
        Self {
            pos_m_race: Vector2::new(x_m, y_m),
        }
    }

    pub fn x(&self) -> f64 {
        self.pos_m_race[0]
    }

    pub fn y(&self) -> f64 {
        self.pos_m_race[1]
    }
}

impl NedOrigin {
    /// Compute the origin terms for the given geodetic position.
    pub fn new(origin: &GeodeticPosition) -> Self {
        let lat_rad = origin.lat_rad();
        let lon_rad = origin.lon_rad();

        Self {
            origin_m_ecef: geodetic_to_ecef(origin).pos_m_ecef,
            cos_lat: lat_rad.cos(),
            sin_lat: lat_rad.sin(),
            cos_lon: lon_rad.cos(),
            sin_lon: lon_rad.sin(),
        }
    }
}

impl Default for NedOrigin {
    /// An all-zero origin, used only when transforming before the origin has been set.
    fn default() -> Self {
        Self {
            origin_m_ecef: Vector3::zeros(),
            cos_lat: 0.0,
            sin_lat: 0.0,
            cos_lon: 0.0,
            sin_lon: 0.0,
        }
    }
}

impl RaceFrame {
    pub fn new(mean_wind_angle_rad: f64, race_origin_m_ned: Vector2<f64>) -> Self {
        Self {
            mean_wind_cos: mean_wind_angle_rad.cos(),
            mean_wind_sin: mean_wind_angle_rad.sin(),
            mean_wind_angle_rad,
            race_origin_m_ned,
        }
    }
}

impl Default for RaceFrame {
    fn default() -> Self {
        Self::new(0.0, Vector2::zeros())
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert an angle in degrees * 1e7 into radians.
pub fn deg_e7_to_rad(deg_e7: i32) -> f64 {
    (deg_e7 as f64 / DEG_E7) * (PI / 180.0)
}

/// Convert a geodetic position into ECEF.
///
/// The meridian radius is found from the reduced latitude, while the altitude is added along the
/// geodetic latitude direction rather than the true ellipsoid normal.
pub fn geodetic_to_ecef(pos: &GeodeticPosition) -> EcefPosition {
    let lat_rad = pos.lat_rad();
    let lon_rad = pos.lon_rad();
    let alt_m = pos.alt_m;

    let reduced_lat_rad = (ONE_MINUS_FLATTENING_SQUARED * lat_rad.tan()).atan2(1.0);

    let radius_m = (EARTH_RADIUS_SQUARED_M2
        / (1.0 + (1.0 / ONE_MINUS_FLATTENING_SQUARED - 1.0) * reduced_lat_rad.sin().powi(2)))
    .sqrt();

    EcefPosition {
        pos_m_ecef: Vector3::new(
            radius_m * reduced_lat_rad.cos() * lon_rad.cos()
                + alt_m * lat_rad.cos() * lon_rad.cos(),
            radius_m * reduced_lat_rad.cos() * lon_rad.sin()
                + alt_m * lat_rad.cos() * lon_rad.sin(),
            radius_m * reduced_lat_rad.sin() + alt_m * lat_rad.sin(),
        ),
    }
}

/// Convert an ECEF position into the NED frame anchored at `origin`.
pub fn ecef_to_ned(ecef: &EcefPosition, origin: &NedOrigin) -> NedPosition {
    let delta_m = ecef.pos_m_ecef - origin.origin_m_ecef;
    let (u, v, w) = (delta_m[0], delta_m[1], delta_m[2]);

    let t = origin.cos_lon * u + origin.sin_lon * v;

    NedPosition::new(
        -origin.sin_lat * t + origin.cos_lat * w,
        -origin.sin_lon * u + origin.cos_lon * v,
        -origin.cos_lat * t - origin.sin_lat * w,
    )
}

/// Convert a NED position into the race frame.
///
/// The down component is dropped.
pub fn ned_to_race(ned: &NedPosition, race: &RaceFrame) -> RacePosition {
    let (c, s) = (race.mean_wind_cos, race.mean_wind_sin);
    let (n, e) = (ned.north(), ned.east());
    let (n0, e0) = (race.race_origin_m_ned[0], race.race_origin_m_ned[1]);

    RacePosition::new(
        -c * n - s * e + c * n0 + s * e0,
        -s * n + c * e + s * n0 - c * e0,
    )
}

/// Convert a race frame position back into the NED frame, on the local horizontal plane.
pub fn race_to_ned(race_pos: &RacePosition, race: &RaceFrame) -> NedPosition {
    let (c, s) = (race.mean_wind_cos, race.mean_wind_sin);
    let (x, y) = (race_pos.x(), race_pos.y());

    // The race rotation is its own inverse
    NedPosition::new(
        -c * x - s * y + race.race_origin_m_ned[0],
        -s * x + c * y + race.race_origin_m_ned[1],
        0.0,
    )
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn geo_to_ned(pos: &GeodeticPosition, origin: &GeodeticPosition) -> NedPosition {
        ecef_to_ned(&geodetic_to_ecef(pos), &NedOrigin::new(origin))
    }

    #[test]
    fn test_origin_maps_to_zero() {
        let origins = [
            GeodeticPosition::new(45.0, 7.0, 100.0),
            GeodeticPosition::new(-33.9, 151.2, 0.0),
            GeodeticPosition::new(0.0, 0.0, -10.0),
            GeodeticPosition::new(78.2, -15.6, 2500.0),
            GeodeticPosition::new(-60.0, -179.9, 12.5),
        ];

        for origin in origins.iter() {
            let ned = geo_to_ned(origin, origin);
            assert_abs_diff_eq!(ned.north(), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(ned.east(), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(ned.down(), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_small_displacements() {
        let origin = GeodeticPosition::new(45.0, 7.0, 100.0);

        // One meter of latitude is about 1/111132 degrees at 45 degrees
        let north = GeodeticPosition::new(45.0 + 1.0 / 111_132.0, 7.0, 100.0);
        let ned = geo_to_ned(&north, &origin);
        assert_abs_diff_eq!(ned.north(), 1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(ned.east(), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(ned.down(), 0.0, epsilon = 1e-2);

        // Going up means a negative down
        let up = GeodeticPosition::new(45.0, 7.0, 101.0);
        let ned = geo_to_ned(&up, &origin);
        assert_abs_diff_eq!(ned.north(), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(ned.east(), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(ned.down(), -1.0, epsilon = 1e-3);

        // One meter of longitude is about 1/78847 degrees at 45 degrees
        let east = GeodeticPosition::new(45.0, 7.0 + 1.0 / 78_847.0, 100.0);
        let ned = geo_to_ned(&east, &origin);
        assert_abs_diff_eq!(ned.north(), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(ned.east(), 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_race_round_trip() {
        let race_origin = Vector2::new(-120.0, 35.5);
        let ned = NedPosition::new(12.25, -7.5, 0.0);

        let mut theta = -std::f64::consts::PI;
        while theta <= std::f64::consts::PI {
            let race = RaceFrame::new(theta, race_origin);
            let back = race_to_ned(&ned_to_race(&ned, &race), &race);

            assert_abs_diff_eq!(back.north(), ned.north(), epsilon = 1e-9);
            assert_abs_diff_eq!(back.east(), ned.east(), epsilon = 1e-9);

            theta += 0.1;
        }
    }

    #[test]
    fn test_race_axes() {
        // Wind from the North, so the race X axis points South
        let race = RaceFrame::new(0.0, Vector2::zeros());
        let pos = ned_to_race(&NedPosition::new(10.0, 0.0, 0.0), &race);
        assert_abs_diff_eq!(pos.x(), -10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pos.y(), 0.0, epsilon = 1e-12);

        let pos = ned_to_race(&NedPosition::new(0.0, 4.0, 0.0), &race);
        assert_abs_diff_eq!(pos.x(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pos.y(), 4.0, epsilon = 1e-12);

        // The race origin maps to zero whatever the wind
        let race = RaceFrame::new(1.2, Vector2::new(50.0, -20.0));
        let pos = ned_to_race(&NedPosition::new(50.0, -20.0, 3.0), &race);
        assert_abs_diff_eq!(pos.x(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pos.y(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_deg_e7() {
        assert_abs_diff_eq!(deg_e7_to_rad(900_000_000), std::f64::consts::FRAC_PI_2);
        assert_abs_diff_eq!(deg_e7_to_rad(-450_000_000), -std::f64::consts::FRAC_PI_4);

        let pos = GeodeticPosition::from_e7(450_000_000, 70_000_000, 100_000);
        assert_abs_diff_eq!(pos.lat_deg, 45.0);
        assert_abs_diff_eq!(pos.lon_deg, 7.0);
        assert_abs_diff_eq!(pos.alt_m, 100.0);
        assert_abs_diff_eq!(pos.lat_rad(), deg_e7_to_rad(450_000_000));
    }
}
