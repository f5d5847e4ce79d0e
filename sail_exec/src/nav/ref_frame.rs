//! Reference frame state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use nalgebra::Vector2;
use serde::Serialize;
use std::cell::Cell;

// Internal
use super::geo::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The NED origin and race frame used to locate the boat.
///
/// Transforming before `set_reference_origin` has been called uses an all-zero origin, which
/// gives meaningless positions. This is reported once as a warning.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferenceFrame {
    origin: Option<NedOrigin>,

    race: RaceFrame,

    #[serde(skip)]
    missing_origin_reported: Cell<bool>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ReferenceFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor the NED frame at the given position.
    ///
    /// Any NED or race position computed before this call is relative to the old origin. The race
    /// origin is not recomputed, call `set_race_origin` again after re-anchoring.
    pub fn set_reference_origin(&mut self, origin: &GeodeticPosition) {
        self.origin = Some(NedOrigin::new(origin));

        debug!(
            "NED origin set to ({:.7} deg, {:.7} deg, {:.3} m)",
            origin.lat_deg, origin.lon_deg, origin.alt_m
        );
    }

    /// Anchor the NED frame at a position given in the wire encoding.
    pub fn set_reference_origin_e7(&mut self, lat_deg_e7: i32, lon_deg_e7: i32, alt_mm: i32) {
        self.set_reference_origin(&GeodeticPosition::from_e7(lat_deg_e7, lon_deg_e7, alt_mm));
    }

    pub fn origin(&self) -> Option<&NedOrigin> {
        self.origin.as_ref()
    }

    /// Set the mean wind angle, measured from true North and positive through East.
    pub fn set_mean_wind_angle(&mut self, mean_wind_angle_rad: f64) {
        self.race = RaceFrame::new(mean_wind_angle_rad, self.race.race_origin_m_ned);
    }

    /// Get the mean wind angle exactly as it was last set.
    pub fn get_mean_wind_angle(&self) -> f64 {
        self.race.mean_wind_angle_rad
    }

    /// Set the origin of the race frame, usually the top mark.
    ///
    /// The mark is located with the current NED origin, so this must be called after
    /// `set_reference_origin`.
    pub fn set_race_origin(&mut self, mark: &GeodeticPosition) {
        let ned = self.geo_to_ned(mark);

        self.race = RaceFrame::new(
            self.race.mean_wind_angle_rad,
            Vector2::new(ned.north(), ned.east()),
        );

        debug!(
            "Race origin set to ({:.2} m N, {:.2} m E)",
            ned.north(),
            ned.east()
        );
    }

    /// Set the origin of the race frame from a position in the wire encoding.
    pub fn set_race_origin_e7(&mut self, lat_deg_e7: i32, lon_deg_e7: i32, alt_mm: i32) {
        self.set_race_origin(&GeodeticPosition::from_e7(lat_deg_e7, lon_deg_e7, alt_mm));
    }

    pub fn race_frame(&self) -> &RaceFrame {
        &self.race
    }

    pub fn ecef_to_ned(&self, ecef: &EcefPosition) -> NedPosition {
        match self.origin {
            Some(ref o) => ecef_to_ned(ecef, o),
            None => {
                if !self.missing_origin_reported.replace(true) {
                    warn!("NED transform used before the reference origin was set");
                }
                ecef_to_ned(ecef, &NedOrigin::default())
            }
        }
    }

    pub fn geo_to_ned(&self, pos: &GeodeticPosition) -> NedPosition {
        self.ecef_to_ned(&geodetic_to_ecef(pos))
    }

    pub fn ned_to_race(&self, ned: &NedPosition) -> RacePosition {
        ned_to_race(ned, &self.race)
    }

    pub fn race_to_ned(&self, race_pos: &RacePosition) -> NedPosition {
        race_to_ned(race_pos, &self.race)
    }

    /// Locate a GPS fix in the race frame.
    pub fn geo_to_race(&self, pos: &GeodeticPosition) -> RacePosition {
        self.ned_to_race(&self.geo_to_ned(pos))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
