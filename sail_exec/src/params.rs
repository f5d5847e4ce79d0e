//! # Sailing Executable Parameters
//!
//! This module provides parameters for the sailing executable. Positions are given in the same
//! encoding as the GPS driver, degrees times 1e7 and millimetres.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nav::GeodeticPosition;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SailExecParams {
    /// Latitude of the NED origin
    pub origin_lat_deg_e7: i32,

    /// Longitude of the NED origin
    pub origin_lon_deg_e7: i32,

    /// Altitude of the NED origin
    pub origin_alt_mm: i32,

    /// Mean wind direction defining the race frame, from true North positive through East
    pub mean_wind_angle_rad: f64,

    /// Latitude of the top mark, the origin of the race frame
    pub top_mark_lat_deg_e7: i32,

    /// Longitude of the top mark
    pub top_mark_lon_deg_e7: i32,

    /// Altitude of the top mark
    pub top_mark_alt_mm: i32,

    /// Number of samples in the moving averages of the controller data
    pub moving_window_len: usize,

    /// Maximum time to wait for new data before running guidance anyway
    pub poll_timeout_ms: i64,

    /// Reference alpha held by the manual planner at startup
    pub default_alpha_star_rad: f32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised by the sailing executable.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("The moving average window must contain at least one sample")]
    EmptyMovingWindow,

    #[error("The poll timeout must be positive, got {0} ms")]
    InvalidPollTimeout(i64),

    #[error("The mean wind angle must be finite, got {0}")]
    InvalidMeanWindAngle(f64),

    #[error("The default alpha_star must be finite, got {0}")]
    InvalidAlphaStar(f32),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SailExecParams {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.moving_window_len == 0 {
            return Err(ExecError::EmptyMovingWindow);
        }

        if self.poll_timeout_ms <= 0 {
            return Err(ExecError::InvalidPollTimeout(self.poll_timeout_ms));
        }

        if !self.mean_wind_angle_rad.is_finite() {
            return Err(ExecError::InvalidMeanWindAngle(self.mean_wind_angle_rad));
        }

        if !self.default_alpha_star_rad.is_finite() {
            return Err(ExecError::InvalidAlphaStar(self.default_alpha_star_rad));
        }

        Ok(())
    }

    pub fn origin(&self) -> GeodeticPosition {
        GeodeticPosition::from_e7(
            self.origin_lat_deg_e7,
            self.origin_lon_deg_e7,
            self.origin_alt_mm,
        )
    }

    pub fn top_mark(&self) -> GeodeticPosition {
        GeodeticPosition::from_e7(
            self.top_mark_lat_deg_e7,
            self.top_mark_lon_deg_e7,
            self.top_mark_alt_mm,
        )
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const PARAMS: &str = "
        origin_lat_deg_e7 = 463_187_500
        origin_lon_deg_e7 = 65_625_000
        origin_alt_mm = 372_000
        mean_wind_angle_rad = 0.35
        top_mark_lat_deg_e7 = 463_227_500
        top_mark_lon_deg_e7 = 65_650_000
        top_mark_alt_mm = 372_000
        moving_window_len = 8
        poll_timeout_ms = 1000
        default_alpha_star_rad = 0.7
    ";

    #[test]
    fn test_load() {
        let params: SailExecParams = util::params::from_str(PARAMS).unwrap();
        params.validate().unwrap();

        assert_eq!(params.moving_window_len, 8);
        assert_abs_diff_eq!(params.origin().lat_deg, 46.31875, epsilon = 1e-9);
        assert_abs_diff_eq!(params.top_mark().lon_deg, 6.565, epsilon = 1e-9);
        assert_abs_diff_eq!(params.origin().alt_m, 372.0, epsilon = 1e-9);
    }

    #[test]
    fn test_shipped_params() {
        let params: SailExecParams =
            util::params::from_str(include_str!("../../params/sail_exec.toml")).unwrap();
        params.validate().unwrap();

        let _: crate::guidance::Params =
            util::params::from_str(include_str!("../../params/guidance.toml")).unwrap();

        let _: comms_if::net::NetParams =
            util::params::from_str(include_str!("../../params/net.toml")).unwrap();
    }

    #[test]
    fn test_validate() {
        let params: SailExecParams = util::params::from_str(PARAMS).unwrap();

        let p = SailExecParams {
            moving_window_len: 0,
            ..params.clone()
        };
        assert!(matches!(p.validate(), Err(ExecError::EmptyMovingWindow)));

        let p = SailExecParams {
            poll_timeout_ms: 0,
            ..params.clone()
        };
        assert!(matches!(p.validate(), Err(ExecError::InvalidPollTimeout(0))));

        let p = SailExecParams {
            mean_wind_angle_rad: std::f64::NAN,
            ..params
        };
        assert!(p.validate().is_err());
    }
}
