//! # Telecommand module
//!
//! This module provides telecommand functionality to the communications
//! interface.
//!
//! Telecommands are JSON objects with a `type` and, where needed, a
//! `payload`, for example:
//!
//! ```json
//! {"type": "SetAlphaStar", "payload": {"alpha_star_rad": 0.7}}
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an instruction sent to the boat by the ground station.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum Tc {
    /// Ask the path planner to tack.
    RequestTack,

    /// Set the angle the boat shall keep with respect to the true wind.
    SetAlphaStar { alpha_star_rad: f32 },

    /// Set the mean wind direction defining the race frame, from true North positive through
    /// East.
    SetMeanWind { angle_rad: f64 },

    /// Move the race frame origin to a new top mark, given in the GPS encoding.
    SetTopMark {
        lat_deg_e7: i32,
        lon_deg_e7: i32,
        alt_mm: i32,
    },

    /// Stop the executable, making the actuators safe.
    Shutdown,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC is not valid: {0}")]
    InvalidJson(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {
    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)
    }

    /// Serialise this TC into a JSON packet
    pub fn to_json(&self) -> Result<String, TcParseError> {
        serde_json::to_string(self).map_err(TcParseError::InvalidJson)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            Tc::from_json(r#"{"type": "RequestTack"}"#).unwrap(),
            Tc::RequestTack
        );
        assert_eq!(
            Tc::from_json(r#"{"type": "SetAlphaStar", "payload": {"alpha_star_rad": 0.5}}"#)
                .unwrap(),
            Tc::SetAlphaStar {
                alpha_star_rad: 0.5
            }
        );
        assert_eq!(
            Tc::from_json(
                r#"{"type": "SetTopMark", "payload": {"lat_deg_e7": 463227500, "lon_deg_e7": 65650000, "alt_mm": 372000}}"#
            )
            .unwrap(),
            Tc::SetTopMark {
                lat_deg_e7: 463_227_500,
                lon_deg_e7: 65_650_000,
                alt_mm: 372_000
            }
        );
        assert_eq!(
            Tc::from_json(&Tc::Shutdown.to_json().unwrap()).unwrap(),
            Tc::Shutdown
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Tc::from_json(r#"{"type": "Jibe"}"#).is_err());
        assert!(Tc::from_json(r#"{"type": "SetAlphaStar"}"#).is_err());
        assert!(Tc::from_json("not json").is_err());
    }
}
