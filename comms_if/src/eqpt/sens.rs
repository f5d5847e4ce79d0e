//! # Sensor readings
//!
//! All angles are in radians. Heading-type angles are signed in (-pi, pi], 0 on true North and
//! positive through East.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Raw GPS reading, used for the course over ground.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct GpsRaw {
    /// Course over ground
    pub cog_rad: f32,

    /// Speed over ground in meters/second
    pub sog_ms: f32,

    /// GPS fix type, 3 or more means a 3D fix
    pub fix_type: u8,
}

/// Filtered global position of the boat.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct GlobalPosition {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
}

/// Wind measurement from the weather station.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct WindSailing {
    /// Apparent wind angle relative to the bow, positive on starboard
    pub angle_apparent: f32,

    /// Apparent wind speed in meters/second
    pub speed_apparent: f32,

    /// True wind direction, the direction the wind comes from
    pub angle_true: f32,

    /// True wind speed in meters/second
    pub speed_true: f32,
}

/// Attitude from the attitude estimator.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

/// Attitude from the weather station's own sensors.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct WxAttitude {
    /// Roll
    pub roll_r: f32,

    /// Pitch
    pub pitch_r: f32,

    /// Heading relative to true North
    pub heading_tn: f32,
}
