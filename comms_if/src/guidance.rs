//! # Guidance interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The action guidance shall follow, as decided by the path planner.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct ReferenceAction {
    /// Desired angle between the boat heading and the true wind direction.
    ///
    /// When a tack is requested the planner has already flipped the sign of this angle, so its
    /// opposite gives the haul the boat was sailing on.
    pub alpha_star_rad: f32,

    /// Whether the boat should tack. Cleared by guidance once the tack is completed.
    pub should_tack: bool,
}

/// Debug record produced by guidance on every cycle, for post-processing.
///
/// This record is flat so that it can be archived as a CSV row.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct GuidanceDebug {
    /// Time since the start of the session
    pub time_s: f64,

    /// Smoothed alpha used by the controllers
    pub alpha: f32,

    pub rudder_action: f32,

    pub sail_action: f32,

    /// Mean true wind direction
    pub twd_mean: f32,

    /// Mean apparent wind angle
    pub app_mean: f32,

    pub tacking: bool,
}
