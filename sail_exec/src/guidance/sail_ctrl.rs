//! # Sail trim controller
//!
//! The apparent wind angle range [0, pi] is split into `n` equal sectors. The sail is fully
//! sheeted in when the apparent wind is in sector 0 (close hauled) and eased by an equal step for
//! every further sector.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::f32::consts::PI;

// Internal
use super::{GuidanceError, SAIL_SATURATION};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of sail positions used until told otherwise.
pub const DEFAULT_SAIL_POSITIONS: i32 = 4;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Quantised sail trim.
#[derive(Debug, Clone, Serialize)]
pub struct SailController {
    /// Width of each apparent wind sector
    angle_quantum_rad: f32,

    /// Sail demand step between two sectors
    command_quantum: f32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Where the sail demand comes from when not tacking.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum SailCommand {
    /// Trim the sail from the apparent wind
    Auto,

    /// Use the given demand as is
    Override(f32),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SailCommand {
    /// Interpret the sail servo parameter, negative meaning automatic trim.
    pub fn from_servo_param(sail_servo: f32) -> Self {
        if sail_servo < 0.0 {
            SailCommand::Auto
        } else {
            SailCommand::Override(sail_servo)
        }
    }
}

impl Default for SailController {
    fn default() -> Self {
        Self {
            angle_quantum_rad: PI / DEFAULT_SAIL_POSITIONS as f32,
            command_quantum: SAIL_SATURATION / DEFAULT_SAIL_POSITIONS as f32,
        }
    }
}

impl SailController {
    /// Compute the sail demand for the given mean apparent wind angle.
    pub fn compute(&self, app_wind_rad: f32) -> f32 {
        let sector = (app_wind_rad.abs() / self.angle_quantum_rad).floor();

        SAIL_SATURATION - sector * self.command_quantum
    }

    /// Set the number of positions the sail can be trimmed to.
    ///
    /// The number must be positive, otherwise the current positions are kept.
    pub fn set_sail_positions(&mut self, num: i32) -> Result<(), GuidanceError> {
        if num <= 0 {
            return Err(GuidanceError::InvalidSailPositions(num));
        }

        *self = Self {
            angle_quantum_rad: PI / num as f32,
            command_quantum: SAIL_SATURATION / num as f32,
        };

        Ok(())
    }

    pub fn angle_quantum_rad(&self) -> f32 {
        self.angle_quantum_rad
    }

    pub fn command_quantum(&self) -> f32 {
        self.command_quantum
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_four_positions() {
        let sail = SailController::default();

        assert_abs_diff_eq!(sail.compute(0.0), SAIL_SATURATION);
        assert_abs_diff_eq!(sail.compute(FRAC_PI_4 - 1e-3), SAIL_SATURATION);

        // Exactly on the boundary falls in sector 1
        assert_abs_diff_eq!(sail.compute(FRAC_PI_4), SAIL_SATURATION * 0.75, epsilon = 1e-6);
        assert_abs_diff_eq!(sail.compute(-FRAC_PI_4), SAIL_SATURATION * 0.75, epsilon = 1e-6);

        assert_abs_diff_eq!(sail.compute(2.0), SAIL_SATURATION * 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(sail.compute(-3.0), SAIL_SATURATION * 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_set_positions() {
        let mut sail = SailController::default();

        sail.set_sail_positions(2).unwrap();
        assert_abs_diff_eq!(sail.angle_quantum_rad(), PI / 2.0);
        assert_abs_diff_eq!(sail.command_quantum(), SAIL_SATURATION / 2.0);
        assert_abs_diff_eq!(sail.compute(1.0), SAIL_SATURATION);
        assert_abs_diff_eq!(sail.compute(2.0), SAIL_SATURATION / 2.0, epsilon = 1e-6);

        // Invalid counts are rejected and leave the controller as it was
        match sail.set_sail_positions(0) {
            Err(GuidanceError::InvalidSailPositions(0)) => (),
            other => panic!("Expected InvalidSailPositions, got {:?}", other),
        }
        assert!(sail.set_sail_positions(-2).is_err());
        assert_abs_diff_eq!(sail.angle_quantum_rad(), PI / 2.0);
    }

    #[test]
    fn test_servo_param() {
        assert_eq!(SailCommand::from_servo_param(-1.0), SailCommand::Auto);
        assert_eq!(SailCommand::from_servo_param(0.0), SailCommand::Override(0.0));
        assert_eq!(SailCommand::from_servo_param(0.2), SailCommand::Override(0.2));
    }
}
