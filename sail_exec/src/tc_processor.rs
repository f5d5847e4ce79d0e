//! # Telecommand processor
//!
//! Applies telecommands from the ground link.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info, warn};

use comms_if::tc::Tc;
use sail_lib::{nav::ReferenceFrame, planner::ManualPlanner};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// What the main loop shall do after a telecommand.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TcOutcome {
    Continue,

    /// The race frame changed and shall be saved in the session again.
    FrameUpdated,

    Shutdown,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Execute a telecommand.
pub fn exec(planner: &mut ManualPlanner, ref_frame: &mut ReferenceFrame, tc: &Tc) -> TcOutcome {
    debug!("Executing TC: {:?}", tc);

    match tc {
        Tc::RequestTack => planner.request_tack(),
        Tc::SetAlphaStar { alpha_star_rad } => planner.set_alpha_star(*alpha_star_rad),
        Tc::SetMeanWind { angle_rad } => {
            if !angle_rad.is_finite() {
                warn!("Ignoring non-finite mean wind angle {}", angle_rad);
                return TcOutcome::Continue;
            }

            ref_frame.set_mean_wind_angle(*angle_rad);
            info!("Mean wind angle set to {:.4} rad", angle_rad);
            return TcOutcome::FrameUpdated;
        }
        Tc::SetTopMark {
            lat_deg_e7,
            lon_deg_e7,
            alt_mm,
        } => {
            ref_frame.set_race_origin_e7(*lat_deg_e7, *lon_deg_e7, *alt_mm);
            info!("Top mark moved");
            return TcOutcome::FrameUpdated;
        }
        Tc::Shutdown => {
            info!("Shutdown TC received");
            return TcOutcome::Shutdown;
        }
    }

    TcOutcome::Continue
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use sail_lib::{nav::GeodeticPosition, planner::PathPlanner};

    /// Frame anchored at 45 N 7 E, with the top mark 100 m due North and a northerly wind.
    fn frame() -> ReferenceFrame {
        let mut frame = ReferenceFrame::new();
        frame.set_reference_origin(&GeodeticPosition::new(45.0, 7.0, 100.0));
        frame.set_mean_wind_angle(0.0);
        frame.set_race_origin(&GeodeticPosition::new(45.0 + 100.0 / 111_132.0, 7.0, 100.0));
        frame
    }

    #[test]
    fn test_exec() {
        let mut planner = ManualPlanner::new(-0.5);
        let mut frame = frame();

        assert_eq!(
            exec(&mut planner, &mut frame, &Tc::RequestTack),
            TcOutcome::Continue
        );
        assert!(planner.reference_action().should_tack);
        assert_eq!(planner.reference_action().alpha_star_rad, 0.5);

        let tc = Tc::from_json(r#"{"type": "SetAlphaStar", "payload": {"alpha_star_rad": 0.9}}"#)
            .unwrap();
        assert_eq!(exec(&mut planner, &mut frame, &tc), TcOutcome::Continue);
        assert!(!planner.reference_action().should_tack);
        assert_eq!(planner.reference_action().alpha_star_rad, 0.9);

        assert_eq!(
            exec(&mut planner, &mut frame, &Tc::Shutdown),
            TcOutcome::Shutdown
        );
    }

    #[test]
    fn test_mean_wind_update() {
        let mut planner = ManualPlanner::new(0.7);
        let mut frame = frame();
        let fix = GeodeticPosition::new(45.0, 7.0, 100.0);

        // The fix is 100 m downwind of the mark
        let before = frame.geo_to_race(&fix);
        assert_abs_diff_eq!(before.x(), 100.0, epsilon = 0.1);
        assert_abs_diff_eq!(before.y(), 0.0, epsilon = 1e-3);

        let tc = Tc::SetMeanWind {
            angle_rad: std::f64::consts::FRAC_PI_2,
        };
        assert_eq!(exec(&mut planner, &mut frame, &tc), TcOutcome::FrameUpdated);
        assert_abs_diff_eq!(frame.get_mean_wind_angle(), std::f64::consts::FRAC_PI_2);

        // With an easterly wind the mark lies on the race Y axis of the fix
        let after = frame.geo_to_race(&fix);
        assert_abs_diff_eq!(after.x(), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(after.y(), 100.0, epsilon = 0.1);

        // Non-finite angles leave the frame alone
        let tc = Tc::SetMeanWind {
            angle_rad: std::f64::NAN,
        };
        assert_eq!(exec(&mut planner, &mut frame, &tc), TcOutcome::Continue);
        assert_abs_diff_eq!(frame.get_mean_wind_angle(), std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_top_mark_update() {
        let mut planner = ManualPlanner::new(0.7);
        let mut frame = frame();

        // Move the mark onto the NED origin
        let tc = Tc::SetTopMark {
            lat_deg_e7: 450_000_000,
            lon_deg_e7: 70_000_000,
            alt_mm: 100_000,
        };
        assert_eq!(exec(&mut planner, &mut frame, &tc), TcOutcome::FrameUpdated);

        let pos = frame.geo_to_race(&GeodeticPosition::new(45.0, 7.0, 100.0));
        assert_abs_diff_eq!(pos.x(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(pos.y(), 0.0, epsilon = 1e-6);
    }
}
