//! # Path planner
//!
//! The path planner decides which alpha the boat should sail at and when it should tack. Guidance
//! only ever sees the resulting `ReferenceAction`.
//!
//! When requesting a tack a planner must flip the sign of `alpha_star` to the alpha wanted on the
//! new haul, and raise `should_tack`. Guidance infers the direction of the tack from that sign.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};

// Internal
use crate::nav::RacePosition;
use comms_if::guidance::ReferenceAction;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of reference actions for guidance.
pub trait PathPlanner {
    /// Give the planner the latest position of the boat in the race frame.
    fn update_position(&mut self, pos: &RacePosition);

    /// The reference action guidance should follow on this cycle.
    fn reference_action(&self) -> ReferenceAction;

    /// Called by the executable once guidance reports the tack as completed.
    fn notify_tack_completed(&mut self);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A planner holding a constant alpha, tacking only when told to by the ground.
#[derive(Debug, Clone)]
pub struct ManualPlanner {
    reference: ReferenceAction,

    last_position: Option<RacePosition>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ManualPlanner {
    pub fn new(alpha_star_rad: f32) -> Self {
        Self {
            reference: ReferenceAction {
                alpha_star_rad,
                should_tack: false,
            },
            last_position: None,
        }
    }

    /// Request a tack onto the opposite haul.
    ///
    /// Ignored if a tack is already in progress.
    pub fn request_tack(&mut self) {
        if self.reference.should_tack {
            debug!("Tack already requested, ignoring");
            return;
        }

        self.reference.alpha_star_rad = -self.reference.alpha_star_rad;
        self.reference.should_tack = true;

        info!(
            "Tack requested, new alpha_star {:.3} rad",
            self.reference.alpha_star_rad
        );
    }

    /// Change the reference alpha.
    ///
    /// Setting it while tacking cancels the tack.
    pub fn set_alpha_star(&mut self, alpha_star_rad: f32) {
        self.reference = ReferenceAction {
            alpha_star_rad,
            should_tack: false,
        };

        info!("alpha_star set to {:.3} rad", alpha_star_rad);
    }

    pub fn last_position(&self) -> Option<&RacePosition> {
        self.last_position.as_ref()
    }
}

impl PathPlanner for ManualPlanner {
    fn update_position(&mut self, pos: &RacePosition) {
        self.last_position = Some(*pos);
    }

    fn reference_action(&self) -> ReferenceAction {
        self.reference
    }

    fn notify_tack_completed(&mut self) {
        self.reference.should_tack = false;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::guidance::TurnDirection;

    #[test]
    fn test_request_tack() {
        // Sailing on port haul
        let mut planner = ManualPlanner::new(-0.8);
        assert!(!planner.reference_action().should_tack);

        planner.request_tack();
        let r = planner.reference_action();
        assert!(r.should_tack);
        assert_eq!(r.alpha_star_rad, 0.8);
        assert_eq!(
            TurnDirection::from_alpha_star(r.alpha_star_rad),
            TurnDirection::PortToStarboard
        );

        // A second request while tacking changes nothing
        planner.request_tack();
        assert_eq!(planner.reference_action(), r);

        planner.notify_tack_completed();
        let r = planner.reference_action();
        assert!(!r.should_tack);
        assert_eq!(r.alpha_star_rad, 0.8);

        // And back
        planner.request_tack();
        assert_eq!(planner.reference_action().alpha_star_rad, -0.8);
    }

    #[test]
    fn test_set_alpha_star() {
        let mut planner = ManualPlanner::new(0.5);
        planner.request_tack();

        planner.set_alpha_star(0.6);
        assert_eq!(
            planner.reference_action(),
            ReferenceAction {
                alpha_star_rad: 0.6,
                should_tack: false
            }
        );
    }

    #[test]
    fn test_position() {
        let mut planner = ManualPlanner::new(0.5);
        assert!(planner.last_position().is_none());

        planner.update_position(&RacePosition::new(10.0, -4.0));
        let pos = planner.last_position().unwrap();
        assert_eq!(pos.x(), 10.0);
        assert_eq!(pos.y(), -4.0);
    }
}
