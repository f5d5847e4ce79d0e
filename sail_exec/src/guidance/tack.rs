//! # Tack maneuver state machine
//!
//! A tack is started when the path planner raises `should_tack`. From then on the helmsman law
//! steers the boat through the wind until the tack is complete, which requires both:
//!
//! 1. the roll to have changed sign, reaching at least the starting roll divided by
//!    `roll_stop_ratio`,
//! 2. the heading to have swept at least `yaw_stop_threshold_rad` in the direction of the turn.
//!
//! Each condition is checked on both the attitude estimator and the weather station compass, and
//! holds if either source satisfies it.
//!
//! Headings are signed in (-pi, pi], 0 on true North and positive through East. When the bow
//! passes through South the heading jumps by 2 pi, so it is extended past +/-pi before the swept
//! angle is computed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Serialize;
use std::f32::consts::PI;

// Internal
use super::{helmsman, GuidanceError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default roll stop ratio.
pub const DEFAULT_ROLL_STOP_RATIO: f32 = 2.0;

/// Default heading sweep needed to complete a tack, about 60 degrees.
pub const DEFAULT_YAW_STOP_THRESHOLD_RAD: f32 = 1.04;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An angle measured by the two independent attitude sources.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct DualSource {
    pub from_estimator: f32,
    pub from_compass: f32,
}

/// State of the tack maneuver.
#[derive(Debug, Clone, Serialize)]
pub struct TackState {
    is_tacking: bool,

    /// Direction of the current, or last, tack. Decided once when the tack starts.
    turn_direction: TurnDirection,

    roll_at_tack_start: DualSource,

    yaw_at_tack_start: DualSource,

    roll_stop_ratio: f32,

    yaw_stop_threshold_rad: f32,
}

/// Result of one cycle of the tack maneuver.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TackOutput {
    pub rudder: f32,
    pub sail: f32,

    /// The tack was started on this cycle
    pub started: bool,

    /// The tack was completed on this cycle
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Direction of a tack.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum TurnDirection {
    /// From port haul to starboard haul, turning left
    PortToStarboard,

    /// From starboard haul to port haul, turning right
    StarboardToPort,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DualSource {
    pub fn new(from_estimator: f32, from_compass: f32) -> Self {
        Self {
            from_estimator,
            from_compass,
        }
    }

    /// True if `cond(current, start)` holds for either source.
    fn any<F>(&self, start: &DualSource, cond: F) -> bool
    where
        F: Fn(f32, f32) -> bool,
    {
        cond(self.from_estimator, start.from_estimator)
            || cond(self.from_compass, start.from_compass)
    }
}

impl TurnDirection {
    /// Infer the direction of a tack from the reference alpha given with the tack request.
    ///
    /// The planner flips the sign of `alpha_star` when it requests a tack, so the haul the boat
    /// was sailing on is given by the sign of `-alpha_star`, negative meaning port haul.
    pub fn from_alpha_star(alpha_star_rad: f32) -> Self {
        if -alpha_star_rad < 0.0 {
            TurnDirection::PortToStarboard
        } else {
            TurnDirection::StarboardToPort
        }
    }
}

impl Default for TackState {
    fn default() -> Self {
        Self {
            is_tacking: false,
            turn_direction: TurnDirection::PortToStarboard,
            roll_at_tack_start: DualSource::default(),
            yaw_at_tack_start: DualSource::default(),
            roll_stop_ratio: DEFAULT_ROLL_STOP_RATIO,
            yaw_stop_threshold_rad: DEFAULT_YAW_STOP_THRESHOLD_RAD,
        }
    }
}

impl TackState {
    /// Set the completion thresholds, the heading sweep being given in degrees.
    ///
    /// The roll stop ratio must be positive, otherwise nothing is changed.
    pub fn set_stop_tack(
        &mut self,
        roll_stop_ratio: f32,
        yaw_stop_deg: f32,
    ) -> Result<(), GuidanceError> {
        if !(roll_stop_ratio > 0.0) {
            return Err(GuidanceError::InvalidRollStopRatio(roll_stop_ratio));
        }

        self.roll_stop_ratio = roll_stop_ratio;
        self.yaw_stop_threshold_rad = yaw_stop_deg.to_radians();

        Ok(())
    }

    /// Start a tack, recording the attitude and direction of the turn.
    pub fn start(&mut self, alpha_star_rad: f32, roll: DualSource, yaw: DualSource) {
        self.is_tacking = true;
        self.turn_direction = TurnDirection::from_alpha_star(alpha_star_rad);
        self.roll_at_tack_start = roll;
        self.yaw_at_tack_start = yaw;

        debug!(
            "Tack started {:?}, roll {:?}, yaw {:?}",
            self.turn_direction, roll, yaw
        );
    }

    /// Stop the tack without it being completed.
    pub fn abort(&mut self) {
        if self.is_tacking {
            info!("Tack aborted.");
        }

        self.is_tacking = false;
    }

    /// Check whether the tack is completed given the current roll and heading.
    pub fn is_tack_completed(&self, roll: &DualSource, yaw: &DualSource) -> bool {
        let ratio = self.roll_stop_ratio;
        let threshold = self.yaw_stop_threshold_rad;
        let direction = self.turn_direction;

        let roll_cond = roll.any(&self.roll_at_tack_start, |angle, start| {
            roll_stop_tack(angle, start, ratio)
        });
        let yaw_cond = yaw.any(&self.yaw_at_tack_start, |angle, start| {
            yaw_stop_tack(angle, start, threshold, direction)
        });

        roll_cond && yaw_cond
    }

    /// Run one cycle of the tack maneuver.
    ///
    /// Starts the tack if one isn't running, otherwise checks whether it is completed. The
    /// helmsman demands are computed from the heading based alpha in either case.
    pub fn tack_action(
        &mut self,
        alpha_star_rad: f32,
        roll: &DualSource,
        yaw: &DualSource,
        alpha_yaw_rad: f32,
    ) -> TackOutput {
        let mut output = TackOutput::default();

        if self.is_tacking {
            if self.is_tack_completed(roll, yaw) {
                self.is_tacking = false;
                output.completed = true;

                info!("Tack completed.");
            }
        } else {
            self.start(alpha_star_rad, *roll, *yaw);
            output.started = true;
        }

        let (rudder, sail) = match self.turn_direction {
            TurnDirection::PortToStarboard => helmsman::helmsman_tack_p2s(alpha_yaw_rad),
            TurnDirection::StarboardToPort => helmsman::helmsman_tack_s2p(alpha_yaw_rad),
        };
        output.rudder = rudder;
        output.sail = sail;

        output
    }

    pub fn is_tacking(&self) -> bool {
        self.is_tacking
    }

    pub fn turn_direction(&self) -> TurnDirection {
        self.turn_direction
    }

    pub fn roll_stop_ratio(&self) -> f32 {
        self.roll_stop_ratio
    }

    pub fn yaw_stop_threshold_rad(&self) -> f32 {
        self.yaw_stop_threshold_rad
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Roll condition for a single source. A source which started perfectly level never completes.
fn roll_stop_tack(angle: f32, start: f32, roll_stop_ratio: f32) -> bool {
    if start > 0.0 {
        angle <= -start / roll_stop_ratio
    } else if start < 0.0 {
        angle >= -start / roll_stop_ratio
    } else {
        false
    }
}

/// Heading condition for a single source.
fn yaw_stop_tack(angle: f32, start: f32, threshold_rad: f32, direction: TurnDirection) -> bool {
    match direction {
        TurnDirection::PortToStarboard => {
            // Turning left from the West side, the bow may pass through South onto the East side
            let angle = if start < 0.0 && angle >= 0.0 {
                angle - 2.0 * PI
            } else {
                angle
            };

            angle - start <= -threshold_rad
        }
        TurnDirection::StarboardToPort => {
            let angle = if start > 0.0 && angle <= 0.0 {
                angle + 2.0 * PI
            } else {
                angle
            };

            angle - start >= threshold_rad
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
