//! # Guidance module
//!
//! Guidance turns the reference action given by the path planner into rudder and sail demands.
//!
//! While the boat is tracking, a PI controller drives alpha, the angle between the true wind
//! direction and the heading, towards the reference `alpha_star`, and the sail is trimmed from
//! the apparent wind angle. When the planner requests a tack the rudder and sail follow a rule
//! based law, modelled on what a helmsman does, until both the roll and the heading show that
//! the boat has come about.
//!
//! All demands are saturated before being sent to the servos.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod helmsman;
pub mod params;
pub mod pi_ctrl;
pub mod sail_ctrl;
pub mod state;
pub mod tack;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::Params;
pub use pi_ctrl::{PiGains, PiMode, PiRudderController};
pub use sail_ctrl::{SailCommand, SailController};
pub use state::*;
pub use tack::{DualSource, TackState, TurnDirection};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

// Normalised servo demands. These are uncalibrated placeholders and must be replaced with the
// values measured on the boat's servos before sailing.

/// Maximum rudder demand magnitude.
pub const RUDDER_SATURATION: f32 = 0.9;

/// Rudder demand which puts the rudder 45 degrees to the left.
pub const RUDDER_45_LEFT: f32 = 0.8;

/// Maximum sail demand, sail fully sheeted in.
pub const SAIL_SATURATION: f32 = 0.56;

/// Sail demand used while passing through the wind during a tack.
pub const SAIL_20: f32 = 0.42;

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_constants_consistent() {
        assert!(RUDDER_45_LEFT > 0.0 && RUDDER_45_LEFT < RUDDER_SATURATION);
        assert!(SAIL_20 > 0.0 && SAIL_20 < SAIL_SATURATION);
        assert!(RUDDER_SATURATION <= 1.0 && SAIL_SATURATION <= 1.0);
    }
}
