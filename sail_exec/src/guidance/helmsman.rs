//! # Helmsman tack law
//!
//! Rule based rudder and sail demands used while tacking, reproducing how a helmsman steers and
//! trims through the wind. Each demand is a piecewise linear function of alpha, stored as a
//! table of `(upper_bound, slope, intercept)` breakpoints.
//!
//! The port to starboard law is tabulated, the starboard to port law follows by symmetry.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{RUDDER_45_LEFT, SAIL_20};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One linear piece of a breakpoint table, valid for alpha up to and including `upper_bound`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Breakpoint {
    pub upper_bound: f32,
    pub slope: f32,
    pub intercept: f32,
}

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

macro_rules! bp {
    ($upper_bound:expr, $slope:expr, $intercept:expr $(,)?) => {
        Breakpoint {
            upper_bound: $upper_bound,
            slope: $slope,
            intercept: $intercept,
        }
    };
}

/// Rudder demand while tacking from port haul to starboard haul.
pub const RUDDER_P2S: [Breakpoint; 6] = [
    bp!(-0.523598, 0.0, RUDDER_45_LEFT),
    bp!(0.0, -RUDDER_45_LEFT / 0.523598, 0.0),
    bp!(0.31416, RUDDER_45_LEFT / 0.31416, 0.0),
    bp!(0.38397, 0.0, RUDDER_45_LEFT),
    bp!(
        0.69813,
        -RUDDER_45_LEFT / 0.31416,
        (RUDDER_45_LEFT / 0.31416) * 0.69813,
    ),
    bp!(std::f32::INFINITY, 0.0, 0.0),
];

/// Sail demand while tacking from port haul to starboard haul.
pub const SAIL_P2S: [Breakpoint; 6] = [
    bp!(-0.523598, -SAIL_20 / 1.047197, -SAIL_20 * 0.5),
    bp!(0.0872664, 0.0, 0.0),
    bp!(0.270526, SAIL_20 / 0.183259, -SAIL_20 * 0.476190),
    bp!(0.3403392, 0.0, SAIL_20),
    bp!(0.523598, -SAIL_20 / 0.183259, SAIL_20 * 2.857142857),
    bp!(std::f32::INFINITY, 0.0, 0.0),
];

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Evaluate a breakpoint table at `alpha`.
///
/// The first piece whose upper bound is not below `alpha` is used. Returns zero if no piece
/// matches, which only happens for a NaN alpha.
pub fn evaluate(table: &[Breakpoint], alpha: f32) -> f32 {
    table
        .iter()
        .find(|b| alpha <= b.upper_bound)
        .map(|b| b.slope * alpha + b.intercept)
        .unwrap_or(0.0)
}

/// Rudder and sail demands for a tack from port haul to starboard haul.
pub fn helmsman_tack_p2s(alpha: f32) -> (f32, f32) {
    (evaluate(&RUDDER_P2S, alpha), evaluate(&SAIL_P2S, alpha))
}

/// Rudder and sail demands for a tack from starboard haul to port haul.
pub fn helmsman_tack_s2p(alpha: f32) -> (f32, f32) {
    let (rudder, sail) = helmsman_tack_p2s(-alpha);

    (-rudder, sail)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rudder_pieces() {
        let r = |a| helmsman_tack_p2s(a).0;

        assert_abs_diff_eq!(r(-1.5), RUDDER_45_LEFT);
        assert_abs_diff_eq!(r(-0.523598), RUDDER_45_LEFT);
        assert_abs_diff_eq!(r(-0.2617990), RUDDER_45_LEFT * 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(r(0.15708), RUDDER_45_LEFT * 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(r(0.35), RUDDER_45_LEFT);
        assert_abs_diff_eq!(r(0.69813), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r(0.9), 0.0);
        assert_abs_diff_eq!(r(std::f32::NAN), 0.0);
    }

    #[test]
    fn test_rudder_near_zero() {
        let (rudder, sail) = helmsman_tack_p2s(0.0);
        assert_eq!(rudder, 0.0);
        assert_eq!(sail, 0.0);

        // Either side of zero the rudder is on one of the ramps towards 45 degrees left
        for a in [-0.1f32, -1e-3, 1e-3, 0.1].iter() {
            let (rudder, sail) = helmsman_tack_p2s(*a);
            assert!(rudder > 0.0 && rudder < RUDDER_45_LEFT);
            assert_eq!(sail, 0.0);
        }
    }

    #[test]
    fn test_sail_pieces() {
        let s = |a| helmsman_tack_p2s(a).1;

        // Eased out while still on port haul
        assert_abs_diff_eq!(s(-0.523598), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(s(-1.570796), SAIL_20, epsilon = 1e-5);

        assert_abs_diff_eq!(s(0.0872664), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(s(0.270526), SAIL_20, epsilon = 1e-3);
        assert_abs_diff_eq!(s(0.3), SAIL_20);
        assert_abs_diff_eq!(s(0.3403392), SAIL_20);
        assert_abs_diff_eq!(s(0.523598), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(s(0.6), 0.0);
    }

    #[test]
    fn test_s2p_symmetry() {
        let mut a = -1.5f32;
        while a <= 1.5 {
            let (r_p2s, s_p2s) = helmsman_tack_p2s(-a);
            let (r_s2p, s_s2p) = helmsman_tack_s2p(a);

            assert_eq!(r_s2p, -r_p2s);
            assert_eq!(s_s2p, s_p2s);

            a += 0.01;
        }
    }
}
