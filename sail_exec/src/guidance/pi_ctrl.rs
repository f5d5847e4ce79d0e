//! # PI rudder controller
//!
//! Drives alpha towards the reference alpha using one of two control laws:
//!
//! - Conditional integration: the error is always integrated, but both gains are attenuated as
//!   the error grows, so that a large error does not wind the integral up.
//! - Classic anti wind-up: the integral is corrected by `kaw` times the amount by which the last
//!   output exceeded the rudder saturation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use serde::Serialize;

// Internal
use super::RUDDER_SATURATION;
use util::maths::saturate;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gains of the PI controller.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PiGains {
    /// Proportional gain
    pub p: f32,

    /// Integral gain
    pub i: f32,

    /// Proportional gain attenuation
    pub cp: f32,

    /// Integral gain attenuation
    pub ci: f32,

    /// Anti wind-up gain
    pub kaw: f32,
}

/// A PI controller producing rudder demands.
#[derive(Debug, Clone, Serialize)]
pub struct PiRudderController {
    gains: PiGains,

    mode: PiMode,

    /// Output of the last call to `compute`, before saturation
    last_output: f32,

    integral_accumulator: f32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The control law used by the PI controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum PiMode {
    Conditional,
    ClassicAntiWindup,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PiGains {
    fn default() -> Self {
        Self {
            p: 0.0,
            i: 0.0,
            cp: 1.0,
            ci: 1.0,
            kaw: 0.5,
        }
    }
}

impl PiMode {
    /// Select the mode from its integer flag, positive meaning conditional integration.
    pub fn from_flag(use_conditional: i32) -> Self {
        if use_conditional > 0 {
            PiMode::Conditional
        } else {
            PiMode::ClassicAntiWindup
        }
    }

    /// Notice sent to the ground when switching to this mode.
    pub fn notice(&self) -> &'static str {
        match self {
            PiMode::Conditional => "Switched to PI with conditional integration.",
            PiMode::ClassicAntiWindup => "Switched to normal PI with anti wind-up gain.",
        }
    }
}

impl Default for PiRudderController {
    fn default() -> Self {
        Self::new(PiGains::default(), PiMode::Conditional)
    }
}

impl PiRudderController {
    pub fn new(gains: PiGains, mode: PiMode) -> Self {
        Self {
            gains,
            mode,
            last_output: 0.0,
            integral_accumulator: 0.0,
        }
    }

    /// Compute the rudder demand for the given reference and measured alpha.
    ///
    /// The output is not saturated.
    pub fn compute(&mut self, reference_rad: f32, measured_rad: f32) -> f32 {
        let error = reference_rad - measured_rad;
        let g = &self.gains;

        let output = match self.mode {
            PiMode::Conditional => {
                self.integral_accumulator += error;

                let i_gain = g.i / (1.0 + g.ci * error * error);
                let p_gain = g.p / (1.0 + g.cp * error.abs());

                p_gain * error + i_gain * self.integral_accumulator
            }
            PiMode::ClassicAntiWindup => {
                let input_kaw = saturate(self.last_output, RUDDER_SATURATION) - self.last_output;

                self.integral_accumulator += error + g.kaw * input_kaw;

                g.p * error + g.i * self.integral_accumulator
            }
        };

        self.last_output = output;

        output
    }

    /// Replace the gains and control law.
    ///
    /// Changing the control law resets the controller's memory. Returns the new mode if it
    /// changed.
    pub fn set_pi_rudder_data(&mut self, gains: PiGains, mode: PiMode) -> Option<PiMode> {
        self.gains = gains;

        if mode == self.mode {
            return None;
        }

        self.mode = mode;
        self.last_output = 0.0;
        self.integral_accumulator = 0.0;

        info!("{}", mode.notice());

        Some(mode)
    }

    pub fn gains(&self) -> &PiGains {
        &self.gains
    }

    pub fn mode(&self) -> PiMode {
        self.mode
    }

    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    pub fn integral_accumulator(&self) -> f32 {
        self.integral_accumulator
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn gains(p: f32, i: f32, cp: f32, ci: f32, kaw: f32) -> PiGains {
        PiGains { p, i, cp, ci, kaw }
    }

    #[test]
    fn test_proportional_only() {
        // Classic mode without integral gain is a pure proportional controller
        let mut pi =
            PiRudderController::new(gains(0.7, 0.0, 1.0, 1.0, 0.5), PiMode::ClassicAntiWindup);

        for (r, m) in [(0.5, 0.1), (-1.0, 0.3), (0.0, 2.5), (3.0, -3.0)].iter() {
            let out = pi.compute(*r, *m);
            assert_eq!(out, 0.7 * (r - m));
        }
    }

    #[test]
    fn test_conditional_gains() {
        // With ci = 0 the integral gain is not attenuated
        let mut pi = PiRudderController::new(gains(0.0, 0.2, 0.0, 0.0, 0.0), PiMode::Conditional);

        assert_relative_eq!(pi.compute(0.5, 0.0), 0.2 * 0.5);
        assert_relative_eq!(pi.compute(0.5, 0.25), 0.2 * 0.75);
        assert_relative_eq!(pi.integral_accumulator(), 0.75);

        // Both gains attenuated
        let mut pi = PiRudderController::new(gains(1.0, 0.5, 2.0, 4.0, 0.0), PiMode::Conditional);
        let e = 0.5f32;
        let expected = (1.0 / (1.0 + 2.0 * e)) * e + (0.5 / (1.0 + 4.0 * e * e)) * e;
        assert_relative_eq!(pi.compute(e, 0.0), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_classic_anti_windup() {
        let mut pi =
            PiRudderController::new(gains(2.0, 1.0, 0.0, 0.0, 0.5), PiMode::ClassicAntiWindup);

        // First cycle, no saturation yet
        let out = pi.compute(1.0, 0.0);
        assert_relative_eq!(out, 2.0 + 1.0);

        // Last output of 3.0 saturated to 0.9 feeds back into the integral
        let out = pi.compute(1.0, 0.0);
        let integral = 1.0 + 1.0 + 0.5 * (RUDDER_SATURATION - 3.0);
        assert_relative_eq!(pi.integral_accumulator(), integral, epsilon = 1e-6);
        assert_relative_eq!(out, 2.0 + integral, epsilon = 1e-6);
        assert_relative_eq!(pi.last_output(), out);
    }

    #[test]
    fn test_mode_switch_resets() {
        let mut pi = PiRudderController::default();
        assert_eq!(pi.mode(), PiMode::Conditional);

        let g = gains(0.5, 0.1, 1.0, 1.0, 0.5);
        assert_eq!(pi.set_pi_rudder_data(g, PiMode::Conditional), None);

        pi.compute(0.3, 0.0);
        pi.compute(0.3, 0.0);
        assert!(pi.integral_accumulator() != 0.0);

        // Same mode keeps the memory
        let g = gains(0.6, 0.1, 1.0, 1.0, 0.5);
        assert_eq!(pi.set_pi_rudder_data(g, PiMode::Conditional), None);
        assert!(pi.integral_accumulator() != 0.0);
        assert_eq!(pi.gains().p, 0.6);

        // Switching clears it
        assert_eq!(
            pi.set_pi_rudder_data(g, PiMode::ClassicAntiWindup),
            Some(PiMode::ClassicAntiWindup)
        );
        assert_eq!(pi.integral_accumulator(), 0.0);
        assert_eq!(pi.last_output(), 0.0);
    }

    #[test]
    fn test_mode_flag() {
        assert_eq!(PiMode::from_flag(1), PiMode::Conditional);
        assert_eq!(PiMode::from_flag(0), PiMode::ClassicAntiWindup);
        assert_eq!(PiMode::from_flag(-3), PiMode::ClassicAntiWindup);
        assert_eq!(
            PiMode::Conditional.notice(),
            "Switched to PI with conditional integration."
        );
    }
}
