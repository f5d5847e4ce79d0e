//! Guidance parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use super::{PiGains, PiMode, SailCommand};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for guidance, tunable from the ground while running.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// PI proportional gain
    pub pi_p: f32,

    /// PI integral gain
    pub pi_i: f32,

    /// Attenuation of the proportional gain with the error, conditional mode only
    pub pi_cp: f32,

    /// Attenuation of the integral gain with the error, conditional mode only
    pub pi_ci: f32,

    /// Anti wind-up gain, classic mode only
    pub pi_kaw: f32,

    /// Positive to use conditional integration, zero or negative for the classic anti wind-up
    /// law
    pub pi_use_conditional: i32,

    /// The tack is complete once the roll has changed sign and reached the starting roll
    /// divided by this ratio
    pub tack_roll_stop_ratio: f32,

    /// The tack is complete once the heading has swept at least this angle, in degrees
    pub tack_yaw_stop_deg: f32,

    /// Number of positions the sail can be trimmed to
    pub sail_positions: i32,

    /// Manual sail demand, a negative value selects the automatic sail trim
    pub sail_servo: f32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn pi_gains(&self) -> PiGains {
        PiGains {
            p: self.pi_p,
            i: self.pi_i,
            cp: self.pi_cp,
            ci: self.pi_ci,
            kaw: self.pi_kaw,
        }
    }

    pub fn pi_mode(&self) -> PiMode {
        PiMode::from_flag(self.pi_use_conditional)
    }

    pub fn sail_command(&self) -> SailCommand {
        SailCommand::from_servo_param(self.sail_servo)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            pi_p: 0.0,
            pi_i: 0.0,
            pi_cp: 1.0,
            pi_ci: 1.0,
            pi_kaw: 0.5,
            pi_use_conditional: 1,
            tack_roll_stop_ratio: 2.0,
            tack_yaw_stop_deg: 1.04f32.to_degrees(),
            sail_positions: 4,
            sail_servo: -1.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_params() {
        let params: Params = util::params::from_str(
            "pi_p = 0.6\n\
             pi_i = 0.01\n\
             pi_cp = 1.0\n\
             pi_ci = 1.0\n\
             pi_kaw = 0.5\n\
             pi_use_conditional = 0\n\
             tack_roll_stop_ratio = 2.0\n\
             tack_yaw_stop_deg = 60.0\n\
             sail_positions = 4\n\
             sail_servo = -1.0\n",
        )
        .unwrap();

        assert_eq!(params.pi_mode(), PiMode::ClassicAntiWindup);
        assert_eq!(params.sail_command(), SailCommand::Auto);
        assert_eq!(params.pi_gains().p, 0.6);

        let params = Params {
            sail_servo: 0.3,
            pi_use_conditional: 1,
            ..params
        };
        assert_eq!(params.pi_mode(), PiMode::Conditional);
        assert_eq!(params.sail_command(), SailCommand::Override(0.3));
    }
}
