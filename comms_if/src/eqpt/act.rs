//! # Actuator demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of channels in the actuator control array.
pub const NUM_ACTUATOR_CONTROLS: usize = 8;

/// Index of the rudder channel.
pub const RUDDER_INDEX: usize = 0;

/// Index of the sail channel.
pub const SAIL_INDEX: usize = 3;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands sent to the servo driver.
///
/// Unused channels are always zero.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct ActuatorControls {
    pub control: [f32; NUM_ACTUATOR_CONTROLS],
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ActuatorControls {
    /// Build the control array from a rudder and sail demand.
    pub fn new(rudder: f32, sail: f32) -> Self {
        let mut control = [0f32; NUM_ACTUATOR_CONTROLS];
        control[RUDDER_INDEX] = rudder;
        control[SAIL_INDEX] = sail;

        Self { control }
    }

    /// The all-zero demand, published when the executable shuts down.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn rudder(&self) -> f32 {
        self.control[RUDDER_INDEX]
    }

    pub fn sail(&self) -> f32 {
        self.control[SAIL_INDEX]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_channel_layout() {
        let act = ActuatorControls::new(-0.4, 0.3);

        assert_eq!(act.rudder(), -0.4);
        assert_eq!(act.sail(), 0.3);
        assert_eq!(act.control, [-0.4, 0.0, 0.0, 0.3, 0.0, 0.0, 0.0, 0.0]);
        assert!(ActuatorControls::zero().control.iter().all(|c| *c == 0.0));
    }
}
