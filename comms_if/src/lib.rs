//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the sailing software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Sensor readings and actuator demands exchanged with equipment
pub mod eqpt;

/// Guidance inputs and outputs shared with the path planner and the ground
pub mod guidance;

/// Network module
pub mod net;

pub mod tc;

/// Telemetry sent to the ground link
pub mod tm;
