//! # Sailing library.
//!
//! This library allows other crates in the workspace to access items defined inside the sailing
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Controller data - moving averages of the angles used by guidance
pub mod ctrl_data;

/// Guidance module - computes the rudder and sail demands
pub mod guidance;

/// Navigation module - locates the boat in the race frame
pub mod nav;

/// Executable parameters
pub mod params;

/// Path planner - decides the reference alpha and when to tack
pub mod planner;
