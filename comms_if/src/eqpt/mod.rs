//! # Equipment Interface
//!
//! This module defines the interface structures which are exchanged with equipment, i.e. sensor
//! readings received from the sensor tasks and actuator demands sent to the servo driver.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod act;
pub mod sens;
