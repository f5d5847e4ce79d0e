//! # Telemetry

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A one-line notice shown to the operator on the ground station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogNotice {
    pub text: String,
}

impl LogNotice {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}
