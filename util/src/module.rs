//! Module interfaces
//!
//! Control modules run by the sailing executable's main loop implement `State`. The loop owns
//! every module, so there is no shared state between them: what a module needs each cycle is
//! handed to it in its `InputData`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// A control module driven once per cycle.
pub trait State {
    /// Parameters applied on initialisation
    type InitData;
    type InitError;

    /// Signals read on each cycle
    type InputData;
    /// Demands produced on each cycle
    type OutputData;
    /// Events of the cycle the executable may need to act on
    type StatusReport;
    type ProcError;

    /// Apply the initial parameters and open any archive in the session.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one control cycle.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
