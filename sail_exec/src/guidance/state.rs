//! Guidance module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{trace, warn};
use serde::Serialize;

// Internal
use super::*;
use crate::ctrl_data::ControllerData;
use comms_if::{
    eqpt::act::ActuatorControls,
    guidance::{GuidanceDebug, ReferenceAction},
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    maths::{clamp, saturate},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Path of the debug archive, relative to the session archive root.
const DEBUG_ARCHIVE_PATH: &str = "guidance/debug.csv";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The guidance module.
pub struct Guidance {
    params: Params,

    pi: PiRudderController,

    sail: SailController,

    sail_command: SailCommand,

    tack: TackState,

    /// Control law switch made by the last parameter update, reported on the next cycle
    pending_mode_switch: Option<PiMode>,

    debug: GuidanceDebug,

    arch_debug: Archiver,
}

/// Data read by guidance on each cycle.
#[derive(Debug, Copy, Clone, Default)]
pub struct InputData {
    /// The reference action from the path planner
    pub reference: ReferenceAction,

    /// Mean alpha from the course over ground
    pub alpha: f32,

    /// Mean alpha from the heading
    pub alpha_yaw: f32,

    /// Mean apparent wind angle
    pub app_wind: f32,

    /// Mean true wind direction
    pub twd: f32,

    /// Current roll
    pub roll: DualSource,

    /// Current heading
    pub yaw: DualSource,

    /// Time since the start of the session
    pub time_s: f64,
}

/// Rudder and sail demands, always within the servo limits.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct ActuatorCommand {
    pub rudder: f32,
    pub sail: f32,
}

/// Data produced by guidance on each cycle.
#[derive(Debug, Copy, Clone, Default)]
pub struct OutputData {
    pub command: ActuatorCommand,

    /// The reference action after this cycle, `should_tack` is cleared once a tack completes
    pub reference: ReferenceAction,

    pub debug: GuidanceDebug,
}

/// Status of guidance after a cycle.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct StatusReport {
    /// A tack is in progress
    pub tacking: bool,

    /// A tack was started on this cycle
    pub tack_started: bool,

    /// A tack was completed on this cycle
    pub tack_completed: bool,

    /// The PI control law was switched since the last cycle
    pub pi_mode_switch: Option<PiMode>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur in guidance.
#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    #[error("Could not set up the guidance archive: {0}")]
    ArchiveError(ArchiveError),

    #[error("The number of sail positions must be positive, got {0}")]
    InvalidSailPositions(i32),

    #[error("The roll stop ratio must be positive, got {0}")]
    InvalidRollStopRatio(f32),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputData {
    /// Gather the smoothed signals from the controller data.
    pub fn from_ctrl_data(
        ctrl_data: &ControllerData,
        reference: ReferenceAction,
        roll: DualSource,
        yaw: DualSource,
        time_s: f64,
    ) -> Self {
        Self {
            reference,
            alpha: ctrl_data.get_alpha(),
            alpha_yaw: ctrl_data.get_alpha_yaw(),
            app_wind: ctrl_data.get_app_wind(),
            twd: ctrl_data.get_twd(),
            roll,
            yaw,
            time_s,
        }
    }
}

impl ActuatorCommand {
    /// Build a command, saturating the rudder and clamping the sail into their ranges.
    pub fn saturated(rudder: f32, sail: f32) -> Self {
        Self {
            rudder: saturate(rudder, RUDDER_SATURATION),
            sail: clamp(sail, 0.0, SAIL_SATURATION),
        }
    }
}

impl From<ActuatorCommand> for ActuatorControls {
    fn from(cmd: ActuatorCommand) -> Self {
        ActuatorControls::new(cmd.rudder, cmd.sail)
    }
}

impl Default for Guidance {
    fn default() -> Self {
        Self::new(&Params::default())
    }
}

impl Guidance {
    /// Create a new guidance module with the given parameters and no archive.
    pub fn new(params: &Params) -> Self {
        let mut guidance = Self {
            params: params.clone(),
            pi: PiRudderController::default(),
            sail: SailController::default(),
            sail_command: SailCommand::Auto,
            tack: TackState::default(),
            pending_mode_switch: None,
            debug: GuidanceDebug::default(),
            arch_debug: Archiver::default(),
        };

        guidance.set_params(params.clone());

        guidance
    }

    /// Apply a new set of parameters.
    ///
    /// Invalid sail position counts or roll stop ratios are ignored with a warning, keeping the
    /// previous values.
    pub fn set_params(&mut self, params: Params) {
        if let Some(mode) = self.pi.set_pi_rudder_data(params.pi_gains(), params.pi_mode()) {
            self.pending_mode_switch = Some(mode);
        }

        if let Err(e) = self
            .tack
            .set_stop_tack(params.tack_roll_stop_ratio, params.tack_yaw_stop_deg)
        {
            warn!("{}, keeping the previous tack thresholds", e);
        }

        if let Err(e) = self.sail.set_sail_positions(params.sail_positions) {
            warn!("{}, keeping the previous sail positions", e);
        }

        self.sail_command = params.sail_command();
        self.params = params;
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn is_tacking(&self) -> bool {
        self.tack.is_tacking()
    }
}

impl State for Guidance {
    type InitData = Params;
    type InitError = GuidanceError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = GuidanceError;

    /// Apply the parameters and open the debug archive.
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), Self::InitError> {
        self.set_params(init_data);

        self.arch_debug = Archiver::from_path(session, DEBUG_ARCHIVE_PATH)
            .map_err(GuidanceError::ArchiveError)?;

        Ok(())
    }

    /// Compute the actuator demands for this cycle.
    ///
    /// Always succeeds, missing inputs simply keep their last smoothed values.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let mut report = StatusReport {
            pi_mode_switch: self.pending_mode_switch.take(),
            ..Default::default()
        };

        let mut reference = input_data.reference;
        let mut rudder = 0.0;
        let mut sail = 0.0;

        if reference.should_tack {
            let out = self.tack.tack_action(
                reference.alpha_star_rad,
                &input_data.roll,
                &input_data.yaw,
                input_data.alpha_yaw,
            );

            rudder = out.rudder;
            sail = out.sail;
            report.tack_started = out.started;
            report.tack_completed = out.completed;

            // Back to tracking on this very cycle
            if out.completed {
                reference.should_tack = false;
            }
        } else {
            // The planner withdrew its tack request
            self.tack.abort();
        }

        if !reference.should_tack {
            rudder = self.pi.compute(reference.alpha_star_rad, input_data.alpha);

            sail = match self.sail_command {
                SailCommand::Auto => self.sail.compute(input_data.app_wind),
                SailCommand::Override(s) => s,
            };
        }

        report.tacking = self.tack.is_tacking();

        let command = ActuatorCommand::saturated(rudder, sail);

        self.debug = GuidanceDebug {
            time_s: input_data.time_s,
            alpha: input_data.alpha,
            rudder_action: command.rudder,
            sail_action: command.sail,
            twd_mean: input_data.twd,
            app_mean: input_data.app_wind,
            tacking: report.tacking,
        };

        trace!(
            "Guidance: alpha {:.3}, rudder {:.3}, sail {:.3}",
            input_data.alpha,
            command.rudder,
            command.sail
        );

        Ok((
            OutputData {
                command,
                reference,
                debug: self.debug,
            },
            report,
        ))
    }
}

impl Archived for Guidance {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_debug.serialise(self.debug)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
