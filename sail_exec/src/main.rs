//! Main sailing executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the reference frame, modules and network
//!     - Main loop:
//!         - Wait at most `poll_timeout_ms` for new data on any subscribed topic
//!         - System input acquisition:
//!             - Course over ground
//!             - Filtered GPS fix, located in the race frame and given to the path planner
//!             - Wind
//!             - Attitude from the estimator and the weather station
//!         - Telecommand processing, including race frame updates from the ground
//!         - Guidance parameter update check
//!         - Guidance processing
//!         - Actuator demands and debug output
//!     - Zero the actuators on exit
//!
//! Guidance runs on every cycle, even when no new data arrived or polling failed, so that the
//! servos keep receiving demands.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod bus;
mod tc_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::thread;
use std::time::Duration;

// Internal
use bus::{Readable, SailBus};
use comms_if::{
    eqpt::{
        act::ActuatorControls,
        sens::{Attitude, WxAttitude},
    },
    net::{zmq, NetError, NetParams},
};
use sail_lib::{
    ctrl_data::ControllerData,
    guidance::{self, DualSource, Guidance, InputData},
    nav::{GeodeticPosition, ReferenceFrame},
    params::SailExecParams,
    planner::{ManualPlanner, PathPlanner},
};
use tc_processor::TcOutcome;
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    params::ParamWatcher,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Delay between two attempts at zeroing the actuators on exit.
const SHUTDOWN_RETRY_PERIOD: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("sail_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Autonomous Sailing Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: SailExecParams =
        util::params::load("sail_exec.toml").wrap_err("Could not load exec params")?;
    exec_params
        .validate()
        .wrap_err("Invalid exec params")?;

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;

    // Guidance parameters are tuned from the ground while running
    let (mut guidance_params_watcher, guidance_params) =
        ParamWatcher::<guidance::Params>::new("guidance.toml")
            .wrap_err("Could not load guidance params")?;

    info!("Exec parameters loaded");

    // ---- REFERENCE FRAME ----

    // Order matters, the race origin is located relative to the NED origin
    let mut ref_frame = ReferenceFrame::new();
    ref_frame.set_reference_origin(&exec_params.origin());
    ref_frame.set_mean_wind_angle(exec_params.mean_wind_angle_rad);
    ref_frame.set_race_origin(&exec_params.top_mark());

    session.save("reference_frame.json", ref_frame.clone());

    info!("Reference frame initialised");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ctrl_data = ControllerData::new(exec_params.moving_window_len);

    let mut planner = ManualPlanner::new(exec_params.default_alpha_star_rad);

    let mut guidance = Guidance::default();
    guidance
        .init(guidance_params, &session)
        .wrap_err("Failed to initialise Guidance")?;
    info!("Guidance init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let zmq_ctx = zmq::Context::new();

    let bus = SailBus::new(&zmq_ctx, &net_params).wrap_err("Failed to initialise the network")?;

    info!("Network initialisation complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    // Last attitude from each source
    let mut attitude = Attitude::default();
    let mut wx_attitude = WxAttitude::default();

    let mut shutdown = false;

    while !shutdown {
        // ---- DATA INPUT ----

        // On a poll error guidance still runs on the data already held
        let readable = match bus.poll(exec_params.poll_timeout_ms) {
            Ok(r) => {
                if !r.any() {
                    warn!("Got no data within {} ms", exec_params.poll_timeout_ms);
                }
                r
            }
            Err(e) => {
                warn!("Poll error: {}", e);
                thread::sleep(Duration::from_millis(exec_params.poll_timeout_ms as u64));
                Readable::default()
            }
        };

        if readable.gps_raw {
            if let Some(gps) = bus::latest(&bus.gps_raw) {
                ctrl_data.update_cog(gps.cog_rad);
            }
        }

        if readable.gps_filtered {
            if let Some(fix) = bus::latest(&bus.gps_filtered) {
                let pos = ref_frame.geo_to_race(&GeodeticPosition::new(
                    fix.lat_deg,
                    fix.lon_deg,
                    fix.alt_m,
                ));
                planner.update_position(&pos);
            }
        }

        if readable.wind_sailing {
            if let Some(wind) = bus::latest(&bus.wind_sailing) {
                ctrl_data.update_twd(wind.angle_true);
                ctrl_data.update_app_wind(wind.angle_apparent);
            }
        }

        if readable.attitude {
            if let Some(att) = bus::latest(&bus.attitude) {
                ctrl_data.update_yaw(att.yaw);
                attitude = att;
            }
        }

        if readable.wx_attitude {
            if let Some(wx) = bus::latest(&bus.wx_attitude) {
                wx_attitude = wx;
            }
        }

        // ---- TELECOMMAND PROCESSING ----

        // Get commands until none remain
        if readable.tc {
            loop {
                match bus.tc.recv() {
                    Ok(Some(tc)) => {
                        match tc_processor::exec(&mut planner, &mut ref_frame, &tc) {
                            TcOutcome::Continue => (),
                            TcOutcome::FrameUpdated => {
                                session.save("reference_frame.json", ref_frame.clone())
                            }
                            TcOutcome::Shutdown => shutdown = true,
                        }
                    }
                    Ok(None) => break,
                    Err(NetError::DeserialiseError(e)) => {
                        warn!("Could not parse recieved TC: {}", e)
                    }
                    Err(e) => {
                        warn!("Could not receive TCs: {}", e);
                        break;
                    }
                }
            }
        }

        // ---- PARAMETER UPDATE ----

        match guidance_params_watcher.check_update() {
            Ok(Some(p)) => {
                info!("Guidance parameters updated");
                guidance.set_params(p);
            }
            Ok(None) => (),
            Err(e) => warn!("Could not reload the guidance parameters: {}", e),
        }

        // ---- GUIDANCE PROCESSING ----

        let input = InputData::from_ctrl_data(
            &ctrl_data,
            planner.reference_action(),
            DualSource::new(attitude.roll, wx_attitude.roll_r),
            DualSource::new(attitude.yaw, wx_attitude.heading_tn),
            session::get_elapsed_seconds(),
        );

        let (output, report) = match guidance.proc(&input) {
            Ok(o) => o,
            Err(e) => {
                warn!("Error during Guidance processing: {}", e);
                continue;
            }
        };

        if let Some(mode) = report.pi_mode_switch {
            bus.notify_ground(mode.notice());
        }

        if report.tack_completed {
            planner.notify_tack_completed();
            bus.notify_ground("Tack completed.");
        }

        // ---- OUTPUT ----

        if let Err(e) = bus
            .actuators
            .send(&ActuatorControls::from(output.command))
        {
            warn!("Could not send the actuator demands: {}", e);
        }

        if let Err(e) = bus.guidance_dbg.send(&output.debug) {
            warn!("Could not send the guidance debug: {}", e);
        }

        // ---- WRITE ARCHIVES ----

        if let Err(e) = guidance.write() {
            warn!("Could not archive guidance data: {}", e);
        }
    }

    // ---- SHUTDOWN ----

    info!("Zeroing actuators");

    // The servos must be left safe, keep trying until the demand is out
    while let Err(e) = bus.actuators.send(&ActuatorControls::zero()) {
        debug!("Could not zero the actuators: {}, retrying", e);
        thread::sleep(SHUTDOWN_RETRY_PERIOD);
    }

    // Terminating the context blocks until the zero demand has left the queue, or the linger
    // period has elapsed
    drop(bus);
    drop(zmq_ctx);

    info!("End of execution");

    session.exit();

    Ok(())
}
