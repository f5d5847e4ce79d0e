//! Logging setup
//!
//! Every line is stamped with the seconds elapsed since the session epoch, which is also the time
//! base of the archives, so log lines and archived records can be matched up.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use fern::FormatCallback;
use log::{info, Level, Record};
use std::fmt::Arguments;
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Notices are logged at INFO level and cannot be filtered out, got `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger, writing to stdout and to the session's log file.
///
/// `min_level` must be `Info` or more verbose. Must only be called once.
pub fn logger_init(min_level: LevelFilter, session: &Session) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    fern::Dispatch::new()
        .format(format_line)
        .level(min_level)
        // Socket internals are only of interest when debugging the network
        .level_for("zmq", LevelFilter::Info)
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Format a log line, naming the emitting module for debug and trace lines only.
fn format_line(out: FormatCallback, message: &Arguments, record: &Record) {
    let elapsed = session::get_elapsed_seconds();
    let level = level_tag(record.level());

    if record.level() > Level::Info {
        out.finish(format_args!(
            "[{:10.6} {}] {}: {}",
            elapsed,
            level,
            record.target(),
            message
        ))
    } else {
        out.finish(format_args!("[{:10.6} {}] {}", elapsed, level, message))
    }
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info => "INF".normal(),
        Level::Warn => "WRN".yellow(),
        Level::Error => "ERR".red().bold(),
    }
}
