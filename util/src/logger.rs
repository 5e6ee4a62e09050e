//! Logging setup for the executables
//!
//! All crates log through the `log` facade. An executable calls [`logger_init`]
//! once, after creating its session, to route records to stdout and to the
//! session's log file.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use colored::{ColoredString, Colorize};
use log::{info, Level};
use thiserror::Error;

use crate::session;

pub use log::LevelFilter;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Targets which log every cycle, with the most verbose level let through for
/// each.
const TARGET_CAPS: &[(&str, LevelFilter)] = &[
    ("robot_lib::sched", LevelFilter::Debug),
    ("robot_lib::sim", LevelFilter::Debug),
];

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// # Notes
///
/// - `min_level` must let at least `INFO` records through.
/// - Targets in `TARGET_CAPS` are capped at their listed level.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    min_level: LevelFilter,
    session: &session::Session,
) -> Result<(), LoggerInitError> {
    check_min_level(min_level)?;

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                format_record(
                    session::get_elapsed_seconds(),
                    record.level(),
                    record.target(),
                    message
                )
            ))
        })
        .level(min_level);

    for (target, cap) in TARGET_CAPS {
        dispatch = dispatch.level_for(*target, min_level.min(*cap));
    }

    dispatch
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

fn check_min_level(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    Ok(())
}

/// Build one log line. Debug and trace records also carry their target.
fn format_record(elapsed_s: f64, level: Level, target: &str, message: &fmt::Arguments) -> String {
    if level > Level::Info {
        format!(
            "[{:10.6} {}] {}: {}",
            elapsed_s,
            level_tag(level),
            target,
            message
        )
    } else {
        format!("[{:10.6} {}] {}", elapsed_s, level_tag(level), message)
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

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_min_level() {
        assert!(check_min_level(LevelFilter::Trace).is_ok());
        assert!(check_min_level(LevelFilter::Info).is_ok());
        assert!(matches!(
            check_min_level(LevelFilter::Warn),
            Err(LoggerInitError::InvalidMinLogLevel(LevelFilter::Warn))
        ));
    }

    #[test]
    fn test_format_record() {
        colored::control::set_override(false);

        assert_eq!(
            format_record(
                1.5,
                Level::Info,
                "robot_lib::robot",
                &format_args!("Entering teleop mode")
            ),
            "[  1.500000 INF] Entering teleop mode"
        );
        assert_eq!(
            format_record(0.02, Level::Debug, "robot_lib::sched", &format_args!("started")),
            "[  0.020000 DBG] robot_lib::sched: started"
        );
    }
}
