//! Arm control module
//!
//! Drives the single arm joint to a named position with a motion-profiled PID
//! loop plus a gravity feedforward. The module is pure: the arm subsystem
//! feeds it the measured angle each cycle and writes the voltage it returns to
//! the motor.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod feedforward;
mod params;
mod pid;
mod position;
mod profile;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use feedforward::*;
pub use params::*;
pub use pid::*;
pub use position::*;
pub use profile::*;
pub use state::*;

#[cfg(test)]
pub(crate) use state::test::test_params;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error("No angle is configured for the arm position {0}")]
    UnknownPosition(ArmPosition),

    #[error("Invalid ArmCtrl parameters: {0}")]
    InvalidParams(String),

    #[error("ArmCtrl has not been initialised")]
    NotInitialised,
}
