//! Balance control module
//!
//! Keeps the robot level on the charge station by driving in the direction
//! the robot is pitched, proportionally to the pitch. Near the end of the
//! match period the wheels are locked into an X instead, so the robot holds
//! whatever position it has reached.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during BalanceCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum BalanceCtrlError {
    #[error("Invalid BalanceCtrl parameters: {0}")]
    InvalidParams(String),

    #[error("BalanceCtrl has not been initialised")]
    NotInitialised,
}
