//! # Robot commands
//!
//! Commands acting on the robot's [`Systems`](crate::systems::Systems), built
//! from the generic commands of the scheduler or implemented directly where
//! they carry their own state.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod arm;
mod balance;
pub mod grabber;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use balance::ChargeStationBalance;
pub use grabber::EjectGamePiece;
