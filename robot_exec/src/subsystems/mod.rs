//! # Subsystems
//!
//! Each subsystem owns one cluster of equipment for the lifetime of the
//! process. Commands change a subsystem's demands, the subsystem's `periodic`
//! hook writes them to the equipment once per cycle after all command logic.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod arm;
mod drive;
mod grabber;
mod score_loc;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use arm::{Arm, ARM};
pub use drive::{Drive, DRIVE};
pub use grabber::{Grabber, GrabberParams, GRABBER};
pub use score_loc::{ScoreCol, ScoreHeight, ScoringLocation};
