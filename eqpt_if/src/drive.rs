//! # Drivebase demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{motor::IdleMode, DriverError};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A demand sent to the swerve drivebase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DriveDemand {
    /// Hold all wheels at zero speed.
    Stop,

    /// Drive with normalised velocities.
    Velocity {
        /// Forward velocity, normalised to `[-1, 1]`.
        x_norm: f64,

        /// Leftward (strafe) velocity, normalised to `[-1, 1]`.
        y_norm: f64,

        /// Anticlockwise rotation rate, normalised to `[-1, 1]`.
        rot_norm: f64,

        /// If true the velocities are expressed in the field frame, otherwise
        /// in the robot frame.
        field_relative: bool,
    },

    /// Point the wheels into an X so the robot resists being pushed.
    LockX,
}

impl Default for DriveDemand {
    fn default() -> Self {
        DriveDemand::Stop
    }
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Driver for a swerve drivebase.
pub trait SwerveDrive {
    /// Actuate the given demand. Called at most once per cycle.
    fn drive(&mut self, demand: &DriveDemand);

    /// Set the idle mode of the module turning motors.
    fn set_turning_idle_mode(&mut self, mode: IdleMode) -> Result<(), DriverError>;
}
