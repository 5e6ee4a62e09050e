//! # Robot library
//!
//! The control core of the robot: the command scheduler, the subsystems and
//! the control loops they run, the autonomous routines and the mode driver
//! which ties them together. The `robot_exec` executable runs it against the
//! simulated equipment in [`sim`].

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Period of one control cycle.
///
/// Units: seconds
pub const CYCLE_PERIOD_S: f64 = 0.02;

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm control - profiled PID and feedforward for the arm joint
pub mod arm_ctrl;

/// Autonomous routines built from the robot commands
pub mod auto;

/// Balance control - drives the robot level on the charge station
pub mod balance_ctrl;

/// Commands acting on the robot's subsystems
pub mod commands;

/// Hardware initialisation with bounded retries
pub mod hw_init;

/// Executable parameters
pub mod params;

/// Mode driver - phase hooks around the scheduler
pub mod robot;

/// Command scheduler, command trait and compositions
pub mod sched;

/// Simulated equipment
pub mod sim;

/// Arm, drivebase and grabber subsystems
pub mod subsystems;

/// The robot context passed to commands
pub mod systems;

/// Telemetry snapshot record
pub mod tm;
