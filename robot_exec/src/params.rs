//! # Robot Executable Parameters
//!
//! This module provides parameters for the robot executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{auto::AutoRoutine, sim::SimParams, subsystems::GrabberParams};
use eqpt_if::IdleMode;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecParams {
    /// Pace the cycles against the wall clock. If false the simulated match
    /// runs as fast as possible.
    pub realtime: bool,

    /// Number of times a hardware configuration sequence is attempted before
    /// startup fails.
    pub init_retry_attempts: u32,

    /// Length of the disabled periods before and after the match.
    ///
    /// Units: seconds
    pub disabled_s: f64,

    /// Length of the autonomous period.
    ///
    /// Units: seconds
    pub autonomous_s: f64,

    /// Length of the teleoperated period.
    ///
    /// Units: seconds
    pub teleop_s: f64,

    /// Routine run during the autonomous period.
    pub auto_routine: AutoRoutine,

    /// Time the grabber runs outwards to score a game piece.
    ///
    /// Units: seconds
    pub eject_s: f64,

    /// Idle mode of the drivebase turning motors while enabled.
    pub turning_motor_idle_mode: IdleMode,

    pub grabber: GrabberParams,

    pub sim: SimParams,
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_exec_params() {
        let p: ExecParams =
            util::params::from_str(include_str!("../../params/robot_exec.toml")).unwrap();

        assert!(p.init_retry_attempts > 0);
        assert_eq!(p.auto_routine, AutoRoutine::ScoreTwoAndBalance);
        assert!(p.eject_s > 0.0);
    }

    #[test]
    fn test_load_ctrl_params() {
        let arm: crate::arm_ctrl::Params =
            util::params::from_str(include_str!("../../params/arm_ctrl.toml")).unwrap();
        assert!(arm.validate().is_ok());

        let balance: crate::balance_ctrl::Params =
            util::params::from_str(include_str!("../../params/balance_ctrl.toml")).unwrap();
        assert!(balance.validate().is_ok());
    }
}
