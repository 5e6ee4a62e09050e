//! # Robot mode driver
//!
//! Owns the scheduler and the subsystems, and switches between the phases of a
//! match. The executable calls [`Robot::set_mode`] on every phase change and
//! [`Robot::tick`] once per cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    auto::{AutoError, AutoParams, AutoRoutine},
    sched::{CommandId, Scheduler},
    systems::Systems,
};
use eqpt_if::{IdleMode, TelemetrySink};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Minimum match time at phase entry for the phase to be part of a timed
/// match.
///
/// Units: seconds
const TIMED_MATCH_THRESHOLD_S: f64 = 1.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the mode driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotParams {
    pub auto_routine: AutoRoutine,

    pub auto: AutoParams,

    /// Idle mode of the drivebase turning motors while enabled.
    pub turning_motor_idle_mode: IdleMode,
}

pub struct Robot {
    scheduler: Scheduler<Systems>,
    systems: Systems,

    mode: RobotMode,

    /// The autonomous routine, registered with the scheduler.
    auto_cmd: Option<CommandId>,

    /// True if the current phase is part of a timed match.
    timed_match: bool,

    turning_idle_mode: IdleMode,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotMode {
    Disabled,
    Autonomous,
    Teleop,
    Test,
}

#[derive(Debug, thiserror::Error)]
pub enum RobotError {
    #[error("Could not build the autonomous routine: {0}")]
    AutoBuildError(#[from] AutoError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Robot {
    /// Create the robot in disabled mode and build the selected autonomous
    /// routine.
    pub fn new(systems: Systems, params: &RobotParams) -> Result<Self, RobotError> {
        let mut scheduler = Scheduler::new();

        let auto_cmd = params
            .auto_routine
            .build(&params.auto)?
            .map(|cmd| scheduler.register(cmd));

        info!("Autonomous routine: {}", params.auto_routine);

        let mut robot = Self {
            scheduler,
            systems,
            mode: RobotMode::Disabled,
            auto_cmd,
            timed_match: false,
            turning_idle_mode: params.turning_motor_idle_mode,
        };
        robot.disabled_init();

        Ok(robot)
    }

    /// Switch to a new phase, running its entry hook.
    ///
    /// Entering the current mode again runs the hook again.
    pub fn set_mode(&mut self, mode: RobotMode) {
        info!("Entering {} mode", mode);

        self.mode = mode;

        match mode {
            RobotMode::Disabled => self.disabled_init(),
            RobotMode::Autonomous => self.autonomous_init(),
            RobotMode::Teleop => self.teleop_init(),
            RobotMode::Test => self.test_init(),
        }
    }

    /// Run one cycle.
    pub fn tick(&mut self) {
        if self.mode == RobotMode::Disabled {
            // Keep the mechanisms free to move by hand
            self.systems.set_idle_modes(IdleMode::Coast, IdleMode::Coast);
        }

        self.scheduler.tick(&mut self.systems);
    }

    fn disabled_init(&mut self) {
        if let Some(id) = self.auto_cmd {
            self.scheduler.cancel(id);
        }
        self.scheduler.cancel_all(&mut self.systems);

        self.systems.set_enabled(false);
        self.systems.set_idle_modes(IdleMode::Coast, IdleMode::Coast);
    }

    fn autonomous_init(&mut self) {
        self.enter_enabled_phase();

        match self.auto_cmd {
            Some(id) => self.scheduler.schedule(id),
            None => debug!("No autonomous routine to run"),
        }
    }

    fn teleop_init(&mut self) {
        if let Some(id) = self.auto_cmd {
            self.scheduler.cancel(id);
        }

        self.systems.drive.offset_current_heading(0.0);
        self.enter_enabled_phase();
        self.systems.arm.init_control_loop();
    }

    fn test_init(&mut self) {
        self.scheduler.cancel_all(&mut self.systems);
        self.systems.set_enabled(true);
    }

    fn enter_enabled_phase(&mut self) {
        self.timed_match = self.systems.match_time_s() > TIMED_MATCH_THRESHOLD_S;
        debug!("Timed match: {}", self.timed_match);

        self.systems.set_enabled(true);
        self.systems
            .set_idle_modes(IdleMode::Brake, self.turning_idle_mode);
    }

    pub fn mode(&self) -> RobotMode {
        self.mode
    }

    pub fn timed_match(&self) -> bool {
        self.timed_match
    }

    /// Handle of the autonomous routine, `None` if no routine was selected.
    pub fn auto_command(&self) -> Option<CommandId> {
        self.auto_cmd
    }

    pub fn scheduler(&self) -> &Scheduler<Systems> {
        &self.scheduler
    }

    /// For scheduling operator commands.
    pub fn scheduler_mut(&mut self) -> &mut Scheduler<Systems> {
        &mut self.scheduler
    }

    pub fn systems(&self) -> &Systems {
        &self.systems
    }

    pub fn systems_mut(&mut self) -> &mut Systems {
        &mut self.systems
    }

    pub fn report(&self, tm: &mut dyn TelemetrySink) {
        tm.put_string("Robot/Mode", &self.mode.to_string());
        tm.put_bool("Robot/Timed match", self.timed_match);
        self.scheduler.report(tm);
        self.systems.report(tm);
    }
}

impl fmt::Display for RobotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RobotMode::Disabled => "disabled",
            RobotMode::Autonomous => "autonomous",
            RobotMode::Teleop => "teleop",
            RobotMode::Test => "test",
        };
        write!(f, "{}", s)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::arm_ctrl::ArmPosition;
    use crate::balance_ctrl;
    use crate::sched::CommandState;
    use crate::sim::SimEquipment;
    use crate::subsystems::{ARM, GRABBER};
    use crate::systems::test::sim_systems;
    use crate::tm::TmRecord;
    use eqpt_if::TmValue;

    fn params(auto_routine: AutoRoutine) -> RobotParams {
        RobotParams {
            auto_routine,
            auto: AutoParams {
                eject_s: 0.3,
                balance: balance_ctrl::Params {
                    pitch_to_norm_vel: 0.02,
                    deadband_norm_vel: 0.05,
                    set_x_time_left_s: 1.0,
                },
            },
            turning_motor_idle_mode: IdleMode::Brake,
        }
    }

    fn robot(auto_routine: AutoRoutine) -> (Robot, SimEquipment) {
        let (systems, eqpt) = sim_systems();
        let robot = Robot::new(systems, &params(auto_routine)).unwrap();

        (robot, eqpt)
    }

    fn run(robot: &mut Robot, eqpt: &mut SimEquipment, ticks: usize) {
        for _ in 0..ticks {
            robot.tick();
            eqpt.step(crate::CYCLE_PERIOD_S);
        }
    }

    #[test]
    fn test_starts_disabled() {
        let (mut robot, mut eqpt) = robot(AutoRoutine::ScoreOne);

        assert_eq!(robot.mode(), RobotMode::Disabled);
        assert_eq!(
            robot.scheduler().state(robot.auto_command().unwrap()),
            Some(CommandState::Idle)
        );

        run(&mut robot, &mut eqpt, 5);

        // Outputs are zero and everything coasts
        assert_eq!(eqpt.arm_motor.voltage_v(), 0.0);
        assert_eq!(eqpt.arm_motor.snapshot().idle_mode, Some(IdleMode::Coast));
        assert_eq!(
            eqpt.swerve.snapshot().turning_idle_mode,
            Some(IdleMode::Coast)
        );
    }

    #[test]
    fn test_autonomous_then_teleop() {
        let (mut robot, mut eqpt) = robot(AutoRoutine::ScoreOne);
        let auto = robot.auto_command().unwrap();

        eqpt.clock.set_remaining(15.0);
        robot.set_mode(RobotMode::Autonomous);
        assert!(robot.timed_match());
        assert_eq!(eqpt.arm_motor.snapshot().idle_mode, Some(IdleMode::Brake));

        run(&mut robot, &mut eqpt, 10);
        assert_eq!(robot.scheduler().state(auto), Some(CommandState::Running));
        assert_eq!(robot.scheduler().owner(ARM), Some(auto));
        assert_eq!(
            robot.systems().arm.desired_position(),
            ArmPosition::ScoreMidHigh
        );

        // Teleop interrupts the routine part way through
        eqpt.gyro.set_yaw(90.0);
        eqpt.clock.set_remaining(135.0);
        robot.set_mode(RobotMode::Teleop);
        assert_eq!(robot.systems().drive.heading_deg(), 0.0);

        // The arm holds where it is rather than finishing the move
        let angle_deg = robot.systems().arm.angle_deg();
        assert_eq!(robot.systems().arm.goal_deg(), angle_deg);

        robot.tick();
        assert_eq!(robot.scheduler().state(auto), Some(CommandState::Ended));
        assert_eq!(robot.scheduler().owner(ARM), None);
        assert_eq!(robot.scheduler().owner(GRABBER), None);
    }

    #[test]
    fn test_untimed_match() {
        let (mut robot, _eqpt) = robot(AutoRoutine::None);
        assert_eq!(robot.auto_command(), None);

        // Practice mode reports no match time
        robot.set_mode(RobotMode::Autonomous);
        assert!(!robot.timed_match());
        assert!(robot.scheduler().running().is_empty());
    }

    #[test]
    fn test_disable_cancels_everything() {
        let (mut robot, mut eqpt) = robot(AutoRoutine::ScoreTwoAndBalance);
        let auto = robot.auto_command().unwrap();

        eqpt.clock.set_remaining(15.0);
        robot.set_mode(RobotMode::Autonomous);
        run(&mut robot, &mut eqpt, 20);
        assert!(robot.scheduler().is_running(auto));

        robot.set_mode(RobotMode::Disabled);
        assert_eq!(robot.scheduler().state(auto), Some(CommandState::Ended));
        assert!(robot.scheduler().requirement_owners().is_empty());

        robot.tick();
        assert_eq!(eqpt.arm_motor.voltage_v(), 0.0);
        assert_eq!(eqpt.grabber_motor.snapshot().duty, 0.0);

        // The routine can run again in a new autonomous period
        robot.set_mode(RobotMode::Autonomous);
        robot.tick();
        assert!(robot.scheduler().is_running(auto));
    }

    #[test]
    fn test_report() {
        let (mut robot, mut eqpt) = robot(AutoRoutine::ScoreOne);
        eqpt.clock.set_remaining(15.0);
        robot.set_mode(RobotMode::Autonomous);
        robot.tick();

        let mut tm = TmRecord::default();
        robot.report(&mut tm);

        assert_eq!(
            tm.get("Robot/Mode"),
            Some(&TmValue::String("autonomous".into()))
        );
        assert_eq!(
            tm.get("Scheduler/Running"),
            Some(&TmValue::String("AutoScoreOne".into()))
        );
        assert_eq!(tm.get("Match Time (s)"), Some(&TmValue::Number(15.0)));
    }
}
