//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::{Deserialize, Serialize};

// Internal
use super::{
    ArmCtrlError, ArmPosition, Constraints, NudgeDirection, Params, PositionTable, ProfileState,
    ProfiledPid,
};
use util::{maths::deg_to_rad, module::State};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm control module state
#[derive(Default)]
pub struct ArmCtrl {
    pub(crate) params: Params,

    /// Target angle of every named position.
    table: PositionTable,

    /// The profiled controller, `None` until the module is initialised.
    controller: Option<ProfiledPid>,

    /// The position most recently commanded.
    desired: ArmPosition,

    /// Most recent measured angle.
    ///
    /// Units: degrees
    angle_deg: f64,

    report: StatusReport,
}

/// Input data to Arm Control.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    /// Measured arm angle, with the zero offset applied.
    ///
    /// Units: degrees
    pub angle_deg: f64,
}

/// Demands output by Arm Control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmDems {
    /// Units: volts
    pub voltage_v: f64,
}

/// Status report for ArmCtrl processing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatusReport {
    /// Feedback term of the output.
    ///
    /// Units: volts
    pub pid_v: f64,

    /// Feedforward term of the output.
    ///
    /// Units: volts
    pub ff_v: f64,

    /// Units: degrees
    pub setpoint_deg: f64,

    /// Units: degrees/second
    pub setpoint_vel_degs: f64,

    /// Units: degrees
    pub goal_deg: f64,

    pub desired: ArmPosition,

    pub at_desired: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ArmCtrl {
    type InitData = Params;
    type InitError = ArmCtrlError;

    type InputData = InputData;
    type OutputData = ArmDems;
    type StatusReport = StatusReport;
    type ProcError = ArmCtrlError;

    /// Initialise the ArmCtrl module.
    ///
    /// The profile starts at rest at zero with a goal of zero, call
    /// `init_control_loop` with a measured angle before driving the arm.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        init_data.validate()?;

        self.table = PositionTable::from(&init_data.positions_deg);

        let mut controller = ProfiledPid::new(
            init_data.gains,
            Constraints {
                max_velocity: init_data.max_vel_degs,
                max_acceleration: init_data.max_accel_degss,
            },
            crate::CYCLE_PERIOD_S,
        );
        controller.set_tolerance(init_data.tolerance_deg);
        controller.reset(0.0);

        self.controller = Some(controller);
        self.desired = ArmPosition::Starting;
        self.angle_deg = 0.0;
        self.params = init_data;

        Ok(())
    }

    /// Perform cyclic processing of Arm Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let controller = self
            .controller
            .as_mut()
            .ok_or(ArmCtrlError::NotInitialised)?;

        self.angle_deg = input_data.angle_deg;

        let pid_v = controller.calculate(self.angle_deg);
        let setpoint = controller.setpoint();
        let goal = controller.goal();

        // Feedforward uses the angle relative to horizontal, position checks
        // don't
        let ff_v = self.params.feedforward.calculate(
            deg_to_rad(self.angle_deg - self.params.horizontal_pos_deg),
            deg_to_rad(setpoint.velocity),
        );

        self.report = StatusReport {
            pid_v,
            ff_v,
            setpoint_deg: setpoint.position,
            setpoint_vel_degs: setpoint.velocity,
            goal_deg: goal.position,
            desired: self.desired,
            at_desired: self.at_desired_position()?,
        };

        Ok((
            ArmDems {
                voltage_v: pid_v + ff_v,
            },
            self.report,
        ))
    }
}

impl ArmCtrl {
    /// Restart the profile from the given measured angle and hold it there.
    pub fn init_control_loop(&mut self, angle_deg: f64) -> Result<(), ArmCtrlError> {
        let controller = self.controller_mut()?;
        controller.reset(angle_deg);
        controller.set_goal(angle_deg);

        self.angle_deg = angle_deg;

        debug!("Arm control loop reset at {:.2} deg", angle_deg);

        Ok(())
    }

    /// Move towards a named position.
    pub fn go_to_position(&mut self, pos: ArmPosition) -> Result<(), ArmCtrlError> {
        let target_deg = self.table.get(pos)?;

        self.controller_mut()?.set_goal(target_deg);
        self.desired = pos;

        debug!("Arm going to {} ({:.2} deg)", pos, target_deg);

        Ok(())
    }

    /// The position most recently commanded.
    pub fn desired_position(&self) -> ArmPosition {
        self.desired
    }

    /// True if the last measured angle is within tolerance of the position.
    pub fn at_position(&self, pos: ArmPosition) -> Result<bool, ArmCtrlError> {
        self.within_tolerance(self.angle_deg, pos)
    }

    /// True if `angle_deg` is within tolerance of the position.
    pub fn within_tolerance(
        &self,
        angle_deg: f64,
        pos: ArmPosition,
    ) -> Result<bool, ArmCtrlError> {
        let target_deg = self.table.get(pos)?;

        Ok((angle_deg - target_deg).abs() <= self.params.tolerance_deg)
    }

    /// True if the last measured angle is within tolerance of the desired
    /// position.
    pub fn at_desired_position(&self) -> Result<bool, ArmCtrlError> {
        self.at_position(self.desired)
    }

    /// Adjust the desired position's angle by one step and retarget the goal.
    ///
    /// The adjustment persists in the position table. Returns the new angle.
    pub fn nudge(&mut self, direction: NudgeDirection) -> Result<f64, ArmCtrlError> {
        let delta_deg = match direction {
            NudgeDirection::Further => self.params.nudge_step_deg,
            NudgeDirection::LessFar => -self.params.nudge_step_deg,
        };

        let desired = self.desired;
        let new_deg = self.table.adjust(desired, delta_deg)?;

        self.controller_mut()?.set_goal(new_deg);

        info!("Latest angle for {}: {:.2} deg", desired, new_deg);

        Ok(new_deg)
    }

    /// Target angle of a position.
    pub fn position_deg(&self, pos: ArmPosition) -> Result<f64, ArmCtrlError> {
        self.table.get(pos)
    }

    /// The profile goal, `None` before initialisation.
    pub fn goal(&self) -> Option<ProfileState> {
        self.controller.as_ref().map(|c| c.goal())
    }

    /// The current profiled setpoint, `None` before initialisation.
    pub fn setpoint(&self) -> Option<ProfileState> {
        self.controller.as_ref().map(|c| c.setpoint())
    }

    /// Most recent measured angle.
    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    /// Report from the last call to `proc`.
    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    fn controller_mut(&mut self) -> Result<&mut ProfiledPid, ArmCtrlError> {
        self.controller.as_mut().ok_or(ArmCtrlError::NotInitialised)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::arm_ctrl::{ArmFeedforward, MotorParams, PidGains, PositionsDeg};

    pub(crate) fn test_params() -> Params {
        Params {
            gains: PidGains {
                k_p: 0.2,
                k_i: 0.0,
                k_d: 0.0,
            },
            max_vel_degs: 90.0,
            max_accel_degss: 180.0,
            tolerance_deg: 2.0,
            feedforward: ArmFeedforward {
                k_s_v: 0.1,
                k_g_v: 0.4,
                k_v_vsrad: 0.8,
            },
            abs_encoder_zero_deg: 0.0,
            horizontal_pos_deg: 20.0,
            nudge_step_deg: 0.5,
            positions_deg: PositionsDeg {
                starting: 0.0,
                intake: 5.0,
                score_low: 40.0,
                score_mid_high: 95.0,
                avoid_limelight: 30.0,
            },
            motor: MotorParams {
                motor_inverted: true,
                abs_encoder_inverted: true,
                motor_gear_ratio: 100.0,
                abs_encoder_gear_ratio: 26.0 / 24.0,
                forward_soft_limit_deg: 110.0,
                reverse_soft_limit_deg: -5.0,
                soft_limits_enabled: false,
                current_limit_a: 40,
            },
        }
    }

    fn initialised() -> ArmCtrl {
        let mut arm = ArmCtrl::default();
        arm.init(test_params()).unwrap();
        arm.init_control_loop(0.0).unwrap();
        arm
    }

    #[test]
    fn test_requires_init() {
        let mut arm = ArmCtrl::default();

        assert!(matches!(
            arm.proc(&InputData { angle_deg: 0.0 }),
            Err(ArmCtrlError::NotInitialised)
        ));
        assert!(matches!(
            arm.go_to_position(ArmPosition::Intake),
            Err(ArmCtrlError::UnknownPosition(ArmPosition::Intake))
        ));
        assert!(arm.init_control_loop(0.0).is_err());
    }

    #[test]
    fn test_invalid_params() {
        let mut arm = ArmCtrl::default();
        let mut params = test_params();
        params.max_vel_degs = 0.0;

        assert!(matches!(
            arm.init(params),
            Err(ArmCtrlError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_profile_velocity_never_exceeds_max() {
        let mut arm = initialised();
        arm.go_to_position(ArmPosition::ScoreMidHigh).unwrap();
        assert_eq!(arm.desired_position(), ArmPosition::ScoreMidHigh);

        // Arm tracks the setpoint perfectly
        let mut angle_deg = 0.0;
        let mut reached_at = None;

        for i in 0..500 {
            let (dems, report) = arm.proc(&InputData { angle_deg }).unwrap();

            assert!(report.setpoint_vel_degs.abs() <= 90.0 + 1e-9);
            assert!(dems.voltage_v.is_finite());
            assert_eq!(report.goal_deg, 95.0);

            // The first setpoint is nowhere near the goal
            if i == 0 {
                assert!(report.setpoint_deg < 1.0);
            }

            if report.at_desired && reached_at.is_none() {
                reached_at = Some(i);
            }
            if reached_at.is_some() {
                assert!(report.at_desired);
            }

            angle_deg = report.setpoint_deg;
        }

        // 95 deg at 90 deg/s and 180 deg/s^2 takes a little over 1.5 s
        let reached_at = reached_at.unwrap();
        assert!(reached_at > 50 && reached_at < 100);
    }

    #[test]
    fn test_at_position() {
        let mut arm = initialised();
        arm.go_to_position(ArmPosition::ScoreLow).unwrap();

        arm.proc(&InputData { angle_deg: 37.5 }).unwrap();
        assert!(!arm.at_position(ArmPosition::ScoreLow).unwrap());
        assert!(!arm.at_desired_position().unwrap());

        arm.proc(&InputData { angle_deg: 38.0 }).unwrap();
        assert!(arm.at_position(ArmPosition::ScoreLow).unwrap());
        assert!(arm.at_desired_position().unwrap());

        arm.proc(&InputData { angle_deg: 41.9 }).unwrap();
        assert!(arm.at_desired_position().unwrap());
        assert!(!arm.at_position(ArmPosition::Intake).unwrap());
    }

    #[test]
    fn test_nudge_round_trip() {
        let mut arm = initialised();
        arm.go_to_position(ArmPosition::ScoreMidHigh).unwrap();

        let original = arm.position_deg(ArmPosition::ScoreMidHigh).unwrap();

        let further = arm.nudge(NudgeDirection::Further).unwrap();
        assert!((further - (original + 0.5)).abs() < 1e-12);
        assert_eq!(arm.goal().unwrap().position, further);

        // Nudges persist in the table
        arm.go_to_position(ArmPosition::Starting).unwrap();
        arm.go_to_position(ArmPosition::ScoreMidHigh).unwrap();
        assert_eq!(arm.goal().unwrap().position, further);

        arm.nudge(NudgeDirection::LessFar).unwrap();
        assert!((arm.position_deg(ArmPosition::ScoreMidHigh).unwrap() - original).abs() < 1e-12);

        // Other positions are untouched
        assert_eq!(arm.position_deg(ArmPosition::ScoreLow).unwrap(), 40.0);
    }

    #[test]
    fn test_feedforward_holds_horizontal() {
        let mut arm = initialised();
        arm.init_control_loop(20.0).unwrap();

        // At rest at horizontal with no error, only gravity compensation
        let (dems, report) = arm.proc(&InputData { angle_deg: 20.0 }).unwrap();

        assert!(report.pid_v.abs() < 1e-12);
        assert!((report.ff_v - 0.4).abs() < 1e-12);
        assert!((dems.voltage_v - 0.4).abs() < 1e-12);
    }
}
