//! Arm subsystem

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};

use crate::{
    arm_ctrl::{self, ArmCtrl, ArmCtrlError, ArmDems, ArmPosition, NudgeDirection},
    hw_init::{check, init_with_retry, HwInitError},
    sched::{Subsystem, SubsystemId},
};
use eqpt_if::{
    AbsoluteEncoder, DriverError, IdleMode, MotorController, SoftLimitDirection, TelemetrySink,
};
use util::{module::State, raise_error};

use super::{ScoreHeight, ScoringLocation};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

pub const ARM: SubsystemId = SubsystemId("arm");

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The arm pivot, its motor, absolute encoder and control loop.
pub struct Arm {
    motor: Box<dyn MotorController>,
    encoder: Box<dyn AbsoluteEncoder>,

    ctrl: ArmCtrl,

    score_loc: ScoringLocation,
    cancelled_score: bool,

    /// Absolute encoder reading at the arm's zero angle.
    ///
    /// Units: degrees
    zero_offset_deg: f64,

    /// Demands from the last control loop cycle.
    dems: ArmDems,

    /// If false zero volts are written to the motor.
    enabled: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Arm {
    /// Create the arm and start its control loop holding the measured angle.
    ///
    /// The motor controller is not configured, call `init_hardware` for that.
    pub fn new(
        motor: Box<dyn MotorController>,
        encoder: Box<dyn AbsoluteEncoder>,
        params: arm_ctrl::Params,
    ) -> Result<Self, ArmCtrlError> {
        let zero_offset_deg = params.abs_encoder_zero_deg;

        let mut ctrl = ArmCtrl::default();
        ctrl.init(params)?;

        let mut arm = Self {
            motor,
            encoder,
            ctrl,
            score_loc: ScoringLocation::default(),
            cancelled_score: false,
            zero_offset_deg,
            dems: ArmDems::default(),
            enabled: false,
        };
        arm.ctrl.init_control_loop(arm.angle_deg())?;

        Ok(arm)
    }

    // ---- HARDWARE ----

    /// Configure the motor controller, retrying the whole sequence up to
    /// `attempts` times.
    pub fn init_hardware(&mut self, attempts: u32) -> Result<(), HwInitError> {
        init_with_retry("Arm motor", || self.configure(), attempts)
    }

    /// Persist the motor controller configuration across power cycles.
    pub fn burn_flash(&mut self) -> Result<(), DriverError> {
        self.motor.burn_flash()
    }

    /// Configure the hardware then restart the control loop from the measured
    /// angle.
    pub fn initialize(&mut self, attempts: u32) -> Result<(), HwInitError> {
        self.init_hardware(attempts)?;
        self.init_control_loop();
        Ok(())
    }

    pub fn set_idle_mode(&mut self, mode: IdleMode) -> Result<(), DriverError> {
        self.motor.set_idle_mode(mode)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Run the configuration sequence once, true if every call succeeded.
    fn configure(&mut self) -> bool {
        let motor_params = self.ctrl.params.motor.clone();
        let mut errors = 0;

        errors += check(self.motor.restore_factory_defaults());

        errors += check(self.encoder.set_inverted(motor_params.abs_encoder_inverted));
        errors += check(self.motor.set_inverted(motor_params.motor_inverted));

        let abs_deg_per_rot = 360.0 / motor_params.abs_encoder_gear_ratio;
        errors += check(
            self.encoder
                .set_conversion_factors(abs_deg_per_rot, abs_deg_per_rot),
        );

        // The relative encoder counts motor rotations and reports velocity
        // per minute
        let angle_deg = self.angle_deg();
        errors += check(self.motor.set_encoder_position(angle_deg));
        let rel_deg_per_rot = 360.0 / motor_params.motor_gear_ratio;
        errors += check(
            self.motor
                .set_encoder_conversion_factors(rel_deg_per_rot, rel_deg_per_rot / 60.0),
        );

        for (direction, limit_deg) in &[
            (SoftLimitDirection::Forward, motor_params.forward_soft_limit_deg),
            (SoftLimitDirection::Reverse, motor_params.reverse_soft_limit_deg),
        ] {
            errors += check(self.motor.set_soft_limit(*direction, *limit_deg));
            errors += check(
                self.motor
                    .enable_soft_limit(*direction, motor_params.soft_limits_enabled),
            );
        }

        errors += check(self.motor.set_idle_mode(IdleMode::Brake));
        errors += check(self.motor.set_current_limit(motor_params.current_limit_a));

        errors == 0
    }

    // ---- ANGLES ----

    /// Raw absolute encoder reading.
    ///
    /// Units: degrees
    pub fn abs_position_deg(&self) -> f64 {
        self.encoder.position_deg()
    }

    /// Arm angle with the zero offset applied.
    ///
    /// Units: degrees
    pub fn angle_deg(&self) -> f64 {
        self.encoder.position_deg() - self.zero_offset_deg
    }

    /// Arm angle above horizontal.
    ///
    /// Units: degrees
    pub fn angle_rel_horizontal_deg(&self) -> f64 {
        self.angle_deg() - self.ctrl.params.horizontal_pos_deg
    }

    /// Use the current absolute reading as the arm's zero.
    pub fn zero_at_current_pos(&mut self) {
        self.zero_offset_deg = self.encoder.position_deg();
        info!("New zero for arm: {:.3} deg", self.zero_offset_deg);
    }

    pub fn zero_offset_deg(&self) -> f64 {
        self.zero_offset_deg
    }

    // ---- POSITION CONTROL ----

    /// Restart the profile from the measured angle and hold it there.
    pub fn init_control_loop(&mut self) {
        let angle_deg = self.angle_deg();
        if let Err(e) = self.ctrl.init_control_loop(angle_deg) {
            raise_error!("Could not reset the arm control loop: {}", e);
        }
    }

    pub fn go_to_position(&mut self, pos: ArmPosition) {
        if let Err(e) = self.ctrl.go_to_position(pos) {
            raise_error!("{}", e);
        }
    }

    /// Goal of the profiled controller.
    ///
    /// Units: degrees
    pub fn goal_deg(&self) -> f64 {
        self.ctrl.goal().map(|g| g.position).unwrap_or_default()
    }

    pub fn desired_position(&self) -> ArmPosition {
        self.ctrl.desired_position()
    }

    /// True if the measured angle is within tolerance of the position.
    pub fn at_position(&self, pos: ArmPosition) -> bool {
        match self.ctrl.within_tolerance(self.angle_deg(), pos) {
            Ok(at) => at,
            Err(e) => raise_error!("{}", e),
        }
    }

    pub fn at_desired_position(&self) -> bool {
        self.at_position(self.desired_position())
    }

    /// Move to the scoring position for the selected height.
    pub fn start_score(&mut self) {
        self.go_to_position(self.score_position());
    }

    /// Move to the scoring position for the selected height, for the operator.
    pub fn manual_prep_score(&mut self) {
        self.go_to_position(self.score_position());
    }

    /// Adjust the desired position's angle by one step.
    pub fn nudge(&mut self, direction: NudgeDirection) {
        if let Err(e) = self.ctrl.nudge(direction) {
            raise_error!("{}", e);
        }
    }

    /// Target angle of a position.
    ///
    /// Units: degrees
    pub fn position_deg(&self, pos: ArmPosition) -> f64 {
        match self.ctrl.position_deg(pos) {
            Ok(angle_deg) => angle_deg,
            Err(e) => raise_error!("{}", e),
        }
    }

    fn score_position(&self) -> ArmPosition {
        // Low is the same angle for every column
        match self.score_loc.height {
            ScoreHeight::Low => ArmPosition::ScoreLow,
            ScoreHeight::Mid | ScoreHeight::High => ArmPosition::ScoreMidHigh,
        }
    }

    // ---- SCORING LOCATION ----

    pub fn score_loc(&self) -> ScoringLocation {
        self.score_loc
    }

    pub fn score_height(&self) -> ScoreHeight {
        self.score_loc.height
    }

    pub fn set_score_height(&mut self, height: ScoreHeight) {
        self.score_loc.height = height;
    }

    pub fn set_score_loc(&mut self, score_loc: ScoringLocation) {
        self.score_loc = score_loc;
    }

    pub fn cancel_score(&mut self) {
        self.set_cancel_score(true);
    }

    pub fn set_cancel_score(&mut self, cancel: bool) {
        self.cancelled_score = cancel;
    }

    pub fn cancelled_score(&self) -> bool {
        self.cancelled_score
    }

    // ---- TELEMETRY ----

    /// Voltage from the last control loop cycle.
    pub fn dems(&self) -> ArmDems {
        self.dems
    }

    pub fn report(&self, tm: &mut dyn TelemetrySink) {
        let report = self.ctrl.report();

        tm.put_number("Arm/Abs Position (deg)", self.abs_position_deg());
        tm.put_number("Arm/Angle (deg)", self.angle_deg());
        tm.put_number(
            "Arm/Angle Relative to Horizontal (deg)",
            self.angle_rel_horizontal_deg(),
        );
        tm.put_number("Arm/Vel (deg per s)", self.encoder.velocity_degs());
        tm.put_number("Arm/Output", self.motor.output());
        tm.put_number("Arm/Goal (deg)", report.goal_deg);
        tm.put_number("Arm/Setpoint (deg)", report.setpoint_deg);
        tm.put_number("Arm/PID (V)", report.pid_v);
        tm.put_number("Arm/FF (V)", report.ff_v);
        tm.put_string("Arm/Desired position", &self.desired_position().to_string());
        tm.put_bool("Arm/At desired position", self.at_desired_position());
        tm.put_string("Arm/Score Loc Height", &self.score_loc.height.to_string());
        tm.put_string("Arm/Score Loc Col", &self.score_loc.col.to_string());
        tm.put_bool("Arm/Is cancelled", self.cancelled_score);
    }
}

impl Subsystem for Arm {
    fn id(&self) -> SubsystemId {
        ARM
    }

    /// Approach the desired position.
    fn periodic(&mut self) {
        let input = arm_ctrl::InputData {
            angle_deg: self.angle_deg(),
        };

        self.dems = match self.ctrl.proc(&input) {
            Ok((dems, _)) => dems,
            Err(e) => {
                warn!("Error during ArmCtrl processing: {}", e);
                ArmDems::default()
            }
        };

        let voltage_v = if self.enabled {
            self.dems.voltage_v
        } else {
            0.0
        };
        self.motor.set_voltage(voltage_v);
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
