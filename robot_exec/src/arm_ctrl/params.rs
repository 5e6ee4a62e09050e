//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{ArmCtrlError, ArmFeedforward, PidGains, PositionsDeg};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- CONTROLLER ----
    /// Gains of the position controller.
    ///
    /// Units: volts/degree, volts/(degree second), volts/(degree/second)
    pub gains: PidGains,

    /// Maximum velocity of the profiled setpoint.
    ///
    /// Units: degrees/second
    pub max_vel_degs: f64,

    /// Maximum acceleration of the profiled setpoint.
    ///
    /// Units: degrees/second^2
    pub max_accel_degss: f64,

    /// Maximum error at which the arm is considered to be at a position.
    ///
    /// Units: degrees
    pub tolerance_deg: f64,

    /// Gravity, friction and velocity feedforward.
    pub feedforward: ArmFeedforward,

    // ---- GEOMETRY ----
    /// Absolute encoder reading at the arm's zero angle. Replaced at runtime by
    /// zeroing the arm at its current position.
    ///
    /// Units: degrees
    pub abs_encoder_zero_deg: f64,

    /// Arm angle at which the arm is horizontal.
    ///
    /// Units: degrees
    pub horizontal_pos_deg: f64,

    /// Step applied to a position's angle by one nudge.
    ///
    /// Units: degrees
    pub nudge_step_deg: f64,

    /// Target angles of the named positions.
    pub positions_deg: PositionsDeg,

    // ---- MOTOR ----
    pub motor: MotorParams,
}

/// Configuration applied to the arm motor controller at startup.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MotorParams {
    pub motor_inverted: bool,

    pub abs_encoder_inverted: bool,

    /// Reduction between the motor and the arm.
    pub motor_gear_ratio: f64,

    /// Reduction between the absolute encoder and the arm.
    pub abs_encoder_gear_ratio: f64,

    /// Units: degrees
    pub forward_soft_limit_deg: f64,

    /// Units: degrees
    pub reverse_soft_limit_deg: f64,

    pub soft_limits_enabled: bool,

    /// Units: amps
    pub current_limit_a: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the parameters can drive a controller.
    pub fn validate(&self) -> Result<(), ArmCtrlError> {
        if !(self.max_vel_degs > 0.0) {
            return Err(ArmCtrlError::InvalidParams(format!(
                "max_vel_degs must be positive, got {}",
                self.max_vel_degs
            )));
        }
        if !(self.max_accel_degss > 0.0) {
            return Err(ArmCtrlError::InvalidParams(format!(
                "max_accel_degss must be positive, got {}",
                self.max_accel_degss
            )));
        }
        if self.tolerance_deg < 0.0 {
            return Err(ArmCtrlError::InvalidParams(format!(
                "tolerance_deg must not be negative, got {}",
                self.tolerance_deg
            )));
        }

        Ok(())
    }
}
