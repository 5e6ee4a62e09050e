//! # Motor controller driver interface
//!
//! Configuration calls report success or failure individually so that
//! initialisation code can count errors and retry the whole sequence.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::DriverError;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Behaviour of a motor when no output is demanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdleMode {
    Brake,
    Coast,
}

/// Direction of a soft limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoftLimitDirection {
    Forward,
    Reverse,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A smart motor controller with an integrated relative encoder.
pub trait MotorController {
    /// Restore the controller's factory configuration.
    fn restore_factory_defaults(&mut self) -> Result<(), DriverError>;

    /// Invert the direction of the motor output.
    fn set_inverted(&mut self, inverted: bool) -> Result<(), DriverError>;

    /// Set the scale factors of the integrated encoder.
    ///
    /// - `position_factor`: output units per motor rotation
    /// - `velocity_factor`: output units per second per motor RPM
    fn set_encoder_conversion_factors(
        &mut self,
        position_factor: f64,
        velocity_factor: f64,
    ) -> Result<(), DriverError>;

    /// Overwrite the integrated encoder's position, in output units.
    fn set_encoder_position(&mut self, position: f64) -> Result<(), DriverError>;

    /// Set a soft limit value in output units.
    fn set_soft_limit(
        &mut self,
        direction: SoftLimitDirection,
        limit: f64,
    ) -> Result<(), DriverError>;

    /// Enable or disable a soft limit.
    fn enable_soft_limit(
        &mut self,
        direction: SoftLimitDirection,
        enable: bool,
    ) -> Result<(), DriverError>;

    /// Set the idle mode.
    fn set_idle_mode(&mut self, mode: IdleMode) -> Result<(), DriverError>;

    /// Set the current limit.
    ///
    /// Units: amps
    fn set_current_limit(&mut self, limit_a: u32) -> Result<(), DriverError>;

    /// Persist the current configuration to non-volatile memory.
    fn burn_flash(&mut self) -> Result<(), DriverError>;

    /// Demand an output voltage.
    ///
    /// Units: volts
    fn set_voltage(&mut self, voltage_v: f64);

    /// Demand a duty cycle in `[-1, 1]`.
    fn set_duty(&mut self, duty: f64);

    /// Applied output as a duty cycle in `[-1, 1]`.
    fn output(&self) -> f64;
}
