//! # Sensor driver interfaces
//!
//! Sensors are polled. A driver returns its last known value if the device
//! hasn't produced a fresh one, callers which care about freshness check
//! `is_healthy`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::DriverError;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// An absolute (duty cycle) encoder.
pub trait AbsoluteEncoder {
    /// Position reading after the conversion factor.
    ///
    /// Units: degrees
    fn position_deg(&self) -> f64;

    /// Velocity reading after the conversion factor.
    ///
    /// Units: degrees/second
    fn velocity_degs(&self) -> f64;

    /// Invert the direction of the reading.
    fn set_inverted(&mut self, inverted: bool) -> Result<(), DriverError>;

    /// Set the scale factors applied to the raw rotation count.
    fn set_conversion_factors(
        &mut self,
        position_factor: f64,
        velocity_factor: f64,
    ) -> Result<(), DriverError>;

    /// True if the last reading was fresh.
    fn is_healthy(&self) -> bool {
        true
    }
}

/// An inertial measurement unit reporting attitude.
pub trait Gyro {
    /// Pitch angle, positive nose up.
    ///
    /// Units: degrees
    fn pitch_deg(&self) -> f64;

    /// Yaw angle, positive anticlockwise.
    ///
    /// Units: degrees
    fn yaw_deg(&self) -> f64;

    /// True if the last reading was fresh.
    fn is_healthy(&self) -> bool {
        true
    }
}
