//! # Equipment interface crate.
//!
//! Provides the interfaces between the control core and the equipment it
//! drives: motor controllers, sensors, the drivebase, the match clock and the
//! telemetry sink. Only types and traits live here, implementations are either
//! the real drivers or the simulated equipment in `robot_lib::sim`.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Match clock interface
pub mod clock;

/// Swerve drivebase interface and demands
pub mod drive;

/// Motor controller driver interface
pub mod motor;

/// Sensor driver interfaces (absolute encoder, gyroscope)
pub mod sensor;

/// Telemetry sink interface
pub mod tm;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use clock::MatchClock;
pub use drive::{DriveDemand, SwerveDrive};
pub use motor::{IdleMode, MotorController, SoftLimitDirection};
pub use sensor::{AbsoluteEncoder, Gyro};
pub use tm::{TelemetrySink, TmValue};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Error reported by an equipment driver call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DriverError {
    #[error("Device {0} did not respond within the timeout")]
    Timeout(String),

    #[error("Device {0} rejected the parameter {1}")]
    InvalidParameter(String, String),

    #[error("Device {0} reported a hardware fault: {1}")]
    HardwareFault(String, String),
}
