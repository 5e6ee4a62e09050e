//! Swerve drivebase subsystem

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;

use crate::sched::{Subsystem, SubsystemId};
use eqpt_if::{DriveDemand, DriverError, Gyro, IdleMode, SwerveDrive, TelemetrySink};
use util::maths::clamp;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

pub const DRIVE: SubsystemId = SubsystemId("drive");

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The swerve drivebase and the gyroscope mounted on it.
///
/// Demands only last one cycle: the owning command must set a demand every
/// cycle or the drivebase stops.
pub struct Drive {
    swerve: Box<dyn SwerveDrive>,
    gyro: Box<dyn Gyro>,

    /// Demand to send at the next periodic.
    demand: DriveDemand,

    /// Demand sent at the last periodic.
    last_sent: DriveDemand,

    /// Gyro yaw at which the heading reads zero.
    ///
    /// Units: degrees
    heading_offset_deg: f64,

    enabled: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Drive {
    pub fn new(swerve: Box<dyn SwerveDrive>, gyro: Box<dyn Gyro>) -> Self {
        Self {
            swerve,
            gyro,
            demand: DriveDemand::Stop,
            last_sent: DriveDemand::Stop,
            heading_offset_deg: 0.0,
            enabled: false,
        }
    }

    /// Drive with normalised velocities, each clamped to `[-1, 1]`.
    pub fn drive(&mut self, x_norm: f64, y_norm: f64, rot_norm: f64, field_relative: bool) {
        self.demand = DriveDemand::Velocity {
            x_norm: clamp(x_norm, -1.0, 1.0),
            y_norm: clamp(y_norm, -1.0, 1.0),
            rot_norm: clamp(rot_norm, -1.0, 1.0),
            field_relative,
        };
    }

    /// Lock the wheels in an X.
    pub fn set_x(&mut self) {
        self.demand = DriveDemand::LockX;
    }

    pub fn stop(&mut self) {
        self.demand = DriveDemand::Stop;
    }

    /// Set a demand computed elsewhere.
    pub fn set_demand(&mut self, demand: DriveDemand) {
        match demand {
            DriveDemand::Velocity {
                x_norm,
                y_norm,
                rot_norm,
                field_relative,
            } => self.drive(x_norm, y_norm, rot_norm, field_relative),
            d => self.demand = d,
        }
    }

    pub fn last_demand(&self) -> DriveDemand {
        self.last_sent
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_turning_idle_mode(&mut self, mode: IdleMode) -> Result<(), DriverError> {
        self.swerve.set_turning_idle_mode(mode)
    }

    // ---- ATTITUDE ----

    /// Units: degrees, positive nose up
    pub fn pitch_deg(&self) -> f64 {
        self.gyro.pitch_deg()
    }

    pub fn gyro_healthy(&self) -> bool {
        self.gyro.is_healthy()
    }

    /// Heading relative to the last offset.
    ///
    /// Units: degrees
    pub fn heading_deg(&self) -> f64 {
        self.gyro.yaw_deg() - self.heading_offset_deg
    }

    /// Make the current heading read `heading_deg`.
    pub fn offset_current_heading(&mut self, heading_deg: f64) {
        self.heading_offset_deg = self.gyro.yaw_deg() - heading_deg;
        debug!("Heading offset set to {:.2} deg", self.heading_offset_deg);
    }

    pub fn report(&self, tm: &mut dyn TelemetrySink) {
        tm.put_number("Drive/Pitch (deg)", self.pitch_deg());
        tm.put_number("Drive/Heading (deg)", self.heading_deg());
        tm.put_bool("Drive/Gyro healthy", self.gyro_healthy());

        let (demand, x_norm) = match self.last_sent {
            DriveDemand::Stop => ("STOP", 0.0),
            DriveDemand::Velocity { x_norm, .. } => ("VELOCITY", x_norm),
            DriveDemand::LockX => ("LOCK_X", 0.0),
        };
        tm.put_string("Drive/Demand", demand);
        tm.put_number("Drive/X (norm)", x_norm);
    }
}

impl Subsystem for Drive {
    fn id(&self) -> SubsystemId {
        DRIVE
    }

    fn periodic(&mut self) {
        let demand = if self.enabled {
            self.demand
        } else {
            DriveDemand::Stop
        };

        self.swerve.drive(&demand);
        self.last_sent = demand;
        self.demand = DriveDemand::Stop;
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{SimGyro, SimSwerve};

    fn drive() -> (Drive, SimSwerve, SimGyro) {
        let swerve = SimSwerve::new();
        let gyro = SimGyro::new();
        let mut drive = Drive::new(Box::new(swerve.clone()), Box::new(gyro.clone()));
        drive.set_enabled(true);

        (drive, swerve, gyro)
    }

    #[test]
    fn test_demand_lasts_one_cycle() {
        let (mut drive, swerve, _) = drive();

        drive.drive(2.0, -0.5, 0.0, true);
        drive.periodic();
        assert_eq!(
            swerve.demand(),
            DriveDemand::Velocity {
                x_norm: 1.0,
                y_norm: -0.5,
                rot_norm: 0.0,
                field_relative: true
            }
        );

        // Nothing refreshed the demand
        drive.periodic();
        assert_eq!(swerve.demand(), DriveDemand::Stop);

        drive.set_x();
        drive.periodic();
        assert_eq!(swerve.demand(), DriveDemand::LockX);
        assert_eq!(drive.last_demand(), DriveDemand::LockX);
        assert_eq!(swerve.snapshot().num_demands, 3);
    }

    #[test]
    fn test_disabled_stops() {
        let (mut drive, swerve, _) = drive();
        drive.set_enabled(false);

        drive.set_x();
        drive.periodic();
        assert_eq!(swerve.demand(), DriveDemand::Stop);
    }

    #[test]
    fn test_heading_offset() {
        let (mut drive, _, gyro) = drive();

        gyro.set_yaw(30.0);
        gyro.set_pitch(-4.0);
        assert_eq!(drive.heading_deg(), 30.0);
        assert_eq!(drive.pitch_deg(), -4.0);

        drive.offset_current_heading(0.0);
        assert_eq!(drive.heading_deg(), 0.0);

        gyro.set_yaw(45.0);
        assert_eq!(drive.heading_deg(), 15.0);
    }
}
