//! The full set of simulated equipment for one robot

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{
    SimArm, SimArmParams, SimChargeStation, SimChargeStationParams, SimGyro, SimMatchClock,
    SimMotor, SimSwerve,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the simulated robot and field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimParams {
    pub arm: SimArmParams,

    /// Units: degrees
    pub arm_initial_angle_deg: f64,

    /// Number of arm motor configuration calls which fail at startup.
    pub arm_motor_config_failures: u32,

    pub charge_station: SimChargeStationParams,

    /// Position of the robot along the charge station at startup.
    ///
    /// Units: meters
    pub robot_initial_pos_m: f64,
}

/// Handles onto every simulated device.
///
/// Clones of the handles are boxed and given to the subsystems, these are
/// kept to step the plants and inspect the devices.
pub struct SimEquipment {
    pub arm_motor: SimMotor,
    pub arm: SimArm,
    pub grabber_motor: SimMotor,
    pub swerve: SimSwerve,
    pub gyro: SimGyro,
    pub clock: SimMatchClock,
    pub station: SimChargeStation,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimEquipment {
    pub fn new(params: &SimParams) -> Self {
        let arm_motor = SimMotor::failing("arm", params.arm_motor_config_failures);
        let arm = SimArm::new(
            arm_motor.clone(),
            params.arm.clone(),
            params.arm_initial_angle_deg,
        );

        let swerve = SimSwerve::new();
        let gyro = SimGyro::new();
        let station = SimChargeStation::new(
            params.charge_station.clone(),
            gyro.clone(),
            swerve.clone(),
            params.robot_initial_pos_m,
        );

        Self {
            arm_motor,
            arm,
            grabber_motor: SimMotor::new("grabber"),
            swerve,
            gyro,
            clock: SimMatchClock::new(0.0),
            station,
        }
    }

    /// Advance every plant and the match clock by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        self.arm.step(dt_s);
        self.station.step(dt_s);
        self.clock.advance(dt_s);
    }
}
