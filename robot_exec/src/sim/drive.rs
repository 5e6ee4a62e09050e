//! Simulated drivebase, gyroscope and charge station

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use eqpt_if::{DriveDemand, DriverError, Gyro, IdleMode, SwerveDrive};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct SimGyroState {
    pitch_deg: f64,
    yaw_deg: f64,
    healthy: bool,
}

/// Handle onto a simulated gyroscope.
#[derive(Debug, Clone)]
pub struct SimGyro {
    state: Rc<RefCell<SimGyroState>>,
}

/// Everything the simulated drivebase has been told.
#[derive(Debug, Clone, Default)]
pub struct SimSwerveState {
    /// Last demand received.
    pub demand: DriveDemand,

    pub turning_idle_mode: Option<IdleMode>,

    /// Number of demands received.
    pub num_demands: u64,
}

/// Handle onto a simulated swerve drivebase.
#[derive(Debug, Clone, Default)]
pub struct SimSwerve {
    state: Rc<RefCell<SimSwerveState>>,
}

/// Physical model of the charge station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimChargeStationParams {
    /// Robot speed at a normalised velocity of 1.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Tilt of the station when the robot is on one side.
    ///
    /// Units: degrees
    pub max_tilt_deg: f64,

    /// Units: degrees/second
    pub tilt_rate_degs: f64,

    /// Half width of the region around the pivot in which the station is
    /// level.
    ///
    /// Units: meters
    pub balanced_band_m: f64,
}

/// A robot on a charge station.
///
/// The robot position is measured along the station from its pivot, positive
/// forward. When the robot is behind the pivot the station tilts nose up.
pub struct SimChargeStation {
    params: SimChargeStationParams,
    gyro: SimGyro,
    swerve: SimSwerve,

    /// Units: meters
    robot_pos_m: f64,

    /// Units: degrees
    tilt_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimGyro {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(SimGyroState {
                pitch_deg: 0.0,
                yaw_deg: 0.0,
                healthy: true,
            })),
        }
    }
}

impl SimGyro {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pitch(&self, pitch_deg: f64) {
        self.state.borrow_mut().pitch_deg = pitch_deg;
    }

    pub fn set_yaw(&self, yaw_deg: f64) {
        self.state.borrow_mut().yaw_deg = yaw_deg;
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state.borrow_mut().healthy = healthy;
    }
}

impl Gyro for SimGyro {
    fn pitch_deg(&self) -> f64 {
        self.state.borrow().pitch_deg
    }

    fn yaw_deg(&self) -> f64 {
        self.state.borrow().yaw_deg
    }

    fn is_healthy(&self) -> bool {
        self.state.borrow().healthy
    }
}

impl SimSwerve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SimSwerveState {
        self.state.borrow().clone()
    }

    pub fn demand(&self) -> DriveDemand {
        self.state.borrow().demand
    }
}

impl SwerveDrive for SimSwerve {
    fn drive(&mut self, demand: &DriveDemand) {
        let mut state = self.state.borrow_mut();
        state.demand = *demand;
        state.num_demands += 1;
    }

    fn set_turning_idle_mode(&mut self, mode: IdleMode) -> Result<(), DriverError> {
        self.state.borrow_mut().turning_idle_mode = Some(mode);
        Ok(())
    }
}

impl Default for SimChargeStationParams {
    fn default() -> Self {
        Self {
            max_speed_ms: 1.0,
            max_tilt_deg: 15.0,
            tilt_rate_degs: 60.0,
            balanced_band_m: 0.05,
        }
    }
}

impl SimChargeStation {
    /// Place the robot at `robot_pos_m` on a station which has already settled.
    pub fn new(
        params: SimChargeStationParams,
        gyro: SimGyro,
        swerve: SimSwerve,
        robot_pos_m: f64,
    ) -> Self {
        let mut station = Self {
            params,
            gyro,
            swerve,
            robot_pos_m,
            tilt_deg: 0.0,
        };
        station.tilt_deg = station.target_tilt_deg();
        station.gyro.set_pitch(station.tilt_deg);

        station
    }

    pub fn robot_pos_m(&self) -> f64 {
        self.robot_pos_m
    }

    pub fn tilt_deg(&self) -> f64 {
        self.tilt_deg
    }

    /// True if the station is level with the robot inside the balanced band.
    pub fn is_balanced(&self) -> bool {
        self.robot_pos_m.abs() <= self.params.balanced_band_m && self.tilt_deg.abs() < 1e-9
    }

    /// Advance by `dt_s` seconds using the drivebase's last demand.
    pub fn step(&mut self, dt_s: f64) {
        // Only forward motion in the robot frame moves the robot along the
        // station, the heading is assumed to be square to it
        let speed_ms = match self.swerve.demand() {
            DriveDemand::Velocity { x_norm, .. } => x_norm * self.params.max_speed_ms,
            DriveDemand::Stop | DriveDemand::LockX => 0.0,
        };
        self.robot_pos_m += speed_ms * dt_s;

        let target_deg = self.target_tilt_deg();
        let max_change_deg = self.params.tilt_rate_degs * dt_s;
        let change_deg = (target_deg - self.tilt_deg).max(-max_change_deg).min(max_change_deg);
        self.tilt_deg += change_deg;

        self.gyro.set_pitch(self.tilt_deg);
    }

    fn target_tilt_deg(&self) -> f64 {
        if self.robot_pos_m < -self.params.balanced_band_m {
            self.params.max_tilt_deg
        } else if self.robot_pos_m > self.params.balanced_band_m {
            -self.params.max_tilt_deg
        } else {
            0.0
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
