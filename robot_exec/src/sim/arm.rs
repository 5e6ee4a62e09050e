//! Simulated single-joint arm

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::SimMotor;
use eqpt_if::{AbsoluteEncoder, DriverError};
use util::maths::deg_to_rad;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of integration steps per call to `SimArm::step`.
const NUM_SUBSTEPS: u32 = 20;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Physical model of the simulated arm.
///
/// `V = gravity_v * cos(theta) + k_v * w + k_a * dw/dt`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimArmParams {
    /// Voltage needed to hold the arm horizontal.
    ///
    /// Units: volts
    pub gravity_v: f64,

    /// Units: volts/(radian/second)
    pub k_v_vsrad: f64,

    /// Units: volts/(radian/second^2)
    pub k_a_vssrad: f64,

    /// Arm angle at which the arm is horizontal.
    ///
    /// Units: degrees
    pub horizontal_pos_deg: f64,

    /// Hard stops.
    ///
    /// Units: degrees
    pub min_angle_deg: f64,
    pub max_angle_deg: f64,

    /// Reading of the absolute encoder when the arm angle is zero.
    ///
    /// Units: degrees
    pub encoder_zero_deg: f64,
}

#[derive(Debug, Default)]
struct SimArmState {
    /// Units: degrees
    angle_deg: f64,

    /// Units: degrees/second
    vel_degs: f64,

    /// Last reading published by the encoder, frozen while unhealthy.
    reading_deg: f64,
    reading_degs: f64,

    encoder_healthy: bool,
}

/// The arm plant, driven by the voltage demanded of its motor.
pub struct SimArm {
    state: Rc<RefCell<SimArmState>>,
    motor: SimMotor,
    params: SimArmParams,
}

/// Absolute encoder mounted on a [`SimArm`].
pub struct SimAbsEncoder {
    state: Rc<RefCell<SimArmState>>,
    inverted: bool,
    factors: (f64, f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimArmParams {
    fn default() -> Self {
        Self {
            gravity_v: 0.4,
            k_v_vsrad: 0.8,
            k_a_vssrad: 0.05,
            horizontal_pos_deg: 20.0,
            min_angle_deg: -5.0,
            max_angle_deg: 120.0,
            encoder_zero_deg: 0.0,
        }
    }
}

impl SimArm {
    /// Create an arm at rest at the given angle, driven by `motor`.
    pub fn new(motor: SimMotor, params: SimArmParams, initial_angle_deg: f64) -> Self {
        let reading_deg = initial_angle_deg + params.encoder_zero_deg;

        Self {
            state: Rc::new(RefCell::new(SimArmState {
                angle_deg: initial_angle_deg,
                vel_degs: 0.0,
                reading_deg,
                reading_degs: 0.0,
                encoder_healthy: true,
            })),
            motor,
            params,
        }
    }

    /// The arm's absolute encoder.
    pub fn encoder(&self) -> SimAbsEncoder {
        SimAbsEncoder {
            state: self.state.clone(),
            inverted: false,
            factors: (1.0, 1.0),
        }
    }

    /// True arm angle.
    pub fn angle_deg(&self) -> f64 {
        self.state.borrow().angle_deg
    }

    pub fn vel_degs(&self) -> f64 {
        self.state.borrow().vel_degs
    }

    /// While unhealthy the encoder keeps publishing its last reading.
    pub fn set_encoder_healthy(&self, healthy: bool) {
        self.state.borrow_mut().encoder_healthy = healthy;
    }

    /// Advance the plant by `dt_s` seconds with the motor's current voltage.
    pub fn step(&mut self, dt_s: f64) {
        let voltage_v = self.motor.voltage_v();
        let h = dt_s / NUM_SUBSTEPS as f64;
        let p = &self.params;

        let mut state = self.state.borrow_mut();

        for _ in 0..NUM_SUBSTEPS {
            let theta_rad = deg_to_rad(state.angle_deg - p.horizontal_pos_deg);
            let w_rads = deg_to_rad(state.vel_degs);

            let accel_radss =
                (voltage_v - p.gravity_v * theta_rad.cos() - p.k_v_vsrad * w_rads) / p.k_a_vssrad;

            state.vel_degs += accel_radss.to_degrees() * h;
            state.angle_deg += state.vel_degs * h;

            if state.angle_deg < p.min_angle_deg {
                state.angle_deg = p.min_angle_deg;
                state.vel_degs = state.vel_degs.max(0.0);
            }
            if state.angle_deg > p.max_angle_deg {
                state.angle_deg = p.max_angle_deg;
                state.vel_degs = state.vel_degs.min(0.0);
            }
        }

        if state.encoder_healthy {
            state.reading_deg = state.angle_deg + p.encoder_zero_deg;
            state.reading_degs = state.vel_degs;
        }
    }
}

impl SimAbsEncoder {
    /// Inversion setting last applied by the driver.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Conversion factors last applied by the driver.
    pub fn factors(&self) -> (f64, f64) {
        self.factors
    }
}

impl AbsoluteEncoder for SimAbsEncoder {
    // The simulated encoder already reads the arm angle in degrees, inversion
    // and conversion factors are recorded but not applied.

    fn position_deg(&self) -> f64 {
        self.state.borrow().reading_deg
    }

    fn velocity_degs(&self) -> f64 {
        self.state.borrow().reading_degs
    }

    fn set_inverted(&mut self, inverted: bool) -> Result<(), DriverError> {
        self.inverted = inverted;
        Ok(())
    }

    fn set_conversion_factors(
        &mut self,
        position_factor: f64,
        velocity_factor: f64,
    ) -> Result<(), DriverError> {
        self.factors = (position_factor, velocity_factor);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.state.borrow().encoder_healthy
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use eqpt_if::MotorController;

    #[test]
    fn test_arm_holds_with_gravity_voltage() {
        let mut motor = SimMotor::new("arm");
        let mut arm = SimArm::new(motor.clone(), SimArmParams::default(), 20.0);

        // At horizontal the gravity voltage holds the arm still
        motor.set_voltage(0.4);
        for _ in 0..50 {
            arm.step(0.02);
        }
        assert!((arm.angle_deg() - 20.0).abs() < 1e-6);

        // Unpowered it falls onto the lower stop
        motor.set_voltage(0.0);
        for _ in 0..200 {
            arm.step(0.02);
        }
        assert_eq!(arm.angle_deg(), -5.0);
    }

    #[test]
    fn test_stale_encoder_holds_last_reading() {
        let mut motor = SimMotor::new("arm");
        let mut arm = SimArm::new(motor.clone(), SimArmParams::default(), 20.0);
        let encoder = arm.encoder();

        arm.set_encoder_healthy(false);
        motor.set_voltage(0.0);
        for _ in 0..10 {
            arm.step(0.02);
        }

        assert!(!encoder.is_healthy());
        assert_eq!(encoder.position_deg(), 20.0);
        assert!(arm.angle_deg() < 20.0);
    }
}
