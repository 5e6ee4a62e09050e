//! Game piece grabber subsystem

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{
    hw_init::{check, init_with_retry, HwInitError},
    sched::{Subsystem, SubsystemId},
};
use eqpt_if::{DriverError, IdleMode, MotorController, TelemetrySink};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

pub const GRABBER: SubsystemId = SubsystemId("grabber");

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the grabber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrabberParams {
    /// Duty cycle used to pull a game piece in.
    pub intake_duty: f64,

    /// Duty cycle magnitude used to push a game piece out.
    pub eject_duty: f64,

    pub motor_inverted: bool,

    /// Units: amps
    pub current_limit_a: u32,
}

/// Roller grabber driven by a single motor.
pub struct Grabber {
    motor: Box<dyn MotorController>,
    params: GrabberParams,

    /// Demanded duty cycle, held until changed.
    duty: f64,

    enabled: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for GrabberParams {
    fn default() -> Self {
        Self {
            intake_duty: 0.6,
            eject_duty: 0.8,
            motor_inverted: false,
            current_limit_a: 20,
        }
    }
}

impl Grabber {
    pub fn new(motor: Box<dyn MotorController>, params: GrabberParams) -> Self {
        Self {
            motor,
            params,
            duty: 0.0,
            enabled: false,
        }
    }

    pub fn init_hardware(&mut self, attempts: u32) -> Result<(), HwInitError> {
        init_with_retry("Grabber motor", || self.configure(), attempts)
    }

    pub fn burn_flash(&mut self) -> Result<(), DriverError> {
        self.motor.burn_flash()
    }

    fn configure(&mut self) -> bool {
        let mut errors = 0;

        errors += check(self.motor.restore_factory_defaults());
        errors += check(self.motor.set_inverted(self.params.motor_inverted));
        errors += check(self.motor.set_idle_mode(IdleMode::Brake));
        errors += check(self.motor.set_current_limit(self.params.current_limit_a));

        errors == 0
    }

    pub fn intake(&mut self) {
        self.duty = self.params.intake_duty;
    }

    pub fn outtake(&mut self) {
        self.duty = -self.params.eject_duty;
    }

    pub fn stop_motors(&mut self) {
        self.duty = 0.0;
    }

    pub fn duty(&self) -> f64 {
        self.duty
    }

    pub fn set_idle_mode(&mut self, mode: IdleMode) -> Result<(), DriverError> {
        self.motor.set_idle_mode(mode)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn report(&self, tm: &mut dyn TelemetrySink) {
        tm.put_number("Grabber/Demand", self.duty);
        tm.put_number("Grabber/Output", self.motor.output());
    }
}

impl Subsystem for Grabber {
    fn id(&self) -> SubsystemId {
        GRABBER
    }

    fn periodic(&mut self) {
        let duty = if self.enabled { self.duty } else { 0.0 };
        self.motor.set_duty(duty);
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::SimMotor;

    #[test]
    fn test_grabber() {
        let motor = SimMotor::new("grabber");
        let mut grabber = Grabber::new(Box::new(motor.clone()), GrabberParams::default());

        grabber.init_hardware(1).unwrap();
        assert_eq!(motor.snapshot().current_limit_a, 20);

        // Demands are held but not written while disabled
        grabber.outtake();
        grabber.periodic();
        assert_eq!(motor.snapshot().duty, 0.0);

        grabber.set_enabled(true);
        grabber.periodic();
        assert_eq!(motor.snapshot().duty, -0.8);
        grabber.periodic();
        assert_eq!(motor.snapshot().duty, -0.8);

        grabber.intake();
        grabber.periodic();
        assert_eq!(motor.snapshot().duty, 0.6);

        grabber.stop_motors();
        grabber.periodic();
        assert_eq!(motor.snapshot().duty, 0.0);
    }
}
