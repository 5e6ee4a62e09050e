//! Simulated motor controller

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::cell::RefCell;
use std::rc::Rc;

use eqpt_if::{DriverError, IdleMode, MotorController, SoftLimitDirection};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Voltage corresponding to a duty cycle of 1.
pub const NOMINAL_BATTERY_V: f64 = 12.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Everything a simulated motor controller has been told.
#[derive(Debug, Clone, Default)]
pub struct SimMotorState {
    pub name: String,

    /// Units: volts
    pub voltage_v: f64,
    pub duty: f64,

    pub idle_mode: Option<IdleMode>,
    pub inverted: bool,
    pub encoder_factors: (f64, f64),
    pub encoder_position: f64,
    pub forward_soft_limit: Option<(f64, bool)>,
    pub reverse_soft_limit: Option<(f64, bool)>,

    /// Units: amps
    pub current_limit_a: u32,

    /// Number of times the configuration has been persisted.
    pub num_flash_burns: u32,

    /// Number of configuration calls received, including failed ones.
    pub num_config_calls: u32,

    /// Number of upcoming configuration calls which will fail.
    pub failures_remaining: u32,
}

/// Handle onto a simulated motor controller.
#[derive(Debug, Clone)]
pub struct SimMotor {
    state: Rc<RefCell<SimMotorState>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimMotor {
    pub fn new(name: &str) -> Self {
        Self::failing(name, 0)
    }

    /// A motor whose next `failures` configuration calls report a timeout.
    pub fn failing(name: &str, failures: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimMotorState {
                name: name.to_string(),
                failures_remaining: failures,
                ..Default::default()
            })),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SimMotorState {
        self.state.borrow().clone()
    }

    /// Demanded voltage.
    pub fn voltage_v(&self) -> f64 {
        self.state.borrow().voltage_v
    }

    fn configure<F>(&mut self, f: F) -> Result<(), DriverError>
    where
        F: FnOnce(&mut SimMotorState),
    {
        let mut state = self.state.borrow_mut();
        state.num_config_calls += 1;

        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(DriverError::Timeout(state.name.clone()));
        }

        f(&mut *state);
        Ok(())
    }
}

impl MotorController for SimMotor {
    fn restore_factory_defaults(&mut self) -> Result<(), DriverError> {
        self.configure(|s| {
            s.idle_mode = None;
            s.inverted = false;
            s.encoder_factors = (1.0, 1.0);
            s.forward_soft_limit = None;
            s.reverse_soft_limit = None;
            s.current_limit_a = 0;
        })
    }

    fn set_inverted(&mut self, inverted: bool) -> Result<(), DriverError> {
        self.configure(|s| s.inverted = inverted)
    }

    fn set_encoder_conversion_factors(
        &mut self,
        position_factor: f64,
        velocity_factor: f64,
    ) -> Result<(), DriverError> {
        self.configure(|s| s.encoder_factors = (position_factor, velocity_factor))
    }

    fn set_encoder_position(&mut self, position: f64) -> Result<(), DriverError> {
        self.configure(|s| s.encoder_position = position)
    }

    fn set_soft_limit(
        &mut self,
        direction: SoftLimitDirection,
        limit: f64,
    ) -> Result<(), DriverError> {
        self.configure(|s| {
            let slot = match direction {
                SoftLimitDirection::Forward => &mut s.forward_soft_limit,
                SoftLimitDirection::Reverse => &mut s.reverse_soft_limit,
            };
            let enabled = slot.map(|(_, e)| e).unwrap_or(false);
            *slot = Some((limit, enabled));
        })
    }

    fn enable_soft_limit(
        &mut self,
        direction: SoftLimitDirection,
        enable: bool,
    ) -> Result<(), DriverError> {
        self.configure(|s| {
            let slot = match direction {
                SoftLimitDirection::Forward => &mut s.forward_soft_limit,
                SoftLimitDirection::Reverse => &mut s.reverse_soft_limit,
            };
            let limit = slot.map(|(l, _)| l).unwrap_or(0.0);
            *slot = Some((limit, enable));
        })
    }

    fn set_idle_mode(&mut self, mode: IdleMode) -> Result<(), DriverError> {
        self.configure(|s| s.idle_mode = Some(mode))
    }

    fn set_current_limit(&mut self, limit_a: u32) -> Result<(), DriverError> {
        self.configure(|s| s.current_limit_a = limit_a)
    }

    fn burn_flash(&mut self) -> Result<(), DriverError> {
        self.configure(|s| s.num_flash_burns += 1)
    }

    fn set_voltage(&mut self, voltage_v: f64) {
        let mut s = self.state.borrow_mut();
        s.voltage_v = voltage_v;
        s.duty = voltage_v / NOMINAL_BATTERY_V;
    }

    fn set_duty(&mut self, duty: f64) {
        let mut s = self.state.borrow_mut();
        s.duty = duty;
        s.voltage_v = duty * NOMINAL_BATTERY_V;
    }

    fn output(&self) -> f64 {
        self.state.borrow().duty
    }
}
