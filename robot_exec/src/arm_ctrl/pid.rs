//! PID controllers
//!
//! [`PidController`] is a plain discrete PID loop with a fixed period.
//! [`ProfiledPid`] wraps one so that its setpoint follows a
//! [`TrapezoidProfile`] towards the goal rather than stepping to it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::profile::{Constraints, ProfileState, TrapezoidProfile};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Proportional, integral and derivative gains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub k_p: f64,
    pub k_i: f64,
    pub k_d: f64,
}

/// A discrete PID controller.
#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,

    /// Period between calls to `calculate`.
    ///
    /// Units: seconds
    period_s: f64,

    /// Bounds on the integral term's contribution to the output.
    integrator_range: (f64, f64),

    /// Error magnitude below which the controller is at its setpoint.
    tolerance: f64,

    setpoint: f64,
    position_error: f64,
    velocity_error: f64,
    total_error: f64,

    /// Error on the previous call, `None` straight after a reset so the first
    /// sample produces no derivative kick.
    prev_error: Option<f64>,
}

/// A PID controller tracking a motion-profiled setpoint.
#[derive(Debug, Clone)]
pub struct ProfiledPid {
    controller: PidController,
    profile: TrapezoidProfile,
    goal: ProfileState,
    setpoint: ProfileState,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {
    pub fn new(gains: PidGains, period_s: f64) -> Self {
        Self {
            gains,
            period_s,
            integrator_range: (-1.0, 1.0),
            tolerance: 0.05,
            setpoint: 0.0,
            position_error: 0.0,
            velocity_error: 0.0,
            total_error: 0.0,
            prev_error: None,
        }
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }

    pub fn set_integrator_range(&mut self, min: f64, max: f64) {
        self.integrator_range = (min, max);
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn position_error(&self) -> f64 {
        self.position_error
    }

    pub fn velocity_error(&self) -> f64 {
        self.velocity_error
    }

    /// True if the last error was within tolerance.
    pub fn at_setpoint(&self) -> bool {
        self.prev_error.is_some() && self.position_error.abs() < self.tolerance
    }

    /// Calculate the controller output for the given measurement and setpoint.
    pub fn calculate(&mut self, measurement: f64, setpoint: f64) -> f64 {
        self.setpoint = setpoint;
        self.position_error = setpoint - measurement;

        self.velocity_error = match self.prev_error {
            Some(prev) => (self.position_error - prev) / self.period_s,
            None => 0.0,
        };
        self.prev_error = Some(self.position_error);

        if self.gains.k_i != 0.0 {
            let (min, max) = self.integrator_range;
            self.total_error = util::maths::clamp(
                self.total_error + self.position_error * self.period_s,
                min / self.gains.k_i,
                max / self.gains.k_i,
            );
        }

        self.gains.k_p * self.position_error
            + self.gains.k_i * self.total_error
            + self.gains.k_d * self.velocity_error
    }

    /// Clear the integral and derivative history.
    pub fn reset(&mut self) {
        self.position_error = 0.0;
        self.velocity_error = 0.0;
        self.total_error = 0.0;
        self.prev_error = None;
    }
}

impl ProfiledPid {
    pub fn new(gains: PidGains, constraints: Constraints, period_s: f64) -> Self {
        Self {
            controller: PidController::new(gains, period_s),
            profile: TrapezoidProfile::new(constraints),
            goal: ProfileState::default(),
            setpoint: ProfileState::default(),
        }
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.controller.set_tolerance(tolerance);
    }

    /// Set a new goal position, with zero velocity at the goal.
    pub fn set_goal(&mut self, position: f64) {
        self.goal = ProfileState::new(position, 0.0);
    }

    pub fn goal(&self) -> ProfileState {
        self.goal
    }

    /// The current profiled setpoint.
    pub fn setpoint(&self) -> ProfileState {
        self.setpoint
    }

    pub fn constraints(&self) -> Constraints {
        self.profile.constraints()
    }

    /// True if the profile has reached the goal and the controller is within
    /// tolerance of it.
    pub fn at_goal(&self) -> bool {
        self.controller.at_setpoint() && self.setpoint == self.goal
    }

    /// Advance the profile by one period and calculate the output for the
    /// given measurement.
    pub fn calculate(&mut self, measurement: f64) -> f64 {
        self.setpoint = self
            .profile
            .calculate(self.controller.period_s, self.setpoint, self.goal);

        self.controller.calculate(measurement, self.setpoint.position)
    }

    /// Restart the profile from the given measured position, at rest.
    pub fn reset(&mut self, position: f64) {
        self.controller.reset();
        self.setpoint = ProfileState::new(position, 0.0);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
