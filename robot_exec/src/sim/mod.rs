//! # Simulated equipment
//!
//! In-process implementations of the equipment interfaces, used by the
//! executable to run a simulated match and by the tests as test doubles.
//!
//! Each simulated device is a cheap handle onto shared state, so a clone can be
//! kept to inspect or drive the device after the original has been boxed and
//! handed to a subsystem. Everything runs on the single control thread.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod arm;
mod drive;
mod equipment;
mod motor;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::cell::Cell;
use std::rc::Rc;

use eqpt_if::MatchClock;

pub use arm::{SimAbsEncoder, SimArm, SimArmParams};
pub use drive::{SimChargeStation, SimChargeStationParams, SimGyro, SimSwerve, SimSwerveState};
pub use equipment::{SimEquipment, SimParams};
pub use motor::{SimMotor, SimMotorState};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A match clock counting down in simulated time.
#[derive(Debug, Clone, Default)]
pub struct SimMatchClock {
    remaining_s: Rc<Cell<f64>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimMatchClock {
    pub fn new(remaining_s: f64) -> Self {
        Self {
            remaining_s: Rc::new(Cell::new(remaining_s)),
        }
    }

    /// Start a new period with the given length.
    pub fn set_remaining(&self, remaining_s: f64) {
        self.remaining_s.set(remaining_s);
    }

    /// Count down by `dt_s`, stopping at zero.
    pub fn advance(&self, dt_s: f64) {
        self.remaining_s.set((self.remaining_s.get() - dt_s).max(0.0));
    }
}

impl MatchClock for SimMatchClock {
    fn remaining_s(&self) -> f64 {
        self.remaining_s.get()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
