//! Charge station balancing command

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::warn;

use crate::{
    balance_ctrl::{self, BalanceCtrl, BalanceCtrlError},
    sched::{requirements, Command, Requirements},
    subsystems::DRIVE,
    systems::Systems,
};
use util::module::State;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Drive along the charge station until it is level, locking the wheels near
/// the end of the match period.
///
/// Never finishes on its own.
pub struct ChargeStationBalance {
    ctrl: BalanceCtrl,
    reqs: Requirements,
    report: balance_ctrl::StatusReport,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ChargeStationBalance {
    pub fn new(params: balance_ctrl::Params) -> Result<Self, BalanceCtrlError> {
        let mut ctrl = BalanceCtrl::default();
        ctrl.init(params)?;

        Ok(Self {
            ctrl,
            reqs: requirements(&[DRIVE]),
            report: balance_ctrl::StatusReport::default(),
        })
    }

    /// Report from the last cycle.
    pub fn report(&self) -> &balance_ctrl::StatusReport {
        &self.report
    }
}

impl Command<Systems> for ChargeStationBalance {
    fn name(&self) -> &str {
        "ChargeStationBalance"
    }

    fn requirements(&self) -> &Requirements {
        &self.reqs
    }

    fn initialize(&mut self, _ctx: &mut Systems) {
        self.ctrl.reset();
    }

    fn execute(&mut self, ctx: &mut Systems) {
        let input = balance_ctrl::InputData {
            pitch_deg: ctx.drive.pitch_deg(),
            match_time_s: ctx.match_time_s(),
        };

        match self.ctrl.proc(&input) {
            Ok((demand, report)) => {
                ctx.drive.set_demand(demand);
                self.report = report;
            }
            Err(e) => {
                warn!("Error during BalanceCtrl processing: {}", e);
                ctx.drive.stop();
            }
        }
    }

    fn end(&mut self, ctx: &mut Systems, _interrupted: bool) {
        ctx.drive.stop();
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
