//! # Autonomous routines
//!
//! Routines are compositions of the robot commands. The routine run in the
//! autonomous period is selected by name in the parameter file and built once
//! at startup.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod routine;
mod routines;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    balance_ctrl::{self, BalanceCtrlError},
    sched::Command,
    systems::Systems,
};

pub use routine::AutoRoutineCommand;
pub use routines::{auto_score_one_five, auto_score_two, auto_score_two_and_balance, score_one};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters shared by the autonomous routines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoParams {
    /// Time the grabber runs outwards to score a game piece.
    ///
    /// Units: seconds
    pub eject_s: f64,

    pub balance: balance_ctrl::Params,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The selectable autonomous routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoRoutine {
    /// Run no command.
    None,
    ScoreOne,
    ScoreTwo,
    ScoreTwoAndBalance,
    ScoreOneFive,
}

#[derive(Debug, thiserror::Error)]
pub enum AutoError {
    #[error("Could not build the balance command: {0}")]
    Balance(#[from] BalanceCtrlError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AutoRoutine {
    /// Build the routine's command, `None` for [`AutoRoutine::None`].
    pub fn build(
        &self,
        params: &AutoParams,
    ) -> Result<Option<Box<dyn Command<Systems>>>, AutoError> {
        let cmd = match self {
            AutoRoutine::None => return Ok(None),
            AutoRoutine::ScoreOne => score_one(params.eject_s).boxed(),
            AutoRoutine::ScoreTwo => auto_score_two(params.eject_s).boxed(),
            AutoRoutine::ScoreTwoAndBalance => auto_score_two_and_balance(params)?.boxed(),
            AutoRoutine::ScoreOneFive => auto_score_one_five(params.eject_s).boxed(),
        };

        Ok(Some(cmd))
    }
}

impl Default for AutoRoutine {
    fn default() -> Self {
        AutoRoutine::None
    }
}

impl fmt::Display for AutoRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
