//! Arm commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::{
    arm_ctrl::{ArmPosition, NudgeDirection},
    sched::{FunctionalCommand, InstantCommand},
    subsystems::{ScoreHeight, ARM},
    systems::Systems,
};

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Select the height the next score goes to. Doesn't move the arm.
pub fn set_score_height(height: ScoreHeight) -> InstantCommand<Systems> {
    InstantCommand::new(&format!("SetScoreHeight({})", height), move |s: &mut Systems| {
        s.arm.set_score_height(height)
    })
}

/// Move the arm to a position, finishing once it is there.
pub fn go_to_position(pos: ArmPosition) -> FunctionalCommand<Systems> {
    FunctionalCommand::new(&format!("GoToPosition({})", pos))
        .on_init(move |s: &mut Systems| s.arm.go_to_position(pos))
        .until(|s: &Systems| s.arm.at_desired_position())
        .with_requirements(&[ARM])
}

/// Move the arm to the scoring position for the selected height, finishing
/// once it is there.
pub fn start_score() -> FunctionalCommand<Systems> {
    FunctionalCommand::new("StartScore")
        .on_init(|s: &mut Systems| {
            s.arm.set_cancel_score(false);
            s.arm.start_score()
        })
        .until(|s: &Systems| s.arm.at_desired_position())
        .with_requirements(&[ARM])
}

/// Retarget the arm to the scoring position for the selected height.
pub fn manual_prep_score() -> InstantCommand<Systems> {
    InstantCommand::new("ManualPrepScore", |s: &mut Systems| s.arm.manual_prep_score())
        .with_requirements(&[ARM])
}

pub fn nudge(direction: NudgeDirection) -> InstantCommand<Systems> {
    InstantCommand::new(&format!("Nudge({:?})", direction), move |s: &mut Systems| {
        s.arm.nudge(direction)
    })
    .with_requirements(&[ARM])
}

pub fn zero_arm() -> InstantCommand<Systems> {
    InstantCommand::new("ZeroArm", |s: &mut Systems| s.arm.zero_at_current_pos())
        .with_requirements(&[ARM])
}

pub fn cancel_score() -> InstantCommand<Systems> {
    InstantCommand::new("CancelScore", |s: &mut Systems| s.arm.cancel_score())
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
