//! Autonomous routine builders

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use super::{AutoError, AutoParams, AutoRoutineCommand};
use crate::{
    arm_ctrl::ArmPosition,
    commands::{arm, grabber, ChargeStationBalance, EjectGamePiece},
    sched::{Command, SequentialGroup},
    subsystems::{ScoreHeight, ARM, DRIVE, GRABBER},
    systems::Systems,
};

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Score the held game piece at the selected height then stow the arm.
pub fn score_one(eject_s: f64) -> SequentialGroup<Systems> {
    SequentialGroup::new(
        "AutoScoreOne",
        vec![
            arm::start_score().boxed(),
            EjectGamePiece::new(eject_s).boxed(),
            grabber::stop().boxed(),
            arm::go_to_position(ArmPosition::Starting).boxed(),
        ],
    )
}

/// Score high, then score mid.
pub fn auto_score_two(eject_s: f64) -> AutoRoutineCommand {
    AutoRoutineCommand::new(
        "AutoScoreTwo",
        vec![
            arm::set_score_height(ScoreHeight::High).boxed(),
            score_one(eject_s).boxed(),
            arm::set_score_height(ScoreHeight::Mid).boxed(),
            score_one(eject_s).boxed(),
        ],
    )
    .with_requirements(&[DRIVE, ARM, GRABBER])
    .with_event("intakeGamePiece", grabber::intake().boxed())
    .with_event("stopIntaking", grabber::stop().boxed())
}

/// Score two then balance on the charge station until the period ends.
pub fn auto_score_two_and_balance(params: &AutoParams) -> Result<AutoRoutineCommand, AutoError> {
    Ok(AutoRoutineCommand::new(
        "AutoScoreTwoAndBalance",
        vec![
            auto_score_two(params.eject_s).boxed(),
            ChargeStationBalance::new(params.balance.clone())?.boxed(),
        ],
    )
    .with_requirements(&[DRIVE, ARM, GRABBER]))
}

/// Score one, leaving the intake event for picking up a second piece.
pub fn auto_score_one_five(eject_s: f64) -> AutoRoutineCommand {
    AutoRoutineCommand::new("AutoScoreOneFive", vec![score_one(eject_s).boxed()])
        .with_event("intakeGamePiece", grabber::intake().boxed())
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto::AutoRoutine;
    use crate::balance_ctrl;
    use crate::sched::{requirements, CommandId, CommandState, Scheduler};
    use crate::sim::SimEquipment;
    use crate::systems::test::sim_systems;

    const EJECT_S: f64 = 0.3;

    fn params() -> AutoParams {
        AutoParams {
            eject_s: EJECT_S,
            balance: balance_ctrl::Params {
                pitch_to_norm_vel: 0.02,
                deadband_norm_vel: 0.05,
                set_x_time_left_s: 1.0,
            },
        }
    }

    /// Tick until the command ends, returning the number of ticks taken.
    fn run_until_ended(
        sched: &mut Scheduler<Systems>,
        systems: &mut Systems,
        eqpt: &mut SimEquipment,
        id: CommandId,
        max_ticks: usize,
    ) -> Option<usize> {
        for i in 0..max_ticks {
            sched.tick(systems);
            eqpt.step(crate::CYCLE_PERIOD_S);

            if sched.state(id) == Some(CommandState::Ended) {
                return Some(i + 1);
            }
        }

        None
    }

    #[test]
    fn test_score_one_releases_subsystems() {
        let (mut systems, mut eqpt) = sim_systems();
        let mut sched = Scheduler::new();

        let group = SequentialGroup::new(
            "SetHighScoreOne",
            vec![
                arm::set_score_height(ScoreHeight::High).boxed(),
                score_one(EJECT_S).boxed(),
            ],
        );
        assert_eq!(group.requirements(), &requirements(&[ARM, GRABBER]));

        let id = sched.register_and_schedule(group.boxed());

        // Scoring high puts the arm at the mid/high position
        let mut reached_score = false;
        let mut ejected = false;
        for _ in 0..1000 {
            sched.tick(&mut systems);
            eqpt.step(crate::CYCLE_PERIOD_S);

            if systems.arm.desired_position() == ArmPosition::ScoreMidHigh
                && systems.arm.at_desired_position()
            {
                reached_score = true;
            }
            if eqpt.grabber_motor.snapshot().duty < 0.0 {
                assert!(reached_score);
                ejected = true;
            }

            if sched.state(id) == Some(CommandState::Ended) {
                break;
            }
        }

        assert_eq!(sched.state(id), Some(CommandState::Ended));
        assert!(reached_score);
        assert!(ejected);

        assert_eq!(sched.owner(ARM), None);
        assert_eq!(sched.owner(GRABBER), None);
        assert!(sched.requirement_owners().is_empty());

        assert_eq!(systems.arm.score_height(), ScoreHeight::High);
        assert!(systems.arm.at_position(ArmPosition::Starting));
        assert_eq!(systems.grabber.duty(), 0.0);
    }

    #[test]
    fn test_auto_score_two() {
        let (mut systems, mut eqpt) = sim_systems();
        let mut sched = Scheduler::new();

        let routine = auto_score_two(EJECT_S);
        assert_eq!(routine.num_steps(), 4);
        assert_eq!(
            routine.requirements(),
            &requirements(&[ARM, DRIVE, GRABBER])
        );
        assert_eq!(
            routine.event_names().collect::<Vec<_>>(),
            vec!["intakeGamePiece", "stopIntaking"]
        );

        let id = sched.register_and_schedule(routine.boxed());
        sched.tick(&mut systems);

        // The routine holds the drivebase even though no step drives it
        assert_eq!(sched.owner(DRIVE), Some(id));

        assert!(run_until_ended(&mut sched, &mut systems, &mut eqpt, id, 2000).is_some());

        // The second score was a mid score
        assert_eq!(systems.arm.score_height(), ScoreHeight::Mid);
        assert!(sched.requirement_owners().is_empty());
    }

    #[test]
    fn test_score_two_and_balance_keeps_balancing() {
        let (mut systems, mut eqpt) = sim_systems();
        eqpt.clock.set_remaining(15.0);
        let mut sched = Scheduler::new();

        let id = sched.register_and_schedule(
            AutoRoutine::ScoreTwoAndBalance
                .build(&params())
                .unwrap()
                .unwrap(),
        );

        // The balance step never finishes
        assert!(run_until_ended(&mut sched, &mut systems, &mut eqpt, id, 600).is_none());
        assert_eq!(sched.state(id), Some(CommandState::Running));
        assert!(systems.arm.at_position(ArmPosition::Starting));

        // Less than a second left, the wheels lock
        while systems.match_time_s() > 0.9 {
            sched.tick(&mut systems);
            eqpt.step(crate::CYCLE_PERIOD_S);
        }
        sched.tick(&mut systems);
        assert_eq!(systems.drive.last_demand(), eqpt_if::DriveDemand::LockX);

        // Ending the period interrupts the whole routine
        sched.cancel(id);
        sched.tick(&mut systems);
        assert_eq!(sched.state(id), Some(CommandState::Ended));
        assert!(sched.requirement_owners().is_empty());
    }

    #[test]
    fn test_routine_selection() {
        assert!(AutoRoutine::None.build(&params()).unwrap().is_none());

        let cmd = AutoRoutine::ScoreOneFive.build(&params()).unwrap().unwrap();
        assert_eq!(cmd.name(), "AutoScoreOneFive");
        assert_eq!(cmd.requirements(), &requirements(&[ARM, GRABBER]));

        let cmd = AutoRoutine::ScoreOne.build(&params()).unwrap().unwrap();
        assert_eq!(cmd.name(), "AutoScoreOne");

        let mut bad = params();
        bad.balance.deadband_norm_vel = 2.0;
        assert!(AutoRoutine::ScoreTwoAndBalance.build(&bad).is_err());
        assert!(AutoRoutine::ScoreTwo.build(&bad).is_ok());
    }
}
