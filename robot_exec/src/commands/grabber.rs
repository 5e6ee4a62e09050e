//! Grabber commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::{
    sched::{requirements, Command, InstantCommand, Requirements},
    subsystems::GRABBER,
    systems::Systems,
};
use util::time::secs_to_cycles;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Run the grabber outwards for a fixed time.
///
/// The rollers stop when the command ends, including when it is interrupted.
pub struct EjectGamePiece {
    cycles: u64,
    elapsed: u64,
    reqs: Requirements,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl EjectGamePiece {
    pub fn new(duration_s: f64) -> Self {
        Self {
            cycles: secs_to_cycles(duration_s, crate::CYCLE_PERIOD_S),
            elapsed: 0,
            reqs: requirements(&[GRABBER]),
        }
    }
}

impl Command<Systems> for EjectGamePiece {
    fn name(&self) -> &str {
        "EjectGamePiece"
    }

    fn requirements(&self) -> &Requirements {
        &self.reqs
    }

    fn initialize(&mut self, ctx: &mut Systems) {
        self.elapsed = 0;
        ctx.grabber.outtake();
    }

    fn execute(&mut self, _ctx: &mut Systems) {
        self.elapsed += 1;
    }

    fn is_finished(&self, _ctx: &Systems) -> bool {
        self.elapsed >= self.cycles
    }

    fn end(&mut self, ctx: &mut Systems, _interrupted: bool) {
        ctx.grabber.stop_motors();
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Start pulling a game piece in. The rollers keep running after the command
/// ends.
pub fn intake() -> InstantCommand<Systems> {
    InstantCommand::new("IntakeGamePiece", |s: &mut Systems| s.grabber.intake())
        .with_requirements(&[GRABBER])
}

pub fn stop() -> InstantCommand<Systems> {
    InstantCommand::new("StopGrabber", |s: &mut Systems| s.grabber.stop_motors())
        .with_requirements(&[GRABBER])
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sched::{CommandState, Scheduler};
    use crate::systems::test::sim_systems;

    #[test]
    fn test_eject_runs_for_duration() {
        let (mut systems, eqpt) = sim_systems();
        let mut sched = Scheduler::new();

        // 0.1 s is 5 cycles
        let id = sched.register_and_schedule(EjectGamePiece::new(0.1).boxed());

        for _ in 0..4 {
            sched.tick(&mut systems);
            assert_eq!(sched.state(id), Some(CommandState::Running));
            assert_eq!(eqpt.grabber_motor.snapshot().duty, -0.8);
        }

        sched.tick(&mut systems);
        assert_eq!(sched.state(id), Some(CommandState::Ended));
        assert_eq!(eqpt.grabber_motor.snapshot().duty, 0.0);
    }

    #[test]
    fn test_interrupted_eject_stops_rollers() {
        let (mut systems, eqpt) = sim_systems();
        let mut sched = Scheduler::new();

        let eject = sched.register_and_schedule(EjectGamePiece::new(1.0).boxed());
        sched.tick(&mut systems);
        assert_eq!(eqpt.grabber_motor.snapshot().duty, -0.8);

        // Intake needs the grabber too and interrupts the eject
        let intake_id = sched.register_and_schedule(intake().boxed());
        sched.tick(&mut systems);

        assert_eq!(sched.state(eject), Some(CommandState::Ended));
        assert_eq!(sched.state(intake_id), Some(CommandState::Ended));
        assert_eq!(eqpt.grabber_motor.snapshot().duty, 0.6);

        sched.register_and_schedule(stop().boxed());
        sched.tick(&mut systems);
        assert_eq!(eqpt.grabber_motor.snapshot().duty, 0.0);
    }
}
