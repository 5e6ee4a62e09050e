//! The robot context passed to every command

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::warn;

use crate::{
    sched::{Subsystem, SubsystemSet},
    subsystems::{Arm, Drive, Grabber},
};
use eqpt_if::{IdleMode, MatchClock, TelemetrySink};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Every subsystem of the robot plus the match clock.
pub struct Systems {
    pub arm: Arm,
    pub drive: Drive,
    pub grabber: Grabber,

    clock: Box<dyn MatchClock>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Systems {
    pub fn new(arm: Arm, drive: Drive, grabber: Grabber, clock: Box<dyn MatchClock>) -> Self {
        Self {
            arm,
            drive,
            grabber,
            clock,
        }
    }

    /// Time remaining in the current match period.
    ///
    /// Units: seconds
    pub fn match_time_s(&self) -> f64 {
        self.clock.remaining_s()
    }

    /// Allow the subsystems to write their demands to the equipment.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.arm.set_enabled(enabled);
        self.drive.set_enabled(enabled);
        self.grabber.set_enabled(enabled);
    }

    /// Set the idle mode of the arm and the drivebase turning motors.
    ///
    /// Failures are logged, an idle mode which didn't apply isn't worth
    /// stopping the robot for.
    pub fn set_idle_modes(&mut self, arm: IdleMode, turning: IdleMode) {
        if let Err(e) = self.arm.set_idle_mode(arm) {
            warn!("Could not set the arm idle mode: {}", e);
        }
        if let Err(e) = self.drive.set_turning_idle_mode(turning) {
            warn!("Could not set the turning motor idle mode: {}", e);
        }
    }

    pub fn report(&self, tm: &mut dyn TelemetrySink) {
        tm.put_number("Match Time (s)", self.match_time_s());
        self.arm.report(tm);
        self.drive.report(tm);
        self.grabber.report(tm);
    }
}

impl SubsystemSet for Systems {
    fn for_each_subsystem(&mut self, f: &mut dyn FnMut(&mut dyn Subsystem)) {
        f(&mut self.arm);
        f(&mut self.drive);
        f(&mut self.grabber);
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::arm_ctrl::test_params;
    use crate::sim::{SimEquipment, SimParams};
    use crate::subsystems::GrabberParams;

    /// Subsystems built on simulated equipment, enabled.
    pub(crate) fn sim_systems() -> (Systems, SimEquipment) {
        let eqpt = SimEquipment::new(&SimParams::default());

        let arm = Arm::new(
            Box::new(eqpt.arm_motor.clone()),
            Box::new(eqpt.arm.encoder()),
            test_params(),
        )
        .unwrap();
        let drive = Drive::new(Box::new(eqpt.swerve.clone()), Box::new(eqpt.gyro.clone()));
        let grabber = Grabber::new(
            Box::new(eqpt.grabber_motor.clone()),
            GrabberParams::default(),
        );

        let mut systems = Systems::new(arm, drive, grabber, Box::new(eqpt.clock.clone()));
        systems.set_enabled(true);

        (systems, eqpt)
    }

    #[test]
    fn test_visits_every_subsystem_once() {
        let (mut systems, _eqpt) = sim_systems();

        let mut ids = Vec::new();
        systems.for_each_subsystem(&mut |s| ids.push(s.id().0));

        assert_eq!(ids, vec!["arm", "drive", "grabber"]);
    }

    #[test]
    fn test_idle_modes() {
        let (mut systems, eqpt) = sim_systems();

        systems.set_idle_modes(IdleMode::Coast, IdleMode::Brake);

        assert_eq!(eqpt.arm_motor.snapshot().idle_mode, Some(IdleMode::Coast));
        assert_eq!(
            eqpt.swerve.snapshot().turning_idle_mode,
            Some(IdleMode::Brake)
        );
    }
}
