//! Implementations for the BalanceCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::{Deserialize, Serialize};

// Internal
use super::{BalanceCtrlError, Params};
use eqpt_if::DriveDemand;
use util::{
    maths::{apply_deadband, clamp},
    module::State,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Balance control module state.
///
/// Purely reactive, nothing is carried between cycles except whether the
/// wheels have been locked, which is only used to log the transition.
#[derive(Default)]
pub struct BalanceCtrl {
    params: Option<Params>,

    locked: bool,
}

/// Input data to balance control.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    /// Units: degrees, positive nose up
    pub pitch_deg: f64,

    /// Time remaining in the match period.
    ///
    /// Units: seconds
    pub match_time_s: f64,
}

/// Status report for BalanceCtrl processing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatusReport {
    /// Normalised velocity before the deadband.
    pub norm_vel: f64,

    /// Normalised velocity after the deadband.
    pub deadbanded_norm_vel: f64,

    /// True if the wheels were locked this cycle.
    pub locked: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for BalanceCtrl {
    type InitData = Params;
    type InitError = BalanceCtrlError;

    type InputData = InputData;
    type OutputData = DriveDemand;
    type StatusReport = StatusReport;
    type ProcError = BalanceCtrlError;

    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        init_data.validate()?;

        self.params = Some(init_data);
        self.locked = false;

        Ok(())
    }

    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let params = self
            .params
            .as_ref()
            .ok_or(BalanceCtrlError::NotInitialised)?;

        let norm_vel = input_data.pitch_deg * params.pitch_to_norm_vel;
        let deadbanded_norm_vel = clamp(
            apply_deadband(norm_vel, params.deadband_norm_vel, 1.0),
            -1.0,
            1.0,
        );

        // Hard switch to locked wheels near the end of the period, whatever
        // the pitch
        let locked = input_data.match_time_s <= params.set_x_time_left_s;

        let demand = if locked {
            DriveDemand::LockX
        } else {
            DriveDemand::Velocity {
                x_norm: deadbanded_norm_vel,
                y_norm: 0.0,
                rot_norm: 0.0,
                field_relative: false,
            }
        };

        if locked && !self.locked {
            debug!(
                "Locking wheels with {:.2} s remaining",
                input_data.match_time_s
            );
        }
        self.locked = locked;

        trace!(
            "Balance: pitch {:.2} deg -> {:.3} ({:.3} deadbanded)",
            input_data.pitch_deg,
            norm_vel,
            deadbanded_norm_vel
        );

        Ok((
            demand,
            StatusReport {
                norm_vel,
                deadbanded_norm_vel,
                locked,
            },
        ))
    }
}

impl BalanceCtrl {
    /// Forget the lock transition so a new period starts unlocked.
    pub fn reset(&mut self) {
        self.locked = false;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn ctrl() -> BalanceCtrl {
        let mut b = BalanceCtrl::default();
        b.init(Params {
            pitch_to_norm_vel: 0.02,
            deadband_norm_vel: 0.05,
            set_x_time_left_s: 1.0,
        })
        .unwrap();
        b
    }

    fn x_norm(demand: DriveDemand) -> f64 {
        match demand {
            DriveDemand::Velocity {
                x_norm,
                y_norm,
                rot_norm,
                field_relative,
            } => {
                assert_eq!(y_norm, 0.0);
                assert_eq!(rot_norm, 0.0);
                assert!(!field_relative);
                x_norm
            }
            d => panic!("Expected a velocity demand, got {:?}", d),
        }
    }

    #[test]
    fn test_level_is_still() {
        let mut b = ctrl();
        let (demand, report) = b
            .proc(&InputData {
                pitch_deg: 0.0,
                match_time_s: 10.0,
            })
            .unwrap();

        assert_eq!(x_norm(demand), 0.0);
        assert!(!report.locked);

        // Small pitch inside the deadband, 2 deg * 0.02 = 0.04
        let (demand, _) = b
            .proc(&InputData {
                pitch_deg: -2.0,
                match_time_s: 10.0,
            })
            .unwrap();
        assert_eq!(x_norm(demand), 0.0);
    }

    #[test]
    fn test_drives_towards_pitch() {
        let mut b = ctrl();

        let (demand, report) = b
            .proc(&InputData {
                pitch_deg: 10.0,
                match_time_s: 10.0,
            })
            .unwrap();
        assert!((report.norm_vel - 0.2).abs() < 1e-12);
        assert!(x_norm(demand) > 0.0);

        let (demand, _) = b
            .proc(&InputData {
                pitch_deg: -10.0,
                match_time_s: 10.0,
            })
            .unwrap();
        assert!(x_norm(demand) < 0.0);

        // Steep pitches saturate
        let (demand, _) = b
            .proc(&InputData {
                pitch_deg: 90.0,
                match_time_s: 10.0,
            })
            .unwrap();
        assert!((x_norm(demand) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_locks_near_end_of_period() {
        let mut b = ctrl();

        for pitch_deg in &[0.0, 10.0, -15.0] {
            for match_time_s in &[1.0, 0.5, 0.0, -1.0] {
                let (demand, report) = b
                    .proc(&InputData {
                        pitch_deg: *pitch_deg,
                        match_time_s: *match_time_s,
                    })
                    .unwrap();

                assert_eq!(demand, DriveDemand::LockX);
                assert!(report.locked);
            }
        }

        // Just above the threshold still drives
        let (demand, _) = b
            .proc(&InputData {
                pitch_deg: 10.0,
                match_time_s: 1.02,
            })
            .unwrap();
        assert!(x_norm(demand) > 0.0);
    }

    #[test]
    fn test_requires_init() {
        let mut b = BalanceCtrl::default();
        assert!(matches!(
            b.proc(&InputData::default()),
            Err(BalanceCtrlError::NotInitialised)
        ));

        assert!(b
            .init(Params {
                pitch_to_norm_vel: 0.02,
                deadband_norm_vel: 1.5,
                set_x_time_left_s: 1.0,
            })
            .is_err());
    }
}
