//! Parameters structure for BalanceCtrl

use serde::{Deserialize, Serialize};

use super::BalanceCtrlError;

/// Parameters for balance control.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Gain from pitch to normalised forward velocity.
    ///
    /// Units: 1/degrees
    pub pitch_to_norm_vel: f64,

    /// Normalised velocities with a magnitude at or below this are zeroed.
    pub deadband_norm_vel: f64,

    /// Remaining match time at or below which the wheels are locked.
    ///
    /// Units: seconds
    pub set_x_time_left_s: f64,
}

impl Params {
    pub fn validate(&self) -> Result<(), BalanceCtrlError> {
        if !(0.0..1.0).contains(&self.deadband_norm_vel) {
            return Err(BalanceCtrlError::InvalidParams(format!(
                "deadband_norm_vel must be in [0, 1), got {}",
                self.deadband_norm_vel
            )));
        }

        if !self.pitch_to_norm_vel.is_finite() {
            return Err(BalanceCtrlError::InvalidParams(
                "pitch_to_norm_vel must be finite".into(),
            ));
        }

        Ok(())
    }
}
