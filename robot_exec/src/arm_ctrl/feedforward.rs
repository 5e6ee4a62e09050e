//! Single-joint arm feedforward model

use serde::{Deserialize, Serialize};

/// Feedforward gains for a single-joint arm.
///
/// `V = k_s * sgn(w) + k_g * cos(theta) + k_v * w`
///
/// where `theta` is the angle above horizontal and `w` the angular velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmFeedforward {
    /// Static friction voltage.
    ///
    /// Units: volts
    pub k_s_v: f64,

    /// Voltage holding the arm horizontal against gravity.
    ///
    /// Units: volts
    pub k_g_v: f64,

    /// Velocity gain.
    ///
    /// Units: volts/(radian/second)
    pub k_v_vsrad: f64,
}

impl ArmFeedforward {
    /// Feedforward voltage.
    ///
    /// - `angle_rad`: angle above horizontal
    /// - `velocity_rads`: angular velocity
    pub fn calculate(&self, angle_rad: f64, velocity_rads: f64) -> f64 {
        // f64::signum(0.0) is 1.0, static friction must vanish at rest
        let sign = if velocity_rads == 0.0 {
            0.0
        } else {
            velocity_rads.signum()
        };

        self.k_s_v * sign + self.k_g_v * angle_rad.cos() + self.k_v_vsrad * velocity_rads
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_feedforward() {
        let ff = ArmFeedforward {
            k_s_v: 0.1,
            k_g_v: 0.5,
            k_v_vsrad: 2.0,
        };

        // Horizontal at rest holds exactly k_g
        assert!((ff.calculate(0.0, 0.0) - 0.5).abs() < 1e-12);

        // Vertical needs no gravity compensation
        assert!(ff.calculate(FRAC_PI_2, 0.0).abs() < 1e-12);

        // Moving down from horizontal
        assert!((ff.calculate(0.0, -1.0) - (-0.1 + 0.5 - 2.0)).abs() < 1e-12);
    }
}
