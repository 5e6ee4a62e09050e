//! Named arm positions and their target angles

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::BTreeMap;
use std::fmt;
use std::iter::FromIterator;

use serde::{Deserialize, Serialize};

use super::ArmCtrlError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A named arm position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArmPosition {
    Starting,
    Intake,
    ScoreLow,
    ScoreMidHigh,
    AvoidLimelight,
}

/// Direction of a live tuning adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NudgeDirection {
    /// Deploy the arm further (increase the angle).
    Further,

    /// Deploy the arm less far (decrease the angle).
    LessFar,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Target angles of each named position, as read from the parameter file.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PositionsDeg {
    /// Units: degrees
    pub starting: f64,

    /// Units: degrees
    pub intake: f64,

    /// Units: degrees
    pub score_low: f64,

    /// Units: degrees
    pub score_mid_high: f64,

    /// Units: degrees
    pub avoid_limelight: f64,
}

/// Mapping from named position to target angle.
///
/// The keys are fixed when the table is built, the angles can be adjusted at
/// runtime and keep their new value until the process exits.
#[derive(Debug, Clone, Default)]
pub struct PositionTable {
    angles_deg: BTreeMap<ArmPosition, f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArmPosition {
    pub const ALL: [ArmPosition; 5] = [
        ArmPosition::Starting,
        ArmPosition::Intake,
        ArmPosition::ScoreLow,
        ArmPosition::ScoreMidHigh,
        ArmPosition::AvoidLimelight,
    ];
}

impl Default for ArmPosition {
    fn default() -> Self {
        ArmPosition::Starting
    }
}

impl fmt::Display for ArmPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArmPosition::Starting => "STARTING",
            ArmPosition::Intake => "INTAKE",
            ArmPosition::ScoreLow => "SCORE_LOW",
            ArmPosition::ScoreMidHigh => "SCORE_MID_HIGH",
            ArmPosition::AvoidLimelight => "AVOID_LIMELIGHT",
        };
        write!(f, "{}", s)
    }
}

impl PositionsDeg {
    pub fn get(&self, pos: ArmPosition) -> f64 {
        match pos {
            ArmPosition::Starting => self.starting,
            ArmPosition::Intake => self.intake,
            ArmPosition::ScoreLow => self.score_low,
            ArmPosition::ScoreMidHigh => self.score_mid_high,
            ArmPosition::AvoidLimelight => self.avoid_limelight,
        }
    }
}

impl From<&PositionsDeg> for PositionTable {
    fn from(positions: &PositionsDeg) -> Self {
        ArmPosition::ALL
            .iter()
            .map(|p| (*p, positions.get(*p)))
            .collect()
    }
}

impl FromIterator<(ArmPosition, f64)> for PositionTable {
    fn from_iter<I: IntoIterator<Item = (ArmPosition, f64)>>(iter: I) -> Self {
        Self {
            angles_deg: iter.into_iter().collect(),
        }
    }
}

impl PositionTable {
    /// Target angle of a position.
    pub fn get(&self, pos: ArmPosition) -> Result<f64, ArmCtrlError> {
        self.angles_deg
            .get(&pos)
            .copied()
            .ok_or(ArmCtrlError::UnknownPosition(pos))
    }

    /// Add `delta_deg` to the angle of a position, returning the new angle.
    pub fn adjust(&mut self, pos: ArmPosition, delta_deg: f64) -> Result<f64, ArmCtrlError> {
        match self.angles_deg.get_mut(&pos) {
            Some(angle) => {
                *angle += delta_deg;
                Ok(*angle)
            }
            None => Err(ArmCtrlError::UnknownPosition(pos)),
        }
    }

    /// True if every named position has an angle.
    pub fn is_complete(&self) -> bool {
        ArmPosition::ALL.iter().all(|p| self.angles_deg.contains_key(p))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArmPosition, &f64)> {
        self.angles_deg.iter()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
