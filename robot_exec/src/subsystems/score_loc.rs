//! Selected scoring location

use std::fmt;

use serde::{Deserialize, Serialize};

/// Height of the node to score on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreHeight {
    Low,
    Mid,
    High,
}

/// Column of the node to score on, as seen from the driver station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreCol {
    Left,
    Middle,
    Right,
}

/// The node the operator (or an autonomous routine) has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringLocation {
    pub height: ScoreHeight,
    pub col: ScoreCol,
}

impl Default for ScoringLocation {
    fn default() -> Self {
        Self {
            height: ScoreHeight::High,
            col: ScoreCol::Middle,
        }
    }
}

impl fmt::Display for ScoreHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoreHeight::Low => "LOW",
            ScoreHeight::Mid => "MID",
            ScoreHeight::High => "HIGH",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for ScoreCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoreCol::Left => "LEFT",
            ScoreCol::Middle => "MIDDLE",
            ScoreCol::Right => "RIGHT",
        };
        write!(f, "{}", s)
    }
}
