//! # Match clock

/// Source of the time remaining in the current match period.
///
/// The value is monotonically non-increasing within a period (autonomous or
/// teleop). Outside of a timed match drivers usually report a negative value
/// or zero.
pub trait MatchClock {
    /// Time remaining in the current match period.
    ///
    /// Units: seconds
    fn remaining_s(&self) -> f64;
}
