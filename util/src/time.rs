//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Number of whole cycles of `period_s` needed to cover `duration_s`.
///
/// Partial cycles round up, so a non-zero duration always lasts at least one
/// cycle. Negative durations give zero.
pub fn secs_to_cycles(duration_s: f64, period_s: f64) -> u64 {
    if duration_s <= 0.0 || period_s <= 0.0 {
        return 0;
    }

    // Small epsilon so that e.g. 0.1 / 0.02 doesn't become 5.000000001 -> 6
    (duration_s / period_s - 1e-9).ceil() as u64
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_to_seconds() {
        let d = chrono::Duration::milliseconds(1500);
        assert_eq!(duration_to_seconds(d), Some(1.5));
    }

    #[test]
    fn test_secs_to_cycles() {
        assert_eq!(secs_to_cycles(0.1, 0.02), 5);
        assert_eq!(secs_to_cycles(0.11, 0.02), 6);
        assert_eq!(secs_to_cycles(0.0, 0.02), 0);
        assert_eq!(secs_to_cycles(-1.0, 0.02), 0);
        assert_eq!(secs_to_cycles(0.001, 0.02), 1);
    }
}
