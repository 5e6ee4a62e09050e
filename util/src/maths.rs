//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Clamp a value into `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T 
where
    T: Float
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Apply a symmetric deadband to a value.
///
/// Values with a magnitude at or below `deadband` map to zero. Values outside
/// the band are shifted towards zero and rescaled so that the output still
/// spans `[-max_magnitude, max_magnitude]` and is continuous at the edge of the
/// band.
///
/// A deadband of zero (or less) leaves the value untouched.
pub fn apply_deadband<T>(value: T, deadband: T, max_magnitude: T) -> T
where
    T: Float
{
    let zero = T::zero();

    if deadband <= zero {
        return value;
    }

    if value.abs() <= deadband {
        return zero;
    }

    // Shifted value, with the sign of the input
    let shifted = if value > zero {
        value - deadband
    }
    else {
        value + deadband
    };

    // When the deadband is tiny compared to the range the rescale factor is 1
    // to within float precision, skip it.
    if max_magnitude / deadband > T::from(1.0e12).unwrap_or(max_magnitude) {
        return shifted;
    }

    max_magnitude * shifted / (max_magnitude - deadband)
}

/// Convert degrees to radians.
pub fn deg_to_rad<T>(deg: T) -> T
where
    T: Float
{
    deg.to_radians()
}
