//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

/// Clamp a value into `[min, max]`.
///
/// `NaN` is mapped to zero clamped into the range, so that a corrupted value
/// can never escape the limits.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    if value.is_nan() {
        return T::zero().max(min).min(max);
    }

    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Clamp a value into the symmetric range `[-limit, limit]`.
pub fn saturate<T>(value: T, limit: T) -> T
where
    T: Float,
{
    clamp(value, -limit, limit)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle into the range (-pi, pi].
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float + FloatConst,
{
    let pi = T::PI();

    pi - rem_euclid(pi - angle, pi + pi)
}
