// Small scalar helpers shared by distance-based classifiers built on this crate:
// per-sample absolute differences, and mapping values into and out of a range.

use std::ops::Sub;

/// `|a - b|` without underflow, so it is safe on unsigned samples.
pub fn abs_sub<T: PartialOrd + Sub<Output = T>>(a: T, b: T) -> T {
    if a < b { b - a } else { a - b }
}

pub fn lerp(start: f64, end: f64, p: f64) -> f64 {
    (1.0 - p) * start + p * end
}

/// Where `value` sits between `start` and `end`, as a fraction.
pub fn inverse_lerp(start: f64, end: f64, value: f64) -> f64 {
    (value - start) / (end - start)
}

/// `a` as a percentage of `b`; `0.0` when `b` is zero.
pub fn percent_of(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return 0.0;
    }
    (a / b) * 100.0
}
