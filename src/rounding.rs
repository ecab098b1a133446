//! Rounding primitives for the Rule 2 calculation
//!
//! Every intermediate checkpoint rounds to three decimals and the final
//! premium rounds to an integer, all with round-half-up. The checkpoint
//! sequence in the coverage calculator is contractual: skipping or
//! reordering a rounding step changes the numeric result.

/// Round to three decimal places, half-up.
///
/// Used for every intermediate value in the pipeline (base rate, total
/// factor, factored premium, term factor). Inputs are non-negative, so
/// `f64::round` (half away from zero) is exactly half-up here.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Round to the nearest integer, half-up. Final premium amounts only.
pub fn round_to_integer(value: f64) -> i64 {
    value.round() as i64
}
