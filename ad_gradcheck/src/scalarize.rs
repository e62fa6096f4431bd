//! Reduction of arbitrary outputs to a real scalar.
//!
//! The engine's default gradient operator differentiates non-scalar outputs
//! through `sum(real(sin(value)))`, so the numeric side must reduce the same
//! way. It is not interchangeable with a plain sum.

use ad_tree::{ArgTree, Scalar};

/// `sum(real(sin(leaf)))` over every leaf of `value`.
pub fn to_scalar(value: &ArgTree) -> f64 {
    value.leaves().iter().map(|leaf| leaf.value().sin().re).sum()
}

/// Real scalar outputs pass through unchanged; everything else, complex
/// scalars included, goes through [`to_scalar`].
pub fn scalarize(value: &ArgTree) -> Scalar {
    match value {
        ArgTree::Scalar(s) if !s.is_complex() => *s,
        other => Scalar::f64(to_scalar(other)),
    }
}
