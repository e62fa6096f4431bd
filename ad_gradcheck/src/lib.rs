//! # ad_gradcheck - Numerical Gradient Verification
//!
//! This crate checks the gradients produced by an automatic differentiation
//! engine against central finite differences. It is a test oracle: it never
//! differentiates anything itself, it only estimates and compares.
//!
//! ## Overview
//!
//! Arguments are [`ad_tree::ArgTree`] values: scalars, tuples, lists,
//! string-keyed maps and arrays, nested freely. A numeric gradient has exactly
//! the structure of its argument, with one derivative estimate per leaf.
//!
//! Two checks are provided:
//!
//! | Check | Cost | What it verifies |
//! |-------|------|------------------|
//! | [`check_grads`] | two evaluations per leaf | every partial derivative of every argument |
//! | [`quick_grad_check`] | two evaluations | the projection of the first argument's gradient onto a random direction |
//!
//! ## Quick Start
//!
//! ```
//! use ad_gradcheck::{check_grads, GradCheckError, Kwargs};
//! use ad_tree::ArgTree;
//!
//! // f(x, y) = x * y + sin(x)
//! let f = |args: &[ArgTree], _: &Kwargs| {
//!     let (x, y) = (args[0].leaves()[0].re(), args[1].leaves()[0].re());
//!     ArgTree::real(x * y + x.sin())
//! };
//!
//! // Hand-written gradients standing in for an autodiff engine
//! let grad = |argnum: usize, args: &[ArgTree], _: &Kwargs| {
//!     let (x, y) = (args[0].leaves()[0].re(), args[1].leaves()[0].re());
//!     match argnum {
//!         0 => ArgTree::real(y + x.cos()),
//!         _ => ArgTree::real(x),
//!     }
//! };
//!
//! let args = [ArgTree::real(2.0), ArgTree::real(3.0)];
//! check_grads(f, &grad, &args).unwrap();
//!
//! // A wrong gradient is reported with the leaf where it was caught
//! let wrong = |_: usize, _: &[ArgTree], _: &Kwargs| ArgTree::real(1.0);
//! let err = check_grads(f, &wrong, &args).unwrap_err();
//! assert!(matches!(err, GradCheckError::ToleranceExceeded { .. }));
//! ```
//!
//! ## Architecture
//!
//! - **[`estimate_derivative`]**: Central difference of a scalar function at one leaf,
//!   real or complex.
//! - **[`map_leaves`]** / **[`numeric_grad`]**: Structural recursion applying the
//!   estimator to every leaf of a tree.
//! - **[`check_equivalent`]**: Fail-fast, tolerance-aware comparison of two trees.
//! - **[`GradientOperator`]**: What an engine provides; closures implement it.
//! - **[`to_scalar`]**: The `sum(real(sin(x)))` reduction for non-scalar outputs.
//!
//! Library code only emits `tracing` events; install a subscriber to see them.

mod config;
mod driver;
mod equivalence;
mod error;
mod finite_diff;
mod map_leaves;
mod operator;
mod probe;
mod scalarize;

#[cfg(test)]
mod test_util;

pub use config::{GradCheckConfig, ProbeOptions, Tolerance, DEFAULT_ATOL, DEFAULT_EPS, DEFAULT_RTOL};
pub use driver::{check_grads, check_grads_with};
pub use equivalence::{check_equivalent, check_structure, max_abs_diff};
pub use error::{GradCheckError, Result};
pub use finite_diff::estimate_derivative;
pub use map_leaves::{map_leaves, numeric_grad};
pub use operator::{GradientOperator, Kwargs};
pub use probe::{quick_grad_check, ProbeReport};
pub use scalarize::{scalarize, to_scalar};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        check_equivalent, check_grads, check_grads_with, quick_grad_check, GradCheckConfig,
        GradCheckError, GradientOperator, Kwargs, ProbeOptions, Tolerance,
    };
    pub use ad_tree::prelude::*;
}
