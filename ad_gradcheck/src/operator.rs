//! The contract between the checker and an autodiff engine.
//!
//! The checker never differentiates anything itself. It asks a
//! [`GradientOperator`] for exact gradients and compares them with its own
//! finite-difference estimates.

use std::collections::BTreeMap;

use ad_tree::ArgTree;

/// Keyword arguments passed through to objectives and gradient operators.
pub type Kwargs = BTreeMap<String, ArgTree>;

/// Exact gradients of an objective `Fn(&[ArgTree], &Kwargs) -> ArgTree`.
///
/// For a non-scalar objective output, the gradient is that of
/// [`crate::to_scalar`] applied to the output.
pub trait GradientOperator {
    /// Gradient with respect to positional argument `argnum`. The result has
    /// the same structure as `args[argnum]`.
    fn gradient(&self, argnum: usize, args: &[ArgTree], kwargs: &Kwargs) -> ArgTree;

    /// Gradient with respect to the first argument.
    fn gradient_first(&self, args: &[ArgTree], kwargs: &Kwargs) -> ArgTree {
        self.gradient(0, args, kwargs)
    }
}

impl<G> GradientOperator for G
where
    G: Fn(usize, &[ArgTree], &Kwargs) -> ArgTree,
{
    fn gradient(&self, argnum: usize, args: &[ArgTree], kwargs: &Kwargs) -> ArgTree {
        self(argnum, args, kwargs)
    }
}
