//! Full gradient verification against every positional argument.

use ad_tree::ArgTree;
use tracing::debug;

use crate::config::GradCheckConfig;
use crate::equivalence::{check_equivalent, max_abs_diff};
use crate::error::{GradCheckError, Result};
use crate::map_leaves::numeric_grad;
use crate::operator::{GradientOperator, Kwargs};

/// Verify `grad` against central differences of `f` for every argument,
/// using the default step and tolerances.
///
/// # Arguments
/// * `f` - The objective; non-scalar outputs are reduced with [`crate::to_scalar`]
/// * `grad` - The engine's gradient operator for `f`
/// * `args` - Positional arguments, each an arbitrary tree
///
/// # Example
/// ```
/// use ad_gradcheck::{check_grads, Kwargs};
/// use ad_tree::ArgTree;
///
/// // f(x, y) = x * y
/// let f = |args: &[ArgTree], _: &Kwargs| {
///     ArgTree::real(args[0].leaves()[0].re() * args[1].leaves()[0].re())
/// };
/// let grad = |argnum: usize, args: &[ArgTree], _: &Kwargs| args[1 - argnum].clone();
///
/// check_grads(f, &grad, &[ArgTree::real(2.0), ArgTree::real(3.0)]).unwrap();
/// ```
pub fn check_grads<F, G>(f: F, grad: &G, args: &[ArgTree]) -> Result<()>
where
    F: Fn(&[ArgTree], &Kwargs) -> ArgTree,
    G: GradientOperator + ?Sized,
{
    check_grads_with(f, grad, args, &GradCheckConfig::default())
}

/// [`check_grads`] with an explicit step and tolerance.
pub fn check_grads_with<F, G>(
    f: F,
    grad: &G,
    args: &[ArgTree],
    config: &GradCheckConfig,
) -> Result<()>
where
    F: Fn(&[ArgTree], &Kwargs) -> ArgTree,
    G: GradientOperator + ?Sized,
{
    if args.is_empty() {
        return Err(GradCheckError::NoArguments);
    }
    debug!(
        num_args = args.len(),
        num_leaves = args.iter().map(ArgTree::num_leaves).sum::<usize>(),
        eps = config.eps,
        "checking gradients"
    );

    let kwargs = Kwargs::new();
    let exact = ArgTree::Tuple(
        (0..args.len())
            .map(|argnum| grad.gradient(argnum, args, &kwargs))
            .collect(),
    );
    let numeric = numeric_grad(f, args, config.eps);

    match check_equivalent(&exact, &numeric, &config.tolerance) {
        Ok(()) => {
            debug!(max_abs_diff = ?max_abs_diff(&exact, &numeric), "gradients agree");
            Ok(())
        }
        Err(err) => {
            debug!(error = %err, "gradient check failed");
            Err(err)
        }
    }
}
