//! Cheap gradient check along one random direction.
//!
//! Instead of differencing every leaf, [`quick_grad_check`] compares the
//! directional derivative of `f` along a random unit direction with the
//! projection of the analytic gradient onto that direction. One pair of
//! objective evaluations suffices regardless of the size of the argument.

use ad_tree::{ArgTree, DType, LeafPath, Scalar};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use tracing::debug;

use crate::config::ProbeOptions;
use crate::equivalence::check_structure;
use crate::error::{GradCheckError, Result};
use crate::finite_diff::estimate_derivative;
use crate::operator::{GradientOperator, Kwargs};
use crate::scalarize::scalarize;

/// Both estimates from a successful probe and the direction they were taken
/// along.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub numeric: Scalar,
    pub analytic: Scalar,
    /// Unit-norm tree with the structure of `x0`.
    pub direction: ArgTree,
}

/// Check the gradient of `f` with respect to its first argument along a
/// random direction.
///
/// # Arguments
/// * `f` - The objective, called as `f([x0, extra_args...], kwargs)`
/// * `grad` - The engine's gradient operator for `f`
/// * `x0` - The point to check at
/// * `extra_args` - Further positional arguments, held fixed
/// * `kwargs` - Keyword arguments passed to both `f` and `grad`
/// * `options` - Step, tolerance and verbosity
/// * `rng` - Source for the direction; `None` seeds a fresh generator
///
/// # Errors
/// * [`GradCheckError::DegenerateDirection`] if `x0` has no leaves
/// * A structural error if the analytic gradient does not match `x0`
/// * [`GradCheckError::ToleranceExceeded`] with the numeric estimate on the
///   left and the analytic projection on the right
///
/// # Example
/// ```
/// use ad_gradcheck::{quick_grad_check, Kwargs, ProbeOptions};
/// use ad_tree::{ArgTree, Array, Shape};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// // f(v) = sum(v * v), grad = 2v
/// let f = |args: &[ArgTree], _: &Kwargs| {
///     ArgTree::real(args[0].leaves().iter().map(|s| s.re() * s.re()).sum())
/// };
/// let grad = |_: usize, args: &[ArgTree], _: &Kwargs| {
///     let a = args[0].as_array().unwrap();
///     ArgTree::Array(a.map(a.dtype(), |s| s.value() * 2.0))
/// };
///
/// let x0 = ArgTree::Array(Array::from_real(vec![1.0, 2.0, 3.0], Shape::new(vec![3])).unwrap());
/// let options = ProbeOptions::default().with_verbose(false);
/// let mut rng = StdRng::seed_from_u64(0);
///
/// quick_grad_check(f, &grad, &x0, &[], &Kwargs::new(), &options, Some(&mut rng)).unwrap();
/// ```
pub fn quick_grad_check<F, G>(
    f: F,
    grad: &G,
    x0: &ArgTree,
    extra_args: &[ArgTree],
    kwargs: &Kwargs,
    options: &ProbeOptions,
    rng: Option<&mut dyn RngCore>,
) -> Result<ProbeReport>
where
    F: Fn(&[ArgTree], &Kwargs) -> ArgTree,
    G: GradientOperator + ?Sized,
{
    if options.verbose {
        println!("Checking gradient at {}", x0);
    }

    let direction = match rng {
        Some(rng) => random_direction(x0, rng)?,
        None => random_direction(x0, &mut StdRng::from_entropy())?,
    };
    let steps = direction.leaves();
    debug!(num_leaves = steps.len(), eps = options.eps, "probing gradient");

    let with_first = |first: ArgTree| {
        let mut args = Vec::with_capacity(extra_args.len() + 1);
        args.push(first);
        args.extend_from_slice(extra_args);
        args
    };

    let along_direction = |t: Scalar| {
        let mut step = steps.iter();
        let shifted = x0.map_scalars(&mut |x| {
            let d = step.next().map_or(0.0, Scalar::re);
            x.perturbed(t.value() * d)
        });
        scalarize(&f(&with_first(shifted), kwargs))
    };
    let numeric = estimate_derivative(along_direction, Scalar::f64(0.0), options.eps);

    let exact = grad.gradient_first(&with_first(x0.clone()), kwargs);
    check_structure(&exact, x0)?;
    // Directions are real, so only the real-axis component of each leaf's
    // gradient contributes.
    let projection: Complex64 = exact
        .leaves()
        .iter()
        .zip(&steps)
        .map(|(g, d)| g.value() * d.re())
        .sum();
    let analytic = Scalar::new(DType::F64, projection);

    debug!(numeric = %numeric, analytic = %analytic, "directional derivatives");

    if !options.tolerance.is_close(numeric.value(), analytic.value()) {
        if options.verbose {
            println!("Check failed! nd={}, ad={}", numeric, analytic);
        }
        return Err(GradCheckError::ToleranceExceeded {
            path: LeafPath::root(),
            diff: Box::new(ArgTree::Scalar(Scalar::f64(numeric.re() - analytic.re()))),
            lhs: Box::new(ArgTree::Scalar(numeric)),
            rhs: Box::new(ArgTree::Scalar(analytic)),
        });
    }

    if options.verbose {
        println!(
            "Gradient projection OK (numeric grad: {}, analytic grad: {})",
            numeric, analytic
        );
    }
    Ok(ProbeReport {
        numeric,
        analytic,
        direction,
    })
}

/// Standard-normal tree with the structure of `like`, scaled to unit norm.
fn random_direction(like: &ArgTree, rng: &mut dyn RngCore) -> Result<ArgTree> {
    let raw = like.map_scalars(&mut |_| Scalar::f64(StandardNormal.sample(&mut *rng)));
    let norm = raw.leaves().iter().map(|d| d.re() * d.re()).sum::<f64>().sqrt();
    if !(norm.is_finite() && norm > 0.0) {
        return Err(GradCheckError::DegenerateDirection { norm });
    }
    Ok(raw.map_scalars(&mut |d| Scalar::new(d.dtype(), d.value() / norm)))
}
