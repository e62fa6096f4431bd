//! Finite difference utilities for gradient verification.
//!
//! Provides the central-difference estimator applied at every scalar leaf of a
//! numeric gradient.

use ad_tree::Scalar;
use num_complex::Complex64;

/// Estimate the derivative of a scalar function at a point using central
/// differences.
///
/// # Arguments
/// * `f` - Function of a single scalar leaf
/// * `x` - The point at which to differentiate
/// * `eps` - Full width of the difference stencil (typically [`crate::DEFAULT_EPS`])
///
/// # Returns
/// For real leaves, `(f(x + eps/2) - f(x - eps/2)) / eps`.
///
/// For complex leaves the real and imaginary axes are differenced separately
/// and combined as `d_re - i * d_im`, the convention the autodiff engine uses
/// for gradients of real-valued functions of complex inputs. Whether a leaf is
/// complex is decided by its dtype, not by its current value.
///
/// The estimate has the same equivalence kind as `x`. Accuracy degrades
/// silently for functions with large curvature at the scale of `eps`.
///
/// # Example
/// ```
/// use ad_gradcheck::estimate_derivative;
/// use ad_tree::Scalar;
///
/// // f(x) = x^2, df/dx = 2x
/// let f = |x: Scalar| Scalar::from(x.value() * x.value());
/// let d = estimate_derivative(f, Scalar::f64(3.0), 1e-4);
///
/// assert!((d.re() - 6.0).abs() < 1e-3);
/// ```
pub fn estimate_derivative<F>(f: F, x: Scalar, eps: f64) -> Scalar
where
    F: Fn(Scalar) -> Scalar,
{
    let half = eps / 2.0;

    let step = Complex64::new(half, 0.0);
    let mut estimate = (f(x.perturbed(step)).value() - f(x.perturbed(-step)).value()) / eps;

    if x.is_complex() {
        let step = Complex64::new(0.0, half);
        let d_im = (f(x.perturbed(step)).value() - f(x.perturbed(-step)).value()) / eps;
        estimate -= Complex64::i() * d_im;
    }

    Scalar::coerced_like(&x, estimate)
}
