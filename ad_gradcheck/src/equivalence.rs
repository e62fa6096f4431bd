//! Tolerance-aware structural comparison of gradient trees.
//!
//! Both checks walk the two trees in lockstep and stop at the first failure.
//! [`check_equivalent`] additionally requires matching leaf kinds and close
//! values; [`check_structure`] only requires the same shape.

use ad_tree::{ArgTree, LeafPath, PathSegment, Scalar};

use crate::config::Tolerance;
use crate::error::{GradCheckError, Result};

#[derive(Clone, Copy)]
enum Mode {
    Full(Tolerance),
    Structure,
}

/// Check that `a` and `b` have the same structure and kinds and that every
/// leaf of `a` is close to the corresponding leaf of `b`.
///
/// Closeness is `|a - b| <= atol + rtol * |b|` on the complex modulus; NaN
/// never passes. The same tolerance applies at every depth.
///
/// # Example
/// ```
/// use ad_gradcheck::{check_equivalent, Tolerance};
/// use ad_tree::ArgTree;
///
/// let a = ArgTree::list(vec![ArgTree::real(1.0), ArgTree::real(2.0)]);
/// let b = ArgTree::list(vec![ArgTree::real(1.0), ArgTree::real(2.0 + 1e-9)]);
/// assert!(check_equivalent(&a, &b, &Tolerance::default()).is_ok());
///
/// let c = ArgTree::tuple(vec![ArgTree::real(1.0), ArgTree::real(2.0)]);
/// assert!(check_equivalent(&a, &c, &Tolerance::default()).unwrap_err().is_structural());
/// ```
pub fn check_equivalent(a: &ArgTree, b: &ArgTree, tolerance: &Tolerance) -> Result<()> {
    compare(a, b, Mode::Full(*tolerance), &LeafPath::root())
}

/// Check that `a` and `b` have the same containers, lengths, keys and array
/// shapes. Leaf kinds and values are ignored.
pub fn check_structure(a: &ArgTree, b: &ArgTree) -> Result<()> {
    compare(a, b, Mode::Structure, &LeafPath::root())
}

fn compare(a: &ArgTree, b: &ArgTree, mode: Mode, path: &LeafPath) -> Result<()> {
    match (a, b) {
        (ArgTree::Scalar(x), ArgTree::Scalar(y)) => match mode {
            Mode::Structure => Ok(()),
            Mode::Full(_) if x.kind() != y.kind() => Err(GradCheckError::TypeMismatch {
                path: path.clone(),
                lhs: a.kind(),
                rhs: b.kind(),
            }),
            Mode::Full(tolerance) if !tolerance.is_close(x.value(), y.value()) => {
                Err(tolerance_exceeded(path.clone(), a, b))
            }
            Mode::Full(_) => Ok(()),
        },
        (ArgTree::Tuple(xs), ArgTree::Tuple(ys)) | (ArgTree::List(xs), ArgTree::List(ys)) => {
            if xs.len() != ys.len() {
                return Err(GradCheckError::LengthMismatch {
                    path: path.clone(),
                    lhs: xs.len(),
                    rhs: ys.len(),
                });
            }
            for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                compare(x, y, mode, &path.child(PathSegment::Index(i)))?;
            }
            Ok(())
        }
        (ArgTree::Map(xs), ArgTree::Map(ys)) => {
            if xs.len() != ys.len() {
                return Err(GradCheckError::LengthMismatch {
                    path: path.clone(),
                    lhs: xs.len(),
                    rhs: ys.len(),
                });
            }
            for (key, x) in xs {
                let y = ys.get(key).ok_or_else(|| GradCheckError::KeyMismatch {
                    path: path.clone(),
                    key: key.clone(),
                })?;
                compare(x, y, mode, &path.child(PathSegment::Key(key.clone())))?;
            }
            Ok(())
        }
        (ArgTree::Array(x), ArgTree::Array(y)) => {
            if x.shape() != y.shape() {
                return Err(GradCheckError::ShapeMismatch {
                    path: path.clone(),
                    lhs: x.shape().clone(),
                    rhs: y.shape().clone(),
                });
            }
            let Mode::Full(tolerance) = mode else {
                return Ok(());
            };
            if x.kind() != y.kind() {
                return Err(GradCheckError::DtypeMismatch {
                    path: path.clone(),
                    lhs: x.dtype(),
                    rhs: y.dtype(),
                });
            }
            let first_failure = x
                .indices()
                .zip(x.iter().zip(y.iter()))
                .find(|(_, (p, q))| !tolerance.is_close(p.value(), q.value()));
            match first_failure {
                Some((coord, _)) => {
                    Err(tolerance_exceeded(path.child(PathSegment::Coord(coord)), a, b))
                }
                None => Ok(()),
            }
        }
        _ => Err(GradCheckError::TypeMismatch {
            path: path.clone(),
            lhs: a.kind(),
            rhs: b.kind(),
        }),
    }
}

fn tolerance_exceeded(path: LeafPath, a: &ArgTree, b: &ArgTree) -> GradCheckError {
    GradCheckError::ToleranceExceeded {
        path,
        diff: Box::new(difference(a, b)),
        lhs: Box::new(a.clone()),
        rhs: Box::new(b.clone()),
    }
}

// Only called once the structures are known to match.
fn difference(a: &ArgTree, b: &ArgTree) -> ArgTree {
    a.zip_map(b, &mut |x, y| Scalar::new(x.dtype().promoted(), x.value() - y.value()))
        .unwrap_or_else(|| a.clone())
}

/// Largest leafwise `|a - b|`, or `None` if the trees differ in structure.
///
/// Returns 0 for trees without leaves.
pub fn max_abs_diff(a: &ArgTree, b: &ArgTree) -> Option<f64> {
    let diff = a.zip_map(b, &mut |x, y| Scalar::f64((x.value() - y.value()).norm()))?;
    Some(diff.leaves().iter().map(Scalar::re).fold(0.0, f64::max))
}
