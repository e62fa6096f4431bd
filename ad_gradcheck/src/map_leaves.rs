//! Structural recursion producing numeric gradient trees.
//!
//! [`map_leaves`] walks an argument tree and, at every scalar leaf, builds a
//! one-argument function that substitutes that leaf into a fresh copy of the
//! whole tree. The scalar estimator then differentiates that function. Only
//! one leaf is ever perturbed at a time and the input is never mutated.

use ad_tree::{ArgTree, LeafPath, PathSegment, Scalar};
use tracing::trace;

use crate::finite_diff::estimate_derivative;
use crate::operator::Kwargs;
use crate::scalarize::scalarize;

/// Numeric gradient of `f` with respect to every leaf of `tree`.
///
/// The result has the same structure as `tree`. Scalar leaves keep their
/// equivalence kind; arrays come back as `F64` (real) or `C128` (complex)
/// arrays of the same shape.
///
/// # Example
/// ```
/// use ad_gradcheck::map_leaves;
/// use ad_tree::{ArgTree, Scalar};
///
/// // f(a, b) = a * b
/// let f = |t: &ArgTree| {
///     let leaves = t.leaves();
///     Scalar::f64(leaves[0].re() * leaves[1].re())
/// };
/// let grad = map_leaves(f, &ArgTree::list(vec![ArgTree::real(2.0), ArgTree::real(5.0)]), 1e-4);
///
/// assert!((grad.leaves()[0].re() - 5.0).abs() < 1e-6);
/// assert!((grad.leaves()[1].re() - 2.0).abs() < 1e-6);
/// ```
pub fn map_leaves<F>(f: F, tree: &ArgTree, eps: f64) -> ArgTree
where
    F: Fn(&ArgTree) -> Scalar,
{
    walk(&f, tree, eps, &LeafPath::root())
}

// Every level wraps `f` in one more substituting closure; the recursion has to
// go through `&dyn Fn` for that to type-check.
fn walk(f: &dyn Fn(&ArgTree) -> Scalar, tree: &ArgTree, eps: f64, path: &LeafPath) -> ArgTree {
    match tree {
        ArgTree::Scalar(x) => {
            trace!(path = %path, leaf = %x, "differencing leaf");
            ArgTree::Scalar(estimate_derivative(|v| f(&ArgTree::Scalar(v)), *x, eps))
        }
        ArgTree::Tuple(items) => ArgTree::Tuple(walk_items(f, tree, items, eps, path)),
        ArgTree::List(items) => ArgTree::List(walk_items(f, tree, items, eps, path)),
        ArgTree::Map(entries) => ArgTree::Map(
            entries
                .iter()
                .map(|(key, value)| {
                    let segment = PathSegment::Key(key.clone());
                    let substitute = |v: &ArgTree| f(&tree.with_child(&segment, v.clone()));
                    let grad = walk(&substitute, value, eps, &path.child(segment.clone()));
                    (key.clone(), grad)
                })
                .collect(),
        ),
        ArgTree::Array(array) => {
            // Perturbed copies hold the promoted dtype so a step smaller than
            // the array's precision is not rounded away.
            let wide = array.map(array.dtype().promoted(), |s| s.value());
            let grad = array.map_indexed(array.dtype().promoted(), |coord, x| {
                let leaf_path = path.child(PathSegment::Coord(coord.to_vec()));
                trace!(path = %leaf_path, leaf = %x, "differencing leaf");
                let substitute = |v: Scalar| f(&ArgTree::Array(wide.with_element(coord, v)));
                estimate_derivative(substitute, x, eps).value()
            });
            ArgTree::Array(grad)
        }
    }
}

fn walk_items(
    f: &dyn Fn(&ArgTree) -> Scalar,
    parent: &ArgTree,
    items: &[ArgTree],
    eps: f64,
    path: &LeafPath,
) -> Vec<ArgTree> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let segment = PathSegment::Index(i);
            let substitute = |v: &ArgTree| f(&parent.with_child(&segment, v.clone()));
            walk(&substitute, item, eps, &path.child(segment.clone()))
        })
        .collect()
}

/// Numeric gradient of `f` with respect to each of its positional arguments.
///
/// The arguments are packed into one tuple and differenced with
/// [`map_leaves`], so the result is a `Tuple` with one gradient per argument.
/// Outputs of `f` other than real scalars are reduced with [`crate::to_scalar`]
/// first.
pub fn numeric_grad<F>(f: F, args: &[ArgTree], eps: f64) -> ArgTree
where
    F: Fn(&[ArgTree], &Kwargs) -> ArgTree,
{
    let kwargs = Kwargs::new();
    let packed = ArgTree::Tuple(args.to_vec());
    let unary = |t: &ArgTree| match t {
        ArgTree::Tuple(items) => scalarize(&f(items.as_slice(), &kwargs)),
        other => scalarize(&f(std::slice::from_ref(other), &kwargs)),
    };
    map_leaves(unary, &packed, eps)
}
