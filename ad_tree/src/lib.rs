//! # ad_tree - Nested Argument Trees for Gradient Checking
//!
//! This crate provides the value model that the gradient checker walks: function
//! arguments are arbitrarily nested trees whose leaves are real or complex
//! scalars.
//!
//! ## Overview
//!
//! The core abstractions are:
//! - [`DType`] and [`EquivalenceKind`] - Leaf precision and its coarse real/complex/other class
//! - [`Scalar`] - A single leaf value tagged with its dtype
//! - [`Shape`] and [`Strides`] - Array shape, row-major layout and coordinate iteration
//! - [`Array`] - Rectangular array of scalars sharing one dtype
//! - [`ArgTree`] - Scalars, tuples, lists, string-keyed maps and arrays, nested freely
//! - [`LeafPath`] - Route from the root of a tree to one leaf, for diagnostics
//!
//! ## Example
//!
//! ```
//! use ad_tree::prelude::*;
//!
//! let weights = Array::from_real(vec![1.0, 2.0, 3.0, 4.0], Shape::new(vec![2, 2])).unwrap();
//! let params = ArgTree::map([
//!     ("w", ArgTree::Array(weights)),
//!     ("b", ArgTree::list(vec![ArgTree::real(0.5), ArgTree::complex(1.0, -1.0)])),
//! ]);
//!
//! assert_eq!(params.num_leaves(), 6);
//! ```

pub mod array;
pub mod dtype;
pub mod error;
pub mod scalar;
pub mod shape;
pub mod tree;

pub use array::Array;
pub use dtype::{DType, EquivalenceKind};
pub use error::TreeError;
pub use scalar::Scalar;
pub use shape::{Indices, Shape, Strides};
pub use tree::{ArgTree, LeafPath, NodeKind, PathSegment};

/// Re-exported so callers can build complex leaves without a direct dependency.
pub use num_complex::Complex64;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::array::Array;
    pub use crate::dtype::{DType, EquivalenceKind};
    pub use crate::scalar::Scalar;
    pub use crate::shape::Shape;
    pub use crate::tree::{ArgTree, LeafPath, NodeKind, PathSegment};
    pub use num_complex::Complex64;
}
