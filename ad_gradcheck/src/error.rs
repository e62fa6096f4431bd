//! Failure taxonomy for gradient checks.
//!
//! Every error carries the leaf path where it was detected and enough of both
//! operands to diagnose the mismatch without rerunning the check.

use ad_tree::{ArgTree, DType, LeafPath, NodeKind, Shape};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradCheckError {
    #[error("no arguments given")]
    NoArguments,

    #[error("type mismatch at {path}: types are {lhs} and {rhs}")]
    TypeMismatch {
        path: LeafPath,
        lhs: NodeKind,
        rhs: NodeKind,
    },

    #[error("length mismatch at {path}: {lhs} vs {rhs}")]
    LengthMismatch {
        path: LeafPath,
        lhs: usize,
        rhs: usize,
    },

    #[error("key {key:?} at {path} is missing from the right-hand side")]
    KeyMismatch { path: LeafPath, key: String },

    #[error("shape mismatch at {path}: shapes are {lhs} and {rhs}")]
    ShapeMismatch {
        path: LeafPath,
        lhs: Shape,
        rhs: Shape,
    },

    #[error("dtype mismatch at {path}: element types are {lhs} and {rhs}")]
    DtypeMismatch {
        path: LeafPath,
        lhs: DType,
        rhs: DType,
    },

    #[error("tolerance exceeded at {path}: diffs are:\n{diff}.\nA is:\n{lhs}.\nB is:\n{rhs}.")]
    ToleranceExceeded {
        path: LeafPath,
        diff: Box<ArgTree>,
        lhs: Box<ArgTree>,
        rhs: Box<ArgTree>,
    },

    #[error("random direction has degenerate norm {norm}")]
    DegenerateDirection { norm: f64 },
}

impl GradCheckError {
    /// True for failures of shape or kind, which no tolerance can fix.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            GradCheckError::TypeMismatch { .. }
                | GradCheckError::LengthMismatch { .. }
                | GradCheckError::KeyMismatch { .. }
                | GradCheckError::ShapeMismatch { .. }
                | GradCheckError::DtypeMismatch { .. }
        )
    }

    /// Leaf path where the failure was detected, if any.
    pub fn path(&self) -> Option<&LeafPath> {
        match self {
            GradCheckError::TypeMismatch { path, .. }
            | GradCheckError::LengthMismatch { path, .. }
            | GradCheckError::KeyMismatch { path, .. }
            | GradCheckError::ShapeMismatch { path, .. }
            | GradCheckError::DtypeMismatch { path, .. }
            | GradCheckError::ToleranceExceeded { path, .. } => Some(path),
            GradCheckError::NoArguments | GradCheckError::DegenerateDirection { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GradCheckError>;
