use thiserror::Error;

use crate::shape::Shape;

/// Errors raised while constructing trees.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("data length {len} does not match shape {shape}")]
    DataLength { len: usize, shape: Shape },
}
