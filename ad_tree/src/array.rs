//! Rectangular arrays of scalars sharing one dtype.

use std::fmt;

use num_complex::Complex64;

use crate::dtype::{DType, EquivalenceKind};
use crate::error::TreeError;
use crate::scalar::Scalar;
use crate::shape::{Indices, Shape, Strides};

/// Dense row-major array.
///
/// Elements are stored at `Complex64` width, rounded to `dtype`. Real arrays
/// always hold a zero imaginary part.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    dtype: DType,
    shape: Shape,
    strides: Strides,
    data: Vec<Complex64>,
}

impl Array {
    /// Create an array from a flat row-major data vector and shape.
    pub fn from_vec(dtype: DType, data: Vec<Complex64>, shape: Shape) -> Result<Self, TreeError> {
        if data.len() != shape.numel() {
            return Err(TreeError::DataLength {
                len: data.len(),
                shape,
            });
        }
        let strides = shape.contiguous_strides();
        Ok(Array {
            dtype,
            shape,
            strides,
            data: data.into_iter().map(|v| dtype.round(v)).collect(),
        })
    }

    /// Create an `F64` array from real values.
    pub fn from_real(data: Vec<f64>, shape: Shape) -> Result<Self, TreeError> {
        let data = data.into_iter().map(|v| Complex64::new(v, 0.0)).collect();
        Array::from_vec(DType::F64, data, shape)
    }

    /// Create a `C128` array from complex values.
    pub fn from_complex(data: Vec<Complex64>, shape: Shape) -> Result<Self, TreeError> {
        Array::from_vec(DType::C128, data, shape)
    }

    /// Create an array of zeros with the given shape.
    pub fn zeros(dtype: DType, shape: Shape) -> Self {
        let strides = shape.contiguous_strides();
        Array {
            dtype,
            data: vec![Complex64::new(0.0, 0.0); shape.numel()],
            shape,
            strides,
        }
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn kind(&self) -> EquivalenceKind {
        self.dtype.equivalence_kind()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Row-major coordinates of every element.
    pub fn indices(&self) -> Indices {
        self.shape.indices()
    }

    /// Element at `coord`, or `None` if the coordinate is out of bounds.
    pub fn get(&self, coord: &[usize]) -> Option<Scalar> {
        let flat = self.flat_index(coord)?;
        Some(Scalar::new(self.dtype, self.data[flat]))
    }

    /// A copy of this array with the element at `coord` replaced.
    ///
    /// The value is rounded to this array's dtype.
    ///
    /// # Panics
    /// Panics if `coord` is out of bounds.
    pub fn with_element(&self, coord: &[usize], value: Scalar) -> Array {
        let flat = self
            .flat_index(coord)
            .unwrap_or_else(|| panic!("coordinate {:?} out of bounds for {}", coord, self.shape));
        let mut copy = self.clone();
        copy.data[flat] = self.dtype.round(value.value());
        copy
    }

    /// Iterate over elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Scalar> + '_ {
        self.data.iter().map(move |v| Scalar::new(self.dtype, *v))
    }

    /// Apply `op` to every element, producing an array of `dtype`.
    pub fn map<F>(&self, dtype: DType, mut op: F) -> Array
    where
        F: FnMut(Scalar) -> Complex64,
    {
        Array {
            dtype,
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            data: self.iter().map(|s| dtype.round(op(s))).collect(),
        }
    }

    /// Like [`Array::map`], with each element's coordinate passed to `op`.
    pub fn map_indexed<F>(&self, dtype: DType, mut op: F) -> Array
    where
        F: FnMut(&[usize], Scalar) -> Complex64,
    {
        Array {
            dtype,
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            data: self
                .indices()
                .zip(self.iter())
                .map(|(coord, s)| dtype.round(op(&coord, s)))
                .collect(),
        }
    }

    /// Combine two arrays of the same shape elementwise, producing an array
    /// of `dtype`. Returns `None` when the shapes differ.
    pub fn zip_with<F>(&self, other: &Array, dtype: DType, mut op: F) -> Option<Array>
    where
        F: FnMut(Scalar, Scalar) -> Complex64,
    {
        if self.shape != other.shape {
            return None;
        }
        Some(Array {
            dtype,
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            data: self
                .iter()
                .zip(other.iter())
                .map(|(a, b)| dtype.round(op(a, b)))
                .collect(),
        })
    }

    fn flat_index(&self, coord: &[usize]) -> Option<usize> {
        if coord.len() != self.shape.ndim() {
            return None;
        }
        if coord.iter().zip(self.shape.dims()).any(|(i, d)| i >= d) {
            return None;
        }
        Some(self.strides.index(coord))
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array(shape={}, dtype={}, [", self.shape, self.dtype)?;
        for (i, s) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "])")
    }
}
