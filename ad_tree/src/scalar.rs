//! Scalar leaves.

use std::fmt;

use num_complex::Complex64;

use crate::dtype::{DType, EquivalenceKind};

/// A single numeric leaf.
///
/// The value is held at `Complex64` width after rounding to `dtype`, so a
/// `Scalar::f32(0.1)` stores exactly the nearest `f32`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar {
    dtype: DType,
    value: Complex64,
}

impl Scalar {
    /// Create a scalar of the given kind, rounding `value` to its precision.
    pub fn new(dtype: DType, value: Complex64) -> Self {
        Scalar {
            dtype,
            value: dtype.round(value),
        }
    }

    pub fn f64(value: f64) -> Self {
        Scalar::new(DType::F64, Complex64::new(value, 0.0))
    }

    pub fn f32(value: f32) -> Self {
        Scalar::new(DType::F32, Complex64::new(value as f64, 0.0))
    }

    pub fn f16(value: f64) -> Self {
        Scalar::new(DType::F16, Complex64::new(value, 0.0))
    }

    pub fn c128(re: f64, im: f64) -> Self {
        Scalar::new(DType::C128, Complex64::new(re, im))
    }

    pub fn c64(re: f32, im: f32) -> Self {
        Scalar::new(DType::C64, Complex64::new(re as f64, im as f64))
    }

    pub fn i64(value: i64) -> Self {
        Scalar::new(DType::I64, Complex64::new(value as f64, 0.0))
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn kind(&self) -> EquivalenceKind {
        self.dtype.equivalence_kind()
    }

    pub fn is_complex(&self) -> bool {
        self.dtype.is_complex()
    }

    /// The value at full `Complex64` width.
    pub fn value(&self) -> Complex64 {
        self.value
    }

    /// Real part of the value.
    pub fn re(&self) -> f64 {
        self.value.re
    }

    /// A copy shifted by `delta`, widened to the full-precision kind of the
    /// same family so that small steps are not rounded away.
    pub fn perturbed(&self, delta: Complex64) -> Scalar {
        Scalar::new(self.dtype.promoted(), self.value + delta)
    }

    /// Build a derivative value of the same equivalence kind as `leaf`.
    pub fn coerced_like(leaf: &Scalar, value: Complex64) -> Scalar {
        Scalar::new(leaf.dtype.derivative_dtype(), value)
    }
}

impl From<Complex64> for Scalar {
    fn from(v: Complex64) -> Self {
        Scalar::new(DType::C128, v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dtype.is_complex() {
            write!(f, "{}{:+}i", self.value.re, self.value.im)
        } else if self.dtype.is_float() {
            write!(f, "{}", self.value.re)
        } else {
            write!(f, "{}", self.value.re as i64)
        }
    }
}
