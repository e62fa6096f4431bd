//! Numeric kinds of scalar leaves and their coarse equivalence classes.

use std::fmt;

use half::f16;
use num_complex::Complex64;

/// Storage precision of a scalar leaf or array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    F16,
    F32,
    F64,
    C64,
    C128,
    I64,
}

/// Coarse classification used when comparing values of differing precision.
///
/// Every real floating kind is `Real`, every complex floating kind is
/// `Complex`, and any other kind only matches itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquivalenceKind {
    Real,
    Complex,
    Other(DType),
}

impl DType {
    /// Map this kind to its equivalence class.
    pub fn equivalence_kind(self) -> EquivalenceKind {
        match self {
            DType::F16 | DType::F32 | DType::F64 => EquivalenceKind::Real,
            DType::C64 | DType::C128 => EquivalenceKind::Complex,
            other => EquivalenceKind::Other(other),
        }
    }

    pub fn is_complex(self) -> bool {
        matches!(self, DType::C64 | DType::C128)
    }

    pub fn is_float(self) -> bool {
        !matches!(self, DType::I64)
    }

    /// Round `value` to the precision of this kind.
    ///
    /// Real and integer kinds drop the imaginary part.
    pub fn round(self, value: Complex64) -> Complex64 {
        match self {
            DType::F16 => Complex64::new(f16::from_f64(value.re).to_f64(), 0.0),
            DType::F32 => Complex64::new(value.re as f32 as f64, 0.0),
            DType::F64 => Complex64::new(value.re, 0.0),
            DType::C64 => Complex64::new(value.re as f32 as f64, value.im as f32 as f64),
            DType::C128 => value,
            DType::I64 => Complex64::new(value.re as i64 as f64, 0.0),
        }
    }

    /// Full-width kind of the same family: `C128` for complex kinds, `F64`
    /// for everything else.
    pub fn promoted(self) -> DType {
        if self.is_complex() {
            DType::C128
        } else {
            DType::F64
        }
    }

    /// Kind used for the derivative of a leaf of this kind.
    ///
    /// Floating kinds keep their precision; integer leaves produce `F64`.
    pub fn derivative_dtype(self) -> DType {
        if self.is_float() {
            self
        } else {
            DType::F64
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F16 => "f16",
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::C64 => "c64",
            DType::C128 => "c128",
            DType::I64 => "i64",
        };
        f.write_str(name)
    }
}

impl fmt::Display for EquivalenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquivalenceKind::Real => f.write_str("real"),
            EquivalenceKind::Complex => f.write_str("complex"),
            EquivalenceKind::Other(dtype) => write!(f, "{}", dtype),
        }
    }
}
