//! Tolerances and step sizes.
//!
//! All settings have defaults matching the conventional checker constants and
//! can be loaded from any serde format; missing fields fall back to defaults.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Default finite-difference step.
pub const DEFAULT_EPS: f64 = 1e-4;

/// Default relative tolerance.
pub const DEFAULT_RTOL: f64 = 1e-4;

/// Default absolute tolerance.
pub const DEFAULT_ATOL: f64 = 1e-6;

/// Closeness rule `|a - b| <= atol + rtol * |b|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: DEFAULT_RTOL,
            atol: DEFAULT_ATOL,
        }
    }
}

impl Tolerance {
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    /// Whether `actual` is close to `expected`. NaN is never close.
    pub fn is_close(&self, actual: Complex64, expected: Complex64) -> bool {
        (actual - expected).norm() <= self.atol + self.rtol * expected.norm()
    }
}

/// Settings for [`crate::check_grads_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradCheckConfig {
    /// Finite-difference step.
    pub eps: f64,
    pub tolerance: Tolerance,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPS,
            tolerance: Tolerance::default(),
        }
    }
}

impl GradCheckConfig {
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Settings for [`crate::quick_grad_check`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeOptions {
    /// Print progress and both estimates to stdout.
    pub verbose: bool,
    /// Finite-difference step along the direction.
    pub eps: f64,
    pub tolerance: Tolerance,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            eps: DEFAULT_EPS,
            tolerance: Tolerance::default(),
        }
    }
}

impl ProbeOptions {
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}
