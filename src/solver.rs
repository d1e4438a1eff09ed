use std::fmt::Display;

use nalgebra::DVector;
use serde::Serialize;

use crate::matrix::LinearSystem;
use crate::prelude::*;

mod elimination;
mod inverse;
mod least_squares;

pub use elimination::EliminationSolver;
pub use inverse::InverseSolver;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("No stoichiometric solution exists: {}", reason))]
    UnsolvableSystem { reason: String },
}

/// The method that produced a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Inverse,
    Elimination,
    Qr,
    LeastSquares,
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Inverse => write!(f, "matrix inverse"),
            Method::Elimination => write!(f, "Gauss-Jordan elimination"),
            Method::Qr => write!(f, "QR decomposition"),
            Method::LeastSquares => write!(f, "SVD least squares"),
        }
    }
}

/// Why the primary path handed the system over to least squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NonSquare,
    Singular,
    RankDeficient,
    Inconsistent,
}

impl Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::NonSquare => write!(f, "matrix is not square"),
            FallbackReason::Singular => write!(f, "matrix is singular"),
            FallbackReason::RankDeficient => write!(f, "matrix is rank deficient"),
            FallbackReason::Inconsistent => write!(f, "reduced system is inconsistent"),
        }
    }
}

/// Real-valued coefficients, one per compound with the held-out compound last.
/// Invariant: every coefficient is non-negative.
#[derive(Debug, Clone)]
pub struct Solution {
    coefficients: Vec<f64>,
    method: Method,
    determinant: Option<f64>,
    fallback: Option<FallbackReason>,
}

impl Solution {
    /// Appends the held-out coefficient (1) to `x` and discards signs.
    fn new(x: &DVector<f64>, method: Method) -> Self {
        let coefficients = x
            .iter()
            .chain(std::iter::once(&1.0))
            .map(|value| value.abs())
            .collect();

        Solution {
            coefficients,
            method,
            determinant: None,
            fallback: None,
        }
    }

    /// Builds a solution of a square system with a non-zero integer determinant.
    ///
    /// By Cramer's rule every `x[i] * determinant` is an integer, which is the
    /// held-out compound's coefficient scaled to `determinant`. Rounding it
    /// removes floating point noise before the table lookup.
    fn with_determinant(x: &DVector<f64>, method: Method, determinant: f64) -> Self {
        assert!(determinant != 0.0);

        let snapped = x.map(|value| (value * determinant).round() / determinant);
        Solution {
            determinant: Some(determinant),
            ..Solution::new(&snapped, method)
        }
    }

    fn fell_back(self, reason: FallbackReason) -> Self {
        Solution {
            fallback: Some(reason),
            ..self
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Rounded `det(A)`, available only on the primary path of a regular system.
    pub fn determinant(&self) -> Option<f64> {
        self.determinant
    }

    pub fn fallback(&self) -> Option<FallbackReason> {
        self.fallback
    }
}

pub trait Solver {
    /// Creates a new solver instance.
    fn new(system: LinearSystem) -> Self;

    /// Solves the stoichiometric system with the solver.
    /// Falls back to least squares when the primary path cannot be used,
    /// and returns an error only if that fails too.
    fn solve(self) -> Result<Solution, Error>;
}
