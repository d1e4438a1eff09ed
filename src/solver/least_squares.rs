//! Fallback chain for singular or non-square systems: QR, then SVD.

use nalgebra::{DMatrix, DVector};

use crate::matrix::LinearSystem;
use crate::prelude::*;

use super::{Error, Method, Solution, UnsolvableSystem};

/// Lower bound of the singular value threshold used to decide effective rank.
pub const RANK_EPSILON: f64 = 1e-15;

/// Relative size under which a diagonal entry of `R` counts as zero.
const QR_EPSILON: f64 = 1e-10;

/// Solves an overdetermined (or square) system of full column rank with a
/// thin QR decomposition. Returns `None` when `A` is wide or rank deficient.
fn solve_qr(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    if a.nrows() < a.ncols() {
        return None;
    }

    let qr = a.clone().qr();
    let r = qr.r();

    let diagonal = r.diagonal();
    let largest = diagonal.amax();
    if largest == 0.0 || diagonal.iter().any(|d| d.abs() <= QR_EPSILON * largest) {
        return None;
    }

    r.solve_upper_triangular(&(qr.q().transpose() * b))
}

/// Singular value threshold scaled to the matrix, never below `RANK_EPSILON`.
fn rank_threshold(singular_values: &DVector<f64>, dimension: usize) -> f64 {
    (dimension as f64 * singular_values.amax() * f64::EPSILON).max(RANK_EPSILON)
}

pub(super) fn solve(system: &LinearSystem) -> Result<Solution, Error> {
    let (a, b) = (system.a(), system.b());

    if let Some(x) = solve_qr(a, b) {
        if system.is_satisfied_by(&x) {
            debug!("QR solution {}", x.transpose());
            return Ok(Solution::new(&x, Method::Qr));
        }
        debug!(
            "QR residual {:e} is too large, retrying with SVD",
            system.residual(&x)
        );
    }

    let svd = a.clone().svd(true, true);
    let threshold = rank_threshold(&svd.singular_values, a.nrows().max(a.ncols()));
    let rank = svd.rank(threshold);
    debug!(
        "Singular values {} give effective rank {}",
        svd.singular_values.transpose(),
        rank
    );

    ensure!(
        rank > 0,
        UnsolvableSystem {
            reason: "the stoichiometric matrix has effective rank 0",
        }
    );
    ensure!(
        rank == a.ncols(),
        UnsolvableSystem {
            reason: format!(
                "the balance has no unique solution (rank {} with {} unknowns)",
                rank,
                a.ncols()
            ),
        }
    );

    let x = match svd.solve(b, threshold) {
        Ok(x) => x,
        Err(reason) => return UnsolvableSystem { reason }.fail(),
    };

    ensure!(
        system.is_satisfied_by(&x),
        UnsolvableSystem {
            reason: format!(
                "least squares residual {:e} leaves elements unbalanced",
                system.residual(&x)
            ),
        }
    );

    Ok(Solution::new(&x, Method::LeastSquares))
}
