use std::cmp::Ordering;

use nalgebra::{DMatrix, DVector};

use crate::matrix::LinearSystem;

use super::{least_squares, Error, FallbackReason, Method, Solution, Solver};

/// Entries with a smaller magnitude are treated as zero while pivoting.
const PIVOT_EPSILON: f64 = 1e-10;

/// Result of reducing an augmented matrix to reduced row-echelon form.
#[derive(Debug)]
struct Echelon {
    /// Pivot column of each leading row, in row order.
    pivots: Vec<usize>,
    /// Product of the pivots with the sign of the row permutation.
    /// Zero when a column had no pivot.
    determinant: f64,
}

/// Gauss-Jordan elimination with partial pivoting on `[A|b]`.
///
/// `num_unknowns` is the number of columns of `A`; the remaining column
/// is carried along as the right-hand side.
fn reduce_row_echelon(augmented: &mut DMatrix<f64>, num_unknowns: usize) -> Echelon {
    let (num_rows, num_cols) = augmented.shape();
    let mut pivots = Vec::with_capacity(num_unknowns.min(num_rows));
    let mut determinant = 1.0;

    let mut lead = 0;
    for row in 0..num_rows {
        // Find the largest entry at or below `row` in the first usable column
        let pivot_row = loop {
            if lead >= num_unknowns {
                break None;
            }

            let candidate = (row..num_rows)
                .max_by(|&i, &j| {
                    augmented[(i, lead)]
                        .abs()
                        .partial_cmp(&augmented[(j, lead)].abs())
                        .unwrap_or(Ordering::Equal)
                })
                .unwrap_or(row);

            if augmented[(candidate, lead)].abs() > PIVOT_EPSILON {
                break Some(candidate);
            }

            determinant = 0.0;
            lead += 1;
        };

        let pivot_row = match pivot_row {
            Some(pivot_row) => pivot_row,
            None => break,
        };

        if pivot_row != row {
            augmented.swap_rows(pivot_row, row);
            determinant = -determinant;
        }

        let pivot = augmented[(row, lead)];
        determinant *= pivot;
        for col in 0..num_cols {
            augmented[(row, col)] /= pivot;
        }

        for other in (0..num_rows).filter(|&other| other != row) {
            let factor = augmented[(other, lead)];
            if factor == 0.0 {
                continue;
            }
            for col in 0..num_cols {
                augmented[(other, col)] -= factor * augmented[(row, col)];
            }
        }

        pivots.push(lead);
        lead += 1;
    }

    if pivots.len() < num_unknowns {
        determinant = 0.0;
    }

    Echelon {
        pivots,
        determinant,
    }
}

/// Reduces `[A|b]` to reduced row-echelon form and reads the solution off
/// the last column. Handles square and overdetermined systems as long as they
/// are consistent and of full column rank.
///
/// Unlike [`InverseSolver`](super::InverseSolver), a tall system is solved
/// here directly instead of being handed to the least squares fallback.
#[derive(Debug)]
pub struct EliminationSolver {
    system: LinearSystem,
}

impl EliminationSolver {
    fn solve_reduced(&self) -> Result<Solution, FallbackReason> {
        let (a, b) = (self.system.a(), self.system.b());
        let num_unknowns = self.system.num_unknowns();

        let mut augmented = DMatrix::from_fn(a.nrows(), num_unknowns + 1, |row, col| {
            if col < num_unknowns {
                a[(row, col)]
            } else {
                b[row]
            }
        });
        let echelon = reduce_row_echelon(&mut augmented, num_unknowns);
        let rank = echelon.pivots.len();

        // Rows below the rank are zero on the left, so their right-hand side must be too
        if (rank..augmented.nrows()).any(|row| augmented[(row, num_unknowns)].abs() > PIVOT_EPSILON) {
            return Err(FallbackReason::Inconsistent);
        }
        if rank < num_unknowns {
            return Err(FallbackReason::RankDeficient);
        }

        let x = DVector::from_fn(num_unknowns, |row, _| augmented[(row, num_unknowns)]);
        debug!(
            "Elimination solution {} with pivots {:?}",
            x.transpose(),
            echelon.pivots
        );

        let determinant = echelon.determinant.round();
        if self.system.is_square() && determinant != 0.0 {
            Ok(Solution::with_determinant(&x, Method::Elimination, determinant))
        } else {
            Ok(Solution::new(&x, Method::Elimination))
        }
    }
}

impl Solver for EliminationSolver {
    fn new(system: LinearSystem) -> Self {
        EliminationSolver { system }
    }

    fn solve(self) -> Result<Solution, Error> {
        match self.solve_reduced() {
            Ok(solution) => Ok(solution),
            Err(reason) => {
                debug!("Elimination failed ({}), using fallback", reason);
                least_squares::solve(&self.system).map(|solution| solution.fell_back(reason))
            }
        }
    }
}
