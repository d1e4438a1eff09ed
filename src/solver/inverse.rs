use crate::matrix::LinearSystem;

use super::{least_squares, Error, FallbackReason, Method, Solution, Solver};

/// Solves `x = A⁻¹ · b` and recovers the held-out coefficient from `det(A)`.
///
/// Only valid while the stoichiometric system has a one-dimensional null
/// space, i.e. `A` is square and regular. Everything else is delegated to
/// the least squares fallback.
#[derive(Debug)]
pub struct InverseSolver {
    system: LinearSystem,
}

impl InverseSolver {
    fn solve_regular(&self) -> Result<Solution, FallbackReason> {
        if !self.system.is_square() {
            return Err(FallbackReason::NonSquare);
        }

        let determinant = self.system.a().determinant().round();
        if determinant == 0.0 {
            return Err(FallbackReason::Singular);
        }

        let inverse = self
            .system
            .a()
            .clone()
            .try_inverse()
            .ok_or(FallbackReason::Singular)?;
        let x = inverse * self.system.b();

        debug!("Inverse solution {} with det(A) = {}", x.transpose(), determinant);
        Ok(Solution::with_determinant(&x, Method::Inverse, determinant))
    }
}

impl Solver for InverseSolver {
    fn new(system: LinearSystem) -> Self {
        InverseSolver { system }
    }

    fn solve(self) -> Result<Solution, Error> {
        match self.solve_regular() {
            Ok(solution) => Ok(solution),
            Err(reason) => {
                debug!("Inverse path unavailable ({}), using fallback", reason);
                least_squares::solve(&self.system).map(|solution| solution.fell_back(reason))
            }
        }
    }
}
