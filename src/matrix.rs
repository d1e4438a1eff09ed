/*!
Stoichiometric matrix construction.

Rows follow the unique element order of the equation and columns follow the
compound order. Product columns are negated, and the last compound is held
out as the right-hand side, so the unknowns are the coefficients of every
other compound relative to the last one.
*/

use nalgebra::{DMatrix, DVector};

use crate::formula::{Equation, Role};

/// Relative residual under which a candidate solution is accepted.
pub const RESIDUAL_TOLERANCE: f64 = 1e-9;

/// The linear system `A · x = b`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    a: DMatrix<f64>,
    b: DVector<f64>,
}

impl LinearSystem {
    pub fn new(a: DMatrix<f64>, b: DVector<f64>) -> Self {
        assert_eq!(a.nrows(), b.len());

        LinearSystem { a, b }
    }

    /// Builds the system for a parsed equation.
    ///
    /// # Panics
    ///
    /// Panics when the equation has fewer than two compounds.
    pub fn from_equation(equation: &Equation) -> Self {
        let compounds = equation.compounds();
        assert!(compounds.len() >= 2);

        let held_out = compounds.len() - 1;
        let num_elements = equation.unique_elements().len();

        let mut a = DMatrix::zeros(num_elements, held_out);
        let mut b = DVector::zeros(num_elements);

        for (row, symbol) in equation.unique_elements().iter_enumerated() {
            let row = usize::from(row);
            for (col, compound) in compounds.iter_enumerated() {
                let col = usize::from(col);
                let atoms = compound.atoms_of(symbol) as f64;

                if col == held_out {
                    b[row] = atoms;
                } else if compound.role() == Role::Product && atoms != 0.0 {
                    // Only flip non-zero entries so that no -0 leaks out
                    a[(row, col)] = -atoms;
                } else {
                    a[(row, col)] = atoms;
                }
            }
        }

        trace!("Stoichiometric matrix A = {}, b = {}", a, b);

        LinearSystem { a, b }
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn num_equations(&self) -> usize {
        self.a.nrows()
    }

    pub fn num_unknowns(&self) -> usize {
        self.a.ncols()
    }

    pub fn is_square(&self) -> bool {
        self.a.is_square()
    }

    /// Euclidean norm of `A · x - b`.
    pub fn residual(&self, x: &DVector<f64>) -> f64 {
        (&self.a * x - &self.b).norm()
    }

    /// Returns true if `x` satisfies every element balance within tolerance.
    pub fn is_satisfied_by(&self, x: &DVector<f64>) -> bool {
        self.residual(x) <= RESIDUAL_TOLERANCE * self.b.norm().max(1.0)
    }
}
