use nalgebra::{DMatrix, DVector};

use super::{Equation, Method, Solution, SolverConfig};
use crate::error::SolveError;

/// Solves `Ax = b` by Gauss-Seidel iteration.
///
/// With the default [`Seed::Zeros`](super::Seed::Zeros) the working vector
/// starts at zero and `x0` is only used for the first convergence check.
pub fn gauss_seidel_solve(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    config: &SolverConfig,
) -> Result<Solution, SolveError> {
    Equation::new(a.clone(), b.clone(), x0.clone())?.solve(Method::GaussSeidel, config)
}

/// One Gauss-Seidel sweep, updating `result_vector` in place.
///
/// Row `i` reads the values already written for rows `< i` in this sweep, so
/// rows must be visited in order.
pub(super) fn sweep(matrix: &DMatrix<f64>, rhs: &DVector<f64>, result_vector: &mut DVector<f64>) {
    let matrix_size = rhs.len();

    for i in 0..matrix_size {
        let mut s = 0.0;

        for j in 0..matrix_size {
            // skip current line
            if j == i {
                continue;
            }
            s += matrix[(i, j)] * result_vector[j];
        }

        result_vector[i] = (rhs[i] - s) / matrix[(i, i)];
    }
}
