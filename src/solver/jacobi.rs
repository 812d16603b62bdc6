use nalgebra::{DMatrix, DVector};

use super::{Equation, Method, Solution, SolverConfig};
use crate::error::SolveError;

/// Solves `Ax = b` by Jacobi iteration starting from `x0`.
pub fn jacobi_solve(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    config: &SolverConfig,
) -> Result<Solution, SolveError> {
    Equation::new(a.clone(), b.clone(), x0.clone())?.solve(Method::Jacobi, config)
}

/// One Jacobi sweep: `next` is computed entirely from `previous`.
///
/// Rows are independent of each other.
pub(super) fn sweep(
    matrix: &DMatrix<f64>,
    rhs: &DVector<f64>,
    previous: &DVector<f64>,
    next: &mut DVector<f64>,
) {
    let matrix_size = rhs.len();

    for i in 0..matrix_size {
        let mut s = 0.0;

        for j in 0..matrix_size {
            if j == i {
                continue;
            }
            s += matrix[(i, j)] * previous[j];
        }

        next[i] = (rhs[i] - s) / matrix[(i, i)];
    }
}
