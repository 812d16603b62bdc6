use core::fmt;

use nalgebra::{DMatrix, DVector};
use serde::Deserialize;
use tracing::warn;

use crate::dominance::{is_diagonally_dominant, non_dominant_rows};
use crate::error::SolveError;

pub mod gauss_seidel;
pub mod jacobi;
mod sweeps;

pub use sweeps::{Sweep, Sweeps};

/// Default bound on the infinity norm of the difference of successive iterates.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Default bound on the number of sweeps.
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Every component of the new iterate is computed from the previous iterate.
    Jacobi,
    /// Components are overwritten in row order and reused within the same sweep.
    GaussSeidel,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Jacobi => write!(f, "Jacobi"),
            Method::GaussSeidel => write!(f, "Gauss-Seidel"),
        }
    }
}

/// Starting contents of the Gauss-Seidel working vector.
///
/// Jacobi always starts from the initial guess and ignores this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seed {
    /// Start from zeros; the initial guess only takes part in the first
    /// convergence comparison.
    #[default]
    Zeros,
    /// Start from the initial guess.
    InitialGuess,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Refuse to iterate on matrices that are not strictly diagonally dominant.
    pub enforce_dominance: bool,
    pub seed: Seed,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            enforce_dominance: false,
            seed: Seed::Zeros,
        }
    }
}

impl SolverConfig {
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_enforce_dominance(mut self, enforce_dominance: bool) -> Self {
        self.enforce_dominance = enforce_dominance;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), SolveError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SolveError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(SolveError::InvalidMaxIterations);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Converged,
    IterationLimitExceeded,
}

/// Last computed iterate together with how the iteration ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub vector: DVector<f64>,
    pub status: Status,
    /// Number of completed sweeps.
    pub iterations: usize,
    /// Infinity norm of the difference between the last two iterates.
    pub delta: f64,
}

impl Solution {
    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self.status, Status::Converged)
    }

    /// `‖Ax - b‖∞` for the returned vector.
    pub fn residual(&self, matrix: &DMatrix<f64>, rhs: &DVector<f64>) -> f64 {
        (matrix * &self.vector - rhs).amax()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (index, value) in self.vector.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub input_matrix: DMatrix<f64>,
    pub expression_rhs: DVector<f64>,
    pub initial_guess: DVector<f64>,
}

impl Equation {
    /// Builds an equation after checking that the shapes agree.
    pub fn new(
        input_matrix: DMatrix<f64>,
        expression_rhs: DVector<f64>,
        initial_guess: DVector<f64>,
    ) -> Result<Self, SolveError> {
        let equation = Self {
            input_matrix,
            expression_rhs,
            initial_guess,
        };
        equation.check_shape()?;
        Ok(equation)
    }

    /// Same as [`Equation::new`] with a zero initial guess.
    pub fn with_zero_guess(
        input_matrix: DMatrix<f64>,
        expression_rhs: DVector<f64>,
    ) -> Result<Self, SolveError> {
        let size = expression_rhs.len();
        Self::new(input_matrix, expression_rhs, DVector::zeros(size))
    }

    pub fn size(&self) -> usize {
        self.expression_rhs.len()
    }

    pub fn is_diagonally_dominant(&self) -> bool {
        is_diagonally_dominant(&self.input_matrix)
    }

    /// Lazily runs the iteration, one [`Sweep`] per item.
    ///
    /// All checks happen here, so the iterator itself cannot fail.
    pub fn sweeps(&self, method: Method, config: &SolverConfig) -> Result<Sweeps<'_>, SolveError> {
        config.validate()?;
        self.check_shape()?;
        self.check_pivots()?;

        if !self.is_diagonally_dominant() {
            if config.enforce_dominance {
                return Err(SolveError::NotDiagonallyDominant);
            }
            let failing_rows = non_dominant_rows(&self.input_matrix);
            warn!(
                %method,
                ?failing_rows,
                "matrix is not diagonally dominant, convergence is not guaranteed"
            );
        }

        Ok(Sweeps::new(self, method, config))
    }

    /// Solves according to `config.enforce_dominance`.
    pub fn solve(&self, method: Method, config: &SolverConfig) -> Result<Solution, SolveError> {
        self.solve_traced(method, config, |_| {})
    }

    /// Calls `observer` with every sweep before returning the solution.
    pub fn solve_traced<F>(
        &self,
        method: Method,
        config: &SolverConfig,
        mut observer: F,
    ) -> Result<Solution, SolveError>
    where
        F: FnMut(&Sweep),
    {
        let mut sweeps = self.sweeps(method, config)?;
        for sweep in sweeps.by_ref() {
            observer(&sweep);
        }
        Ok(sweeps.into_solution())
    }

    /// Refuses with [`SolveError::NotDiagonallyDominant`] unless the matrix is
    /// strictly diagonally dominant.
    pub fn solve_if_dominant(
        &self,
        method: Method,
        config: &SolverConfig,
    ) -> Result<Solution, SolveError> {
        let config = config.clone().with_enforce_dominance(true);
        self.solve(method, &config)
    }

    /// Iterates even without diagonal dominance, logging a warning.
    pub fn solve_regardless(
        &self,
        method: Method,
        config: &SolverConfig,
    ) -> Result<Solution, SolveError> {
        let config = config.clone().with_enforce_dominance(false);
        self.solve(method, &config)
    }

    fn check_shape(&self) -> Result<(), SolveError> {
        let (rows, cols) = self.input_matrix.shape();
        if rows != cols {
            return Err(SolveError::NonSquare { rows, cols });
        }
        if rows == 0 {
            return Err(SolveError::EmptySystem);
        }
        if self.expression_rhs.len() != rows {
            return Err(SolveError::DimensionMismatch {
                what: "right hand side",
                expected: rows,
                actual: self.expression_rhs.len(),
            });
        }
        if self.initial_guess.len() != rows {
            return Err(SolveError::DimensionMismatch {
                what: "initial guess",
                expected: rows,
                actual: self.initial_guess.len(),
            });
        }
        Ok(())
    }

    fn check_pivots(&self) -> Result<(), SolveError> {
        match self.input_matrix.diagonal().iter().position(|pivot| *pivot == 0.0) {
            Some(row) => Err(SolveError::ZeroPivot { row }),
            None => Ok(()),
        }
    }
}
