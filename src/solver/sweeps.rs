use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace, warn};

use super::{gauss_seidel, jacobi, Equation, Method, Seed, Solution, SolverConfig, Status};

/// Snapshot taken after one full pass over the unknowns.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    /// 1-based sweep counter.
    pub iteration: usize,
    pub vector: DVector<f64>,
    /// `‖x_k - x_{k-1}‖∞`
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running(usize),
    Converged,
    Exceeded,
}

/// Iterator over the sweeps of one solve.
///
/// Ends after the sweep that passes the convergence test or after the
/// `max_iterations`-th sweep, whichever comes first.
#[derive(Debug)]
pub struct Sweeps<'a> {
    matrix: &'a DMatrix<f64>,
    rhs: &'a DVector<f64>,
    method: Method,
    tolerance: f64,
    max_iterations: usize,
    previous: DVector<f64>,
    current: DVector<f64>,
    state: State,
    completed: usize,
    delta: f64,
}

impl<'a> Sweeps<'a> {
    pub(super) fn new(equation: &'a Equation, method: Method, config: &SolverConfig) -> Self {
        let previous = equation.initial_guess.clone();
        let current = match (method, config.seed) {
            (Method::GaussSeidel, Seed::InitialGuess) => previous.clone(),
            _ => DVector::zeros(previous.len()),
        };

        Self {
            matrix: &equation.input_matrix,
            rhs: &equation.expression_rhs,
            method,
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            previous,
            current,
            state: State::Running(1),
            completed: 0,
            delta: f64::INFINITY,
        }
    }

    /// `None` while sweeps remain.
    pub fn status(&self) -> Option<Status> {
        match self.state {
            State::Running(_) => None,
            State::Converged => Some(Status::Converged),
            State::Exceeded => Some(Status::IterationLimitExceeded),
        }
    }

    /// Runs any remaining sweeps and returns the last iterate.
    pub fn into_solution(mut self) -> Solution {
        while self.next().is_some() {}

        let status = self.status().unwrap_or(Status::IterationLimitExceeded);
        Solution {
            vector: self.previous,
            status,
            iterations: self.completed,
            delta: self.delta,
        }
    }
}

impl Iterator for Sweeps<'_> {
    type Item = Sweep;

    fn next(&mut self) -> Option<Sweep> {
        let State::Running(k) = self.state else {
            return None;
        };

        match self.method {
            Method::Jacobi => jacobi::sweep(self.matrix, self.rhs, &self.previous, &mut self.current),
            Method::GaussSeidel => gauss_seidel::sweep(self.matrix, self.rhs, &mut self.current),
        }

        let delta = (&self.current - &self.previous).amax();
        self.previous.copy_from(&self.current);
        self.completed = k;
        self.delta = delta;
        trace!(method = %self.method, iteration = k, delta, "sweep");

        self.state = if delta < self.tolerance {
            debug!(method = %self.method, iterations = k, delta, "converged");
            State::Converged
        } else if k >= self.max_iterations {
            warn!(method = %self.method, iterations = k, delta, "maximum number of iterations exceeded");
            State::Exceeded
        } else {
            State::Running(k + 1)
        };

        Some(Sweep {
            iteration: k,
            vector: self.current.clone(),
            delta,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Running(k) => (1, Some(self.max_iterations - k + 1)),
            _ => (0, Some(0)),
        }
    }
}
