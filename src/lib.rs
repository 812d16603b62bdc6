//! Jacobi and Gauss-Seidel iterations for square linear systems `Ax = b`.
//!
//! The numeric core lives in [`solver`] and [`dominance`]. [`input`] reads
//! equation files and [`trace`] renders per-sweep tables for the console.

pub mod dominance;
pub mod error;
pub mod input;
pub mod solver;
pub mod trace;

pub use dominance::is_diagonally_dominant;
pub use error::SolveError;
pub use solver::gauss_seidel::gauss_seidel_solve;
pub use solver::jacobi::jacobi_solve;
pub use solver::{
    Equation, Method, Seed, Solution, SolverConfig, Status, Sweep, Sweeps,
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
