//! Console output: the dominance status line and the per-sweep table.

use std::io::{self, Write};

use nalgebra::DMatrix;

use crate::dominance::non_dominant_rows;
use crate::solver::{Method, Sweep};

const COLUMN_WIDTH: usize = 15;

/// Writes one row per [`Sweep`]: the iteration number followed by every
/// component of the iterate.
pub struct TableReporter<W: Write> {
    out: W,
}

impl<W: Write> TableReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Column titles `x1..xn` and a rule underneath.
    pub fn header(&mut self, unknowns: usize) -> io::Result<()> {
        write!(self.out, "{:<COLUMN_WIDTH$}", "Iteration")?;
        for index in 1..=unknowns {
            write!(self.out, " {:>COLUMN_WIDTH$}", format!("x{index}"))?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", "-".repeat((COLUMN_WIDTH + 1) * (unknowns + 1)))
    }

    pub fn row(&mut self, sweep: &Sweep) -> io::Result<()> {
        write!(self.out, "{:<COLUMN_WIDTH$}", sweep.iteration)?;
        for value in sweep.vector.iter() {
            write!(self.out, " {:>COLUMN_WIDTH$.10}", value)?;
        }
        writeln!(self.out)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Status line printed before a method runs. Failing rows are 1-based.
pub fn dominance_message(matrix: &DMatrix<f64>, method: Method, enforce_dominance: bool) -> String {
    let failing_rows = non_dominant_rows(matrix);
    if failing_rows.is_empty() {
        return format!("Matrix is diagonally dominant - performing {method} algorithm:");
    }

    let rows = failing_rows
        .iter()
        .map(|row| (row + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if enforce_dominance {
        format!("Matrix is not diagonally dominant (rows {rows})! Skipping {method} algorithm.")
    } else {
        format!(
            "Matrix is not diagonally dominant (rows {rows}) - performing {method} algorithm \
             anyway, convergence is not guaranteed:"
        )
    }
}
