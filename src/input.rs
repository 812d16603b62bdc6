use nalgebra::{DMatrix, DVector};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json as json;
use std::fs;
use std::io::{self, IsTerminal, Read};
use thiserror::Error;

use crate::solver::{Equation, Method, Seed, SolverConfig, DEFAULT_MAX_ITERATIONS};

const INVALID_NUMBER_ERROR_MESSAGE: &str =
    "Expected a finite decimal or floating point number";
const ZERO_ON_DIAGONAL_ERROR_MESSAGE: &str =
    "Zero on diagonal detected! Expected non-zero value on diagonal!";

/// Everything needed to run the solvers on one input file.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub equation: Equation,
    pub solver: SolverConfig,
    pub methods: Vec<Method>,
}

fn build_decimal_from_string(input: &str) -> Result<Decimal, rust_decimal::Error> {
    let input = input.trim();
    Decimal::from_str(input).or_else(|_| Decimal::from_scientific(input))
}

/// Exact decimal text first; magnitudes beyond `Decimal`'s ~7.9e28 range fall
/// back to plain `f64` parsing.
fn build_float_from_string(input: &str) -> Result<f64, String> {
    let input = input.trim();
    build_decimal_from_string(input)
        .ok()
        .and_then(|decimal| decimal.to_f64())
        .or_else(|| input.parse::<f64>().ok().filter(|value| value.is_finite()))
        .ok_or_else(|| format!("{INVALID_NUMBER_ERROR_MESSAGE}, got {input:?}"))
}

/// Reads the equation from the first command line argument, stdin, or an
/// interactive prompt, in that order.
pub fn build_configuration() -> Result<Configuration, InputError> {
    let content = match determine_input_method() {
        InputMethod::Argument(filepath) => fs::read_to_string(filepath),
        InputMethod::Stdin => read_from_stdin(),
        InputMethod::None => return Err(InputError::NoInputProvided),
    }?;

    parse_configuration(&content)
}

/// Parses the JSON equation format.
pub fn parse_configuration(content: &str) -> Result<Configuration, InputError> {
    let parsed = json::from_str::<EquationInput>(content)?;
    let matrix_size = compute_matrix_size(&parsed.input_matrix, &parsed.expression_rhs)?;

    let input_matrix: Result<Vec<_>, _> = parsed
        .input_matrix
        .iter()
        .flatten()
        .enumerate()
        .map(|(index, input)| {
            build_float_from_string(input).map_err(|message| PositionalError {
                row: index / matrix_size + 1,
                column: index % matrix_size + 1,
                message,
            })
        })
        .collect();

    let matrix = DMatrix::from_row_iterator(matrix_size, matrix_size, input_matrix?);
    check_for_zeroes_on_diagonal((&matrix, matrix_size))?;

    let expression_rhs = parse_vector(&parsed.expression_rhs, InputError::RightHandSideError)?;

    let initial_guess = match &parsed.initial_guess {
        Some(guess) => {
            if guess.len() != matrix_size {
                return Err(MatrixSizeError::WrongInitialGuess(WrongSize {
                    actual: guess.len(),
                    expected: matrix_size,
                })
                .into());
            }
            parse_vector(guess, InputError::InitialGuessError)?
        }
        None => DVector::zeros(matrix_size),
    };

    let tolerance = match &parsed.epsilon {
        Some(epsilon) => {
            let tolerance = build_float_from_string(epsilon).map_err(InputError::EpsilonError)?;
            if tolerance < 0.0 {
                return Err(InputError::EpsilonError(format!(
                    "expected non-negative value, got {tolerance}"
                )));
            }
            tolerance
        }
        None => SolverConfig::default().tolerance,
    };

    if parsed.max_iterations == 0 {
        return Err(InputError::ZeroIterations);
    }

    let solver = SolverConfig::default()
        .with_tolerance(tolerance)
        .with_max_iterations(parsed.max_iterations)
        .with_enforce_dominance(parsed.enforce_dominance)
        .with_seed(parsed.seed);

    let equation = Equation {
        input_matrix: matrix,
        expression_rhs,
        initial_guess,
    };

    let methods = if parsed.methods.is_empty() {
        vec![Method::Jacobi, Method::GaussSeidel]
    } else {
        parsed.methods
    };

    Ok(Configuration {
        equation,
        solver,
        methods,
    })
}

fn parse_vector(
    values: &[String],
    to_error: fn(usize, String) -> InputError,
) -> Result<DVector<f64>, InputError> {
    let raw = values
        .iter()
        .enumerate()
        .map(|(index, v)| build_float_from_string(v).map_err(|err| to_error(index + 1, err)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DVector::from_vec(raw))
}

/// Both methods divide by the diagonal entries
/// source: https://www3.nd.edu/~zxu2/acms60212-40212-S12/Lec-09-4.pdf slide 10
fn check_for_zeroes_on_diagonal(matrix: (&DMatrix<f64>, usize)) -> Result<(), PositionalError> {
    let (matrix, matrix_size) = matrix;
    for i in 0..matrix_size {
        if matrix[(i, i)] == 0.0 {
            return Err(PositionalError {
                row: i + 1,
                column: i + 1,
                message: ZERO_ON_DIAGONAL_ERROR_MESSAGE.to_string(),
            });
        }
    }

    Ok(())
}

fn compute_matrix_size(
    input_matrix: &[Vec<String>],
    expression_rhs: &[String],
) -> Result<usize, MatrixSizeError> {
    let row_sizes = input_matrix.iter().map(|row| row.len());
    let matrix_size = row_sizes.clone().max().ok_or(MatrixSizeError::EmptyMatrix)?;
    if matrix_size == 0 {
        return Err(MatrixSizeError::EmptyMatrix);
    }

    if let Some((index, actual)) = row_sizes
        .clone()
        .enumerate()
        .find(|(_, row_size)| *row_size != matrix_size)
    {
        return Err(MatrixSizeError::WrongRowSize(
            WrongSize {
                actual,
                expected: matrix_size,
            },
            // convert index to position
            index + 1,
        ));
    };

    let rows_amount = row_sizes.len();
    if rows_amount != matrix_size {
        return Err(MatrixSizeError::WrongRowsCount(WrongSize {
            actual: rows_amount,
            expected: matrix_size,
        }));
    };

    if expression_rhs.len() != matrix_size {
        return Err(MatrixSizeError::WrongExpressionRightHandSide(WrongSize {
            actual: expression_rhs.len(),
            expected: matrix_size,
        }));
    }

    Ok(matrix_size)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected: {expected}! Got {actual}")]
pub struct WrongSize {
    actual: usize,
    expected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixSizeError {
    #[error("Row at position {1} has incorrect size: {0}")]
    WrongRowSize(WrongSize, usize),
    #[error("Expression right hand side size is incorrect: {0}")]
    WrongExpressionRightHandSide(WrongSize),
    #[error("Initial guess size is incorrect: {0}")]
    WrongInitialGuess(WrongSize),
    #[error("Rows count is incorrect: {0}")]
    WrongRowsCount(WrongSize),
    #[error("Empty matrix provided!")]
    EmptyMatrix,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Incorrect value provided in {row} row in {column} column\nError: {message}")]
pub struct PositionalError {
    pub row: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Incorrect input matrix sizing!\n{0}")]
    MatrixSizeError(#[from] MatrixSizeError),
    #[error("{0}")]
    MatrixInputError(#[from] PositionalError),
    #[error("Incorrect value in right hand side expression on position {0}! {1}")]
    RightHandSideError(usize, String),
    #[error("Incorrect value in initial guess on position {0}! {1}")]
    InitialGuessError(usize, String),
    #[error("Incorrect epsilon! {0}")]
    EpsilonError(String),
    #[error("Max iterations must be at least 1!")]
    ZeroIterations,
    #[error("No input provided!")]
    NoInputProvided,
    #[error("error during parsing occured! Error: {0}")]
    ParseError(#[from] json::Error),
    #[error("Unknown error occured! Error: {0}")]
    IOError(#[from] io::Error),
}

impl InputError {
    /// Returns `true` if the input error is [`NoInputProvided`].
    ///
    /// [`NoInputProvided`]: InputError::NoInputProvided
    #[must_use]
    pub fn is_no_input_provided(&self) -> bool {
        matches!(self, Self::NoInputProvided)
    }
}

enum InputMethod {
    Argument(String),
    Stdin,
    None,
}

impl From<Option<String>> for InputMethod {
    fn from(value: Option<String>) -> Self {
        value.map_or(InputMethod::None, InputMethod::Argument)
    }
}

fn determine_input_method() -> InputMethod {
    if let Some(filepath) = std::env::args().nth(1) {
        return InputMethod::Argument(filepath);
    }

    if !io::stdin().lock().is_terminal() {
        return InputMethod::Stdin;
    }

    prompt_for_path().into()
}

fn prompt_for_path() -> Option<String> {
    inquire::Text::new("Path to the equation file:")
        .with_help_message("JSON with input_matrix and expression_rhs, Esc to quit")
        .prompt_skippable()
        .ok()
        .flatten()
        .filter(|path| !path.trim().is_empty())
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

#[derive(Deserialize, Debug)]
struct EquationInput {
    pub input_matrix: Vec<Vec<String>>,
    pub expression_rhs: Vec<String>,
    #[serde(default)]
    pub initial_guess: Option<Vec<String>>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default)]
    pub epsilon: Option<String>,
    #[serde(default)]
    pub enforce_dominance: bool,
    #[serde(default)]
    pub seed: Seed,
    #[serde(default)]
    pub methods: Vec<Method>,
}

fn read_from_stdin() -> Result<String, io::Error> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content).map(|_| content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: &str = r#"{
        "input_matrix": [["45", "2", "3"], ["-3", "22", "2"], ["5", "1", "20"]],
        "expression_rhs": ["58", "47", "67"]
    }"#;

    #[test]
    fn minimal_file_uses_defaults() {
        let config = parse_configuration(SAMPLE).unwrap();
        assert_eq!(config.equation.size(), 3);
        assert_relative_eq!(config.equation.input_matrix[(1, 0)], -3.0);
        assert_eq!(config.equation.initial_guess, DVector::zeros(3));
        assert_eq!(config.solver, SolverConfig::default());
        assert_eq!(config.methods, vec![Method::Jacobi, Method::GaussSeidel]);
    }

    #[test]
    fn optional_fields_are_read() {
        let content = r#"{
            "input_matrix": [["4", "1"], ["2", "5"]],
            "expression_rhs": ["1", "2"],
            "initial_guess": ["0.5", "-0.25"],
            "max_iterations": 10,
            "epsilon": "1e-16",
            "enforce_dominance": true,
            "seed": "initial_guess",
            "methods": ["gauss_seidel"]
        }"#;
        let config = parse_configuration(content).unwrap();
        assert_eq!(config.equation.initial_guess, DVector::from_vec(vec![0.5, -0.25]));
        assert_eq!(config.solver.max_iterations, 10);
        assert_relative_eq!(config.solver.tolerance, 1e-16);
        assert!(config.solver.enforce_dominance);
        assert_eq!(config.solver.seed, Seed::InitialGuess);
        assert_eq!(config.methods, vec![Method::GaussSeidel]);
    }

    #[test]
    fn non_square_matrix_is_rejected() {
        let content = r#"{
            "input_matrix": [["1", "2"], ["3", "4"], ["5", "6"]],
            "expression_rhs": ["1", "2", "3"]
        }"#;
        let err = parse_configuration(content).unwrap_err();
        assert!(matches!(
            err,
            InputError::MatrixSizeError(MatrixSizeError::WrongRowsCount(_))
        ));
    }

    #[test]
    fn ragged_row_is_reported_by_position() {
        let content = r#"{
            "input_matrix": [["1", "2"], ["3"]],
            "expression_rhs": ["1", "2"]
        }"#;
        let err = parse_configuration(content).unwrap_err();
        match err {
            InputError::MatrixSizeError(MatrixSizeError::WrongRowSize(size, row)) => {
                assert_eq!(row, 2);
                assert_eq!(size, WrongSize { actual: 1, expected: 2 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_matrix_is_rejected() {
        let content = r#"{ "input_matrix": [], "expression_rhs": [] }"#;
        assert!(matches!(
            parse_configuration(content).unwrap_err(),
            InputError::MatrixSizeError(MatrixSizeError::EmptyMatrix)
        ));
    }

    #[test]
    fn rhs_size_mismatch() {
        let content = r#"{ "input_matrix": [["1"]], "expression_rhs": ["1", "2"] }"#;
        assert!(matches!(
            parse_configuration(content).unwrap_err(),
            InputError::MatrixSizeError(MatrixSizeError::WrongExpressionRightHandSide(_))
        ));
    }

    #[test]
    fn bad_cell_is_reported_by_position() {
        let content = r#"{
            "input_matrix": [["1", "2"], ["3", "four"]],
            "expression_rhs": ["1", "2"]
        }"#;
        match parse_configuration(content).unwrap_err() {
            InputError::MatrixInputError(err) => {
                assert_eq!((err.row, err.column), (2, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_on_diagonal_is_rejected() {
        let content = r#"{
            "input_matrix": [["1", "2"], ["3", "0"]],
            "expression_rhs": ["1", "2"]
        }"#;
        match parse_configuration(content).unwrap_err() {
            InputError::MatrixInputError(err) => {
                assert_eq!((err.row, err.column), (2, 2));
                assert_eq!(err.message, ZERO_ON_DIAGONAL_ERROR_MESSAGE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_rhs_value() {
        let content = r#"{ "input_matrix": [["1"]], "expression_rhs": ["x"] }"#;
        assert!(matches!(
            parse_configuration(content).unwrap_err(),
            InputError::RightHandSideError(1, _)
        ));
    }

    #[test]
    fn values_beyond_decimal_range_fall_back_to_float() {
        let content = r#"{ "input_matrix": [["1e30"]], "expression_rhs": ["-2.5E31"] }"#;
        let config = parse_configuration(content).unwrap();
        assert_relative_eq!(config.equation.input_matrix[(0, 0)], 1e30);
        assert_relative_eq!(config.equation.expression_rhs[0], -2.5e31);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        for value in ["1e400", "NaN", "inf"] {
            let content = format!(
                r#"{{ "input_matrix": [["1"]], "expression_rhs": ["{value}"] }}"#
            );
            match parse_configuration(&content).unwrap_err() {
                InputError::RightHandSideError(1, message) => {
                    assert!(message.starts_with(INVALID_NUMBER_ERROR_MESSAGE));
                }
                other => panic!("unexpected error for {value}: {other}"),
            }
        }
    }

    #[test]
    fn negative_epsilon_is_rejected() {
        let content = r#"{ "input_matrix": [["1"]], "expression_rhs": ["1"], "epsilon": "-0.1" }"#;
        assert!(matches!(
            parse_configuration(content).unwrap_err(),
            InputError::EpsilonError(_)
        ));
    }

    #[test]
    fn zero_iterations_is_rejected() {
        let content = r#"{ "input_matrix": [["1"]], "expression_rhs": ["1"], "max_iterations": 0 }"#;
        assert!(matches!(
            parse_configuration(content).unwrap_err(),
            InputError::ZeroIterations
        ));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            parse_configuration("{").unwrap_err(),
            InputError::ParseError(_)
        ));
    }
}
