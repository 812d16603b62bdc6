use std::fmt::Display;
use std::io::{self, Write};

use jacobi_seidel_method::input::{build_configuration, Configuration};
use jacobi_seidel_method::trace::{dominance_message, TableReporter};
use jacobi_seidel_method::{SolveError, Status};
use tracing_subscriber::EnvFilter;

fn pad_string(displayable: impl Display, padding: usize) -> String {
    let string = displayable.to_string();
    string
        .lines()
        .map(|str| " ".repeat(padding) + str)
        .reduce(|acc, e| acc + "\n" + &e)
        .unwrap_or_default()
}

const USAGE_INFORMATION: &str = r#"jacobi-seidel-method <file-path>
jacobi-seidel-method < file-path

<file-path> is any valid path to a JSON equation file
"#;

fn run(config: &Configuration) -> io::Result<()> {
    let stdout = io::stdout();
    let mut table = TableReporter::new(stdout.lock());
    let dominant = config.equation.is_diagonally_dominant();

    for method in &config.methods {
        let message =
            dominance_message(&config.equation.input_matrix, *method, config.solver.enforce_dominance);
        if !dominant && config.solver.enforce_dominance {
            println!("{message}");
            continue;
        }
        println!("{message}\n");

        let mut sweeps = match config.equation.sweeps(*method, &config.solver) {
            Ok(sweeps) => sweeps,
            Err(error) => {
                report_solve_error(&error);
                continue;
            }
        };

        table.header(config.equation.size())?;
        for sweep in sweeps.by_ref() {
            table.row(&sweep)?;
        }

        let solution = sweeps.into_solution();
        if solution.status == Status::IterationLimitExceeded {
            println!("\nMaximum number of iterations exceeded");
        }
        println!("\nApproximate solution: {solution}\n");
        io::stdout().flush()?;
    }

    Ok(())
}

fn report_solve_error(error: &SolveError) {
    match error {
        SolveError::ZeroPivot { row } => {
            eprintln!("Zero on diagonal in row {}! Cannot iterate.", row + 1)
        }
        SolveError::NotDiagonallyDominant => eprintln!("Matrix is not diagonally dominant!"),
        other => eprintln!("Error occured:\n{}", pad_string(other, 2)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match build_configuration() {
        Err(err) => {
            let error_string: &dyn Display = if err.is_no_input_provided() {
                &USAGE_INFORMATION
            } else {
                eprintln!("Error occured:");
                &err
            };

            eprintln!("{}", pad_string(error_string, 2));
        }
        Ok(config) => {
            if let Err(err) = run(&config) {
                eprintln!("Failed to write output: {err}");
            }
        }
    }
}
