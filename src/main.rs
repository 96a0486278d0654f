//! Command line front-end: `bus-routes <INPUT>`.
//!
//! Exit codes: 0 when the picture was written, 1 when the solver rejected the input
//! (its message is printed to stdout), 2 for any other failure.

use bus_routes::config::Config;
use bus_routes::pipeline::{self, Summary};
use bus_routes::{Error, Result};
use clap::{Arg, Command};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let matches = Command::new("bus-routes")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Draws the bus route network and highlights the cheapest route.")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Route file handed to the solver"),
        )
        .get_matches();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    // logs go to stderr, stdout is reserved for the solver's message
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let input = matches
        .get_one::<PathBuf>("input")
        .cloned()
        .unwrap_or_default();
    let solver = config.solver.process();

    let result = pipeline::run(&solver, &input, &config.render);
    let code = report(result, &mut std::io::stdout().lock(), &mut std::io::stderr().lock());
    ExitCode::from(code)
}

/// Maps the outcome of a run to its exit code, printing the user-facing message.
fn report(result: Result<Summary>, out: &mut impl Write, err: &mut impl Write) -> u8 {
    match result {
        Ok(summary) => {
            info!(
                title = %summary.title,
                stops = summary.stops,
                connections = summary.connections,
                on_path_stops = summary.on_path_stops,
                on_path_connections = summary.on_path_connections,
                output = %summary.output.display(),
                "done"
            );
            0
        }
        Err(Error::SolverValidation(line)) => {
            let _ = writeln!(out, "{line}");
            1
        }
        Err(e) => {
            let _ = writeln!(err, "error: {e}");
            2
        }
    }
}
