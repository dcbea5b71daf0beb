//! Command-line DIMACS CNF driver for `cdcl-core`.

mod dimacs;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{App, Arg};
use cpu_time::ProcessTime;

use cdcl_core::{Solver, SolverStatus};

macro_rules! cli_log_info {
    ($($arg:tt)*) => {
        #[cfg(feature = "logging")]
        log::info!($($arg)*);
    };
}

#[cfg(feature = "logging")]
fn init_logging(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    let mut builder = env_logger::Builder::new();
    builder.filter(None, level);
    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse(&rust_log);
    }
    builder.init();
}

#[cfg(not(feature = "logging"))]
fn init_logging(_verbose: bool) {}

fn main() -> ExitCode {
    let matches = App::new("cdcl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A CDCL SAT solver reading DIMACS CNF input")
        .arg(
            Arg::with_name("INPUT")
                .help("DIMACS CNF file to solve (reads stdin if omitted); a .gz suffix is \
                       transparently decompressed")
                .index(1),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Raise the log level to debug"),
        )
        .get_matches();

    init_logging(matches.is_present("verbose"));

    match run(matches.value_of("INPUT")) {
        Ok(code) => code,
        Err(err) => {
            log_error(&err);
            ExitCode::from(1u8)
        }
    }
}

#[cfg(feature = "logging")]
fn log_error(err: &anyhow::Error) {
    log::error!("{}", err);
}

#[cfg(not(feature = "logging"))]
fn log_error(err: &anyhow::Error) {
    eprintln!("cdcl: {}", err);
}

fn run(input: Option<&str>) -> anyhow::Result<ExitCode> {
    let start = ProcessTime::now();

    let formula = match input {
        Some(path) => {
            let reader = dimacs::open_input(path)?;
            dimacs::parse(reader)?
        }
        None => dimacs::parse(io::stdin().lock())?,
    };

    let mut solver = Solver::new();
    for clause in &formula.clauses {
        if !solver.add_clause(clause) || solver.status() != SolverStatus::Unsolved {
            break;
        }
    }

    let status = solver.solve();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let exit_code: u8 = match status {
        SolverStatus::Sat => {
            writeln!(out, "s SATISFIABLE")?;
            write!(out, "v")?;
            for (idx, val) in solver.model().iter().enumerate() {
                let sign = if val.is_true() { "" } else { "-" };
                write!(out, " {}{}", sign, idx + 1)?;
            }
            writeln!(out, " 0")?;
            10
        }
        SolverStatus::Unsat => {
            writeln!(out, "s UNSATISFIABLE")?;
            20
        }
        SolverStatus::Unsolved => {
            writeln!(out, "c solve budget exhausted without a final answer")?;
            0
        }
    };

    let stats = solver.stats();
    cli_log_info!(
        "decisions={} propagations={} conflicts={} learned={} cpu_time={:?}",
        stats.decisions,
        stats.propagations,
        stats.conflicts,
        stats.learned_clauses,
        start.elapsed(),
    );

    Ok(ExitCode::from(exit_code))
}
