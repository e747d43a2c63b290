use std::{fs, process::ExitCode};

use clap::Parser;
use keycalc::{
    AngleMode, Environment, EvaluationContext, Settings, evaluate_expression, format_value,
    interpreter::environment::ANSWER, register_variable,
};
use log::warn;

/// keycalc evaluates calculator expressions with complex numbers, vectors and
/// matrices, under a time limit and a step budget.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treats the argument as a file with one expression per line.
    #[arg(short, long)]
    file: bool,

    /// Trigonometric functions take and return radians instead of degrees.
    #[arg(short, long)]
    radians: bool,

    /// Roots and logarithms of negative numbers give complex results.
    #[arg(short, long)]
    complex: bool,

    /// Decimal places shown (1 to 15).
    #[arg(short, long, default_value_t = 10)]
    precision: u8,

    /// Always show results in scientific notation.
    #[arg(short, long)]
    scientific: bool,

    /// Time limit of one evaluation, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Maximum number of evaluation steps of one evaluation.
    #[arg(long, default_value_t = 10_000)]
    budget: u64,

    contents: String,
}

impl Args {
    fn settings(&self) -> Settings {
        Settings { angle_mode: if self.radians { AngleMode::Radians } else { AngleMode::Degrees },
                   complex_mode: self.complex,
                   precision: self.precision,
                   scientific_notation: self.scientific,
                   timeout_ms: self.timeout_ms,
                   node_budget: self.budget,
                   ..Settings::default() }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let ctx = EvaluationContext::from(&args.settings());

    let script = if args.file {
        match fs::read_to_string(&args.contents) {
            Ok(script) => script,
            Err(_) => {
                eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                          &args.contents);
                return ExitCode::FAILURE;
            },
        }
    } else {
        args.contents
    };

    let mut env = Environment::new();
    let mut failed = false;
    for line in script.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match evaluate_expression(line, &env, &ctx) {
            Ok(value) => {
                println!("{}", format_value(&value, &ctx));
                if let Err(e) = register_variable(&mut env, ANSWER, value) {
                    warn!("result not stored: {e}");
                }
            },
            Err(e) => {
                eprintln!("{}: {e}", e.kind().message());
                failed = true;
            },
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
