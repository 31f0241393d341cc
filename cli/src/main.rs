use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use calc::{evaluate_all, evaluate_with, EvalError, Options, DEFAULT_MAX_DEPTH};
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Evaluate arithmetic expressions built from numbers, + - * / and parentheses.
#[derive(Parser, Debug)]
#[command(name = "calc", version)]
struct Args {
    /// Expressions to evaluate. With none given, one line is read from stdin.
    /// Put `--` before expressions that start with a sign. Options must come
    /// before the first expression; anything after it is read as an expression.
    #[arg(allow_hyphen_values = true)]
    expressions: Vec<String>,

    /// Keep reading expressions, one per line, until end of input or `quit`.
    #[arg(long, conflicts_with = "expressions")]
    repl: bool,

    /// Maximum number of parentheses open at once.
    #[arg(long, env = "CALC_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// More log output; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Marks the failing part of `input` with carets, keeping tabs so the marks
/// line up under the echoed input.
fn underline(input: &str, err: &EvalError) -> String {
    let span = err.span();
    let mut marks: String = input
        .chars()
        .take(span.start)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    marks.extend(std::iter::repeat('^').take(span.len().max(1)));
    marks
}

/// Prints the outcome of one evaluation. Returns whether it succeeded.
fn report(input: &str, result: &Result<f64, EvalError>) -> bool {
    match result {
        Ok(value) => {
            println!("Result: {value}");
            true
        }
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("{input}\n{}", underline(input, err));
            false
        }
    }
}

fn read_line(reader: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if reader
        .read_line(&mut line)
        .context("failed to read expression")?
        == 0
    {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(&['\n', '\r'][..]).to_owned()))
}

fn batch(expressions: &[String], options: &Options) -> bool {
    debug!(count = expressions.len(), "evaluating arguments");
    let results = evaluate_all(expressions, options);
    expressions
        .iter()
        .zip(&results)
        .fold(true, |ok, (input, result)| report(input, result) && ok)
}

fn single(options: &Options) -> Result<bool> {
    println!("Simple command-line calculator");
    println!("Enter an arithmetic expression (supported operators: +, -, *, / and parentheses):");
    print!("> ");
    io::stdout().flush()?;
    let input = read_line(&mut io::stdin().lock())?.context("failed to read expression")?;
    Ok(report(&input, &evaluate_with(&input, options)))
}

fn repl(options: &Options) -> Result<bool> {
    let mut stdin = io::stdin().lock();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = read_line(&mut stdin)? else {
            break;
        };
        match line.trim() {
            "quit" => break,
            "" => continue,
            input => {
                report(input, &evaluate_with(input, options));
            }
        }
    }
    Ok(true)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    let options = Options::new().max_depth(args.max_depth);

    let outcome = if args.repl {
        repl(&options)
    } else if args.expressions.is_empty() {
        single(&options)
    } else {
        Ok(batch(&args.expressions, &options))
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
