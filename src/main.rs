use std::{
    io::{self, BufRead},
    process::ExitCode,
};

use clap::Parser;
use prattle::{errors::errors::Error, format_error, Evaluator};

/// prattle evaluates arithmetic and logical expressions.
///
/// With no expression arguments, every non-empty line of standard input is
/// evaluated in turn.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Defines a numeric constant before evaluating, as NAME=VALUE.
    #[arg(short, long = "name", value_name = "NAME=VALUE", value_parser = parse_name)]
    names: Vec<(String, f64)>,

    /// Allows an extra operator spelling in the tokenizer.
    #[arg(short, long = "operator", value_name = "OP")]
    operators: Vec<String>,

    /// Disallows an operator spelling in the tokenizer.
    #[arg(short, long = "disable-operator", value_name = "OP")]
    disabled_operators: Vec<String>,

    /// Prints the token sequence as JSON instead of evaluating.
    #[arg(short, long)]
    tokens: bool,

    expressions: Vec<String>,
}

fn parse_name(argument: &str) -> Result<(String, f64), String> {
    let (name, value) = argument
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", argument))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for {}: {}", name, e))?;

    Ok((name.trim().to_string(), value))
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let mut evaluator = Evaluator::new();
    evaluator.update_operators(
        args.operators
            .iter()
            .map(|op| (op.clone(), true))
            .chain(args.disabled_operators.iter().map(|op| (op.clone(), false))),
    );
    evaluator.define_names(args.names.iter().cloned());

    let mut failed = false;

    if args.expressions.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    eprintln!("Failed to read standard input: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            failed |= !run(&evaluator, &line, args.tokens);
        }
    } else {
        for expression in &args.expressions {
            failed |= !run(&evaluator, expression, args.tokens);
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Evaluates or tokenizes one expression, printing the outcome.
fn run(evaluator: &Evaluator, source: &str, print_tokens: bool) -> bool {
    if print_tokens {
        return match evaluator.tokenizer().tokenize(source) {
            Ok(tokens) => match serde_json::to_string(&tokens) {
                Ok(json) => {
                    println!("{}", json);
                    true
                }
                Err(e) => {
                    eprintln!("Failed to serialize tokens: {}", e);
                    false
                }
            },
            Err(e) => {
                eprint!("{}", format_error(source, &Error::from(e)));
                false
            }
        };
    }

    match evaluator.evaluate(source) {
        Ok(value) => {
            println!("{}", value);
            true
        }
        Err(e) => {
            eprint!("{}", format_error(source, &e));
            false
        }
    }
}
