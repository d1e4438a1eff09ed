use std::{
    env::{self, args},
    num::{NonZeroU64, ParseIntError},
};

use chembal::{
    elements::{self, SymbolTable},
    parser,
    prelude::*,
    reaction,
    report::{self, Report},
    solver::{EliminationSolver, InverseSolver, Solver},
    Balancer, Options,
};
use pretty_env_logger::formatted_builder;

fn usage_string() -> String {
    format!(
        "Usage: {} <solver_name> <command>

solver_name: inverse, elimination

command:
    balance <formula> - print the balanced formula
    json <formula> - print the balanced reaction as JSON
    check <file_name> - balance every reaction listed in the file

environment:
    CHEMBAL_TABLE_LIMIT - largest numerator and denominator tried (default 25)
    CHEMBAL_SYMBOLS - 'builtin' or a CSV file of element symbols to validate against",
        args().next().unwrap_or_else(|| "chembal".to_owned())
    )
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Unknown solver '{}'\n\n{}", name, usage_string()))]
    UnknownSolver { name: String },
    #[snafu(display("Unknown command '{}'\n\n{}", name, usage_string()))]
    UnknownCommand { name: String },
    #[snafu(display("Required argument does not exist\n\n{}", usage_string()))]
    MissingArgument,
    #[snafu(display("Invalid CHEMBAL_TABLE_LIMIT '{}'", value))]
    InvalidTableLimit {
        value: String,
        source: ParseIntError,
    },
    #[snafu(display("Failed to load element symbols"))]
    SymbolError { source: elements::Error },
    #[snafu(display("Failed to read reactions"))]
    ParserError { source: parser::Error },
    #[snafu(display("Failed to balance '{}'", formula))]
    BalanceError {
        formula: String,
        source: reaction::Error,
    },
    #[snafu(display("Failed to serialize the reaction"))]
    JsonError { source: serde_json::Error },
    #[snafu(display("{} of {} reactions failed to balance", failed, total))]
    CheckFailed { failed: usize, total: usize },
}

fn load_options() -> Result<Options, Error> {
    let mut options = Options::default();

    if let Ok(value) = env::var("CHEMBAL_TABLE_LIMIT") {
        let limit = value
            .trim()
            .parse::<NonZeroU64>()
            .context(InvalidTableLimit {
                value: value.as_str(),
            })?;
        options.table_limit = limit.get();
    }

    options.symbols = match env::var("CHEMBAL_SYMBOLS") {
        Ok(value) if value == "builtin" => Some(SymbolTable::builtin()),
        Ok(path) => Some(SymbolTable::from_csv_file(path).context(SymbolError)?),
        Err(_) => None,
    };

    Ok(options)
}

/// The formula may be given quoted or split over several arguments.
fn formula_argument(args: &[String]) -> Result<String, Error> {
    ensure!(args.len() > 1, MissingArgument);
    Ok(args[1..].join(" "))
}

fn dispatch_command<T: Solver>(args: Vec<String>) -> Result<(), Error> {
    let balancer = Balancer::<T>::new(load_options()?);

    match args.get(0).map(|s| s.as_str()) {
        Some("balance") => {
            let formula = formula_argument(&args)?;
            let reaction = balancer.balance(&formula).context(BalanceError {
                formula: formula.as_str(),
            })?;
            println!("{}", reaction.balanced_formula());
        }
        Some("json") => {
            let formula = formula_argument(&args)?;
            let reaction = balancer.balance(&formula).context(BalanceError {
                formula: formula.as_str(),
            })?;
            println!(
                "{}",
                serde_json::to_string_pretty(&reaction).context(JsonError)?
            );
        }
        Some("check") => {
            let path = args.get(1).context(MissingArgument)?;
            let formulas = parser::read_reactions(path).context(ParserError)?;

            let mut failed = 0usize;
            for formula in &formulas {
                match balancer.balance(formula) {
                    Ok(reaction) => println!("OK  {}", reaction.balanced_formula()),
                    Err(e) => {
                        failed += 1;
                        println!("ERR {}: {}", formula, report::chain(&e));
                    }
                }
            }

            ensure!(
                failed == 0,
                CheckFailed {
                    failed,
                    total: formulas.len(),
                }
            );
        }
        Some(name) => UnknownCommand {
            name: name.to_owned(),
        }
        .fail()?,
        None => MissingArgument.fail()?,
    }

    Ok(())
}

fn init_logger() {
    let mut builder = formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else if cfg!(debug_assertions) {
        builder.parse_filters("chembal=debug");
    } else {
        builder.parse_filters("chembal=warn");
    }

    builder.try_init().expect("Failed to initialize the logger");
}

fn main() -> Result<(), Report> {
    init_logger();

    let mut args = args();

    // drop arg[0]
    args.next();

    let solver_name = args.next();
    let remaining: Vec<_> = args.collect();

    match solver_name.as_deref() {
        Some("inverse") => dispatch_command::<InverseSolver>(remaining)?,
        Some("elimination") => dispatch_command::<EliminationSolver>(remaining)?,
        Some(name) => UnknownSolver {
            name: name.to_owned(),
        }
        .fail()?,
        None => {
            println!("{}", usage_string());
        }
    }

    Ok(())
}
