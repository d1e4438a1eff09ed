/*!
The balancing pipeline and its output record.
*/

use std::marker::PhantomData;

use serde::Serialize;

use crate::elements::SymbolTable;
use crate::events::{Event, EventSink, LogSink};
use crate::formula::{Compound, Equation, Role};
use crate::matrix::LinearSystem;
use crate::parser::{self, parse_reaction};
use crate::prelude::*;
use crate::simplify::{self, simplify, RationalTable, DEFAULT_TABLE_LIMIT};
use crate::solver::{self, InverseSolver, Method, Solution, Solver};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Failed to parse reaction"))]
    ParseError { source: parser::Error },
    #[snafu(display("Unknown element symbol '{}' in compound '{}'", symbol, compound))]
    UnknownElement { symbol: String, compound: String },
    #[snafu(display("Failed to solve the stoichiometric system of '{}'", formula))]
    SolveError {
        formula: String,
        source: solver::Error,
    },
    #[snafu(display("Failed to convert the coefficients of '{}' to integers", formula))]
    SimplifyError {
        formula: String,
        source: simplify::Error,
    },
    #[snafu(display(
        "Coefficients {:?} do not conserve element '{}' in '{}'",
        coefficients,
        symbol,
        formula
    ))]
    InvalidSolution {
        formula: String,
        symbol: String,
        coefficients: Vec<u64>,
    },
}

/// A balanced reaction.
///
/// `compounds`, `raw_coefficients` and `coefficients` are parallel, and the
/// compounds are ordered reactants first, as they appear in the input.
#[derive(Debug, Clone, Serialize)]
pub struct Reaction {
    unbalanced_formula: String,
    balanced_formula: String,
    compounds: Vec<Compound>,
    reactants: Vec<String>,
    products: Vec<String>,
    unique_elements: Vec<String>,
    raw_coefficients: Vec<f64>,
    coefficients: Vec<u64>,
    method: Method,
}

impl Reaction {
    fn new(equation: Equation, solution: &Solution, coefficients: Vec<u64>) -> Self {
        let (unbalanced_formula, mut compounds, unique_elements) = equation.into_parts();
        let raw_coefficients = solution.coefficients().to_vec();

        for ((compound, &raw), &coefficient) in compounds
            .iter_mut()
            .zip(&raw_coefficients)
            .zip(&coefficients)
        {
            compound.set_coefficients(raw, coefficient);
        }

        let formulas_of = |role: Role| {
            compounds
                .iter()
                .filter(|compound| compound.role() == role)
                .map(|compound| compound.formula().to_owned())
                .collect::<Vec<_>>()
        };
        let reactants = formulas_of(Role::Reactant);
        let products = formulas_of(Role::Product);

        let balanced_formula = assemble(&reactants, &products, &coefficients);

        Reaction {
            unbalanced_formula,
            balanced_formula,
            compounds,
            reactants,
            products,
            unique_elements,
            raw_coefficients,
            coefficients,
            method: solution.method(),
        }
    }

    pub fn unbalanced_formula(&self) -> &str {
        &self.unbalanced_formula
    }

    pub fn balanced_formula(&self) -> &str {
        &self.balanced_formula
    }

    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    pub fn reactants(&self) -> &[String] {
        &self.reactants
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    /// Element symbols in first-encounter order.
    pub fn unique_elements(&self) -> &[String] {
        &self.unique_elements
    }

    pub fn raw_coefficients(&self) -> &[f64] {
        &self.raw_coefficients
    }

    pub fn coefficients(&self) -> &[u64] {
        &self.coefficients
    }

    pub fn method(&self) -> Method {
        self.method
    }
}

/// Renders `reactants = products` with every coefficient written out, including 1.
///
/// # Panics
///
/// Panics when `coefficients` is not as long as both sides together.
pub fn assemble(reactants: &[String], products: &[String], coefficients: &[u64]) -> String {
    assert_eq!(reactants.len() + products.len(), coefficients.len());

    let side = |formulas: &[String], coefficients: &[u64]| {
        formulas
            .iter()
            .zip(coefficients)
            .map(|(formula, coefficient)| format!("{}{}", coefficient, formula))
            .collect::<Vec<_>>()
            .join(" + ")
    };

    let (left, right) = coefficients.split_at(reactants.len());
    format!("{} = {}", side(reactants, left), side(products, right))
}

/// Checks that every element has as many atoms on each side.
fn verify(equation: &Equation, coefficients: &[u64]) -> Result<(), Error> {
    for symbol in equation.unique_elements().iter() {
        let (mut consumed, mut produced) = (0u128, 0u128);
        for (compound, &coefficient) in equation.compounds().iter().zip(coefficients) {
            let atoms = u128::from(compound.atoms_of(symbol)) * u128::from(coefficient);
            match compound.role() {
                Role::Reactant => consumed += atoms,
                Role::Product => produced += atoms,
            }
        }

        ensure!(
            consumed == produced,
            InvalidSolution {
                formula: equation.formula(),
                symbol: symbol.as_str(),
                coefficients: coefficients.to_vec(),
            }
        );
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct Options {
    /// Largest numerator and denominator tried when simplifying coefficients.
    pub table_limit: u64,
    /// Reject symbols missing from this table, if set.
    pub symbols: Option<SymbolTable>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            table_limit: DEFAULT_TABLE_LIMIT,
            symbols: None,
        }
    }
}

/// Runs parse, matrix construction, solving, simplification and assembly.
#[derive(Debug)]
pub struct Balancer<S, K = LogSink> {
    table: RationalTable,
    symbols: Option<SymbolTable>,
    sink: K,
    solver: PhantomData<S>,
}

impl<S: Solver> Balancer<S> {
    pub fn new(options: Options) -> Self {
        Balancer {
            table: RationalTable::new(options.table_limit),
            symbols: options.symbols,
            sink: LogSink,
            solver: PhantomData,
        }
    }
}

impl<S: Solver, K: EventSink> Balancer<S, K> {
    /// Replaces the event sink.
    pub fn with_sink<T: EventSink>(self, sink: T) -> Balancer<S, T> {
        Balancer {
            table: self.table,
            symbols: self.symbols,
            sink,
            solver: PhantomData,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    fn validate(&self, equation: &Equation) -> Result<(), Error> {
        let symbols = match &self.symbols {
            Some(symbols) => symbols,
            None => return Ok(()),
        };

        for compound in equation.compounds().iter() {
            for element in compound.elements() {
                ensure!(
                    symbols.contains(element.symbol()),
                    UnknownElement {
                        symbol: element.symbol(),
                        compound: compound.formula(),
                    }
                );
            }
        }

        Ok(())
    }

    pub fn balance(&self, formula: &str) -> Result<Reaction, Error> {
        let equation = parse_reaction(formula).context(ParseError)?;
        self.sink.record(&Event::Parsed {
            formula,
            compounds: equation.compounds().len(),
            elements: equation.unique_elements().len(),
        });
        self.validate(&equation)?;

        let system = LinearSystem::from_equation(&equation);
        let solution = S::new(system).solve().context(SolveError { formula })?;
        if let Some(reason) = solution.fallback() {
            self.sink.record(&Event::Fallback {
                reason,
                method: solution.method(),
            });
        }
        self.sink.record(&Event::Solved {
            method: solution.method(),
            coefficients: solution.coefficients(),
        });

        let coefficients =
            simplify(solution.coefficients(), &self.table).context(SimplifyError { formula })?;
        verify(&equation, &coefficients)?;

        let reaction = Reaction::new(equation, &solution, coefficients);
        self.sink.record(&Event::Balanced {
            formula: reaction.balanced_formula(),
        });

        Ok(reaction)
    }
}

/// Balances `formula` with the inverse solver and default options.
pub fn balance(formula: &str) -> Result<Reaction, Error> {
    Balancer::<InverseSolver>::new(Options::default()).balance(formula)
}
