use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::formula::{Compound, Element, Equation, Role, Span};
use crate::prelude::*;

/// Recognized yield symbols, longest first so that `<-->` wins over `->`.
pub const YIELD_SYMBOLS: [&str; 4] = ["<-->", "-->", "->", "="];

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("I/O error occurred while reading reaction file '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Malformed reaction '{}': {}", formula, reason))]
    MalformedReaction {
        formula: String,
        reason: &'static str,
    },
    #[snafu(display("Malformed formula '{}' at offset {}: {}", formula, offset, reason))]
    MalformedFormula {
        formula: String,
        offset: usize,
        reason: String,
    },
}

/// Finds the leftmost yield symbol. At one position the longest symbol wins.
pub fn find_yield(formula: &str) -> Option<Span> {
    let bytes = formula.as_bytes();

    (0..bytes.len()).find_map(|start| {
        YIELD_SYMBOLS
            .iter()
            .find(|symbol| bytes[start..].starts_with(symbol.as_bytes()))
            .map(|symbol| Span::new(start, start + symbol.len()))
    })
}

/// Splits a formula into compound tokens, skipping the yield symbol,
/// `+` separators, whitespace and existing coefficients.
fn tokenize(formula: &str, yield_span: Span) -> Result<Vec<Span>, Error> {
    let bytes = formula.as_bytes();
    let mut tokens = Vec::new();

    let mut pos = 0;
    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_alphabetic() {
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_alphanumeric() {
                pos += 1;
            }
            tokens.push(Span::new(start, pos));
        } else if c.is_ascii_digit() {
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }

            // A leading number is a coefficient of the compound that follows
            ensure!(
                pos < bytes.len() && bytes[pos].is_ascii_alphabetic(),
                MalformedFormula {
                    formula,
                    offset: start,
                    reason: format!("'{}' is not attached to a compound", &formula[start..pos]),
                }
            );
            debug!("Ignoring existing coefficient '{}'", &formula[start..pos]);
        } else if c == b'+' || c.is_ascii_whitespace() {
            pos += 1;
        } else if pos == yield_span.start {
            pos = yield_span.end;
        } else {
            let unexpected = formula[pos..].chars().next().unwrap_or('?');
            return MalformedFormula {
                formula,
                offset: pos,
                reason: format!("unsupported character '{}'", unexpected),
            }
            .fail();
        }
    }

    Ok(tokens)
}

/// Parses the element symbols and subscripts of a single compound token.
fn parse_compound(formula: &str, span: Span) -> Result<Vec<Element>, Error> {
    let token = &formula[span.start..span.end];
    let bytes = token.as_bytes();
    let mut elements = Vec::new();

    let mut pos = 0;
    while pos < bytes.len() {
        ensure!(
            bytes[pos].is_ascii_uppercase(),
            MalformedFormula {
                formula,
                offset: span.start + pos,
                reason: format!("expected an element symbol in '{}'", token),
            }
        );

        let symbol_start = pos;
        pos += 1;
        if pos < bytes.len() && bytes[pos].is_ascii_lowercase() {
            pos += 1;
        }
        let symbol = &token[symbol_start..pos];

        let digits_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let digits = &token[digits_start..pos];

        let subscript = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().ok().context(MalformedFormula {
                formula,
                offset: span.start + digits_start,
                reason: format!("subscript '{}' is out of range", digits),
            })?
        };
        ensure!(
            subscript > 0,
            MalformedFormula {
                formula,
                offset: span.start + digits_start,
                reason: format!("zero subscript for '{}' in '{}'", symbol, token),
            }
        );

        elements.push(Element::new(symbol, subscript));
    }

    Ok(elements)
}

/// Parses an unbalanced reaction such as `Cr + O2 = Cr2O3`.
///
/// Parenthesized groups, charges and hydrates are not supported and are
/// rejected with `MalformedFormula` rather than parsed partially.
pub fn parse_reaction(formula: &str) -> Result<Equation, Error> {
    let yield_span = find_yield(formula).context(MalformedReaction {
        formula,
        reason: "no yield symbol ('=', '->', '-->' or '<-->') found",
    })?;

    let mut equation = Equation::new(formula, yield_span);
    for span in tokenize(formula, yield_span)? {
        let elements = parse_compound(formula, span)?;
        let role = if span.start < yield_span.start {
            Role::Reactant
        } else {
            Role::Product
        };
        equation.add_compound(Compound::new(
            &formula[span.start..span.end],
            elements,
            span,
            role,
        ));
    }

    ensure!(
        equation.num_reactants() > 0,
        MalformedReaction {
            formula,
            reason: "no reactants before the yield symbol",
        }
    );
    ensure!(
        equation.num_products() > 0,
        MalformedReaction {
            formula,
            reason: "no products after the yield symbol",
        }
    );

    debug!(
        "Parsed '{}' as {} ({} reactants, {} products) over elements {:?}",
        formula,
        equation,
        equation.num_reactants(),
        equation.num_products(),
        equation.unique_elements()
    );

    Ok(equation)
}

/// Reads one reaction per line, skipping blank lines and `#` comments.
pub fn read_reactions(path: impl AsRef<Path>) -> Result<Vec<String>, Error> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path).context(IoError {
        path: path.to_owned(),
    })?);

    let mut reactions = Vec::new();
    for line in file.lines() {
        let line = line.context(IoError {
            path: path.to_owned(),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        reactions.push(trimmed.to_owned());
    }

    Ok(reactions)
}
