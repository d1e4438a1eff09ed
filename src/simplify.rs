/*!
Conversion of real-valued coefficients to the smallest positive integer ratio.
*/

use std::fmt::Display;

use crate::prelude::*;

/// Default bound on numerators and denominators of the lookup table.
pub const DEFAULT_TABLE_LIMIT: u64 = 25;

/// Relative distance under which a coefficient matches a table entry.
/// Distinct entries of a table with limit `n` are at least `1 / n²` apart.
const MATCH_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display(
        "Coefficient {} does not match any fraction n/d with 1 <= n, d <= {}",
        value,
        limit
    ))]
    UnrepresentableCoefficient { value: f64, limit: u64 },
    #[snafu(display("Scaling coefficients to integers overflowed"))]
    CoefficientOverflow,
}

/// Invariant: numerator > 0, denominator > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    numerator: u64,
    denominator: u64,
}

impl Fraction {
    pub fn new(numerator: u64, denominator: u64) -> Self {
        assert!(numerator > 0 && denominator > 0);

        Fraction {
            numerator,
            denominator,
        }
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Every `n/d` with `1 <= n, d <= limit`, enumerated `n`-major, `d`-minor.
#[derive(Debug, Clone)]
pub struct RationalTable {
    limit: u64,
    entries: Vec<(f64, Fraction)>,
}

impl RationalTable {
    pub fn new(limit: u64) -> Self {
        assert!(limit > 0);

        let entries = (1..=limit)
            .flat_map(|numerator| {
                (1..=limit).map(move |denominator| Fraction::new(numerator, denominator))
            })
            .map(|fraction| (fraction.value(), fraction))
            .collect();

        RationalTable { limit, entries }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first entry matching `value`.
    /// The enumeration order makes this the fraction in lowest terms.
    pub fn lookup(&self, value: f64) -> Option<Fraction> {
        let tolerance = MATCH_TOLERANCE * value.abs().max(1.0);
        self.entries
            .iter()
            .find(|(entry, _)| (value - entry).abs() <= tolerance)
            .map(|(_, fraction)| *fraction)
    }
}

impl Default for RationalTable {
    fn default() -> Self {
        RationalTable::new(DEFAULT_TABLE_LIMIT)
    }
}

/// Greatest common divisor by the Euclidean algorithm.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

/// Maps coefficients to the smallest positive integers with the same ratios.
pub fn simplify(coefficients: &[f64], table: &RationalTable) -> Result<Vec<u64>, Error> {
    let fractions = coefficients
        .iter()
        .map(|&value| {
            table.lookup(value).context(UnrepresentableCoefficient {
                value,
                limit: table.limit(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    trace!(
        "Fractions {}",
        fractions
            .iter()
            .map(Fraction::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut numerators: Vec<u64> = fractions.iter().map(Fraction::numerator).collect();
    let mut denominators: Vec<u64> = fractions.iter().map(Fraction::denominator).collect();

    // Clearing one denominator scales every entry, so a single pass suffices
    for index in 0..numerators.len() {
        let denominator = denominators[index];
        if denominator == 1 {
            continue;
        }

        for numerator in numerators.iter_mut() {
            *numerator = numerator
                .checked_mul(denominator)
                .context(CoefficientOverflow)?;
        }
        numerators[index] /= denominator;
        denominators[index] = 1;
    }

    let divisor = numerators.iter().copied().fold(0, gcd);
    if divisor > 1 {
        for numerator in numerators.iter_mut() {
            *numerator /= divisor;
        }
    }

    Ok(numerators)
}
