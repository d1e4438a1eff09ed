/*!
A module to represent a parsed chemical equation.
*/

use std::fmt::Display;

use serde::Serialize;
use typed_index_collections::{TiSlice, TiVec};

/// Newtype wrapper for the position of a compound in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompoundIdx(usize);

impl From<usize> for CompoundIdx {
    fn from(index: usize) -> Self {
        CompoundIdx(index)
    }
}

impl From<CompoundIdx> for usize {
    fn from(index: CompoundIdx) -> Self {
        index.0
    }
}

/// Newtype wrapper for the position of a symbol in the unique element list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ElementIdx(usize);

impl From<usize> for ElementIdx {
    fn from(index: usize) -> Self {
        ElementIdx(index)
    }
}

impl From<ElementIdx> for usize {
    fn from(index: ElementIdx) -> Self {
        index.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reactant,
    Product,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Reactant => write!(f, "reactant"),
            Role::Product => write!(f, "product"),
        }
    }
}

/// Half-open byte range `[start, end)` into the source formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end);
        Span { start, end }
    }

    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An element symbol with its subscript, e.g. `O2`.
/// Invariant: subscript >= 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    symbol: String,
    subscript: u32,
}

impl Element {
    pub fn new(symbol: impl Into<String>, subscript: u32) -> Self {
        assert!(subscript > 0);

        Element {
            symbol: symbol.into(),
            subscript,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn subscript(&self) -> u32 {
        self.subscript
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.subscript == 1 {
            write!(f, "{}", self.symbol)
        } else {
            write!(f, "{}{}", self.symbol, self.subscript)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Compound {
    formula: String,
    elements: Vec<Element>,
    span: Span,
    role: Role,
    /// Real-valued coefficient produced by the linear solver.
    raw_coefficient: Option<f64>,
    /// Integer coefficient after simplification.
    coefficient: Option<u64>,
}

impl Compound {
    pub fn new(formula: impl Into<String>, elements: Vec<Element>, span: Span, role: Role) -> Self {
        Compound {
            formula: formula.into(),
            elements,
            span,
            role,
            raw_coefficient: None,
            coefficient: None,
        }
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Elements in first-seen order. A symbol may appear more than once.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Total number of atoms of `symbol` in one unit of this compound.
    pub fn atoms_of(&self, symbol: &str) -> u64 {
        self.elements
            .iter()
            .filter(|element| element.symbol() == symbol)
            .map(|element| u64::from(element.subscript()))
            .sum()
    }

    pub fn raw_coefficient(&self) -> Option<f64> {
        self.raw_coefficient
    }

    pub fn coefficient(&self) -> Option<u64> {
        self.coefficient
    }

    pub(crate) fn set_coefficients(&mut self, raw: f64, coefficient: u64) {
        self.raw_coefficient = Some(raw);
        self.coefficient = Some(coefficient);
    }
}

impl Display for Compound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.coefficient {
            Some(coefficient) => write!(f, "{}{}", coefficient, self.formula),
            None => write!(f, "{}", self.formula),
        }
    }
}

/// A parsed chemical equation that has not been balanced yet.
///
/// Compounds are kept in scan order, so every reactant precedes every product.
#[derive(Debug, Clone)]
pub struct Equation {
    formula: String,
    yield_span: Span,
    compounds: TiVec<CompoundIdx, Compound>,
    unique_elements: TiVec<ElementIdx, String>,
    num_reactants: usize,
}

impl Equation {
    pub fn new(formula: impl Into<String>, yield_span: Span) -> Self {
        Equation {
            formula: formula.into(),
            yield_span,
            compounds: TiVec::new(),
            unique_elements: TiVec::new(),
            num_reactants: 0,
        }
    }

    /// Appends a compound and registers its symbols in first-encounter order.
    pub fn add_compound(&mut self, compound: Compound) -> CompoundIdx {
        debug_assert!(!compound.span().overlaps(self.yield_span));

        match compound.role() {
            Role::Reactant => {
                assert!(
                    self.num_reactants == self.compounds.len(),
                    "reactant '{}' found after a product",
                    compound.formula()
                );
                self.num_reactants += 1;
            }
            Role::Product => (),
        }

        for element in compound.elements() {
            if !self.unique_elements.iter().any(|s| s == element.symbol()) {
                self.unique_elements.push(element.symbol().to_owned());
            }
        }

        self.compounds.push_and_get_key(compound)
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn yield_span(&self) -> Span {
        self.yield_span
    }

    pub fn compounds(&self) -> &TiSlice<CompoundIdx, Compound> {
        &self.compounds
    }

    pub fn unique_elements(&self) -> &TiSlice<ElementIdx, String> {
        &self.unique_elements
    }

    pub fn num_reactants(&self) -> usize {
        self.num_reactants
    }

    pub fn num_products(&self) -> usize {
        self.compounds.len() - self.num_reactants
    }

    pub fn reactants(&self) -> impl Iterator<Item = &Compound> + '_ {
        self.compounds.iter().take(self.num_reactants)
    }

    pub fn products(&self) -> impl Iterator<Item = &Compound> + '_ {
        self.compounds.iter().skip(self.num_reactants)
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Compound>, Vec<String>) {
        (
            self.formula,
            self.compounds.into_iter().collect(),
            self.unique_elements.into_iter().collect(),
        )
    }
}

fn join_formulas<'a>(compounds: impl Iterator<Item = &'a Compound>) -> String {
    compounds
        .map(|compound| compound.formula())
        .collect::<Vec<_>>()
        .join(" + ")
}

impl Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {}",
            join_formulas(self.reactants()),
            join_formulas(self.products())
        )
    }
}
