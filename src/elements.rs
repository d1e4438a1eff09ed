/*!
Periodic table symbols, used to optionally validate parsed formulas.

Balancing itself never consults this table.
*/

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use crate::prelude::*;

/// Symbols of elements 1 through 118, in atomic number order.
pub static SYMBOLS: [&str; 118] = [
    "H", "He", // 1-2
    "Li", "Be", "B", "C", "N", "O", "F", "Ne", // 3-10
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", // 11-18
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se",
    "Br", "Kr", // 19-36
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te",
    "I", "Xe", // 37-54
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At",
    "Rn", // 55-86
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No",
    "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts",
    "Og", // 87-118
];

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("I/O error occurred while reading symbol file '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Symbol file '{}' does not contain any symbol", path.display()))]
    EmptyTable { path: PathBuf },
}

/// A set of accepted element symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeSet<String>,
}

impl SymbolTable {
    /// The 118 known elements.
    pub fn builtin() -> Self {
        SymbolTable {
            symbols: SYMBOLS.iter().map(|&symbol| symbol.to_owned()).collect(),
        }
    }

    /// Parses comma or newline separated symbols, ignoring surrounding whitespace.
    pub fn parse_csv(contents: &str) -> Self {
        let symbols = contents
            .split(|c: char| c == ',' || c == '\n')
            .map(|field| field.trim().trim_matches('"'))
            .filter(|field| !field.is_empty())
            .map(str::to_owned)
            .collect();

        SymbolTable { symbols }
    }

    /// Loads a symbol list such as `H,He,Li,...` from a file.
    pub fn from_csv_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).context(IoError {
            path: path.to_owned(),
        })?;

        let table = SymbolTable::parse_csv(&contents);
        ensure!(
            !table.is_empty(),
            EmptyTable {
                path: path.to_owned(),
            }
        );

        info!("Loaded {} element symbols from '{}'", table.len(), path.display());
        Ok(table)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::builtin()
    }
}
