#[macro_use]
extern crate log;

pub mod elements;
pub mod events;
pub mod formula;
pub mod matrix;
pub mod parser;
pub mod prelude;
pub mod reaction;
pub mod report;
pub mod simplify;
pub mod solver;

pub use reaction::{balance, Balancer, Options, Reaction};

#[cfg(test)]
mod tests;
