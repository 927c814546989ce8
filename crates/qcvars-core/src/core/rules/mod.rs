//! # Rules Module
//!
//! A rule describes how one derived quantity is computed: a [`combinator::Combinator`]
//! applied to an ordered list of [`argument::ArgSpec`]s.
//!
//! - [`argument`] - Tagged argument specs, either a literal constant or a reference to
//!   another quantity by name
//! - [`combinator`] - Arity-agnostic reductions and fixed-arity positional formulas
//! - [`rule`] - The pairing of a combinator with its arguments
//!
//! Argument order is significant. Fixed-arity formulas read their inputs positionally,
//! so a rule hands its resolved values to the combinator exactly as declared.

pub mod argument;
pub mod combinator;
pub mod rule;

pub use argument::ArgSpec;
pub use combinator::{Combinator, CombinatorError, FormulaFn, ReduceOp};
pub use rule::Rule;
