//! # qcvars Core Library
//!
//! Derives composite quantum-chemistry variables, such as SAPT interaction-energy components,
//! from the base values an electronic-structure engine reports.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless descriptions of derived quantities: combinators,
//!   rules, immutable registries, formula families and base-value sources.
//!
//! - **[`engine`]: The Logic Core.** The dependency-resolving evaluator. It computes each
//!   requested quantity exactly once per session, in dependency order, and reports missing
//!   inputs, cycles and malformed rules as typed errors.
//!
//! - **[`workflows`]: The Public API.** Configuration-driven evaluation of whole families
//!   against a set of base values.
//!
//! ```ignore
//! use qcvars::core::families::sapt::sapt_psivars;
//! use qcvars::engine::resolver::resolve;
//! use std::collections::HashMap;
//!
//! let registry = sapt_psivars();
//! let base: HashMap<String, f64> = HashMap::from([
//!     ("SAPT EXCH10 ENERGY".to_string(), 0.02),
//!     ("SAPT EXCH10(S^2) ENERGY".to_string(), 0.018),
//! ]);
//! let scale = resolve("SAPT EXCHSCAL", &base, &registry)?;
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
