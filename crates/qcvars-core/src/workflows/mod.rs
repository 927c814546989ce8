//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::core`] tables and the [`crate::engine`]
//! evaluator together.
//!
//! - **Evaluation Workflow** ([`evaluate`]) - Loads the configured families, resolves the
//!   selected targets against a base-value source and returns the values, any collected
//!   errors and resolution statistics

pub mod evaluate;
