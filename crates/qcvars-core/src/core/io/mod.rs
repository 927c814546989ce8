//! # I/O Module
//!
//! Readers for the values an external quantum-chemistry engine reports.
//!
//! - [`base_values`] - Loads base quantities from a TOML table (`"NAME" = value`) or a CSV
//!   file with a `name,value` header
//!
//! Quantity names are kept verbatim. No trimming beyond CSV field whitespace is applied,
//! so names must match the registry's spelling exactly.

pub mod base_values;
