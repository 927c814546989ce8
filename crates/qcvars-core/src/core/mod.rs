//! # Core Module
//!
//! Stateless building blocks: how derived quantities are described, where the rule tables
//! come from, and how base values enter the system.
//!
//! ## Architecture
//!
//! - **Rule Description** ([`rules`]) - Combinators, tagged argument specs and rules
//! - **Rule Tables** ([`registry`]) - The immutable name-to-rule mapping and family merging
//! - **Formula Families** ([`families`]) - Factory functions producing populated registries,
//!   starting with the SAPT interaction-energy family
//! - **Base Values** ([`source`], [`io`]) - The read-only contract for externally computed
//!   quantities and file loaders that satisfy it
//!
//! Nothing in this layer evaluates anything. Resolution lives in [`crate::engine`].

pub mod families;
pub mod io;
pub mod registry;
pub mod rules;
pub mod source;
