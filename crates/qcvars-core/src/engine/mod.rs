//! # Engine Module
//!
//! The evaluation layer: turns a registry of rules plus a source of base values into numbers.
//!
//! ## Overview
//!
//! Resolution is single-threaded, synchronous and depth-first. Requesting a quantity checks
//! the session cache, then the base-value source, then the registry. A rule's arguments are
//! resolved in declared order through the same session before its combinator runs, so shared
//! intermediates such as `SAPT EXCHSCAL` are computed once no matter how many quantities use
//! them.
//!
//! Each quantity moves through `Unseen -> InProgress -> Resolved | Failed` within a session.
//! Meeting a quantity that is still `InProgress` means the rules loop back on themselves and
//! is reported as a cycle instead of recursing forever.
//!
//! ## Architecture
//!
//! - **Resolution** ([`resolver`]) - The recursive evaluator and its batch entry points
//! - **Session State** ([`session`]) - Value cache, in-progress stack and lookup counters
//! - **Batches** ([`batch`]) - Fail-fast versus collect-errors handling of multi-name requests
//! - **Static Analysis** ([`analysis`]) - Dependency closure, external inputs, evaluation
//!   order and cycle detection without evaluating anything
//! - **Configuration** ([`config`]) - Which families and targets an evaluation covers
//! - **Progress Monitoring** ([`progress`]) - Callback hooks for long batches
//! - **Error Handling** ([`error`]) - Unresolvable, cyclic and malformed-rule failures
//!
//! A [`crate::core::registry::Registry`] is read-only and may be shared across threads; every
//! thread evaluating its own system needs its own [`resolver::Resolver`].

pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod progress;
pub mod resolver;
pub mod session;
