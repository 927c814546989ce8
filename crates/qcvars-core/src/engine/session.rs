use super::error::ResolveError;
use std::collections::HashMap;

/// Per-quantity progress within one session. A quantity with no entry has not been seen yet.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityState {
    InProgress,
    Resolved(f64),
    Failed(ResolveError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub base_lookups: usize,
    pub rule_applications: usize,
    pub cache_hits: usize,
}

/// Value cache and in-progress stack shared by every request made through one resolver.
///
/// A session is never shared between threads; concurrent evaluations each own one.
#[derive(Debug, Clone, Default)]
pub struct Session {
    states: HashMap<String, QuantityState>,
    stack: Vec<String>,
    stats: ResolutionStats,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, name: &str) -> Option<&QuantityState> {
        self.states.get(name)
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        match self.states.get(name) {
            Some(QuantityState::Resolved(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn resolved_values(&self) -> impl Iterator<Item = (&str, f64)> {
        self.states.iter().filter_map(|(name, state)| match state {
            QuantityState::Resolved(value) => Some((name.as_str(), *value)),
            _ => None,
        })
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }

    /// Names currently mid-resolution, outermost first.
    pub fn in_progress(&self) -> &[String] {
        &self.stack
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.stack.clear();
        self.stats = ResolutionStats::default();
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ResolutionStats {
        &mut self.stats
    }

    /// The chain from the first occurrence of `name` on the stack back to `name` itself.
    pub(crate) fn cycle_through(&self, name: &str) -> Vec<String> {
        let start = self
            .stack
            .iter()
            .position(|entry| entry == name)
            .unwrap_or(0);
        let mut chain = self.stack[start..].to_vec();
        chain.push(name.to_string());
        chain
    }

    pub(crate) fn enter(&mut self, name: &str) {
        self.states
            .insert(name.to_string(), QuantityState::InProgress);
        self.stack.push(name.to_string());
    }

    pub(crate) fn leave(&mut self, name: &str, outcome: &Result<f64, ResolveError>) {
        if self.stack.last().map(String::as_str) == Some(name) {
            self.stack.pop();
        }
        self.record(name, outcome);
    }

    pub(crate) fn record(&mut self, name: &str, outcome: &Result<f64, ResolveError>) {
        let state = match outcome {
            Ok(value) => QuantityState::Resolved(*value),
            Err(err) => QuantityState::Failed(err.clone()),
        };
        self.states.insert(name.to_string(), state);
    }
}
