use super::error::ResolveError;
use indexmap::IndexMap;
use serde::Deserialize;

/// How a batch request reacts to a failing quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchMode {
    /// Stop at the first failure and return it.
    #[default]
    FailFast,
    /// Keep going; failures are recorded per requested name alongside the resolved values.
    CollectErrors,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub values: IndexMap<String, f64>,
    pub errors: IndexMap<String, ResolveError>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn error(&self, name: &str) -> Option<&ResolveError> {
        self.errors.get(name)
    }
}
