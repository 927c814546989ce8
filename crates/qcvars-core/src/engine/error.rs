use crate::core::rules::CombinatorError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Quantity '{name}' has neither a base value nor a registered rule")]
    UnresolvableQuantity { name: String },

    #[error("Cyclic dependency detected: {}", .chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },

    #[error("Rule for '{name}' is malformed: {reason}")]
    MalformedRule {
        name: String,
        #[source]
        reason: CombinatorError,
    },
}

impl ResolveError {
    /// The quantity the error is about; for cycles, the name that was requested twice.
    pub fn quantity(&self) -> &str {
        match self {
            Self::UnresolvableQuantity { name } | Self::MalformedRule { name, .. } => name,
            Self::CyclicDependency { chain } => chain.first().map(String::as_str).unwrap_or(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_the_chain() {
        let err = ResolveError::CyclicDependency {
            chain: vec!["A".to_string(), "B".to_string(), "A".to_string()],
        };
        assert_eq!(err.to_string(), "Cyclic dependency detected: A -> B -> A");
        assert_eq!(err.quantity(), "A");
    }

    #[test]
    fn malformed_rule_message_includes_reason() {
        let err = ResolveError::MalformedRule {
            name: "X".to_string(),
            reason: CombinatorError::ArityMismatch {
                expected: 2,
                found: 3,
            },
        };
        assert_eq!(
            err.to_string(),
            "Rule for 'X' is malformed: expected 2 argument(s), found 3"
        );
        assert_eq!(err.quantity(), "X");
    }
}
