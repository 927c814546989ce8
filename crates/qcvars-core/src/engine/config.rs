use super::batch::BatchMode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelection {
    /// Every quantity the loaded families define, in declaration order.
    All,
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    pub families: Vec<String>,
    pub targets: TargetSelection,
    pub mode: BatchMode,
}

#[derive(Default)]
pub struct EvaluationConfigBuilder {
    families: Vec<String>,
    targets: Option<TargetSelection>,
    mode: Option<BatchMode>,
}

impl EvaluationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn family(mut self, name: impl Into<String>) -> Self {
        self.families.push(name.into());
        self
    }
    pub fn families<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.families.extend(names.into_iter().map(Into::into));
        self
    }
    pub fn targets(mut self, selection: TargetSelection) -> Self {
        self.targets = Some(selection);
        self
    }
    pub fn mode(mut self, mode: BatchMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<EvaluationConfig, ConfigError> {
        if self.families.is_empty() {
            return Err(ConfigError::MissingParameter("families"));
        }
        let targets = self
            .targets
            .ok_or(ConfigError::MissingParameter("targets"))?;
        if let TargetSelection::List(names) = &targets {
            if names.is_empty() {
                return Err(ConfigError::InvalidParameter {
                    parameter: "targets",
                    reason: "the target list is empty".to_string(),
                });
            }
        }
        Ok(EvaluationConfig {
            families: self.families,
            targets,
            mode: self.mode.unwrap_or_default(),
        })
    }
}
