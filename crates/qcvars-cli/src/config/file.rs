use crate::error::{CliError, Result};
use qcvars::engine::batch::BatchMode;
use qcvars::engine::config::TargetSelection;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum FileTargetSelection {
    All,
    List { names: Vec<String> },
}

impl From<FileTargetSelection> for TargetSelection {
    fn from(p: FileTargetSelection) -> Self {
        match p {
            FileTargetSelection::All => TargetSelection::All,
            FileTargetSelection::List { names } => TargetSelection::List(names),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub families: Option<Vec<String>>,
    pub mode: Option<BatchMode>,
    pub include_base_values: Option<bool>,
    pub targets: Option<FileTargetSelection>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
