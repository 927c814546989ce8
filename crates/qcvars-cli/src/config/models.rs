use crate::utils::output::OutputFormat;
use qcvars::engine::config::EvaluationConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub include_base_values: bool,
    pub core_config: EvaluationConfig,
}
