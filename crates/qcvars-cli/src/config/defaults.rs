use crate::utils::output::OutputFormat;
use qcvars::engine::batch::BatchMode;

pub struct DefaultsConfig {
    pub families: Vec<String>,
    pub mode: BatchMode,
    pub include_base_values: bool,
    pub format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            families: vec!["sapt".to_string()],
            mode: BatchMode::FailFast,
            include_base_values: false,
            format: OutputFormat::Table,
        }
    }
}
