use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileTargetSelection};
use super::models::AppConfig;
use crate::cli::{EvalArgs, IncludeBaseValues, ModeFlags, TargetArgs};
use crate::error::{CliError, Result};
use qcvars::engine::batch::BatchMode;
use qcvars::engine::config::{EvaluationConfigBuilder, TargetSelection};

pub fn build_config(args: &EvalArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let file_config = apply_set_values(file_config, &args.set_values)?;

    let families = if args.families.is_empty() {
        file_config.families.unwrap_or(defaults.families)
    } else {
        args.families.clone()
    };
    let targets = merge_targets(&args.targets, file_config.targets);
    let mode = merge_mode(args.mode, file_config.mode).unwrap_or(defaults.mode);
    let include_base_values = merge_include_base_values(
        args.base_values,
        file_config.include_base_values,
    )
    .unwrap_or(defaults.include_base_values);

    let core_config = EvaluationConfigBuilder::new()
        .families(families)
        .targets(targets)
        .mode(mode)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        inputs: args.inputs.clone(),
        output: args.output.clone(),
        format: args.format.unwrap_or(defaults.format),
        include_base_values,
        core_config,
    })
}

fn merge_targets(cli: &TargetArgs, file_val: Option<FileTargetSelection>) -> TargetSelection {
    if cli.all {
        TargetSelection::All
    } else if !cli.names.is_empty() {
        TargetSelection::List(cli.names.clone())
    } else {
        file_val.map(Into::into).unwrap_or(TargetSelection::All)
    }
}

fn merge_mode(cli_flags: ModeFlags, file_val: Option<BatchMode>) -> Option<BatchMode> {
    if cli_flags.collect_errors {
        Some(BatchMode::CollectErrors)
    } else if cli_flags.fail_fast {
        Some(BatchMode::FailFast)
    } else {
        file_val
    }
}

fn merge_include_base_values(cli_flags: IncludeBaseValues, file_val: Option<bool>) -> Option<bool> {
    match (cli_flags.with_base_values, cli_flags.no_base_values) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => file_val,
    }
}

fn parse_mode(key: &str, value_str: &str) -> Result<BatchMode> {
    match value_str {
        "fail-fast" => Ok(BatchMode::FailFast),
        "collect-errors" => Ok(BatchMode::CollectErrors),
        _ => Err(CliError::Config(format!(
            "Invalid value for {}: {} (expected 'fail-fast' or 'collect-errors')",
            key, value_str
        ))),
    }
}

fn split_list(value_str: &str) -> Vec<String> {
    value_str
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "families" => {
                config.families = Some(split_list(value_str));
            }
            "mode" => {
                config.mode = Some(parse_mode(key, value_str)?);
            }
            "include-base-values" => {
                config.include_base_values = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str))
                })?);
            }
            "targets.type" => {
                config.targets = Some(match value_str {
                    "all" => FileTargetSelection::All,
                    "list" => match config.targets.take() {
                        Some(list @ FileTargetSelection::List { .. }) => list,
                        _ => FileTargetSelection::List { names: Vec::new() },
                    },
                    _ => {
                        return Err(CliError::Config(format!(
                            "Invalid value for {}: {} (expected 'all' or 'list')",
                            key, value_str
                        )));
                    }
                });
            }
            "targets.names" => {
                config.targets = Some(FileTargetSelection::List {
                    names: split_list(value_str),
                });
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
