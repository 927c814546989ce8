use crate::cli::EvalArgs;
use crate::config::{self, AppConfig};
use crate::error::{CliError, Result};
use crate::utils::output::{self, OutputFormat};
use crate::utils::progress::CliProgressHandler;
use qcvars::core::io::base_values::BaseValues;
use qcvars::core::registry::Registry;
use qcvars::engine::progress::{Progress, ProgressReporter};
use qcvars::workflows::evaluate::{self, EvaluationReport};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

struct Evaluated {
    base: BaseValues,
    report: EvaluationReport,
}

pub fn run(args: EvalArgs, show_progress: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = config::build_config(&args)?;

    let registry = super::load_registry(&app_config.core_config.families)?;
    info!(
        rules = registry.len(),
        inputs = app_config.inputs.len(),
        "Registry ready."
    );

    let unit = if app_config.inputs.len() == 1 {
        "quantities"
    } else {
        "files"
    };
    let progress_handler = if show_progress {
        CliProgressHandler::new(unit)
    } else {
        CliProgressHandler::hidden(unit)
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let results = evaluate_inputs(&registry, &app_config, &reporter);

    let total = results.len();
    let mut failed = 0;
    for (index, (path, result)) in results.into_iter().enumerate() {
        match result {
            Ok(evaluated) => {
                if !evaluated.report.is_complete() {
                    warn!(
                        input = %path.display(),
                        failed = evaluated.report.errors.len(),
                        "Some quantities could not be evaluated."
                    );
                }
                write_output(&app_config, &path, index, &evaluated)?;
            }
            Err(e) => {
                failed += 1;
                error!(input = %path.display(), "Evaluation failed: {}", e);
                eprintln!("❌ {}: {}", path.display(), e);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Evaluation { failed, total });
    }
    Ok(())
}

/// One input reports per-quantity progress; several inputs are evaluated in parallel and
/// report one step per finished file.
fn evaluate_inputs(
    registry: &Registry,
    app_config: &AppConfig,
    reporter: &ProgressReporter,
) -> Vec<(PathBuf, Result<Evaluated>)> {
    if let [input] = app_config.inputs.as_slice() {
        let result = evaluate_input(registry, app_config, input, reporter);
        return vec![(input.clone(), result)];
    }

    reporter.report(Progress::PhaseStart {
        name: "Evaluating Inputs",
    });
    reporter.report(Progress::TaskStart {
        total_steps: app_config.inputs.len() as u64,
    });

    let results = app_config
        .inputs
        .par_iter()
        .map(|input| {
            let silent = ProgressReporter::new();
            let result = evaluate_input(registry, app_config, input, &silent);
            reporter.report(Progress::TaskIncrement);
            (input.clone(), result)
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    results
}

fn evaluate_input(
    registry: &Registry,
    app_config: &AppConfig,
    input: &Path,
    reporter: &ProgressReporter,
) -> Result<Evaluated> {
    info!("Loading base values from {:?}", input);
    let base = BaseValues::load(input)?;
    let report =
        evaluate::run_with_registry(registry, &base, &app_config.core_config, reporter)?;
    Ok(Evaluated { base, report })
}

fn write_output(
    app_config: &AppConfig,
    input: &Path,
    index: usize,
    evaluated: &Evaluated,
) -> Result<()> {
    let base = app_config.include_base_values.then_some(&evaluated.base);

    let Some(output_path) = output_path(app_config, input, index)? else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if app_config.inputs.len() > 1 {
            writeln!(handle, "== {} ==", input.display())?;
        }
        return output::write_report(&mut handle, app_config.format, &evaluated.report, base)
            .map_err(|source| CliError::Output {
                path: PathBuf::from("<stdout>"),
                source,
            });
    };

    info!("Writing results for {:?} to {:?}", input, &output_path);
    let mut writer = BufWriter::new(File::create(&output_path)?);
    output::write_report(&mut writer, app_config.format, &evaluated.report, base)
        .and_then(|()| writer.flush().map_err(Into::into))
        .map_err(|source| CliError::Output {
            path: output_path.clone(),
            source,
        })?;
    println!(
        "✓ {} quantities written to: {}",
        evaluated.report.values.len(),
        output_path.display()
    );
    Ok(())
}

/// With several inputs `-o` names a directory that receives `<input stem>.<format>` files.
fn output_path(app_config: &AppConfig, input: &Path, index: usize) -> Result<Option<PathBuf>> {
    let Some(output) = &app_config.output else {
        return Ok(None);
    };
    if app_config.inputs.len() == 1 {
        return Ok(Some(output.clone()));
    }

    std::fs::create_dir_all(output)?;
    Ok(Some(output.join(per_input_file_name(
        input,
        index,
        app_config.format,
    ))))
}

fn per_input_file_name(input: &Path, index: usize, format: OutputFormat) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("input-{}", index + 1));
    format!("{}.{}", stem, format.extension())
}
