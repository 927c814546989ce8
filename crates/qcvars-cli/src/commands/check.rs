use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use qcvars::core::registry::Registry;
use qcvars::engine::analysis::{self, AnalysisError};
use std::io::{self, Write};
use tracing::info;

pub fn run(args: CheckArgs) -> Result<()> {
    // Duplicate definitions across families are rejected while loading.
    let registry = super::load_registry(&args.families)?;
    let stdout = io::stdout();
    write_check(&mut stdout.lock(), &registry, args.order)
}

fn arity_mismatches(registry: &Registry) -> Vec<String> {
    registry
        .iter()
        .filter_map(|(name, rule)| {
            rule.combinator()
                .check_arity(rule.arguments().len())
                .err()
                .map(|e| format!("'{}': {}", name, e))
        })
        .collect()
}

fn write_check<W: Write>(writer: &mut W, registry: &Registry, show_order: bool) -> Result<()> {
    let mismatches = arity_mismatches(registry);
    if !mismatches.is_empty() {
        return Err(CliError::Validation(mismatches.join("; ")));
    }
    if let Some(chain) = analysis::find_cycle(registry) {
        return Err(AnalysisError::Cycle { chain }.into());
    }

    let order = analysis::evaluation_order(registry)?;
    let inputs = analysis::external_inputs(registry);
    info!(
        rules = registry.len(),
        external_inputs = inputs.len(),
        "Registry passed validation."
    );

    writeln!(
        writer,
        "✓ {} derived quantities from '{}': no duplicates, no cycles, arities consistent.",
        registry.len(),
        registry.families().join(", ")
    )?;
    writeln!(
        writer,
        "  Evaluation order covers {} quantities; {} external base values are referenced.",
        order.len(),
        inputs.len()
    )?;

    if show_order {
        writeln!(writer)?;
        for (step, name) in order.iter().enumerate() {
            writeln!(writer, "{:>4}. {}", step + 1, name)?;
        }
    }
    Ok(())
}
