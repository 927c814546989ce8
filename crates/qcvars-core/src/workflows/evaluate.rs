use crate::core::families;
use crate::core::registry::{Registry, RegistryError};
use crate::core::source::BaseSource;
use crate::engine::batch::BatchMode;
use crate::engine::config::{EvaluationConfig, TargetSelection};
use crate::engine::error::ResolveError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::resolver::Resolver;
use crate::engine::session::ResolutionStats;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to load quantity families: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
    /// Resolved targets in the order they were requested.
    pub values: IndexMap<String, f64>,
    pub errors: IndexMap<String, ResolveError>,
    pub stats: ResolutionStats,
}

impl EvaluationReport {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

#[instrument(skip_all, name = "evaluation_workflow")]
pub fn run<S: BaseSource + ?Sized>(
    base: &S,
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<EvaluationReport, WorkflowError> {
    reporter.report(Progress::PhaseStart {
        name: "Loading Families",
    });
    info!(families = ?config.families, "Loading quantity families.");
    let registry = families::load(&config.families)?;
    info!(rules = registry.len(), "Families loaded.");
    reporter.report(Progress::PhaseFinish);

    run_with_registry(&registry, base, config, reporter)
}

/// Evaluates against an already loaded registry, so one registry can serve many systems.
#[instrument(skip_all, name = "evaluation_task")]
pub fn run_with_registry<S: BaseSource + ?Sized>(
    registry: &Registry,
    base: &S,
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<EvaluationReport, WorkflowError> {
    let targets: Vec<&str> = match &config.targets {
        TargetSelection::All => registry.names().collect(),
        TargetSelection::List(names) => names.iter().map(String::as_str).collect(),
    };

    reporter.report(Progress::PhaseStart {
        name: "Resolving Quantities",
    });
    reporter.report(Progress::TaskStart {
        total_steps: targets.len() as u64,
    });
    info!(
        targets = targets.len(),
        mode = ?config.mode,
        "Resolving requested quantities."
    );

    let mut resolver = Resolver::new(registry, base);
    let outcome =
        resolver.resolve_all_with(targets.iter().copied(), config.mode, |name, result| {
            if let Err(err) = result {
                if config.mode == BatchMode::CollectErrors {
                    warn!(quantity = name, error = %err, "Could not resolve quantity.");
                    reporter.message(|| format!("{}: {}", name, err));
                }
            }
            reporter.report(Progress::TaskIncrement);
        });

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    let outcome = outcome?;

    let stats = resolver.stats();
    info!(
        resolved = outcome.values.len(),
        failed = outcome.errors.len(),
        rule_applications = stats.rule_applications,
        cache_hits = stats.cache_hits,
        "Evaluation complete."
    );

    Ok(EvaluationReport {
        values: outcome.values,
        errors: outcome.errors,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::base_values::BaseValues;
    use crate::engine::config::EvaluationConfigBuilder;
    use std::sync::Mutex;

    fn sapt0_base() -> BaseValues {
        [
            ("SAPT ELST10,R ENERGY", -0.0130),
            ("SAPT EXCH10 ENERGY", 0.0200),
            ("SAPT EXCH10(S^2) ENERGY", 0.0180),
            ("SAPT HF TOTAL ENERGY", -0.0050),
            ("SAPT IND20,R ENERGY", -0.0060),
            ("SAPT EXCH-IND20,R ENERGY", 0.0035),
            ("SAPT DISP20 ENERGY", -0.0080),
            ("SAPT EXCH-DISP20 ENERGY", 0.0012),
        ]
        .into_iter()
        .collect()
    }

    fn config(targets: TargetSelection, mode: BatchMode) -> EvaluationConfig {
        EvaluationConfigBuilder::new()
            .family("sapt")
            .targets(targets)
            .mode(mode)
            .build()
            .unwrap()
    }

    #[test]
    fn run_resolves_listed_targets_in_request_order() {
        let base = sapt0_base();
        let config = config(
            TargetSelection::List(vec![
                "SAPT0 TOTAL ENERGY".to_string(),
                "SAPT0 ELST ENERGY".to_string(),
            ]),
            BatchMode::FailFast,
        );
        let report = run(&base, &config, &ProgressReporter::new()).unwrap();
        assert!(report.is_complete());
        assert_eq!(
            report.values.keys().collect::<Vec<_>>(),
            vec!["SAPT0 TOTAL ENERGY", "SAPT0 ELST ENERGY"]
        );
        assert_eq!(report.values["SAPT0 ELST ENERGY"], -0.0130);
    }

    #[test]
    fn run_all_collects_errors_for_underivable_levels() {
        let base = sapt0_base();
        let config = config(TargetSelection::All, BatchMode::CollectErrors);
        let report = run(&base, &config, &ProgressReporter::new()).unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.values.len() + report.errors.len(), 89);
        assert!(report.values.contains_key("SAPT0 TOTAL ENERGY"));
        assert!(report.values.contains_key("SSAPT0 TOTAL ENERGY"));
        assert!(report.errors.contains_key("SAPT2+3 TOTAL ENERGY"));
        assert!(report.errors.contains_key("SCS-SAPT0 TOTAL ENERGY"));
    }

    #[test]
    fn run_fail_fast_surfaces_resolve_error() {
        let base = sapt0_base();
        let config = config(TargetSelection::All, BatchMode::FailFast);
        let result = run(&base, &config, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(WorkflowError::Resolve(ResolveError::UnresolvableQuantity { .. }))
        ));
    }

    #[test]
    fn run_rejects_unknown_family() {
        let config = EvaluationConfigBuilder::new()
            .family("unknown")
            .targets(TargetSelection::All)
            .build()
            .unwrap();
        let result = run(&BaseValues::new(), &config, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(WorkflowError::Registry(RegistryError::UnknownFamily(_)))
        ));
    }

    #[test]
    fn run_reports_one_increment_per_target() {
        let base = sapt0_base();
        let config = config(
            TargetSelection::List(vec![
                "SAPT0 TOTAL ENERGY".to_string(),
                "SAPT2 TOTAL ENERGY".to_string(),
            ]),
            BatchMode::CollectErrors,
        );
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        run(&base, &config, &reporter).unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        let increments = events
            .iter()
            .filter(|e| matches!(e, Progress::TaskIncrement))
            .count();
        assert_eq!(increments, 2);
        assert!(events.contains(&Progress::TaskStart { total_steps: 2 }));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, Progress::Message(msg) if msg.starts_with("SAPT2 TOTAL ENERGY")))
        );
    }

    #[test]
    fn shared_registry_serves_independent_sessions() {
        let registry = families::load(&["sapt"]).unwrap();
        let config = config(
            TargetSelection::List(vec!["SAPT EXCHSCAL".to_string()]),
            BatchMode::FailFast,
        );
        let first: BaseValues = [
            ("SAPT EXCH10 ENERGY", 0.02),
            ("SAPT EXCH10(S^2) ENERGY", 0.018),
        ]
        .into_iter()
        .collect();
        let second: BaseValues = [
            ("SAPT EXCH10 ENERGY", 1e-7),
            ("SAPT EXCH10(S^2) ENERGY", 0.018),
        ]
        .into_iter()
        .collect();

        let reporter = ProgressReporter::new();
        let a = run_with_registry(&registry, &first, &config, &reporter).unwrap();
        let b = run_with_registry(&registry, &second, &config, &reporter).unwrap();
        assert_eq!(a.values["SAPT EXCHSCAL"], 0.02 / 0.018);
        assert_eq!(b.values["SAPT EXCHSCAL"], 1.0);
    }
}
