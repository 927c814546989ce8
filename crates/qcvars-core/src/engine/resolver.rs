use super::batch::{BatchMode, BatchOutcome};
use super::error::ResolveError;
use super::session::{QuantityState, ResolutionStats, Session};
use crate::core::registry::Registry;
use crate::core::rules::{ArgSpec, Rule};
use crate::core::source::BaseSource;
use tracing::{debug, trace};

/// Depth-first evaluator for derived quantities.
///
/// A base value always wins over a rule of the same name. Every quantity is computed at most
/// once per session; later references are answered from the cache, including recorded
/// failures.
pub struct Resolver<'a, S: BaseSource + ?Sized> {
    registry: &'a Registry,
    base: &'a S,
    session: Session,
}

impl<'a, S: BaseSource + ?Sized> Resolver<'a, S> {
    pub fn new(registry: &'a Registry, base: &'a S) -> Self {
        Self::with_session(registry, base, Session::new())
    }

    /// Continues an earlier session so its cached values are reused.
    pub fn with_session(registry: &'a Registry, base: &'a S, session: Session) -> Self {
        Self {
            registry,
            base,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn stats(&self) -> ResolutionStats {
        self.session.stats()
    }

    pub fn resolve(&mut self, name: &str) -> Result<f64, ResolveError> {
        match self.session.state(name) {
            Some(QuantityState::Resolved(value)) => {
                let value = *value;
                self.session.stats_mut().cache_hits += 1;
                trace!(quantity = name, value, "Cache hit.");
                return Ok(value);
            }
            Some(QuantityState::Failed(err)) => {
                let err = err.clone();
                self.session.stats_mut().cache_hits += 1;
                return Err(err);
            }
            Some(QuantityState::InProgress) => {
                let chain = self.session.cycle_through(name);
                debug!(chain = ?chain, "Cycle detected while resolving.");
                return Err(ResolveError::CyclicDependency { chain });
            }
            None => {}
        }

        self.session.stats_mut().base_lookups += 1;
        if let Some(value) = self.base.value(name) {
            trace!(quantity = name, value, "Using base value.");
            self.session.record(name, &Ok(value));
            return Ok(value);
        }

        let registry = self.registry;
        let Some(rule) = registry.get(name) else {
            let outcome = Err(ResolveError::UnresolvableQuantity {
                name: name.to_string(),
            });
            self.session.record(name, &outcome);
            return outcome;
        };

        self.session.enter(name);
        let outcome = self.apply_rule(name, rule);
        self.session.leave(name, &outcome);
        outcome
    }

    fn apply_rule(&mut self, name: &str, rule: &Rule) -> Result<f64, ResolveError> {
        let malformed = |reason| ResolveError::MalformedRule {
            name: name.to_string(),
            reason,
        };
        let combinator = rule.combinator();
        combinator
            .check_arity(rule.arguments().len())
            .map_err(malformed)?;

        let mut values = Vec::with_capacity(rule.arguments().len());
        for argument in rule.arguments() {
            let value = match argument {
                ArgSpec::Literal(value) => *value,
                ArgSpec::Reference(dependency) => self.resolve(dependency)?,
            };
            values.push(value);
        }

        self.session.stats_mut().rule_applications += 1;
        let value = combinator.apply(&values).map_err(malformed)?;
        debug!(quantity = name, value, rule = %combinator, "Applied rule.");
        Ok(value)
    }

    pub fn resolve_all<I, N>(
        &mut self,
        names: I,
        mode: BatchMode,
    ) -> Result<BatchOutcome, ResolveError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        self.resolve_all_with(names, mode, |_, _| {})
    }

    /// Like [`Self::resolve_all`], calling `on_result` once per requested name as it finishes.
    pub fn resolve_all_with<I, N, F>(
        &mut self,
        names: I,
        mode: BatchMode,
        mut on_result: F,
    ) -> Result<BatchOutcome, ResolveError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
        F: FnMut(&str, &Result<f64, ResolveError>),
    {
        let mut outcome = BatchOutcome::default();
        for name in names {
            let name = name.as_ref();
            let result = self.resolve(name);
            on_result(name, &result);
            match (result, mode) {
                (Ok(value), _) => {
                    outcome.values.insert(name.to_string(), value);
                }
                (Err(err), BatchMode::FailFast) => return Err(err),
                (Err(err), BatchMode::CollectErrors) => {
                    outcome.errors.insert(name.to_string(), err);
                }
            }
        }
        Ok(outcome)
    }

    /// Resolves every quantity the registry defines, in declaration order.
    pub fn resolve_registry(&mut self, mode: BatchMode) -> Result<BatchOutcome, ResolveError> {
        let registry = self.registry;
        self.resolve_all(registry.names(), mode)
    }
}

/// Resolves one quantity in a fresh session.
pub fn resolve<S: BaseSource + ?Sized>(
    name: &str,
    base: &S,
    registry: &Registry,
) -> Result<f64, ResolveError> {
    Resolver::new(registry, base).resolve(name)
}

/// Resolves a batch of quantities sharing one fresh session.
pub fn resolve_all<S, I, N>(
    names: I,
    base: &S,
    registry: &Registry,
    mode: BatchMode,
) -> Result<BatchOutcome, ResolveError>
where
    S: BaseSource + ?Sized,
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    Resolver::new(registry, base).resolve_all(names, mode)
}
