//! Static inspection of a registry's dependency graph, without any base values.
//!
//! Edges run from a derived quantity to each quantity its rule references. References with no
//! rule of their own are the external inputs a calculation must supply.

use crate::core::registry::{Registry, RegistryError};
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Registry contains a dependency cycle: {}", .chain.join(" -> "))]
    Cycle { chain: Vec<String> },
}

/// Referenced names in declared order, duplicates removed.
pub fn direct_dependencies<'r>(
    registry: &'r Registry,
    name: &str,
) -> Result<Vec<&'r str>, RegistryError> {
    let rule = registry.lookup(name)?;
    let unique: IndexSet<&str> = rule.references().collect();
    Ok(unique.into_iter().collect())
}

/// Every name reachable from `name`, in depth-first discovery order, excluding `name` itself.
pub fn transitive_dependencies<'r>(
    registry: &'r Registry,
    name: &str,
) -> Result<Vec<&'r str>, RegistryError> {
    let rule = registry.lookup(name)?;
    let mut seen: IndexSet<&'r str> = IndexSet::new();
    let mut stack: Vec<&'r str> = rule.references().rev().collect();

    while let Some(current) = stack.pop() {
        if current == name || !seen.insert(current) {
            continue;
        }
        if let Some(rule) = registry.get(current) {
            stack.extend(rule.references().rev());
        }
    }
    Ok(seen.into_iter().collect())
}

/// Reachable names that no rule defines, i.e. the base values `name` ultimately needs.
pub fn required_base_quantities<'r>(
    registry: &'r Registry,
    name: &str,
) -> Result<Vec<&'r str>, RegistryError> {
    Ok(transitive_dependencies(registry, name)?
        .into_iter()
        .filter(|dep| !registry.contains(dep))
        .collect())
}

/// Every referenced name that no rule defines, in first-reference order.
pub fn external_inputs(registry: &Registry) -> Vec<&str> {
    let inputs: IndexSet<&str> = registry
        .iter()
        .flat_map(|(_, rule)| rule.references())
        .filter(|dep| !registry.contains(dep))
        .collect();
    inputs.into_iter().collect()
}

/// Derived quantities ordered so each appears after everything it depends on.
///
/// Kahn's algorithm; among ready quantities the earliest-declared goes first.
pub fn evaluation_order(registry: &Registry) -> Result<Vec<&str>, AnalysisError> {
    let names: Vec<&str> = registry.names().collect();
    let index: IndexMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();
    let mut in_degree = vec![0usize; names.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); names.len()];

    for (i, (_, rule)) in registry.iter().enumerate() {
        let deps: IndexSet<&str> = rule.references().collect();
        for dep in deps {
            if let Some(&d) = index.get(dep) {
                dependents[d].push(i);
                in_degree[i] += 1;
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..names.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(names.len());
    while let Some(current) = ready.pop_first() {
        order.push(names[current]);
        for &next in &dependents[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert(next);
            }
        }
    }

    if order.len() != names.len() {
        let chain = find_cycle(registry).unwrap_or_else(|| {
            names
                .iter()
                .enumerate()
                .filter(|(i, _)| in_degree[*i] > 0)
                .map(|(_, n)| n.to_string())
                .collect()
        });
        return Err(AnalysisError::Cycle { chain });
    }
    Ok(order)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// The first cycle found by a depth-first walk in declaration order, closed on its start name.
pub fn find_cycle(registry: &Registry) -> Option<Vec<String>> {
    let mut marks: IndexMap<&str, Mark> =
        registry.names().map(|name| (name, Mark::Unvisited)).collect();
    let mut path: Vec<&str> = Vec::new();

    let roots: Vec<&str> = registry.names().collect();
    for root in roots {
        if marks.get(root) == Some(&Mark::Unvisited) {
            if let Some(chain) = visit(registry, root, &mut marks, &mut path) {
                return Some(chain);
            }
        }
    }
    None
}

fn visit<'r>(
    registry: &'r Registry,
    name: &'r str,
    marks: &mut IndexMap<&'r str, Mark>,
    path: &mut Vec<&'r str>,
) -> Option<Vec<String>> {
    marks.insert(name, Mark::OnStack);
    path.push(name);

    if let Some(rule) = registry.get(name) {
        for dep in rule.references() {
            match marks.get(dep).copied() {
                Some(Mark::OnStack) => {
                    let start = path.iter().position(|n| *n == dep).unwrap_or(0);
                    let mut chain: Vec<String> =
                        path[start..].iter().map(|n| n.to_string()).collect();
                    chain.push(dep.to_string());
                    return Some(chain);
                }
                Some(Mark::Unvisited) => {
                    if let Some(chain) = visit(registry, dep, marks, path) {
                        return Some(chain);
                    }
                }
                Some(Mark::Done) | None => {}
            }
        }
    }

    path.pop();
    marks.insert(name, Mark::Done);
    None
}
