//! Turns a set of operation descriptors into a deterministic plan: an
//! ordered list of waves, each wave a set of names with no edges
//! between them. Kahn's algorithm, peeling one wave (the full set of
//! current zero-indegree nodes) per iteration rather than one node at a
//! time, which is what makes waves come out instead of a flat order.

use crate::errors::EngineError;
use crate::operation::OperationDescriptor;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wave(pub Vec<String>);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    pub waves: Vec<Wave>,
}

impl Plan {
    pub fn flatten(&self) -> Vec<&str> {
        self.waves.iter().flat_map(|w| w.0.iter().map(String::as_str)).collect()
    }
}

pub fn resolve(descriptors: &[OperationDescriptor]) -> Result<Plan, EngineError> {
    let names: BTreeSet<&str> = descriptors.iter().map(|d| d.name()).collect();

    // Fail fast on edges to names outside the input set.
    for d in descriptors {
        for dep in &d.spec.depends_on {
            if !names.contains(dep.as_str()) {
                return Err(EngineError::UnresolvedDependency { operation: d.name().to_string(), missing: dep.clone() });
            }
        }
    }

    // indegree[n] = number of deps n still has unsatisfied;
    // dependents[n] = names that list n in their depends_on.
    let mut indegree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for d in descriptors {
        indegree.entry(d.name()).or_insert(0);
        for dep in &d.spec.depends_on {
            *indegree.entry(d.name()).or_insert(0) += 1;
            dependents.entry(dep.as_str()).or_default().push(d.name());
        }
    }

    let mut waves = Vec::new();
    let mut remaining = descriptors.len();
    loop {
        let mut ready: Vec<&str> = indegree.iter().filter(|(_, &deg)| deg == 0).map(|(&n, _)| n).collect();
        if ready.is_empty() {
            break;
        }
        ready.sort_unstable();
        for &n in &ready {
            indegree.remove(n);
            remaining -= 1;
        }
        for &n in &ready {
            if let Some(deps) = dependents.get(n) {
                for &dep in deps {
                    if let Some(deg) = indegree.get_mut(dep) {
                        *deg -= 1;
                    }
                }
            }
        }
        waves.push(Wave(ready.into_iter().map(str::to_string).collect()));
    }

    if remaining > 0 {
        let mut cycle: Vec<String> = indegree.keys().map(|s| s.to_string()).collect();
        cycle.sort();
        return Err(EngineError::CircularDependency(cycle));
    }

    Ok(Plan { waves })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::handle_fn;
    use opseq_domain::{OperationSpec, OperationType};

    fn op(name: &str, deps: &[&str]) -> OperationDescriptor {
        let spec = OperationSpec::new(name, OperationType::Sync).unwrap().with_depends_on(deps.iter().copied());
        OperationDescriptor::new(spec, handle_fn(|_| Ok(())))
    }

    #[test]
    fn sequential_chain_forms_three_waves() {
        let plan = resolve(&[op("A", &[]), op("B", &["A"]), op("C", &["B"])]).unwrap();
        assert_eq!(plan.waves, vec![Wave(vec!["A".into()]), Wave(vec!["B".into()]), Wave(vec!["C".into()])]);
    }

    #[test]
    fn independent_siblings_land_in_one_wave_sorted() {
        let plan = resolve(&[op("B", &[]), op("A", &[])]).unwrap();
        assert_eq!(plan.waves, vec![Wave(vec!["A".into(), "B".into()])]);
    }

    #[test]
    fn cycle_is_detected() {
        let err = resolve(&[op("A", &["B"]), op("B", &["A"])]).unwrap_err();
        assert!(matches!(err, EngineError::CircularDependency(_)));
    }

    #[test]
    fn unresolved_dependency_is_detected() {
        let err = resolve(&[op("B", &["A"])]).unwrap_err();
        assert!(matches!(err, EngineError::UnresolvedDependency { .. }));
    }

    #[test]
    fn plan_is_independent_of_input_order() {
        let p1 = resolve(&[op("A", &[]), op("B", &["A"]), op("C", &["A"])]).unwrap();
        let p2 = resolve(&[op("C", &["A"]), op("A", &[]), op("B", &["A"])]).unwrap();
        assert_eq!(p1, p2);
    }
}
