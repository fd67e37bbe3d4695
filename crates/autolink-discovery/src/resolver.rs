//! Dependency ordering and cycle detection across discovered extensions.
//!
//! Edges point from an extension to the extensions it depends on. The
//! produced order puts dependencies first; ties break alphabetically so the
//! order is deterministic.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use autolink_spec::ExtensionRecord;
use serde::Serialize;

/// One dependency cycle, closed: the first name is repeated at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCycle {
    pub path: Vec<String>,
}

impl std::fmt::Display for DependencyCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.join(" -> "))
    }
}

/// A declared dependency that was never discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingDependency {
    pub dependent: String,
    pub dependency: String,
}

/// Either a full order or the cycles that prevent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Resolution {
    Ordered(Vec<String>),
    Cyclic(Vec<DependencyCycle>),
}

/// Output of dependency resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub resolution: Resolution,
    /// Reported separately; missing edges never block ordering.
    pub missing: Vec<MissingDependency>,
}

impl ResolutionResult {
    /// The order, if no cycle was found.
    pub fn order(&self) -> Option<&[String]> {
        match &self.resolution {
            Resolution::Ordered(order) => Some(order),
            Resolution::Cyclic(_) => None,
        }
    }

    /// Cycles found, empty when ordering succeeded.
    pub fn cycles(&self) -> &[DependencyCycle] {
        match &self.resolution {
            Resolution::Ordered(_) => &[],
            Resolution::Cyclic(cycles) => cycles,
        }
    }

    pub fn is_ordered(&self) -> bool {
        matches!(self.resolution, Resolution::Ordered(_))
    }
}

/// Resolves the dependency graph of discovered records.
pub fn resolve_dependencies(records: &[ExtensionRecord]) -> ResolutionResult {
    let edges: Vec<(String, Vec<String>)> = records
        .iter()
        .map(|r| (r.name.clone(), r.dependencies().to_vec()))
        .collect();
    resolve_graph(&edges)
}

/// Resolves a graph given as `(name, dependencies)` pairs.
pub fn resolve_graph(edges: &[(String, Vec<String>)]) -> ResolutionResult {
    let graph = DependencyGraph::build(edges);
    let cycles = graph.cycles();
    let resolution = if cycles.is_empty() {
        Resolution::Ordered(graph.topological_order())
    } else {
        for cycle in &cycles {
            tracing::warn!(cycle = %cycle, "circular dependency");
        }
        Resolution::Cyclic(cycles)
    };
    ResolutionResult {
        resolution,
        missing: graph.missing,
    }
}

struct DependencyGraph {
    /// Node -> known dependencies, both sorted.
    deps: BTreeMap<String, BTreeSet<String>>,
    missing: Vec<MissingDependency>,
}

impl DependencyGraph {
    fn build(edges: &[(String, Vec<String>)]) -> Self {
        let known: BTreeSet<&str> = edges.iter().map(|(n, _)| n.as_str()).collect();
        let mut deps: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut missing = Vec::new();

        for (name, dependencies) in edges {
            let entry = deps.entry(name.clone()).or_default();
            for dependency in dependencies {
                if known.contains(dependency.as_str()) {
                    entry.insert(dependency.clone());
                } else if !missing.iter().any(|m: &MissingDependency| {
                    m.dependent == *name && m.dependency == *dependency
                }) {
                    missing.push(MissingDependency {
                        dependent: name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }
        Self { deps, missing }
    }

    /// Kahn's algorithm over "dependency before dependent".
    fn topological_order(&self) -> Vec<String> {
        let mut remaining: HashMap<&str, usize> = self
            .deps
            .iter()
            .map(|(name, deps)| (name.as_str(), deps.len()))
            .collect();
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
        for (name, deps) in &self.deps {
            for dep in deps {
                dependents.entry(dep.as_str()).or_default().push(name.as_str());
            }
        }

        let mut ready: BTreeSet<&str> = remaining
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(&name, _)| name)
            .collect();
        let mut order = Vec::with_capacity(self.deps.len());

        while let Some(name) = ready.pop_first() {
            order.push(name.to_string());
            for &dependent in dependents.get(name).into_iter().flatten() {
                if let Some(count) = remaining.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }
        order
    }

    /// One shortest cycle per strongly connected component, starting at the
    /// component's alphabetically smallest member.
    fn cycles(&self) -> Vec<DependencyCycle> {
        let mut cycles: Vec<DependencyCycle> = self
            .strongly_connected_components()
            .into_iter()
            .filter_map(|component| {
                let start = component.iter().next()?;
                let cyclic = component.len() > 1
                    || self.deps.get(start).is_some_and(|d| d.contains(start));
                if !cyclic {
                    return None;
                }
                self.shortest_cycle(start, &component)
            })
            .collect();
        cycles.sort_by(|a, b| a.path.cmp(&b.path));
        cycles
    }

    /// Breadth-first search back to `start` within `component`.
    fn shortest_cycle(&self, start: &str, component: &BTreeSet<String>) -> Option<DependencyCycle> {
        let mut parent: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            for next in self.deps.get(node).into_iter().flatten() {
                if !component.contains(next) {
                    continue;
                }
                if next == start {
                    let mut path = vec![start.to_string()];
                    let mut cursor = node;
                    let mut tail = Vec::new();
                    while cursor != start {
                        tail.push(cursor.to_string());
                        cursor = *parent.get(cursor)?;
                    }
                    tail.reverse();
                    path.extend(tail);
                    path.push(start.to_string());
                    return Some(DependencyCycle { path });
                }
                if !parent.contains_key(next.as_str()) {
                    parent.insert(next.as_str(), node);
                    queue.push_back(next.as_str());
                }
            }
        }
        None
    }

    /// Tarjan's algorithm. Components come back as sorted name sets.
    fn strongly_connected_components(&self) -> Vec<BTreeSet<String>> {
        struct State<'g> {
            index: usize,
            indices: HashMap<&'g str, usize>,
            lowlink: HashMap<&'g str, usize>,
            stack: Vec<&'g str>,
            on_stack: BTreeSet<&'g str>,
            components: Vec<BTreeSet<String>>,
        }

        fn visit<'g>(graph: &'g DependencyGraph, node: &'g str, state: &mut State<'g>) {
            state.indices.insert(node, state.index);
            state.lowlink.insert(node, state.index);
            state.index += 1;
            state.stack.push(node);
            state.on_stack.insert(node);

            for next in graph.deps.get(node).into_iter().flatten() {
                let next = next.as_str();
                if !state.indices.contains_key(next) {
                    visit(graph, next, state);
                    let low = state.lowlink[node].min(state.lowlink[next]);
                    state.lowlink.insert(node, low);
                } else if state.on_stack.contains(next) {
                    let low = state.lowlink[node].min(state.indices[next]);
                    state.lowlink.insert(node, low);
                }
            }

            if state.lowlink[node] == state.indices[node] {
                let mut component = BTreeSet::new();
                while let Some(member) = state.stack.pop() {
                    state.on_stack.remove(member);
                    component.insert(member.to_string());
                    if member == node {
                        break;
                    }
                }
                state.components.push(component);
            }
        }

        let mut state = State {
            index: 0,
            indices: HashMap::new(),
            lowlink: HashMap::new(),
            stack: Vec::new(),
            on_stack: BTreeSet::new(),
            components: Vec::new(),
        };
        for name in self.deps.keys() {
            if !state.indices.contains_key(name.as_str()) {
                visit(self, name, &mut state);
            }
        }
        state.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn graph(edges: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
        edges
            .iter()
            .map(|(n, d)| (n.to_string(), d.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dependencies_come_first() {
        let result = resolve_graph(&graph(&[
            ("app-ui", &["core", "net"]),
            ("net", &["core"]),
            ("core", &[]),
        ]));
        assert_eq!(result.order().unwrap(), names(&["core", "net", "app-ui"]).as_slice());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_independent_nodes_sorted() {
        let result = resolve_graph(&graph(&[("zeta", &[]), ("alpha", &[]), ("mid", &[])]));
        assert_eq!(result.order().unwrap(), names(&["alpha", "mid", "zeta"]).as_slice());
    }

    #[test]
    fn test_three_node_cycle() {
        let result = resolve_graph(&graph(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]));
        assert!(result.order().is_none());
        assert_eq!(
            result.cycles(),
            &[DependencyCycle {
                path: names(&["A", "B", "C", "A"])
            }]
        );
    }

    #[test]
    fn test_self_loop() {
        let result = resolve_graph(&graph(&[("solo", &["solo"]), ("other", &[])]));
        assert_eq!(result.cycles()[0].path, names(&["solo", "solo"]));
    }

    #[test]
    fn test_shortest_cycle_in_component() {
        // A -> B -> A and A -> C -> D -> A share a component.
        let result = resolve_graph(&graph(&[
            ("A", &["C", "B"]),
            ("B", &["A"]),
            ("C", &["D"]),
            ("D", &["A"]),
        ]));
        assert_eq!(result.cycles().len(), 1);
        assert_eq!(result.cycles()[0].path, names(&["A", "B", "A"]));
    }

    #[test]
    fn test_missing_dependency_does_not_block() {
        let result = resolve_graph(&graph(&[("a", &["ghost", "b"]), ("b", &[])]));
        assert_eq!(result.order().unwrap(), names(&["b", "a"]).as_slice());
        assert_eq!(
            result.missing,
            vec![MissingDependency {
                dependent: "a".into(),
                dependency: "ghost".into()
            }]
        );
    }

    #[test]
    fn test_two_separate_cycles() {
        let result = resolve_graph(&graph(&[
            ("x", &["y"]),
            ("y", &["x"]),
            ("b", &["a"]),
            ("a", &["b"]),
        ]));
        let paths: Vec<_> = result.cycles().iter().map(|c| c.to_string()).collect();
        assert_eq!(paths, vec!["a -> b -> a", "x -> y -> x"]);
    }
}
