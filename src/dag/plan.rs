// src/dag/plan.rs

//! Side-effect-free view of a dependency graph, used by `--dry-run`.

use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::dag::graph::DependencyGraph;
use crate::dag::report::Diagnostic;
use crate::dag::unit::UnitName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUnit {
    pub name: UnitName,
    pub prerequisites: Vec<UnitName>,
}

/// Traversal order, configuration diagnostics and the strongly connected
/// components that form cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub units: Vec<PlannedUnit>,
    pub diagnostics: Vec<Diagnostic>,
    pub cycles: Vec<Vec<UnitName>>,
}

impl Plan {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let traversal = graph.traversal();

        let units = traversal
            .order
            .iter()
            .map(|name| PlannedUnit {
                name: name.clone(),
                prerequisites: graph.prerequisites_of(name).to_vec(),
            })
            .collect();

        Self {
            units,
            diagnostics: traversal.diagnostics,
            cycles: find_cycles(graph),
        }
    }

    pub fn has_config_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_config_error)
    }
}

/// Edge direction: prerequisite -> dependent. Only registered names take
/// part; missing prerequisites are reported separately by the traversal.
fn find_cycles(graph: &DependencyGraph) -> Vec<Vec<UnitName>> {
    let mut g: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in graph.names() {
        g.add_node(name);
    }

    for name in graph.names() {
        for dep in graph.prerequisites_of(name) {
            if graph.contains(dep) {
                g.add_edge(dep.as_str(), name, ());
            }
        }
    }

    tarjan_scc(&g)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || g.contains_edge(component[0], component[0])
        })
        .map(|component| {
            let mut names: Vec<UnitName> = component.into_iter().map(str::to_string).collect();
            names.sort();
            names
        })
        .collect()
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dependencies ({}):", self.units.len())?;
        for (pos, unit) in self.units.iter().enumerate() {
            write!(f, "  {}. {}", pos + 1, unit.name)?;
            if !unit.prerequisites.is_empty() {
                write!(f, " (after: {})", unit.prerequisites.join(", "))?;
            }
            writeln!(f)?;
        }

        for cycle in &self.cycles {
            writeln!(f, "  cycle: {}", cycle.join(" <-> "))?;
        }

        for diagnostic in &self.diagnostics {
            writeln!(f, "  error: {diagnostic}")?;
        }

        Ok(())
    }
}
