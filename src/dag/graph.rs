// src/dag/graph.rs

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, error, info, warn};

use crate::dag::env::Environment;
use crate::dag::report::{Diagnostic, ExecutionReport, UnitStatus};
use crate::dag::unit::{DependencyUnit, UnitName};

/// Visit marker used during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Static result of walking the graph: the order units would be verified in,
/// plus configuration diagnostics (missing prerequisites and cycles).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    pub order: Vec<UnitName>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Named dependency units plus the prerequisite edges they declare.
///
/// Units are kept in registration order. Registering a unit under an
/// existing name replaces it in place, so iteration order is the order in
/// which each name was *first* registered.
///
/// The graph also owns the session [`Environment`]: every env delta a unit
/// reports is applied here before the next unit runs.
pub struct DependencyGraph {
    units: Vec<Box<dyn DependencyUnit>>,
    index: HashMap<UnitName, usize>,
    /// True only after a full traversal has completed with no registration
    /// since.
    executed: bool,
    env: Environment,
}

impl fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("units", &self.names().collect::<Vec<_>>())
            .field("executed", &self.executed)
            .finish_non_exhaustive()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Empty graph with an empty environment.
    pub fn new() -> Self {
        Self::with_environment(Environment::empty())
    }

    pub fn with_environment(env: Environment) -> Self {
        Self {
            units: Vec::new(),
            index: HashMap::new(),
            executed: false,
            env,
        }
    }

    /// Register `unit`, replacing any unit with the same name.
    ///
    /// Always clears the executed flag: the new unit may be a prerequisite
    /// of units registered earlier, so the next `execute` must re-traverse.
    pub fn add_node(&mut self, unit: Box<dyn DependencyUnit>) {
        let name = unit.name().to_string();

        match self.index.get(&name) {
            Some(&idx) => {
                debug!(unit = %name, "replacing registered dependency");
                self.units[idx] = unit;
            }
            None => {
                debug!(unit = %name, "registering dependency");
                self.index.insert(name, self.units.len());
                self.units.push(unit);
            }
        }

        self.executed = false;
    }

    pub fn find(&self, name: &str) -> Option<&dyn DependencyUnit> {
        self.index.get(name).map(|&idx| self.units[idx].as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered names in iteration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.name())
    }

    /// Declared prerequisites of `name` (empty if unknown).
    pub fn prerequisites_of(&self, name: &str) -> &[UnitName] {
        self.find(name).map(|u| u.prerequisites()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Compute the traversal order without invoking any unit.
    pub fn traversal(&self) -> Traversal {
        let (order, diagnostics) = self.walk();
        Traversal {
            order: order
                .into_iter()
                .map(|idx| self.units[idx].name().to_string())
                .collect(),
            diagnostics,
        }
    }

    /// Verify every unit, provisioning those that fail verification.
    ///
    /// A unit always runs after its registered prerequisites, except where a
    /// prerequisite closes a cycle. Missing prerequisites, cycles and failed
    /// installations are reported in the returned [`ExecutionReport`] and
    /// never stop the traversal.
    ///
    /// Once a traversal has completed, further calls are no-ops until
    /// [`add_node`](Self::add_node) is called again.
    pub fn execute(&mut self) -> ExecutionReport {
        if self.executed {
            debug!("dependency graph already executed; skipping");
            return ExecutionReport::skipped();
        }

        info!(units = self.units.len(), "executing dependency graph");

        let (order, diagnostics) = self.walk();
        let mut report = ExecutionReport::default();

        for diagnostic in diagnostics {
            match &diagnostic {
                Diagnostic::MissingDependency { unit, missing } => {
                    error!(unit = %unit, missing = %missing, "missing dependency");
                }
                Diagnostic::Cycle { unit, prerequisite } => {
                    error!(
                        unit = %unit,
                        prerequisite = %prerequisite,
                        "dependency cycle; prerequisite skipped"
                    );
                }
                Diagnostic::ProvisionFailed { unit } => {
                    error!(unit = %unit, "dependency installation failed");
                }
            }
            report.diagnose(diagnostic);
        }

        for idx in order {
            let status = self.run_unit(idx);
            let name = self.units[idx].name();
            report.record(name, status);

            if status == UnitStatus::InstallFailed {
                report.diagnose(Diagnostic::ProvisionFailed {
                    unit: name.to_string(),
                });
            }
        }

        self.executed = true;
        info!("dependency graph executed");
        report
    }

    /// Depth-first walk over units in registration order, using an explicit
    /// stack of `(unit, next prerequisite)` frames.
    fn walk(&self) -> (Vec<usize>, Vec<Diagnostic>) {
        let mut marks = vec![Mark::Unvisited; self.units.len()];
        let mut order = Vec::with_capacity(self.units.len());
        let mut diagnostics = Vec::new();
        // (declaring unit, missing name) pairs already reported.
        let mut reported_missing: HashSet<(usize, &str)> = HashSet::new();

        for root in 0..self.units.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            marks[root] = Mark::InProgress;
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

            while let Some(frame) = stack.last_mut() {
                let (idx, cursor) = *frame;
                let unit = &self.units[idx];
                let prerequisites = unit.prerequisites();

                if cursor == prerequisites.len() {
                    stack.pop();
                    marks[idx] = Mark::Done;
                    order.push(idx);
                    continue;
                }

                frame.1 += 1;
                let dep = &prerequisites[cursor];

                match self.index.get(dep) {
                    None => {
                        if reported_missing.insert((idx, dep.as_str())) {
                            diagnostics.push(Diagnostic::MissingDependency {
                                unit: unit.name().to_string(),
                                missing: dep.clone(),
                            });
                        }
                    }
                    Some(&dep_idx) => match marks[dep_idx] {
                        Mark::Unvisited => {
                            marks[dep_idx] = Mark::InProgress;
                            stack.push((dep_idx, 0));
                        }
                        Mark::InProgress => diagnostics.push(Diagnostic::Cycle {
                            unit: unit.name().to_string(),
                            prerequisite: dep.clone(),
                        }),
                        Mark::Done => {}
                    },
                }
            }
        }

        (order, diagnostics)
    }

    /// Verify one unit and provision it if needed. The result of
    /// `provision` is taken at face value; presence is not re-checked.
    fn run_unit(&mut self, idx: usize) -> UnitStatus {
        let Self { units, env, .. } = self;
        let unit = &mut units[idx];
        let name = unit.name().to_string();

        info!(unit = %name, "checking dependency");
        let verified = unit.verify(env);
        env.apply(verified.env());

        if verified.is_success() {
            info!(unit = %name, "dependency present");
            return UnitStatus::Present;
        }

        info!(unit = %name, "dependency missing; installing");
        let provisioned = unit.provision(env);
        env.apply(provisioned.env());

        if provisioned.is_success() {
            info!(unit = %name, "dependency installed");
            UnitStatus::Installed
        } else {
            warn!(unit = %name, "dependency installation failed; continuing");
            UnitStatus::InstallFailed
        }
    }
}
