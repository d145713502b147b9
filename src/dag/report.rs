// src/dag/report.rs

//! What a traversal did: visit order, per-unit status and diagnostics.

use std::fmt;

use crate::dag::unit::UnitName;

/// Final state of a unit after one traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    /// `verify` succeeded; nothing was installed.
    Present,
    /// `verify` failed and `provision` reported success.
    Installed,
    /// `verify` failed and `provision` reported failure.
    InstallFailed,
}

/// Non-fatal problems found while traversing the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `unit` declares a prerequisite that is not registered.
    MissingDependency { unit: UnitName, missing: UnitName },
    /// `unit` declares `prerequisite`, which is still being visited higher
    /// up the current path.
    Cycle {
        unit: UnitName,
        prerequisite: UnitName,
    },
    /// `provision` returned failure for `unit`.
    ProvisionFailed { unit: UnitName },
}

impl Diagnostic {
    /// Configuration errors (as opposed to installation failures).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Diagnostic::MissingDependency { .. } | Diagnostic::Cycle { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingDependency { unit, missing } => {
                write!(f, "missing dependency '{missing}' required by '{unit}'")
            }
            Diagnostic::Cycle { unit, prerequisite } => write!(
                f,
                "dependency cycle: '{unit}' requires '{prerequisite}', which is still being resolved"
            ),
            Diagnostic::ProvisionFailed { unit } => {
                write!(f, "failed to install dependency '{unit}'")
            }
        }
    }
}

/// Outcome of [`DependencyGraph::execute`](crate::dag::DependencyGraph::execute).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    skipped: bool,
    visited: Vec<(UnitName, UnitStatus)>,
    diagnostics: Vec<Diagnostic>,
}

impl ExecutionReport {
    /// Report for an `execute` call that short-circuited because the graph
    /// had already been executed.
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, unit: &str, status: UnitStatus) {
        self.visited.push((unit.to_string(), status));
    }

    pub(crate) fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn was_skipped(&self) -> bool {
        self.skipped
    }

    /// Unit names in the order they were verified.
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(|(name, _)| name.as_str())
    }

    pub fn status_of(&self, unit: &str) -> Option<UnitStatus> {
        self.visited
            .iter()
            .find(|(name, _)| name == unit)
            .map(|(_, status)| *status)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Names reported as missing, in report order.
    pub fn missing_dependencies(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::MissingDependency { missing, .. } => Some(missing.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True if every visited unit ended up present or installed and no
    /// diagnostics were raised.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
