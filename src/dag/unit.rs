// src/dag/unit.rs

//! The capability contract every tool integration implements.

use std::path::PathBuf;

use crate::dag::env::{EnvDelta, Environment};

/// Canonical dependency name type used throughout the graph.
pub type UnitName = String;

/// Result of a `verify` or `provision` call.
///
/// The boolean is what the traversal acts on; the attached [`EnvDelta`] is
/// applied to the session [`Environment`] before the next unit runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitOutcome {
    success: bool,
    env: EnvDelta,
}

impl UnitOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            env: EnvDelta::new(),
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            env: EnvDelta::new(),
        }
    }

    pub fn from_bool(success: bool) -> Self {
        if success {
            Self::success()
        } else {
            Self::failure()
        }
    }

    /// Attach environment mutations to this outcome.
    pub fn with_env(mut self, env: EnvDelta) -> Self {
        self.env = env;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn env(&self) -> &EnvDelta {
        &self.env
    }
}

impl From<bool> for UnitOutcome {
    fn from(success: bool) -> Self {
        Self::from_bool(success)
    }
}

/// A named external tool or resource with a presence check and an
/// installation action.
///
/// Implementations must be idempotent: repeated `verify` calls never
/// install anything, and `provision` on an already-present tool must not
/// fail. Neither method may panic on ordinary faults (network errors,
/// missing registry keys, failed subprocesses); those are logged and
/// reported as a failed [`UnitOutcome`].
pub trait DependencyUnit {
    /// Unique key of this unit in a [`DependencyGraph`](crate::dag::DependencyGraph).
    fn name(&self) -> &str;

    /// Names of units that must be verified/provisioned before this one.
    /// They may refer to units that are never registered.
    fn prerequisites(&self) -> &[UnitName];

    /// Check whether the tool is already available.
    ///
    /// Takes `&mut self` so implementations can cache discovered paths.
    fn verify(&mut self, env: &Environment) -> UnitOutcome;

    /// Try to make a failed verification true.
    fn provision(&mut self, env: &Environment) -> UnitOutcome;

    /// Location of the tool's main executable, when the unit knows it.
    fn executable(&self) -> Option<PathBuf> {
        None
    }
}
