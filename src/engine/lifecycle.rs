// src/engine/lifecycle.rs

//! The generate → build → clean state machine.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::dag::{DependencyGraph, Environment, ExecutionReport};
use crate::types::{Platform, Toolset};

/// Where a lifecycle is in the generate → build progression.
///
/// Not a gate: `build` always regenerates and `clean` may run from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    NotGenerated,
    Generated,
    Built,
}

/// Read-only view handed to a [`BuildBackend`].
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub platform: Platform,
    pub toolset: Toolset,
    pub solution_root: &'a Path,
    graph: &'a DependencyGraph,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        platform: Platform,
        toolset: Toolset,
        solution_root: &'a Path,
        graph: &'a DependencyGraph,
    ) -> Self {
        Self {
            platform,
            toolset,
            solution_root,
            graph,
        }
    }

    /// Environment as left by the dependency traversal.
    pub fn env(&self) -> &'a Environment {
        self.graph.environment()
    }

    /// Executable reported by the registered unit `name`, if any.
    pub fn executable(&self, name: &str) -> Option<PathBuf> {
        self.graph.find(name).and_then(|unit| unit.executable())
    }
}

/// Concrete generator / native build tool integration.
///
/// Implementations report failure by returning `false`; they never panic on
/// a failed subprocess.
pub trait BuildBackend: fmt::Debug {
    fn name(&self) -> &str;

    /// Produce build files for the context's platform and toolset.
    fn generate(&mut self, ctx: &BuildContext<'_>) -> bool;

    /// Build with `config` (conventionally `debug` or `release`).
    fn build(&mut self, ctx: &BuildContext<'_>, config: &str) -> bool;

    /// Remove build artifacts.
    fn clean(&mut self, ctx: &BuildContext<'_>) -> bool;
}

/// A dependency graph seeded for one platform/toolset, plus the backend that
/// runs once the graph is satisfied.
#[derive(Debug)]
pub struct BuildLifecycle {
    platform: Platform,
    toolset: Toolset,
    solution_root: PathBuf,
    graph: DependencyGraph,
    backend: Box<dyn BuildBackend>,
    state: LifecycleState,
    last_report: Option<ExecutionReport>,
}

impl BuildLifecycle {
    pub fn new(
        platform: Platform,
        toolset: Toolset,
        solution_root: impl Into<PathBuf>,
        graph: DependencyGraph,
        backend: Box<dyn BuildBackend>,
    ) -> Self {
        Self {
            platform,
            toolset,
            solution_root: solution_root.into(),
            graph,
            backend,
            state: LifecycleState::NotGenerated,
            last_report: None,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn toolset(&self) -> Toolset {
        self.toolset
    }

    pub fn solution_root(&self) -> &Path {
        &self.solution_root
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Mutable graph access, e.g. to register more units. Registering
    /// forces the next `generate` to re-run the traversal.
    pub fn graph_mut(&mut self) -> &mut DependencyGraph {
        &mut self.graph
    }

    /// Report of the most recent traversal that actually ran.
    pub fn last_report(&self) -> Option<&ExecutionReport> {
        self.last_report.as_ref()
    }

    /// Ensure dependencies, then generate build files.
    ///
    /// Returns the backend's result. Dependency problems are logged but do
    /// not stop generation.
    pub fn generate(&mut self) -> bool {
        self.ensure_dependencies();

        info!(
            backend = %self.backend.name(),
            platform = %self.platform,
            toolset = %self.toolset,
            root = %self.solution_root.display(),
            "generating solution"
        );

        let Self {
            platform,
            toolset,
            solution_root,
            graph,
            backend,
            ..
        } = self;
        let ctx = BuildContext::new(*platform, *toolset, solution_root, graph);

        if backend.generate(&ctx) {
            self.state = LifecycleState::Generated;
            true
        } else {
            error!(backend = %self.backend.name(), "solution generation failed");
            false
        }
    }

    /// Generate, then build `config`. Nothing is built if generation fails.
    pub fn build(&mut self, config: &str) -> bool {
        if !self.generate() {
            warn!(%config, "skipping build: generation failed");
            return false;
        }

        info!(%config, "building solution");

        let Self {
            platform,
            toolset,
            solution_root,
            graph,
            backend,
            ..
        } = self;
        let ctx = BuildContext::new(*platform, *toolset, solution_root, graph);

        if backend.build(&ctx, config) {
            self.state = LifecycleState::Built;
            true
        } else {
            error!(%config, "build failed");
            false
        }
    }

    /// Remove build artifacts. Does not touch the dependency graph.
    pub fn clean(&mut self) -> bool {
        info!("cleaning solution");

        let Self {
            platform,
            toolset,
            solution_root,
            graph,
            backend,
            ..
        } = self;
        let ctx = BuildContext::new(*platform, *toolset, solution_root, graph);

        if backend.clean(&ctx) {
            self.state = LifecycleState::NotGenerated;
            true
        } else {
            error!("clean failed");
            false
        }
    }

    fn ensure_dependencies(&mut self) {
        let report = self.graph.execute();
        if report.was_skipped() {
            return;
        }

        if !report.is_clean() {
            warn!(
                problems = report.diagnostics().len(),
                "dependency traversal finished with problems; continuing"
            );
        }
        self.last_report = Some(report);
    }
}
