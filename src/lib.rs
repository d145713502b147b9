// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod tools;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_or_default, resolve_solution_root, ConfigFile};
use crate::dag::{DependencyGraph, Environment, Plan};
use crate::engine::{BuildLifecycle, Orchestrator, PremakeBackend};
use crate::tools::{units_for, ToolKit};
use crate::types::{BuildSystemKind, Platform, Toolset};

/// Build settings after merging CLI flags over the config file over the
/// built-in defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub build_system: BuildSystemKind,
    pub platform: Platform,
    pub toolset: Toolset,
}

impl Selection {
    pub fn resolve(args: &CliArgs, cfg: &ConfigFile) -> Self {
        Self {
            build_system: args
                .build_system
                .or(cfg.build.build_system)
                .unwrap_or_default(),
            platform: args.platform.or(cfg.build.platform).unwrap_or_default(),
            toolset: args.toolset.or(cfg.build.toolset).unwrap_or_default(),
        }
    }
}

/// Dependency graph seeded with every unit `selection` needs.
pub fn build_graph(
    selection: Selection,
    cfg: &ConfigFile,
    kit: &ToolKit,
    env: Environment,
) -> DependencyGraph {
    let mut graph = DependencyGraph::with_environment(env);
    for unit in units_for(selection.platform, selection.toolset, cfg, kit) {
        graph.add_node(unit);
    }
    graph
}

/// Lifecycle for `selection`, wired to the backend its build system names.
pub fn build_lifecycle(
    selection: Selection,
    cfg: &ConfigFile,
    kit: &ToolKit,
    env: Environment,
) -> BuildLifecycle {
    let graph = build_graph(selection, cfg, kit, env);
    let backend = match selection.build_system {
        BuildSystemKind::Premake => {
            PremakeBackend::new(Arc::clone(&kit.runner), cfg.solution.name.clone())
        }
    };

    BuildLifecycle::new(
        selection.platform,
        selection.toolset,
        kit.solution_root.clone(),
        graph,
        Box::new(backend),
    )
}

/// High-level entry point used by `main.rs`.
///
/// Returns whether the requested behaviour succeeded. Errors are reserved
/// for problems before anything runs: unreadable or invalid config, or no
/// behaviour given.
pub fn run(args: CliArgs) -> Result<bool> {
    let config_path = args
        .config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let cfg = load_or_default(&config_path)?;

    let solution_root = solution_root(&args, &config_path, &cfg);
    let selection = Selection::resolve(&args, &cfg);
    info!(
        build_system = ?selection.build_system,
        platform = %selection.platform,
        toolset = %selection.toolset,
        root = %solution_root.display(),
        "resolved build selection"
    );

    let kit = ToolKit::system(solution_root, &cfg);

    if args.dry_run {
        let graph = build_graph(selection, &cfg, &kit, Environment::from_process());
        print_dry_run(selection, &kit, &graph);
        return Ok(true);
    }

    let Some(behaviour) = args.behave else {
        bail!("no behaviour given; pass --behave <generate|build-debug|build-release|clean>");
    };

    let lifecycle = build_lifecycle(selection, &cfg, &kit, Environment::from_process());
    let mut orchestrator = Orchestrator::new();
    orchestrator.initialize(lifecycle);

    Ok(orchestrator.perform(behaviour))
}

fn solution_root(args: &CliArgs, config_path: &Path, cfg: &ConfigFile) -> PathBuf {
    match &args.root {
        Some(root) => PathBuf::from(root),
        None => resolve_solution_root(config_path, cfg),
    }
}

/// Print the selection and the dependency plan without running anything.
fn print_dry_run(selection: Selection, kit: &ToolKit, graph: &DependencyGraph) {
    println!("toolstrap dry-run");
    println!("  build_system = {:?}", selection.build_system);
    println!("  platform = {}", selection.platform);
    println!("  toolset = {}", selection.toolset);
    println!("  solution_root = {}", kit.solution_root.display());
    println!("  vendor_dir = {}", kit.vendor_dir.display());
    println!();
    print!("{}", Plan::from_graph(graph));

    debug!("dry-run complete (no execution)");
}
