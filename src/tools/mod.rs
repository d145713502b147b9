// src/tools/mod.rs

//! Concrete tool integrations and the registry that picks them.
//!
//! Every tool implements [`DependencyUnit`]. None of them touch the process
//! environment directly: discovered locations are reported back as env
//! deltas and applied by the graph.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigFile;
use crate::dag::{DependencyUnit, UnitName};
use crate::exec::{CommandRunner, Fetcher, HttpFetcher, SystemRunner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::{HostOs, Platform, Toolset};

pub mod emsdk;
pub mod gccmake;
pub mod git;
pub mod msvc;
pub mod premake;
pub mod tracy;

pub use emsdk::EmsdkUnit;
pub use gccmake::GccMakeUnit;
pub use git::GitUnit;
pub use msvc::MsvcUnit;
pub use premake::PremakeUnit;
pub use tracy::TracyUnit;

/// Every tool name that may appear under `[tools.<name>]`.
pub const KNOWN_TOOLS: &[&str] = &["git", "premake", "emsdk", "gccmake", "msvc", "tracy"];

/// Prerequisites a tool always declares, before config overrides.
pub fn builtin_prerequisites(name: &str) -> &'static [&'static str] {
    match name {
        "emsdk" | "gccmake" | "msvc" | "tracy" => &["git"],
        _ => &[],
    }
}

/// Built-in prerequisites of `name` followed by any `after` overrides.
pub fn prerequisites_for(name: &str, cfg: &ConfigFile) -> Vec<UnitName> {
    let mut deps: Vec<UnitName> = builtin_prerequisites(name)
        .iter()
        .map(|s| s.to_string())
        .collect();

    if let Some(tool) = cfg.tool(name) {
        for dep in &tool.after {
            if !deps.contains(dep) {
                deps.push(dep.clone());
            }
        }
    }

    deps
}

/// Shared handles every tool integration needs.
#[derive(Debug, Clone)]
pub struct ToolKit {
    pub host: HostOs,
    pub solution_root: PathBuf,
    /// Absolute vendor directory (`<root>/<vendor_dir>`).
    pub vendor_dir: PathBuf,
    pub home: Option<PathBuf>,
    pub fs: Arc<dyn FileSystem>,
    pub runner: Arc<dyn CommandRunner>,
    pub fetcher: Arc<dyn Fetcher>,
}

impl ToolKit {
    /// Toolkit backed by the real filesystem, processes and network.
    pub fn system(solution_root: PathBuf, cfg: &ConfigFile) -> Self {
        let vendor_dir = solution_root.join(&cfg.solution.vendor_dir);
        Self {
            host: HostOs::current(),
            solution_root,
            vendor_dir,
            home: dirs::home_dir(),
            fs: Arc::new(RealFileSystem),
            runner: Arc::new(SystemRunner),
            fetcher: Arc::new(HttpFetcher::new()),
        }
    }
}

/// Units relevant to a platform/toolset combination, in registration order.
///
/// `git` and `premake` are always present; `emsdk` only for emscripten,
/// `tracy` only for windows targets, and either `gccmake` (GNU) or `msvc`
/// (vs, Windows hosts only). Tools disabled in the config are left out.
pub fn units_for(
    platform: Platform,
    toolset: Toolset,
    cfg: &ConfigFile,
    kit: &ToolKit,
) -> Vec<Box<dyn DependencyUnit>> {
    let mut units: Vec<Box<dyn DependencyUnit>> = vec![
        Box::new(GitUnit::new(kit.clone(), cfg)),
        Box::new(PremakeUnit::new(kit.clone(), cfg)),
    ];

    if platform == Platform::Emscripten {
        units.push(Box::new(EmsdkUnit::new(kit.clone(), cfg)));
    }

    if platform == Platform::Windows {
        units.push(Box::new(TracyUnit::new(kit.clone(), cfg)));
    }

    match toolset {
        Toolset::Gnu => units.push(Box::new(GccMakeUnit::new(kit.clone(), cfg))),
        Toolset::VisualStudio if kit.host.is_windows() => {
            units.push(Box::new(MsvcUnit::new(kit.clone(), cfg)));
        }
        Toolset::VisualStudio => {
            debug!("vs toolset on a non-Windows host; msvc not registered");
        }
    }

    units.retain(|unit| {
        let enabled = cfg.tool_enabled(unit.name());
        if !enabled {
            debug!(tool = %unit.name(), "tool disabled in config; not registering");
        }
        enabled
    });

    units
}
