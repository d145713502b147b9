// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, ToolstrapError};
use crate::tools::{builtin_prerequisites, KNOWN_TOOLS};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ToolstrapError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.solution, raw.build, raw.tools))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_solution(cfg)?;
    validate_tool_names(cfg)?;
    validate_tool_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn validate_solution(cfg: &RawConfigFile) -> Result<()> {
    if cfg.solution.name.trim().is_empty() {
        return Err(ToolstrapError::ConfigError(
            "[solution].name must not be empty".to_string(),
        ));
    }

    if cfg.solution.vendor_dir.as_os_str().is_empty() {
        return Err(ToolstrapError::ConfigError(
            "[solution].vendor_dir must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_tool_names(cfg: &RawConfigFile) -> Result<()> {
    for name in cfg.tools.keys() {
        if !KNOWN_TOOLS.contains(&name.as_str()) {
            return Err(ToolstrapError::UnknownTool(format!(
                "[tools.{name}] (known tools: {})",
                KNOWN_TOOLS.join(", ")
            )));
        }
    }
    Ok(())
}

fn validate_tool_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, tool) in cfg.tools.iter() {
        for dep in tool.after.iter() {
            if dep == name {
                return Err(ToolstrapError::ConfigError(format!(
                    "tool '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !KNOWN_TOOLS.contains(&dep.as_str()) {
                return Err(ToolstrapError::ConfigError(format!(
                    "tool '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: prerequisite -> tool, built-in edges plus overrides.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for &name in KNOWN_TOOLS {
        graph.add_node(name);
        for &dep in builtin_prerequisites(name) {
            graph.add_edge(dep, name, ());
        }
    }

    for (name, tool) in cfg.tools.iter() {
        for dep in tool.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(ToolstrapError::DagCycle(format!(
                "cycle detected in tool dependencies involving '{}'",
                node
            )))
        }
    }
}
