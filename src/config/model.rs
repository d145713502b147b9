// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{BuildSystemKind, Platform, Toolset};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [solution]
/// root = "."
/// name = "Neptune"
///
/// [build]
/// platform = "emscripten"
/// toolset = "GNU"
///
/// [tools.premake]
/// url = "https://example.com/premake.tar.gz"
///
/// [tools.emsdk]
/// search_paths = ["/opt/emsdk"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub solution: SolutionSection,

    #[serde(default)]
    pub build: BuildSection,

    /// Per-tool overrides from `[tools.<name>]`.
    #[serde(default)]
    pub tools: BTreeMap<String, ToolConfig>,
}

/// A validated configuration file.
///
/// Can only be constructed via `TryFrom<RawConfigFile>`, which runs the
/// checks in `config::validate`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub solution: SolutionSection,
    pub build: BuildSection,
    pub tools: BTreeMap<String, ToolConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        solution: SolutionSection,
        build: BuildSection,
        tools: BTreeMap<String, ToolConfig>,
    ) -> Self {
        Self {
            solution,
            build,
            tools,
        }
    }

    /// Overrides for `name`, if any were configured.
    pub fn tool(&self, name: &str) -> Option<&ToolConfig> {
        self.tools.get(name)
    }

    /// Whether the tool `name` should be registered at all.
    pub fn tool_enabled(&self, name: &str) -> bool {
        self.tool(name).map(|t| t.enabled).unwrap_or(true)
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            SolutionSection::default(),
            BuildSection::default(),
            BTreeMap::new(),
        )
    }
}

/// `[solution]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SolutionSection {
    /// Solution root; relative paths are resolved against the directory of
    /// the config file.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Solution name, used to locate `<name>.sln` for Visual Studio builds.
    #[serde(default = "default_solution_name")]
    pub name: String,

    /// Directory (under `root`) where downloaded tools are unpacked.
    #[serde(default = "default_vendor_dir")]
    pub vendor_dir: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_solution_name() -> String {
    "Neptune".to_string()
}

fn default_vendor_dir() -> PathBuf {
    PathBuf::from("vendor")
}

impl Default for SolutionSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            name: default_solution_name(),
            vendor_dir: default_vendor_dir(),
        }
    }
}

/// `[build]` section. Every field can be overridden on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildSection {
    #[serde(default)]
    pub build_system: Option<BuildSystemKind>,

    #[serde(default)]
    pub platform: Option<Platform>,

    #[serde(default)]
    pub toolset: Option<Toolset>,
}

/// `[tools.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    /// Set to `false` to never register this tool.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Extra prerequisites, appended to the tool's built-in ones.
    #[serde(default)]
    pub after: Vec<String>,

    /// Download URL override (premake, tracy, git installer).
    #[serde(default)]
    pub url: Option<String>,

    /// Extra directories to search before the built-in search paths (emsdk).
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

fn default_enabled() -> bool {
    true
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            after: Vec::new(),
            url: None,
            search_paths: Vec::new(),
        }
    }
}
