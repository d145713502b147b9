#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use toolstrap::config::{BuildSection, ConfigFile, RawConfigFile, SolutionSection, ToolConfig};
use toolstrap::errors::ToolstrapError;
use toolstrap::fs::mock::MockFileSystem;
use toolstrap::tools::ToolKit;
use toolstrap::types::{HostOs, Platform, Toolset};

use crate::fake_fetcher::FakeFetcher;
use crate::recording_runner::RecordingRunner;

/// Solution root used by [`TestKit`].
pub const SOLUTION_ROOT: &str = "/work/solution";
/// Home directory used by [`TestKit`].
pub const HOME: &str = "/home/dev";

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                solution: SolutionSection::default(),
                build: BuildSection::default(),
                tools: BTreeMap::new(),
            },
        }
    }

    pub fn solution_name(mut self, name: &str) -> Self {
        self.config.solution.name = name.to_string();
        self
    }

    pub fn vendor_dir(mut self, dir: &str) -> Self {
        self.config.solution.vendor_dir = PathBuf::from(dir);
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.config.build.platform = Some(platform);
        self
    }

    pub fn toolset(mut self, toolset: Toolset) -> Self {
        self.config.build.toolset = Some(toolset);
        self
    }

    pub fn with_tool(mut self, name: &str, tool: ToolConfig) -> Self {
        self.config.tools.insert(name.to_string(), tool);
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile, ToolstrapError> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ToolConfig`.
pub struct ToolConfigBuilder {
    tool: ToolConfig,
}

impl ToolConfigBuilder {
    pub fn new() -> Self {
        Self {
            tool: ToolConfig {
                enabled: true,
                after: vec![],
                url: None,
                search_paths: vec![],
            },
        }
    }

    pub fn disabled(mut self) -> Self {
        self.tool.enabled = false;
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.tool.after.push(dep.to_string());
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.tool.url = Some(url.to_string());
        self
    }

    pub fn search_path(mut self, path: &str) -> Self {
        self.tool.search_paths.push(PathBuf::from(path));
        self
    }

    pub fn build(self) -> ToolConfig {
        self.tool
    }
}

impl Default for ToolConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`ToolKit`] wired to in-memory fakes, plus handles to those fakes.
pub struct TestKit {
    pub kit: ToolKit,
    pub fs: MockFileSystem,
    pub runner: RecordingRunner,
    pub fetcher: FakeFetcher,
}

impl TestKit {
    /// Kit pretending to run on `host`, rooted at [`SOLUTION_ROOT`] with the
    /// default vendor directory and [`HOME`] as home.
    pub fn new(host: HostOs) -> Self {
        Self::with_fetcher(host, |fs| FakeFetcher::new(fs))
    }

    /// Like [`TestKit::new`], with a customised fetcher.
    pub fn with_fetcher(host: HostOs, make: impl FnOnce(MockFileSystem) -> FakeFetcher) -> Self {
        let fs = MockFileSystem::new();
        let runner = RecordingRunner::new();
        let fetcher = make(fs.clone());
        let root = PathBuf::from(SOLUTION_ROOT);

        let kit = ToolKit {
            host,
            vendor_dir: root.join("vendor"),
            solution_root: root,
            home: Some(PathBuf::from(HOME)),
            fs: Arc::new(fs.clone()),
            runner: Arc::new(runner.clone()),
            fetcher: Arc::new(fetcher.clone()),
        };

        Self {
            kit,
            fs,
            runner,
            fetcher,
        }
    }

    pub fn without_home(mut self) -> Self {
        self.kit.home = None;
        self
    }
}
