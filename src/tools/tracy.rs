// src/tools/tracy.rs

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::ConfigFile;
use crate::dag::{DependencyUnit, Environment, UnitName, UnitOutcome};
use crate::tools::{prerequisites_for, ToolKit};

const WINDOWS_URL: &str =
    "https://github.com/wolfpld/tracy/releases/download/v0.12.2/windows-0.12.2.zip";

/// The Tracy profiler GUI, vendored under `<vendor>/tracy`. Only published
/// for Windows.
#[derive(Debug)]
pub struct TracyUnit {
    kit: ToolKit,
    prerequisites: Vec<UnitName>,
    url: Option<String>,
}

impl TracyUnit {
    pub fn new(kit: ToolKit, cfg: &ConfigFile) -> Self {
        let url = cfg
            .tool("tracy")
            .and_then(|t| t.url.clone())
            .or_else(|| kit.host.is_windows().then(|| WINDOWS_URL.to_string()));

        Self {
            kit,
            prerequisites: prerequisites_for("tracy", cfg),
            url,
        }
    }

    pub fn install_dir(&self) -> PathBuf {
        self.kit.vendor_dir.join("tracy")
    }

    pub fn profiler_path(&self) -> PathBuf {
        self.install_dir().join("tracy-profiler.exe")
    }

    fn install(&self, url: &str) -> Result<()> {
        let install_dir = self.install_dir();
        self.kit.fs.create_dir_all(&install_dir)?;
        info!(%url, "downloading tracy");
        self.kit.fetcher.download_and_extract(url, &install_dir)
    }
}

impl DependencyUnit for TracyUnit {
    fn name(&self) -> &str {
        "tracy"
    }

    fn prerequisites(&self) -> &[UnitName] {
        &self.prerequisites
    }

    fn verify(&mut self, _env: &Environment) -> UnitOutcome {
        self.kit.fs.is_file(&self.profiler_path()).into()
    }

    fn provision(&mut self, _env: &Environment) -> UnitOutcome {
        let Some(url) = self.url.clone() else {
            warn!(system = %self.kit.host, "unsupported system for tracy auto-install");
            return UnitOutcome::failure();
        };

        match self.install(&url) {
            Ok(()) => UnitOutcome::success(),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "failed to install tracy");
                UnitOutcome::failure()
            }
        }
    }

    fn executable(&self) -> Option<PathBuf> {
        Some(self.profiler_path())
    }
}
