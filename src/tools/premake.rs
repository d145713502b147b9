// src/tools/premake.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::ConfigFile;
use crate::dag::{DependencyUnit, Environment, UnitName, UnitOutcome};
use crate::tools::{prerequisites_for, ToolKit};
use crate::types::HostOs;

const RELEASE: &str = "https://github.com/premake/premake-core/releases/download/v5.0.0-beta6";

/// Release archive for `host`, if premake publishes one.
pub fn default_download_url(host: HostOs) -> Option<String> {
    let asset = match host {
        HostOs::Windows => "premake-5.0.0-beta6-windows.zip",
        HostOs::Linux => "premake-5.0.0-beta6-linux.tar.gz",
        HostOs::MacOs => "premake-5.0.0-beta6-macosx.tar.gz",
        HostOs::Other => return None,
    };
    Some(format!("{RELEASE}/{asset}"))
}

/// The premake5 build-file generator, vendored under `<vendor>/premake`.
#[derive(Debug)]
pub struct PremakeUnit {
    kit: ToolKit,
    prerequisites: Vec<UnitName>,
    url: Option<String>,
}

impl PremakeUnit {
    pub fn new(kit: ToolKit, cfg: &ConfigFile) -> Self {
        let url = cfg
            .tool("premake")
            .and_then(|t| t.url.clone())
            .or_else(|| default_download_url(kit.host));

        Self {
            kit,
            prerequisites: prerequisites_for("premake", cfg),
            url,
        }
    }

    pub fn install_dir(&self) -> PathBuf {
        self.kit.vendor_dir.join("premake")
    }

    pub fn binary_path(&self) -> PathBuf {
        self.install_dir().join(self.kit.host.exe_name("premake5"))
    }

    fn install(&self, url: &str) -> Result<()> {
        let install_dir = self.install_dir();
        self.kit.fs.create_dir_all(&install_dir)?;

        info!(%url, "downloading premake5");
        self.kit
            .fetcher
            .download_and_extract(url, &install_dir)
            .context("installing premake5")?;

        if !self.kit.host.is_windows() {
            self.kit.fs.set_executable(&self.binary_path())?;
        }

        Ok(())
    }
}

impl DependencyUnit for PremakeUnit {
    fn name(&self) -> &str {
        "premake"
    }

    fn prerequisites(&self) -> &[UnitName] {
        &self.prerequisites
    }

    fn verify(&mut self, _env: &Environment) -> UnitOutcome {
        self.kit.fs.is_file(&self.binary_path()).into()
    }

    fn provision(&mut self, _env: &Environment) -> UnitOutcome {
        let Some(url) = self.url.clone() else {
            warn!(system = %self.kit.host, "unsupported system for premake auto-install");
            return UnitOutcome::failure();
        };

        match self.install(&url) {
            Ok(()) => UnitOutcome::success(),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "failed to install premake5");
                UnitOutcome::failure()
            }
        }
    }

    fn executable(&self) -> Option<PathBuf> {
        Some(self.binary_path())
    }
}
