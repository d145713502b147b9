// src/tools/emsdk.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::dag::{DependencyUnit, EnvDelta, Environment, UnitName, UnitOutcome};
use crate::exec::CommandSpec;
use crate::tools::{prerequisites_for, ToolKit};

const EMSDK_REPO: &str = "https://github.com/emscripten-core/emsdk.git";

/// Candidate emsdk checkouts, in search order: configured paths first, then
/// the usual spots under the home directory, then system-wide locations.
pub fn search_paths(home: Option<&Path>, configured: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = configured.to_vec();

    if let Some(home) = home {
        paths.extend([
            home.join("emsdk"),
            home.join(".emsdk"),
            home.join("dev").join("emsdk"),
            home.join("Documents").join("emsdk"),
            home.join("workspace").join("emsdk"),
        ]);
    }

    paths.extend(
        ["/usr/local/emsdk", "/opt/emsdk", r"C:\emsdk", r"D:\emsdk"]
            .into_iter()
            .map(PathBuf::from),
    );

    paths
}

/// Env changes that make an emsdk checkout at `root` usable.
fn activation(root: &Path) -> EnvDelta {
    EnvDelta::new()
        .prepend_path(root.join("upstream").join("emscripten"))
        .set("EMSDK", root.to_string_lossy())
}

/// The Emscripten SDK.
#[derive(Debug)]
pub struct EmsdkUnit {
    kit: ToolKit,
    prerequisites: Vec<UnitName>,
    search_paths: Vec<PathBuf>,
}

impl EmsdkUnit {
    pub fn new(kit: ToolKit, cfg: &ConfigFile) -> Self {
        let configured = cfg
            .tool("emsdk")
            .map(|t| t.search_paths.clone())
            .unwrap_or_default();
        let search_paths = search_paths(kit.home.as_deref(), &configured);

        Self {
            kit,
            prerequisites: prerequisites_for("emsdk", cfg),
            search_paths,
        }
    }

    fn install(&self, env: &Environment) -> Result<EnvDelta> {
        let home = self
            .kit
            .home
            .as_ref()
            .context("cannot determine home directory for emsdk install")?;
        let install_dir = home.join("emsdk");

        info!(dir = %install_dir.display(), "installing Emscripten SDK");
        self.kit.fs.create_dir_all(&install_dir)?;

        let git = env.which(&self.kit.host.exe_name("git")).unwrap_or_else(|| PathBuf::from("git"));
        let clone = CommandSpec::new(git)
            .arg("clone")
            .arg(EMSDK_REPO)
            .arg(install_dir.to_string_lossy())
            .with_environment(env);
        self.kit.runner.run_checked(&clone)?;

        let script = if self.kit.host.is_windows() {
            install_dir.join("emsdk.bat")
        } else {
            install_dir.join("emsdk")
        };

        for action in ["install", "activate"] {
            let cmd = CommandSpec::new(&script)
                .args([action, "latest"])
                .current_dir(&install_dir)
                .with_environment(env);
            self.kit.runner.run_checked(&cmd)?;
        }

        Ok(activation(&install_dir))
    }
}

impl DependencyUnit for EmsdkUnit {
    fn name(&self) -> &str {
        "emsdk"
    }

    fn prerequisites(&self) -> &[UnitName] {
        &self.prerequisites
    }

    fn verify(&mut self, env: &Environment) -> UnitOutcome {
        if let Some(root) = env.get("EMSDK") {
            debug!(%root, "EMSDK already set");
            return UnitOutcome::success();
        }

        for root in &self.search_paths {
            if self.kit.fs.exists(&root.join("upstream").join("emscripten")) {
                info!(root = %root.display(), "found emsdk");
                return UnitOutcome::success().with_env(activation(root));
            }
        }

        UnitOutcome::failure()
    }

    fn provision(&mut self, env: &Environment) -> UnitOutcome {
        match self.install(env) {
            Ok(delta) => UnitOutcome::success().with_env(delta),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "failed to install emsdk");
                UnitOutcome::failure()
            }
        }
    }
}
