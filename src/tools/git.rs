// src/tools/git.rs

use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use tracing::{info, warn};

use crate::config::ConfigFile;
use crate::dag::{DependencyUnit, EnvDelta, Environment, UnitName, UnitOutcome};
use crate::exec::CommandSpec;
use crate::tools::{prerequisites_for, ToolKit};
use crate::types::HostOs;

const WINDOWS_INSTALLER_URL: &str = "https://github.com/git-for-windows/git/releases/download/v2.43.0.windows.1/Git-2.43.0-64-bit.exe";

/// Default install location of Git for Windows' command shims.
const WINDOWS_GIT_CMD_DIR: &str = r"C:\Program Files\Git\cmd";

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").expect("valid regex"));

/// Extract the version number from `git --version` output.
pub fn parse_git_version(output: &str) -> Option<String> {
    VERSION_RE
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// The git command-line client.
#[derive(Debug)]
pub struct GitUnit {
    kit: ToolKit,
    prerequisites: Vec<UnitName>,
    installer_url: String,
}

impl GitUnit {
    pub fn new(kit: ToolKit, cfg: &ConfigFile) -> Self {
        let installer_url = cfg
            .tool("git")
            .and_then(|t| t.url.clone())
            .unwrap_or_else(|| WINDOWS_INSTALLER_URL.to_string());

        Self {
            kit,
            prerequisites: prerequisites_for("git", cfg),
            installer_url,
        }
    }

    fn executable_name(&self) -> String {
        self.kit.host.exe_name("git")
    }

    fn check(&self, env: &Environment) -> bool {
        let Some(git) = env.which(&self.executable_name()) else {
            info!("git not found in PATH");
            return false;
        };

        let cmd = CommandSpec::new(git)
            .arg("--version")
            .with_environment(env)
            .capture_output();

        match self.kit.runner.run(&cmd) {
            Ok(out) if out.success => {
                match parse_git_version(&out.stdout) {
                    Some(version) => info!(%version, "found git"),
                    None => info!(output = %out.stdout.trim(), "found git"),
                }
                true
            }
            Ok(_) => {
                warn!("git found but not working correctly");
                false
            }
            Err(e) => {
                warn!(error = %e, "error checking git");
                false
            }
        }
    }

    fn install_windows(&self, env: &Environment) -> Result<UnitOutcome> {
        let installer = std::env::temp_dir().join("Git-Installer.exe");
        self.kit.fetcher.download(&self.installer_url, &installer)?;

        info!("running git installer (this may take a few minutes)");
        let cmd = CommandSpec::new(&installer)
            .args([
                "/VERYSILENT",
                "/NORESTART",
                "/NOCANCEL",
                "/SP-",
                "/CLOSEAPPLICATIONS",
                "/RESTARTAPPLICATIONS",
            ])
            .capture_output();
        let out = self.kit.runner.run(&cmd);

        if let Err(e) = self.kit.fs.remove_file(&installer) {
            warn!(error = %e, "could not remove git installer");
        }

        if !out?.success {
            warn!("git installation failed");
            return Ok(UnitOutcome::failure());
        }

        let delta = EnvDelta::new().prepend_path(PathBuf::from(WINDOWS_GIT_CMD_DIR));
        let mut after = env.clone();
        after.apply(&delta);

        Ok(UnitOutcome::from_bool(self.check(&after)).with_env(delta))
    }

    fn install_macos(&self, env: &Environment) -> Result<bool> {
        let xcode = CommandSpec::new("xcode-select")
            .arg("--install")
            .capture_output();
        if self.kit.runner.run(&xcode)?.success {
            return Ok(true);
        }

        if let Some(brew) = env.which("brew") {
            let cmd = CommandSpec::new(brew)
                .args(["install", "git"])
                .with_environment(env)
                .capture_output();
            return Ok(self.kit.runner.run(&cmd)?.success);
        }

        Ok(false)
    }

    fn install_linux(&self, env: &Environment) -> Result<bool> {
        let managers: [(&str, &[&str]); 4] = [
            ("apt-get", &["apt-get", "install", "-y", "git"]),
            ("dnf", &["dnf", "install", "-y", "git"]),
            ("yum", &["yum", "install", "-y", "git"]),
            ("pacman", &["pacman", "-S", "--noconfirm", "git"]),
        ];

        for (manager, args) in managers {
            if env.which(manager).is_some() {
                info!(%manager, "installing git with system package manager");
                let cmd = CommandSpec::new("sudo")
                    .args(args.iter().copied())
                    .with_environment(env)
                    .capture_output();
                return Ok(self.kit.runner.run(&cmd)?.success);
            }
        }

        warn!("no supported package manager found (apt-get, dnf, yum, pacman)");
        Ok(false)
    }
}

impl DependencyUnit for GitUnit {
    fn name(&self) -> &str {
        "git"
    }

    fn prerequisites(&self) -> &[UnitName] {
        &self.prerequisites
    }

    fn verify(&mut self, env: &Environment) -> UnitOutcome {
        self.check(env).into()
    }

    fn provision(&mut self, env: &Environment) -> UnitOutcome {
        info!(system = %self.kit.host, "attempting to install git");

        let result = match self.kit.host {
            HostOs::Windows => self.install_windows(env),
            HostOs::MacOs => self.install_macos(env).map(UnitOutcome::from_bool),
            HostOs::Linux => self.install_linux(env).map(UnitOutcome::from_bool),
            HostOs::Other => {
                warn!(system = %self.kit.host, "unsupported system for git auto-install");
                Ok(UnitOutcome::failure())
            }
        };

        result.unwrap_or_else(|e| {
            warn!(error = %e, "failed to install git");
            UnitOutcome::failure()
        })
    }
}
