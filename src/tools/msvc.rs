// src/tools/msvc.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::dag::{DependencyUnit, Environment, UnitName, UnitOutcome};
use crate::exec::CommandSpec;
use crate::tools::{prerequisites_for, ToolKit};

const REQUIRED_TOOLS: &[&str] = &["cl.exe", "link.exe", "lib.exe", "nmake.exe"];
const MSBUILD: &str = "MSBuild.exe";
const VC_COMPONENT: &str = "Microsoft.VisualStudio.Component.VC.Tools.x86.x64";

/// A directory to search for `MSBuild.exe`. When `suffix` is set, every child
/// of `base` is tried with `suffix` appended (one wildcard level).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsbuildCandidate {
    pub base: PathBuf,
    pub suffix: Option<PathBuf>,
}

impl MsbuildCandidate {
    fn exact(dir: PathBuf) -> Self {
        Self {
            base: dir,
            suffix: None,
        }
    }

    fn wildcard(base: PathBuf, suffix: &[&str]) -> Self {
        Self {
            base,
            suffix: Some(suffix.iter().collect()),
        }
    }
}

/// Well-known MSBuild install locations, followed by every PATH entry.
pub fn msbuild_candidates(env: &Environment) -> Vec<MsbuildCandidate> {
    let program_files = PathBuf::from(
        env.get_ignore_case("ProgramFiles(x86)")
            .unwrap_or(r"C:\Program Files (x86)"),
    );
    let windir = PathBuf::from(env.get_ignore_case("WINDIR").unwrap_or(r"C:\Windows"));
    let vs = program_files.join("Microsoft Visual Studio");

    let mut candidates = vec![
        MsbuildCandidate::wildcard(vs.join("2022"), &["MSBuild", "Current", "Bin"]),
        MsbuildCandidate::wildcard(vs.join("2019"), &["MSBuild", "Current", "Bin"]),
        MsbuildCandidate::wildcard(vs.join("2017"), &["MSBuild", "15.0", "Bin"]),
        MsbuildCandidate::wildcard(program_files.join("MSBuild"), &["Bin"]),
        MsbuildCandidate::exact(windir.join(r"Microsoft.NET\Framework64\v4.0.30319")),
        MsbuildCandidate::exact(windir.join(r"Microsoft.NET\Framework\v4.0.30319")),
    ];
    candidates.extend(env.search_path().into_iter().map(MsbuildCandidate::exact));
    candidates
}

/// Microsoft Visual C++ tools and MSBuild. Windows only; never installed
/// automatically.
#[derive(Debug)]
pub struct MsvcUnit {
    kit: ToolKit,
    prerequisites: Vec<UnitName>,
    vs_install_path: Option<PathBuf>,
    vc_tools_path: Option<PathBuf>,
    msbuild_path: Option<PathBuf>,
}

impl MsvcUnit {
    pub fn new(kit: ToolKit, cfg: &ConfigFile) -> Self {
        Self {
            kit,
            prerequisites: prerequisites_for("msvc", cfg),
            vs_install_path: None,
            vc_tools_path: None,
            msbuild_path: None,
        }
    }

    /// MSBuild discovered by the last successful verification.
    pub fn msbuild_path(&self) -> Option<&Path> {
        self.msbuild_path.as_deref()
    }

    fn vswhere_path(env: &Environment) -> PathBuf {
        PathBuf::from(env.get_ignore_case("ProgramFiles(x86)").unwrap_or(r"C:\Program Files (x86)"))
            .join(r"Microsoft Visual Studio\Installer\vswhere.exe")
    }

    /// Run vswhere with `args`; first non-empty stdout line, if any.
    fn vswhere(&self, env: &Environment, args: &[&str]) -> Result<Option<String>> {
        let vswhere = Self::vswhere_path(env);
        if !self.kit.fs.is_file(&vswhere) {
            return Ok(None);
        }

        let cmd = CommandSpec::new(vswhere)
            .args(["-latest", "-products", "*"])
            .args(args.iter().copied())
            .capture_output();
        let out = self.kit.runner.run(&cmd).context("running vswhere")?;

        Ok(out
            .stdout
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string))
    }

    fn find_visual_studio(&mut self, env: &Environment) {
        let install = self.vswhere(
            env,
            &["-requires", VC_COMPONENT, "-property", "installationPath"],
        );
        match install {
            Ok(Some(path)) => self.vs_install_path = Some(PathBuf::from(path)),
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "error finding Visual Studio with vswhere");
                return;
            }
        }

        match self.vswhere(
            env,
            &[
                "-requires",
                VC_COMPONENT,
                "-find",
                "VC/Tools/MSVC/**/bin/Hostx64/x64/cl.exe",
            ],
        ) {
            Ok(Some(cl)) => {
                self.vc_tools_path = Path::new(&cl).parent().map(Path::to_path_buf);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "error finding VC tools with vswhere"),
        }
    }

    fn check_msvc_tools(&self) -> bool {
        let Some(dir) = &self.vc_tools_path else {
            info!("Visual Studio C++ tools path not found");
            return false;
        };

        let missing: Vec<&str> = REQUIRED_TOOLS
            .iter()
            .copied()
            .filter(|tool| !self.kit.fs.is_file(&dir.join(tool)))
            .collect();

        for tool in &missing {
            info!(%tool, "MSVC tool not found");
        }
        missing.is_empty()
    }

    fn find_msbuild(&self, env: &Environment) -> Option<PathBuf> {
        for candidate in msbuild_candidates(env) {
            let dirs = match &candidate.suffix {
                None => vec![candidate.base.clone()],
                Some(suffix) => self
                    .kit
                    .fs
                    .read_dir(&candidate.base)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|child| child.join(suffix))
                    .collect(),
            };

            if let Some(hit) = dirs
                .into_iter()
                .map(|dir| dir.join(MSBUILD))
                .find(|p| self.kit.fs.is_file(p))
            {
                return Some(hit);
            }
        }

        if self.vs_install_path.is_none() {
            return None;
        }

        match self.vswhere(
            env,
            &[
                "-requires",
                "Microsoft.Component.MSBuild",
                "-find",
                r"MSBuild\**\Bin\MSBuild.exe",
            ],
        ) {
            Ok(found) => found.map(PathBuf::from),
            Err(e) => {
                warn!(error = %e, "error finding MSBuild with vswhere");
                None
            }
        }
    }

    fn check_msbuild(&mut self, env: &Environment) -> bool {
        self.msbuild_path = self.find_msbuild(env);
        let Some(msbuild) = self.msbuild_path.clone() else {
            info!("MSBuild not found");
            return false;
        };

        let cmd = CommandSpec::new(&msbuild).arg("/version").capture_output();
        match self.kit.runner.run(&cmd) {
            Ok(out) if out.success => {
                info!(version = %out.stdout.trim(), path = %msbuild.display(), "found MSBuild");
                true
            }
            Ok(_) => {
                warn!("MSBuild found but not working correctly");
                false
            }
            Err(e) => {
                warn!(error = %e, "error checking MSBuild");
                false
            }
        }
    }
}

impl DependencyUnit for MsvcUnit {
    fn name(&self) -> &str {
        "msvc"
    }

    fn prerequisites(&self) -> &[UnitName] {
        &self.prerequisites
    }

    fn verify(&mut self, env: &Environment) -> UnitOutcome {
        if !self.kit.host.is_windows() {
            info!("MSVC tools are only available on Windows");
            return UnitOutcome::failure();
        }

        self.find_visual_studio(env);
        debug!(vs = ?self.vs_install_path, vc_tools = ?self.vc_tools_path, "visual studio lookup");

        let tools_ok = self.check_msvc_tools();
        let msbuild_ok = self.check_msbuild(env);
        (tools_ok && msbuild_ok).into()
    }

    fn provision(&mut self, _env: &Environment) -> UnitOutcome {
        warn!("please install Microsoft Visual Studio with the required components:");
        for line in [
            "1. Download Visual Studio Installer from https://visualstudio.microsoft.com/",
            "2. Select the 'Desktop development with C++' workload (MSVC tools)",
            "   and '.NET desktop build tools' (MSBuild)",
            "3. Re-run from a Developer Command Prompt, or run 'vcvarsall.bat' first",
        ] {
            warn!("{line}");
        }
        UnitOutcome::failure()
    }

    fn executable(&self) -> Option<PathBuf> {
        self.msbuild_path.clone()
    }
}
