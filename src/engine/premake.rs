// src/engine/premake.rs

//! Premake-driven backend: `premake5` generates GNU makefiles or a Visual
//! Studio solution, then `make` or MSBuild does the rest.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::engine::lifecycle::{BuildBackend, BuildContext};
use crate::exec::{CommandRunner, CommandSpec};
use crate::types::{Platform, Toolset};

/// `--os=` value premake expects for `platform`. macOS targets are not
/// supported.
pub fn premake_os(platform: Platform) -> Option<&'static str> {
    match platform {
        Platform::Emscripten => Some("emscripten"),
        Platform::Windows => Some("windows"),
        Platform::Linux => Some("linux"),
        Platform::Macos => None,
    }
}

/// Premake action generating files for `toolset`.
pub fn premake_action(toolset: Toolset) -> &'static str {
    match toolset {
        Toolset::Gnu => "gmake",
        Toolset::VisualStudio => "vs2022",
    }
}

/// MSBuild `Configuration` property for a lowercase config name.
fn msbuild_configuration(config: &str) -> String {
    let mut chars = config.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
pub struct PremakeBackend {
    runner: Arc<dyn CommandRunner>,
    solution_name: String,
}

impl PremakeBackend {
    pub fn new(runner: Arc<dyn CommandRunner>, solution_name: impl Into<String>) -> Self {
        Self {
            runner,
            solution_name: solution_name.into(),
        }
    }

    fn run(&self, cmd: CommandSpec) -> bool {
        match self.runner.run(&cmd) {
            Ok(out) if out.success => true,
            Ok(out) => {
                error!(cmd = %cmd, exit_code = ?out.code, "command failed");
                false
            }
            Err(e) => {
                error!(cmd = %cmd, error = %format!("{e:#}"), "could not run command");
                false
            }
        }
    }

    fn make(&self, ctx: &BuildContext<'_>) -> PathBuf {
        ctx.env()
            .which("make")
            .unwrap_or_else(|| PathBuf::from("make"))
    }

    fn solution_file(&self, ctx: &BuildContext<'_>) -> PathBuf {
        ctx.solution_root.join(format!("{}.sln", self.solution_name))
    }

    fn msbuild(&self, ctx: &BuildContext<'_>, extra: &[String]) -> bool {
        let Some(msbuild) = ctx.executable("msvc") else {
            error!("MSBuild not available; is the msvc dependency installed?");
            return false;
        };

        let cmd = CommandSpec::new(msbuild)
            .arg(self.solution_file(ctx).to_string_lossy())
            .args(extra.iter().cloned())
            .current_dir(ctx.solution_root)
            .with_environment(ctx.env());
        self.run(cmd)
    }
}

impl BuildBackend for PremakeBackend {
    fn name(&self) -> &str {
        "premake"
    }

    fn generate(&mut self, ctx: &BuildContext<'_>) -> bool {
        let Some(os) = premake_os(ctx.platform) else {
            error!(platform = %ctx.platform, "platform not supported by premake backend");
            return false;
        };

        let Some(premake) = ctx.executable("premake") else {
            error!("premake5 not registered");
            return false;
        };

        let kind = if ctx.platform == Platform::Emscripten {
            "Emscripten"
        } else {
            "Native"
        };
        info!(%kind, root = %ctx.solution_root.display(), "generating solution");

        let cmd = CommandSpec::new(premake)
            .arg(format!("--os={os}"))
            .arg(premake_action(ctx.toolset))
            .current_dir(ctx.solution_root)
            .with_environment(ctx.env());

        let ok = self.run(cmd);
        if ok {
            info!("solution generated successfully");
        } else {
            error!("premake5 failed");
        }
        ok
    }

    fn build(&mut self, ctx: &BuildContext<'_>, config: &str) -> bool {
        info!(%config, "building configuration");

        let ok = match ctx.toolset {
            Toolset::Gnu => {
                let cmd = CommandSpec::new(self.make(ctx))
                    .arg(format!("config={config}"))
                    .current_dir(ctx.solution_root)
                    .with_environment(ctx.env());
                self.run(cmd)
            }
            Toolset::VisualStudio => self.msbuild(
                ctx,
                &[format!("/p:Configuration={}", msbuild_configuration(config))],
            ),
        };

        if ok {
            info!(%config, "build completed successfully");
        } else {
            warn!(%config, "build failed");
        }
        ok
    }

    fn clean(&mut self, ctx: &BuildContext<'_>) -> bool {
        let ok = match ctx.toolset {
            Toolset::Gnu => {
                let cmd = CommandSpec::new(self.make(ctx))
                    .arg("clean")
                    .current_dir(ctx.solution_root)
                    .with_environment(ctx.env());
                self.run(cmd)
            }
            Toolset::VisualStudio => self.msbuild(ctx, &["/t:Clean".to_string()]),
        };

        if ok {
            info!("clean successful");
        }
        ok
    }
}
