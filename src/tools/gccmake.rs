// src/tools/gccmake.rs

use tracing::{info, warn};

use crate::config::ConfigFile;
use crate::dag::{DependencyUnit, Environment, UnitName, UnitOutcome};
use crate::tools::{prerequisites_for, ToolKit};
use crate::types::HostOs;

/// GCC + make. Cannot be installed automatically; provisioning prints
/// instructions and reports failure.
#[derive(Debug)]
pub struct GccMakeUnit {
    kit: ToolKit,
    prerequisites: Vec<UnitName>,
}

impl GccMakeUnit {
    pub fn new(kit: ToolKit, cfg: &ConfigFile) -> Self {
        Self {
            kit,
            prerequisites: prerequisites_for("gccmake", cfg),
        }
    }

    /// Manual install steps for `host`.
    pub fn instructions(host: HostOs) -> &'static [&'static str] {
        match host {
            HostOs::Windows => &[
                "1. Install MinGW-w64 from https://mingw-w64.org/doku.php",
                "   or use Chocolatey: 'choco install mingw'",
                "2. Add MinGW's bin directory to your PATH environment variable",
                "3. Make sure 'gcc.exe' and 'mingw32-make.exe' are available",
            ],
            HostOs::Linux => &["Run: sudo apt-get install build-essential"],
            HostOs::MacOs => &["Install Xcode command line tools: xcode-select --install"],
            HostOs::Other => &["Install GCC and make with your system package manager"],
        }
    }
}

impl DependencyUnit for GccMakeUnit {
    fn name(&self) -> &str {
        "gccmake"
    }

    fn prerequisites(&self) -> &[UnitName] {
        &self.prerequisites
    }

    fn verify(&mut self, env: &Environment) -> UnitOutcome {
        let found = env.which("make").is_some();
        if !found {
            info!("make not found in PATH");
        }
        found.into()
    }

    fn provision(&mut self, _env: &Environment) -> UnitOutcome {
        warn!("please install GCC and make manually");
        for line in Self::instructions(self.kit.host) {
            warn!("{line}");
        }
        UnitOutcome::failure()
    }
}
