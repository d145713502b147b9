use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

/// Target platform the solution is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    Macos,
    Emscripten,
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Emscripten
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Macos => "macos",
            Platform::Emscripten => "emscripten",
        };
        f.write_str(s)
    }
}

/// Compiler toolset / project file flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
pub enum Toolset {
    /// GNU makefiles (POSIX, MinGW, Cygwin).
    #[serde(rename = "GNU", alias = "gnu")]
    #[value(name = "GNU", alias = "gnu")]
    Gnu,
    /// Visual Studio solution and project files.
    #[serde(rename = "vs")]
    #[value(name = "vs")]
    VisualStudio,
}

impl Default for Toolset {
    fn default() -> Self {
        Toolset::Gnu
    }
}

impl fmt::Display for Toolset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Toolset::Gnu => f.write_str("GNU"),
            Toolset::VisualStudio => f.write_str("vs"),
        }
    }
}

/// Which build-file generator drives the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystemKind {
    Premake,
}

impl Default for BuildSystemKind {
    fn default() -> Self {
        BuildSystemKind::Premake
    }
}

/// What a single invocation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Behaviour {
    /// Generate solution files.
    Generate,
    /// Generate, then build in debug.
    BuildDebug,
    /// Generate, then build in release.
    BuildRelease,
    /// Clean solution build files.
    Clean,
}

/// Operating system this process runs on (as opposed to the target platform).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => HostOs::Windows,
            "linux" => HostOs::Linux,
            "macos" => HostOs::MacOs,
            _ => HostOs::Other,
        }
    }

    pub fn is_windows(self) -> bool {
        self == HostOs::Windows
    }

    /// File name of an executable on this host.
    pub fn exe_name(self, stem: &str) -> String {
        if self.is_windows() {
            format!("{stem}.exe")
        } else {
            stem.to_string()
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HostOs::Windows => "windows",
            HostOs::Linux => "linux",
            HostOs::MacOs => "darwin",
            HostOs::Other => std::env::consts::OS,
        };
        f.write_str(s)
    }
}
