// src/dag/env.rs

//! Explicit process-environment context.
//!
//! Tool integrations never write `std::env` directly. Instead, `verify` and
//! `provision` return an [`EnvDelta`] describing the variables they want set
//! and the directories they want on `PATH`. The graph applies those deltas to
//! its [`Environment`], which is then handed to every later unit and finally
//! to the backend when it spawns the generator / build tool.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// A single environment mutation requested by a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvOp {
    /// Set `key` to `value`, replacing any previous value.
    Set { key: String, value: String },
    /// Put `dir` in front of the existing `PATH` entries.
    PrependPath(PathBuf),
}

/// Ordered list of environment mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDelta {
    ops: Vec<EnvOp>,
}

impl EnvDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ops.push(EnvOp::Set {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn prepend_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ops.push(EnvOp::PrependPath(dir.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[EnvOp] {
        &self.ops
    }
}

/// Environment seen by units and child processes.
///
/// `base` is a snapshot taken once at startup (empty in tests); `overlay`
/// holds every variable changed since. Lookups consult the overlay first.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    base: BTreeMap<String, String>,
    overlay: BTreeMap<String, String>,
}

impl Environment {
    /// Environment with no variables at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    pub fn from_process() -> Self {
        Self {
            base: std::env::vars_os()
                .map(|(k, v)| {
                    (
                        k.to_string_lossy().into_owned(),
                        v.to_string_lossy().into_owned(),
                    )
                })
                .collect(),
            overlay: BTreeMap::new(),
        }
    }

    /// Environment seeded from explicit key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            base: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            overlay: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.overlay
            .get(key)
            .or_else(|| self.base.get(key))
            .map(String::as_str)
    }

    /// Like [`get`](Self::get), but falls back to a case-insensitive match.
    /// Windows variable names are case-insensitive (`windir` vs `WINDIR`).
    pub fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.get(key).or_else(|| {
            self.overlay
                .iter()
                .chain(self.base.iter())
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str())
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Directories currently on `PATH`, in lookup order.
    pub fn search_path(&self) -> Vec<PathBuf> {
        match self.get(&self.path_key()) {
            Some(raw) => std::env::split_paths(raw).collect(),
            None => Vec::new(),
        }
    }

    /// Resolve `program` against this environment's `PATH`.
    pub fn which(&self, program: &str) -> Option<PathBuf> {
        let path = self.get(&self.path_key()).unwrap_or_default();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        which::which_in(program, Some(path), cwd).ok()
    }

    /// Variables changed since the snapshot; these are what child processes
    /// need on top of the inherited environment.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overlay.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply a delta returned by a unit.
    pub fn apply(&mut self, delta: &EnvDelta) {
        for op in delta.ops() {
            match op {
                EnvOp::Set { key, value } => {
                    debug!(%key, %value, "environment: set");
                    self.overlay.insert(key.clone(), value.clone());
                }
                EnvOp::PrependPath(dir) => self.prepend_path(dir),
            }
        }
    }

    fn prepend_path(&mut self, dir: &Path) {
        let key = self.path_key();
        let mut entries = self.search_path();
        if entries.iter().any(|existing| existing == dir) {
            debug!(dir = %dir.display(), "environment: already on PATH");
            return;
        }
        entries.insert(0, dir.to_path_buf());

        match std::env::join_paths(entries) {
            Ok(joined) => {
                debug!(dir = %dir.display(), "environment: prepended to PATH");
                self.overlay
                    .insert(key, joined.to_string_lossy().into_owned());
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot add directory to PATH");
            }
        }
    }

    /// Name of the PATH variable as spelled in this environment
    /// (`Path` is common on Windows).
    fn path_key(&self) -> String {
        if cfg!(windows) {
            self.overlay
                .keys()
                .chain(self.base.keys())
                .find(|k| k.eq_ignore_ascii_case("PATH"))
                .cloned()
                .unwrap_or_else(|| "PATH".to_string())
        } else {
            "PATH".to_string()
        }
    }
}
