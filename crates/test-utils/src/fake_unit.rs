use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use toolstrap::dag::{DependencyUnit, EnvDelta, Environment, UnitName, UnitOutcome};

/// One recorded call on a [`FakeUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Verify(String),
    Provision(String),
}

/// Call log shared between every fake unit of a test.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Names in the order `verify` was called.
    pub fn verified(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Verify(name) => Some(name),
                Call::Provision(_) => None,
            })
            .collect()
    }

    /// Names in the order `provision` was called.
    pub fn provisioned(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Provision(name) => Some(name),
                Call::Verify(_) => None,
            })
            .collect()
    }

    pub fn verify_count(&self, name: &str) -> usize {
        self.verified().iter().filter(|n| *n == name).count()
    }

    pub fn provision_count(&self, name: &str) -> usize {
        self.provisioned().iter().filter(|n| *n == name).count()
    }

    /// Position of `name`'s first verify call.
    pub fn verify_position(&self, name: &str) -> Option<usize> {
        self.verified().iter().position(|n| n == name)
    }
}

/// Scriptable [`DependencyUnit`].
///
/// Present (verify succeeds) by default. Every call is appended to the
/// shared [`CallLog`].
#[derive(Debug, Clone)]
pub struct FakeUnit {
    name: String,
    prerequisites: Vec<UnitName>,
    present: bool,
    provision_ok: bool,
    requires_var: Option<String>,
    verify_env: EnvDelta,
    provision_env: EnvDelta,
    executable: Option<PathBuf>,
    log: CallLog,
}

impl FakeUnit {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            prerequisites: Vec::new(),
            present: true,
            provision_ok: true,
            requires_var: None,
            verify_env: EnvDelta::new(),
            provision_env: EnvDelta::new(),
            executable: None,
            log: log.clone(),
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.prerequisites.push(dep.to_string());
        self
    }

    /// `verify` reports the tool as absent.
    pub fn missing(mut self) -> Self {
        self.present = false;
        self
    }

    /// `provision` reports failure.
    pub fn install_fails(mut self) -> Self {
        self.provision_ok = false;
        self
    }

    /// `verify` only succeeds once `key` is set in the environment.
    pub fn requires_var(mut self, key: &str) -> Self {
        self.requires_var = Some(key.to_string());
        self
    }

    /// Env delta attached to a successful `verify`.
    pub fn discovers(mut self, delta: EnvDelta) -> Self {
        self.verify_env = delta;
        self
    }

    /// Env delta attached to `provision`.
    pub fn provides(mut self, delta: EnvDelta) -> Self {
        self.provision_env = delta;
        self
    }

    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn boxed(self) -> Box<dyn DependencyUnit> {
        Box::new(self)
    }
}

impl DependencyUnit for FakeUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn prerequisites(&self) -> &[UnitName] {
        &self.prerequisites
    }

    fn verify(&mut self, env: &Environment) -> UnitOutcome {
        self.log.push(Call::Verify(self.name.clone()));

        let env_ok = self
            .requires_var
            .as_deref()
            .is_none_or(|key| env.contains(key));

        if self.present && env_ok {
            UnitOutcome::success().with_env(self.verify_env.clone())
        } else {
            UnitOutcome::failure()
        }
    }

    fn provision(&mut self, _env: &Environment) -> UnitOutcome {
        self.log.push(Call::Provision(self.name.clone()));
        UnitOutcome::from_bool(self.provision_ok).with_env(self.provision_env.clone())
    }

    fn executable(&self) -> Option<PathBuf> {
        self.executable.clone()
    }
}
