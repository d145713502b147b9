use std::sync::{Arc, Mutex};

use toolstrap::engine::{BuildBackend, BuildContext};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Generate,
    Build(String),
    Clean,
}

/// [`BuildBackend`] that records calls and returns scripted results.
///
/// Clones share the call list, so a test can keep a handle after boxing one
/// into a lifecycle.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    calls: Arc<Mutex<Vec<BackendCall>>>,
    /// Value of the env var named by `watch_var` at each generate call.
    seen: Arc<Mutex<Vec<Option<String>>>>,
    watch_var: Option<String>,
    generate_ok: bool,
    build_ok: bool,
    clean_ok: bool,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            seen: Arc::new(Mutex::new(Vec::new())),
            watch_var: None,
            generate_ok: true,
            build_ok: true,
            clean_ok: true,
        }
    }

    pub fn failing_generate(mut self) -> Self {
        self.generate_ok = false;
        self
    }

    pub fn failing_build(mut self) -> Self {
        self.build_ok = false;
        self
    }

    pub fn failing_clean(mut self) -> Self {
        self.clean_ok = false;
        self
    }

    /// Record the value of `key` in the context environment on generate.
    pub fn watching(mut self, key: &str) -> Self {
        self.watch_var = Some(key.to_string());
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seen_values(&self) -> Vec<Option<String>> {
        self.seen.lock().unwrap().clone()
    }

    pub fn boxed(&self) -> Box<dyn BuildBackend> {
        Box::new(self.clone())
    }
}

impl BuildBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn generate(&mut self, ctx: &BuildContext<'_>) -> bool {
        self.calls.lock().unwrap().push(BackendCall::Generate);
        if let Some(key) = &self.watch_var {
            let value = ctx.env().get(key).map(str::to_string);
            self.seen.lock().unwrap().push(value);
        }
        self.generate_ok
    }

    fn build(&mut self, _ctx: &BuildContext<'_>, config: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .push(BackendCall::Build(config.to_string()));
        self.build_ok
    }

    fn clean(&mut self, _ctx: &BuildContext<'_>) -> bool {
        self.calls.lock().unwrap().push(BackendCall::Clean);
        self.clean_ok
    }
}
