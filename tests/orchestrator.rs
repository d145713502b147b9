// tests/orchestrator.rs
mod common;
use crate::common::{graph_of, init_tracing, BackendCall, CallLog, FakeBackend, FakeUnit};

use toolstrap::engine::{BuildLifecycle, LifecycleState, Orchestrator};
use toolstrap::types::{Behaviour, Platform, Toolset};

fn orchestrator(log: &CallLog, backend: &FakeBackend) -> Orchestrator {
    let graph = graph_of(vec![FakeUnit::new("git", log), FakeUnit::new("premake", log)]);
    let mut orch = Orchestrator::new();
    orch.initialize(BuildLifecycle::new(
        Platform::Emscripten,
        Toolset::Gnu,
        "/work/solution",
        graph,
        backend.boxed(),
    ));
    orch
}

#[test]
fn uninitialized_orchestrator_fails_every_operation() {
    init_tracing();
    let mut orch = Orchestrator::new();

    assert!(orch.lifecycle().is_none());
    assert!(!orch.generate_solution());
    assert!(!orch.build_solution("debug"));
    assert!(!orch.clean());
    assert!(!orch.perform(Behaviour::Generate));
    assert!(!orch.perform(Behaviour::BuildRelease));
}

#[test]
fn generate_behaviour_generates_once() {
    init_tracing();
    let log = CallLog::new();
    let backend = FakeBackend::new();
    let mut orch = orchestrator(&log, &backend);

    assert!(orch.perform(Behaviour::Generate));
    assert_eq!(backend.calls(), vec![BackendCall::Generate]);
    assert_eq!(
        orch.lifecycle().map(|l| l.state()),
        Some(LifecycleState::Generated)
    );
}

#[test]
fn build_debug_generates_then_builds_debug() {
    let log = CallLog::new();
    let backend = FakeBackend::new();
    let mut orch = orchestrator(&log, &backend);

    assert!(orch.perform(Behaviour::BuildDebug));

    let calls = backend.calls();
    assert_eq!(calls.first(), Some(&BackendCall::Generate));
    assert_eq!(calls.last(), Some(&BackendCall::Build("debug".to_string())));
    assert_eq!(log.verify_count("git"), 1);
}

#[test]
fn build_release_builds_release() {
    let log = CallLog::new();
    let backend = FakeBackend::new();
    let mut orch = orchestrator(&log, &backend);

    assert!(orch.perform(Behaviour::BuildRelease));
    assert_eq!(
        backend.calls().last(),
        Some(&BackendCall::Build("release".to_string()))
    );
}

#[test]
fn build_behaviour_stops_when_generation_fails() {
    let log = CallLog::new();
    let backend = FakeBackend::new().failing_generate();
    let mut orch = orchestrator(&log, &backend);

    assert!(!orch.perform(Behaviour::BuildDebug));
    assert_eq!(backend.calls(), vec![BackendCall::Generate]);
}

#[test]
fn build_failure_is_the_behaviour_result() {
    let log = CallLog::new();
    let backend = FakeBackend::new().failing_build();
    let mut orch = orchestrator(&log, &backend);

    assert!(!orch.perform(Behaviour::BuildRelease));
}

#[test]
fn clean_behaviour_only_cleans() {
    let log = CallLog::new();
    let backend = FakeBackend::new();
    let mut orch = orchestrator(&log, &backend);

    assert!(orch.perform(Behaviour::Clean));
    assert_eq!(backend.calls(), vec![BackendCall::Clean]);
    assert!(log.is_empty());
}
