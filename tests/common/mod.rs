#![allow(dead_code)]

pub use toolstrap_test_utils::builders::{
    ConfigFileBuilder, TestKit, ToolConfigBuilder, HOME, SOLUTION_ROOT,
};
pub use toolstrap_test_utils::fake_backend::{BackendCall, FakeBackend};
pub use toolstrap_test_utils::fake_unit::{Call, CallLog, FakeUnit};
pub use toolstrap_test_utils::init_tracing;

use toolstrap::dag::{DependencyGraph, Environment};

/// Graph holding `units` in the given registration order.
pub fn graph_of(units: Vec<FakeUnit>) -> DependencyGraph {
    graph_with_env(units, Environment::empty())
}

pub fn graph_with_env(units: Vec<FakeUnit>, env: Environment) -> DependencyGraph {
    let mut graph = DependencyGraph::with_environment(env);
    for unit in units {
        graph.add_node(unit.boxed());
    }
    graph
}
