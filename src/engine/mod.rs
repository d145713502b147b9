// src/engine/mod.rs

//! Build orchestration on top of the dependency graph.
//!
//! - [`lifecycle`] is the generate → build → clean state machine and the
//!   [`BuildBackend`] contract it delegates to.
//! - [`premake`] is the premake5 / make / MSBuild backend.
//! - [`orchestrator`] maps a CLI behaviour onto a lifecycle.

pub mod lifecycle;
pub mod orchestrator;
pub mod premake;

pub use lifecycle::{BuildBackend, BuildContext, BuildLifecycle, LifecycleState};
pub use orchestrator::Orchestrator;
pub use premake::PremakeBackend;
