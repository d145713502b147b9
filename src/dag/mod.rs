// src/dag/mod.rs

//! Dependency graph and the unit contract it drives.
//!
//! - [`unit`] defines the `DependencyUnit` trait and `UnitOutcome`.
//! - [`env`] holds the explicit environment context units read and extend.
//! - [`graph`] registers units and runs the ordered verify/provision traversal.
//! - [`report`] records what a traversal did.
//! - [`plan`] is a read-only view for dry runs.

pub mod env;
pub mod graph;
pub mod plan;
pub mod report;
pub mod unit;

pub use env::{EnvDelta, EnvOp, Environment};
pub use graph::{DependencyGraph, Traversal};
pub use plan::{Plan, PlannedUnit};
pub use report::{Diagnostic, ExecutionReport, UnitStatus};
pub use unit::{DependencyUnit, UnitName, UnitOutcome};
