// src/config/mod.rs

//! Configuration loading and validation for toolstrap.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate tool names and prerequisite overrides (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_config_path, load_and_validate, load_from_path, load_or_default,
    resolve_solution_root,
};
pub use model::{BuildSection, ConfigFile, RawConfigFile, SolutionSection, ToolConfig};
