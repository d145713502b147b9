// src/exec/mod.rs

//! Process and network plumbing shared by tool integrations and backends.
//!
//! - [`runner`] provides the `CommandRunner` trait and the `SystemRunner`
//!   that spawns real processes.
//! - [`fetch`] provides the `Fetcher` trait, an HTTP implementation, and
//!   archive extraction.

pub mod fetch;
pub mod runner;

pub use fetch::{archive_file_name, extract_archive, ArchiveKind, Fetcher, HttpFetcher};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
