//! wfimport core library.
//!
//! This crate exposes programmatic APIs for validating workflow JSON files and
//! importing them into a container-hosted automation platform through the
//! container runtime's CLI.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `discover`: Workflow file discovery.
//! - `validate`: Structural workflow validation.
//! - `runtime`: Container runtime seam and the docker CLI implementation.
//! - `classify`: Import output classification.
//! - `importer`: Per-file pipeline and run orchestration.
//! - `models`: Validation results, outcomes, and the run report.
//! - `output`: Human/JSON printers.
//! - `error`: Error types.
//! - `utils`: Supporting helpers.
pub mod classify;
pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod importer;
pub mod models;
pub mod output;
pub mod runtime;
pub mod utils;
pub mod validate;
