//! Error taxonomy for the import pipeline.
//!
//! Per-file failures (`ImportError`) are recorded in the run report and never
//! stop the run. Run-level failures (`RunError`) abort before any file is
//! processed.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single external command invocation.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` timed out after {}s", .after.as_secs())]
    TimedOut { program: String, after: Duration },
}

/// Why a directory scan produced no candidate files.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Workflows directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("No JSON files found in: {}", .0.display())]
    Empty(PathBuf),
    #[error("invalid directory pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Pipeline stage that can hit a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Copy,
    Import,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Copy => f.write_str("Copy"),
            Step::Import => f.write_str("Import"),
        }
    }
}

/// Per-file failure. The `Display` form is what lands in the run report.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Validation failed for {file}: {}", .errors.join("; "))]
    Validation { file: String, errors: Vec<String> },
    #[error("Copy failed for {file}: Failed to copy to container: {detail}")]
    Copy { file: String, detail: String },
    #[error("Import failed for {file}: {message}")]
    Import { file: String, message: String },
    #[error("Timeout for {file}: {step} operation timed out")]
    Timeout { file: String, step: Step },
    #[error("Error importing {file}: Unexpected error: {message}")]
    Unexpected { file: String, message: String },
}

impl ImportError {
    /// Map a runtime failure at `step` onto the per-file taxonomy.
    pub fn from_runtime(file: &str, step: Step, err: RuntimeError) -> Self {
        match err {
            RuntimeError::TimedOut { .. } => ImportError::Timeout {
                file: file.to_string(),
                step,
            },
            other => ImportError::Unexpected {
                file: file.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Conditions that abort the whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Container not running: {container}")]
    ContainerNotRunning { container: String },
    #[error("No workflow files found ({0})")]
    NoFiles(#[from] DiscoveryError),
}

/// Configuration file problems; fatal before any work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unknown {key} value '{value}' (expected {expected})")]
    Value {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_messages() {
        let e = ImportError::Validation {
            file: "a.json".into(),
            errors: vec![
                "Missing required field: nodes".into(),
                "Missing required field: connections".into(),
            ],
        };
        assert_eq!(
            e.to_string(),
            "Validation failed for a.json: Missing required field: nodes; Missing required field: connections"
        );
        let t = ImportError::from_runtime(
            "b.json",
            Step::Import,
            RuntimeError::TimedOut {
                program: "docker".into(),
                after: Duration::from_secs(60),
            },
        );
        assert_eq!(t.to_string(), "Timeout for b.json: Import operation timed out");
    }

    #[test]
    fn test_wait_failure_is_unexpected_not_timeout() {
        let e = ImportError::from_runtime(
            "c.json",
            Step::Copy,
            RuntimeError::Wait {
                program: "docker".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "wait failed"),
            },
        );
        assert!(matches!(e, ImportError::Unexpected { .. }));
        assert_eq!(
            e.to_string(),
            "Error importing c.json: Unexpected error: failed waiting for `docker`: wait failed"
        );
    }
}
