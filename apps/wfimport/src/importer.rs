//! Import orchestration: preflight, discovery, per-file pipeline, aggregation.
//!
//! Files are processed strictly one at a time. Every per-file failure is
//! folded into the `RunReport` and the run moves on; only a stopped container
//! or an empty discovery aborts the run.

use crate::classify::{Classifier, Verdict};
use crate::config::Effective;
use crate::discover::discover_files;
use crate::error::{DiscoveryError, ImportError, RunError, Step};
use crate::models::{FileValidation, ImportOutcome, RunReport};
use crate::output;
use crate::runtime::ContainerRuntime;
use crate::utils;
use crate::validate::validate_file;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Settings the pipeline needs, split out of `Effective`.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub container: String,
    pub staging_dir: String,
    pub backup_suffix: String,
    pub classifier: Classifier,
    pub copy_timeout: Duration,
    pub import_timeout: Duration,
    pub probe_timeout: Duration,
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            container: crate::config::DEFAULT_CONTAINER.to_string(),
            staging_dir: crate::config::DEFAULT_STAGING_DIR.to_string(),
            backup_suffix: crate::config::DEFAULT_BACKUP_SUFFIX.to_string(),
            classifier: Classifier::default(),
            copy_timeout: Duration::from_secs(crate::config::DEFAULT_COPY_TIMEOUT),
            import_timeout: Duration::from_secs(crate::config::DEFAULT_IMPORT_TIMEOUT),
            probe_timeout: Duration::from_secs(crate::config::DEFAULT_PROBE_TIMEOUT),
        }
    }
}

impl From<&Effective> for ImportSettings {
    fn from(eff: &Effective) -> Self {
        ImportSettings {
            container: eff.container.clone(),
            staging_dir: eff.staging_dir.clone(),
            backup_suffix: eff.backup_suffix.clone(),
            classifier: eff.classifier,
            copy_timeout: eff.copy_timeout,
            import_timeout: eff.import_timeout,
            probe_timeout: eff.probe_timeout,
        }
    }
}

pub struct Importer<R: ContainerRuntime> {
    runtime: R,
    settings: ImportSettings,
    /// Print human progress lines while running.
    progress: bool,
}

impl<R: ContainerRuntime> Importer<R> {
    pub fn new(runtime: R, settings: ImportSettings) -> Self {
        Importer {
            runtime,
            settings,
            progress: false,
        }
    }

    pub fn with_progress(mut self, on: bool) -> Self {
        self.progress = on;
        self
    }

    #[cfg(test)]
    fn runtime(&self) -> &R {
        &self.runtime
    }

    /// True iff the target container shows up in the runtime's running list.
    /// Probe failures count as "not running".
    pub fn check_environment(&self) -> bool {
        let name = &self.settings.container;
        match self.runtime.list_running(name, self.settings.probe_timeout) {
            Ok(out) => out.stdout.contains(name.as_str()),
            Err(e) => {
                debug!(container = %name, error = %e, "container probe failed");
                false
            }
        }
    }

    /// Candidate workflow files under `dir`.
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
        discover_files(dir, &self.settings.backup_suffix)
    }

    /// Run the full pipeline for one file; never fails, the outcome says how it went.
    pub fn import_one(&self, path: &Path) -> ImportOutcome {
        let name = utils::file_label(path);
        match self.try_import(path, &name) {
            Ok(()) => {
                if self.progress {
                    output::print_imported(&name);
                }
                ImportOutcome::imported(name)
            }
            Err(e) => {
                debug!(file = %name, error = %e, "import failed");
                if self.progress {
                    output::print_failure(&e);
                }
                ImportOutcome::failed(name, e.to_string())
            }
        }
    }

    fn try_import(&self, path: &Path, name: &str) -> Result<(), ImportError> {
        let validation = validate_file(path);
        if !validation.valid {
            return Err(ImportError::Validation {
                file: name.to_string(),
                errors: validation.errors,
            });
        }
        if self.progress {
            output::print_warnings(name, &validation.warnings);
        }

        let staged = staged_path(&self.settings.staging_dir, name);
        let copied = self
            .runtime
            .copy_into(path, &self.settings.container, &staged, self.settings.copy_timeout)
            .map_err(|e| ImportError::from_runtime(name, Step::Copy, e))?;
        if !copied.success() {
            let err = copied.stderr.trim();
            let detail = if err.is_empty() {
                copied.stdout.trim()
            } else {
                err
            };
            return Err(ImportError::Copy {
                file: name.to_string(),
                detail: detail.to_string(),
            });
        }

        let out = self
            .runtime
            .import_workflow(&self.settings.container, &staged, self.settings.import_timeout)
            .map_err(|e| ImportError::from_runtime(name, Step::Import, e))?;
        match self
            .settings
            .classifier
            .classify(out.code, &out.stdout, &out.stderr)
        {
            Verdict::Imported => Ok(()),
            Verdict::Failed(message) => Err(ImportError::Import {
                file: name.to_string(),
                message,
            }),
        }
    }

    /// Import every workflow file under `dir` and return the aggregate report.
    pub fn run(&self, dir: &Path) -> RunReport {
        match self.preflight(dir) {
            Ok(files) => self.import_files(&files),
            Err(e) => {
                info!(reason = %e, "run aborted");
                if self.progress {
                    self.explain_abort(&e);
                }
                RunReport::aborted(e.to_string())
            }
        }
    }

    fn preflight(&self, dir: &Path) -> Result<Vec<PathBuf>, RunError> {
        if !self.check_environment() {
            return Err(RunError::ContainerNotRunning {
                container: self.settings.container.clone(),
            });
        }
        Ok(self.discover(dir)?)
    }

    fn import_files(&self, files: &[PathBuf]) -> RunReport {
        let total = files.len();
        if self.progress {
            output::print_start(total);
        }
        files
            .iter()
            .enumerate()
            .fold(RunReport::new(total), |mut report, (i, path)| {
                if self.progress {
                    output::print_file_header(i + 1, total, &utils::file_label(path));
                }
                report.record(self.import_one(path));
                report
            })
    }

    fn explain_abort(&self, e: &RunError) {
        match e {
            RunError::ContainerNotRunning { container } => {
                eprintln!(
                    "{} container '{}' is not running",
                    utils::error_prefix(),
                    container
                );
                eprintln!(
                    "{} start it first (e.g. `docker compose up -d`) or pass --container",
                    utils::note_prefix()
                );
            }
            RunError::NoFiles(cause) => {
                eprintln!("{} {}", utils::error_prefix(), cause);
            }
        }
    }
}

/// Location inside the container a file is staged to.
pub fn staged_path(staging_dir: &str, name: &str) -> String {
    format!("{}/{}", staging_dir.trim_end_matches('/'), name)
}

/// Validate every discovered file without touching the container.
pub fn validate_directory(
    dir: &Path,
    backup_suffix: &str,
) -> Result<Vec<FileValidation>, DiscoveryError> {
    let files = discover_files(dir, backup_suffix)?;
    Ok(files
        .iter()
        .map(|p| FileValidation {
            file: utils::file_label(p),
            result: validate_file(p),
        })
        .collect())
}
