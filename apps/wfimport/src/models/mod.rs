//! Data models shared by the validator, importer, and printers.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
/// Outcome of validating one workflow file. Warnings never affect validity.
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Record an error; the result stays invalid until `finish` says otherwise.
    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Seal the result: valid iff no errors were recorded.
    pub fn finish(mut self) -> Self {
        self.valid = self.errors.is_empty();
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Per-file import outcome folded into the run report.
pub struct ImportOutcome {
    pub file: String,
    pub success: bool,
    pub error: Option<String>,
}

impl ImportOutcome {
    pub fn imported(file: impl Into<String>) -> Self {
        ImportOutcome {
            file: file.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(file: impl Into<String>, error: impl Into<String>) -> Self {
        ImportOutcome {
            file: file.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
/// Aggregate of one import run.
pub struct RunReport {
    pub imported: usize,
    pub failed: usize,
    pub total: usize,
    pub errors: Vec<String>,
    pub outcomes: Vec<ImportOutcome>,
    /// Set when the run stopped before processing files.
    pub aborted: Option<String>,
}

impl RunReport {
    pub fn new(total: usize) -> Self {
        RunReport {
            total,
            ..Default::default()
        }
    }

    /// Report for a run that never reached the per-file loop.
    pub fn aborted(reason: impl Into<String>) -> Self {
        RunReport {
            aborted: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Fold one file's outcome into the counts.
    pub fn record(&mut self, outcome: ImportOutcome) {
        if outcome.success {
            self.imported += 1;
        } else {
            self.failed += 1;
            if let Some(e) = outcome.error.as_ref() {
                self.errors.push(e.clone());
            }
        }
        self.outcomes.push(outcome);
    }

    pub fn success(&self) -> bool {
        self.aborted.is_none() && self.failed == 0
    }
}

#[derive(Debug, Clone, Serialize)]
/// Validation result tagged with the file it belongs to.
pub struct FileValidation {
    pub file: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_folds_counts_and_errors() {
        let mut r = RunReport::new(3);
        r.record(ImportOutcome::imported("a.json"));
        r.record(ImportOutcome::failed("b.json", "Import failed for b.json: x"));
        r.record(ImportOutcome::imported("c.json"));
        assert_eq!(r.imported, 2);
        assert_eq!(r.failed, 1);
        assert_eq!(r.errors, vec!["Import failed for b.json: x".to_string()]);
        assert!(!r.success());
    }

    #[test]
    fn test_aborted_report_is_not_success() {
        let r = RunReport::aborted("Container not running");
        assert_eq!(r.total, 0);
        assert!(!r.success());
    }
}
