//! Output rendering for import runs and validation passes.
//!
//! Supports `human` (default) and `json` outputs. Progress lines are only
//! emitted in human mode; JSON mode prints a single document at the end.

use crate::config::OutputMode;
use crate::error::ImportError;
use crate::models::{FileValidation, RunReport};
use crate::utils;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

const RULE_WIDE: usize = 60;
const RULE_NARROW: usize = 40;

fn use_colors(output: OutputMode) -> bool {
    output == OutputMode::Human && utils::colors_enabled()
}

fn rule(width: usize) -> String {
    "=".repeat(width)
}

/// Tool banner printed before a run.
pub fn print_banner() {
    let title = format!("wfimport {} - workflow importer", env!("CARGO_PKG_VERSION"));
    if utils::colors_enabled() {
        println!("{}", title.bold());
    } else {
        println!("{}", title);
    }
    println!("{}", rule(RULE_WIDE));
}

pub fn print_start(total: usize) {
    println!("🚀 Starting import of {} workflows...", total);
    println!("{}", rule(RULE_WIDE));
}

pub fn print_file_header(index: usize, total: usize, name: &str) {
    println!("\n[{}/{}] Processing: {}", index, total, name);
    println!("{}", "-".repeat(RULE_NARROW));
}

pub fn print_warnings(name: &str, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    let head = format!("⚠️  Warnings for {}:", name);
    if utils::colors_enabled() {
        println!("{}", head.yellow());
    } else {
        println!("{}", head);
    }
    for w in warnings {
        println!("   - {}", w);
    }
}

pub fn print_imported(name: &str) {
    if utils::colors_enabled() {
        println!("{} {}", "✅ Imported:".green().bold(), name);
    } else {
        println!("✅ Imported: {}", name);
    }
}

/// Per-file failure line plus its detail.
pub fn print_failure(err: &ImportError) {
    let (head, file, detail) = match err {
        ImportError::Validation { file, errors } => {
            ("❌ Validation failed:", file, format!("Errors: {}", errors.join("; ")))
        }
        ImportError::Copy { file, detail } => (
            "❌ Copy failed:",
            file,
            format!("Error: Failed to copy to container: {}", detail),
        ),
        ImportError::Import { file, message } => {
            ("❌ Import failed:", file, format!("Error: {}", message))
        }
        ImportError::Timeout { file, step } => (
            "⏰ Timeout:",
            file,
            format!("Error: {} operation timed out", step),
        ),
        ImportError::Unexpected { file, message } => (
            "❌ Unexpected error:",
            file,
            format!("Error: Unexpected error: {}", message),
        ),
    };
    if utils::colors_enabled() {
        println!("{} {}", head.red().bold(), file);
    } else {
        println!("{} {}", head, file);
    }
    println!("   {}", detail);
}

/// Print the final run report in the requested format.
pub fn print_report(report: &RunReport, output: OutputMode, max_errors: Option<usize>) {
    match output {
        OutputMode::Json => match serde_json::to_string_pretty(&compose_report_json(report)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", utils::error_prefix(), e),
        },
        OutputMode::Human => {
            let color = use_colors(output);
            if let Some(reason) = report.aborted.as_ref() {
                println!("\n⚠️  Import aborted: {}", reason);
                return;
            }
            println!("\n{}", rule(RULE_WIDE));
            if color {
                println!("{}", "📊 Import Summary:".bold());
            } else {
                println!("📊 Import Summary:");
            }
            println!("✅ Successfully imported: {}", report.imported);
            println!("❌ Failed imports: {}", report.failed);
            println!("📁 Total files processed: {}", report.total);

            if report.failed > 0 {
                println!("\n❌ Failed imports details:");
                for line in error_listing(&report.errors, max_errors) {
                    println!("{}", line);
                }
            }

            if report.success() {
                let done = "\n🎉 All workflows imported successfully!";
                if color {
                    println!("{}", done.green().bold());
                } else {
                    println!("{}", done);
                }
            } else {
                println!("\n⚠️  Import completed with {} failures", report.failed);
            }
        }
    }
}

/// Enumerated error lines, optionally capped with a remainder count.
pub fn error_listing(errors: &[String], max: Option<usize>) -> Vec<String> {
    let shown = max.unwrap_or(errors.len()).min(errors.len());
    let mut lines: Vec<String> = errors[..shown]
        .iter()
        .enumerate()
        .map(|(i, e)| format!("   {}. {}", i + 1, e))
        .collect();
    if errors.len() > shown {
        lines.push(format!("   ... and {} more errors", errors.len() - shown));
    }
    lines
}

/// Print validation-only results.
pub fn print_validation(results: &[FileValidation], output: OutputMode) {
    match output {
        OutputMode::Json => {
            match serde_json::to_string_pretty(&compose_validation_json(results)) {
                Ok(s) => println!("{}", s),
                Err(e) => eprintln!("{} {}", utils::error_prefix(), e),
            }
        }
        OutputMode::Human => {
            let color = use_colors(output);
            for fv in results {
                if fv.result.valid {
                    if color {
                        println!("{} {}", "✅ valid:".green().bold(), fv.file);
                    } else {
                        println!("✅ valid: {}", fv.file);
                    }
                } else if color {
                    println!("{} {}", "❌ invalid:".red().bold(), fv.file);
                } else {
                    println!("❌ invalid: {}", fv.file);
                }
                for e in &fv.result.errors {
                    println!("   ✖ {}", e);
                }
                for w in &fv.result.warnings {
                    println!("   ▲ {}", w);
                }
            }
            let invalid = results.iter().filter(|r| !r.result.valid).count();
            let summary = format!(
                "— Summary — valid={} invalid={} files={}",
                results.len() - invalid,
                invalid,
                results.len()
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose the run report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &RunReport) -> JsonVal {
    json!({
        "success": report.success(),
        "imported": report.imported,
        "failed": report.failed,
        "total": report.total,
        "errors": report.errors,
        "results": report.outcomes,
        "message": report.aborted,
    })
}

/// Compose validation JSON object (pure) for testing/snapshot purposes.
pub fn compose_validation_json(results: &[FileValidation]) -> JsonVal {
    let invalid = results.iter().filter(|r| !r.result.valid).count();
    json!({
        "results": results,
        "summary": {
            "valid": results.len() - invalid,
            "invalid": invalid,
            "total": results.len(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImportOutcome, ValidationResult};

    #[test]
    fn test_compose_report_json_shape() {
        let mut report = RunReport::new(2);
        report.record(ImportOutcome::imported("a.json"));
        report.record(ImportOutcome::failed(
            "b.json",
            "Import failed for b.json: Missing workflow name field",
        ));
        let out = compose_report_json(&report);
        assert_eq!(out["success"], false);
        assert_eq!(out["imported"], 1);
        assert_eq!(out["failed"], 1);
        assert_eq!(out["total"], 2);
        assert_eq!(
            out["errors"][0],
            "Import failed for b.json: Missing workflow name field"
        );
        assert_eq!(out["results"][0]["file"], "a.json");
        assert!(out["results"][0]["error"].is_null());
        assert!(out["message"].is_null());

        let aborted = compose_report_json(&RunReport::aborted("Container not running"));
        assert_eq!(aborted["success"], false);
        assert_eq!(aborted["message"], "Container not running");
    }

    #[test]
    fn test_error_listing_caps_and_counts_rest() {
        let errors: Vec<String> = (1..=4).map(|i| format!("e{}", i)).collect();
        assert_eq!(error_listing(&errors, None).len(), 4);
        let capped = error_listing(&errors, Some(2));
        assert_eq!(
            capped,
            vec!["   1. e1", "   2. e2", "   ... and 2 more errors"]
        );
        assert_eq!(error_listing(&errors, Some(10)).len(), 4);
    }

    #[test]
    fn test_compose_validation_json_summary() {
        let results = vec![
            FileValidation {
                file: "a.json".into(),
                result: ValidationResult::default().finish(),
            },
            FileValidation {
                file: "b.json".into(),
                result: {
                    let mut r = ValidationResult::default();
                    r.error("Missing required field: nodes");
                    r.finish()
                },
            },
        ];
        let out = compose_validation_json(&results);
        assert_eq!(out["summary"]["valid"], 1);
        assert_eq!(out["summary"]["invalid"], 1);
        assert_eq!(out["results"][1]["valid"], false);
        assert_eq!(out["results"][1]["errors"][0], "Missing required field: nodes");
    }
}
