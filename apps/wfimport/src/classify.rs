//! Classification of the platform importer's output.
//!
//! The import subcommand can exit 0 on failure, so the default classifier
//! looks for marker phrases in its output and derives a readable message from
//! the remaining lines. The exit-code classifier trusts the exit status only.

use serde::Serialize;

const SUCCESS_MARKERS: [&str; 1] = ["Successfully imported"];
const ERROR_MARKERS: [&str; 2] = ["An error occurred", "violates not-null constraint"];
const NOISE: [&str; 3] = ["Permissions", "deprecation", "N8N_RUNNERS_ENABLED"];
const NOT_NULL: &str = "violates not-null constraint";
const DUPLICATE_KEY: &str = "duplicate key value";
const GENERIC_ERROR: &str = "An error occurred";
/// Lines this short are dropped unless they match a known pattern.
const MIN_LINE_LEN: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
/// How the import command's result is judged.
pub enum Classifier {
    /// Marker phrases plus exit code
    #[default]
    Markers,
    /// Exit code only
    ExitCode,
}

impl Classifier {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markers" => Some(Classifier::Markers),
            "exit-code" | "exit_code" | "exitcode" => Some(Classifier::ExitCode),
            _ => None,
        }
    }

    pub fn classify(self, code: i32, stdout: &str, stderr: &str) -> Verdict {
        match self {
            Classifier::Markers => classify_import_output(code, stdout, stderr),
            Classifier::ExitCode => classify_by_exit_code(code, stdout, stderr),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of classifying one import invocation.
pub enum Verdict {
    Imported,
    Failed(String),
}

/// Marker-based classification with layered fallback messages.
pub fn classify_import_output(code: i32, stdout: &str, stderr: &str) -> Verdict {
    let has_success = SUCCESS_MARKERS.iter().any(|m| stdout.contains(m));
    let has_error = ERROR_MARKERS
        .iter()
        .any(|m| stdout.contains(m) || stderr.contains(m));

    if code == 0 && has_success && !has_error {
        return Verdict::Imported;
    }

    let messages: Vec<String> = primary_text(stdout, stderr)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| !NOISE.iter().any(|n| l.contains(n)))
        .filter_map(describe_line)
        .collect();

    let msg = match messages.split_first() {
        Some((first, rest)) if rest.is_empty() => first.clone(),
        Some((first, rest)) => format!("{} (and {} more errors)", first, rest.len()),
        None if has_error => "Import failed - likely missing required fields".to_string(),
        None => format!("Import failed with exit code {}", code),
    };
    Verdict::Failed(msg)
}

/// Exit-code-only classification.
pub fn classify_by_exit_code(code: i32, stdout: &str, stderr: &str) -> Verdict {
    if code == 0 {
        return Verdict::Imported;
    }
    let text = primary_text(stdout, stderr);
    if text.is_empty() {
        Verdict::Failed(format!("Import failed with exit code {}", code))
    } else {
        Verdict::Failed(text.to_string())
    }
}

/// Stderr when it has content, stdout otherwise.
fn primary_text<'a>(stdout: &'a str, stderr: &'a str) -> &'a str {
    let err = stderr.trim();
    if err.is_empty() {
        stdout.trim()
    } else {
        err
    }
}

fn describe_line(line: &str) -> Option<String> {
    if line.contains(NOT_NULL) {
        if line.contains("name") {
            Some("Missing workflow name field".to_string())
        } else if line.contains("id") {
            Some("Missing workflow ID field".to_string())
        } else {
            Some(format!("Database constraint: {}", line))
        }
    } else if line.contains(DUPLICATE_KEY) {
        Some("Workflow already exists (duplicate ID)".to_string())
    } else if line.contains(GENERIC_ERROR) {
        Some("Import failed - check workflow format".to_string())
    } else if line.chars().count() > MIN_LINE_LEN {
        Some(line.to_string())
    } else {
        None
    }
}
