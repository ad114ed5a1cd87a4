//! CLI argument parsing via `clap`.

use crate::classify::Classifier;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "wfimport",
    version,
    about = "Batch-import workflow JSON files into a containerized automation platform",
    long_about = "wfimport — validate workflow JSON files, stage them into a running container, and run the platform's import command for each.\n\nRunning without a subcommand is the same as `wfimport import`.\n\nConfiguration precedence: CLI > wfimport.toml > defaults.",
    after_help = "Examples:\n  wfimport\n  wfimport import ./workflows --container n8n-n8n-1\n  wfimport validate ./workflows --output json\n  wfimport check"
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, global = true, help = "Directory to search for wfimport.toml (default: current dir)")]
    pub root: Option<String>,
    #[arg(long, global = true, help = "Target container name (default: n8n-n8n-1)")]
    pub container: Option<String>,
    #[arg(long, global = true, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Diagnostic log level (trace|debug|info|warn|error); RUST_LOG wins when set"
    )]
    pub log_level: String,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Import workflows into the container
    #[command(
        about = "Import workflow files",
        long_about = "Validate each workflow file, copy it into the container, and run the platform import. Exits non-zero if any file fails.",
        after_help = "Examples:\n  wfimport import\n  wfimport import flows --classifier exit-code --max-errors 10"
    )]
    Import(ImportArgs),
    /// Validate workflow files locally
    #[command(
        about = "Validate workflow files",
        long_about = "Run the structural checks on every workflow file without contacting the container runtime."
    )]
    Validate {
        #[arg(help = "Workflows directory (default: workflows)")]
        dir: Option<String>,
    },
    /// Check the container is running
    #[command(
        about = "Probe the target container",
        long_about = "Exit 0 when the target container is running, 1 otherwise."
    )]
    Check,
    /// Show version
    #[command(about = "Show version", long_about = "Print the current wfimport version.")]
    Version,
}

#[derive(Args, Default, Clone)]
/// Options for `wfimport import`.
pub struct ImportArgs {
    #[arg(help = "Workflows directory (default: workflows)")]
    pub dir: Option<String>,
    #[arg(long, value_enum, help = "Result classifier (default: markers)")]
    pub classifier: Option<Classifier>,
    #[arg(long, help = "List at most N errors in the summary")]
    pub max_errors: Option<usize>,
    #[arg(long, value_name = "SECS", help = "Copy step timeout (default: 30)")]
    pub copy_timeout: Option<u64>,
    #[arg(long, value_name = "SECS", help = "Import step timeout (default: 60)")]
    pub import_timeout: Option<u64>,
}
