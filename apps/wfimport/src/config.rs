//! Configuration discovery and effective settings resolution.
//!
//! wfimport reads `wfimport.toml|yaml|yml` from the start directory (or the
//! closest ancestor holding one) and merges it with CLI flags to produce an
//! `Effective` config.
//! Defaults:
//! - `dir`: `workflows` (relative to the config root)
//! - `container`: `n8n-n8n-1`
//! - `runtime`: `docker`, `platform_cli`: `n8n`
//! - `staging_dir`: `/tmp`
//! - `backup_suffix`: `.backup`
//! - `output`: `human`, `classifier`: `markers`
//! - `timeouts.{copy,import,probe}`: 30 / 60 / 10 seconds
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::classify::Classifier;
use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_NAMES: [&str; 3] = ["wfimport.toml", "wfimport.yaml", "wfimport.yml"];

pub const DEFAULT_DIR: &str = "workflows";
pub const DEFAULT_CONTAINER: &str = "n8n-n8n-1";
pub const DEFAULT_RUNTIME: &str = "docker";
pub const DEFAULT_PLATFORM_CLI: &str = "n8n";
pub const DEFAULT_STAGING_DIR: &str = "/tmp";
pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";
pub const DEFAULT_COPY_TIMEOUT: u64 = 30;
pub const DEFAULT_IMPORT_TIMEOUT: u64 = 60;
pub const DEFAULT_PROBE_TIMEOUT: u64 = 10;

#[derive(Debug, Default, Deserialize, Clone)]
/// Per-step timeouts in seconds under `[timeouts]`.
pub struct TimeoutsCfg {
    pub copy: Option<u64>,
    pub import: Option<u64>,
    pub probe: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `wfimport.toml|yaml`.
pub struct ImporterConfig {
    pub dir: Option<String>,
    pub container: Option<String>,
    pub runtime: Option<String>,
    pub platform_cli: Option<String>,
    pub staging_dir: Option<String>,
    pub backup_suffix: Option<String>,
    pub output: Option<String>,
    pub classifier: Option<String>,
    pub max_errors: Option<usize>,
    #[serde(default)]
    pub timeouts: Option<TimeoutsCfg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Some(OutputMode::Human),
            "json" => Some(OutputMode::Json),
            _ => None,
        }
    }
}

/// Flags collected from the command line; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub root: Option<String>,
    pub dir: Option<String>,
    pub container: Option<String>,
    pub output: Option<String>,
    pub classifier: Option<Classifier>,
    pub max_errors: Option<usize>,
    pub copy_timeout: Option<u64>,
    pub import_timeout: Option<u64>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    /// Path of the config file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    pub dir: PathBuf,
    pub container: String,
    pub runtime: String,
    pub platform_cli: String,
    pub staging_dir: String,
    pub backup_suffix: String,
    pub output: OutputMode,
    pub classifier: Classifier,
    pub max_errors: Option<usize>,
    pub copy_timeout: Duration,
    pub import_timeout: Duration,
    pub probe_timeout: Duration,
}

/// Walk upward from `start` looking for a config file.
///
/// Returns the directory holding it, or `start` itself when none is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).is_file()) {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Anchor a relative start path at `cwd` so the upward walk can reach its
/// ancestors (the parent of `.` is empty, not the real parent directory).
pub fn absolute_start(start: &Path, cwd: &Path) -> PathBuf {
    if start.is_absolute() {
        start.to_path_buf()
    } else if start == Path::new(".") {
        cwd.to_path_buf()
    } else {
        cwd.join(start)
    }
}

/// Load `ImporterConfig` from `root` if a config file is present.
///
/// A present but malformed file is an error rather than silently ignored.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, ImporterConfig)>, ConfigError> {
    for name in CONFIG_NAMES {
        let path = root.join(name);
        if !path.is_file() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let cfg: ImporterConfig = if name.ends_with(".toml") {
            toml::from_str(&s).map_err(|source| ConfigError::Toml {
                path: path.clone(),
                source,
            })?
        } else {
            serde_yaml::from_str(&s).map_err(|source| ConfigError::Yaml {
                path: path.clone(),
                source,
            })?
        };
        return Ok(Some((path, cfg)));
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &CliOverrides) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli.root.as_deref().unwrap_or("."));
    let root = match std::env::current_dir() {
        Ok(cwd) => detect_root(&absolute_start(&start, &cwd)),
        Err(_) => detect_root(&start),
    };
    let (config_path, cfg) = match load_config(&root)? {
        Some((p, c)) => (Some(p), c),
        None => (None, ImporterConfig::default()),
    };

    // A CLI directory is taken as given; config/default ones hang off the root.
    let dir = match cli.dir.as_ref() {
        Some(d) => PathBuf::from(d),
        None => root.join(cfg.dir.as_deref().unwrap_or(DEFAULT_DIR)),
    };

    let output_str = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let output = OutputMode::parse(&output_str).ok_or(ConfigError::Value {
        key: "output",
        value: output_str.clone(),
        expected: "human|json",
    })?;

    let classifier = match (cli.classifier, cfg.classifier.as_ref()) {
        (Some(c), _) => c,
        (None, Some(s)) => Classifier::parse(s).ok_or_else(|| ConfigError::Value {
            key: "classifier",
            value: s.clone(),
            expected: "markers|exit-code",
        })?,
        (None, None) => Classifier::default(),
    };

    let timeouts = cfg.timeouts.unwrap_or_default();
    let copy_timeout = cli
        .copy_timeout
        .or(timeouts.copy)
        .unwrap_or(DEFAULT_COPY_TIMEOUT);
    let import_timeout = cli
        .import_timeout
        .or(timeouts.import)
        .unwrap_or(DEFAULT_IMPORT_TIMEOUT);
    let probe_timeout = timeouts.probe.unwrap_or(DEFAULT_PROBE_TIMEOUT);

    Ok(Effective {
        config_path,
        dir,
        container: cli
            .container
            .clone()
            .or(cfg.container)
            .unwrap_or_else(|| DEFAULT_CONTAINER.to_string()),
        runtime: cfg.runtime.unwrap_or_else(|| DEFAULT_RUNTIME.to_string()),
        platform_cli: cfg
            .platform_cli
            .unwrap_or_else(|| DEFAULT_PLATFORM_CLI.to_string()),
        staging_dir: cfg
            .staging_dir
            .unwrap_or_else(|| DEFAULT_STAGING_DIR.to_string()),
        backup_suffix: cfg
            .backup_suffix
            .unwrap_or_else(|| DEFAULT_BACKUP_SUFFIX.to_string()),
        output,
        classifier,
        max_errors: cli.max_errors.or(cfg.max_errors),
        copy_timeout: Duration::from_secs(copy_timeout),
        import_timeout: Duration::from_secs(import_timeout),
        probe_timeout: Duration::from_secs(probe_timeout),
    })
}
