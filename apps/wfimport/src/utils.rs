//! Small shared helpers: colored message prefixes and path display.

use owo_colors::OwoColorize;
use std::path::Path;

/// Colors are disabled when `NO_COLOR` is set.
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn prefix(label: &str, paint: fn(&str) -> String) -> String {
    if colors_enabled() {
        paint(label)
    } else {
        label.to_string()
    }
}

pub fn error_prefix() -> String {
    prefix("error:", |s| s.red().bold().to_string())
}

pub fn warn_prefix() -> String {
    prefix("warning:", |s| s.yellow().bold().to_string())
}

pub fn note_prefix() -> String {
    prefix("note:", |s| s.cyan().bold().to_string())
}

pub fn info_prefix() -> String {
    prefix("info:", |s| s.blue().bold().to_string())
}

/// Render `p` relative to the working directory when possible.
pub fn rel_to_wd(p: &Path) -> String {
    let shown = std::env::current_dir()
        .ok()
        .and_then(|wd| pathdiff::diff_paths(p, wd))
        .filter(|rel| !rel.as_os_str().is_empty() && p.is_absolute());
    match shown {
        Some(rel) => rel.to_string_lossy().to_string(),
        None => p.to_string_lossy().to_string(),
    }
}

/// Base file name used in per-file messages.
pub fn file_label(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| p.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_label_uses_base_name() {
        assert_eq!(file_label(Path::new("workflows/a b.json")), "a b.json");
        assert_eq!(file_label(Path::new("/")), "/");
    }

    #[test]
    fn test_rel_to_wd_keeps_relative_paths() {
        assert_eq!(rel_to_wd(Path::new("workflows")), "workflows");
        let wd = std::env::current_dir().unwrap();
        assert_eq!(rel_to_wd(&wd.join("flows")), "flows");
    }
}
