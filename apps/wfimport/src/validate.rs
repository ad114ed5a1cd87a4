//! Structural validation of workflow JSON files.
//!
//! Only the shape the platform's importer relies on is checked: a top-level
//! object with `nodes` and `connections`, and node entries carrying `name`
//! and `type`. Missing metadata (`name`, `id`) and empty node lists are
//! reported as warnings.

use crate::models::ValidationResult;
use serde_json::Value as Json;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const REQUIRED_FIELDS: [&str; 2] = ["nodes", "connections"];

/// Read and validate a workflow file.
pub fn validate_file(path: &Path) -> ValidationResult {
    let mut res = ValidationResult::default();
    let data = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            match e.kind() {
                ErrorKind::NotFound => res.error("File not found"),
                ErrorKind::PermissionDenied => res.error("Permission denied reading file"),
                _ => res.error(format!("Unexpected error: {}", e)),
            }
            return res.finish();
        }
    };
    let json: Json = match serde_json::from_str(&data) {
        Ok(v) => v,
        Err(e) => {
            res.error(format!("Invalid JSON syntax: {}", e));
            return res.finish();
        }
    };
    validate_value(&json)
}

/// Validate an already-parsed workflow document.
pub fn validate_value(json: &Json) -> ValidationResult {
    let mut res = ValidationResult::default();
    let obj = match json {
        Json::Object(obj) => obj,
        _ => {
            res.error("Root element must be a JSON object");
            return res.finish();
        }
    };

    for field in REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            res.error(format!("Missing required field: {}", field));
        }
    }

    if obj.get("name").map_or(true, is_empty_value) {
        res.warn("Missing or empty name field");
    }
    if obj.get("id").map_or(true, is_empty_value) {
        res.warn("Missing or empty id field");
    }

    if let Some(Json::Array(nodes)) = obj.get("nodes") {
        if nodes.is_empty() {
            res.warn("Workflow has no nodes");
        }
        for (i, node) in nodes.iter().enumerate() {
            // One error per node: name is checked before type.
            match node {
                Json::Object(n) if !n.contains_key("name") => {
                    res.error(format!("Node {} missing name field", i))
                }
                Json::Object(n) if !n.contains_key("type") => {
                    res.error(format!("Node {} missing type field", i))
                }
                Json::Object(_) => {}
                _ => res.error(format!("Node {} is not a valid object", i)),
            }
        }
    }

    res.finish()
}

/// Null, false, zero, and empty containers/strings count as "empty".
fn is_empty_value(v: &Json) -> bool {
    match v {
        Json::Null => true,
        Json::Bool(b) => !b,
        Json::Number(n) => n.as_f64() == Some(0.0),
        Json::String(s) => s.is_empty(),
        Json::Array(a) => a.is_empty(),
        Json::Object(o) => o.is_empty(),
    }
}
