use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const VALID: &str = r#"{"name":"w","id":"1","nodes":[{"name":"a","type":"t"}],"connections":{}}"#;

struct TestEnv {
    tmp: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        TestEnv {
            tmp: TempDir::new().expect("create temp dir"),
        }
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn flows(&self, files: &[(&str, &str)]) -> PathBuf {
        let dir = self.root().join("workflows");
        fs::create_dir_all(&dir).expect("create workflows dir");
        for (name, body) in files {
            fs::write(dir.join(name), body).expect("write workflow");
        }
        dir
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("wfimport");
        cmd.current_dir(self.root()).env("NO_COLOR", "1").env_remove("RUST_LOG");
        cmd
    }

    fn json(&self, args: &[&str], code: i32) -> Value {
        let out = self
            .cmd()
            .args(args)
            .args(["--output", "json"])
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    /// Install a stub runtime CLI and point wfimport.toml at it.
    #[cfg(unix)]
    fn stub_runtime(&self, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        let bin = self.root().join("fake-docker");
        fs::write(&bin, format!("#!/bin/sh\n{}\n", script)).expect("write stub");
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).expect("chmod stub");
        fs::write(
            self.root().join("wfimport.toml"),
            format!("runtime = \"{}\"\n", bin.to_string_lossy()),
        )
        .expect("write config");
    }
}

#[test]
fn version_prints_package_version() {
    let env = TestEnv::new();
    env.cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn validate_reports_invalid_files() {
    let env = TestEnv::new();
    env.flows(&[
        ("good.json", VALID),
        ("bad.json", r#"{"nodes": [{"type": "x"}]}"#),
    ]);
    env.cmd()
        .arg("validate")
        .assert()
        .code(1)
        .stdout(contains("Missing required field: connections"))
        .stdout(contains("Node 0 missing name field"))
        .stdout(contains("valid=1 invalid=1 files=2"));
}

#[test]
fn validate_json_output() {
    let env = TestEnv::new();
    env.flows(&[("only.json", r#"{"nodes": [], "connections": {}}"#)]);
    let out = env.json(&["validate"], 0);
    assert_eq!(out["summary"]["valid"], 1);
    assert_eq!(out["results"][0]["file"], "only.json");
    assert_eq!(out["results"][0]["warnings"][2], "Workflow has no nodes");
}

#[test]
fn validate_missing_directory_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["validate", "nowhere"])
        .assert()
        .code(1)
        .stderr(contains("Workflows directory not found"));
}

#[test]
fn config_in_parent_directory_is_used_from_subdirectory() {
    let env = TestEnv::new();
    let flows = env.root().join("flows");
    fs::create_dir_all(&flows).expect("create flows dir");
    fs::write(flows.join("parent.json"), VALID).expect("write workflow");
    fs::write(env.root().join("wfimport.toml"), "dir = \"flows\"\n").expect("write config");
    let sub = env.root().join("sub/deeper");
    fs::create_dir_all(&sub).expect("create subdir");

    let mut cmd = env.cmd();
    cmd.current_dir(&sub)
        .arg("validate")
        .assert()
        .success()
        .stdout(contains("parent.json"))
        .stdout(contains("valid=1 invalid=0 files=1"));
}

#[test]
fn malformed_config_exits_with_2() {
    let env = TestEnv::new();
    fs::write(env.root().join("wfimport.toml"), "container = [").expect("write config");
    env.cmd()
        .arg("validate")
        .assert()
        .code(2)
        .stderr(contains("invalid TOML"));
}

#[cfg(unix)]
#[test]
fn import_all_files_through_stub_runtime() {
    let env = TestEnv::new();
    env.flows(&[
        ("a.json", VALID),
        ("b.json", VALID),
        ("c.json", VALID),
        ("c.json.backup", VALID),
    ]);
    env.stub_runtime(
        r#"case "$1" in
  ps) echo "n8n-n8n-1" ;;
  cp) exit 0 ;;
  exec) echo "Successfully imported 1 workflow." ;;
esac"#,
    );
    let out = env.json(&["import"], 0);
    assert_eq!(out["success"], true);
    assert_eq!(out["imported"], 3);
    assert_eq!(out["failed"], 0);
    assert_eq!(out["total"], 3);
}

#[cfg(unix)]
#[test]
fn import_classifies_zero_exit_failures() {
    let env = TestEnv::new();
    env.flows(&[("a.json", VALID), ("b.json", VALID)]);
    env.stub_runtime(
        r#"case "$1" in
  ps) echo "n8n-n8n-1" ;;
  cp) exit 0 ;;
  exec)
    case "$5" in
      *a.json) echo "null value in column \"name\" violates not-null constraint" >&2 ;;
      *) echo "Successfully imported 1 workflow." ;;
    esac ;;
esac"#,
    );
    let out = env.json(&["import"], 1);
    assert_eq!(out["imported"], 1);
    assert_eq!(out["failed"], 1);
    assert_eq!(
        out["errors"][0],
        "Import failed for a.json: Missing workflow name field"
    );
}

#[cfg(unix)]
#[test]
fn import_aborts_when_container_down() {
    let env = TestEnv::new();
    env.flows(&[("a.json", VALID)]);
    env.stub_runtime(r#"[ "$1" = ps ] && exit 0; echo "unexpected call $1" >&2; exit 9"#);
    env.cmd()
        .arg("import")
        .assert()
        .code(1)
        .stderr(contains("is not running"));
    let out = env.json(&["import"], 1);
    assert_eq!(out["total"], 0);
    assert!(out["message"]
        .as_str()
        .unwrap()
        .starts_with("Container not running"));
}

#[cfg(unix)]
#[test]
fn import_without_files_fails() {
    let env = TestEnv::new();
    env.flows(&[]);
    env.stub_runtime(r#"echo "n8n-n8n-1""#);
    env.cmd()
        .assert()
        .code(1)
        .stderr(contains("No JSON files found"));
}

#[cfg(unix)]
#[test]
fn check_probes_container() {
    let env = TestEnv::new();
    env.stub_runtime(r#"echo "automation-1""#);
    env.cmd()
        .args(["check", "--container", "automation-1"])
        .assert()
        .success()
        .stdout(contains("is running"));
    env.cmd().arg("check").assert().code(1);
}
