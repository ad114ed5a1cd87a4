//! Container runtime access through its command-line client.
//!
//! The importer only needs three operations: a liveness probe, copying a file
//! into the container, and running the platform's import subcommand inside
//! it. `ContainerRuntime` is the seam; `DockerCli` shells out to `docker` (or
//! any CLI with the same argument conventions, e.g. `podman`).

use crate::error::RuntimeError;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured result of a finished external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `-1` when the process was terminated by a signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Operations the importer performs against the container runtime.
pub trait ContainerRuntime {
    /// List running containers whose name matches `name`, names only.
    fn list_running(&self, name: &str, timeout: Duration) -> Result<CommandOutput, RuntimeError>;

    /// Copy a local file to `dest` inside `container`.
    fn copy_into(
        &self,
        src: &Path,
        container: &str,
        dest: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, RuntimeError>;

    /// Run the platform's workflow import against a path inside `container`.
    fn import_workflow(
        &self,
        container: &str,
        staged: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, RuntimeError>;
}

/// `ContainerRuntime` backed by the docker CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    /// Runtime client program (`docker`).
    pub program: String,
    /// Platform CLI inside the container (`n8n`).
    pub platform_cli: String,
}

impl DockerCli {
    pub fn new(program: impl Into<String>, platform_cli: impl Into<String>) -> Self {
        DockerCli {
            program: program.into(),
            platform_cli: platform_cli.into(),
        }
    }

    fn run(&self, args: &[String], timeout: Duration) -> Result<CommandOutput, RuntimeError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        run_with_timeout(cmd, timeout)
    }
}

impl ContainerRuntime for DockerCli {
    fn list_running(&self, name: &str, timeout: Duration) -> Result<CommandOutput, RuntimeError> {
        let args = vec![
            "ps".to_string(),
            "--filter".to_string(),
            format!("name={}", name),
            "--format".to_string(),
            "{{.Names}}".to_string(),
        ];
        self.run(&args, timeout)
    }

    fn copy_into(
        &self,
        src: &Path,
        container: &str,
        dest: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, RuntimeError> {
        let args = vec![
            "cp".to_string(),
            src.to_string_lossy().to_string(),
            format!("{}:{}", container, dest),
        ];
        self.run(&args, timeout)
    }

    fn import_workflow(
        &self,
        container: &str,
        staged: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, RuntimeError> {
        let args = vec![
            "exec".to_string(),
            container.to_string(),
            self.platform_cli.clone(),
            "import:workflow".to_string(),
            format!("--input={}", staged),
        ];
        self.run(&args, timeout)
    }
}

/// Run `cmd` to completion, capturing output, killing it after `timeout`.
///
/// Output pipes are drained on helper threads so a chatty child cannot block
/// on a full pipe while we wait.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<CommandOutput, RuntimeError> {
    let program = cmd.get_program().to_string_lossy().to_string();
    debug!(
        program = %program,
        args = ?cmd.get_args().collect::<Vec<_>>(),
        timeout_s = timeout.as_secs(),
        "spawning command"
    );
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RuntimeError::Spawn {
            program: program.clone(),
            source,
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match wait_until(&mut child, Instant::now() + timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            debug!(program = %program, "command timed out; killed");
            return Err(RuntimeError::TimedOut {
                program,
                after: timeout,
            });
        }
        Err(source) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(RuntimeError::Wait { program, source });
        }
    };

    let out = CommandOutput {
        code: status.code().unwrap_or(-1),
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    };
    debug!(program = %program, code = out.code, "command finished");
    Ok(out)
}

fn wait_until(
    child: &mut Child,
    deadline: Instant,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut p) = pipe {
            let _ = p.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).to_string()
    })
}
