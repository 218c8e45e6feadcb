//! The simulation invocation: one run of the external trading binary per
//! cycle, output captured for logging only.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{error, info, warn};

use super::pipeline::StageResult;

/// How to launch the simulation binary. The working directory is always
/// the project root so the binary finds its snapshot files.
#[derive(Debug, Clone)]
pub struct SimulationCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Optional deadline for the whole run. A hang here would otherwise
    /// block every later cycle through the run lock.
    pub timeout: Option<Duration>,
}

impl SimulationCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Run the simulation once and log its outcome. The exit code is always
/// logged, even 0. The process is killed if the deadline expires.
pub async fn run_simulation(
    command: &SimulationCommand,
    project_root: &Path,
) -> Result<StageResult, String> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .current_dir(project_root)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output_future = cmd.output();

    let output = match command.timeout {
        Some(deadline) => tokio::time::timeout(deadline, output_future)
            .await
            .map_err(|_| {
                format!(
                    "{} timed out after {:.0}s",
                    command.program,
                    deadline.as_secs_f64()
                )
            })?,
        None => output_future.await,
    }
    .map_err(|e| format!("Failed to spawn {}: {}", command.program, e))?;

    let result = StageResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };

    let stdout = result.stdout.trim();
    if !stdout.is_empty() {
        info!("{}", stdout);
    }
    let stderr = result.stderr.trim();
    if !stderr.is_empty() {
        warn!("stderr: {}", stderr);
    }
    match result.exit_code {
        Some(code) => info!("{} exited with code {}", command.program, code),
        None => error!("{} terminated by signal", command.program),
    }

    Ok(result)
}
