//! The data-refresh pipeline: an ordered list of external acquisition
//! steps run once per cycle, each fully isolated from its neighbours'
//! failures.

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use tracing::{error, info};

/// One external data-acquisition step. Immutable once the daemon starts.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineStage {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl PipelineStage {
    pub fn new(name: &str, command: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Captured outcome of one external process. Consumed only for logging.
#[derive(Debug)]
pub struct StageResult {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StageResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// The download/benchmark scripts the daemon refreshes before each
/// simulation run, in execution order.
pub fn default_stages() -> Vec<PipelineStage> {
    [
        "download_svxy.ts",
        "download_gold.ts",
        "download_nanc.ts",
        "download_pelosi_stocks.ts",
        "download_goog.ts",
        "gen_benchmark.ts",
    ]
    .iter()
    .map(|script| PipelineStage::new(script, "bun", &["run", script]))
    .collect()
}

/// Load a stage list from a YAML file, replacing the built-in defaults.
pub fn load_stages(path: &Path) -> Result<Vec<PipelineStage>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read pipeline config {}: {}", path.display(), e))?;
    serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse pipeline config {}: {}", path.display(), e))
}

/// Run one stage to completion, capturing its output. Spawn failures are
/// returned as errors; they never panic or propagate further than the
/// pipeline loop.
pub async fn run_stage(stage: &PipelineStage, project_root: &Path) -> Result<StageResult, String> {
    let output = Command::new(&stage.command)
        .args(&stage.args)
        .current_dir(project_root)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| format!("Failed to spawn {}: {}", stage.name, e))?;

    Ok(StageResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run every stage in order. A stage's failure is logged and the pipeline
/// moves on; a failed download just means stale data until the next cycle.
pub async fn run_pipeline(stages: &[PipelineStage], project_root: &Path) {
    for stage in stages {
        info!("Running {}...", stage.name);
        match run_stage(stage, project_root).await {
            Ok(result) => {
                let stdout = result.stdout.trim();
                if !stdout.is_empty() {
                    info!("{}", stdout);
                }
                if !result.success() {
                    error!(
                        "{} failed (code {:?}): {}",
                        stage.name,
                        result.exit_code,
                        result.stderr.trim()
                    );
                }
            }
            Err(e) => error!("{} error: {}", stage.name, e),
        }
    }
}
