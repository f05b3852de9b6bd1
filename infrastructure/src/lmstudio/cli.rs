//! Wrapper around the LM Studio `lms` command line tool
//!
//! Model metadata (including whether a model was trained for tool use) and
//! server management are only exposed through `lms`, not over HTTP.

use lmagent_application::GatewayError;
use lmagent_domain::ModelRecord;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

const LIST_TIMEOUT: Duration = Duration::from_secs(30);
const STATUS_TIMEOUT: Duration = Duration::from_secs(10);
const START_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct LmsCli {
    program: PathBuf,
}

impl LmsCli {
    /// Locate `lms` on `PATH`.
    pub fn detect() -> Result<Self, GatewayError> {
        let program = which::which("lms").map_err(|_| {
            GatewayError::ConnectionError(
                "LM Studio CLI 'lms' not found. Ensure LM Studio is installed and 'lms' is on PATH"
                    .to_string(),
            )
        })?;
        debug!(path = %program.display(), "Found lms");
        Ok(Self { program })
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `lms ls --json`
    pub async fn list_models(&self) -> Result<Vec<ModelRecord>, GatewayError> {
        let output = self.run(&["ls", "--json"], LIST_TIMEOUT).await?;
        parse_model_list(&output)
    }

    /// Start the local server unless `lms server status` says it is running.
    pub async fn ensure_server_running(&self) -> Result<(), GatewayError> {
        let status = self.run(&["server", "status"], STATUS_TIMEOUT).await?;
        if server_running(&status) {
            debug!("LM Studio server already running");
            return Ok(());
        }

        info!("Starting LM Studio server");
        self.run(&["server", "start"], START_TIMEOUT).await?;
        info!("LM Studio server started");
        Ok(())
    }

    /// Run `lms` with `args`, returning stdout followed by stderr.
    async fn run(&self, args: &[&str], timeout: Duration) -> Result<String, GatewayError> {
        let joined = args.join(" ");
        debug!(command = %joined, "Running lms");

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GatewayError::ConnectionError(format!("Failed to run lms: {}", e)))?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| GatewayError::Timeout(format!("lms {}", joined)))?
            .map_err(|e| GatewayError::ConnectionError(format!("Failed to run lms: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            return Err(GatewayError::RequestFailed(format!(
                "lms {} failed: {}",
                joined,
                stderr.trim()
            )));
        }
        Ok(format!("{}{}", stdout, stderr))
    }
}

/// Parse `lms ls --json` output. Leading log lines before the array are skipped.
pub fn parse_model_list(output: &str) -> Result<Vec<ModelRecord>, GatewayError> {
    let json = output
        .find('[')
        .map(|start| &output[start..])
        .ok_or_else(|| GatewayError::InvalidResponse("No model list in lms output".to_string()))?;

    let mut stream = serde_json::Deserializer::from_str(json).into_iter::<Vec<ModelRecord>>();
    match stream.next() {
        Some(Ok(models)) => Ok(models),
        Some(Err(e)) => Err(GatewayError::InvalidResponse(format!(
            "Failed to parse model list: {}",
            e
        ))),
        None => Err(GatewayError::InvalidResponse("Empty model list".to_string())),
    }
}

fn server_running(status: &str) -> bool {
    let lowered = status.to_lowercase();
    !lowered.contains("not running") && lowered.contains("running")
}
