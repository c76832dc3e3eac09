//! Gateway backed by an external executable
//!
//! The executable is resolved from:
//! 1. An explicit path (anything containing a path separator)
//! 2. `.issues/gateways/`
//! 3. `PATH`

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use thiserror::Error;

use super::protocol::{GatewayManifest, GatewayRequest, GatewayResponse};
use super::IssueGateway;
use crate::domain::IssueRef;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway not found: {0}. Put it in .issues/gateways/ or on PATH.")]
    NotFound(String),

    #[error("Gateway is not executable: {0}")]
    NotExecutable(PathBuf),

    #[error("No response from gateway: {0}")]
    NoResponse(PathBuf),

    #[error("Gateway {operation} failed: {message}")]
    OperationFailed { operation: String, message: String },

    #[error("Gateway returned no body for {0}")]
    MissingBody(IssueRef),
}

/// Issue gateway that delegates to an external executable
#[derive(Debug, Clone)]
pub struct ProcessGateway {
    path: PathBuf,
}

impl ProcessGateway {
    /// Uses the executable at `path` as is
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves `command` against `search_dirs` first, then `PATH`
    pub fn resolve(command: &str, search_dirs: &[PathBuf]) -> Result<Self> {
        let explicit = Path::new(command);
        if explicit.components().count() > 1 {
            if is_executable(explicit) {
                return Ok(Self::new(explicit));
            }
            return Err(GatewayError::NotExecutable(explicit.to_path_buf()).into());
        }

        let path_dirs: Vec<PathBuf> = std::env::var_os("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();

        search_dirs
            .iter()
            .chain(path_dirs.iter())
            .map(|dir| dir.join(command))
            .find(|candidate| is_executable(candidate))
            .map(Self::new)
            .ok_or_else(|| GatewayError::NotFound(command.to_string()).into())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the manifest from the gateway
    pub fn manifest(&self) -> Result<GatewayManifest> {
        let output = Command::new(&self.path)
            .arg("--manifest")
            .output()
            .with_context(|| format!("Failed to execute gateway: {}", self.path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Gateway returned error: {}", stderr.trim());
        }

        serde_json::from_slice(&output.stdout).context("Failed to parse gateway manifest")
    }

    /// Executes a gateway request
    pub fn execute(&self, request: &GatewayRequest) -> Result<GatewayResponse> {
        tracing::debug!(
            gateway = %self.path.display(),
            operation = %request.operation,
            "executing gateway request"
        );

        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to spawn gateway: {}", self.path.display()))?;

        {
            let stdin = child
                .stdin
                .as_mut()
                .ok_or_else(|| anyhow::anyhow!("Failed to open gateway stdin"))?;
            let request_json =
                serde_json::to_string(request).context("Failed to serialize request")?;
            writeln!(stdin, "{}", request_json).context("Failed to write to gateway")?;
        }
        // Close stdin so the gateway sees EOF
        drop(child.stdin.take());

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to open gateway stdout"))?;
        let reader = BufReader::new(stdout);

        let response_line = reader
            .lines()
            .next()
            .ok_or_else(|| GatewayError::NoResponse(self.path.clone()))?
            .context("Failed to read gateway response")?;

        let response: GatewayResponse =
            serde_json::from_str(&response_line).context("Failed to parse gateway response")?;

        let status = child.wait().context("Failed to wait for gateway")?;
        if !status.success() {
            tracing::warn!(gateway = %self.path.display(), %status, "gateway exited with failure");
        }

        Ok(response)
    }

    fn execute_checked(&self, request: &GatewayRequest) -> Result<GatewayResponse> {
        let response = self.execute(request)?;

        if !response.success {
            return Err(GatewayError::OperationFailed {
                operation: request.operation.clone(),
                message: response
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            }
            .into());
        }

        Ok(response)
    }
}

impl IssueGateway for ProcessGateway {
    fn get(&self, issue: &IssueRef) -> Result<String> {
        let response = self.execute_checked(&GatewayRequest::get(issue))?;

        response
            .body()
            .ok_or_else(|| GatewayError::MissingBody(issue.clone()).into())
    }

    fn update(&self, issue: &IssueRef, body: &str) -> Result<()> {
        self.execute_checked(&GatewayRequest::update(issue, body))?;
        tracing::debug!(%issue, gateway = %self.path.display(), "issue body updated");
        Ok(())
    }
}

/// Checks if a file is executable
fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = path.metadata() {
            return meta.permissions().mode() & 0o111 != 0;
        }
    }

    #[cfg(windows)]
    {
        if let Some(ext) = path.extension() {
            return ext == "exe" || ext == "bat" || ext == "cmd";
        }
    }

    false
}
