//! Workspace management
//!
//! Handles workspace initialization and provides access to the issue store
//! and the configured gateway.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::{GatewayKind, WorkspaceConfig};
use super::issue_store::FileIssueStore;
use crate::gateway::{IssueGateway, ProcessGateway};

/// Name of the workspace directory
pub const WORKSPACE_DIR: &str = ".issues";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Not in an issue-sections workspace. Run 'issue-sections init' first.")]
    NotInWorkspace,
}

const DEFAULT_CONFIG: &str = r#"# issue-sections configuration

[gateway]
# "file" keeps issue bodies under .issues/issues/
# "command" hands get/update requests to an external executable
kind = "file"
# command = "issue-gateway-github"

[updates]
# Ignore updates triggered by bot accounts
skip_bot_events = true
"#;

const GITIGNORE: &str = r#"# Per-issue lock files
issues/**/*.lock
issues/**/*.tmp
"#;

/// An issue-sections workspace
pub struct Workspace {
    root: PathBuf,
    config: WorkspaceConfig,
}

impl Workspace {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(WORKSPACE_DIR).is_dir() {
            return Err(WorkspaceError::NotInWorkspace.into());
        }

        let config = WorkspaceConfig::load(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = WorkspaceConfig::find_root().ok_or(WorkspaceError::NotInWorkspace)?;
        Self::open(root)
    }

    /// Initializes a workspace at the given path, keeping existing files
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let ws_dir = root.join(WORKSPACE_DIR);

        for dir in [ws_dir.join("issues"), ws_dir.join("gateways")] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let config_path = ws_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = ws_dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, GITIGNORE).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        tracing::debug!(root = %root.display(), "workspace initialized");
        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.issues` directory path
    pub fn workspace_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Directory holding issue bodies for the file gateway
    pub fn issues_dir(&self) -> PathBuf {
        self.workspace_dir().join("issues")
    }

    /// Directory searched for gateway executables before `$PATH`
    pub fn gateways_dir(&self) -> PathBuf {
        self.workspace_dir().join("gateways")
    }

    pub fn issue_store(&self) -> FileIssueStore {
        FileIssueStore::new(self.issues_dir())
    }

    /// Builds the gateway selected by `gateway.kind`
    pub fn gateway(&self) -> Result<Box<dyn IssueGateway>> {
        let gateway = &self.config.gateway;

        match gateway.kind {
            GatewayKind::File => Ok(Box::new(self.issue_store())),
            GatewayKind::Command => {
                let command = gateway.require_command()?;
                let process = ProcessGateway::resolve(command, &[self.gateways_dir()])?;
                Ok(Box::new(process))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path()).unwrap();

        assert!(workspace.workspace_dir().is_dir());
        assert!(workspace.issues_dir().is_dir());
        assert!(workspace.gateways_dir().is_dir());
        assert!(workspace.workspace_dir().join("config.toml").is_file());
        assert!(workspace.workspace_dir().join(".gitignore").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Workspace::init(dir.path()).unwrap();
        fs::write(
            dir.path().join(WORKSPACE_DIR).join("config.toml"),
            "[updates]\nskip_bot_events = false\n",
        )
        .unwrap();

        let workspace = Workspace::init(dir.path()).unwrap();
        assert!(!workspace.config().updates.skip_bot_events);
    }

    #[test]
    fn default_config_parses() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path()).unwrap();

        assert_eq!(workspace.config().gateway.kind, GatewayKind::File);
        assert!(workspace.config().updates.skip_bot_events);
    }

    #[test]
    fn open_non_workspace_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Workspace::open(dir.path()).is_err());
    }

    #[test]
    fn command_gateway_without_command_fails() {
        let dir = TempDir::new().unwrap();
        Workspace::init(dir.path()).unwrap();
        fs::write(
            dir.path().join(WORKSPACE_DIR).join("config.toml"),
            "[gateway]\nkind = \"command\"\n",
        )
        .unwrap();

        let workspace = Workspace::open(dir.path()).unwrap();
        assert!(workspace.gateway().is_err());
    }

    #[test]
    fn file_gateway_by_default() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path()).unwrap();

        assert!(workspace.gateway().is_ok());
        assert!(workspace.issue_store().dir().ends_with("issues"));
    }
}
