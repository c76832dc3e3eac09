//! # Storage Layer
//!
//! Workspace layout, configuration and the local issue store.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Issue bodies | Markdown + YAML frontmatter | `.issues/issues/{owner}/{repo}/{number}.md` |
//! | Config | TOML | `.issues/config.toml` |
//! | Gateways | Executables | `.issues/gateways/` |
//!
//! ## Concurrency Safety
//!
//! - [`FileIssueStore`] takes a per-issue `fs2` lock for every read and write,
//!   and holds the exclusive lock across a whole read-modify-write
//! - All writes are atomic (temp file + rename)

mod config;
mod issue_store;
mod workspace;

pub use config::{
    ConfigError, GatewayConfig, GatewayKind, GlobalConfig, OutputFormat, UpdatesConfig,
    WorkspaceConfig,
};
pub use issue_store::{FileIssueStore, IssueFrontmatter, StoredIssue};
pub use workspace::{Workspace, WorkspaceError, WORKSPACE_DIR};
