//! Local issue store commands

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::IssueRef;
use crate::storage::Workspace;

#[derive(Subcommand)]
pub enum IssueCommands {
    /// Store an issue body (from a file or stdin)
    Put {
        /// Issue reference (owner/repo#number)
        issue: String,

        /// Read the body from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Issue title
        #[arg(long)]
        title: Option<String>,
    },

    /// Print a stored issue body
    Get {
        /// Issue reference (owner/repo#number)
        issue: String,
    },
}

pub fn run(cmd: IssueCommands, output: &Output) -> Result<()> {
    match cmd {
        IssueCommands::Put { issue, file, title } => put(output, &issue, file, title.as_deref()),
        IssueCommands::Get { issue } => get(output, &issue),
    }
}

fn put(output: &Output, issue: &str, file: Option<PathBuf>, title: Option<&str>) -> Result<()> {
    let issue: IssueRef = issue.parse()?;
    let workspace = Workspace::open_current()?;

    let body = match file {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read body: {}", path.display()))?,
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read body from stdin")?;
            body
        }
    };

    let store = workspace.issue_store();
    store.write(&issue, &body, title)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "issue": issue,
            "path": store.issue_path(&issue),
            "bytes": body.len(),
        }));
    } else {
        output.success(&format!("Stored {} ({} bytes)", issue, body.len()));
    }

    Ok(())
}

fn get(output: &Output, issue: &str) -> Result<()> {
    let issue: IssueRef = issue.parse()?;
    let workspace = Workspace::open_current()?;

    let stored = workspace
        .issue_store()
        .read(&issue)?
        .ok_or_else(|| anyhow::anyhow!("Issue not found in store: {}", issue))?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "issue": issue,
            "title": stored.meta.title,
            "updated_at": stored.meta.updated_at,
            "body": stored.body,
        }));
        return Ok(());
    }

    output.document(&stored.body)
}
