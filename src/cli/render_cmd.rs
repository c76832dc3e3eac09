//! Offline rendering: body in on stdin (or a file), updated body out on stdout

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{upsert_section, NotificationContent, SectionContent, StatusContent};

#[derive(Subcommand)]
pub enum RenderCommands {
    /// Write the Status section
    Status {
        /// Login of the current challenger
        #[arg(long)]
        challenger: Option<String>,

        /// Challenge program the issue belongs to
        #[arg(long)]
        program: Option<String>,

        /// Read the body from this file instead of stdin
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Write the Notification section
    Notify {
        /// Notification message
        message: String,

        /// Login to mention in front of the message
        #[arg(long)]
        sender: Option<String>,

        /// Read the body from this file instead of stdin
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
}

pub fn run(cmd: RenderCommands, output: &Output) -> Result<()> {
    let (content, input) = match cmd {
        RenderCommands::Status {
            challenger,
            program,
            input,
        } => (
            SectionContent::from(StatusContent::from_parts(challenger, program)),
            input,
        ),
        RenderCommands::Notify {
            message,
            sender,
            input,
        } => (
            SectionContent::from(NotificationContent::new(message, sender)),
            input,
        ),
    };

    let body = read_body(input)?;
    let rendered = upsert_section(&body, &content);

    if output.is_json() {
        output.data(&serde_json::json!({
            "section": content.kind(),
            "changed": rendered != body,
            "body": rendered,
        }));
        return Ok(());
    }

    output.document(&rendered)
}

fn read_body(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read body: {}", path.display())),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read body from stdin")?;
            Ok(body)
        }
    }
}
