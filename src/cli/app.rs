//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{gateway_cmd, issue_cmd, render_cmd, section_cmd};
use crate::storage::{GlobalConfig, Workspace};

#[derive(Parser)]
#[command(name = "issue-sections")]
#[command(author, version, about = "Keeps bot-managed sections in GitHub issue bodies")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a workspace
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Create or update the Status section of an issue
    Status {
        /// Issue reference (owner/repo#number)
        issue: String,

        /// Login of the current challenger
        #[arg(long)]
        challenger: Option<String>,

        /// Challenge program the issue belongs to
        #[arg(long)]
        program: Option<String>,

        /// The triggering event came from a bot account
        #[arg(long)]
        bot: bool,
    },

    /// Create or update the Notification section of an issue
    Notify {
        /// Issue reference (owner/repo#number)
        issue: String,

        /// Notification message
        message: String,

        /// Login to mention in front of the message
        #[arg(long)]
        sender: Option<String>,

        /// The triggering event came from a bot account
        #[arg(long)]
        bot: bool,
    },

    /// Show the managed sections and challenge metadata of an issue
    Show {
        /// Issue reference (owner/repo#number)
        issue: String,
    },

    /// Rewrite a section of a body read from stdin and print the result
    #[command(subcommand)]
    Render(render_cmd::RenderCommands),

    /// Manage issue bodies in the local store
    #[command(subcommand)]
    Issue(issue_cmd::IssueCommands),

    /// Inspect the configured gateway
    #[command(subcommand)]
    Gateway(gateway_cmd::GatewayCommands),
}

/// Sends `tracing` output to stderr; `RUST_LOG` overrides the level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => GlobalConfig::load()?.default_format,
    };
    let output = Output::new(format);

    tracing::debug!("issue-sections starting");

    match cli.command {
        Commands::Init { path } => {
            let workspace = Workspace::init(&path)?;
            output.success(&format!(
                "Initialized issue-sections workspace at {}",
                workspace.root().display()
            ));
        }

        Commands::Status {
            issue,
            challenger,
            program,
            bot,
        } => section_cmd::status(&output, &issue, challenger, program, bot)?,

        Commands::Notify {
            issue,
            message,
            sender,
            bot,
        } => section_cmd::notify(&output, &issue, &message, sender, bot)?,

        Commands::Show { issue } => section_cmd::show(&output, &issue)?,

        Commands::Render(cmd) => render_cmd::run(cmd, &output)?,
        Commands::Issue(cmd) => issue_cmd::run(cmd, &output)?,
        Commands::Gateway(cmd) => gateway_cmd::run(cmd, &output)?,
    }

    Ok(())
}
