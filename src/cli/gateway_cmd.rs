//! Gateway commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::gateway::ProcessGateway;
use crate::storage::{GatewayKind, Workspace};

#[derive(Subcommand)]
pub enum GatewayCommands {
    /// Show the configured gateway and verify its manifest
    Check,
}

pub fn run(cmd: GatewayCommands, output: &Output) -> Result<()> {
    match cmd {
        GatewayCommands::Check => check(output),
    }
}

fn check(output: &Output) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let config = &workspace.config().gateway;

    match config.kind {
        GatewayKind::File => {
            let dir = workspace.issues_dir();
            if output.is_json() {
                output.data(&serde_json::json!({
                    "kind": config.kind,
                    "dir": dir,
                    "ok": true,
                }));
            } else {
                output.success(&format!("File gateway: {}", dir.display()));
            }
        }
        GatewayKind::Command => {
            let command = config.require_command()?;
            let gateway = ProcessGateway::resolve(command, &[workspace.gateways_dir()])?;
            let manifest = gateway.manifest()?;
            let missing = manifest.missing_operations();

            if output.is_json() {
                output.data(&serde_json::json!({
                    "kind": config.kind,
                    "path": gateway.path(),
                    "manifest": manifest,
                    "missing_operations": missing,
                    "ok": missing.is_empty(),
                }));
            } else {
                println!("Command gateway: {}", gateway.path().display());
                println!("  {} {}", manifest.name, manifest.version);
                if !manifest.description.is_empty() {
                    println!("  {}", manifest.description);
                }
                println!("  operations: {}", manifest.operations.join(", "));
            }

            if !missing.is_empty() {
                anyhow::bail!(
                    "Gateway {} does not support: {}",
                    manifest.name,
                    missing.join(", ")
                );
            }
        }
    }

    Ok(())
}
