//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Workspace setup | `init` |
//! | Sections | Update issue bodies through the gateway | `status`, `notify`, `show` |
//! | Render | Pure stdin → stdout transform | `render status`, `render notify` |
//! | Store | Local issue bodies | `issue put`, `issue get` |
//! | Gateway | External gateway diagnostics | `gateway check` |
//!
//! ## Output Formats
//!
//! All commands support `--format text|json`. Without the flag the global
//! config's `default_format` applies.
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `--verbose` enables debug
//! level; `RUST_LOG` overrides both.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod gateway_cmd;
mod issue_cmd;
mod output;
mod render_cmd;
mod section_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
