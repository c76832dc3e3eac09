//! issue-sections - keeps bot-managed sections in GitHub issue bodies

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = issue_sections::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
