//! # Issue Gateways
//!
//! Fetch and persist issue bodies, and apply section updates on top of them.
//!
//! ## Gateways
//!
//! | Gateway | Backing | Serialized per issue |
//! |---------|---------|----------------------|
//! | [`FileIssueStore`](crate::storage::FileIssueStore) | `.issues/issues/` | yes (`fs2` lock) |
//! | [`ProcessGateway`] | external executable | no, last write wins |
//!
//! ## Protocol
//!
//! ```text
//! CLI                          Gateway Binary
//!  │                               │
//!  ├── Spawn: issue-gateway-github │
//!  │                               │
//!  ├── Stdin: {"operation": "get", "params": {"owner": ..., "repo": ..., "number": ...}}
//!  │                               │
//!  └── Stdout: {"success": true, "data": {"body": "..."}}
//! ```
//!
//! Every gateway must support `--manifest` to declare its operations.

mod process;
mod protocol;
mod updater;

use anyhow::Result;

use crate::domain::IssueRef;

pub use process::{GatewayError, ProcessGateway};
pub use protocol::{GatewayManifest, GatewayRequest, GatewayResponse, REQUIRED_OPERATIONS};
pub use updater::{EventOrigin, SectionUpdater, UpdateOutcome};

/// Source and sink of issue bodies
pub trait IssueGateway {
    /// Fetches the current body of an issue
    fn get(&self, issue: &IssueRef) -> Result<String>;

    /// Replaces the body of an issue
    fn update(&self, issue: &IssueRef, body: &str) -> Result<()>;

    /// Reads the body, transforms it and writes it back if it changed.
    ///
    /// Returns the new body, or `None` when nothing was written. The default
    /// is an unguarded round trip; concurrent writers may overwrite each other.
    fn modify(
        &self,
        issue: &IssueRef,
        transform: &dyn Fn(&str) -> String,
    ) -> Result<Option<String>> {
        let current = self.get(issue)?;
        let updated = transform(&current);

        if updated == current {
            return Ok(None);
        }

        self.update(issue, &updated)?;
        Ok(Some(updated))
    }
}
