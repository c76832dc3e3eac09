//! Issue references
//!
//! Format: `{owner}/{repo}#{number}` (e.g., `pingcap/tidb#42`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IssueRefError {
    #[error("Invalid issue reference: expected '{{owner}}/{{repo}}#{{number}}', got '{0}'")]
    InvalidFormat(String),

    #[error("Invalid issue number: {0}")]
    InvalidNumber(String),

    #[error("Invalid owner or repository name: '{0}'")]
    InvalidName(String),
}

/// Reference to a single issue in a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueRef {
    owner: String,
    repo: String,
    number: u64,
}

impl IssueRef {
    pub fn new(owner: &str, repo: &str, number: u64) -> Result<Self, IssueRefError> {
        validate_name(owner)?;
        validate_name(repo)?;
        if number == 0 {
            return Err(IssueRefError::InvalidNumber(number.to_string()));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    /// Relative path of this issue in a directory-per-repository layout
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        PathBuf::from(&self.owner)
            .join(&self.repo)
            .join(format!("{}.{}", self.number, extension))
    }
}

/// Owner and repository names: ASCII alphanumerics plus `-`, `_`, `.`,
/// never `.` or `..` on their own
fn validate_name(name: &str) -> Result<(), IssueRefError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(IssueRefError::InvalidName(name.to_string()))
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

impl FromStr for IssueRef {
    type Err = IssueRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (slug, number) = s
            .split_once('#')
            .ok_or_else(|| IssueRefError::InvalidFormat(s.to_string()))?;
        let (owner, repo) = slug
            .split_once('/')
            .ok_or_else(|| IssueRefError::InvalidFormat(s.to_string()))?;

        let number: u64 = number
            .parse()
            .map_err(|_| IssueRefError::InvalidNumber(number.to_string()))?;

        Self::new(owner, repo, number)
    }
}

impl TryFrom<String> for IssueRef {
    type Error = IssueRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IssueRef> for String {
    fn from(issue: IssueRef) -> Self {
        issue.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let issue: IssueRef = "pingcap/tidb#42".parse().unwrap();

        assert_eq!(issue.owner(), "pingcap");
        assert_eq!(issue.repo(), "tidb");
        assert_eq!(issue.number(), 42);
        assert_eq!(issue.to_string(), "pingcap/tidb#42");
    }

    #[test]
    fn parse_trims_whitespace() {
        let issue: IssueRef = "  tikv/tikv#7 ".parse().unwrap();
        assert_eq!(issue.to_string(), "tikv/tikv#7");
    }

    #[test]
    fn parse_rejects_missing_parts() {
        assert!(matches!(
            "pingcap/tidb".parse::<IssueRef>(),
            Err(IssueRefError::InvalidFormat(_))
        ));
        assert!(matches!(
            "tidb#42".parse::<IssueRef>(),
            Err(IssueRefError::InvalidFormat(_))
        ));
    }

    #[test]
    fn parse_rejects_bad_number() {
        assert_eq!(
            "pingcap/tidb#abc".parse::<IssueRef>(),
            Err(IssueRefError::InvalidNumber("abc".to_string()))
        );
        assert!("pingcap/tidb#0".parse::<IssueRef>().is_err());
    }

    #[test]
    fn parse_rejects_path_traversal() {
        assert_eq!(
            "../tidb#1".parse::<IssueRef>(),
            Err(IssueRefError::InvalidName("..".to_string()))
        );
        assert!("pingcap/ti db#1".parse::<IssueRef>().is_err());
    }

    #[test]
    fn relative_path_layout() {
        let issue: IssueRef = "pingcap/tidb#42".parse().unwrap();
        assert_eq!(
            issue.relative_path("md"),
            PathBuf::from("pingcap").join("tidb").join("42.md")
        );
    }

    #[test]
    fn serde_as_string() {
        let issue: IssueRef = "pingcap/tidb#42".parse().unwrap();
        let json = serde_json::to_string(&issue).unwrap();
        assert_eq!(json, "\"pingcap/tidb#42\"");

        let parsed: IssueRef = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, issue);
    }
}
