//! File storage for issue bodies
//!
//! Each issue lives at `.issues/issues/{owner}/{repo}/{number}.md` with YAML
//! frontmatter for metadata followed by the body exactly as written.
//! A sibling `{number}.md.lock` file serializes read-modify-write cycles.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::IssueRef;
use crate::gateway::IssueGateway;

const DELIMITER: &str = "---\n";

/// Frontmatter stored above the issue body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueFrontmatter {
    pub issue: IssueRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub updated_at: DateTime<Utc>,
}

/// An issue as stored on disk
#[derive(Debug, Clone, PartialEq)]
pub struct StoredIssue {
    pub meta: IssueFrontmatter,
    pub body: String,
}

/// Store for issue bodies as markdown files
pub struct FileIssueStore {
    dir: PathBuf,
}

impl FileIssueStore {
    /// Creates a store rooted at the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to an issue file
    pub fn issue_path(&self, issue: &IssueRef) -> PathBuf {
        self.dir.join(issue.relative_path("md"))
    }

    fn lock_path(&self, issue: &IssueRef) -> PathBuf {
        self.dir.join(issue.relative_path("md.lock"))
    }

    /// Opens (creating if needed) the per-issue lock file
    fn lock_file(&self, issue: &IssueRef) -> Result<File> {
        let path = self.lock_path(issue);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {}", path.display()))
    }

    /// Reads a stored issue, `None` if it was never stored
    pub fn read(&self, issue: &IssueRef) -> Result<Option<StoredIssue>> {
        // Unknown issues must not leave directories or lock files behind
        if !self.issue_path(issue).is_file() {
            return Ok(None);
        }

        let lock = self.lock_file(issue)?;
        lock.lock_shared()
            .with_context(|| format!("Failed to acquire read lock for {}", issue))?;

        // Lock is released when `lock` is dropped
        self.read_unlocked(issue)
    }

    /// Writes an issue body, keeping the existing title unless a new one is given
    pub fn write(&self, issue: &IssueRef, body: &str, title: Option<&str>) -> Result<()> {
        let lock = self.lock_file(issue)?;
        lock.lock_exclusive()
            .with_context(|| format!("Failed to acquire write lock for {}", issue))?;

        let existing_title = self.read_unlocked(issue)?.and_then(|s| s.meta.title);
        let title = title.map(str::to_string).or(existing_title);
        self.write_unlocked(issue, body, title)
    }

    fn read_unlocked(&self, issue: &IssueRef) -> Result<Option<StoredIssue>> {
        let path = self.issue_path(issue);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read issue file: {}", path.display()))?;

        parse_issue_file(&content)
            .with_context(|| format!("Failed to parse issue file: {}", path.display()))
            .map(Some)
    }

    /// Writes atomically (temp file + rename)
    fn write_unlocked(&self, issue: &IssueRef, body: &str, title: Option<String>) -> Result<()> {
        let path = self.issue_path(issue);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let stored = StoredIssue {
            meta: IssueFrontmatter {
                issue: issue.clone(),
                title,
                updated_at: Utc::now(),
            },
            body: body.to_string(),
        };
        let content = render_issue_file(&stored)?;

        let temp_path = path.with_extension("md.tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

        fs::rename(&temp_path, &path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl IssueGateway for FileIssueStore {
    fn get(&self, issue: &IssueRef) -> Result<String> {
        self.read(issue)?
            .map(|stored| stored.body)
            .ok_or_else(|| anyhow::anyhow!("Issue not found in store: {}", issue))
    }

    fn update(&self, issue: &IssueRef, body: &str) -> Result<()> {
        self.write(issue, body, None)
    }

    /// Holds the issue's exclusive lock across read, transform and write
    fn modify(
        &self,
        issue: &IssueRef,
        transform: &dyn Fn(&str) -> String,
    ) -> Result<Option<String>> {
        let lock = self.lock_file(issue)?;
        lock.lock_exclusive()
            .with_context(|| format!("Failed to acquire write lock for {}", issue))?;

        let stored = self
            .read_unlocked(issue)?
            .ok_or_else(|| anyhow::anyhow!("Issue not found in store: {}", issue))?;

        let updated = transform(&stored.body);
        if updated == stored.body {
            return Ok(None);
        }

        self.write_unlocked(issue, &updated, stored.meta.title)?;
        Ok(Some(updated))
    }
}

/// Splits `---\n{yaml}---\n{body}` into frontmatter and the untouched body
fn parse_issue_file(content: &str) -> Result<StoredIssue> {
    let rest = content
        .strip_prefix(DELIMITER)
        .ok_or_else(|| anyhow::anyhow!("Missing frontmatter (must start with ---)"))?;

    let yaml_end = if rest.starts_with(DELIMITER) {
        0
    } else {
        rest.find("\n---\n")
            .map(|pos| pos + 1)
            .ok_or_else(|| anyhow::anyhow!("Missing frontmatter end delimiter (---)"))?
    };

    let meta: IssueFrontmatter =
        serde_yaml::from_str(&rest[..yaml_end]).context("Failed to parse frontmatter")?;
    let body = rest[yaml_end + DELIMITER.len()..].to_string();

    Ok(StoredIssue { meta, body })
}

fn render_issue_file(stored: &StoredIssue) -> Result<String> {
    let yaml = serde_yaml::to_string(&stored.meta).context("Failed to serialize frontmatter")?;

    let mut content = String::with_capacity(yaml.len() + stored.body.len() + 8);
    content.push_str(DELIMITER);
    content.push_str(&yaml);
    if !yaml.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(DELIMITER);
    content.push_str(&stored.body);

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn issue() -> IssueRef {
        "pingcap/tidb#42".parse().unwrap()
    }

    #[test]
    fn read_missing_issue() {
        let dir = TempDir::new().unwrap();
        let store = FileIssueStore::new(dir.path());

        assert!(store.read(&issue()).unwrap().is_none());
        assert!(store.get(&issue()).is_err());
    }

    #[test]
    fn body_is_preserved_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let store = FileIssueStore::new(dir.path());
        let body = "\n        tidb\n        tikv\n---\nnot frontmatter\n\n\n";

        store.write(&issue(), body, Some("Speed up planner")).unwrap();

        assert_eq!(store.get(&issue()).unwrap(), body);
        let stored = store.read(&issue()).unwrap().unwrap();
        assert_eq!(stored.meta.title.as_deref(), Some("Speed up planner"));
        assert_eq!(stored.meta.issue, issue());
    }

    #[test]
    fn empty_body_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileIssueStore::new(dir.path());

        store.update(&issue(), "").unwrap();
        assert_eq!(store.get(&issue()).unwrap(), "");
    }

    #[test]
    fn update_keeps_title() {
        let dir = TempDir::new().unwrap();
        let store = FileIssueStore::new(dir.path());

        store.write(&issue(), "first", Some("Title")).unwrap();
        store.update(&issue(), "second").unwrap();

        let stored = store.read(&issue()).unwrap().unwrap();
        assert_eq!(stored.body, "second");
        assert_eq!(stored.meta.title.as_deref(), Some("Title"));
    }

    #[test]
    fn issue_file_layout() {
        let dir = TempDir::new().unwrap();
        let store = FileIssueStore::new(dir.path());

        store.update(&issue(), "body").unwrap();

        let path = dir.path().join("pingcap").join("tidb").join("42.md");
        assert_eq!(store.issue_path(&issue()), path);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("---\n"));
        assert!(content.contains("pingcap/tidb#42"));
        assert!(content.ends_with("---\nbody"));
    }

    #[test]
    fn modify_applies_transform() {
        let dir = TempDir::new().unwrap();
        let store = FileIssueStore::new(dir.path());
        store.update(&issue(), "hello").unwrap();

        let result = store
            .modify(&issue(), &|body: &str| format!("{} world", body))
            .unwrap();

        assert_eq!(result.as_deref(), Some("hello world"));
        assert_eq!(store.get(&issue()).unwrap(), "hello world");
    }

    #[test]
    fn modify_skips_unchanged_write() {
        let dir = TempDir::new().unwrap();
        let store = FileIssueStore::new(dir.path());
        store.update(&issue(), "hello").unwrap();
        let before = store.read(&issue()).unwrap().unwrap();

        let result = store.modify(&issue(), &|body: &str| body.to_string()).unwrap();

        assert!(result.is_none());
        assert_eq!(store.read(&issue()).unwrap().unwrap(), before);
    }

    #[test]
    fn modify_missing_issue_fails() {
        let dir = TempDir::new().unwrap();
        let store = FileIssueStore::new(dir.path());

        assert!(store.modify(&issue(), &|b: &str| b.to_string()).is_err());
    }

    #[test]
    fn read_missing_issue_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FileIssueStore::new(dir.path());

        assert!(store.read(&issue()).unwrap().is_none());
        assert!(store.get(&issue()).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn atomic_write_no_temp_file_left() {
        let dir = TempDir::new().unwrap();
        let store = FileIssueStore::new(dir.path());

        store.update(&issue(), "body").unwrap();

        let temp_path = store.issue_path(&issue()).with_extension("md.tmp");
        assert!(!temp_path.exists());
        assert!(store.issue_path(&issue()).is_file());
    }

    #[test]
    fn parse_rejects_missing_frontmatter() {
        assert!(parse_issue_file("just a body").is_err());
        assert!(parse_issue_file("---\nissue: a/b#1\n").is_err());
    }

    #[test]
    fn concurrent_modifications_are_serialized() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(FileIssueStore::new(dir.path()));
        store.update(&issue(), "").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .modify(&issue(), &|body: &str| format!("{}x", body))
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get(&issue()).unwrap(), "xxxxxxxx");
    }
}
