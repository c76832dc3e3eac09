//! Section updates through an issue gateway
//!
//! Each update is a read-modify-write of the issue body: fetch, upsert the
//! section, persist if anything changed.

use anyhow::Result;
use serde::Serialize;

use super::IssueGateway;
use crate::domain::{upsert_section, IssueRef, NotificationContent, SectionContent, StatusContent};

/// Who triggered the event behind an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    #[default]
    User,
    Bot,
}

/// What an update did to the issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The new body was persisted
    Updated { body: String },

    /// The section already held this content, or could not be located
    Unchanged,

    /// The event came from a bot and was ignored
    SkippedBot,
}

/// Applies section updates to issues behind a gateway
pub struct SectionUpdater<'a> {
    gateway: &'a dyn IssueGateway,
    skip_bot_events: bool,
}

impl<'a> SectionUpdater<'a> {
    pub fn new(gateway: &'a dyn IssueGateway) -> Self {
        Self {
            gateway,
            skip_bot_events: true,
        }
    }

    pub fn skip_bot_events(mut self, skip: bool) -> Self {
        self.skip_bot_events = skip;
        self
    }

    /// Writes `content` into its section of `issue`, creating the section if needed
    pub fn upsert(
        &self,
        issue: &IssueRef,
        content: &SectionContent,
        origin: EventOrigin,
    ) -> Result<UpdateOutcome> {
        let kind = content.kind();

        if origin == EventOrigin::Bot && self.skip_bot_events {
            tracing::debug!(%issue, %kind, "skipping update triggered by a bot");
            return Ok(UpdateOutcome::SkippedBot);
        }

        let outcome = match self
            .gateway
            .modify(issue, &|body: &str| upsert_section(body, content))?
        {
            Some(body) => {
                tracing::info!(%issue, %kind, "section updated");
                UpdateOutcome::Updated { body }
            }
            None => {
                tracing::debug!(%issue, %kind, "section unchanged");
                UpdateOutcome::Unchanged
            }
        };

        Ok(outcome)
    }

    /// Sets the Status section from the current challenger and program
    pub fn create_or_update_status(
        &self,
        issue: &IssueRef,
        challenger: Option<String>,
        program: Option<String>,
        origin: EventOrigin,
    ) -> Result<UpdateOutcome> {
        let content = SectionContent::from(StatusContent::from_parts(challenger, program));
        self.upsert(issue, &content, origin)
    }

    /// Sets the Notification section, mentioning `sender` when given
    pub fn create_or_update_notification(
        &self,
        issue: &IssueRef,
        message: &str,
        sender: Option<String>,
        origin: EventOrigin,
    ) -> Result<UpdateOutcome> {
        let content = SectionContent::from(NotificationContent::new(message, sender));
        self.upsert(issue, &content, origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Gateway keeping bodies in memory and counting writes
    #[derive(Default)]
    struct MemoryGateway {
        bodies: RefCell<HashMap<IssueRef, String>>,
        writes: RefCell<usize>,
    }

    impl MemoryGateway {
        fn with(issue: &IssueRef, body: &str) -> Self {
            let gateway = Self::default();
            gateway.bodies.borrow_mut().insert(issue.clone(), body.to_string());
            gateway
        }

        fn body(&self, issue: &IssueRef) -> String {
            self.bodies.borrow()[issue].clone()
        }
    }

    impl IssueGateway for MemoryGateway {
        fn get(&self, issue: &IssueRef) -> Result<String> {
            self.bodies
                .borrow()
                .get(issue)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no such issue: {}", issue))
        }

        fn update(&self, issue: &IssueRef, body: &str) -> Result<()> {
            *self.writes.borrow_mut() += 1;
            self.bodies.borrow_mut().insert(issue.clone(), body.to_string());
            Ok(())
        }
    }

    fn issue() -> IssueRef {
        "pingcap/tidb#42".parse().unwrap()
    }

    #[test]
    fn status_update_creates_section() {
        let gateway = MemoryGateway::with(&issue(), "\n        tidb\n        tikv\n");
        let updater = SectionUpdater::new(&gateway);

        let outcome = updater
            .create_or_update_status(
                &issue(),
                Some("asuka730".to_string()),
                Some("chanllenge1".to_string()),
                EventOrigin::User,
            )
            .unwrap();

        let expected = "\n        tidb\n        tikv\n\n\n\n## Status\n\nCurrent challenger: @asuka730\nCurrent Program: chanllenge1\n<!-- probot:Status -->\n\n";
        assert_eq!(outcome, UpdateOutcome::Updated { body: expected.to_string() });
        assert_eq!(gateway.body(&issue()), expected);
    }

    #[test]
    fn notification_update_mentions_sender() {
        let gateway = MemoryGateway::with(&issue(), "");
        let updater = SectionUpdater::new(&gateway);

        updater
            .create_or_update_notification(
                &issue(),
                "gave up the challenge.",
                Some("octocat".to_string()),
                EventOrigin::User,
            )
            .unwrap();

        assert!(gateway
            .body(&issue())
            .contains("@octocat gave up the challenge.<!-- probot:Notification -->"));
    }

    #[test]
    fn repeated_update_does_not_write() {
        let gateway = MemoryGateway::with(&issue(), "body\n");
        let updater = SectionUpdater::new(&gateway);

        updater
            .create_or_update_status(&issue(), None, None, EventOrigin::User)
            .unwrap();
        let outcome = updater
            .create_or_update_status(&issue(), None, None, EventOrigin::User)
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert_eq!(*gateway.writes.borrow(), 1);
    }

    #[test]
    fn bot_events_are_skipped() {
        let gateway = MemoryGateway::with(&issue(), "body\n");
        let updater = SectionUpdater::new(&gateway);

        let outcome = updater
            .create_or_update_notification(&issue(), "hi", None, EventOrigin::Bot)
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::SkippedBot);
        assert_eq!(gateway.body(&issue()), "body\n");
    }

    #[test]
    fn bot_events_applied_when_allowed() {
        let gateway = MemoryGateway::with(&issue(), "body\n");
        let updater = SectionUpdater::new(&gateway).skip_bot_events(false);

        let outcome = updater
            .create_or_update_notification(&issue(), "hi", None, EventOrigin::Bot)
            .unwrap();

        assert!(matches!(outcome, UpdateOutcome::Updated { .. }));
    }

    #[test]
    fn malformed_section_is_left_alone() {
        let body = "## Status\n\nmarker was deleted by hand\n";
        let gateway = MemoryGateway::with(&issue(), body);
        let updater = SectionUpdater::new(&gateway);

        let outcome = updater
            .create_or_update_status(&issue(), Some("octocat".to_string()), None, EventOrigin::User)
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert_eq!(gateway.body(&issue()), body);
        assert_eq!(*gateway.writes.borrow(), 0);
    }

    #[test]
    fn missing_issue_propagates_error() {
        let gateway = MemoryGateway::default();
        let updater = SectionUpdater::new(&gateway);

        assert!(updater
            .create_or_update_status(&issue(), None, None, EventOrigin::User)
            .is_err());
    }
}
