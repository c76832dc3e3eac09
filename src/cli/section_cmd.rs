//! Section update commands (`status`, `notify`, `show`)

use anyhow::Result;
use serde::Serialize;

use super::output::Output;
use crate::domain::{
    find_mentor_and_score, has_section, locate, IssueRef, MentorAndScore, SectionKind,
};
use crate::gateway::{EventOrigin, SectionUpdater, UpdateOutcome};
use crate::storage::Workspace;

fn origin(bot: bool) -> EventOrigin {
    if bot {
        EventOrigin::Bot
    } else {
        EventOrigin::User
    }
}

pub fn status(
    output: &Output,
    issue: &str,
    challenger: Option<String>,
    program: Option<String>,
    bot: bool,
) -> Result<()> {
    let issue: IssueRef = issue.parse()?;
    let workspace = Workspace::open_current()?;
    let gateway = workspace.gateway()?;

    let updater = SectionUpdater::new(&*gateway)
        .skip_bot_events(workspace.config().updates.skip_bot_events);
    let outcome = updater.create_or_update_status(&issue, challenger, program, origin(bot))?;

    report(output, &issue, SectionKind::Status, &outcome);
    Ok(())
}

pub fn notify(
    output: &Output,
    issue: &str,
    message: &str,
    sender: Option<String>,
    bot: bool,
) -> Result<()> {
    let issue: IssueRef = issue.parse()?;
    let workspace = Workspace::open_current()?;
    let gateway = workspace.gateway()?;

    let updater = SectionUpdater::new(&*gateway)
        .skip_bot_events(workspace.config().updates.skip_bot_events);
    let outcome = updater.create_or_update_notification(&issue, message, sender, origin(bot))?;

    report(output, &issue, SectionKind::Notification, &outcome);
    Ok(())
}

fn report(output: &Output, issue: &IssueRef, kind: SectionKind, outcome: &UpdateOutcome) {
    if output.is_json() {
        output.data(&serde_json::json!({
            "issue": issue,
            "section": kind,
            "result": outcome,
        }));
        return;
    }

    let message = match outcome {
        UpdateOutcome::Updated { .. } => format!("Updated {} section of {}", kind, issue),
        UpdateOutcome::Unchanged => format!("{} section of {} unchanged", kind, issue),
        UpdateOutcome::SkippedBot => {
            format!("Skipped {} update of {}: triggered by a bot", kind, issue)
        }
    };
    output.success(&message);
}

#[derive(Debug, Serialize)]
struct SectionView {
    kind: SectionKind,
    present: bool,
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ShowResult {
    issue: IssueRef,
    sections: Vec<SectionView>,
    metadata: Option<MentorAndScore>,
}

pub fn show(output: &Output, issue: &str) -> Result<()> {
    let issue: IssueRef = issue.parse()?;
    let workspace = Workspace::open_current()?;
    let body = workspace.gateway()?.get(&issue)?;

    let sections = SectionKind::all()
        .iter()
        .map(|&kind| SectionView {
            kind,
            present: has_section(&body, kind),
            content: locate(&body, kind).map(|span| span.text),
        })
        .collect();

    let result = ShowResult {
        issue,
        sections,
        metadata: find_mentor_and_score(&body),
    };

    if output.is_json() {
        output.data(&result);
        return Ok(());
    }

    println!("Issue: {}", result.issue);
    match &result.metadata {
        Some(meta) => println!("Mentor: @{}  Score: {}", meta.mentor, meta.score),
        None => println!("Mentor/Score: not found"),
    }

    for section in &result.sections {
        println!();
        match (&section.content, section.present) {
            (Some(content), _) => {
                println!("[{}]", section.kind);
                println!("{}", content.trim_end());
            }
            (None, true) => {
                println!("[{}] header present but anchor marker missing", section.kind)
            }
            (None, false) => println!("[{}] not present", section.kind),
        }
    }

    Ok(())
}
