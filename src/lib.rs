//! issue-sections - bot-managed sections in GitHub issue bodies
//!
//! Maintains a "Status" and a "Notification" section inside an otherwise
//! human-authored issue body. Sections are found by their markdown header and
//! an invisible HTML comment marker; only the text between the two is ever
//! rewritten.

pub mod cli;
pub mod domain;
pub mod gateway;
pub mod storage;

pub use domain::{
    apply, ensure_section, locate, upsert_section, IssueRef, SectionContent, SectionKind, Span,
};
