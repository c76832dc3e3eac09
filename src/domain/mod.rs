//! Domain models for issue sections
//!
//! Pure text transformations over issue bodies, without any I/O concerns.

mod content;
mod document;
mod issue_ref;
mod metadata;
mod section;

pub use content::{NotificationContent, SectionContent, StatusContent};
pub use document::{apply, ensure_section, has_section, locate, upsert_section, Span};
pub use issue_ref::{IssueRef, IssueRefError};
pub use metadata::{find_mentor_and_score, MentorAndScore};
pub use section::{AnchorSpec, SectionKind, SectionPatterns, NOTIFICATION_SPEC, STATUS_SPEC};
