//! Section kinds and their anchor specs
//!
//! Each managed section is bounded by a markdown header on the left and an
//! invisible HTML comment (the anchor marker) on the right:
//!
//! ```text
//! ## Status
//!
//! Current challenger: @octocat
//! <!-- probot:Status -->
//! ```
//!
//! Everything between the header line and the marker is the replaceable span.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Placeholder text written into a freshly inserted section
const PLACEHOLDER: &str = "xxx";

/// Kind of machine-managed section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Status,
    Notification,
}

impl SectionKind {
    /// All managed kinds, in the order they are rendered by `show`
    pub fn all() -> &'static [SectionKind] {
        &[SectionKind::Status, SectionKind::Notification]
    }

    /// Returns the anchor spec for this kind
    pub fn spec(&self) -> &'static AnchorSpec {
        match self {
            SectionKind::Status => &STATUS_SPEC,
            SectionKind::Notification => &NOTIFICATION_SPEC,
        }
    }

    /// Compiled patterns for this kind's header and marker
    pub fn patterns(&self) -> &'static SectionPatterns {
        match self {
            SectionKind::Status => &STATUS_PATTERNS,
            SectionKind::Notification => &NOTIFICATION_PATTERNS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Status => "status",
            SectionKind::Notification => "notification",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable description of how one section kind is anchored in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSpec {
    /// Header line, inserted with exactly this casing
    pub header: &'static str,

    /// Invisible marker closing the replaceable span
    pub marker: &'static str,

    /// Text placed before the marker when the section is created
    pub placeholder: &'static str,
}

pub const STATUS_SPEC: AnchorSpec = AnchorSpec {
    header: "## Status",
    marker: "<!-- probot:Status -->",
    placeholder: PLACEHOLDER,
};

pub const NOTIFICATION_SPEC: AnchorSpec = AnchorSpec {
    header: "## :warning:Notification:warning:",
    marker: "<!-- probot:Notification -->",
    placeholder: PLACEHOLDER,
};

impl AnchorSpec {
    /// Block appended to a document that has no header for this kind yet
    pub fn template(&self) -> String {
        format!(
            "\n\n\n{}\n\n{}{}\n\n",
            self.header, self.placeholder, self.marker
        )
    }
}

/// Case-insensitive matchers built from an [`AnchorSpec`]
#[derive(Debug)]
pub struct SectionPatterns {
    /// Header text anywhere in a document
    pub header: Regex,

    /// Header, the rest of its line, and the line breaks that follow it.
    /// The match end is where the replaceable span begins.
    pub header_line: Regex,

    pub marker: Regex,
}

impl SectionPatterns {
    fn compile(spec: &AnchorSpec) -> Self {
        let header = regex::escape(spec.header);

        Self {
            header: case_insensitive(&header),
            header_line: case_insensitive(&format!(r"{}[^\r\n]*[\r\n]+", header)),
            marker: case_insensitive(&regex::escape(spec.marker)),
        }
    }
}

static STATUS_PATTERNS: Lazy<SectionPatterns> =
    Lazy::new(|| SectionPatterns::compile(&STATUS_SPEC));

static NOTIFICATION_PATTERNS: Lazy<SectionPatterns> =
    Lazy::new(|| SectionPatterns::compile(&NOTIFICATION_SPEC));

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("escaped section pattern")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_template_layout() {
        assert_eq!(
            STATUS_SPEC.template(),
            "\n\n\n## Status\n\nxxx<!-- probot:Status -->\n\n"
        );
    }

    #[test]
    fn notification_template_layout() {
        assert_eq!(
            NOTIFICATION_SPEC.template(),
            "\n\n\n## :warning:Notification:warning:\n\nxxx<!-- probot:Notification -->\n\n"
        );
    }

    #[test]
    fn markers_are_unique_per_kind() {
        assert_ne!(STATUS_SPEC.marker, NOTIFICATION_SPEC.marker);
    }

    #[test]
    fn header_pattern_ignores_case() {
        let pattern = &SectionKind::Status.patterns().header;
        assert!(pattern.is_match("intro\n## STATUS\n"));
        assert!(pattern.is_match("## status"));
        assert!(!pattern.is_match("# Status"));
    }

    #[test]
    fn header_pattern_escapes_emoji_shortcodes() {
        let pattern = &SectionKind::Notification.patterns().header;
        assert!(pattern.is_match("## :WARNING:notification:warning:"));
        assert!(!pattern.is_match("## Notification"));
    }

    #[test]
    fn header_line_ends_after_blank_lines() {
        let pattern = &SectionKind::Status.patterns().header_line;
        let doc = "## Status (managed)\r\n\r\nbody";

        assert_eq!(pattern.find(doc).unwrap().end(), doc.len() - "body".len());
    }

    #[test]
    fn kind_spec_lookup() {
        assert_eq!(SectionKind::Status.spec(), &STATUS_SPEC);
        assert_eq!(SectionKind::Notification.spec(), &NOTIFICATION_SPEC);
    }
}
