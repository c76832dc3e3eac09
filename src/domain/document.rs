//! Locating, creating and replacing managed sections in an issue body
//!
//! All functions here take a document snapshot and return a new one. They
//! never fail: a section that cannot be located leaves the document as it was.

use serde::Serialize;

use super::content::SectionContent;
use super::section::SectionKind;

/// Replaceable text of a located section, by byte offsets into the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Span {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Finds the span of the first `kind` section in `document`.
///
/// The span runs from the first character after the header line (and any
/// blank lines following it) up to the first anchor marker after that point.
pub fn locate(document: &str, kind: SectionKind) -> Option<Span> {
    let patterns = kind.patterns();

    let start = patterns.header_line.find(document)?.end();
    let end = patterns.marker.find_at(document, start)?.start();

    Some(Span {
        start,
        end,
        text: document[start..end].to_string(),
    })
}

/// Returns true if the header for `kind` occurs anywhere in `document`
pub fn has_section(document: &str, kind: SectionKind) -> bool {
    kind.patterns().header.is_match(document)
}

/// Appends the template for `kind` unless its header already exists
pub fn ensure_section(document: &str, kind: SectionKind) -> String {
    if has_section(document, kind) {
        return document.to_string();
    }

    let spec = kind.spec();
    tracing::debug!(%kind, "section header missing, appending template");
    let mut ensured = String::with_capacity(document.len() + spec.header.len() + 64);
    ensured.push_str(document);
    ensured.push_str(&spec.template());
    ensured
}

/// Replaces `span` in `document` with `new_text`.
///
/// The span must still describe `document` exactly; a stale span leaves the
/// document unchanged.
pub fn apply(document: &str, span: &Span, new_text: &str) -> String {
    match document.get(span.start..span.end) {
        Some(current) if current == span.text => {
            let mut updated =
                String::with_capacity(document.len() - current.len() + new_text.len());
            updated.push_str(&document[..span.start]);
            updated.push_str(new_text);
            updated.push_str(&document[span.end..]);
            updated
        }
        _ => {
            tracing::warn!(
                start = span.start,
                end = span.end,
                "span does not match document, leaving it unchanged"
            );
            document.to_string()
        }
    }
}

/// Creates the section for `content` if needed and writes `content` into it
pub fn upsert_section(document: &str, content: &SectionContent) -> String {
    let kind = content.kind();
    let ensured = ensure_section(document, kind);

    let span = match locate(&ensured, kind) {
        Some(span) => span,
        None => {
            tracing::warn!(%kind, "section header present but anchor marker missing");
            return document.to_string();
        }
    };

    apply(&ensured, &span, &content.render())
}
