//! Challenge metadata written by humans in the issue body
//!
//! Challenge issues carry a mentor and a score as list items under their own
//! headings:
//!
//! ```text
//! ## Mentor
//! * @octocat
//!
//! ## Score
//! * 300
//! ```

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Login following a `Mentor` heading, with an optional list bullet and `@`
static MENTOR_RE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"(Mentor).*[\r\n]+[-|* ]*@*([a-z0-9](?:-?[a-z0-9]){0,38})")
        .case_insensitive(true)
        .build()
        .expect("valid mentor regex")
});

/// Positive integer following a `Score` heading (case-sensitive)
static SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Score).*[\r\n]+[-|* ]*([1-9][0-9]*)").expect("valid score regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorAndScore {
    pub mentor: String,
    pub score: u64,
}

/// Extracts mentor and score; both must be present
pub fn find_mentor_and_score(body: &str) -> Option<MentorAndScore> {
    let mentor = MENTOR_RE.captures(body)?.get(2)?.as_str().trim().to_string();
    let score = SCORE_RE.captures(body)?.get(2)?.as_str().parse().ok()?;

    Some(MentorAndScore { mentor, score })
}
