//! Commit records and the text predicates applied to their subjects.

use crate::config::{BOT_MARKER, SHORT_ID_LEN, SKIP_MARKERS};
use thiserror::Error;

/// Field separator placed between hash and subject in log output (`%x1f`).
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// `git log` format producing one `<hash><US><subject>` line per commit.
pub const LOG_FORMAT: &str = "--format=%H%x1f%s";

/// A commit as observed in one invocation: its hash and subject line.
///
/// Records are snapshots. Any history rewrite invalidates the identifiers of
/// the rewritten commit and all of its descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    pub subject: String,
}

impl CommitRecord {
    pub fn new(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
        }
    }

    /// Abbreviated hash for display.
    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }
}

/// Returns the first [`SHORT_ID_LEN`] characters of `id`, or all of it when shorter.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Parses the output of `git log` run with [`LOG_FORMAT`].
///
/// Lines without the field separator (blank lines, stray output) are skipped.
pub fn parse_log(output: &str) -> Vec<CommitRecord> {
    output
        .lines()
        .filter_map(|line| {
            let (id, subject) = line.split_once(FIELD_SEPARATOR)?;
            let id = id.trim();
            if id.is_empty() {
                return None;
            }
            Some(CommitRecord::new(id, subject))
        })
        .collect()
}

/// Length of a subject in characters, the unit the limit is expressed in.
pub fn subject_len(subject: &str) -> usize {
    subject.chars().count()
}

/// Whether a subject belongs to a merge or a dependency-bot commit.
///
/// The bot marker and the bare word "merge" match in any case; the
/// `Merge ` and `Revert "Merge` prefixes are matched exactly.
pub fn is_automated(subject: &str) -> bool {
    let lower = subject.to_lowercase();
    lower.contains(BOT_MARKER)
        || subject.starts_with("Merge ")
        || subject.starts_with("Revert \"Merge")
        || lower.contains("merge")
}

/// Whether a subject is longer than `max_len` characters.
pub fn is_blocking(subject: &str, max_len: usize) -> bool {
    subject_len(subject) > max_len
}

/// Whether a subject carries either spelling of the skip-CI tag.
pub fn has_skip_marker(subject: &str) -> bool {
    SKIP_MARKERS.iter().any(|m| subject.contains(m))
}

/// Removes every occurrence of both skip-CI spellings and trims the result.
///
/// Passes repeat until no tag is left, since removing one spelling can
/// join the pieces of another.
pub fn strip_skip_markers(subject: &str) -> String {
    let mut out = subject.to_string();
    while has_skip_marker(&out) {
        out = SKIP_MARKERS.iter().fold(out, |acc, m| acc.replace(m, ""));
    }
    out.trim().to_string()
}

/// Reasons a candidate subject is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubjectError {
    #[error("message must not be empty")]
    Empty,

    #[error("message is {len} characters; it must be {max} characters or less")]
    TooLong { len: usize, max: usize },

    #[error("message must be a single line")]
    MultiLine,
}

/// Trims `candidate` and checks that it is a usable replacement subject.
///
/// # Errors
///
/// Returns [`SubjectError`] when the trimmed text is empty, longer than
/// `max_len` characters, or spans more than one line.
pub fn validate_subject(candidate: &str, max_len: usize) -> Result<String, SubjectError> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(SubjectError::Empty);
    }
    if trimmed.contains(['\n', '\r']) {
        return Err(SubjectError::MultiLine);
    }
    let len = subject_len(trimmed);
    if len > max_len {
        return Err(SubjectError::TooLong { len, max: max_len });
    }
    Ok(trimmed.to_string())
}
