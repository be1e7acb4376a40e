//! Message filter invoked by `git filter-branch --msg-filter`.
//!
//! Replacement subjects never pass through a shell. The rewriting process
//! writes them to a plan file, exports its path in [`PLAN_ENV`], and asks
//! filter-branch to run this executable with [`MSG_FILTER_FLAG`]. Only the
//! executable path is embedded in the shell command.

use crate::config::{MSG_FILTER_FLAG, PLAN_ENV};
use std::{
    fs::read_to_string,
    io::{self, Read, Write},
    path::Path,
};
use tempfile::NamedTempFile;

/// Target commits (full hashes) paired with their replacement subjects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewritePlan {
    entries: Vec<(String, String)>,
}

impl RewritePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan rewriting a single commit.
    pub fn single(id: impl Into<String>, subject: impl Into<String>) -> Self {
        let mut plan = Self::new();
        plan.push(id, subject);
        plan
    }

    pub fn push(&mut self, id: impl Into<String>, subject: impl Into<String>) {
        self.entries.push((id.into(), subject.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Replacement subject for `commit`, if it is a target.
    pub fn subject_for(&self, commit: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == commit)
            .map(|(_, s)| s.as_str())
    }

    /// Serializes the plan as `<id>\t<subject>` lines.
    ///
    /// Subjects are single-line by construction, so a newline always ends an entry.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|(id, subject)| format!("{id}\t{subject}\n"))
            .collect()
    }

    /// Parses the text produced by [`RewritePlan::to_text`].
    pub fn from_text(text: &str) -> Result<Self, String> {
        let mut plan = Self::new();
        for (n, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            match line.split_once('\t') {
                Some((id, subject)) => plan.push(id, subject),
                None => return Err(format!("malformed plan line {}", n + 1)),
            }
        }
        Ok(plan)
    }

    /// Writes the plan to a temporary file that lives as long as the handle.
    pub fn write_temp(&self) -> Result<NamedTempFile, String> {
        let mut file = match NamedTempFile::new() {
            Ok(f) => f,
            Err(e) => return Err(format!("cannot create plan file: {}", e)),
        };
        match file.write_all(self.to_text().as_bytes()).and_then(|_| file.flush()) {
            Ok(_) => Ok(file),
            Err(e) => Err(format!("cannot write plan file: {}", e)),
        }
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        match read_to_string(path) {
            Ok(text) => Self::from_text(&text),
            Err(e) => Err(format!("read failed: {}", e)),
        }
    }
}

/// Builds the shell command filter-branch evaluates for each commit.
///
/// The path is single-quoted, with embedded single quotes closed, escaped
/// and reopened, so that no character in it is interpreted by `sh`.
///
/// ```ignore
/// assert_eq!(
///     build_msg_filter_command("/usr/bin/git-reword"),
///     "'/usr/bin/git-reword' --msg-filter"
/// );
/// ```
pub(crate) fn build_msg_filter_command(exe_path: &str) -> String {
    let quoted = format!("'{}'", exe_path.replace('\'', "'\\''"));
    format!("{quoted} {MSG_FILTER_FLAG}")
}

/// Replaces the subject paragraph of `message`, keeping the body.
///
/// Git's subject is the whole first paragraph (lines up to the first blank
/// line, joined with spaces), so a wrapped subject is replaced in full.
pub fn replace_subject(message: &str, subject: &str) -> String {
    match message.find("\n\n") {
        Some(idx) => format!("{}{}", subject, &message[idx..]),
        None => format!("{}\n", subject),
    }
}

/// Returns the message filter-branch should record for `commit`.
pub fn filter_message(message: &str, commit: &str, plan: &RewritePlan) -> String {
    match plan.subject_for(commit) {
        Some(subject) => replace_subject(message, subject),
        None => message.to_string(),
    }
}

/// Entry point for message-filter mode.
///
/// Reads the plan named by [`PLAN_ENV`], the commit being rewritten from
/// `GIT_COMMIT`, and the original message from stdin; writes the filtered
/// message to stdout.
pub fn run() -> Result<(), String> {
    let plan_path = match std::env::var(PLAN_ENV) {
        Ok(p) => p,
        Err(_) => return Err(format!("{} is not set", PLAN_ENV)),
    };
    let commit = match std::env::var("GIT_COMMIT") {
        Ok(c) => c,
        Err(_) => return Err(String::from("GIT_COMMIT is not set")),
    };
    let plan = RewritePlan::load(Path::new(&plan_path))?;

    let mut message = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut message) {
        return Err(format!("cannot read message: {}", e));
    }

    let filtered = filter_message(&message, &commit, &plan);
    let mut stdout = io::stdout().lock();
    match stdout.write_all(filtered.as_bytes()).and_then(|_| stdout.flush()) {
        Ok(_) => Ok(()),
        Err(e) => Err(format!("write failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_quotes_plain_path() {
        assert_eq!(
            build_msg_filter_command("/usr/local/bin/git-reword"),
            "'/usr/local/bin/git-reword' --msg-filter"
        );
    }

    #[test]
    fn command_quotes_spaces_and_single_quotes() {
        let s = build_msg_filter_command("/Users/me/It's My App/bin");
        assert_eq!(s, "'/Users/me/It'\\''s My App/bin' --msg-filter");
    }

    #[test]
    fn replace_subject_keeps_body() {
        let msg = "Old subject\n\nBody line\n";
        assert_eq!(replace_subject(msg, "New"), "New\n\nBody line\n");
    }

    #[test]
    fn replace_subject_replaces_wrapped_first_paragraph() {
        let msg = "Release v1.0\n[skip ci]\n\nBody line\n";
        assert_eq!(replace_subject(msg, "Release v1.0"), "Release v1.0\n\nBody line\n");
        assert_eq!(replace_subject("First\nsecond\n", "New"), "New\n");
    }

    #[test]
    fn replace_subject_without_newline_appends_one() {
        assert_eq!(replace_subject("Old", "New"), "New\n");
    }

    #[test]
    fn filter_message_passes_through_other_commits() {
        let plan = RewritePlan::single("aaa", "New");
        assert_eq!(filter_message("Old\n", "bbb", &plan), "Old\n");
        assert_eq!(filter_message("Old\n", "aaa", &plan), "New\n");
    }

    #[test]
    fn plan_text_keeps_quotes_and_tabs_in_subjects() {
        let mut plan = RewritePlan::new();
        plan.push("aaa", "Say \"hi\" and 'bye' $(rm -rf /)");
        plan.push("bbb", "tab\there");
        let parsed = RewritePlan::from_text(&plan.to_text());
        assert_eq!(parsed, Ok(plan));
    }

    #[test]
    fn plan_rejects_malformed_line() {
        let result = RewritePlan::from_text("no-tab-here\n");
        assert_eq!(result, Err(String::from("malformed plan line 1")));
    }

    #[test]
    fn plan_round_trips_through_temp_file() {
        let plan = RewritePlan::single("abc", "Subject");
        let file = plan.write_temp().expect("failed to write plan");
        let loaded = RewritePlan::load(file.path()).expect("failed to load plan");
        assert_eq!(loaded.subject_for("abc"), Some("Subject"));
    }
}
