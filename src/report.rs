//! Text rendering for the detectors and persistence of the blocking report.

use crate::commit::CommitRecord;
use std::fs;
use std::io;
use std::path::Path;

/// Commits that survived the automated-commit filter, and the subset whose
/// subject is too long.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockingReport {
    pub considered: Vec<CommitRecord>,
    pub blocking: Vec<CommitRecord>,
}

/// Non-merge, non-bot commits and the subset tagged to skip CI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipCiReport {
    pub total: usize,
    pub flagged: Vec<CommitRecord>,
}

fn line(commit: &CommitRecord) -> String {
    format!("{} {}", commit.short_id(), commit.subject)
}

/// Flagged commits followed by the summary block.
pub fn render_blocking(report: &BlockingReport) -> String {
    let mut out = String::new();
    for commit in &report.blocking {
        out.push_str(&line(commit));
        out.push('\n');
    }
    out.push_str("\n=== Summary ===\n");
    out.push_str(&format!(
        "Total commits (excluding merges and Dependabot): {}\n",
        report.considered.len()
    ));
    out.push_str(&format!("Blocking commits: {}\n", report.blocking.len()));
    out
}

pub fn render_skip_ci(report: &SkipCiReport) -> String {
    let mut out = format!(
        "Total commits (excluding merges and Dependabot): {}\n",
        report.total
    );
    out.push_str(&format!(
        "Commits with '[skip ci]' in title: {}\n",
        report.flagged.len()
    ));
    if report.flagged.is_empty() {
        out.push_str("\nNo commits with [skip ci] in title found!\n");
    } else {
        out.push_str("\nCommits to rewrite (remove [skip ci] from title):\n");
        for commit in &report.flagged {
            out.push_str(&line(commit));
            out.push('\n');
        }
    }
    out
}

/// Writes `contents` to `path`, creating missing parent directories.
pub fn save(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_subject() -> String {
        "a".repeat(80)
    }

    #[test]
    fn blocking_report_lists_flagged_then_summary() {
        let report = BlockingReport {
            considered: vec![
                CommitRecord::new("abc1234567", "Fix bug"),
                CommitRecord::new("def4567890", long_subject()),
            ],
            blocking: vec![CommitRecord::new("def4567890", long_subject())],
        };
        let text = render_blocking(&report);
        assert!(text.starts_with(&format!("def4567 {}\n", long_subject())));
        assert!(text.contains("Total commits (excluding merges and Dependabot): 2"));
        assert!(text.ends_with("Blocking commits: 1\n"));
    }

    #[test]
    fn skip_ci_report_without_hits() {
        let text = render_skip_ci(&SkipCiReport {
            total: 4,
            flagged: vec![],
        });
        assert!(text.contains("Commits with '[skip ci]' in title: 0"));
        assert!(text.contains("No commits with [skip ci] in title found!"));
    }

    #[test]
    fn skip_ci_report_lists_truncated_ids() {
        let text = render_skip_ci(&SkipCiReport {
            total: 1,
            flagged: vec![CommitRecord::new(
                "0123456789abcdef",
                "Release v1.0 [skip ci]",
            )],
        });
        assert!(text.contains("0123456 Release v1.0 [skip ci]"));
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("temp").join("blocking_commits.txt");
        save(&path, "hello\n").expect("save failed");
        let read = fs::read_to_string(&path).expect("read failed");
        assert_eq!(read, "hello\n");
    }
}
