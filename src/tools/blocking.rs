//! `git-blocking-commits`: lists human-authored commits whose subject is too long.

use crate::cli::{self, print_error};
use crate::commit::{CommitRecord, is_automated, is_blocking};
use crate::config::{DEFAULT_REPORT_PATH, MAX_SUBJECT_LEN};
use crate::git::{GitCli, GitError, History, LogQuery};
use crate::report::{self, BlockingReport};

use clap::Parser;
use console::style;
use std::path::PathBuf;
use tracing::debug;

/// Flag commits whose subject line exceeds the length limit.
///
/// Merge commits and dependency-bot commits are ignored.
#[derive(Debug, Parser)]
#[command(name = "git-blocking-commits", version)]
pub struct Args {
    /// Also write the report to a file.
    #[arg(long)]
    pub save: bool,

    /// Write the report to PATH instead of the default location (implies --save).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Longest subject accepted, in characters.
    #[arg(long, value_name = "N", env = "GIT_SUBJECT_MAX_LEN", default_value_t = MAX_SUBJECT_LEN)]
    pub max_length: usize,
}

impl Args {
    /// Where to save the report, if saving was requested.
    pub fn report_path(&self) -> Option<PathBuf> {
        match (&self.output, self.save) {
            (Some(p), _) => Some(p.clone()),
            (None, true) => Some(PathBuf::from(DEFAULT_REPORT_PATH)),
            (None, false) => None,
        }
    }
}

/// Drops automated commits and flags the rest when their subject is too long.
pub fn classify(commits: Vec<CommitRecord>, max_len: usize) -> BlockingReport {
    let considered: Vec<CommitRecord> = commits
        .into_iter()
        .filter(|c| !is_automated(&c.subject))
        .collect();
    let blocking = considered
        .iter()
        .filter(|c| is_blocking(&c.subject, max_len))
        .cloned()
        .collect();
    BlockingReport {
        considered,
        blocking,
    }
}

/// Reads the full log reachable from `HEAD` and classifies it.
pub fn scan<H: History>(history: &H, max_len: usize) -> Result<BlockingReport, GitError> {
    let commits = history.list_commits(&LogQuery::head())?;
    debug!(commits = commits.len(), "read commit log");
    Ok(classify(commits, max_len))
}

/// Main entry point for `git-blocking-commits`.
///
/// # Exit Codes
///
/// * `0` – The log was read (whether or not anything was flagged).
/// * `1` – Bad arguments, the log query failed, or the report could not be saved.
pub fn entry() -> Result<i32, ()> {
    cli::init_tracing();
    let args = match cli::parse_args::<Args>() {
        Ok(a) => a,
        Err(0) => return Ok(0),
        Err(_) => return Err(()),
    };

    cli::verify_environment()?;

    let report = match scan(&GitCli::new(), args.max_length) {
        Ok(r) => r,
        Err(e) => {
            print_error(format!("Error: cannot read commit log ({})", e));
            return Err(());
        }
    };

    let text = report::render_blocking(&report);
    print!("{}", text);

    if let Some(path) = args.report_path() {
        match report::save(&path, &text) {
            Ok(_) => println!(
                "{}",
                style(format!("Report written to {}", path.display())).green()
            ),
            Err(e) => {
                print_error(format!("Error: cannot write {} ({})", path.display(), e));
                return Err(());
            }
        }
    }

    Ok(0)
}
