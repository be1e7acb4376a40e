//! `git-skip-ci`: lists commits whose subject carries a skip-CI tag.

use crate::cli::{self, print_error};
use crate::commit::{CommitRecord, has_skip_marker};
use crate::config::BOT_MARKER;
use crate::git::{GitCli, GitError, History, LogQuery};
use crate::report::{self, SkipCiReport};

use clap::Parser;

/// List non-merge, non-bot commits tagged `[skip ci]` or `[ci skip]`.
#[derive(Debug, Parser)]
#[command(name = "git-skip-ci", version)]
pub struct Args {}

/// The query both skip-CI tools start from: no merges, no bot commits.
pub fn candidates_query() -> LogQuery {
    LogQuery::head().no_merges().excluding(BOT_MARKER)
}

pub fn classify(commits: Vec<CommitRecord>) -> SkipCiReport {
    let total = commits.len();
    let flagged = commits
        .into_iter()
        .filter(|c| has_skip_marker(&c.subject))
        .collect();
    SkipCiReport { total, flagged }
}

pub fn scan<H: History>(history: &H) -> Result<SkipCiReport, GitError> {
    Ok(classify(history.list_commits(&candidates_query())?))
}

/// Main entry point for `git-skip-ci`.
///
/// Read-only. Exits `0` whether or not anything is flagged; `1` only when
/// the repository cannot be queried at all.
pub fn entry() -> Result<i32, ()> {
    cli::init_tracing();
    match cli::parse_args::<Args>() {
        Ok(_) => {}
        Err(0) => return Ok(0),
        Err(_) => return Err(()),
    }

    cli::verify_environment()?;

    match scan(&GitCli::new()) {
        Ok(r) => {
            print!("{}", report::render_skip_ci(&r));
            Ok(0)
        }
        Err(e) => {
            print_error(format!("Error: cannot read commit log ({})", e));
            Err(())
        }
    }
}
