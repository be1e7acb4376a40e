//! `git-strip-skip-ci`: removes skip-CI tags from every tagged commit subject.
//!
//! Commits are discovered in topological order, newest first, and rewritten
//! one at a time over `<target>^..HEAD`. A rewrite only replaces the target
//! and its descendants, so the older targets still waiting in the queue keep
//! their hashes. Before its rewrite each target must still be reachable from
//! `HEAD` with the subject that was discovered; after it, the new subject must
//! be in the rewritten range and the old commit gone from `HEAD`.

use crate::banner::print_banner;
use crate::cli::{self, print_error, print_warning};
use crate::commit::{CommitRecord, has_skip_marker, short_id, strip_skip_markers};
use crate::git::{GitCli, GitError, History, RewriteScope};
use crate::msg_filter::RewritePlan;
use crate::prompt::{self, ConfirmPrompter};
use crate::tools::skip_ci::candidates_query;

use clap::Parser;
use console::style;
use thiserror::Error;
use tracing::info;

/// Remove `[skip ci]` and `[ci skip]` from every commit subject on HEAD.
#[derive(Debug, Parser)]
#[command(name = "git-strip-skip-ci", version)]
pub struct Args {
    /// Rewrite without asking for confirmation.
    #[arg(short, long)]
    pub yes: bool,

    /// Show the planned changes and stop.
    #[arg(long)]
    pub dry_run: bool,
}

/// A commit to rewrite and the subject it will get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripTarget {
    pub commit: CommitRecord,
    pub new_subject: String,
}

/// Planned targets, plus tagged commits left alone because stripping the
/// tag would leave an empty subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripPlan {
    pub targets: Vec<StripTarget>,
    pub skipped: Vec<CommitRecord>,
}

#[derive(Debug, Error)]
pub enum StripError {
    #[error("commit {id} changed since discovery: expected `{expected}`, found `{found}`")]
    Stale {
        id: String,
        expected: String,
        found: String,
    },

    #[error("commit {id} is no longer reachable from HEAD")]
    Detached { id: String },

    #[error("commit {id} still lacks the subject `{expected}` after the rewrite")]
    Unchanged { id: String, expected: String },

    #[error("error rewriting commit {id}: {source}")]
    Rewrite { id: String, source: GitError },

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Failure of a batch part-way through. Rewrites before `applied` stay in place.
#[derive(Debug, Error)]
#[error("{source} ({applied} commit(s) already rewritten)")]
pub struct BatchFailure {
    pub applied: usize,
    pub source: StripError,
}

/// Keeps tagged commits, pairing each with its stripped subject.
pub fn plan(commits: Vec<CommitRecord>) -> StripPlan {
    let mut out = StripPlan::default();
    for commit in commits.into_iter().filter(|c| has_skip_marker(&c.subject)) {
        let new_subject = strip_skip_markers(&commit.subject);
        if new_subject.is_empty() {
            out.skipped.push(commit);
        } else {
            out.targets.push(StripTarget {
                commit,
                new_subject,
            });
        }
    }
    out
}

/// Lists tagged non-merge, non-bot commits, descendants before ancestors.
pub fn discover<H: History>(history: &H) -> Result<StripPlan, GitError> {
    let commits = history.list_commits(&candidates_query().topo_order())?;
    Ok(plan(commits))
}

fn rewrite_one<H: History>(history: &H, target: &StripTarget) -> Result<(), StripError> {
    let id = &target.commit.id;
    // Old hashes still name objects, so reachability is checked first.
    if !history.is_ancestor_of_head(id)? {
        return Err(StripError::Detached {
            id: short_id(id).to_string(),
        });
    }
    let found = history.subject_of(id)?;
    if found != target.commit.subject {
        return Err(StripError::Stale {
            id: short_id(id).to_string(),
            expected: target.commit.subject.clone(),
            found,
        });
    }
    let scope = RewriteScope::FromCommit {
        parent: history.parent_of(id)?,
    };
    history
        .rewrite_subjects(&RewritePlan::single(id, &target.new_subject), &scope)
        .map_err(|source| StripError::Rewrite {
            id: short_id(id).to_string(),
            source,
        })?;
    verify_one(history, target, &scope)
}

/// Checks that the target was replaced by a commit carrying the new subject.
fn verify_one<H: History>(
    history: &H,
    target: &StripTarget,
    scope: &RewriteScope,
) -> Result<(), StripError> {
    let id = &target.commit.id;
    let replaced = !history.is_ancestor_of_head(id)?;
    let present = history
        .list_commits(&scope.verify_query())?
        .iter()
        .any(|c| c.subject == target.new_subject);
    if replaced && present {
        Ok(())
    } else {
        Err(StripError::Unchanged {
            id: short_id(id).to_string(),
            expected: target.new_subject.clone(),
        })
    }
}

/// Rewrites every target in order, stopping at the first failure.
///
/// `on_done` is called after each successful rewrite. There is no rollback:
/// a failure leaves the earlier rewrites applied and never attempts the rest.
pub fn apply<H: History>(
    history: &H,
    targets: &[StripTarget],
    mut on_done: impl FnMut(&StripTarget),
) -> Result<usize, BatchFailure> {
    for (applied, target) in targets.iter().enumerate() {
        info!(commit = %target.commit.id, "stripping skip-ci tag");
        if let Err(source) = rewrite_one(history, target) {
            return Err(BatchFailure { applied, source });
        }
        on_done(target);
    }
    Ok(targets.len())
}

fn print_preview(plan: &StripPlan) {
    println!("\n📝 Found {} commits to process:", plan.targets.len());
    for (i, t) in plan.targets.iter().enumerate() {
        println!("\n{}. Commit {}:", i + 1, t.commit.short_id());
        println!("   Old: {}", t.commit.subject);
        println!("   New: {}", t.new_subject);
    }
    for c in &plan.skipped {
        print_warning(format!(
            "Skipping {}: subject would be empty without the tag ({})",
            c.short_id(),
            c.subject
        ));
    }
}

/// Runs discovery, preview, confirmation and the batch. Returns the exit code.
pub fn run<H: History, C: ConfirmPrompter>(
    history: &H,
    confirm: &mut C,
    args: &Args,
) -> Result<i32, ()> {
    println!("🔍 Scanning for commits with [skip ci] in their titles...");
    let plan = match discover(history) {
        Ok(p) => p,
        Err(e) => {
            print_error(format!("Error: cannot read commit log ({})", e));
            return Err(());
        }
    };

    if plan.targets.is_empty() && plan.skipped.is_empty() {
        println!(
            "{}",
            style("✅ No commits found with [skip ci] in their titles.").green()
        );
        return Ok(0);
    }

    print_preview(&plan);
    if args.dry_run || plan.targets.is_empty() {
        return Ok(0);
    }

    print_banner(plan.targets.len(), false);
    if !args.yes {
        match prompt::confirm_rewrite(confirm, plan.targets.len()) {
            Ok(true) => {}
            Ok(false) => {
                println!(
                    "{}",
                    style("Canceled by user. No changes made.").yellow().bold()
                );
                return Ok(0);
            }
            Err(e) => {
                print_error(format!("Prompt error: {}", e));
                return Err(());
            }
        }
    }

    println!("\n🔄 Starting batch rewrite of commits...");
    let done = apply(history, &plan.targets, |t| {
        println!("{}", style(format!("✅ Rewrote commit {}", t.commit.short_id())).green());
    });
    match done {
        Ok(_) => {
            println!("\n🚀 All commits have been rewritten!");
            println!(
                "\n{}",
                style("⚠️  Don't forget to force push your changes:").yellow().bold()
            );
            println!("   git push --force-with-lease");
            Ok(0)
        }
        Err(e) => {
            print_error(format!("❌ {}", e));
            Err(())
        }
    }
}

/// Main entry point for `git-strip-skip-ci`.
///
/// # Exit Codes
///
/// * `0` – Nothing to do, dry run, canceled, or every rewrite succeeded.
/// * `1` – The log query or any rewrite failed (earlier rewrites stay applied).
pub fn entry() -> Result<i32, ()> {
    if let Some(result) = cli::msg_filter_mode() {
        return result;
    }
    cli::init_tracing();
    let args = match cli::parse_args::<Args>() {
        Ok(a) => a,
        Err(0) => return Ok(0),
        Err(_) => return Err(()),
    };

    cli::verify_environment()?;

    let mut confirm_prompter = prompt::DialoguerConfirmPrompter;
    run(&GitCli::new(), &mut confirm_prompter, &args)
}
