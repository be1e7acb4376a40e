//! Access to commit history through the `git` executable.
//!
//! Everything the tools need from a repository goes through the [`History`]
//! trait, so the classification and rewrite workflows can be exercised
//! against an in-memory history in tests. [`GitCli`] is the real
//! implementation; it runs one `git` subprocess per call and blocks until
//! it exits.

use crate::commit::{CommitRecord, LOG_FORMAT, parse_log};
use crate::config::PLAN_ENV;
use crate::msg_filter::{RewritePlan, build_msg_filter_command};
use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while running `git`.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("`git` not found in PATH")]
    GitNotFound,

    #[error("`{command}` failed (exit code {code}): {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("cannot prepare rewrite: {0}")]
    Plan(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Options for a `git log` query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub no_merges: bool,
    pub exclude_grep: Option<String>,
    pub all_refs: bool,
    pub revision: Option<String>,
    pub topo_order: bool,
    pub reverse: bool,
}

impl LogQuery {
    /// All commits reachable from `HEAD`.
    pub fn head() -> Self {
        Self::default()
    }

    /// All commits reachable from any ref.
    pub fn all() -> Self {
        Self {
            all_refs: true,
            ..Self::default()
        }
    }

    /// Commits in a revision range such as `abc^..HEAD`.
    pub fn range(revision: impl Into<String>) -> Self {
        Self {
            revision: Some(revision.into()),
            ..Self::default()
        }
    }

    pub fn no_merges(mut self) -> Self {
        self.no_merges = true;
        self
    }

    /// Drops commits whose message matches `pattern`.
    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_grep = Some(pattern.into());
        self
    }

    pub fn topo_order(mut self) -> Self {
        self.topo_order = true;
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Arguments passed to `git`, starting with `log`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![String::from("log"), String::from(LOG_FORMAT)];
        if self.no_merges {
            args.push(String::from("--no-merges"));
        }
        if let Some(pattern) = &self.exclude_grep {
            args.push(String::from("--invert-grep"));
            args.push(format!("--grep={}", pattern));
        }
        if self.topo_order {
            args.push(String::from("--topo-order"));
        }
        if self.reverse {
            args.push(String::from("--reverse"));
        }
        if self.all_refs {
            args.push(String::from("--all"));
        }
        if let Some(rev) = &self.revision {
            args.push(rev.clone());
        }
        args
    }
}

/// Which commits a rewrite walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteScope {
    /// Every ref in the repository (`-- --all`).
    AllRefs,
    /// The target and its descendants up to `HEAD`. `parent` is the target's
    /// parent, or `None` when the target is a root commit.
    FromCommit { parent: Option<String> },
}

impl RewriteScope {
    /// Revision arguments placed after `--` on the filter-branch command line.
    pub fn rev_args(&self) -> Vec<String> {
        match self {
            RewriteScope::AllRefs => vec![String::from("--all")],
            RewriteScope::FromCommit { parent: Some(p) } => vec![format!("{}..HEAD", p)],
            RewriteScope::FromCommit { parent: None } => vec![String::from("HEAD")],
        }
    }

    /// Range to search after the rewrite for the commit that replaced the target.
    pub fn verify_query(&self) -> LogQuery {
        match self {
            RewriteScope::AllRefs => LogQuery::all(),
            RewriteScope::FromCommit { parent: Some(p) } => {
                LogQuery::range(format!("{}..HEAD", p)).reverse()
            }
            RewriteScope::FromCommit { parent: None } => LogQuery::head().reverse(),
        }
    }
}

/// The operations the tools perform on a repository's history.
pub trait History {
    /// Lists commits as (hash, subject) records.
    fn list_commits(&self, query: &LogQuery) -> Result<Vec<CommitRecord>, GitError>;

    /// Resolves a (possibly abbreviated) revision to a full commit hash.
    fn resolve(&self, rev: &str) -> Result<String, GitError>;

    /// Full hash of the first parent of `id`, or `None` for a root commit.
    fn parent_of(&self, id: &str) -> Result<Option<String>, GitError>;

    /// Current subject line of `id`.
    fn subject_of(&self, id: &str) -> Result<String, GitError>;

    /// Whether `id` is reachable from `HEAD`.
    fn is_ancestor_of_head(&self, id: &str) -> Result<bool, GitError>;

    /// Rewrites the subjects named in `plan`, walking the commits in `scope`.
    fn rewrite_subjects(&self, plan: &RewritePlan, scope: &RewriteScope) -> Result<(), GitError>;

    fn fetch(&self) -> Result<(), GitError>;

    /// `git push --force-with-lease`: refuses when the remote moved since the last fetch.
    fn push_force_with_lease(&self) -> Result<(), GitError>;
}

/// Renders a command line for error messages and logs.
fn describe(args: &[String]) -> String {
    format!("git {}", args.join(" "))
}

fn spawn_error(e: io::Error) -> GitError {
    if e.kind() == io::ErrorKind::NotFound {
        GitError::GitNotFound
    } else {
        GitError::Io(e)
    }
}

/// Runs a command with inherited output and returns its exit status as an error
/// when non-zero.
fn run_status(mut cmd: Command, command: String) -> Result<(), GitError> {
    debug!(%command, "running git");
    let status = cmd.status().map_err(spawn_error)?;
    if status.success() {
        Ok(())
    } else {
        Err(GitError::CommandFailed {
            command,
            code: status.code().unwrap_or(-1),
            stderr: String::from("see output above"),
        })
    }
}

/// Runs a command and returns its trimmed standard output on success, or its
/// trimmed standard error inside [`GitError::CommandFailed`] on failure.
fn run_output(mut cmd: Command, command: String) -> Result<String, GitError> {
    debug!(%command, "running git");
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    let out = cmd.output().map_err(spawn_error)?;
    if out.status.success() {
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    } else {
        Err(GitError::CommandFailed {
            command,
            code: out.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        })
    }
}

fn git(args: &[String]) -> Command {
    let mut cmd = Command::new("git");
    cmd.args(args);
    cmd
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

/// Runs `git rev-parse <flag>` and returns its trimmed output.
pub fn rev_parse(flag: &str) -> Result<String, GitError> {
    let args = owned(&["rev-parse", flag]);
    run_output(git(&args), describe(&args))
}

/// [`History`] backed by the `git` executable in the current directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    fn output(&self, args: &[String]) -> Result<String, GitError> {
        run_output(git(args), describe(args))
    }

    fn inherited(&self, args: &[String]) -> Result<(), GitError> {
        let mut cmd = git(args);
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        run_status(cmd, describe(args))
    }
}

impl History for GitCli {
    fn list_commits(&self, query: &LogQuery) -> Result<Vec<CommitRecord>, GitError> {
        let out = self.output(&query.args())?;
        Ok(parse_log(&out))
    }

    fn resolve(&self, rev: &str) -> Result<String, GitError> {
        let revspec = format!("{}^{{commit}}", rev);
        let args = owned(&["rev-parse", "--verify", revspec.as_str()]);
        self.output(&args)
    }

    fn parent_of(&self, id: &str) -> Result<Option<String>, GitError> {
        let revspec = format!("{}^", id);
        let args = owned(&["rev-parse", "--verify", "--quiet", revspec.as_str()]);
        match self.output(&args) {
            Ok(parent) => Ok(Some(parent)),
            // `--quiet` exits 1 without output when there is no parent.
            Err(GitError::CommandFailed { code: 1, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn subject_of(&self, id: &str) -> Result<String, GitError> {
        let args = owned(&["log", "--format=%s", "-n", "1", id]);
        self.output(&args)
    }

    fn is_ancestor_of_head(&self, id: &str) -> Result<bool, GitError> {
        let args = owned(&["merge-base", "--is-ancestor", id, "HEAD"]);
        match self.output(&args) {
            Ok(_) => Ok(true),
            Err(GitError::CommandFailed { code: 1, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn rewrite_subjects(&self, plan: &RewritePlan, scope: &RewriteScope) -> Result<(), GitError> {
        let plan_file = plan.write_temp().map_err(GitError::Plan)?;
        let exe = std::env::current_exe()
            .map_err(|e| GitError::Plan(format!("cannot locate current executable: {}", e)))?;
        let filter = build_msg_filter_command(&exe.to_string_lossy());

        let mut args = owned(&["filter-branch", "-f", "--msg-filter", filter.as_str(), "--"]);
        args.extend(scope.rev_args());

        let mut cmd = git(&args);
        cmd.env(PLAN_ENV, plan_file.path());
        cmd.env("FILTER_BRANCH_SQUELCH_WARNING", "1");
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        info!(targets = plan.entries().len(), ?scope, "rewriting commit subjects");
        // `plan_file` stays alive until filter-branch has exited.
        let result = run_status(cmd, describe(&args));
        drop(plan_file);
        result
    }

    fn fetch(&self) -> Result<(), GitError> {
        self.inherited(&owned(&["fetch"]))
    }

    fn push_force_with_lease(&self) -> Result<(), GitError> {
        self.inherited(&owned(&["push", "--force-with-lease"]))
    }
}
