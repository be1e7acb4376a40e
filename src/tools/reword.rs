//! `git-reword`: replaces the over-long subject of one commit.

use crate::banner::print_banner;
use crate::cli::{self, print_error, print_warning};
use crate::commit::{SubjectError, is_blocking, short_id, subject_len, validate_subject};
use crate::config::MAX_SUBJECT_LEN;
use crate::git::{GitCli, GitError, History, RewriteScope};
use crate::msg_filter::RewritePlan;
use crate::prompt::{self, ConfirmPrompter, StringPrompter};

use clap::Parser;
use console::style;
use thiserror::Error;
use tracing::{debug, info};

/// Rewrite the subject of COMMIT when it is longer than the limit.
#[derive(Debug, Parser)]
#[command(name = "git-reword", version)]
pub struct Args {
    /// Commit to reword (short or full hash, or any revision).
    pub commit: String,

    /// Replacement subject. Prompted for when omitted.
    pub message: Option<String>,

    /// Rewrite every branch and tag instead of only COMMIT..HEAD.
    #[arg(long)]
    pub all: bool,

    /// Fetch and `git push --force-with-lease` after a verified rewrite.
    #[arg(long)]
    pub push: bool,

    /// Longest subject accepted, in characters.
    #[arg(long, value_name = "N", env = "GIT_SUBJECT_MAX_LEN", default_value_t = MAX_SUBJECT_LEN)]
    pub max_length: usize,
}

/// What to reword and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewordRequest {
    pub commit: String,
    pub message: Option<String>,
    pub whole_history: bool,
    pub max_len: usize,
}

impl From<&Args> for RewordRequest {
    fn from(args: &Args) -> Self {
        Self {
            commit: args.commit.clone(),
            message: args.message.clone(),
            whole_history: args.all,
            max_len: args.max_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewordOutcome {
    /// The subject already fits; history was not touched.
    WithinLimit,
    /// The rewrite happened and the replacement commit was found.
    Rewritten { new_id: String },
    /// The rewrite command succeeded but the new subject could not be found.
    Unverified,
}

#[derive(Debug, Error)]
pub enum RewordError {
    #[error("cannot resolve `{rev}`: {source}")]
    Resolve { rev: String, source: GitError },

    #[error("invalid message: {0}")]
    InvalidMessage(#[from] SubjectError),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error("commit {0} is not reachable from HEAD; use --all to rewrite every ref")]
    NotOnHead(String),

    #[error("git filter-branch failed: {0}")]
    Rewrite(#[source] GitError),

    #[error("push failed: {0}")]
    Push(#[source] GitError),

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Finds the commit carrying `subject` among the commits `scope` rewrote.
///
/// In range mode the search is limited to `<parent>..HEAD`, oldest first, so
/// the first hit is the rewritten target itself.
pub fn find_rewritten<H: History>(
    history: &H,
    scope: &RewriteScope,
    subject: &str,
) -> Result<Option<String>, GitError> {
    let commits = history.list_commits(&scope.verify_query())?;
    Ok(commits
        .into_iter()
        .find(|c| c.subject == subject)
        .map(|c| c.id))
}

/// Rewords one commit when its subject exceeds the limit.
///
/// The replacement is validated before anything is mutated. With
/// `message: None` the user is prompted until a valid subject is entered.
pub fn reword<H: History, P: StringPrompter>(
    history: &H,
    prompter: &mut P,
    req: &RewordRequest,
) -> Result<RewordOutcome, RewordError> {
    let id = history
        .resolve(&req.commit)
        .map_err(|source| RewordError::Resolve {
            rev: req.commit.clone(),
            source,
        })?;
    let old = history.subject_of(&id)?;
    println!("Commit {} message:\n{}\n", short_id(&id), old);

    if !is_blocking(&old, req.max_len) {
        println!(
            "This commit message does not exceed {} characters. No change needed.",
            req.max_len
        );
        return Ok(RewordOutcome::WithinLimit);
    }
    println!(
        "Current message length: {} (> {})",
        subject_len(&old),
        req.max_len
    );

    let new = match &req.message {
        Some(m) => validate_subject(m, req.max_len)?,
        None => prompt::ask_subject(prompter, req.max_len).map_err(RewordError::Prompt)?,
    };

    let scope = if req.whole_history {
        RewriteScope::AllRefs
    } else {
        if !history.is_ancestor_of_head(&id)? {
            return Err(RewordError::NotOnHead(short_id(&id).to_string()));
        }
        RewriteScope::FromCommit {
            parent: history.parent_of(&id)?,
        }
    };

    print_banner(1, req.whole_history);
    info!(commit = %id, "rewording commit");
    history
        .rewrite_subjects(&RewritePlan::single(&id, &new), &scope)
        .map_err(RewordError::Rewrite)?;

    println!("\nVerifying new commit message in history...");
    match find_rewritten(history, &scope, &new)? {
        Some(new_id) => Ok(RewordOutcome::Rewritten { new_id }),
        None => {
            debug!(commit = %id, "rewritten subject not found after filter-branch");
            Ok(RewordOutcome::Unverified)
        }
    }
}

/// Fetches and force-pushes (with lease) when asked to, either by flag or,
/// in an interactive session, by confirmation. Returns whether it pushed.
pub fn sync_remote<H: History, C: ConfirmPrompter>(
    history: &H,
    confirm: &mut C,
    push: bool,
    interactive: bool,
) -> Result<bool, RewordError> {
    let wanted = if push {
        true
    } else if interactive {
        prompt::confirm_push(confirm).map_err(RewordError::Prompt)?
    } else {
        false
    };
    if !wanted {
        cli::print_push_reminder();
        return Ok(false);
    }
    history.fetch().map_err(RewordError::Push)?;
    history.push_force_with_lease().map_err(RewordError::Push)?;
    Ok(true)
}

/// Main entry point for `git-reword`.
///
/// # Exit Codes
///
/// * `0` – No change needed, rewrite verified (and pushed if requested), or
///   rewrite done but not verifiable (a warning asks for a manual check).
/// * `1` – Usage error, invalid replacement, rewrite failure, or push failure.
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

    let history = GitCli::new();
    let req = RewordRequest::from(&args);
    let mut string_prompter = prompt::DialoguerStringPrompter;

    match reword(&history, &mut string_prompter, &req) {
        Ok(RewordOutcome::WithinLimit) => Ok(0),
        Ok(RewordOutcome::Unverified) => {
            print_warning("Error: New commit message not found in history. Please check manually.");
            Ok(0)
        }
        Ok(RewordOutcome::Rewritten { new_id }) => {
            println!("{}", style("✅ Success! Commit message updated.").green().bold());
            println!("New commit hash: {}", short_id(&new_id));
            println!("Use this new hash for the next modification if needed.");

            let mut confirm_prompter = prompt::DialoguerConfirmPrompter;
            let interactive = req.message.is_none();
            match sync_remote(&history, &mut confirm_prompter, args.push, interactive) {
                Ok(true) => {
                    println!("{}", style("Remote updated.").green());
                    Ok(0)
                }
                Ok(false) => Ok(0),
                Err(e) => {
                    print_error(format!("❌ {}", e));
                    Err(())
                }
            }
        }
        Err(e) => {
            print_error(format!("Error: {}", e));
            Err(())
        }
    }
}
