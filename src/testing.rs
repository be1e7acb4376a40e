//! In-memory doubles for the [`History`] and prompter traits.

use crate::commit::CommitRecord;
use crate::git::{GitError, History, LogQuery, RewriteScope};
use crate::msg_filter::RewritePlan;
use crate::prompt::{ConfirmPrompter, StringPrompter};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// A linear history, newest commit first.
///
/// Subjects starting with `Merge ` are treated as merge commits. Rewrites
/// give new hashes to every commit from the oldest rewritten target up to
/// `HEAD`, as filter-branch does. Superseded commits stay readable through
/// [`History::subject_of`], like objects left behind in a real repository.
pub(crate) struct MockHistory {
    pub commits: RefCell<Vec<CommitRecord>>,
    /// Every commit ever created, including the ones no longer on `HEAD`.
    objects: RefCell<Vec<CommitRecord>>,
    /// Commits that any rewrite re-creates with a new hash, even outside its range.
    pub rehash_on_rewrite: RefCell<Vec<String>>,
    pub rewrites: RefCell<Vec<(RewritePlan, RewriteScope)>>,
    pub fail_rewrite_at: Option<usize>,
    /// Rewrites succeed without touching any commit.
    pub noop_rewrite: bool,
    pub fail_push: bool,
    pub fetches: Cell<usize>,
    pub pushes: Cell<usize>,
    next_id: Cell<usize>,
}

impl MockHistory {
    pub fn new(commits: &[(&str, &str)]) -> Self {
        let records: Vec<CommitRecord> = commits
            .iter()
            .map(|(id, s)| CommitRecord::new(*id, *s))
            .collect();
        Self {
            commits: RefCell::new(records.clone()),
            objects: RefCell::new(records),
            rehash_on_rewrite: RefCell::new(Vec::new()),
            rewrites: RefCell::new(Vec::new()),
            fail_rewrite_at: None,
            noop_rewrite: false,
            fail_push: false,
            fetches: Cell::new(0),
            pushes: Cell::new(0),
            next_id: Cell::new(0),
        }
    }

    pub fn subjects(&self) -> Vec<String> {
        self.commits
            .borrow()
            .iter()
            .map(|c| c.subject.clone())
            .collect()
    }

    fn fresh_id(&self) -> String {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        format!("{:040x}", n)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.commits.borrow().iter().position(|c| c.id == id)
    }

    fn failed(command: &str, code: i32, stderr: &str) -> GitError {
        GitError::CommandFailed {
            command: command.to_string(),
            code,
            stderr: stderr.to_string(),
        }
    }

    /// Number of commits (from the newest) a revision selects.
    fn span(&self, revision: Option<&str>) -> Result<usize, GitError> {
        let len = self.commits.borrow().len();
        match revision {
            None | Some("HEAD") => Ok(len),
            Some(rev) => {
                let parent = rev.strip_suffix("..HEAD").unwrap_or(rev);
                self.index_of(parent)
                    .ok_or_else(|| Self::failed("git log", 128, "bad revision"))
            }
        }
    }
}

impl History for MockHistory {
    fn list_commits(&self, query: &LogQuery) -> Result<Vec<CommitRecord>, GitError> {
        let span = self.span(query.revision.as_deref())?;
        let mut out: Vec<CommitRecord> = self
            .commits
            .borrow()
            .iter()
            .take(span)
            .filter(|c| !(query.no_merges && c.subject.starts_with("Merge ")))
            .filter(|c| match &query.exclude_grep {
                Some(p) => !c.subject.contains(p.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        if query.reverse {
            out.reverse();
        }
        Ok(out)
    }

    fn resolve(&self, rev: &str) -> Result<String, GitError> {
        self.commits
            .borrow()
            .iter()
            .find(|c| c.id.starts_with(rev))
            .map(|c| c.id.clone())
            .ok_or_else(|| Self::failed("git rev-parse", 128, "Needed a single revision"))
    }

    fn parent_of(&self, id: &str) -> Result<Option<String>, GitError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| Self::failed("git rev-parse", 128, "unknown revision"))?;
        Ok(self.commits.borrow().get(idx + 1).map(|c| c.id.clone()))
    }

    fn subject_of(&self, id: &str) -> Result<String, GitError> {
        self.objects
            .borrow()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.subject.clone())
            .ok_or_else(|| Self::failed("git log", 128, "unknown revision"))
    }

    fn is_ancestor_of_head(&self, id: &str) -> Result<bool, GitError> {
        Ok(self.index_of(id).is_some())
    }

    fn rewrite_subjects(&self, plan: &RewritePlan, scope: &RewriteScope) -> Result<(), GitError> {
        let call = self.rewrites.borrow().len();
        self.rewrites.borrow_mut().push((plan.clone(), scope.clone()));
        if self.fail_rewrite_at == Some(call) {
            return Err(Self::failed("git filter-branch", 1, "rewrite failed"));
        }
        if self.noop_rewrite {
            return Ok(());
        }

        let span = match scope {
            RewriteScope::AllRefs | RewriteScope::FromCommit { parent: None } => None,
            RewriteScope::FromCommit { parent: Some(p) } => Some(p.as_str()),
        };
        let span = self.span(span)?;

        let rehash = self.rehash_on_rewrite.borrow();
        let mut commits = self.commits.borrow_mut();
        let mut objects = self.objects.borrow_mut();
        let oldest_target = commits
            .iter()
            .take(span)
            .rposition(|c| plan.subject_for(&c.id).is_some())
            .map_or(0, |i| i + 1);
        for (i, commit) in commits.iter_mut().enumerate() {
            if i >= oldest_target && !rehash.contains(&commit.id) {
                continue;
            }
            if i < oldest_target {
                if let Some(subject) = plan.subject_for(&commit.id) {
                    commit.subject = subject.to_string();
                }
            }
            commit.id = self.fresh_id();
            objects.push(commit.clone());
        }
        Ok(())
    }

    fn fetch(&self) -> Result<(), GitError> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(())
    }

    fn push_force_with_lease(&self) -> Result<(), GitError> {
        self.pushes.set(self.pushes.get() + 1);
        if self.fail_push {
            return Err(Self::failed("git push --force-with-lease", 1, "stale info"));
        }
        Ok(())
    }
}

/// Returns queued responses in order and records every prompt it saw.
pub(crate) struct ScriptedPrompter {
    pub responses: VecDeque<Result<String, String>>,
    pub seen: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: responses.into(),
            seen: Vec::new(),
        }
    }
}

impl StringPrompter for ScriptedPrompter {
    fn prompt(&mut self, prompt: &str, _default: &str) -> Result<String, String> {
        self.seen.push(prompt.to_string());
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(String::from("no more input")))
    }
}

/// Answers every confirmation with the same value.
pub(crate) struct FixedConfirm(pub bool);

impl ConfirmPrompter for FixedConfirm {
    fn confirm(&mut self, _prompt: &str, _default: bool) -> Result<bool, String> {
        Ok(self.0)
    }
}
