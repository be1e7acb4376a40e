//! # git-subject-rewrite
//!
//! Small CLI tools for finding and fixing problem commit subjects.
//!
//! - `git-blocking-commits` lists commits whose subject is longer than 72
//!   characters, ignoring merges and dependency-bot commits.
//! - `git-skip-ci` lists commits tagged `[skip ci]` / `[ci skip]`.
//! - `git-reword` replaces one commit's over-long subject and can
//!   force-push (with lease) the result.
//! - `git-strip-skip-ci` removes skip-CI tags from every tagged commit.
//!
//! ## Usage
//!
//! ```bash
//! git-blocking-commits --save
//! git-reword abc1234 "Shorter subject" --push
//! git-strip-skip-ci --dry-run
//! ```
//!
//! ## Modules
//!
//! - [`tools`] - One module per binary
//! - [`git`] - History access behind the [`git::History`] trait
//! - [`commit`] - Commit records and subject predicates
//! - [`msg_filter`] - Message filter run by `git filter-branch`
//! - [`prompt`] - User input abstractions
//! - [`report`] - Detector output and report files
//! - [`banner`] - Decorative CLI banner
//! - [`cli`] - Shared binary plumbing
//! - [`config`] - Defaults

pub mod banner;
pub mod cli;
pub mod commit;
pub mod config;
pub mod git;
pub mod msg_filter;
pub mod prompt;
pub mod report;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;
