//! Defaults shared by every tool in the crate.

/// Longest commit subject accepted without being flagged, in characters.
///
/// `git-blocking-commits` and `git-reword` take `--max-length` (or
/// `GIT_SUBJECT_MAX_LEN`) to override it.
pub const MAX_SUBJECT_LEN: usize = 72;

/// Case-insensitive marker identifying dependency-update bot commits.
pub const BOT_MARKER: &str = "dependabot";

/// Recognized spellings of the skip-CI tag.
pub const SKIP_MARKERS: [&str; 2] = ["[skip ci]", "[ci skip]"];

/// Where `git-blocking-commits --save` writes its report, relative to the
/// working directory.
pub const DEFAULT_REPORT_PATH: &str = "temp/blocking_commits.txt";

/// Number of hash characters shown when printing a commit.
pub const SHORT_ID_LEN: usize = 7;

/// Environment variable carrying the rewrite plan path to the message filter.
pub const PLAN_ENV: &str = "GIT_SUBJECT_REWRITE_PLAN";

/// Argument that switches a binary into message-filter mode.
pub const MSG_FILTER_FLAG: &str = "--msg-filter";
