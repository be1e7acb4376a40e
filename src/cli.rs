//! Plumbing shared by the four binaries: logging setup, argument parsing,
//! environment checks, and the message-filter re-entry point.

use crate::{config::MSG_FILTER_FLAG, git, msg_filter};

use clap::{Parser, error::ErrorKind};
use console::style;
use std::env;

/// Installs a `tracing` subscriber writing to stderr, filtered by `RUST_LOG`
/// (default `warn`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    // A second initialisation (tests, re-entry) is harmless; keep the first.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Prints `msg` to stderr in bold red.
pub fn print_error(msg: impl std::fmt::Display) {
    eprintln!("{}", style(msg.to_string()).red().bold());
}

/// Prints `msg` to stderr in bold yellow.
pub fn print_warning(msg: impl std::fmt::Display) {
    eprintln!("{}", style(msg.to_string()).yellow().bold());
}

/// Parses the process arguments into `T`.
///
/// Help and version requests print and yield `Err(0)`. Any other parse
/// failure prints the usage error and yields `Err(1)`.
pub fn parse_args<T: Parser>() -> Result<T, i32> {
    match T::try_parse() {
        Ok(args) => Ok(args),
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            Err(code)
        }
    }
}

/// Runs the message filter when `filter-branch` re-invokes this binary.
///
/// Returns `None` for a normal invocation, so the caller goes on to parse
/// its own arguments.
pub fn msg_filter_mode() -> Option<Result<i32, ()>> {
    let mut args = env::args().skip(1);
    if args.next().as_deref() != Some(MSG_FILTER_FLAG) {
        return None;
    }
    match msg_filter::run() {
        Ok(_) => Some(Ok(0)),
        Err(e) => {
            print_error(format!("Message filter error: {}", e));
            Some(Err(()))
        }
    }
}

/// Verifies `git` is available and the working directory is inside a repository.
pub fn verify_environment() -> Result<(), ()> {
    if which::which("git").is_err() {
        print_error("Error: `git` not found in PATH.");
        return Err(());
    }

    match git::rev_parse("--show-toplevel") {
        Ok(_) => Ok(()),
        Err(e) => {
            print_error(format!("Error: not inside a git repo ({})", e));
            Err(())
        }
    }
}

/// Prints the reminder shown whenever history was rewritten but not pushed.
pub fn print_push_reminder() {
    println!("\nTo update the remote branch, run:");
    println!("  {}", style("git push --force-with-lease").cyan());
}
