/// Entry point for the `git-strip-skip-ci` binary.
///
/// Delegates to the tool's entry function and exits the process with the
/// returned exit code. If an error occurs, exits with status code 1.
fn main() {
    match git_subject_rewrite::tools::strip::entry() {
        Ok(code) => std::process::exit(code),
        Err(_) => std::process::exit(1),
    }
}
