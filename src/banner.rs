use console::{measure_text_width, style};
use std::iter;

/// Prints a decorative, colorized banner announcing a history rewrite.
///
/// The banner is sized to the widest **visible** line, using
/// [`console::measure_text_width`] so that ANSI codes embedded in the content
/// do not throw off the padding. Borders are styled separately from the
/// inner text.
///
/// # Parameters
///
/// * `targets` – How many commits will get a new subject.
/// * `whole_history` – `true` when every ref is rewritten (`--all`), `false`
///   when only the target commits and their descendants on `HEAD` are.
///
/// # Examples
///
/// ```no_run
/// use git_subject_rewrite::banner::print_banner;
///
/// print_banner(1, false);
/// ```
pub fn print_banner(targets: usize, whole_history: bool) {
    let lines = banner_lines(targets, whole_history);

    let max_width = lines
        .iter()
        .map(|l| measure_text_width(l))
        .max()
        .unwrap_or(0)
        + 2;

    let border = "═".repeat(max_width);
    let top = style(format!("╔{}╗", border)).blue().bold();
    let bottom = style(format!("╚{}╝", border)).blue().bold();
    let left = style("║ ").blue().bold().to_string();
    let right = style("║").blue().bold().to_string();

    println!();
    println!("{top}");
    for line in lines {
        let visible = measure_text_width(&line);
        let pad = max_width - visible;
        println!("{}{}{}{}", left, line, " ".repeat(pad - 1), right);
    }
    println!("{bottom}");
    println!();
}

/// Constructs the banner text: title, scope (styled), target count, steps.
///
/// Scope lines may contain ANSI styling; measure them with
/// `console::measure_text_width` rather than `str::len()`.
fn banner_lines(targets: usize, whole_history: bool) -> Vec<String> {
    let top = ["Rewrite commit subjects via git filter-branch", ""]
        .into_iter()
        .map(|s| s.to_string());

    let scope = if whole_history {
        vec![
            style("Scope: every branch and tag (--all).")
                .yellow()
                .bold()
                .to_string(),
            style("Commits on other branches will get new hashes too.")
                .yellow()
                .to_string(),
        ]
    } else {
        vec![
            style("Scope: target commits and their descendants on HEAD.")
                .cyan()
                .bold()
                .to_string(),
            style("(Other branches and tags are left untouched.)")
                .cyan()
                .to_string(),
        ]
    }
    .into_iter();

    let bottom = iter::once(String::new())
        .chain(iter::once(format!("Commits to reword: {}", targets)))
        .chain(
            [
                "This tool will:",
                "  1) Replace the subject line of each target commit",
                "  2) Copy every descendant forward with a new hash",
                "  3) Leave the remote alone until you force-push",
            ]
            .into_iter()
            .map(|s| s.to_string()),
        );

    top.chain(scope).chain(bottom).collect()
}
